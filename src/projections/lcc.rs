//!
//! Lambert Conformal Conic, 1 or 2 standard parallels
//!
//! Dispatches on the presence of a distinct `lat_2`: with `lat_1 ==
//! lat_2` (or `lat_2` absent) this reduces to the 1SP form, `n =
//! sin(lat_1)`.
//!

use crate::error::{Error, Result};
use crate::parameter_map::ParameterMap;
use crate::projections::ProjectionParams;

#[derive(Debug, Clone)]
pub struct Lcc {
    p: ProjectionParams,
    n: f64,
    f: f64,
    rho0: f64,
}

impl Lcc {
    fn m(p: &ProjectionParams, phi: f64) -> f64 {
        let (s, c) = phi.sin_cos();
        c / (1.0 - p.ellipsoid.es * s * s).sqrt()
    }

    fn t(p: &ProjectionParams, phi: f64) -> f64 {
        (-p.ellipsoid.isometric_latitude(phi)).exp()
    }

    pub fn setup(p: ProjectionParams, params: &dyn ParameterMap) -> Result<Self> {
        let has_lat2 = params.try_angular_value("lat_2")?.is_some();
        let lat_1 = p.lat_1;
        let lat_2 = if has_lat2 { p.lat_2 } else { lat_1 };

        if (lat_1 + lat_2).abs() < 1e-10 {
            return Err(Error::ConicLatEqual);
        }

        let n = if (lat_1 - lat_2).abs() < 1e-10 {
            lat_1.sin()
        } else {
            let (m1, m2) = (Self::m(&p, lat_1), Self::m(&p, lat_2));
            let (t1, t2) = (Self::t(&p, lat_1), Self::t(&p, lat_2));
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        };

        let (m1, t1) = (Self::m(&p, lat_1), Self::t(&p, lat_1));
        let f = m1 / (n * t1.powf(n));
        let t0 = Self::t(&p, p.lat_0);
        let rho0 = p.ellipsoid.a * f * t0.powf(n);

        Ok(Self { p, n, f, rho0 })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let t = Self::t(&self.p, lat);
        let rho = a * self.f * t.powf(self.n);
        let theta = self.n * crate::operation::primitives::adjlon(lon - self.p.lon_0);
        Ok((
            self.p.x_0 + rho * theta.sin(),
            self.p.y_0 + self.rho0 - rho * theta.cos(),
        ))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let (dx, dy) = (x - self.p.x_0, self.rho0 - (y - self.p.y_0));
        let rho = self.n.signum() * (dx * dx + dy * dy).sqrt();
        let theta = dx.atan2(dy);

        let t = (rho / (a * self.f)).powf(1.0 / self.n);
        let lat = self.p.ellipsoid.lat_from_isometric(-t.ln())?;
        let lon = theta / self.n + self.p.lon_0;
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::constants::grs80;
    use crate::projstring::parse;
    use approx::assert_abs_diff_eq;

    #[test]
    fn lambert_93_known_value() {
        let params = parse("+lat_1=49 +lat_2=44 +lat_0=46.5 +lon_0=3 +x_0=700000 +y_0=6600000").unwrap();
        let p = ProjectionParams::from_map(grs80(), &params).unwrap();
        let lcc = Lcc::setup(p, &params).unwrap();

        let (x, y) = lcc.forward(3f64.to_radians(), 46.5f64.to_radians()).unwrap();
        assert_abs_diff_eq!(x, 700000.0, epsilon = 1e-3);
        assert_abs_diff_eq!(y, 6600000.0, epsilon = 1e-3);
    }

    #[test]
    fn round_trip() {
        let params = parse("+lat_1=49 +lat_2=44 +lat_0=46.5 +lon_0=3 +x_0=700000 +y_0=6600000").unwrap();
        let p = ProjectionParams::from_map(grs80(), &params).unwrap();
        let lcc = Lcc::setup(p, &params).unwrap();

        let p0 = (2.35f64.to_radians(), 48.85f64.to_radians());
        let (x, y) = lcc.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = lcc.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-9);
    }
}
