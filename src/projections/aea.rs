//!
//! Albers Equal-Area Conic, one or two standard parallels
//!
//! Snyder's *Map Projections: A Working Manual* eq. 14-3 through 14-6 on
//! the ellipsoid's authalic-like `qfn` series. `leac` (Lambert Equal
//! Area Conic) is the same formulas with a single standard parallel and
//! the pole or the other parallel taken as the second one.
//!

use crate::error::{Error, Result};
use crate::parameter_map::ParameterMap;
use crate::projections::ProjectionParams;

#[derive(Debug, Clone)]
pub struct Aea {
    p: ProjectionParams,
    n: f64,
    c: f64,
    rho0: f64,
}

fn qfn(p: &ProjectionParams, phi: f64) -> f64 {
    let e = p.ellipsoid.e;
    if e < 1e-10 {
        return 2.0 * phi.sin();
    }
    let s = phi.sin();
    (1.0 - e * e) * (s / (1.0 - e * e * s * s) - (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln())
}

impl Aea {
    pub fn setup(p: ProjectionParams, params: &dyn ParameterMap) -> Result<Self> {
        let has_lat2 = params.try_angular_value("lat_2")?.is_some();
        let lat_1 = p.lat_1;
        let lat_2 = if has_lat2 { p.lat_2 } else { lat_1 };
        Self::build(p, lat_1, lat_2)
    }

    /// `leac`: Lambert Equal Area Conic, a single standard parallel with
    /// the second fixed at the pole (south pole unless `+south`).
    pub fn setup_leac(p: ProjectionParams, params: &dyn ParameterMap) -> Result<Self> {
        let south = params.check_option("south")?;
        let pole = if south {
            -std::f64::consts::FRAC_PI_2
        } else {
            std::f64::consts::FRAC_PI_2
        };
        Self::build(p, p.lat_1, pole)
    }

    fn build(p: ProjectionParams, lat_1: f64, lat_2: f64) -> Result<Self> {
        if (lat_1 + lat_2).abs() < 1e-10 {
            return Err(Error::ConicLatEqual);
        }

        let (m1, m2) = (
            lat_1.cos() / (1.0 - p.ellipsoid.es * lat_1.sin().powi(2)).sqrt(),
            lat_2.cos() / (1.0 - p.ellipsoid.es * lat_2.sin().powi(2)).sqrt(),
        );
        let (q1, q2) = (qfn(&p, lat_1), qfn(&p, lat_2));

        let n = if (lat_1 - lat_2).abs() < 1e-10 {
            lat_1.sin()
        } else {
            (m1 * m1 - m2 * m2) / (q2 - q1)
        };

        let c = m1 * m1 + n * q1;
        let q0 = qfn(&p, p.lat_0);
        let rho0 = p.ellipsoid.a * (c - n * q0).max(0.0).sqrt() / n;

        Ok(Self { p, n, c, rho0 })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let q = qfn(&self.p, lat);
        let rho = a * (self.c - self.n * q).max(0.0).sqrt() / self.n;
        let theta = self.n * crate::operation::primitives::adjlon(lon - self.p.lon_0);
        Ok((
            self.p.x_0 + rho * theta.sin(),
            self.p.y_0 + self.rho0 - rho * theta.cos(),
        ))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let (dx, dy) = (x - self.p.x_0, self.rho0 - (y - self.p.y_0));
        let rho = (dx * dx + dy * dy).sqrt();
        let theta = dx.atan2(dy);
        let q = (self.c - (rho * self.n / a).powi(2)) / self.n;

        let e = self.p.ellipsoid.e;
        let lat = if e < 1e-10 {
            (q / 2.0).clamp(-1.0, 1.0).asin()
        } else {
            let mut phi = (q / 2.0).clamp(-1.0, 1.0).asin();
            for _ in 0..15 {
                let s = phi.sin();
                let es2 = 1.0 - e * e * s * s;
                let f = es2 * es2 / (2.0 * phi.cos())
                    * (q / (1.0 - e * e)
                        - s / es2
                        + (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln());
                phi += f;
                if f.abs() < 1e-12 {
                    break;
                }
            }
            phi
        };

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
    fn round_trip() {
        let params = parse("+lat_1=29.5 +lat_2=45.5 +lat_0=23 +lon_0=-96").unwrap();
        let p = ProjectionParams::from_map(grs80(), &params).unwrap();
        let aea = Aea::setup(p, &params).unwrap();

        let p0 = (-90f64.to_radians(), 35f64.to_radians());
        let (x, y) = aea.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = aea.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-8);
    }
}
