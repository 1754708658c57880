//!
//! Gauss-Schreiber Transverse Mercator
//!
//! The "double projection" transverse cousin of [`crate::projections::somerc`]:
//! the ellipsoid is mapped conformally to a sphere at `lat_0`, then a
//! spherical transverse Mercator (not an oblique one — no pole
//! rotation) is applied directly. This is what distinguishes it from
//! the Krüger series used by [`crate::projections::etmerc`]: the
//! ellipsoidal step and the transverse-Mercator step are decoupled
//! through the auxiliary sphere instead of combined into one series.
//!

use crate::error::Result;
use crate::projections::ProjectionParams;

#[derive(Debug, Clone)]
pub struct Gstmerc {
    p: ProjectionParams,
    c: f64,
    k: f64,
    r: f64,
}

impl Gstmerc {
    pub fn setup(p: ProjectionParams) -> Result<Self> {
        let es = p.ellipsoid.es;
        let lat0 = p.lat_0;

        let c = (1.0 + es * lat0.cos().powi(4) / (1.0 - es)).sqrt();
        let sa0 = p.ellipsoid.isometric_latitude(lat0);
        let b0 = (lat0.sin() / c).asin();
        let k = (std::f64::consts::FRAC_PI_4 + b0 / 2.0).tan().ln() - c * sa0;
        let r = p.ellipsoid.a * (1.0 - es).sqrt() / (1.0 - es * lat0.sin().powi(2));

        Ok(Self { p, c, k, r })
    }

    fn conformal_lat(&self, lat: f64) -> f64 {
        let sa = self.p.ellipsoid.isometric_latitude(lat);
        let s = self.c * sa + self.k;
        2.0 * s.exp().atan() - std::f64::consts::FRAC_PI_2
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let b = self.conformal_lat(lat);
        let l = self.c * crate::operation::primitives::adjlon(lon - self.p.lon_0);

        let bb = b.cos() * l.sin();
        let x = self.r * self.p.k0 * 0.5 * ((1.0 + bb) / (1.0 - bb)).ln();
        let y = self.r * self.p.k0 * b.tan().atan2(l.cos());
        Ok((self.p.x_0 + x, self.p.y_0 + y))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (x, y) = (x - self.p.x_0, y - self.p.y_0);
        let d = y / (self.r * self.p.k0);
        let xr = x / (self.r * self.p.k0);

        let l = xr.sinh().atan2(d.cos());
        let b = (d.sin() / xr.cosh()).clamp(-1.0, 1.0).asin();

        let lon = self.p.lon_0 + l / self.c;
        let s = (std::f64::consts::FRAC_PI_4 + b / 2.0).tan().ln();
        let sa = (s - self.k) / self.c;
        let lat = self.p.ellipsoid.lat_from_isometric(sa)?;
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::constants::grs80;
    use approx::assert_abs_diff_eq;

    fn params() -> ProjectionParams {
        ProjectionParams {
            ellipsoid: grs80(),
            lon_0: 9f64.to_radians(),
            lat_0: 0.0,
            lat_1: 0.0,
            lat_2: 0.0,
            lat_ts: 0.0,
            k0: 1.0,
            x_0: 0.0,
            y_0: 0.0,
            alpha: 0.0,
            gamma: 0.0,
        }
    }

    #[test]
    fn round_trip() {
        let g = Gstmerc::setup(params()).unwrap();
        let p0 = (10.5f64.to_radians(), 45f64.to_radians());
        let (x, y) = g.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = g.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-8);
    }
}
