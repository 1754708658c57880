//!
//! Equidistant Cylindrical (Plate Carrée)
//!
//! Always projected on the auxiliary sphere of radius `a`.
//!

use crate::error::{Error, Result};
use crate::projections::ProjectionParams;

#[derive(Debug, Clone)]
pub struct Eqc {
    p: ProjectionParams,
    rc: f64,
}

impl Eqc {
    pub fn setup(p: ProjectionParams) -> Result<Self> {
        let rc = p.lat_ts.cos();
        if rc <= 0.0 {
            return Err(Error::InvalidParameterValue("lat_ts should be <= 90 degrees"));
        }
        Ok(Self { p, rc })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let dlon = crate::operation::primitives::adjlon(lon - self.p.lon_0);
        Ok((
            self.p.x_0 + a * dlon * self.rc,
            self.p.y_0 + a * (lat - self.p.lat_0),
        ))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let lon = (x - self.p.x_0) / (a * self.rc) + self.p.lon_0;
        let lat = (y - self.p.y_0) / a + self.p.lat_0;
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::constants::wgs84;
    use approx::assert_abs_diff_eq;

    fn params() -> ProjectionParams {
        ProjectionParams {
            ellipsoid: wgs84(),
            lon_0: 0.0,
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
    fn known_value() {
        let e = Eqc::setup(params()).unwrap();
        let (x, y) = e.forward(2f64.to_radians(), 47f64.to_radians()).unwrap();
        assert_abs_diff_eq!(x, 222638.98158654713, epsilon = 1e-3);
        assert_abs_diff_eq!(y, 5232016.06728385761, epsilon = 1e-3);
    }

    #[test]
    fn round_trip() {
        let e = Eqc::setup(params()).unwrap();
        let p0 = (-1.2, 0.6);
        let (x, y) = e.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = e.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-9);
    }
}
