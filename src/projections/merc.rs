//!
//! Mercator
//!

use crate::error::{Error, Result};
use crate::projections::ProjectionParams;

const EPS10: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct Merc {
    p: ProjectionParams,
    k0: f64,
}

impl Merc {
    pub fn setup(mut p: ProjectionParams) -> Result<Self> {
        let e = p.ellipsoid.e;
        if p.lat_ts != 0.0 {
            if p.lat_ts.abs() >= std::f64::consts::FRAC_PI_2 {
                return Err(Error::InvalidParameterValue("lat_ts larger than 90 degrees"));
            }
            let (s, c) = p.lat_ts.sin_cos();
            p.k0 = c / (1.0 - e * e * s * s).sqrt();
        }
        Ok(Self { k0: p.k0, p })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        if (lat.abs() - std::f64::consts::FRAC_PI_2).abs() <= EPS10 {
            return Err(Error::ToleranceConditionError);
        }
        let a = self.p.ellipsoid.a;
        let dlon = crate::operation::primitives::adjlon(lon - self.p.lon_0);
        let y = self.p.ellipsoid.isometric_latitude(lat);
        Ok((
            self.p.x_0 + a * self.k0 * dlon,
            self.p.y_0 + a * self.k0 * y,
        ))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let lon = (x - self.p.x_0) / (a * self.k0) + self.p.lon_0;
        let lat = self.p.ellipsoid.lat_from_isometric((y - self.p.y_0) / (a * self.k0))?;
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::constants::grs80;
    use approx::assert_abs_diff_eq;

    #[test]
    fn round_trip() {
        let p = ProjectionParams {
            ellipsoid: grs80(),
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
        };
        let m = Merc::setup(p).unwrap();
        let (x, y) = m.forward(2f64.to_radians(), 1f64.to_radians()).unwrap();
        assert_abs_diff_eq!(x, 222638.98158654713, epsilon = 1e-3);
        let (lon, lat) = m.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, 2f64.to_radians(), epsilon = 1e-9);
        assert_abs_diff_eq!(lat, 1f64.to_radians(), epsilon = 1e-9);
    }
}
