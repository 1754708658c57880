//!
//! Miller Cylindrical
//!
//! A fixed spherical reprojection regardless of the source ellipsoid's
//! flattening (`a` is the only ellipsoid parameter used).
//!

use crate::error::Result;
use crate::projections::ProjectionParams;

#[derive(Debug, Clone)]
pub struct Mill {
    p: ProjectionParams,
}

impl Mill {
    pub fn setup(p: ProjectionParams) -> Result<Self> {
        Ok(Self { p })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let dlon = crate::operation::primitives::adjlon(lon - self.p.lon_0);
        let y = (std::f64::consts::FRAC_PI_4 + lat * 0.4).tan().ln() * 1.25;
        Ok((self.p.x_0 + a * dlon, self.p.y_0 + a * y))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let lon = (x - self.p.x_0) / a + self.p.lon_0;
        let lat = (((y - self.p.y_0) / a / 1.25).exp().atan() - std::f64::consts::FRAC_PI_4) / 0.4;
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
    fn round_trip() {
        let m = Mill::setup(params()).unwrap();
        let p0 = (-30f64.to_radians(), 55f64.to_radians());
        let (x, y) = m.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = m.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-9);
    }
}
