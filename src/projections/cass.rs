//!
//! Cassini (transverse equidistant), ellipsoidal form
//!
//! Snyder's *Map Projections: A Working Manual* eq. 14-9 forward and the
//! rectifying-latitude-based eq. 14-11 inverse, on the ellipsoid's
//! meridian-arc series.
//!

use crate::error::Result;
use crate::projections::ProjectionParams;

#[derive(Debug, Clone)]
pub struct Cass {
    p: ProjectionParams,
    m0: f64,
}

impl Cass {
    pub fn setup(p: ProjectionParams) -> Result<Self> {
        let m0 = p.ellipsoid.meridian_arc(p.lat_0);
        Ok(Self { p, m0 })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let e = &self.p.ellipsoid;
        let a = e.a;
        let dlon = crate::operation::primitives::adjlon(lon - self.p.lon_0);

        let n = e.transverse_radius(lat);
        let t = lat.tan().powi(2);
        let a1 = dlon * lat.cos();
        let a2 = a1 * a1;
        let a3 = a2 * a1;
        let a4 = a3 * a1;
        let c = e.es / (1.0 - e.es) * lat.cos().powi(2);
        let m = a * e.meridian_arc(lat);

        let x = n * (a1 - t * a3 / 6.0 - (8.0 - t + 8.0 * c) * t * a4 * a1 / 120.0);
        let y = a * (m / a - self.m0) + n * lat.tan() * a2 / 2.0
            + n * lat.tan() * (5.0 - t + 6.0 * c) * a4 / 24.0;

        Ok((self.p.x_0 + x, self.p.y_0 + y))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let e = &self.p.ellipsoid;
        let a = e.a;
        let (x, y) = (x - self.p.x_0, y - self.p.y_0);

        let m1 = self.m0 + y / a;
        let phi1 = e.lat_from_arc(a * m1)?;

        let t1 = phi1.tan().powi(2);
        let n1 = e.transverse_radius(phi1);
        let r1 = e.meridional_radius(phi1);
        let d = x / n1;
        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;

        let lat = phi1 - (n1 * phi1.tan() / r1) * (d2 / 2.0 - (1.0 + 3.0 * t1) * d4 / 24.0);
        let lon = self.p.lon_0 + (d - t1 * d3 / 3.0 + (1.0 + 3.0 * t1) * t1 * d4 * d / 15.0) / phi1.cos();

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
            lon_0: 2f64.to_radians(),
            lat_0: 48f64.to_radians(),
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
        let c = Cass::setup(params()).unwrap();
        let p0 = (2.35f64.to_radians(), 48.85f64.to_radians());
        let (x, y) = c.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = c.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-8);
    }
}
