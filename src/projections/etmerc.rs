//!
//! Transverse Mercator (`tmerc`/`etmerc`) and UTM
//!
//! Snyder's ellipsoidal transverse Mercator series (*Map Projections: A
//! Working Manual*, eq. 8-9 through 8-11 / 8-17 through 8-21), built on
//! the [`crate::ellipsoid::Ellipsoid`] meridian-arc series.
//!

use crate::error::{Error, Result};
use crate::parameter_map::ParameterMap;
use crate::projections::ProjectionParams;

#[derive(Debug, Clone)]
pub struct Tmerc {
    p: ProjectionParams,
    ep2: f64,
    m0: f64,
}

impl Tmerc {
    pub fn setup(p: ProjectionParams) -> Result<Self> {
        let ep2 = p.ellipsoid.es / (1.0 - p.ellipsoid.es);
        let m0 = p.ellipsoid.meridian_arc(p.lat_0);
        Ok(Self { p, ep2, m0 })
    }

    pub fn setup_utm(mut p: ProjectionParams, params: &dyn ParameterMap) -> Result<Self> {
        let zone = params
            .try_i32("zone")?
            .ok_or_else(|| Error::NoValueParameter("zone".into()))?;
        if !(1..=60).contains(&zone) {
            return Err(Error::InvalidParameterValue("utm zone must be in 1..=60"));
        }
        let south = params.check_option("south")?;
        p.lon_0 = ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians();
        p.lat_0 = 0.0;
        p.k0 = 0.9996;
        p.x_0 = 500_000.0;
        p.y_0 = if south { 10_000_000.0 } else { 0.0 };
        Self::setup(p)
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let e = &self.p.ellipsoid;
        let a = e.a;
        let dlon = crate::operation::primitives::adjlon(lon - self.p.lon_0);

        let (sphi, cphi) = lat.sin_cos();
        let t = (lat.tan()).powi(2);
        let c = self.ep2 * cphi * cphi;
        let n = e.transverse_radius(lat);
        let aa = dlon * cphi;
        let aa2 = aa * aa;
        let aa3 = aa2 * aa;
        let aa4 = aa3 * aa;
        let aa5 = aa4 * aa;
        let aa6 = aa5 * aa;

        let m = a * e.meridian_arc(lat);

        let x = self.p.k0
            * n
            * (aa + (1.0 - t + c) * aa3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * aa5 / 120.0);

        let y = self.p.k0
            * (m - self.m0
                + n * lat.tan()
                    * (aa2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * aa4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2) * aa6 / 720.0));

        let _ = sphi;
        Ok((self.p.x_0 + x, self.p.y_0 + y))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let e = &self.p.ellipsoid;
        let a = e.a;
        let m1 = self.m0 + (y - self.p.y_0) / self.p.k0;
        let phi1 = e.lat_from_arc(a * m1)?;

        let (sphi1, cphi1) = phi1.sin_cos();
        let t1 = (phi1.tan()).powi(2);
        let c1 = self.ep2 * cphi1 * cphi1;
        let n1 = e.transverse_radius(phi1);
        let r1 = e.meridional_radius(phi1);
        let d = (x - self.p.x_0) / (n1 * self.p.k0);
        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let lat = phi1
            - (n1 * phi1.tan() / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * self.ep2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * self.ep2
                        - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lon = self.p.lon_0
            + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * self.ep2 + 24.0 * t1 * t1)
                    * d5
                    / 120.0)
                / cphi1;

        let _ = sphi1;
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::constants::wgs84;
    use approx::assert_abs_diff_eq;

    fn params(lon_0: f64) -> ProjectionParams {
        ProjectionParams {
            ellipsoid: wgs84(),
            lon_0,
            lat_0: 0.0,
            lat_1: 0.0,
            lat_2: 0.0,
            lat_ts: 0.0,
            k0: 0.9996,
            x_0: 500_000.0,
            y_0: 0.0,
            alpha: 0.0,
            gamma: 0.0,
        }
    }

    #[test]
    fn utm_31n_round_trip() {
        let t = Tmerc::setup(params(3f64.to_radians())).unwrap();
        let p0 = (2.35f64.to_radians(), 48.85f64.to_radians());
        let (x, y) = t.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = t.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-8);
    }
}
