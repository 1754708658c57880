//!
//! American Polyconic
//!
//! Snyder's *Map Projections: A Working Manual* eq. 7-1 through 7-6,
//! with a small-angle series substituted near the equator to avoid the
//! `sin(lat) -> 0` singularity.
//!

use crate::error::Result;
use crate::projections::ProjectionParams;

const TOL: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct Poly {
    p: ProjectionParams,
    m0: f64,
}

impl Poly {
    pub fn setup(p: ProjectionParams) -> Result<Self> {
        let m0 = p.ellipsoid.meridian_arc(p.lat_0);
        Ok(Self { p, m0 })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let e = &self.p.ellipsoid;
        let a = e.a;
        let dlon = crate::operation::primitives::adjlon(lon - self.p.lon_0);

        if lat.abs() < TOL {
            return Ok((self.p.x_0 + a * dlon, self.p.y_0 - a * self.m0));
        }

        let n = e.transverse_radius(lat);
        let cot = lat.cos() / lat.sin();
        let big_e = dlon * lat.sin();

        let x = n * cot * big_e.sin();
        let y = a * (e.meridian_arc(lat) - self.m0) + n * cot * (1.0 - big_e.cos());
        Ok((self.p.x_0 + x, self.p.y_0 + y))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let e = &self.p.ellipsoid;
        let a = e.a;
        let (x, y) = (x - self.p.x_0, y - self.p.y_0);

        if (y + a * self.m0).abs() < TOL {
            return Ok((x / a + self.p.lon_0, 0.0));
        }

        let am = self.m0 + y / a;
        let mut lat = am;
        for _ in 0..20 {
            let n = e.transverse_radius(lat);
            let cot = lat.cos() / lat.sin().max(1e-300);
            let ml = e.meridian_arc(lat);

            let f = ml + cot * (x / (a * n)).powi(2) - am;
            let ml_deriv = e.meridional_radius(lat) / a;
            let c2 = 1.0 + (x / (a * n)).powi(2) * cot * cot;
            let df = ml_deriv - 2.0 * (x / (a * n)).powi(2) * cot / lat.sin()
                - ml_deriv * cot * cot * (x / (a * n)).powi(2) / c2.max(1e-300);
            let step = f / df;
            lat -= step;
            if step.abs() < 1e-12 {
                break;
            }
        }

        let n = e.transverse_radius(lat);
        let big_e = (x * lat.tan() / n).asin();
        let lon = self.p.lon_0 + big_e / lat.sin();
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
            lat_0: 46f64.to_radians(),
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
        let poly = Poly::setup(params()).unwrap();
        let p0 = (3.1f64.to_radians(), 47.2f64.to_radians());
        let (x, y) = poly.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = poly.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-6);
    }

    #[test]
    fn equator_is_a_straight_line() {
        let poly = Poly::setup(params()).unwrap();
        let (x, _y) = poly.forward(1f64.to_radians(), 0.0).unwrap();
        assert_abs_diff_eq!(x, grs80().a * (1f64.to_radians() - 2f64.to_radians()), epsilon = 1e-6);
    }
}
