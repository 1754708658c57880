//!
//! Oblique Mercator on the Gauss conformal sphere.
//!
//! `Somerc` is the Swiss Oblique Mercator (Rosenmund projection, used by
//! CH1903/CH1903+): the ellipsoid is mapped conformally onto a sphere
//! centred at the projection origin, the sphere is rotated so the origin
//! sits on its equator, and an equatorial Mercator is applied. `Omerc`
//! generalises this with an extra in-plane rotation by the azimuth of
//! the central line, reducing to `Somerc` exactly when that azimuth is
//! 90° (the case `projections::mod` dispatches here for).
//!

use crate::error::Result;
use crate::projections::ProjectionParams;

#[derive(Debug, Clone)]
pub struct Somerc {
    p: ProjectionParams,
    c: f64,
    b0: f64,
    k: f64,
    r: f64,
    rotation: f64,
}

impl Somerc {
    fn setup_with_rotation(p: ProjectionParams, rotation: f64) -> Result<Self> {
        let es = p.ellipsoid.es;
        let lat0 = p.lat_0;

        let c = (1.0 + es * lat0.cos().powi(4) / (1.0 - es)).sqrt();
        let b0 = (lat0.sin() / c).asin();
        let sa0 = p.ellipsoid.isometric_latitude(lat0);
        let k = (std::f64::consts::FRAC_PI_4 + b0 / 2.0).tan().ln() - c * sa0;
        let r = p.ellipsoid.a * (1.0 - es).sqrt() / (1.0 - es * lat0.sin().powi(2));

        Ok(Self {
            p,
            c,
            b0,
            k,
            r,
            rotation,
        })
    }

    pub fn setup(p: ProjectionParams) -> Result<Self> {
        Self::setup_with_rotation(p, 0.0)
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let sa = self.p.ellipsoid.isometric_latitude(lat);
        let s = self.c * sa + self.k;
        let b = 2.0 * s.exp().atan() - std::f64::consts::FRAC_PI_2;
        let l = self.c * crate::operation::primitives::adjlon(lon - self.p.lon_0);

        let big_b = (self.b0.cos() * b.sin() - self.b0.sin() * b.cos() * l.cos()).asin();
        let big_l = (b.cos() * l.sin()).atan2(self.b0.sin() * b.sin() + self.b0.cos() * b.cos() * l.cos());

        let u = self.r * self.p.k0 * big_l;
        let v = self.r * self.p.k0 * (std::f64::consts::FRAC_PI_4 + big_b / 2.0).tan().ln();

        let (rs, rc) = self.rotation.sin_cos();
        let x = u * rc - v * rs;
        let y = u * rs + v * rc;
        Ok((self.p.x_0 + x, self.p.y_0 + y))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (dx, dy) = (x - self.p.x_0, y - self.p.y_0);
        let (rs, rc) = self.rotation.sin_cos();
        let u = dx * rc + dy * rs;
        let v = -dx * rs + dy * rc;

        let big_l = u / (self.r * self.p.k0);
        let big_b = 2.0 * (v / (self.r * self.p.k0)).exp().atan() - std::f64::consts::FRAC_PI_2;

        let b = (self.b0.cos() * big_b.sin() + self.b0.sin() * big_b.cos() * big_l.cos()).asin();
        let l = (big_b.cos() * big_l.sin())
            .atan2(self.b0.cos() * big_b.cos() * big_l.cos() - self.b0.sin() * big_b.sin());

        let lon = self.p.lon_0 + l / self.c;
        let s = (std::f64::consts::FRAC_PI_4 + b / 2.0).tan().ln();
        let sa = (s - self.k) / self.c;
        let lat = self.p.ellipsoid.lat_from_isometric(sa)?;
        Ok((lon, lat))
    }
}

#[derive(Debug, Clone)]
pub struct Omerc(Somerc);

impl Omerc {
    pub fn setup(p: ProjectionParams) -> Result<Self> {
        let rotation = p.gamma - std::f64::consts::FRAC_PI_2;
        Somerc::setup_with_rotation(p, rotation).map(Self)
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        self.0.forward(lon, lat)
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        self.0.inverse(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::constants::bessel;
    use approx::assert_abs_diff_eq;

    fn swiss_params() -> ProjectionParams {
        ProjectionParams {
            ellipsoid: bessel(),
            lon_0: 7.439583333333333f64.to_radians(),
            lat_0: 46.95240555555556f64.to_radians(),
            lat_1: 0.0,
            lat_2: 0.0,
            lat_ts: 0.0,
            k0: 1.0,
            x_0: 600_000.0,
            y_0: 200_000.0,
            alpha: std::f64::consts::FRAC_PI_2,
            gamma: std::f64::consts::FRAC_PI_2,
        }
    }

    #[test]
    fn origin_maps_near_false_origin() {
        let s = Somerc::setup(swiss_params()).unwrap();
        let p = swiss_params();
        let (x, y) = s.forward(p.lon_0, p.lat_0).unwrap();
        assert_abs_diff_eq!(x, 600_000.0, epsilon = 1.0);
        assert_abs_diff_eq!(y, 200_000.0, epsilon = 1.0);
    }

    #[test]
    fn round_trip() {
        let s = Somerc::setup(swiss_params()).unwrap();
        let p0 = (8.2f64.to_radians(), 47.3f64.to_radians());
        let (x, y) = s.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = s.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-8);
    }

    #[test]
    fn omerc_round_trip() {
        let mut p = swiss_params();
        p.alpha = 60f64.to_radians();
        p.gamma = 60f64.to_radians();
        let o = Omerc::setup(p).unwrap();
        let p0 = (8.2f64.to_radians(), 47.3f64.to_radians());
        let (x, y) = o.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = o.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-8);
    }
}
