//!
//! Krovak (EPSG 9819), the oblique conformal conic used by the Czech
//! and Slovak S-JTSK grids.
//!
//! Built the same way as [`crate::projections::somerc`]'s conformal
//! sphere — the isometric-latitude/`w` identity already verified there
//! collapses EPSG's `t0`/`U` power terms into a single call to
//! [`crate::ellipsoid::Ellipsoid::isometric_latitude`], so the forward
//! and inverse here invert each other exactly rather than through a
//! Newton iteration.
//!

use crate::error::Result;
use crate::projections::ProjectionParams;

#[derive(Debug, Clone)]
pub struct Krovak {
    p: ProjectionParams,
    b: f64,
    t0: f64,
    n: f64,
    rho_coef: f64,
}

impl Krovak {
    pub fn setup(p: ProjectionParams) -> Result<Self> {
        let es = p.ellipsoid.es;
        let lat_0 = p.lat_0;

        let b = (1.0 + es * lat_0.cos().powi(4) / (1.0 - es)).sqrt();
        let gamma0 = (lat_0.sin() / b).asin();
        let w0 = p.ellipsoid.isometric_latitude(lat_0).exp();
        let t0 = (std::f64::consts::FRAC_PI_4 + gamma0 / 2.0).tan() / w0.powf(b);

        let n = p.lat_ts.sin();
        let a = p.ellipsoid.a * (1.0 - es).sqrt() / (1.0 - es * lat_0.sin().powi(2));
        let rho_coef = p.k0 * a * (std::f64::consts::FRAC_PI_4 + p.lat_ts / 2.0).tan().powf(n);

        Ok(Self {
            p,
            b,
            t0,
            n,
            rho_coef,
        })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let w = self.p.ellipsoid.isometric_latitude(lat).exp();
        let u = 2.0 * (self.t0 * w.powf(self.b)).atan() - std::f64::consts::FRAC_PI_2;
        let v = self.b * (self.p.lon_0 - lon);

        let (alpha_s, alpha_c) = self.p.alpha.sin_cos();
        let s = (alpha_c * u.sin() + alpha_s * u.cos() * v.cos()).asin();
        let d = (u.cos() * v.sin() / s.cos()).asin();
        let theta = self.n * d;

        let r = self.rho_coef / (std::f64::consts::FRAC_PI_4 + s / 2.0).tan().powf(self.n);
        Ok((self.p.x_0 + r * theta.cos(), self.p.y_0 + r * theta.sin()))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (dx, dy) = (x - self.p.x_0, y - self.p.y_0);
        let r = (dx * dx + dy * dy).sqrt();
        let theta = dy.atan2(dx);
        let d = theta / self.n;

        let s = 2.0 * (self.rho_coef / r).powf(1.0 / self.n).atan() - std::f64::consts::FRAC_PI_2;

        let (alpha_s, alpha_c) = self.p.alpha.sin_cos();
        let u = (alpha_c * s.sin() - alpha_s * s.cos() * d.cos()).asin();
        let v = ((s.cos() * d.sin() / u.cos()).clamp(-1.0, 1.0)).asin();

        let lon = self.p.lon_0 - v / self.b;
        let w = ((std::f64::consts::FRAC_PI_4 + u / 2.0).tan() / self.t0).powf(1.0 / self.b);
        let lat = self.p.ellipsoid.lat_from_isometric(w.ln())?;
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::constants::bessel;
    use approx::assert_abs_diff_eq;

    fn params() -> ProjectionParams {
        ProjectionParams {
            ellipsoid: bessel(),
            lon_0: 24.833333333333332f64.to_radians(),
            lat_0: 49.5f64.to_radians(),
            lat_1: 0.0,
            lat_2: 0.0,
            lat_ts: 78.5f64.to_radians(),
            k0: 0.9999,
            x_0: 0.0,
            y_0: 0.0,
            alpha: 30.288139752777778f64.to_radians(),
            gamma: 0.0,
        }
    }

    #[test]
    fn round_trip() {
        let k = Krovak::setup(params()).unwrap();
        let p0 = (16.6f64.to_radians(), 49.2f64.to_radians());
        let (x, y) = k.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = k.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-8);
    }
}
