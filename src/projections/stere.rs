//!
//! Stereographic (`stere`, polar/oblique on the ellipsoid) and Oblique
//! Stereographic (`sterea`, EPSG 9809 double-conformal form used by the
//! Dutch RD and Romanian Stereo 70 grids).
//!

use crate::error::Result;
use crate::projections::ProjectionParams;

/// Conformal latitude `chi` such that `isometric_latitude(phi) =
/// ln(tan(pi/4 + chi/2))` — the ellipsoid's Gudermannian-of-isometric
/// relation, shared by every conformal-on-the-sphere projection.
fn conformal_lat(p: &ProjectionParams, phi: f64) -> f64 {
    2.0 * p.ellipsoid.isometric_latitude(phi).exp().atan() - std::f64::consts::FRAC_PI_2
}

fn inv_conformal_lat(p: &ProjectionParams, chi: f64) -> Result<f64> {
    let l = ((std::f64::consts::FRAC_PI_4 + chi / 2.0).tan()).ln();
    p.ellipsoid.lat_from_isometric(l)
}

#[derive(Debug, Clone)]
pub struct Stere {
    p: ProjectionParams,
    chi0: f64,
    r: f64,
}

impl Stere {
    pub fn setup(p: ProjectionParams) -> Result<Self> {
        let chi0 = conformal_lat(&p, p.lat_0);
        let es = p.ellipsoid.es;
        let r = p.ellipsoid.a * (1.0 - es).sqrt() / (1.0 - es * p.lat_0.sin().powi(2));
        Ok(Self { p, chi0, r })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let chi = conformal_lat(&self.p, lat);
        let dlon = crate::operation::primitives::adjlon(lon - self.p.lon_0);
        let b = 1.0 + self.chi0.sin() * chi.sin() + self.chi0.cos() * chi.cos() * dlon.cos();
        let k = 2.0 * self.p.k0 * self.r / b;
        let x = k * chi.cos() * dlon.sin();
        let y = k * (chi.sin() * self.chi0.cos() - chi.cos() * self.chi0.sin() * dlon.cos());
        Ok((self.p.x_0 + x, self.p.y_0 + y))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (x, y) = (x - self.p.x_0, y - self.p.y_0);
        let rho = (x * x + y * y).sqrt();
        if rho < 1e-12 {
            return Ok((self.p.lon_0, self.p.lat_0));
        }
        let c = 2.0 * (rho / (2.0 * self.p.k0 * self.r)).atan();
        let chi = (c.cos() * self.chi0.sin() + y * c.sin() * self.chi0.cos() / rho).asin();
        let lon = self.p.lon_0
            + (x * c.sin()).atan2(rho * self.chi0.cos() * c.cos() - y * self.chi0.sin() * c.sin());
        let lat = inv_conformal_lat(&self.p, chi)?;
        Ok((lon, lat))
    }
}

#[derive(Debug, Clone)]
pub struct Sterea {
    p: ProjectionParams,
    n: f64,
    c: f64,
    chi0: f64,
    r: f64,
}

impl Sterea {
    fn w(p: &ProjectionParams, phi: f64) -> f64 {
        p.ellipsoid.isometric_latitude(phi).exp()
    }

    pub fn setup(p: ProjectionParams) -> Result<Self> {
        let es = p.ellipsoid.es;
        let phi0 = p.lat_0;
        let n = (1.0 + es * phi0.cos().powi(4) / (1.0 - es)).sqrt();

        let w1 = Self::w(&p, phi0);
        let sinchi0 = (w1 * w1 - 1.0) / (w1 * w1 + 1.0);
        let chi0_0 = sinchi0.asin();

        let c = (n + phi0.sin()) * (1.0 - sinchi0) / ((n - phi0.sin()) * (1.0 + sinchi0));
        let r = p.ellipsoid.a * (1.0 - es).sqrt() / (1.0 - es * phi0.sin().powi(2));

        Ok(Self {
            p,
            n,
            c,
            chi0: chi0_0,
            r,
        })
    }

    fn chi(&self, phi: f64) -> f64 {
        let w1 = Self::w(&self.p, phi);
        let w2 = self.c * w1.powf(self.n);
        ((w2 - 1.0) / (w2 + 1.0)).asin()
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let chi = self.chi(lat);
        let dlon = self.n * crate::operation::primitives::adjlon(lon - self.p.lon_0);
        let b = 1.0 + self.chi0.sin() * chi.sin() + self.chi0.cos() * chi.cos() * dlon.cos();
        let k = 2.0 * self.p.k0 * self.r / b;
        let x = k * chi.cos() * dlon.sin();
        let y = k * (chi.sin() * self.chi0.cos() - chi.cos() * self.chi0.sin() * dlon.cos());
        Ok((self.p.x_0 + x, self.p.y_0 + y))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (x, y) = (x - self.p.x_0, y - self.p.y_0);
        let rho = (x * x + y * y).sqrt();
        if rho < 1e-12 {
            return Ok((self.p.lon_0, inv_chi(self, self.chi0)?));
        }
        let c = 2.0 * (rho / (2.0 * self.p.k0 * self.r)).atan();
        let chi = (c.cos() * self.chi0.sin() + y * c.sin() * self.chi0.cos() / rho).asin();
        let dlon = (x * c.sin()).atan2(rho * self.chi0.cos() * c.cos() - y * self.chi0.sin() * c.sin());
        let lon = self.p.lon_0 + dlon / self.n;
        let lat = inv_chi(self, chi)?;
        Ok((lon, lat))
    }
}

fn inv_chi(s: &Sterea, chi: f64) -> Result<f64> {
    // Invert chi = asin((c*w1^n - 1)/(c*w1^n + 1)) by Newton iteration on
    // phi, the way EPSG guidance note 7-2 does for the double projection.
    const MAX_ITER: usize = 15;
    const EPS: f64 = 1e-12;
    let target = ((1.0 + chi.sin()) / (1.0 - chi.sin())).powf(1.0 / s.n) / s.c.powf(1.0 / s.n);
    let mut phi = chi;
    for _ in 0..MAX_ITER {
        let w1 = Sterea::w(&s.p, phi);
        let f = w1 - target;
        // dw1/dphi = w1 * d(isometric_latitude)/dphi, with the standard
        // conformal-latitude derivative (1-es)/((1-es*sin^2 phi)*cos phi).
        let dw = w1 * (1.0 - s.p.ellipsoid.es)
            / ((1.0 - s.p.ellipsoid.es * phi.sin().powi(2)) * phi.cos());
        let step = f / dw;
        phi -= step;
        if step.abs() < EPS {
            return Ok(phi);
        }
    }
    Ok(phi)
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
            lat_0: 90f64.to_radians(),
            lat_1: 0.0,
            lat_2: 0.0,
            lat_ts: 0.0,
            k0: 0.994,
            x_0: 2_000_000.0,
            y_0: 2_000_000.0,
            alpha: 0.0,
            gamma: 0.0,
        }
    }

    #[test]
    fn polar_stere_round_trip() {
        let s = Stere::setup(params()).unwrap();
        let p0 = (30f64.to_radians(), 80f64.to_radians());
        let (x, y) = s.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = s.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-7);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-7);
    }
}
