//!
//! Lambert Azimuthal Equal Area, ellipsoidal oblique/polar/equatorial
//! forms (Snyder eq. 25-1 through 25-9, authalic-latitude substitution).
//!

use crate::error::Result;
use crate::projections::ProjectionParams;

const EPS10: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct Laea {
    p: ProjectionParams,
    mode: ModeStorage,
    qp: f64,
    beta0: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ModeStorage {
    NorthPole,
    SouthPole,
    Equatorial,
    Oblique,
}

fn qfn(p: &ProjectionParams, phi: f64) -> f64 {
    let e = p.ellipsoid.e;
    if e < 1e-10 {
        return 2.0 * phi.sin();
    }
    let s = phi.sin();
    (1.0 - e * e) * (s / (1.0 - e * e * s * s) - (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln())
}

fn beta_of(p: &ProjectionParams, phi: f64, qp: f64) -> f64 {
    (qfn(p, phi) / qp).clamp(-1.0, 1.0).asin()
}

impl Laea {
    pub fn setup(p: ProjectionParams) -> Result<Self> {
        let mode = if (p.lat_0 - std::f64::consts::FRAC_PI_2).abs() < EPS10 {
            ModeStorage::NorthPole
        } else if (p.lat_0 + std::f64::consts::FRAC_PI_2).abs() < EPS10 {
            ModeStorage::SouthPole
        } else if p.lat_0.abs() < EPS10 {
            ModeStorage::Equatorial
        } else {
            ModeStorage::Oblique
        };

        let qp = qfn(&p, std::f64::consts::FRAC_PI_2);
        let beta0 = beta_of(&p, p.lat_0, qp);
        Ok(Self {
            p,
            mode,
            qp,
            beta0,
        })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let dlon = crate::operation::primitives::adjlon(lon - self.p.lon_0);
        let beta = beta_of(&self.p, lat, self.qp);

        let (x, y) = match self.mode {
            ModeStorage::NorthPole | ModeStorage::SouthPole => {
                let q = qfn(&self.p, lat);
                let r = if self.mode == ModeStorage::NorthPole {
                    a * (self.qp - q).max(0.0).sqrt()
                } else {
                    a * (self.qp + q).max(0.0).sqrt()
                };
                if self.mode == ModeStorage::NorthPole {
                    (r * dlon.sin(), -r * dlon.cos())
                } else {
                    (r * dlon.sin(), r * dlon.cos())
                }
            }
            ModeStorage::Equatorial => {
                let den = 1.0 + beta.cos() * dlon.cos();
                let b = a * (2.0 / den.max(1e-12)).sqrt();
                (b * beta.cos() * dlon.sin(), b * beta.sin())
            }
            ModeStorage::Oblique => {
                let den = 1.0 + self.beta0.sin() * beta.sin() + self.beta0.cos() * beta.cos() * dlon.cos();
                let b = a * (2.0 / den.max(1e-12)).sqrt();
                (
                    b * beta.cos() * dlon.sin(),
                    b * (self.beta0.cos() * beta.sin() - self.beta0.sin() * beta.cos() * dlon.cos()),
                )
            }
        };
        Ok((self.p.x_0 + x, self.p.y_0 + y))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let (x, y) = (x - self.p.x_0, y - self.p.y_0);
        let rho = (x * x + y * y).sqrt();
        if rho < 1e-12 {
            return Ok((self.p.lon_0, self.p.lat_0));
        }

        let (beta, lon) = match self.mode {
            ModeStorage::NorthPole | ModeStorage::SouthPole => {
                let q = if self.mode == ModeStorage::NorthPole {
                    self.qp - rho * rho / (a * a)
                } else {
                    rho * rho / (a * a) - self.qp
                };
                let beta = (q / self.qp).clamp(-1.0, 1.0).asin();
                let lon = if self.mode == ModeStorage::NorthPole {
                    self.p.lon_0 + x.atan2(-y)
                } else {
                    self.p.lon_0 + x.atan2(y)
                };
                (beta, lon)
            }
            ModeStorage::Equatorial | ModeStorage::Oblique => {
                let ce = 2.0 * (rho / (a * 2f64.sqrt())).asin();
                let beta = (ce.cos() * self.beta0.sin() + y * ce.sin() * self.beta0.cos() / rho).asin();
                let lon = self.p.lon_0
                    + (x * ce.sin()).atan2(rho * self.beta0.cos() * ce.cos() - y * self.beta0.sin() * ce.sin());
                (beta, lon)
            }
        };

        let lat = authalic_to_geodetic(&self.p, beta);
        Ok((lon, lat))
    }
}

fn authalic_to_geodetic(p: &ProjectionParams, beta: f64) -> f64 {
    let es = p.ellipsoid.es;
    let c1 = es / 3.0 + 31.0 * es * es / 180.0 + 517.0 * es * es * es / 5040.0;
    let c2 = 23.0 * es * es / 360.0 + 251.0 * es * es * es / 3780.0;
    let c3 = 761.0 * es * es * es / 45360.0;
    beta + c1 * (2.0 * beta).sin() + c2 * (4.0 * beta).sin() + c3 * (6.0 * beta).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::constants::wgs84;
    use approx::assert_abs_diff_eq;

    fn params(lat_0: f64) -> ProjectionParams {
        ProjectionParams {
            ellipsoid: wgs84(),
            lon_0: 10f64.to_radians(),
            lat_0,
            lat_1: 0.0,
            lat_2: 0.0,
            lat_ts: 0.0,
            k0: 1.0,
            x_0: 4_321_000.0,
            y_0: 3_210_000.0,
            alpha: 0.0,
            gamma: 0.0,
        }
    }

    #[test]
    fn oblique_round_trip() {
        let l = Laea::setup(params(52f64.to_radians())).unwrap();
        let p0 = (8f64.to_radians(), 50f64.to_radians());
        let (x, y) = l.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = l.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-6);
    }

    #[test]
    fn polar_round_trip() {
        let l = Laea::setup(params(90f64.to_radians())).unwrap();
        let p0 = (30f64.to_radians(), 70f64.to_radians());
        let (x, y) = l.forward(p0.0, p0.1).unwrap();
        let (lon, lat) = l.inverse(x, y).unwrap();
        assert_abs_diff_eq!(lon, p0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lat, p0.1, epsilon = 1e-6);
    }
}
