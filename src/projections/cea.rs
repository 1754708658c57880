//!
//! Cylindrical Equal Area, ellipsoidal form (Snyder eq. 10-1 through
//! 10-3 on the authalic-latitude series already shared with `laea`).
//!

use crate::error::{Error, Result};
use crate::projections::ProjectionParams;

#[derive(Debug, Clone)]
pub struct Cea {
    p: ProjectionParams,
    k: f64,
}

fn qfn(p: &ProjectionParams, phi: f64) -> f64 {
    let e = p.ellipsoid.e;
    if e < 1e-10 {
        return 2.0 * phi.sin();
    }
    let s = phi.sin();
    (1.0 - e * e) * (s / (1.0 - e * e * s * s) - (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln())
}

impl Cea {
    pub fn setup(p: ProjectionParams) -> Result<Self> {
        let es = p.ellipsoid.es;
        if p.lat_ts.abs() >= std::f64::consts::FRAC_PI_2 {
            return Err(Error::InvalidParameterValue("lat_ts larger than 90 degrees"));
        }
        let (s, c) = p.lat_ts.sin_cos();
        let k = c / (1.0 - es * s * s).sqrt();
        Ok(Self { p, k })
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let dlon = crate::operation::primitives::adjlon(lon - self.p.lon_0);
        let q = qfn(&self.p, lat);
        Ok((
            self.p.x_0 + a * self.k * dlon,
            self.p.y_0 + a * q / (2.0 * self.k),
        ))
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let a = self.p.ellipsoid.a;
        let lon = (x - self.p.x_0) / (a * self.k) + self.p.lon_0;
        let q = 2.0 * (y - self.p.y_0) * self.k / a;

        let e = self.p.ellipsoid.e;
        let lat = if e < 1e-10 {
            (q / 2.0).clamp(-1.0, 1.0).asin()
        } else {
            let mut phi = (q / 2.0).clamp(-1.0, 1.0).asin();
            for _ in 0..15 {
                let s = phi.sin();
                let es2 = 1.0 - e * e * s * s;
                let f = es2 * es2 / (2.0 * phi.cos())
                    * (q / (1.0 - e * e) - s / es2
                        + (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln());
                phi += f;
                if f.abs() < 1e-12 {
                    break;
                }
            }
            phi
        };
        Ok((lon, lat))
    }
}
