//!
//! Geographic ↔ geocentric conversion
//!
//! Ported from the Hannover iterative algorithm (Institut für Erdmessung,
//! University of Hannover, 1988) used throughout PROJ-family libraries.
//!

use crate::error::{Error, Result};

const GENAU: f64 = 1.0e-12;
const GENAU2: f64 = GENAU * GENAU;
const MAX_ITER: usize = 30;
const FRAC_PI_2_EPS: f64 = 1.001 * std::f64::consts::FRAC_PI_2;

/// `(lon, lat, height)` -> `(x, y, z)` on an ellipsoid of semimajor axis
/// `a` and eccentricity squared `es`.
pub fn geodetic_to_geocentric(lon: f64, lat: f64, height: f64, a: f64, es: f64) -> Result<(f64, f64, f64)> {
    let mut lon = lon;
    let mut lat = lat;

    if lat < -std::f64::consts::FRAC_PI_2 && lat > -FRAC_PI_2_EPS {
        lat = -std::f64::consts::FRAC_PI_2;
    } else if lat > std::f64::consts::FRAC_PI_2 && lat < FRAC_PI_2_EPS {
        lat = std::f64::consts::FRAC_PI_2;
    } else if !(-std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2).contains(&lat) {
        return Err(Error::LatitudeOutOfRange);
    }

    if lon > std::f64::consts::PI {
        lon -= std::f64::consts::TAU;
    }

    let sin_lat = lat.sin();
    let rn = a / (1. - es * sin_lat * sin_lat).sqrt();
    let cos_lat = lat.cos();

    Ok((
        (rn + height) * cos_lat * lon.cos(),
        (rn + height) * cos_lat * lon.sin(),
        (rn * (1. - es) + height) * sin_lat,
    ))
}

/// `(x, y, z)` -> `(lon, lat, height)`, the inverse of
/// [`geodetic_to_geocentric`].
pub fn geocentric_to_geodetic(x: f64, y: f64, z: f64, a: f64, es: f64, b: f64) -> Result<(f64, f64, f64)> {
    let d2 = x * x + y * y;
    let p = d2.sqrt();
    let rr = (d2 + z * z).sqrt();

    let lon = if p / a < GENAU {
        if rr / a < GENAU {
            return Ok((0., std::f64::consts::FRAC_PI_2, -b));
        }
        0.
    } else {
        y.atan2(x)
    };

    let ct = z / rr;
    let st = p / rr;
    let mut rx = 1.0 / (1.0 - es * (2.0 - es) * st * st).sqrt();
    let mut cphi0 = st * (1.0 - es) * rx;
    let mut sphi0 = ct * rx;
    let (mut rk, mut rn, mut cphi, mut sphi, mut sdphi, mut height);

    let mut iter = 0;
    loop {
        iter += 1;
        rn = a / (1.0 - es * sphi0 * sphi0).sqrt();
        height = p * cphi0 + z * sphi0 - rn * (1.0 - es * sphi0 * sphi0);

        rk = es * rn / (rn + height);
        rx = 1.0 / (1.0 - rk * (2.0 - rk) * st * st).sqrt();
        cphi = st * (1.0 - rk) * rx;
        sphi = ct * rx;
        sdphi = sphi * cphi0 - cphi * sphi0;
        cphi0 = cphi;
        sphi0 = sphi;

        if sdphi * sdphi <= GENAU2 || iter >= MAX_ITER {
            break;
        }
    }

    if iter >= MAX_ITER {
        return Err(Error::IterationDiverged {
            op: "geocentric_to_geodetic",
            iterations: MAX_ITER,
        });
    }

    Ok((lon, (sphi / cphi.abs()).atan(), height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const WGS84_A: f64 = 6378137.0;
    const WGS84_ES: f64 = 0.0066943799901413165;
    const WGS84_B: f64 = 6356752.314245179;

    #[test]
    fn round_trip() {
        for (lon_d, lat_d, h) in [(2.3522, 48.8566, 35.0), (-74.0, 40.7, 10.0), (0.0, 0.0, 0.0)] {
            let (lon, lat) = (lon_d.to_radians(), lat_d.to_radians());
            let (x, y, z) = geodetic_to_geocentric(lon, lat, h, WGS84_A, WGS84_ES).unwrap();
            let (lon2, lat2, h2) = geocentric_to_geodetic(x, y, z, WGS84_A, WGS84_ES, WGS84_B).unwrap();
            assert_abs_diff_eq!(lon2, lon, epsilon = 1e-9);
            assert_abs_diff_eq!(lat2, lat, epsilon = 1e-9);
            assert_abs_diff_eq!(h2, h, epsilon = 1e-6);
        }
    }

    #[test]
    fn out_of_range_latitude_errors() {
        assert!(geodetic_to_geocentric(0.0, 2.0, 0.0, WGS84_A, WGS84_ES).is_err());
    }
}
