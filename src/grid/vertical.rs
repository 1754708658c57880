//!
//! Altitude ↔ ellipsoidal height grids
//!
//! A thin wrapper around the same IGN ASCII bilinear interpolant, for
//! scalar (geoid undulation, single-component) grids.
//!

use crate::error::Result;
use crate::grid::ign::IgnGrid;

/// A single-component vertical offset grid (e.g. a geoid undulation
/// model).
pub struct VerticalGrid(IgnGrid);

impl VerticalGrid {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self(IgnGrid::parse(text)?))
    }

    /// Geoid undulation (or other scalar vertical offset) at `(lon, lat)`.
    pub fn undulation(&self, lon: f64, lat: f64) -> Result<f64> {
        Ok(self.0.interpolate(lon, lat)?[0])
    }

    /// Ellipsoidal height from an orthometric altitude: `h = H + N`.
    pub fn altitude_to_ellipsoidal_height(&self, lon: f64, lat: f64, altitude: f64) -> Result<f64> {
        Ok(altitude + self.undulation(lon, lat)?)
    }

    /// Orthometric altitude from an ellipsoidal height: `H = h - N`.
    pub fn ellipsoidal_height_to_altitude(&self, lon: f64, lat: f64, height: f64) -> Result<f64> {
        Ok(height - self.undulation(lon, lat)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY: &str = "\
HDR 0.0 1.0 0.0 1.0 1.0 1.0 01 1
HDR2 INTERPOLATION BILINEAIRE
HDR3 PREC
0.0 0.0 40.0 99999
1.0 0.0 42.0 99999
0.0 1.0 44.0 99999
1.0 1.0 46.0 99999
";

    #[test]
    fn altitude_round_trip() {
        let g = VerticalGrid::parse(TOY).unwrap();
        let h = g.altitude_to_ellipsoidal_height(0.5, 0.5, 100.0).unwrap();
        let a = g.ellipsoidal_height_to_altitude(0.5, 0.5, h).unwrap();
        assert!((a - 100.0).abs() < 1e-9);
    }
}
