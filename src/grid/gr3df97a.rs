//!
//! GR3DF97A: the French NTF↔RGF93 geocentric translation grid
//!
//! A single 3-component (dX, dY, dZ) IGN ASCII grid in geographic
//! coordinates (grad), shared by every NTF→RGF93 pipeline built in a
//! process; loaded once into a process-wide singleton.
//!

use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::grid::ign::IgnGrid;
use crate::operation::geocentric::{geocentric_to_geodetic, geodetic_to_geocentric};

static GRID: OnceLock<IgnGrid> = OnceLock::new();

/// Install the GR3DF97A grid from its textual content. Must be called
/// before the first [`shift_ntf_to_rgf93`]/[`shift_rgf93_to_ntf`] if the
/// default lookup path (embedding none; callers supply their own copy)
/// is used. Calling this more than once is a no-op after the first.
pub fn install(text: &str) -> Result<()> {
    let grid = IgnGrid::parse(text)?;
    let _ = GRID.set(grid);
    Ok(())
}

fn grid() -> Result<&'static IgnGrid> {
    GRID.get().ok_or_else(|| Error::GridLoad {
        name: "GR3DF97A".into(),
        cause: "grid not installed; call grid::gr3df97a::install() first".into(),
    })
}

/// NTF (Clarke 1880 IGN) geographic coordinates, radians, to RGF93
/// (GRS80) geographic coordinates, via geocentric translation.
///
/// `ntf` and `rgf93` ellipsoid `(a, es, b)` triples are supplied by the
/// caller's datum definitions rather than hardcoded, so the same grid
/// logic serves any geocentric-translation-grid datum pair.
pub fn shift_ntf_to_rgf93(
    lon: f64,
    lat: f64,
    height: f64,
    ntf: (f64, f64),
    rgf93: (f64, f64, f64),
) -> Result<(f64, f64, f64)> {
    let lon_grad = lon.to_degrees() * 10.0 / 9.0;
    let lat_grad = lat.to_degrees() * 10.0 / 9.0;
    let shift = grid()?.interpolate(lon_grad, lat_grad)?;
    let (dx, dy, dz) = (shift[0], shift[1], shift[2]);

    let (x, y, z) = geodetic_to_geocentric(lon, lat, height, ntf.0, ntf.1)?;
    let (x2, y2, z2) = (x + dx, y + dy, z + dz);
    geocentric_to_geodetic(x2, y2, z2, rgf93.0, rgf93.1, rgf93.2)
}

/// Inverse of [`shift_ntf_to_rgf93`], by fixed-point iteration over the
/// forward formula (the grid itself is only ever tabulated in NTF
/// geographic coordinates).
pub fn shift_rgf93_to_ntf(
    lon: f64,
    lat: f64,
    height: f64,
    ntf: (f64, f64),
    rgf93: (f64, f64, f64),
) -> Result<(f64, f64, f64)> {
    const MAX_ITER: usize = 10;
    const TOL: f64 = 1e-11;

    let mut guess = (lon, lat);
    for _ in 0..MAX_ITER {
        let (fwd_lon, fwd_lat, _) = shift_ntf_to_rgf93(guess.0, guess.1, height, ntf, rgf93)?;
        let (d_lon, d_lat) = (lon - fwd_lon, lat - fwd_lat);
        guess = (guess.0 + d_lon, guess.1 + d_lat);
        if d_lon.abs() < TOL && d_lat.abs() < TOL {
            // Undo the geocentric translation at the converged point to
            // recover the NTF ellipsoidal height.
            let lon_grad = guess.0.to_degrees() * 10.0 / 9.0;
            let lat_grad = guess.1.to_degrees() * 10.0 / 9.0;
            let shift = grid()?.interpolate(lon_grad, lat_grad)?;
            let (x, y, z) = geodetic_to_geocentric(lon, lat, height, rgf93.0, rgf93.1)?;
            let (x2, y2, z2) = (x - shift[0], y - shift[1], z - shift[2]);
            let (_, _, h) = geocentric_to_geodetic(x2, y2, z2, ntf.0, ntf.1, ntf.0 * (1.0 - ntf.1).sqrt())?;
            return Ok((guess.0, guess.1, h));
        }
    }
    Err(Error::IterationDiverged {
        op: "shift_rgf93_to_ntf",
        iterations: MAX_ITER,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY: &str = "\
GR3D1  -0.5 0.5 -0.5 0.5 1.0 1.0 01 3
GR3D2 INTERPOLATION BILINEAIRE
GR3D3 PREC CM
-0.5 -0.5 100.0 -50.0 10.0 99999
0.5 -0.5 100.0 -50.0 10.0 99999
-0.5 0.5 100.0 -50.0 10.0 99999
0.5 0.5 100.0 -50.0 10.0 99999
";

    #[test]
    fn install_and_lookup() {
        install(TOY).unwrap();
        let v = grid().unwrap().interpolate(0.0, 0.0).unwrap();
        assert_eq!(v, vec![100.0, -50.0, 10.0]);
    }
}
