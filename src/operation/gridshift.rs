//!
//! Grid-based datum shifts as coordinate operations
//!
//! Wraps the [`crate::grid`] readers as operations that plug directly
//! into a [`super::Sequence`].
//!

use std::sync::Arc;

use crate::error::Result;
use crate::grid::catalog::Catalog;
use crate::grid::vertical::VerticalGrid;
use crate::operation::Coord3;

#[derive(Clone)]
pub enum GridShift {
    /// Horizontal-only shift through an NTv2/IGN catalog (lon/lat in,
    /// lon/lat out, height untouched).
    Horizontal(Arc<Catalog>),
    /// Vertical-only offset (orthometric altitude <-> ellipsoidal
    /// height).
    Vertical(Arc<VerticalGrid>),
}

impl GridShift {
    pub fn forward(&self, c: Coord3) -> Result<Coord3> {
        match self {
            GridShift::Horizontal(cat) => {
                let (lam, phi) = cat.shift_forward(c.0, c.1)?;
                Ok((lam, phi, c.2))
            }
            GridShift::Vertical(grid) => {
                let h = grid.altitude_to_ellipsoidal_height(c.0, c.1, c.2)?;
                Ok((c.0, c.1, h))
            }
        }
    }

    pub fn inverse(&self, c: Coord3) -> Result<Coord3> {
        match self {
            GridShift::Horizontal(cat) => {
                let (lam, phi) = cat.shift_inverse(c.0, c.1)?;
                Ok((lam, phi, c.2))
            }
            GridShift::Vertical(grid) => {
                let alt = grid.ellipsoidal_height_to_altitude(c.0, c.1, c.2)?;
                Ok((c.0, c.1, alt))
            }
        }
    }
}
