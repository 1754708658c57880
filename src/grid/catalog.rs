//!
//! Grid catalog: a named, possibly-nested set of [`Grid`](super::ntv2::Grid)s
//! with deepest-match lookup.
//!
//! Nesting comes from NTv2's `SUB_NAME`/`PARENT` fields: a continent-wide
//! root grid with finer sub-grids covering, e.g., individual provinces.
//! Lookup always prefers the most specific (deepest) sub-grid whose
//! extent contains the query point.
//!

use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::grid::ntv2::Grid;

struct Entry {
    grid: Grid,
    parent_index: Option<usize>,
}

/// A named set of grids loaded under one resource key (e.g. one `.gsb`
/// file, or one IGN `.gra`/`.mnt` file containing a single root grid).
#[derive(Default)]
pub struct Catalog {
    entries: RwLock<Vec<Entry>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the grids of one NTv2 file (first grid listed is assumed
    /// to be a candidate root; parent linkage is resolved by name).
    pub fn add_grids(&self, grids: Vec<Grid>) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        for grid in grids {
            let parent_index = if grid.is_root() {
                None
            } else {
                let idx = entries.iter().position(|e| e.grid.name == grid.parent);
                if idx.is_none() {
                    return Err(Error::GridLoad {
                        name: grid.name.clone(),
                        cause: format!("parent grid '{}' not found", grid.parent),
                    });
                }
                idx
            };
            entries.push(Entry { grid, parent_index });
        }
        Ok(())
    }

    /// Register a single ungrouped grid (IGN ASCII format: always root).
    pub fn add_grid(&self, grid: Grid) {
        self.entries.write().unwrap().push(Entry {
            grid,
            parent_index: None,
        });
    }

    fn depth(entries: &[Entry], mut idx: usize) -> usize {
        let mut d = 0;
        while let Some(p) = entries[idx].parent_index {
            idx = p;
            d += 1;
        }
        d
    }

    /// Shift `(lam, phi)` forward through the deepest matching grid.
    pub fn shift_forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let entries = self.entries.read().unwrap();
        let idx = Self::deepest_match(&entries, lam, phi)?;
        entries[idx].grid.shift_forward(lam, phi)
    }

    /// Shift `(lam, phi)` backward through the deepest matching grid, the
    /// grid being chosen by the *input* (already-shifted) coordinate as
    /// PROJ's own `nad_cvt` does.
    pub fn shift_inverse(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let entries = self.entries.read().unwrap();
        let idx = Self::deepest_match(&entries, lam, phi)?;
        entries[idx].grid.shift_inverse(lam, phi)
    }

    fn deepest_match(entries: &[Entry], lam: f64, phi: f64) -> Result<usize> {
        entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.grid.matches(lam, phi))
            .max_by_key(|(idx, _)| Self::depth(entries, *idx))
            .map(|(idx, _)| idx)
            .ok_or(Error::PointOutsideNadShiftArea)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_has_no_match() {
        let cat = Catalog::new();
        assert!(cat.is_empty());
        assert!(cat.shift_forward(0.0, 0.0).is_err());
    }
}
