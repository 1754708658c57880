//!
//! IGN ASCII grid reader
//!
//! Textual grid format used by the French geodetic service for its
//! translation and geoid grids (e.g. `GR3DF97A.txt`, `RAC09.txt`). Three
//! header lines describe the bounding box/step/scan order, the
//! interpolation method and the precision-code legend; the body is one
//! row per node, `lon lat v_1 .. v_n [precision]`, missing nodes flagged
//! with a `9999`-family sentinel.
//!

use crate::error::{Error, Result};
use crate::grid::Lp;

/// Parsed bounding box / sampling header (first header line).
#[derive(Debug, Copy, Clone)]
pub struct GridHeader {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
    pub dlon: f64,
    pub dlat: f64,
    /// Node scan order flag as found in the file (1: by increasing
    /// longitude within each latitude row, as used by all known IGN
    /// grids).
    pub scan_order: u32,
    /// Number of value columns per node (e.g. 3 for GR3DF97A's dx,dy,dz).
    pub dim: usize,
}

impl GridHeader {
    fn ncols(&self) -> usize {
        (((self.lon_max - self.lon_min) / self.dlon).round() as usize) + 1
    }

    fn nrows(&self) -> usize {
        (((self.lat_max - self.lat_min) / self.dlat).round() as usize) + 1
    }
}

/// A loaded IGN ASCII grid: a regular lon/lat lattice of `dim`-component
/// node values, with an optional per-node precision code.
#[derive(Debug)]
pub struct IgnGrid {
    pub header: GridHeader,
    /// Row-major, south-to-north then west-to-east, `dim` values/node.
    values: Box<[f64]>,
    valid: Box<[bool]>,
}

const SENTINEL: f64 = 9999.0;

impl IgnGrid {
    /// Parse the three fixed header lines plus the data body from `text`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let header = Self::parse_header_line(lines.next().ok_or_else(|| Error::GridLoad {
            name: "ign".into(),
            cause: "empty grid file".into(),
        })?)?;

        // Interpolation-method and precision-legend lines: present in
        // every known IGN grid but not needed beyond skipping them.
        let _interpolation_line = lines.next();
        let _precision_legend_line = lines.next();

        let ncols = header.ncols();
        let nrows = header.nrows();
        let mut values = vec![0.0; ncols * nrows * header.dim];
        let mut valid = vec![false; ncols * nrows];

        for line in lines {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 2 + header.dim {
                continue;
            }
            let lon: f64 = cols[0].parse().map_err(|_| parse_err("longitude"))?;
            let lat: f64 = cols[1].parse().map_err(|_| parse_err("latitude"))?;

            let ci = ((lon - header.lon_min) / header.dlon).round();
            let ri = ((lat - header.lat_min) / header.dlat).round();
            if ci < 0.0 || ri < 0.0 {
                continue;
            }
            let (ci, ri) = (ci as usize, ri as usize);
            if ci >= ncols || ri >= nrows {
                continue;
            }
            let node = ri * ncols + ci;

            let mut ok = true;
            let mut vals = [0.0; 8];
            for (k, slot) in vals.iter_mut().enumerate().take(header.dim) {
                let v: f64 = cols[2 + k].parse().map_err(|_| parse_err("value"))?;
                if (v - SENTINEL).abs() < 1e-6 || (v + SENTINEL).abs() < 1e-6 {
                    ok = false;
                }
                *slot = v;
            }
            valid[node] = ok;
            if ok {
                values[node * header.dim..node * header.dim + header.dim]
                    .copy_from_slice(&vals[..header.dim]);
            }
        }

        Ok(Self {
            header,
            values: values.into_boxed_slice(),
            valid: valid.into_boxed_slice(),
        })
    }

    fn parse_header_line(line: &str) -> Result<GridHeader> {
        let cols: Vec<&str> = line.split_whitespace().collect();
        // `<label> lon_min lon_max lat_min lat_max dlon dlat scan_order dim`
        if cols.len() < 9 {
            return Err(parse_err("header"));
        }
        let f = |i: usize| cols[i].parse::<f64>().map_err(|_| parse_err("header"));
        let u = |i: usize| cols[i].parse::<u32>().map_err(|_| parse_err("header"));
        Ok(GridHeader {
            lon_min: f(1)?,
            lon_max: f(2)?,
            lat_min: f(3)?,
            lat_max: f(4)?,
            dlon: f(5)?,
            dlat: f(6)?,
            scan_order: u(7)?,
            dim: u(8)? as usize,
        })
    }

    /// Whether `(lon, lat)` (same unit as the header) falls within the
    /// grid extent.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.header.lon_min
            && lon <= self.header.lon_max
            && lat >= self.header.lat_min
            && lat <= self.header.lat_max
    }

    /// Bilinear interpolation of all `dim` components at `(lon, lat)`.
    pub fn interpolate(&self, lon: f64, lat: f64) -> Result<Vec<f64>> {
        if !self.contains(lon, lat) {
            return Err(Error::PointOutsideNadShiftArea);
        }
        let h = &self.header;
        let ncols = h.ncols();

        let fx = (lon - h.lon_min) / h.dlon;
        let fy = (lat - h.lat_min) / h.dlat;
        let ci = fx.floor().max(0.0) as usize;
        let ri = fy.floor().max(0.0) as usize;
        let (ci, ri) = (ci.min(ncols - 2), ri.min(self.header.nrows() - 2));
        let (tx, ty) = (fx - ci as f64, fy - ri as f64);

        let node = |c: usize, r: usize| r * ncols + c;
        for &(c, r) in &[(ci, ri), (ci + 1, ri), (ci, ri + 1), (ci + 1, ri + 1)] {
            if !self.valid[node(c, r)] {
                return Err(Error::PointOutsideNadShiftArea);
            }
        }

        let dim = h.dim;
        let mut out = vec![0.0; dim];
        for k in 0..dim {
            let v00 = self.values[node(ci, ri) * dim + k];
            let v10 = self.values[node(ci + 1, ri) * dim + k];
            let v01 = self.values[node(ci, ri + 1) * dim + k];
            let v11 = self.values[node(ci + 1, ri + 1) * dim + k];
            out[k] = v00 * (1. - tx) * (1. - ty)
                + v10 * tx * (1. - ty)
                + v01 * (1. - tx) * ty
                + v11 * tx * ty;
        }
        Ok(out)
    }

    /// Convenience for a 2-component horizontal shift grid.
    pub fn interpolate_lp(&self, lon: f64, lat: f64) -> Result<Lp> {
        let v = self.interpolate(lon, lat)?;
        Ok(Lp {
            lam: v[0],
            phi: v.get(1).copied().unwrap_or(0.0),
        })
    }
}

fn parse_err(what: &str) -> Error {
    Error::GridLoad {
        name: "ign".into(),
        cause: format!("cannot parse {what}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY: &str = "\
HDR  0.0 1.0 0.0 1.0 1.0 1.0 01 2
HDR2 INTERPOLATION BILINEAIRE
HDR3 PREC
0.0 0.0 1.0 -1.0 99999
1.0 0.0 2.0 -2.0 99999
0.0 1.0 3.0 -3.0 99999
1.0 1.0 4.0 -4.0 99999
";

    #[test]
    fn parses_and_interpolates_center() {
        let g = IgnGrid::parse(TOY).unwrap();
        let v = g.interpolate(0.5, 0.5).unwrap();
        assert_eq!(v, vec![2.5, -2.5]);
    }

    #[test]
    fn out_of_bounds_is_error() {
        let g = IgnGrid::parse(TOY).unwrap();
        assert!(g.interpolate(2.0, 2.0).is_err());
    }
}
