//!
//! Datum operations graph
//!
//! A directed multigraph: nodes are datum names, edges are the
//! operations known to carry coordinates from one to the other. Behind
//! a `RwLock` since grid edges are typically registered once at startup
//! and read from many threads afterward.
//!
//! [`DatumGraph::path`] implements the search order: a direct
//! edge first, then composition through WGS84 via each datum's own
//! `to_wgs84`, then identity if source and target are the same datum.
//! Lowest `precision()` wins; ties break by shortest chain.
//!

use std::collections::HashMap;
use std::sync::RwLock;

use crate::datum::GeodeticDatum;
use crate::error::{Error, Result};
use crate::operation::{CoordinateOperation, Sequence};

#[derive(Default)]
pub struct DatumGraph {
    edges: RwLock<HashMap<(String, String), Vec<CoordinateOperation>>>,
}

impl DatumGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one directed edge `from -> to`. Does not imply the
    /// reverse edge; callers add inverses explicitly when known.
    pub fn add_edge(&self, from: &str, to: &str, op: CoordinateOperation) {
        self.edges
            .write()
            .unwrap()
            .entry((from.to_string(), to.to_string()))
            .or_default()
            .push(op);
    }

    fn direct_edges(&self, from: &str, to: &str) -> Vec<CoordinateOperation> {
        self.edges
            .read()
            .unwrap()
            .get(&(from.to_string(), to.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Best (lowest-precision-number) registered direct edge, if any.
    fn best_direct(&self, from: &str, to: &str) -> Option<CoordinateOperation> {
        self.direct_edges(from, to)
            .into_iter()
            .min_by(|a, b| a.precision().total_cmp(&b.precision()))
    }

    /// Resolve the datum-shift factor of `A.toGeographic() (+)
    /// datum_shift(A.datum -> B.datum) (+) B.fromGeographic()`,
    /// per the search order above.
    pub fn path(&self, source: &GeodeticDatum, target: &GeodeticDatum) -> Result<CoordinateOperation> {
        if source.is_identical_to(target) {
            return Ok(CoordinateOperation::Identity);
        }

        let mut candidates: Vec<(CoordinateOperation, f64, usize)> = Vec::new();

        if let Some(op) = self.best_direct(source.name, target.name) {
            let op = Self::bracket_for_geocentric(op, source, target);
            let precision = op.precision();
            candidates.push((op, precision, 1));
        }

        // Via WGS84: source.to_wgs84 forward, then target.to_wgs84 run
        // backwards (WGS84 -> target). Skip this candidate when both
        // sides are the `Identity` placeholder a datum carries pending
        // a real registered edge: composing two placeholders would
        // silently claim "no shift needed" between datums that are, in
        // fact, distinct.
        if !(source.to_wgs84.is_identity() && target.to_wgs84.is_identity()) {
            let via_wgs84 = Sequence::new()
                .then(source.to_wgs84.clone())
                .then(CoordinateOperation::Inverted(Box::new(target.to_wgs84.clone())))
                .into_operation();
            let via_wgs84 = Self::bracket_for_geocentric(via_wgs84, source, target);
            let via_precision = via_wgs84.precision();
            candidates.push((via_wgs84, via_precision, 2));
        }

        candidates
            .into_iter()
            .min_by(|(_, p1, l1), (_, p2, l2)| p1.total_cmp(p2).then(l1.cmp(l2)))
            .map(|(op, _, _)| op)
            .ok_or(Error::NoDatumPath)
    }

    /// Helmert/translation edges (direct or via-WGS84, since a datum's
    /// own `to_wgs84` is itself one of these) operate on geocentric
    /// Cartesian coordinates, not on geographic lon/lat — but
    /// `path()`'s caller runs its result directly inside a geographic
    /// pipeline. Bracket such an edge with `source`'s
    /// geodetic-to-geocentric conversion on entry and `target`'s
    /// geocentric-to-geodetic conversion on exit so the shift itself
    /// sees what it expects. Grid-based edges (NTv2 and similar) already
    /// operate on lon/lat directly and are returned unbracketed.
    fn bracket_for_geocentric(op: CoordinateOperation, source: &GeodeticDatum, target: &GeodeticDatum) -> CoordinateOperation {
        if !Self::needs_geocentric(&op) {
            return op;
        }
        Sequence::new()
            .then(CoordinateOperation::GeodeticToGeocentric(source.ellipsoid.clone()))
            .then(op)
            .then(CoordinateOperation::GeocentricToGeodetic(target.ellipsoid.clone()))
            .into_operation()
    }

    fn needs_geocentric(op: &CoordinateOperation) -> bool {
        match op {
            CoordinateOperation::Helmert(_) | CoordinateOperation::Translation3D(_) => true,
            CoordinateOperation::Sequence(seq) => seq.0.iter().any(Self::needs_geocentric),
            CoordinateOperation::Inverted(inner) => Self::needs_geocentric(inner),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::constants::{ed50, wgs84};
    use crate::operation::helmert::HelmertParams;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_for_same_datum() {
        let g = DatumGraph::new();
        let w = wgs84();
        let op = g.path(&w, &w).unwrap();
        assert!(op.is_identity());
    }

    #[test]
    fn falls_back_to_via_wgs84_when_no_direct_edge() {
        use crate::operation::geocentric::{geocentric_to_geodetic, geodetic_to_geocentric};

        let g = DatumGraph::new();
        let w = wgs84();
        let e = ed50();
        let op = g.path(&e, &w).unwrap();

        // Geographic input: the planner feeds `path()`'s result
        // geographic coordinates, not raw geocentric XYZ, so the
        // resolved op must bracket the geocentric-space Helmert shift
        // itself.
        let p = (10f64.to_radians(), 45f64.to_radians(), 100.0);
        let mut mem = [0.0; 3];
        let out = op.transform(p, &mut mem).unwrap();

        // Expected: geodetic (ED50/International) -> geocentric, +87/+98/+121
        // translation, geocentric -> geodetic (WGS84 ellipsoid).
        let geocentric = geodetic_to_geocentric(p.0, p.1, p.2, e.ellipsoid.a, e.ellipsoid.es).unwrap();
        let shifted = (geocentric.0 + 87.0, geocentric.1 + 98.0, geocentric.2 + 121.0);
        let expected = geocentric_to_geodetic(shifted.0, shifted.1, shifted.2, w.ellipsoid.a, w.ellipsoid.es, w.ellipsoid.b).unwrap();

        assert_abs_diff_eq!(out.0, expected.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.1, expected.1, epsilon = 1e-9);
        assert_abs_diff_eq!(out.2, expected.2, epsilon = 1e-6);
    }

    #[test]
    fn placeholder_identity_datums_have_no_resolvable_path() {
        use crate::datum::constants::{ntf, rgf93};
        let g = DatumGraph::new();
        assert!(matches!(g.path(&ntf(), &rgf93()), Err(Error::NoDatumPath)));
    }

    #[test]
    fn direct_edge_wins_over_via_wgs84_when_more_precise() {
        let g = DatumGraph::new();
        let e = ed50();
        let w = wgs84();
        // A hypothetical grid-precision direct edge, registered better
        // than the plain translation toWGS84 carries.
        g.add_edge(
            "ED50",
            "WGS84",
            CoordinateOperation::GridShift(crate::operation::gridshift::GridShift::Horizontal(std::sync::Arc::new(
                crate::grid::catalog::Catalog::new(),
            ))),
        );
        let op = g.path(&e, &w).unwrap();
        assert_abs_diff_eq!(op.precision(), 0.01);
        let _ = HelmertParams::translation(0.0, 0.0, 0.0);
    }
}
