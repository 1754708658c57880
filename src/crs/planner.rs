//!
//! CRS-to-CRS transformation planning
//!
//! The top-level entry point: given a source and target [`Crs`], builds
//! the full `A.toGeographic() ⊕ datum_shift(A.datum → B.datum) ⊕
//! B.fromGeographic()` pipeline, resolving the datum shift through a
//! [`DatumGraph`] rather than a single hardcoded `towgs84` pair.
//!

use crate::crs::{pipeline, Crs};
use crate::datum::graph::DatumGraph;
use crate::error::Result;
use crate::log_debug;
use crate::operation::{CoordinateOperation, Sequence};

/// Resolves datum shifts and builds CRS-to-CRS pipelines against one
/// shared [`DatumGraph`]. Cheap to construct; holds no state beyond the
/// graph reference a caller already owns.
pub struct Planner<'a> {
    graph: &'a DatumGraph,
}

impl<'a> Planner<'a> {
    pub fn new(graph: &'a DatumGraph) -> Self {
        Self { graph }
    }

    /// Build the full transform from `source` to `target`.
    pub fn plan(&self, source: &Crs, target: &Crs) -> Result<Sequence> {
        let mut seq = self.to_geographic(source)?;

        if let (Some(from), Some(to)) = (source.geodetic_datum(), target.geodetic_datum()) {
            let shift = self.graph.path(from, to)?;
            log_debug!("datum shift {} -> {}: precision {}", from.name, to.name, shift.precision());
            if !shift.is_identity() {
                seq.push(shift);
            }
        }

        seq = seq.compose(self.from_geographic(target)?);
        Ok(seq.simplify())
    }

    /// `toGeographic()` for any [`Crs`], routing [`Crs::Compound`]
    /// through the graph-aware dance instead of `pipeline`'s
    /// `None`-graph fallback.
    pub fn to_geographic(&self, crs: &Crs) -> Result<Sequence> {
        match crs {
            Crs::Compound { horizontal, vertical } => {
                log_debug!("compound CRS toGeographic via planner-supplied datum graph");
                crate::crs::compound::to_geographic(horizontal, vertical, Some(self.graph))
            }
            _ => pipeline::to_geographic(crs),
        }
    }

    pub fn from_geographic(&self, crs: &Crs) -> Result<Sequence> {
        let fwd = self.to_geographic(crs)?;
        Ok(Sequence::new().then(CoordinateOperation::Inverted(Box::new(fwd.into_operation()))))
    }
}

/// Convenience wrapper for the common case of no registered datum
/// graph: [`DatumGraph::path`] still resolves datum pairs whose
/// `to_wgs84` alone is enough (e.g. ED50 ⊕ WGS84), and errors with
/// [`Error::NoDatumPath`] for anything that needs a registered edge.
pub fn plan(source: &Crs, target: &Crs) -> Result<Sequence> {
    let graph = DatumGraph::new();
    Planner::new(&graph).plan(source, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::{Axis, AxisDirection, CoordinateSystem};
    use crate::datum::constants::{ntf, rgf93, wgs84};
    use crate::measure::DEGREE;
    use crate::operation::helmert::HelmertParams;
    use crate::operation::run;
    use approx::assert_abs_diff_eq;

    #[test]
    fn same_datum_round_trips_identity_shift() {
        let a = Crs::Geographic2D {
            cs: CoordinateSystem::geographic_2d(DEGREE),
            datum: wgs84(),
        };
        let b = Crs::Geographic2D {
            cs: CoordinateSystem::geographic_2d(DEGREE),
            datum: wgs84(),
        };
        let seq = plan(&a, &b).unwrap();
        let out = run(&seq, (2.35, 48.85, 0.0)).unwrap();
        assert_abs_diff_eq!(out.0, 2.35, epsilon = 1e-9);
        assert_abs_diff_eq!(out.1, 48.85, epsilon = 1e-9);
    }

    #[test]
    fn distinct_datums_require_a_registered_graph() {
        let a = Crs::Geographic2D {
            cs: CoordinateSystem::geographic_2d(DEGREE),
            datum: ntf(),
        };
        let b = Crs::Geographic2D {
            cs: CoordinateSystem::geographic_2d(DEGREE),
            datum: rgf93(),
        };
        assert!(plan(&a, &b).is_err());

        let graph = DatumGraph::new();
        graph.add_edge("NTF", "RGF93", CoordinateOperation::Helmert(HelmertParams::translation(168.0, 60.0, -320.0)));
        let seq = Planner::new(&graph).plan(&a, &b).unwrap();

        let input = (2.35, 48.85, 0.0);
        let out = run(&seq, input).unwrap();
        // A few hundred meters of geocentric translation at this latitude
        // nudges lon/lat by a small but non-negligible fraction of a
        // degree; a coordinate-space bug (translation applied directly
        // to lon/lat radians as if they were meters) would instead blow
        // this wildly out of range.
        assert!((out.0 - 2.35).abs() > 1e-6 || (out.1 - 48.85).abs() > 1e-6);
        assert!((out.0 - 2.35).abs() < 0.01);
        assert!((out.1 - 48.85).abs() < 0.01);

        // The bracketed shift is built entirely from invertible steps;
        // running the same sequence backwards must recover the input.
        let back = crate::operation::run_inverse(&seq, out).unwrap();
        assert_abs_diff_eq!(back.0, input.0, epsilon = 1e-7);
        assert_abs_diff_eq!(back.1, input.1, epsilon = 1e-7);
    }

    #[test]
    fn axis_direction_helper_smoke() {
        assert!(AxisDirection::East.is_horizontal_first());
        let axis = Axis::new(AxisDirection::North, "Lat");
        assert_eq!(axis.name, "Lat");
    }
}
