//!
//! Compound CRS Z-memoization dance
//!
//! When the vertical datum needs a grid lookup (not simply ellipsoidal
//! height already), the vertical grid must be sampled at the horizontal
//! position expressed in *its own* associated datum, which may differ
//! from the horizontal CRS's datum — hence memoizing Z, shifting X/Y
//! there and back around the grid lookup.
//!

use crate::crs::{pipeline, Crs};
use crate::datum::graph::DatumGraph;
use crate::datum::VerticalDatumKind;
use crate::error::{Error, Result};
use crate::measure::{DEGREE, METER, RADIAN};
use crate::operation::gridshift::GridShift;
use crate::operation::primitives::{UnitConversion, VerticalUnitConversion};
use crate::operation::{CoordinateOperation, Sequence};

/// Build the `toGeographic()` pipeline for a [`Crs::Compound`]. `graph`
/// is consulted only when the vertical datum's associated datum
/// differs from the horizontal one; plain [`pipeline::to_geographic`]
/// calls pass `None`, so such compound CRSs must go through
/// [`crate::crs::planner`] instead, which supplies a real graph.
pub fn to_geographic(horizontal: &Crs, vertical: &Crs, graph: Option<&DatumGraph>) -> Result<Sequence> {
    let v_datum = vertical.vertical_datum().ok_or(Error::InvalidCompoundComponent)?;
    let mut seq = pipeline::horizontal_to_geographic_steps(horizontal, false)?;

    let vertical_unit = vertical.coordinate_system().0.first().map(|(_, u)| *u).unwrap_or(METER);

    match v_datum.kind {
        VerticalDatumKind::Ellipsoidal => {
            if vertical_unit != METER {
                seq.push(CoordinateOperation::VerticalUnitConversion(VerticalUnitConversion::new(vertical_unit, METER)));
            }
        }
        VerticalDatumKind::Geoidal | VerticalDatumKind::Other => {
            let grid = v_datum
                .altitude_to_ellipsoidal_height
                .clone()
                .ok_or(Error::Unsupported("vertical datum has no altitude/ellipsoidal-height grid"))?;
            let assoc = v_datum
                .associated_datum
                .clone()
                .ok_or(Error::Unsupported("non-ellipsoidal vertical datum is missing its associated geodetic datum"))?;
            let h_datum = horizontal.geodetic_datum().ok_or(Error::InvalidCompoundComponent)?.clone();
            let needs_shift = !h_datum.is_identical_to(&assoc);

            seq.push(CoordinateOperation::Memoize(0));

            let to_assoc = if needs_shift {
                let graph = graph.ok_or(Error::Unsupported("compound CRS vertical datum shift requires a datum graph"))?;
                let op = graph.path(&h_datum, &assoc)?;
                seq.push(op.clone());
                Some(op)
            } else {
                None
            };

            seq.push(CoordinateOperation::UnitConversion(UnitConversion::new(RADIAN, DEGREE)));
            seq.push(CoordinateOperation::LoadMemorized(0));
            seq.push(CoordinateOperation::GridShift(GridShift::Vertical(grid)));
            seq.push(CoordinateOperation::UnitConversion(UnitConversion::new(DEGREE, RADIAN)));

            if let Some(op) = to_assoc {
                seq.push(CoordinateOperation::Inverted(Box::new(op)));
            }
        }
    }

    Ok(seq.simplify())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::{Crs, CoordinateSystem};
    use crate::datum::constants::{ellipsoidal, wgs84};
    use crate::measure::DEGREE;
    use crate::operation::run;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ellipsoidal_vertical_datum_is_pure_passthrough() {
        let horizontal = Crs::Geographic2D {
            cs: CoordinateSystem::geographic_2d(DEGREE),
            datum: wgs84(),
        };
        let vertical = Crs::Vertical {
            cs: CoordinateSystem(vec![(crate::crs::Axis::new(crate::crs::AxisDirection::Up, "H"), METER)]),
            datum: ellipsoidal(),
        };
        let seq = to_geographic(&horizontal, &vertical, None).unwrap();
        let out = run(&seq, (2.35, 48.85, 35.0)).unwrap();
        assert_abs_diff_eq!(out.0, 48.85f64.to_radians(), epsilon = 1e-9);
        assert_abs_diff_eq!(out.1, 2.35f64.to_radians(), epsilon = 1e-9);
        assert_abs_diff_eq!(out.2, 35.0, epsilon = 1e-9);
    }

    #[test]
    fn geoidal_vertical_datum_without_shift_applies_grid() {
        const TOY: &str = "\
HDR 0.0 10.0 40.0 50.0 10.0 10.0 01 1
HDR2 INTERPOLATION BILINEAIRE
HDR3 PREC
0.0 40.0 40.0 99999
10.0 40.0 40.0 99999
0.0 50.0 40.0 99999
10.0 50.0 40.0 99999
";
        let grid = std::sync::Arc::new(crate::grid::vertical::VerticalGrid::parse(TOY).unwrap());
        let horizontal = Crs::Geographic2D {
            cs: CoordinateSystem::geographic_2d(DEGREE),
            datum: wgs84(),
        };
        let vertical = Crs::Vertical {
            cs: CoordinateSystem(vec![(crate::crs::Axis::new(crate::crs::AxisDirection::Up, "H"), METER)]),
            datum: crate::datum::VerticalDatum::geoidal("EGM-toy", grid, wgs84()),
        };
        let seq = to_geographic(&horizontal, &vertical, None).unwrap();
        let out = run(&seq, (5.0, 45.0, 100.0)).unwrap();
        assert_abs_diff_eq!(out.2, 140.0, epsilon = 1e-6);
    }
}
