//!
//! CRS → pipeline construction
//!
//! Builds the two pipelines every [`Crs`] produces: `to_geographic()`
//! (this CRS's native coordinates → canonical geographic form: radians,
//! meters, ellipsoidal height, Greenwich-referenced) and
//! `from_geographic()`, its symmetric reverse. The pipeline is built as
//! an ordered set of steps (axis adjust → unit conversion → axis swap →
//! projection inverse → geocentric conversion → longitude rotation) so
//! it stays an inspectable, invertible [`Sequence`] rather than one
//! imperative one-shot function.
//!

use crate::crs::{Crs, CoordinateSystem};
use crate::error::Result;
use crate::measure::{Quantity, Unit, METER, RADIAN};
use crate::operation::primitives::{AxisSwap, DimensionChange, SignFlip, UnitConversion, VerticalUnitConversion};
use crate::operation::{CoordinateOperation, Sequence};

fn sign_flip_step(cs: &CoordinateSystem) -> Option<CoordinateOperation> {
    let mut flip = [false; 3];
    for (i, (axis, _)) in cs.0.iter().enumerate().take(3) {
        flip[i] = axis.direction.needs_sign_flip();
    }
    flip.iter().any(|&f| f).then(|| CoordinateOperation::SignFlip(SignFlip::new(flip[0], flip[1], flip[2])))
}

/// Convert axes 0/1 to `canonical` if their (shared) unit differs, and
/// axis 2 (if present) to meters if it differs, per rule 2.
fn unit_conversion_steps(cs: &CoordinateSystem, canonical: Unit) -> Vec<CoordinateOperation> {
    let mut steps = Vec::new();
    if cs.len() >= 2 {
        let u0 = cs.0[0].1;
        if u0 != canonical {
            steps.push(CoordinateOperation::UnitConversion(UnitConversion::new(u0, canonical)));
        }
    }
    if cs.len() >= 3 {
        let u2 = cs.0[2].1;
        if u2 != METER {
            steps.push(CoordinateOperation::VerticalUnitConversion(VerticalUnitConversion::new(u2, METER)));
        }
    }
    steps
}

/// Swap axes 0/1 when the CS lists longitude before latitude (rule 3);
/// restricted to angular axes so a Projected CRS's Easting-first
/// coordinate system (also nominally "East"-directed) is left alone.
fn swap_step(cs: &CoordinateSystem) -> Option<CoordinateOperation> {
    if cs.len() >= 2 && cs.0[0].1.quantity == Quantity::Angle && cs.0[0].0.direction.is_horizontal_first() {
        Some(CoordinateOperation::AxisSwap(AxisSwap::new([1, 0, 2], [false, false, false])))
    } else {
        None
    }
}

/// Build the `toGeographic()` pipeline for any [`Crs`] variant.
pub fn to_geographic(crs: &Crs) -> Result<Sequence> {
    let seq = match crs {
        Crs::Compound { horizontal, vertical } => {
            return crate::crs::compound::to_geographic(horizontal, vertical, None);
        }
        _ => horizontal_to_geographic_steps(crs, true)?,
    };
    Ok(seq.simplify())
}

/// The lon/lat-producing portion of `to_geographic`. When `extend_3d` is
/// false, stops short of the final 2D→3D extension so a
/// [`Crs::Compound`] can graft its own Z-handling onto the live third
/// component instead of having it zeroed.
pub(crate) fn horizontal_to_geographic_steps(crs: &Crs, extend_3d: bool) -> Result<Sequence> {
    let mut seq = Sequence::new();

    match crs {
        Crs::Geocentric { cs, datum } => {
            if let Some(op) = sign_flip_step(cs) {
                seq.push(op);
            }
            for op in unit_conversion_steps(cs, METER) {
                seq.push(op);
            }
            seq.push(CoordinateOperation::GeocentricToGeodetic(datum.ellipsoid.clone()));
            if datum.prime_meridian.longitude_from_greenwich != 0.0 {
                seq.push(CoordinateOperation::LongitudeRotation(datum.prime_meridian.longitude_from_greenwich));
            }
        }
        Crs::Geographic2D { cs, datum } => {
            build_geographic(&mut seq, cs, datum);
            if extend_3d {
                seq.push(CoordinateOperation::DimensionChange(DimensionChange::new(2, 3)));
            }
        }
        Crs::Geographic3D { cs, datum } => {
            build_geographic(&mut seq, cs, datum);
        }
        Crs::Projected { cs, datum, projection } => {
            if let Some(op) = sign_flip_step(cs) {
                seq.push(op);
            }
            for op in unit_conversion_steps(cs, METER) {
                seq.push(op);
            }
            seq.push(CoordinateOperation::Inverted(Box::new(CoordinateOperation::Projection(Box::new(
                projection.clone(),
            )))));
            if datum.prime_meridian.longitude_from_greenwich != 0.0 {
                seq.push(CoordinateOperation::LongitudeRotation(datum.prime_meridian.longitude_from_greenwich));
            }
            if extend_3d && cs.len() < 3 {
                seq.push(CoordinateOperation::DimensionChange(DimensionChange::new(2, 3)));
            }
        }
        Crs::Vertical { cs, .. } => {
            if let Some(unit) = cs.0.first().map(|(_, u)| *u) {
                if unit != METER {
                    seq.push(CoordinateOperation::VerticalUnitConversion(VerticalUnitConversion::new(unit, METER)));
                }
            }
        }
        Crs::Compound { horizontal, .. } => return horizontal_to_geographic_steps(horizontal, extend_3d),
    }

    Ok(seq)
}

fn build_geographic(seq: &mut Sequence, cs: &CoordinateSystem, datum: &crate::datum::GeodeticDatum) {
    if let Some(op) = sign_flip_step(cs) {
        seq.push(op);
    }
    for op in unit_conversion_steps(cs, RADIAN) {
        seq.push(op);
    }
    if let Some(op) = swap_step(cs) {
        seq.push(op);
    }
    if datum.prime_meridian.longitude_from_greenwich != 0.0 {
        seq.push(CoordinateOperation::LongitudeRotation(datum.prime_meridian.longitude_from_greenwich));
    }
}

/// `fromGeographic()`, the symmetric reverse of [`to_geographic`].
pub fn from_geographic(crs: &Crs) -> Result<Sequence> {
    let fwd = to_geographic(crs)?;
    Ok(Sequence::new().then(CoordinateOperation::Inverted(Box::new(fwd.into_operation()))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::{Axis, AxisDirection};
    use crate::datum::constants::wgs84;
    use crate::measure::DEGREE;
    use crate::operation::run;
    use approx::assert_abs_diff_eq;

    #[test]
    fn geographic2d_lon_lat_degrees_round_trips_through_radians_lat_lon() {
        let crs = Crs::Geographic2D {
            cs: CoordinateSystem::geographic_2d(DEGREE),
            datum: wgs84(),
        };
        let fwd = to_geographic(&crs).unwrap();
        let p = (2.35, 48.85, 0.0); // lon, lat degrees
        let out = run(&fwd, p).unwrap();
        assert_abs_diff_eq!(out.0, 48.85f64.to_radians(), epsilon = 1e-9); // lat first
        assert_abs_diff_eq!(out.1, 2.35f64.to_radians(), epsilon = 1e-9); // lon second
        assert_abs_diff_eq!(out.2, 0.0, epsilon = 1e-12);

        let back = from_geographic(&crs).unwrap();
        let roundtrip = run(&back, out).unwrap();
        assert_abs_diff_eq!(roundtrip.0, p.0, epsilon = 1e-9);
        assert_abs_diff_eq!(roundtrip.1, p.1, epsilon = 1e-9);
    }

    #[test]
    fn south_oriented_axis_is_sign_flipped() {
        let cs = CoordinateSystem(vec![
            (Axis::new(AxisDirection::North, "Lat"), DEGREE),
            (Axis::new(AxisDirection::East, "Lon"), DEGREE),
        ]);
        let crs = Crs::Geographic2D { cs, datum: wgs84() };
        // axis 0 is already North (lat first): no swap should be applied.
        let fwd = to_geographic(&crs).unwrap();
        let out = run(&fwd, (48.85, 2.35, 0.0)).unwrap();
        assert_abs_diff_eq!(out.0, 48.85f64.to_radians(), epsilon = 1e-9);
        assert_abs_diff_eq!(out.1, 2.35f64.to_radians(), epsilon = 1e-9);
    }
}
