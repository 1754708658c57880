//!
//! Coordinate operations
//!
//! A [`CoordinateOperation`] is a tagged union over every kind of step a
//! transformation pipeline can be built from: axis/unit bookkeeping,
//! geographic↔geocentric conversion, Helmert datum shifts, grid-based
//! shifts, map projections, and whole sub-[`Sequence`]s. Building one
//! crate-wide enum (rather than the one-projection-family-at-a-time
//! dispatch a single `Proj` needs) is what lets a [`crate::crs::Crs`]
//! pipeline compose and invert arbitrary chains of these steps
//! generically.
//!

pub mod geocentric;
pub mod gridshift;
pub mod helmert;
pub mod primitives;

use crate::error::Result;
use crate::ellipsoid::Ellipsoid;
use crate::projections::Projection;
use helmert::HelmertParams;
use primitives::{AxisSwap, DimensionChange, SignFlip, Translation3D, UnitConversion, VerticalUnitConversion};

/// A 3-component coordinate; the third component is `0.0` (or carries no
/// meaning) for strictly 2D operations.
pub type Coord3 = (f64, f64, f64);

/// Direction a [`CoordinateOperation`] is run in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

/// A single step of a transformation pipeline.
#[derive(Clone)]
pub enum CoordinateOperation {
    Identity,
    Translation3D(Translation3D),
    SignFlip(SignFlip),
    DimensionChange(DimensionChange),
    UnitConversion(UnitConversion),
    VerticalUnitConversion(VerticalUnitConversion),
    AxisSwap(AxisSwap),
    LongitudeRotation(f64),
    GeodeticToGeocentric(Ellipsoid),
    GeocentricToGeodetic(Ellipsoid),
    Helmert(HelmertParams),
    GridShift(gridshift::GridShift),
    Projection(Box<Projection>),
    /// Store the current coordinate in scratch slot `n` (compound CRS
    /// Z-memoization).
    Memoize(usize),
    /// Overwrite the Z component from scratch slot `n`.
    LoadMemorized(usize),
    Sequence(Sequence),
    /// Run the wrapped operation backwards. Lets the datum planner
    /// compose a registered `toWGS84` operation in the reverse
    /// direction (`WGS84 -> datum`) without needing a distinct inverted
    /// variant of every operation kind.
    Inverted(Box<CoordinateOperation>),
}

impl CoordinateOperation {
    pub fn transform(&self, c: Coord3, mem: &mut [f64; 3]) -> Result<Coord3> {
        use CoordinateOperation::*;
        match self {
            Identity => Ok(c),
            Translation3D(op) => op.apply(c, Direction::Forward),
            SignFlip(op) => op.apply(c),
            DimensionChange(op) => op.apply(c, Direction::Forward),
            UnitConversion(op) => op.apply(c, Direction::Forward),
            VerticalUnitConversion(op) => op.apply(c, Direction::Forward),
            AxisSwap(op) => op.apply(c, Direction::Forward),
            LongitudeRotation(delta) => Ok((primitives::adjlon(c.0 + delta), c.1, c.2)),
            GeodeticToGeocentric(e) => geocentric::geodetic_to_geocentric(c.0, c.1, c.2, e.a, e.es),
            GeocentricToGeodetic(e) => geocentric::geocentric_to_geodetic(c.0, c.1, c.2, e.a, e.es, e.b),
            Helmert(p) => p.forward(c),
            GridShift(op) => op.forward(c),
            Projection(p) => p.forward(c),
            Memoize(slot) => {
                mem[*slot] = c.2;
                Ok(c)
            }
            LoadMemorized(slot) => Ok((c.0, c.1, mem[*slot])),
            Sequence(seq) => seq.transform(c, mem),
            Inverted(op) => op.inverse_transform(c, mem),
        }
    }

    pub fn inverse_transform(&self, c: Coord3, mem: &mut [f64; 3]) -> Result<Coord3> {
        use CoordinateOperation::*;
        match self {
            Identity => Ok(c),
            Translation3D(op) => op.apply(c, Direction::Inverse),
            SignFlip(op) => op.apply(c),
            DimensionChange(op) => op.apply(c, Direction::Inverse),
            UnitConversion(op) => op.apply(c, Direction::Inverse),
            VerticalUnitConversion(op) => op.apply(c, Direction::Inverse),
            AxisSwap(op) => op.apply(c, Direction::Inverse),
            LongitudeRotation(delta) => Ok((primitives::adjlon(c.0 - delta), c.1, c.2)),
            GeodeticToGeocentric(e) => geocentric::geocentric_to_geodetic(c.0, c.1, c.2, e.a, e.es, e.b),
            GeocentricToGeodetic(e) => geocentric::geodetic_to_geocentric(c.0, c.1, c.2, e.a, e.es),
            Helmert(p) => p.inverse(c),
            GridShift(op) => op.inverse(c),
            Projection(p) => p.inverse(c),
            Memoize(slot) => {
                mem[*slot] = c.2;
                Ok(c)
            }
            LoadMemorized(slot) => Ok((c.0, c.1, mem[*slot])),
            Sequence(seq) => seq.inverse(c, mem),
            Inverted(op) => op.transform(c, mem),
        }
    }

    /// Whether this operation is invertible at all (grid-based shifts and
    /// memoization slots are always invertible in practice; only a
    /// hypothetical unparameterized projection placeholder would not be).
    pub fn has_inverse(&self) -> bool {
        true
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, CoordinateOperation::Identity)
    }

    /// Estimated worst-case error in meters at output, used by the
    /// datum-path planner to rank candidate chains: lower is better.
    /// Axis/unit bookkeeping and the geodetic/geocentric conversion
    /// itself are exact; Helmert shifts and grid shifts carry their own
    /// real-world error estimate.
    pub fn precision(&self) -> f64 {
        use CoordinateOperation::*;
        match self {
            Identity | Translation3D(_) | SignFlip(_) | DimensionChange(_) | UnitConversion(_)
            | VerticalUnitConversion(_) | AxisSwap(_) | LongitudeRotation(_) | GeodeticToGeocentric(_)
            | GeocentricToGeodetic(_) | Memoize(_) | LoadMemorized(_) => 0.0,
            GridShift(_) => 0.01,
            Helmert(p) => p.precision(),
            Projection(_) => 0.0,
            Sequence(seq) => seq.precision(),
            Inverted(op) => op.precision(),
        }
    }
}

/// An ordered chain of operations, applied left to right in the forward
/// direction and right to left (each step inverted) in the inverse
/// direction.
#[derive(Clone, Default)]
pub struct Sequence(pub Vec<CoordinateOperation>);

impl Sequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, op: CoordinateOperation) -> &mut Self {
        self.0.push(op);
        self
    }

    pub fn then(mut self, op: CoordinateOperation) -> Self {
        self.push(op);
        self
    }

    /// Concatenate two sequences, flattening nested `Sequence` values so
    /// repeated composition doesn't grow pipeline depth.
    pub fn compose(mut self, other: Sequence) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn transform(&self, mut c: Coord3, mem: &mut [f64; 3]) -> Result<Coord3> {
        for op in &self.0 {
            c = op.transform(c, mem)?;
        }
        Ok(c)
    }

    pub fn inverse(&self, mut c: Coord3, mem: &mut [f64; 3]) -> Result<Coord3> {
        for op in self.0.iter().rev() {
            c = op.inverse_transform(c, mem)?;
        }
        Ok(c)
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().all(CoordinateOperation::is_identity)
    }

    /// Drop every identity step; an all-identity sequence collapses to
    /// an empty one, which [`Self::transform`]/[`Self::inverse`] treat as
    /// a no-op.
    pub fn simplify(mut self) -> Self {
        self.0.retain(|op| !op.is_identity());
        self
    }

    /// Euclidean sum of step precisions (`sqrt(sum(p_i^2))`), not a max:
    /// independent errors compound, they don't cap at the single worst
    /// step.
    pub fn precision(&self) -> f64 {
        self.0.iter().map(|op| op.precision().powi(2)).sum::<f64>().sqrt()
    }

    pub fn into_operation(self) -> CoordinateOperation {
        CoordinateOperation::Sequence(self)
    }
}

/// Run a `Sequence` end to end with a fresh scratch buffer, the entry
/// point most callers use.
pub fn run(seq: &Sequence, c: Coord3) -> Result<Coord3> {
    let mut mem = [0.0; 3];
    seq.transform(c, &mut mem)
}

pub fn run_inverse(seq: &Sequence, c: Coord3) -> Result<Coord3> {
    let mut mem = [0.0; 3];
    seq.inverse(c, &mut mem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_sequence_is_neutral() {
        let seq = Sequence::new().then(CoordinateOperation::Identity);
        let out = run(&seq, (1.0, 2.0, 3.0)).unwrap();
        assert_eq!(out, (1.0, 2.0, 3.0));
    }

    #[test]
    fn sequence_inverse_round_trips() {
        let seq = Sequence::new()
            .then(CoordinateOperation::LongitudeRotation(0.2))
            .then(CoordinateOperation::Translation3D(Translation3D::new(10.0, -5.0, 2.0)));
        let p = (0.3, 0.4, 0.0);
        let fwd = run(&seq, p).unwrap();
        let back = run_inverse(&seq, fwd).unwrap();
        assert_abs_diff_eq!(back.0, p.0, epsilon = 1e-9);
        assert_abs_diff_eq!(back.1, p.1, epsilon = 1e-9);
        assert_abs_diff_eq!(back.2, p.2, epsilon = 1e-9);
    }

    #[test]
    fn sequence_composition_is_associative_in_effect() {
        let a = Sequence::new().then(CoordinateOperation::LongitudeRotation(0.1));
        let b = Sequence::new().then(CoordinateOperation::Translation3D(Translation3D::new(1.0, 2.0, 3.0)));
        let c = Sequence::new().then(CoordinateOperation::SignFlip(SignFlip::new(true, false, false)));

        let left = a.clone().compose(b.clone()).compose(c.clone());
        let right = a.compose(b.compose(c));

        let p = (0.5, -0.2, 1.0);
        assert_eq!(run(&left, p).unwrap(), run(&right, p).unwrap());
    }
}
