//!
//! Coordinate reference systems
//!
//! A [`Crs`] is an explicit tagged union of CRS kinds, each carrying its
//! own [`CoordinateSystem`] and datum, whose transformation pipelines
//! are *built* by [`pipeline`] from the composable operations of
//! [`crate::operation`] rather than hand-written once per kind.
//!

pub mod compound;
pub mod pipeline;
pub mod planner;

use crate::datum::{GeodeticDatum, VerticalDatum};
use crate::error::{Error, Result};
use crate::measure::Unit;
use crate::projections::Projection;

/// Which way along an axis positive values point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    East,
    West,
    North,
    South,
    Up,
    Down,
}

impl AxisDirection {
    /// Whether this axis needs a sign flip to reach the canonical
    /// positive-East/North/Up convention.
    pub fn needs_sign_flip(self) -> bool {
        matches!(self, AxisDirection::West | AxisDirection::South | AxisDirection::Down)
    }

    pub fn is_horizontal_first(self) -> bool {
        matches!(self, AxisDirection::East | AxisDirection::West)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Axis {
    pub direction: AxisDirection,
    pub name: &'static str,
}

impl Axis {
    pub const fn new(direction: AxisDirection, name: &'static str) -> Self {
        Self { direction, name }
    }
}

/// Ordered `(Axis, Unit)` pairs describing how raw coordinate components
/// map to physical axes.
#[derive(Debug, Clone)]
pub struct CoordinateSystem(pub Vec<(Axis, Unit)>);

impl CoordinateSystem {
    pub fn new(axes: Vec<(Axis, Unit)>) -> Self {
        Self(axes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The two-axis, east-then-north, metre/degree CS most CRSs use.
    pub fn planar(unit0: Unit, name0: &'static str, unit1: Unit, name1: &'static str) -> Self {
        Self(vec![
            (Axis::new(AxisDirection::East, name0), unit0),
            (Axis::new(AxisDirection::North, name1), unit1),
        ])
    }

    pub fn geographic_2d(angular: Unit) -> Self {
        Self::planar(angular, "Longitude", angular, "Latitude")
    }

    pub fn geographic_3d(angular: Unit, linear: Unit) -> Self {
        let mut cs = Self::geographic_2d(angular);
        cs.0.push((Axis::new(AxisDirection::Up, "Ellipsoidal height"), linear));
        cs
    }

    pub fn geocentric(linear: Unit) -> Self {
        Self(vec![
            (Axis::new(AxisDirection::East, "X"), linear),
            (Axis::new(AxisDirection::North, "Y"), linear),
            (Axis::new(AxisDirection::Up, "Z"), linear),
        ])
    }
}

/// A coordinate reference system: its [`CoordinateSystem`] plus the
/// datum (and, for [`Crs::Projected`], the projection) that gives its
/// numbers meaning.
#[derive(Clone)]
pub enum Crs {
    Geocentric { cs: CoordinateSystem, datum: GeodeticDatum },
    Geographic2D { cs: CoordinateSystem, datum: GeodeticDatum },
    Geographic3D { cs: CoordinateSystem, datum: GeodeticDatum },
    Projected { cs: CoordinateSystem, datum: GeodeticDatum, projection: Projection },
    Vertical { cs: CoordinateSystem, datum: VerticalDatum },
    Compound { horizontal: Box<Crs>, vertical: Box<Crs> },
}

impl Crs {
    /// Build a compound CRS, enforcing the invariant that its
    /// horizontal component is Projected or Geographic2D.
    pub fn compound(horizontal: Crs, vertical: Crs) -> Result<Crs> {
        match &horizontal {
            Crs::Projected { .. } | Crs::Geographic2D { .. } => {}
            _ => return Err(Error::InvalidCompoundComponent),
        }
        if !matches!(vertical, Crs::Vertical { .. }) {
            return Err(Error::InvalidCompoundComponent);
        }
        Ok(Crs::Compound {
            horizontal: Box::new(horizontal),
            vertical: Box::new(vertical),
        })
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        match self {
            Crs::Geocentric { cs, .. }
            | Crs::Geographic2D { cs, .. }
            | Crs::Geographic3D { cs, .. }
            | Crs::Projected { cs, .. }
            | Crs::Vertical { cs, .. } => cs,
            Crs::Compound { horizontal, .. } => horizontal.coordinate_system(),
        }
    }

    /// The geodetic datum governing the horizontal component, if any
    /// (absent only for a bare [`Crs::Vertical`]).
    pub fn geodetic_datum(&self) -> Option<&GeodeticDatum> {
        match self {
            Crs::Geocentric { datum, .. } | Crs::Geographic2D { datum, .. } | Crs::Geographic3D { datum, .. } | Crs::Projected { datum, .. } => Some(datum),
            Crs::Vertical { .. } => None,
            Crs::Compound { horizontal, .. } => horizontal.geodetic_datum(),
        }
    }

    pub fn vertical_datum(&self) -> Option<&VerticalDatum> {
        match self {
            Crs::Vertical { datum, .. } => Some(datum),
            Crs::Compound { vertical, .. } => vertical.vertical_datum(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::constants::{ellipsoidal, wgs84};
    use crate::measure::{DEGREE, METER};

    #[test]
    fn compound_requires_projected_or_geographic2d_horizontal() {
        let geog3d = Crs::Geographic3D {
            cs: CoordinateSystem::geographic_3d(DEGREE, METER),
            datum: wgs84(),
        };
        let vert = Crs::Vertical {
            cs: CoordinateSystem(vec![(Axis::new(AxisDirection::Up, "H"), METER)]),
            datum: ellipsoidal(),
        };
        assert!(Crs::compound(geog3d, vert).is_err());
    }

    #[test]
    fn compound_accepts_geographic2d_horizontal() {
        let geog2d = Crs::Geographic2D {
            cs: CoordinateSystem::geographic_2d(DEGREE),
            datum: wgs84(),
        };
        let vert = Crs::Vertical {
            cs: CoordinateSystem(vec![(Axis::new(AxisDirection::Up, "H"), METER)]),
            datum: ellipsoidal(),
        };
        assert!(Crs::compound(geog2d, vert).is_ok());
    }
}
