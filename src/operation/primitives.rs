//!
//! Primitive, composable coordinate operations
//!
//! Each of these is one step a coordinate pipeline composes (axis
//! adjustment, sign flips, longitude rotation, unit scaling) as a
//! standalone, invertible operation object instead of inline code.
//!

use crate::error::Result;
use crate::measure::Unit;
use crate::operation::{Coord3, Direction};

/// Normalize a longitude into `(-pi, pi]`.
pub fn adjlon(mut lon: f64) -> f64 {
    if lon.abs() <= std::f64::consts::PI {
        return lon;
    }
    lon += std::f64::consts::PI;
    lon -= 2.0 * std::f64::consts::PI * (lon / (2.0 * std::f64::consts::PI)).floor();
    lon - std::f64::consts::PI
}

/// A fixed 3-vector offset, its own inverse under negation.
#[derive(Debug, Clone, Copy)]
pub struct Translation3D {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Translation3D {
    pub const fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    pub fn apply(&self, c: Coord3, dir: Direction) -> Result<Coord3> {
        let s = if dir == Direction::Forward { 1.0 } else { -1.0 };
        Ok((c.0 + s * self.dx, c.1 + s * self.dy, c.2 + s * self.dz))
    }
}

/// Per-axis sign flip, its own inverse.
#[derive(Debug, Clone, Copy)]
pub struct SignFlip {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl SignFlip {
    pub const fn new(x: bool, y: bool, z: bool) -> Self {
        Self { x, y, z }
    }

    pub fn apply(&self, c: Coord3) -> Result<Coord3> {
        let f = |flip: bool, v: f64| if flip { -v } else { v };
        Ok((f(self.x, c.0), f(self.y, c.1), f(self.z, c.2)))
    }
}

/// Change between 2D and 3D representations: forward drops/zeroes the Z
/// component per `to`, inverse restores the Z dimensionality of `from`.
#[derive(Debug, Clone, Copy)]
pub struct DimensionChange {
    pub from: usize,
    pub to: usize,
}

impl DimensionChange {
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    pub fn apply(&self, c: Coord3, dir: Direction) -> Result<Coord3> {
        let target = if dir == Direction::Forward { self.to } else { self.from };
        Ok(if target >= 3 { c } else { (c.0, c.1, 0.0) })
    }
}

/// Convert the horizontal (x, y) pair between two linear/angular units;
/// Z is left untouched (vertical unit conversion is a separate step).
#[derive(Debug, Clone, Copy)]
pub struct UnitConversion {
    pub from: Unit,
    pub to: Unit,
}

impl UnitConversion {
    pub const fn new(from: Unit, to: Unit) -> Self {
        Self { from, to }
    }

    pub fn apply(&self, c: Coord3, dir: Direction) -> Result<Coord3> {
        let (src, dst) = if dir == Direction::Forward {
            (&self.from, &self.to)
        } else {
            (&self.to, &self.from)
        };
        Ok((src.convert(c.0, dst)?, src.convert(c.1, dst)?, c.2))
    }
}

/// Convert only the vertical (Z) component between two units, leaving
/// (x, y) untouched — a height value scales independently of the
/// horizontal pair.
#[derive(Debug, Clone, Copy)]
pub struct VerticalUnitConversion {
    pub from: Unit,
    pub to: Unit,
}

impl VerticalUnitConversion {
    pub const fn new(from: Unit, to: Unit) -> Self {
        Self { from, to }
    }

    pub fn apply(&self, c: Coord3, dir: Direction) -> Result<Coord3> {
        let (src, dst) = if dir == Direction::Forward {
            (&self.from, &self.to)
        } else {
            (&self.to, &self.from)
        };
        Ok((c.0, c.1, src.convert(c.2, dst)?))
    }
}

/// Reorder and/or flip the three axes (e.g. `(lon, lat)` vs `(lat, lon)`,
/// `up` vs `down`). `order[i]` names which source axis feeds output
/// axis `i`; `flip[i]` negates it.
#[derive(Debug, Clone, Copy)]
pub struct AxisSwap {
    pub order: [usize; 3],
    pub flip: [bool; 3],
}

impl AxisSwap {
    pub const fn new(order: [usize; 3], flip: [bool; 3]) -> Self {
        Self { order, flip }
    }

    pub const fn identity() -> Self {
        Self::new([0, 1, 2], [false, false, false])
    }

    fn get(c: Coord3, i: usize) -> f64 {
        match i {
            0 => c.0,
            1 => c.1,
            _ => c.2,
        }
    }

    pub fn apply(&self, c: Coord3, dir: Direction) -> Result<Coord3> {
        let at = |i: usize| {
            let v = Self::get(c, self.order[i]);
            if self.flip[i] {
                -v
            } else {
                v
            }
        };
        let out = (at(0), at(1), at(2));
        if dir == Direction::Forward {
            Ok(out)
        } else {
            // Invert the permutation: find where each source axis landed.
            let mut inv = [0usize; 3];
            for (i, &o) in self.order.iter().enumerate() {
                inv[o] = i;
            }
            let at_inv = |i: usize| {
                let v = Self::get(c, inv[i]);
                if self.flip[inv[i]] {
                    -v
                } else {
                    v
                }
            };
            Ok((at_inv(0), at_inv(1), at_inv(2)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{DEGREE, METER, RADIAN};
    use approx::assert_abs_diff_eq;

    #[test]
    fn translation_round_trips() {
        let t = Translation3D::new(1.0, -2.0, 3.0);
        let p = (0.0, 0.0, 0.0);
        let fwd = t.apply(p, Direction::Forward).unwrap();
        let back = t.apply(fwd, Direction::Inverse).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn sign_flip_is_involutive() {
        let f = SignFlip::new(true, false, true);
        let p = (1.0, 2.0, 3.0);
        let once = f.apply(p).unwrap();
        let twice = f.apply(once).unwrap();
        assert_eq!(twice, p);
    }

    #[test]
    fn unit_conversion_round_trips() {
        let u = UnitConversion::new(DEGREE, RADIAN);
        let p = (180.0, 90.0, 0.0);
        let fwd = u.apply(p, Direction::Forward).unwrap();
        assert_abs_diff_eq!(fwd.0, std::f64::consts::PI, epsilon = 1e-12);
        let back = u.apply(fwd, Direction::Inverse).unwrap();
        assert_abs_diff_eq!(back.0, p.0, epsilon = 1e-9);
        let _ = METER;
    }

    #[test]
    fn vertical_unit_conversion_round_trips() {
        let v = VerticalUnitConversion::new(crate::measure::find_linear_unit("ft").unwrap(), METER);
        let p = (1.0, 2.0, 100.0);
        let fwd = v.apply(p, Direction::Forward).unwrap();
        assert_abs_diff_eq!(fwd.2, 30.48, epsilon = 1e-6);
        let back = v.apply(fwd, Direction::Inverse).unwrap();
        assert_abs_diff_eq!(back.2, p.2, epsilon = 1e-9);
    }

    #[test]
    fn axis_swap_round_trips() {
        let swap = AxisSwap::new([1, 0, 2], [false, false, false]);
        let p = (1.0, 2.0, 3.0);
        let fwd = swap.apply(p, Direction::Forward).unwrap();
        assert_eq!(fwd, (2.0, 1.0, 3.0));
        let back = swap.apply(fwd, Direction::Inverse).unwrap();
        assert_eq!(back, p);
    }
}
