//!
//! Quantity-tagged scalars and linear unit conversion
//!
//! A [`Measure`] pairs a raw `f64` with the [`Unit`] it is expressed in.
//! Conversion between units of the same [`Quantity`] is always well defined;
//! conversion across quantities is an error rather than a silent no-op.
//!

use crate::error::{Error, Result};

/// The physical quantity a [`Unit`] measures.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Quantity {
    Angle,
    Length,
    Time,
    Scale,
}

/// A unit of measure: `base = value * scale + offset`.
#[derive(Debug, Copy, Clone)]
pub struct Unit {
    pub quantity: Quantity,
    pub scale: f64,
    pub offset: f64,
    pub name: &'static str,
    pub symbol: &'static str,
}

impl Unit {
    pub const fn new(
        quantity: Quantity,
        scale: f64,
        offset: f64,
        name: &'static str,
        symbol: &'static str,
    ) -> Self {
        Self {
            quantity,
            scale,
            offset,
            name,
            symbol,
        }
    }

    #[inline]
    pub fn to_base(&self, v: f64) -> f64 {
        v * self.scale + self.offset
    }

    #[inline]
    pub fn from_base(&self, v: f64) -> f64 {
        (v - self.offset) / self.scale
    }

    /// Convert a value expressed in `self` into a value expressed in `other`.
    ///
    /// Both units must share the same [`Quantity`].
    pub fn convert(&self, v: f64, other: &Unit) -> Result<f64> {
        if self.quantity != other.quantity {
            return Err(Error::IncompatibleUnit {
                have: self.symbol.into(),
                need: other.symbol.into(),
            });
        }
        Ok(other.from_base(self.to_base(v)))
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.quantity == other.quantity && self.symbol == other.symbol
    }
}

pub const RADIAN: Unit = Unit::new(Quantity::Angle, 1.0, 0.0, "radian", "rad");
pub const DEGREE: Unit = Unit::new(
    Quantity::Angle,
    std::f64::consts::PI / 180.0,
    0.0,
    "degree",
    "deg",
);
pub const GRAD: Unit = Unit::new(
    Quantity::Angle,
    std::f64::consts::PI / 200.0,
    0.0,
    "grad",
    "gon",
);

pub const METER: Unit = Unit::new(Quantity::Length, 1.0, 0.0, "meter", "m");
pub const SECOND: Unit = Unit::new(Quantity::Time, 1.0, 0.0, "second", "s");
pub const UNITY: Unit = Unit::new(Quantity::Scale, 1.0, 0.0, "unity", "");

/// A scalar value tagged with the unit it is expressed in.
#[derive(Debug, Copy, Clone)]
pub struct Measure {
    pub value: f64,
    pub unit: Unit,
}

impl Measure {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// The value expressed in the base unit of this measure's quantity.
    pub fn base_value(&self) -> f64 {
        self.unit.to_base(self.value)
    }

    pub fn to(&self, unit: Unit) -> Result<Measure> {
        Ok(Measure {
            value: self.unit.convert(self.value, &unit)?,
            unit,
        })
    }
}

mod constants {
    use super::*;

    macro_rules! linear_unit {
        ($name:expr, $symbol:expr, $to_meter:expr) => {
            Unit::new(Quantity::Length, $to_meter, 0.0, $name, $symbol)
        };
    }

    /// Linear unit table, `to_meter` scale factors taken from the
    /// PROJ `unit_table`.
    #[rustfmt::skip]
    pub const LINEAR_UNITS: [Unit; 21] = [
        linear_unit!("Kilometer",                    "km",      1000.0),
        linear_unit!("Meter",                         "m",       1.0),
        linear_unit!("Decimeter",                     "dm",      0.1),
        linear_unit!("Centimeter",                    "cm",      0.01),
        linear_unit!("Millimeter",                    "mm",      0.001),
        linear_unit!("International Nautical Mile",   "kmi",     1852.0),
        linear_unit!("International Inch",            "in",      0.0254),
        linear_unit!("International Foot",            "ft",      0.3048),
        linear_unit!("International Yard",            "yd",      0.9144),
        linear_unit!("International Statute Mile",    "mi",      1609.344),
        linear_unit!("International Fathom",          "fath",    1.8288),
        linear_unit!("International Chain",           "ch",      20.1168),
        linear_unit!("International Link",            "link",    0.201168),
        linear_unit!("U.S. Surveyor's Inch",           "us-in",   100.0 / 3937.0),
        linear_unit!("U.S. Surveyor's Foot",           "us-ft",   1200.0 / 3937.0),
        linear_unit!("U.S. Surveyor's Yard",           "us-yd",   3600.0 / 3937.0),
        linear_unit!("U.S. Surveyor's Chain",          "us-ch",   79200.0 / 3937.0),
        linear_unit!("U.S. Surveyor's Statute Mile",   "us-mi",   6336000.0 / 3937.0),
        linear_unit!("Indian Yard",                    "ind-yd",  0.91439523),
        linear_unit!("Indian Foot",                     "ind-ft",  0.30479841),
        linear_unit!("Indian Chain",                    "ind-ch",  20.11669506),
    ];

    #[rustfmt::skip]
    pub const ANGULAR_UNITS: [Unit; 3] = [
        Unit::new(Quantity::Angle, 1.0, 0.0, "radian", "rad"),
        DEGREE,
        GRAD,
    ];
}

/// Find a linear unit by symbol.
pub fn find_linear_unit(symbol: &str) -> Option<Unit> {
    constants::LINEAR_UNITS
        .iter()
        .find(|u| u.symbol.eq_ignore_ascii_case(symbol))
        .copied()
}

/// Find an angular unit by symbol.
pub fn find_angular_unit(symbol: &str) -> Option<Unit> {
    constants::ANGULAR_UNITS
        .iter()
        .find(|u| u.symbol.eq_ignore_ascii_case(symbol))
        .copied()
}

/// Build an anonymous linear unit from a raw `to_meter` scale factor.
pub fn linear_unit_from_scale(to_meter: f64) -> Unit {
    Unit::new(Quantity::Length, to_meter, 0.0, "", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn round_trip_is_bit_equal() {
        let v = 123.456;
        assert_eq!(METER.from_base(METER.to_base(v)), v);
    }

    #[test]
    fn km_to_m() {
        let km = find_linear_unit("km").unwrap();
        assert_abs_diff_eq!(km.to_base(1.0), 1000.0);
    }

    #[test]
    fn cross_quantity_is_error() {
        let m = Measure::new(1.0, METER);
        assert!(m.to(RADIAN).is_err());
    }

    #[test]
    fn degree_to_radian() {
        let m = Measure::new(180.0, DEGREE);
        let r = m.to(RADIAN).unwrap();
        assert_abs_diff_eq!(r.value, std::f64::consts::PI, epsilon = 1e-12);
    }
}
