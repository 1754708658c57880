//!
//! Prime meridians
//!

/// A prime meridian, expressed as an angular offset east of Greenwich.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PrimeMeridian {
    pub name: &'static str,
    /// Longitude of this meridian from Greenwich, in radians.
    pub longitude_from_greenwich: f64,
}

impl PrimeMeridian {
    pub const fn new(name: &'static str, longitude_from_greenwich: f64) -> Self {
        Self {
            name,
            longitude_from_greenwich,
        }
    }

    pub const GREENWICH: PrimeMeridian = PrimeMeridian::new("Greenwich", 0.0);
}

macro_rules! dms_rad {
    ($d:expr, $m:expr, $s:expr) => {
        ($d as f64 + $m as f64 / 60.0 + $s as f64 / 3600.0) * std::f64::consts::PI / 180.0
    };
}

pub const GREENWICH: PrimeMeridian = PrimeMeridian::GREENWICH;
pub const LISBON: PrimeMeridian = PrimeMeridian::new("Lisbon", dms_rad!(-9, 7, 54.862));
pub const PARIS: PrimeMeridian = PrimeMeridian::new("Paris", dms_rad!(2, 20, 14.025));
pub const BOGOTA: PrimeMeridian = PrimeMeridian::new("Bogota", dms_rad!(-74, 4, 51.3));
pub const MADRID: PrimeMeridian = PrimeMeridian::new("Madrid", dms_rad!(-3, 41, 16.58));
pub const ROME: PrimeMeridian = PrimeMeridian::new("Rome", dms_rad!(12, 27, 8.4));
pub const BERN: PrimeMeridian = PrimeMeridian::new("Bern", dms_rad!(7, 26, 22.5));
pub const JAKARTA: PrimeMeridian = PrimeMeridian::new("Jakarta", dms_rad!(106, 48, 27.79));
pub const FERRO: PrimeMeridian = PrimeMeridian::new("Ferro", -17.666_666_666_666_668 * std::f64::consts::PI / 180.0);
pub const BRUSSELS: PrimeMeridian = PrimeMeridian::new("Brussels", dms_rad!(4, 22, 4.71));
pub const STOCKHOLM: PrimeMeridian = PrimeMeridian::new("Stockholm", dms_rad!(18, 3, 29.8));
pub const ATHENS: PrimeMeridian = PrimeMeridian::new("Athens", dms_rad!(23, 42, 58.815));
pub const OSLO: PrimeMeridian = PrimeMeridian::new("Oslo", dms_rad!(10, 43, 22.5));

/// Look up a built-in prime meridian by name (case-insensitive).
pub fn find_prime_meridian(name: &str) -> Option<PrimeMeridian> {
    let n = name.to_ascii_lowercase();
    Some(match n.as_str() {
        "greenwich" => GREENWICH,
        "lisbon" => LISBON,
        "paris" => PARIS,
        "bogota" => BOGOTA,
        "madrid" => MADRID,
        "rome" => ROME,
        "bern" => BERN,
        "jakarta" => JAKARTA,
        "ferro" => FERRO,
        "brussels" => BRUSSELS,
        "stockholm" => STOCKHOLM,
        "athens" => ATHENS,
        "oslo" => OSLO,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn greenwich_is_zero() {
        assert_eq!(GREENWICH.longitude_from_greenwich, 0.0);
    }

    #[test]
    fn paris_matches_known_value() {
        assert_abs_diff_eq!(PARIS.longitude_from_greenwich.to_degrees(), 2.337_229_166_666_667, epsilon = 1e-9);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(find_prime_meridian("PARIS"), Some(PARIS));
        assert_eq!(find_prime_meridian("unknown"), None);
    }
}
