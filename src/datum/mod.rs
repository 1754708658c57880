//!
//! Geodetic and vertical datums
//!
//! A [`GeodeticDatum`] pins an [`Ellipsoid`] and [`PrimeMeridian`] to the
//! ground, plus a bounding [`Extent`] and the operations known to carry
//! coordinates between it and other datums. Rather than one fixed
//! `towgs84`/`fromwgs84` pair per datum, a full directed multigraph of
//! arbitrary [`CoordinateOperation`]s between named datums is resolved
//! by [`graph::DatumGraph`].
//!

pub mod graph;

use crate::ellipsoid::Ellipsoid;
use crate::operation::CoordinateOperation;
use crate::prime_meridian::PrimeMeridian;

/// Latitude/longitude bounding box, radians, with wraparound: a box may
/// cross the antimeridian (`lon_min > lon_max` means "wraps through
/// ±180°") the same way a 360°/400 gon modulo space does for any other
/// CRS-extent helper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Extent {
    pub const fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// The whole globe; every datum's default extent unless overridden.
    pub const WORLD: Extent = Extent::new(-std::f64::consts::PI, std::f64::consts::PI, -std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2);

    /// Normalize a longitude into `(-pi, pi]`, the modulo space every
    /// extent comparison is done in regardless of how the box itself was
    /// specified.
    fn wrap(lon: f64) -> f64 {
        crate::operation::primitives::adjlon(lon)
    }

    /// Whether `(lon, lat)` (radians) falls inside this box. Handles
    /// antimeridian-crossing boxes (`lon_min > lon_max`) by treating the
    /// longitude test as "outside the gap" rather than "inside the
    /// interval".
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if lat < self.lat_min || lat > self.lat_max {
            return false;
        }
        let lon = Self::wrap(lon);
        let (lo, hi) = (Self::wrap(self.lon_min), Self::wrap(self.lon_max));
        if lo <= hi {
            lon >= lo && lon <= hi
        } else {
            lon >= lo || lon <= hi
        }
    }
}

impl Default for Extent {
    fn default() -> Self {
        Extent::WORLD
    }
}

/// Ellipsoid + prime meridian + extent + the best known direct operation
/// to WGS84. Constructed once; `to_wgs84` may be replaced by later
/// registration. The full directed multigraph of operations between
/// datums (including this one's other edges) lives separately in
/// [`graph::DatumGraph`], not on this struct.
#[derive(Debug, Clone)]
pub struct GeodeticDatum {
    pub name: &'static str,
    pub ellipsoid: Ellipsoid,
    pub prime_meridian: PrimeMeridian,
    pub extent: Extent,
    /// Best known operation straight to WGS84, used by the
    /// via-WGS84 fallback path when no direct edge is registered.
    pub to_wgs84: CoordinateOperation,
}

impl GeodeticDatum {
    pub fn new(name: &'static str, ellipsoid: Ellipsoid, prime_meridian: PrimeMeridian, extent: Extent, to_wgs84: CoordinateOperation) -> Self {
        Self {
            name,
            ellipsoid,
            prime_meridian,
            extent,
            to_wgs84,
        }
    }

    /// Two datums are the same node in the operations graph if they
    /// share a name, or failing that an equal ellipsoid and prime
    /// meridian.
    pub fn is_identical_to(&self, other: &GeodeticDatum) -> bool {
        self.name == other.name || (self.ellipsoid == other.ellipsoid && self.prime_meridian == other.prime_meridian)
    }
}

/// What kind of height a [`VerticalDatum`] measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalDatumKind {
    /// Height is already an ellipsoidal height; no grid conversion needed.
    Ellipsoidal,
    /// Height is an orthometric altitude above a geoid; needs a grid to
    /// reach ellipsoidal height.
    Geoidal,
    Other,
}

/// A vertical datum: what kind of height it measures, and (for
/// non-ellipsoidal kinds) the grid-based converter plus the name of the
/// geodetic datum the grid's lon/lat lookup must be expressed in.
#[derive(Clone)]
pub struct VerticalDatum {
    pub name: &'static str,
    pub kind: VerticalDatumKind,
    pub altitude_to_ellipsoidal_height: Option<std::sync::Arc<crate::grid::vertical::VerticalGrid>>,
    /// The [`GeodeticDatum`] the grid is tabulated against, used by the
    /// compound-CRS Z-memoization dance to decide whether a
    /// horizontal datum shift is needed around the vertical lookup.
    pub associated_datum: Option<GeodeticDatum>,
}

impl VerticalDatum {
    pub const fn ellipsoidal(name: &'static str) -> Self {
        Self {
            name,
            kind: VerticalDatumKind::Ellipsoidal,
            altitude_to_ellipsoidal_height: None,
            associated_datum: None,
        }
    }

    pub fn geoidal(name: &'static str, grid: std::sync::Arc<crate::grid::vertical::VerticalGrid>, associated_datum: GeodeticDatum) -> Self {
        Self {
            name,
            kind: VerticalDatumKind::Geoidal,
            altitude_to_ellipsoidal_height: Some(grid),
            associated_datum: Some(associated_datum),
        }
    }
}

/// Built-in datum table.
pub mod constants {
    use super::*;
    use crate::ellipsoid::constants::{bessel, clrk80ign, grs80, intl, wgs84 as wgs84_ellps};
    use crate::operation::CoordinateOperation;
    use crate::prime_meridian as pm;

    pub fn wgs84() -> GeodeticDatum {
        GeodeticDatum::new("WGS84", wgs84_ellps(), pm::GREENWICH, Extent::WORLD, CoordinateOperation::Identity)
    }

    /// RGF93 shares WGS84's ellipsoid/meridian for all practical
    /// purposes; its `toWGS84` is declared identity.
    pub fn rgf93() -> GeodeticDatum {
        GeodeticDatum::new("RGF93", grs80(), pm::GREENWICH, Extent::WORLD, CoordinateOperation::Identity)
    }

    /// NTF (Clarke 1880 IGN, Paris meridian). No single fixed
    /// `toWGS84` Helmert set is authoritative enough to hardcode here;
    /// callers register the GR3DF97A-backed operation via
    /// [`graph::DatumGraph::add_edge`] instead.
    pub fn ntf() -> GeodeticDatum {
        GeodeticDatum::new(
            "NTF",
            clrk80ign(),
            pm::PARIS,
            Extent::new((-5.5f64).to_radians(), 10.0f64.to_radians(), 41.0f64.to_radians(), 51.5f64.to_radians()),
            CoordinateOperation::Identity,
        )
    }

    pub fn ed50() -> GeodeticDatum {
        use crate::operation::helmert::HelmertParams;
        GeodeticDatum::new(
            "ED50",
            intl(),
            pm::GREENWICH,
            Extent::WORLD,
            CoordinateOperation::Helmert(HelmertParams::translation(-87.0, -98.0, -121.0)),
        )
    }

    pub fn potsdam() -> GeodeticDatum {
        GeodeticDatum::new("Potsdam", bessel(), pm::GREENWICH, Extent::WORLD, CoordinateOperation::Identity)
    }

    pub fn ellipsoidal() -> VerticalDatum {
        VerticalDatum::ellipsoidal("Ellipsoid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_extent_contains_everything() {
        assert!(Extent::WORLD.contains(3.0, 0.5));
        assert!(Extent::WORLD.contains(-3.1, -1.0));
    }

    #[test]
    fn antimeridian_crossing_extent() {
        // Fiji-like box: 178E to -178E (i.e. 182E), crossing the dateline.
        let e = Extent::new(178f64.to_radians(), (-178f64).to_radians(), -20f64.to_radians(), -10f64.to_radians());
        assert!(e.contains(179f64.to_radians(), -15f64.to_radians()));
        assert!(e.contains((-179f64).to_radians(), -15f64.to_radians()));
        assert!(!e.contains(0.0, -15f64.to_radians()));
    }

    #[test]
    fn datums_compare_by_name_or_by_shape() {
        let a = constants::wgs84();
        let mut b = constants::wgs84();
        b.name = "WGS84-clone";
        assert!(a.is_identical_to(&b));

        let ntf = constants::ntf();
        assert!(!a.is_identical_to(&ntf));
    }
}
