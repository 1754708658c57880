//!
//! Helmert transformations: 3-parameter translation and 7-parameter
//! similarity (rotation + scale), both sign conventions.
//!
//! A similarity transform's inverse can be computed either way: the
//! exact 3x3 matrix inverse, or the cheaper linearized negate-and-
//! transpose shortcut valid only at small rotation angles. `precision()`
//! reflects the difference so the datum planner prefers the exact form
//! when both are registered for the same pair.
//!

use crate::error::{Error, Result};
use crate::operation::Coord3;

/// Which sign convention the rotation angles use. EPSG calls these
/// "position vector" (dataset 9606) and "coordinate frame" (9607); they
/// differ only by the sign of the rotation angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationConvention {
    PositionVector,
    CoordinateFrame,
}

#[derive(Debug, Clone, Copy)]
pub enum HelmertParams {
    Translation {
        dx: f64,
        dy: f64,
        dz: f64,
    },
    Similarity {
        dx: f64,
        dy: f64,
        dz: f64,
        /// Rotation angles, radians.
        rx: f64,
        ry: f64,
        rz: f64,
        /// Scale factor as a ratio (1.0 = no scaling; typically `1 + ppm*1e-6`).
        scale: f64,
        convention: RotationConvention,
        /// When true, `inverse()` uses the negate-and-transpose
        /// approximation (run `forward()` with negated translation,
        /// rotation and scale) instead of the exact matrix inverse.
        /// Cheaper, and the error it introduces is itself a function of
        /// rotation magnitude — see [`Self::precision`].
        linearized: bool,
    },
}

impl HelmertParams {
    pub const fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::Translation { dx, dy, dz }
    }

    #[allow(clippy::too_many_arguments)]
    pub const fn similarity(
        dx: f64,
        dy: f64,
        dz: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        scale_ppm: f64,
        convention: RotationConvention,
    ) -> Self {
        Self::similarity_with_mode(dx, dy, dz, rx, ry, rz, scale_ppm, convention, false)
    }

    /// As [`Self::similarity`], but lets the caller pick the linearized
    /// inverse (cheap, degrades with rotation magnitude) over the
    /// default exact matrix inverse.
    #[allow(clippy::too_many_arguments)]
    pub const fn similarity_with_mode(
        dx: f64,
        dy: f64,
        dz: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        scale_ppm: f64,
        convention: RotationConvention,
        linearized: bool,
    ) -> Self {
        Self::Similarity {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
            scale: 1.0 + scale_ppm * 1.0e-6,
            convention,
            linearized,
        }
    }

    /// 3x3 rotation matrix in row-major order, for the given convention.
    fn matrix(rx: f64, ry: f64, rz: f64, convention: RotationConvention) -> [[f64; 3]; 3] {
        let (rx, ry, rz) = match convention {
            RotationConvention::PositionVector => (rx, ry, rz),
            RotationConvention::CoordinateFrame => (-rx, -ry, -rz),
        };
        [[1.0, -rz, ry], [rz, 1.0, -rx], [-ry, rx, 1.0]]
    }

    fn apply_matrix(m: &[[f64; 3]; 3], v: Coord3) -> Coord3 {
        (
            m[0][0] * v.0 + m[0][1] * v.1 + m[0][2] * v.2,
            m[1][0] * v.0 + m[1][1] * v.1 + m[1][2] * v.2,
            m[2][0] * v.0 + m[2][1] * v.1 + m[2][2] * v.2,
        )
    }

    fn invert3(m: &[[f64; 3]; 3]) -> Result<[[f64; 3]; 3]> {
        let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
        if det.abs() < 1e-30 {
            return Err(Error::ToleranceConditionError);
        }
        let inv_det = 1.0 / det;
        Ok([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ])
    }

    pub fn forward(&self, c: Coord3) -> Result<Coord3> {
        match *self {
            HelmertParams::Translation { dx, dy, dz } => Ok((c.0 + dx, c.1 + dy, c.2 + dz)),
            HelmertParams::Similarity {
                dx,
                dy,
                dz,
                rx,
                ry,
                rz,
                scale,
                convention,
                ..
            } => {
                let m = Self::matrix(rx, ry, rz, convention);
                let (x, y, z) = Self::apply_matrix(&m, c);
                Ok((dx + scale * x, dy + scale * y, dz + scale * z))
            }
        }
    }

    pub fn inverse(&self, c: Coord3) -> Result<Coord3> {
        match *self {
            HelmertParams::Translation { dx, dy, dz } => Ok((c.0 - dx, c.1 - dy, c.2 - dz)),
            HelmertParams::Similarity {
                dx,
                dy,
                dz,
                rx,
                ry,
                rz,
                scale,
                convention,
                linearized,
            } => {
                if linearized {
                    // Negate-and-transpose shortcut: for small rotation
                    // angles R(-r) approximates R(r)^T, so running
                    // `forward` with every parameter negated (scale
                    // mirrored around 1.0) stands in for the exact
                    // matrix inverse.
                    let negated = HelmertParams::Similarity {
                        dx: -dx,
                        dy: -dy,
                        dz: -dz,
                        rx: -rx,
                        ry: -ry,
                        rz: -rz,
                        scale: 2.0 - scale,
                        convention,
                        linearized,
                    };
                    negated.forward(c)
                } else {
                    let m = Self::matrix(rx, ry, rz, convention);
                    let inv = Self::invert3(&m)?;
                    let unscaled = ((c.0 - dx) / scale, (c.1 - dy) / scale, (c.2 - dz) / scale);
                    Ok(Self::apply_matrix(&inv, unscaled))
                }
            }
        }
    }

    /// Estimated worst-case error in meters, used by the datum planner
    /// to rank candidate paths (lower is better). Plain translation is
    /// the crudest real correction; a similarity transform with the
    /// exact matrix inverse is the most accurate Helmert form available.
    /// The linearized inverse degrades that estimate as rotation
    /// magnitude grows, since the negate-and-transpose shortcut it uses
    /// is only a small-angle approximation of the true inverse.
    pub fn precision(&self) -> f64 {
        match self {
            HelmertParams::Translation { .. } => 1.0,
            HelmertParams::Similarity {
                rx, ry, rz, linearized, ..
            } => {
                const EXACT: f64 = 0.1;
                if !linearized {
                    return EXACT;
                }
                let total_rotation = rx.abs() + ry.abs() + rz.abs();
                let factor = if total_rotation >= 1e-3 {
                    0.1
                } else if total_rotation >= 1e-4 {
                    0.5
                } else {
                    0.9
                };
                EXACT / factor
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn translation_round_trips() {
        let h = HelmertParams::translation(100.0, -200.0, 50.0);
        let p = (4_000_000.0, 200_000.0, 4_800_000.0);
        let fwd = h.forward(p).unwrap();
        let back = h.inverse(fwd).unwrap();
        assert_abs_diff_eq!(back.0, p.0, epsilon = 1e-6);
        assert_abs_diff_eq!(back.1, p.1, epsilon = 1e-6);
        assert_abs_diff_eq!(back.2, p.2, epsilon = 1e-6);
    }

    #[test]
    fn similarity_round_trips_within_tolerance() {
        // NTF -> RGF93-ish 7-parameter set, arcsecond-scale rotations.
        let arcsec = std::f64::consts::PI / (180.0 * 3600.0);
        let h = HelmertParams::similarity(
            -168.0,
            -60.0,
            320.0,
            0.0,
            0.0,
            0.554 * arcsec,
            1.0,
            RotationConvention::PositionVector,
        );
        let p = (4_201_000.0, 177_000.0, 4_779_000.0);
        let fwd = h.forward(p).unwrap();
        let back = h.inverse(fwd).unwrap();
        assert_abs_diff_eq!(back.0, p.0, epsilon = 1e-6);
        assert_abs_diff_eq!(back.1, p.1, epsilon = 1e-6);
        assert_abs_diff_eq!(back.2, p.2, epsilon = 1e-6);
    }

    #[test]
    fn linearized_inverse_round_trips_for_small_rotations() {
        let arcsec = std::f64::consts::PI / (180.0 * 3600.0);
        let h = HelmertParams::similarity_with_mode(
            -168.0,
            -60.0,
            320.0,
            0.0,
            0.0,
            0.554 * arcsec,
            1.0,
            RotationConvention::PositionVector,
            true,
        );
        let p = (4_201_000.0, 177_000.0, 4_779_000.0);
        let fwd = h.forward(p).unwrap();
        let back = h.inverse(fwd).unwrap();
        // Small-angle shortcut, not exact: tolerance is looser than the
        // exact-inverse round trip above.
        assert_abs_diff_eq!(back.0, p.0, epsilon = 1e-3);
        assert_abs_diff_eq!(back.1, p.1, epsilon = 1e-3);
        assert_abs_diff_eq!(back.2, p.2, epsilon = 1e-3);
    }

    #[test]
    fn precision_degrades_with_rotation_magnitude_only_when_linearized() {
        let exact = HelmertParams::similarity(0.0, 0.0, 0.0, 2e-3, 0.0, 0.0, 0.0, RotationConvention::PositionVector);
        assert_abs_diff_eq!(exact.precision(), 0.1);

        let small = HelmertParams::similarity_with_mode(0.0, 0.0, 0.0, 1e-5, 0.0, 0.0, 0.0, RotationConvention::PositionVector, true);
        let mid = HelmertParams::similarity_with_mode(0.0, 0.0, 0.0, 5e-4, 0.0, 0.0, 0.0, RotationConvention::PositionVector, true);
        let large = HelmertParams::similarity_with_mode(0.0, 0.0, 0.0, 2e-3, 0.0, 0.0, 0.0, RotationConvention::PositionVector, true);
        assert!(small.precision() < mid.precision());
        assert!(mid.precision() < large.precision());
    }

    #[test]
    fn conventions_differ_in_rotation_sign() {
        let p = (1.0, 0.0, 0.0);
        let pv = HelmertParams::similarity(0.0, 0.0, 0.0, 0.0, 0.0, 0.1, 0.0, RotationConvention::PositionVector);
        let cf = HelmertParams::similarity(0.0, 0.0, 0.0, 0.0, 0.0, 0.1, 0.0, RotationConvention::CoordinateFrame);
        let a = pv.forward(p).unwrap();
        let b = cf.forward(p).unwrap();
        assert!((a.1 - (-b.1)).abs() < 1e-12);
    }
}
