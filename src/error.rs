//!
//! Crate errors
//!

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("coordinate has {got} components, operation needs {needed}")]
    CoordinateDimension { got: usize, needed: usize },
    #[error("point ({lon}, {lat}) is outside the extent of '{extent}'")]
    OutOfExtent {
        lon: f64,
        lat: f64,
        extent: String,
    },
    #[error("operation '{op_name}' has no inverse")]
    NonInvertible { op_name: &'static str },
    #[error("iteration in '{op}' failed to converge after {iterations} steps")]
    IterationDiverged { op: &'static str, iterations: usize },
    #[error("unknown or invalid value '{value}' for parameter '{key}'")]
    UnknownParameter { key: String, value: String },
    #[error("failed to load grid resource '{name}': {cause}")]
    GridLoad { name: String, cause: String },
    #[error("cannot convert from unit '{have}' to '{need}': incompatible quantities")]
    IncompatibleUnit { have: String, need: String },

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("no value for parameter '{0}'")]
    NoValueParameter(String),
    #[error("cannot parse value for parameter '{name}': {reason}")]
    ParameterValueError { name: String, reason: String },
    #[error("missing projection name")]
    MissingProjectionError,
    #[error("unrecognized datum")]
    InvalidDatum,
    #[error("unrecognized ellipsoid")]
    InvalidEllipsoid,
    #[error("unrecognized projection '{0}'")]
    UnknownProjection(String),
    #[error("{0}")]
    InvalidParameterValue(&'static str),
    #[error("latitude out of range")]
    LatitudeOutOfRange,
    #[error("invalid 'towgs84' string")]
    InvalidToWGS84String,
    #[error("invalid axis specification")]
    InvalidAxis,
    #[error("coordinate value is NaN")]
    NanCoordinateValue,
    #[error("coordinate out of range")]
    CoordinateOutOfRange,
    #[error("standard parallels cannot be equal and on opposite sides of the equator")]
    ConicLatEqual,
    #[error("tolerance condition error")]
    ToleranceConditionError,
    #[error("point lies outside the nadgrid shift area")]
    PointOutsideNadShiftArea,
    #[error("no grid available for '{0}'")]
    NadGridNotAvailable,
    #[error("I/O error reading grid: {0}")]
    Io(String),

    #[error("no datum operation path found between the two datums")]
    NoDatumPath,
    #[error("compound CRS requires a Projected or Geographic2D horizontal component")]
    InvalidCompoundComponent,
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
