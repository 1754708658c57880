//!
//! Parameter ingestion seam
//!
//! `ParameterMap` is the trait every concrete parameter source (the
//! shipped proj-string parser, or a caller-provided WKT/EPSG-table-backed
//! source) implements. Ellipsoid/projection/datum construction only ever
//! goes through this trait, never through the proj-string parser
//! directly, so a caller who already has a parsed CRS description can
//! feed it in without round-tripping through text.
//!

use std::str::FromStr as StdFromStr;

use crate::error::{Error, Result};

/// A single `key[=value]` parameter, borrowed from the input it was
/// parsed out of.
#[derive(Debug, Clone, Copy)]
pub struct Parameter<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> Parameter<'a> {
    fn try_value<F: StdFromStr>(&self) -> Result<F> {
        match self.value {
            None => Err(Error::NoValueParameter(self.name.into())),
            Some(v) => v.parse::<F>().map_err(|_| Error::ParameterValueError {
                name: self.name.into(),
                reason: format!("cannot parse '{v}'"),
            }),
        }
    }

    pub fn try_f64(&self) -> Result<f64> {
        self.try_value::<f64>()
    }

    pub fn try_i32(&self) -> Result<i32> {
        self.try_value::<i32>()
    }

    pub fn as_str(&self) -> Result<&'a str> {
        self.value
            .ok_or_else(|| Error::NoValueParameter(self.name.into()))
    }

    /// Numeric value assumed to be in decimal degrees, returned in
    /// radians.
    pub fn try_angular_value(&self) -> Result<f64> {
        self.try_f64().map(f64::to_radians)
    }

    /// A bare flag (`+foo`) is `true`; `+foo=true`/`+foo=false` parse the
    /// explicit value; an absent parameter is `false`.
    pub fn check_option(&self) -> Result<bool> {
        match self.value {
            None => Ok(true),
            Some(v) => v.parse::<bool>().map_err(|_| Error::ParameterValueError {
                name: self.name.into(),
                reason: format!("'{v}' is not a boolean"),
            }),
        }
    }
}

/// Source of named parameters for building ellipsoids, projections,
/// datums and CRS components.
pub trait ParameterMap {
    fn get(&self, name: &str) -> Option<Parameter<'_>>;

    fn check_option(&self, name: &str) -> Result<bool> {
        self.get(name).map(|p| p.check_option()).unwrap_or(Ok(false))
    }

    fn try_f64(&self, name: &str) -> Result<Option<f64>> {
        self.get(name).map(|p| p.try_f64()).transpose()
    }

    fn try_i32(&self, name: &str) -> Result<Option<i32>> {
        self.get(name).map(|p| p.try_i32()).transpose()
    }

    fn try_angular_value(&self, name: &str) -> Result<Option<f64>> {
        self.get(name).map(|p| p.try_angular_value()).transpose()
    }

    fn as_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|p| p.value)
    }

    fn require_f64(&self, name: &str) -> Result<f64> {
        self.try_f64(name)?
            .ok_or_else(|| Error::NoValueParameter(name.into()))
    }
}

/// An in-memory parameter list, the concrete backing for the shipped
/// proj-string parser.
#[derive(Debug, Default)]
pub struct ProjStringParams<'a>(Vec<Parameter<'a>>);

impl<'a> ProjStringParams<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &Parameter<'a>> {
        self.0.iter()
    }
}

impl<'a> ParameterMap for ProjStringParams<'a> {
    fn get(&self, name: &str) -> Option<Parameter<'_>> {
        self.0.iter().find(|p| p.name == name).copied()
    }
}

impl<'a> FromIterator<Parameter<'a>> for ProjStringParams<'a> {
    fn from_iter<I: IntoIterator<Item = Parameter<'a>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projstring::parse;

    #[test]
    fn check_options() {
        let params = parse("+foo +bar=true +baz=false").unwrap();
        assert!(params.check_option("foo").unwrap());
        assert!(params.check_option("bar").unwrap());
        assert!(!params.check_option("baz").unwrap());
        assert!(!params.check_option("missing").unwrap());
    }

    #[test]
    fn numeric_values() {
        let params = parse("+a=6378137.0 +rf=298.257223563").unwrap();
        assert_eq!(params.require_f64("a").unwrap(), 6378137.0);
        assert_eq!(params.try_f64("rf").unwrap(), Some(298.257223563));
        assert_eq!(params.try_f64("missing").unwrap(), None);
    }
}
