//!
//! Coordinate reference systems and geodetic transformation pipelines.
//!
//! This crate models the components of geodetic coordinate reference
//! systems (ellipsoids, prime meridians, datums, map projections) and the
//! [`CoordinateOperation`](operation::CoordinateOperation)s that carry
//! coordinates between them, then composes those operations into full
//! [`Crs`](crs::Crs)-to-`Crs` transformation pipelines.
//!

#[cfg(feature = "logging")]
macro_rules! log_error { ($($arg:tt)+) => ( log::error!($($arg)+) ) }
#[cfg(feature = "logging")]
macro_rules! log_warn { ($($arg:tt)+) => ( log::warn!($($arg)+) ) }
#[cfg(feature = "logging")]
macro_rules! log_info { ($($arg:tt)+) => ( log::info!($($arg)+) ) }
#[cfg(feature = "logging")]
macro_rules! log_debug { ($($arg:tt)+) => ( log::debug!($($arg)+) ) }
#[cfg(feature = "logging")]
macro_rules! log_trace { ($($arg:tt)+) => ( log::trace!($($arg)+) ) }

#[cfg(not(feature = "logging"))]
macro_rules! log_error { ($($arg:tt)+) => {} }
#[cfg(not(feature = "logging"))]
macro_rules! log_warn { ($($arg:tt)+) => {} }
#[cfg(not(feature = "logging"))]
macro_rules! log_info { ($($arg:tt)+) => {} }
#[cfg(not(feature = "logging"))]
macro_rules! log_debug { ($($arg:tt)+) => {} }
#[cfg(not(feature = "logging"))]
macro_rules! log_trace { ($($arg:tt)+) => {} }

pub(crate) use {log_debug, log_error, log_info, log_trace, log_warn};

pub mod error;
pub mod measure;
pub mod ellipsoid;
pub mod prime_meridian;
pub mod parameter_map;
pub mod projstring;
pub mod grid;
pub mod datum;
pub mod operation;
pub mod projections;
pub mod crs;

pub use error::{Error, Result};
