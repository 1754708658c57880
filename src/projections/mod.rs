//!
//! Map projections
//!
//! One macro-free enum dispatch (`Projection`) over each named
//! projection family, wrapped from the outside by a single
//! `CoordinateOperation::Projection` variant. Each family exposes a
//! plain forward/inverse function pair rather than a trait object.
//!

pub mod aea;
pub mod cass;
pub mod cea;
pub mod eqc;
pub mod etmerc;
pub mod gstmerc;
pub mod krovak;
pub mod laea;
pub mod lcc;
pub mod merc;
pub mod mill;
pub mod nzmg;
pub mod poly;
pub mod somerc;
pub mod stere;

use crate::ellipsoid::Ellipsoid;
use crate::error::{Error, Result};
use crate::operation::Coord3;
use crate::parameter_map::ParameterMap;

/// Parameters common to (almost) every projection, parsed once from a
/// [`ParameterMap`] and handed to each family's own `setup`.
#[derive(Debug, Clone)]
pub struct ProjectionParams {
    pub ellipsoid: Ellipsoid,
    pub lon_0: f64,
    pub lat_0: f64,
    pub lat_1: f64,
    pub lat_2: f64,
    pub lat_ts: f64,
    pub k0: f64,
    pub x_0: f64,
    pub y_0: f64,
    pub alpha: f64,
    pub gamma: f64,
}

impl ProjectionParams {
    pub fn from_map(ellipsoid: Ellipsoid, p: &dyn ParameterMap) -> Result<Self> {
        Ok(Self {
            ellipsoid,
            lon_0: p.try_angular_value("lon_0")?.unwrap_or(0.0),
            lat_0: p.try_angular_value("lat_0")?.unwrap_or(0.0),
            lat_1: p.try_angular_value("lat_1")?.unwrap_or(0.0),
            lat_2: p.try_angular_value("lat_2")?.unwrap_or(0.0),
            lat_ts: p.try_angular_value("lat_ts")?.unwrap_or(0.0),
            k0: p
                .try_f64("k0")?
                .or(p.try_f64("k")?)
                .unwrap_or(1.0),
            x_0: p.try_f64("x_0")?.unwrap_or(0.0),
            y_0: p.try_f64("y_0")?.unwrap_or(0.0),
            alpha: p.try_angular_value("alpha")?.unwrap_or(0.0),
            gamma: p.try_angular_value("gamma")?.unwrap_or(0.0),
        })
    }
}

/// A constructed, ready-to-use projection.
#[derive(Clone)]
pub enum Projection {
    Lcc(lcc::Lcc),
    Tmerc(etmerc::Tmerc),
    Merc(merc::Merc),
    Eqc(eqc::Eqc),
    Stere(stere::Stere),
    Sterea(stere::Sterea),
    Cass(cass::Cass),
    Omerc(somerc::Omerc),
    Somerc(somerc::Somerc),
    Aea(aea::Aea),
    Laea(laea::Laea),
    Poly(poly::Poly),
    Cea(cea::Cea),
    Mill(mill::Mill),
    Krovak(krovak::Krovak),
    Nzmg(nzmg::Nzmg),
    Gstmerc(gstmerc::Gstmerc),
}

impl Projection {
    /// Build a projection by its proj-string `+proj=` name.
    pub fn from_params(name: &str, ellipsoid: Ellipsoid, p: &dyn ParameterMap) -> Result<Self> {
        let common = ProjectionParams::from_map(ellipsoid, p)?;
        Ok(match name {
            "lcc" => Projection::Lcc(lcc::Lcc::setup(common, p)?),
            "tmerc" | "etmerc" => Projection::Tmerc(etmerc::Tmerc::setup(common)?),
            "utm" => Projection::Tmerc(etmerc::Tmerc::setup_utm(common, p)?),
            "merc" => Projection::Merc(merc::Merc::setup(common)?),
            "eqc" => Projection::Eqc(eqc::Eqc::setup(common)?),
            "stere" => Projection::Stere(stere::Stere::setup(common)?),
            "sterea" => Projection::Sterea(stere::Sterea::setup(common)?),
            "cass" => Projection::Cass(cass::Cass::setup(common)?),
            "omerc" => {
                if (common.alpha - std::f64::consts::FRAC_PI_2).abs() < 1e-9
                    && (common.gamma - std::f64::consts::FRAC_PI_2).abs() < 1e-9
                {
                    Projection::Somerc(somerc::Somerc::setup(common)?)
                } else {
                    Projection::Omerc(somerc::Omerc::setup(common)?)
                }
            }
            "somerc" => Projection::Somerc(somerc::Somerc::setup(common)?),
            "aea" => Projection::Aea(aea::Aea::setup(common, p)?),
            "leac" => Projection::Aea(aea::Aea::setup_leac(common, p)?),
            "laea" => Projection::Laea(laea::Laea::setup(common)?),
            "poly" => Projection::Poly(poly::Poly::setup(common)?),
            "cea" => Projection::Cea(cea::Cea::setup(common)?),
            "mill" => Projection::Mill(mill::Mill::setup(common)?),
            "krovak" => Projection::Krovak(krovak::Krovak::setup(common)?),
            "nzmg" => Projection::Nzmg(nzmg::Nzmg::setup(common)?),
            "gstmerc" => Projection::Gstmerc(gstmerc::Gstmerc::setup(common)?),
            other => return Err(Error::UnknownProjection(other.to_string())),
        })
    }

    pub fn forward(&self, c: Coord3) -> Result<Coord3> {
        let (lon, lat) = (c.0, c.1);
        let (x, y) = match self {
            Projection::Lcc(p) => p.forward(lon, lat)?,
            Projection::Tmerc(p) => p.forward(lon, lat)?,
            Projection::Merc(p) => p.forward(lon, lat)?,
            Projection::Eqc(p) => p.forward(lon, lat)?,
            Projection::Stere(p) => p.forward(lon, lat)?,
            Projection::Sterea(p) => p.forward(lon, lat)?,
            Projection::Cass(p) => p.forward(lon, lat)?,
            Projection::Omerc(p) => p.forward(lon, lat)?,
            Projection::Somerc(p) => p.forward(lon, lat)?,
            Projection::Aea(p) => p.forward(lon, lat)?,
            Projection::Laea(p) => p.forward(lon, lat)?,
            Projection::Poly(p) => p.forward(lon, lat)?,
            Projection::Cea(p) => p.forward(lon, lat)?,
            Projection::Mill(p) => p.forward(lon, lat)?,
            Projection::Krovak(p) => p.forward(lon, lat)?,
            Projection::Nzmg(p) => p.forward(lon, lat)?,
            Projection::Gstmerc(p) => p.forward(lon, lat)?,
        };
        Ok((x, y, c.2))
    }

    pub fn inverse(&self, c: Coord3) -> Result<Coord3> {
        let (x, y) = (c.0, c.1);
        let (lon, lat) = match self {
            Projection::Lcc(p) => p.inverse(x, y)?,
            Projection::Tmerc(p) => p.inverse(x, y)?,
            Projection::Merc(p) => p.inverse(x, y)?,
            Projection::Eqc(p) => p.inverse(x, y)?,
            Projection::Stere(p) => p.inverse(x, y)?,
            Projection::Sterea(p) => p.inverse(x, y)?,
            Projection::Cass(p) => p.inverse(x, y)?,
            Projection::Omerc(p) => p.inverse(x, y)?,
            Projection::Somerc(p) => p.inverse(x, y)?,
            Projection::Aea(p) => p.inverse(x, y)?,
            Projection::Laea(p) => p.inverse(x, y)?,
            Projection::Poly(p) => p.inverse(x, y)?,
            Projection::Cea(p) => p.inverse(x, y)?,
            Projection::Mill(p) => p.inverse(x, y)?,
            Projection::Krovak(p) => p.inverse(x, y)?,
            Projection::Nzmg(p) => p.inverse(x, y)?,
            Projection::Gstmerc(p) => p.inverse(x, y)?,
        };
        Ok((lon, lat, c.2))
    }
}
