//!
//! NTv2 binary grid reader
//!
//! Format reference: the 11-record (16 bytes/record) fixed overview
//! header, followed by one 11-record sub-header + row-major `GS_COUNT`
//! data records per sub-grid, as documented by NRCan and consumed
//! identically by PROJ's `nad2bin`.
//!

use std::io::Read;

use crate::error::{Error, Result};
use crate::grid::Lp;
use crate::operation::primitives::adjlon;
use crate::log_trace;

const SEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);
const HEADER_RECORD_SIZE: usize = 16;
const MAIN_HEADER_RECORDS: usize = 11;
const SUB_HEADER_RECORDS: usize = 11;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Endianness {
    Little,
    Big,
}

impl Endianness {
    fn native() -> Self {
        if cfg!(target_endian = "little") {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }

    fn swapped() -> Self {
        if cfg!(target_endian = "little") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }
}

/// A fixed-size raw header record buffer, read record-by-record.
struct Header {
    endian: Endianness,
    buf: Vec<u8>,
}

impl Header {
    fn new(nrecords: usize) -> Self {
        Self {
            endian: Endianness::native(),
            buf: vec![0u8; nrecords * HEADER_RECORD_SIZE],
        }
    }

    fn read<R: Read>(&mut self, r: &mut R) -> Result<()> {
        r.read_exact(&mut self.buf)
            .map_err(|e| Error::GridLoad {
                name: "ntv2".into(),
                cause: e.to_string(),
            })
    }

    fn get_str(&self, offset: usize, len: usize) -> &str {
        std::str::from_utf8(&self.buf[offset..offset + len])
            .unwrap_or_default()
            .trim_end()
    }

    fn get_u8(&self, offset: usize) -> u8 {
        self.buf[offset]
    }

    fn get_u32(&self, offset: usize) -> u32 {
        let b: [u8; 4] = self.buf[offset..offset + 4].try_into().unwrap();
        match self.endian {
            Endianness::Little => u32::from_le_bytes(b),
            Endianness::Big => u32::from_be_bytes(b),
        }
    }

    fn get_f64(&self, offset: usize) -> f64 {
        let b: [u8; 8] = self.buf[offset..offset + 8].try_into().unwrap();
        match self.endian {
            Endianness::Little => f64::from_le_bytes(b),
            Endianness::Big => f64::from_be_bytes(b),
        }
    }

    fn get_f32(&self, offset: usize) -> f32 {
        let b: [u8; 4] = self.buf[offset..offset + 4].try_into().unwrap();
        match self.endian {
            Endianness::Little => f32::from_le_bytes(b),
            Endianness::Big => f32::from_be_bytes(b),
        }
    }
}

/// A single, already-loaded grid (one sub-grid of an NTv2 file, or the
/// root of an IGN ASCII file).
#[derive(Debug)]
pub struct Grid {
    pub name: String,
    pub parent: String,
    pub ll: Lp,
    pub del: Lp,
    pub lim: Lp,
    epsilon: f64,
    cvs: Box<[Lp]>,
}

impl Grid {
    pub fn is_root(&self) -> bool {
        self.parent.trim().eq_ignore_ascii_case("none") || self.parent.trim().is_empty()
    }

    /// Whether `(lam, phi)` falls within this grid's extent (with an
    /// epsilon margin to absorb rounding at the boundary between
    /// adjoining grids).
    pub fn matches(&self, lam: f64, phi: f64) -> bool {
        !(self.ll.phi - self.epsilon > phi
            || self.ll.lam - self.epsilon > lam
            || self.ll.phi + (self.lim.phi - 1.) * self.del.phi + self.epsilon < phi
            || self.ll.lam + (self.lim.lam - 1.) * self.del.lam + self.epsilon < lam)
    }

    /// Forward shift: `(lam, phi)` assumed to already be within this
    /// grid's extent.
    pub fn shift_forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let (t_lam, t_phi) = self.interpolate(
            adjlon(lam - self.ll.lam - std::f64::consts::PI) + std::f64::consts::PI,
            phi - self.ll.phi,
        )?;
        Ok((lam - t_lam, phi + t_phi))
    }

    /// Inverse shift, by fixed-point iteration on the forward formula.
    pub fn shift_inverse(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        const MAX_ITER: usize = 10;
        const TOL: f64 = 1.0e-24;

        let (tb_lam, tb_phi) = (
            adjlon(lam - self.ll.lam - std::f64::consts::PI) + std::f64::consts::PI,
            phi - self.ll.phi,
        );
        let (mut t_lam, mut t_phi) = self.interpolate(tb_lam, tb_phi)?;
        t_lam = tb_lam + t_lam;
        t_phi = tb_phi - t_phi;

        for _ in 0..MAX_ITER {
            let (d_lam, d_phi) = self.interpolate(t_lam, t_phi)?;
            let (diff_lam, diff_phi) = (t_lam - d_lam - tb_lam, t_phi + d_phi - tb_phi);
            if diff_lam * diff_lam + diff_phi * diff_phi <= TOL {
                return Ok((adjlon(t_lam + self.ll.lam), t_phi + self.ll.phi));
            }
            t_lam = tb_lam + d_lam;
            t_phi = tb_phi - d_phi;
        }
        Err(Error::ToleranceConditionError)
    }

    fn interpolate(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let (t_lam, t_phi) = (lam / self.del.lam, phi / self.del.phi);

        fn clip(t: f64, lim: f64) -> Result<(f64, f64)> {
            let mut i = t.floor();
            let mut f = t - i;
            if i < 0. {
                if i == -1. && f > 0.99999999999 {
                    i += 1.;
                    f = 0.;
                } else {
                    return Err(Error::PointOutsideNadShiftArea);
                }
            } else {
                let n = i + 1.;
                if n == lim && f < 1.0e-11 {
                    i -= 1.;
                    f = 1.;
                } else if n > lim {
                    return Err(Error::PointOutsideNadShiftArea);
                }
            }
            Ok((i, f))
        }

        let (i_lam, f_lam) = clip(t_lam, self.lim.lam)?;
        let (i_phi, f_phi) = clip(t_phi, self.lim.phi)?;

        let mut index = (i_phi * self.lim.lam + i_lam) as usize;
        let f00 = &self.cvs[index];
        let f10 = &self.cvs[index + 1];
        index += self.lim.lam as usize;
        let f01 = &self.cvs[index];
        let f11 = &self.cvs[index + 1];

        let m00 = (1. - f_lam) * (1. - f_phi);
        let m01 = (1. - f_lam) * f_phi;
        let m10 = f_lam * (1. - f_phi);
        let m11 = f_lam * f_phi;

        Ok((
            m00 * f00.lam + m10 * f10.lam + m01 * f01.lam + m11 * f11.lam,
            m00 * f00.phi + m10 * f10.phi + m01 * f01.phi + m11 * f11.phi,
        ))
    }
}

/// Read an entire NTv2 file (overview header + all sub-grids) from any
/// `Read`, returning the flat list of grids in file order. The deepest-
/// match lookup over parent/child relationships is the catalog's job.
pub fn read_ntv2<R: Read>(r: &mut R) -> Result<Vec<Grid>> {
    let mut overview = Header::new(MAIN_HEADER_RECORDS);
    overview.read(r)?;
    overview.endian = if overview.get_u8(8) == 11 {
        Endianness::native()
    } else {
        Endianness::swapped()
    };

    let nsubgrids = overview.get_u32(40) as usize;
    log_trace!("ntv2: {} sub-grid(s)", nsubgrids);

    (0..nsubgrids).map(|_| read_subgrid(&overview, r)).collect()
}

fn read_subgrid<R: Read>(overview: &Header, r: &mut R) -> Result<Grid> {
    let mut head = Header::new(SUB_HEADER_RECORDS);
    head.endian = overview.endian;
    head.read(r)?;

    if head.get_str(0, 8) != "SUB_NAME" {
        return Err(Error::GridLoad {
            name: "ntv2".into(),
            cause: "invalid sub-grid header".into(),
        });
    }

    let name = head.get_str(8, 8).to_string();
    let parent = head.get_str(24, 8).to_string();

    let mut ll = Lp {
        lam: -head.get_f64(120), // W_LONG
        phi: head.get_f64(72),   // S_LAT
    };
    let ur = Lp {
        lam: -head.get_f64(104), // E_LONG
        phi: head.get_f64(88),   // N_LAT
    };
    let mut del = Lp {
        lam: head.get_f64(152), // LONG_INC
        phi: head.get_f64(136), // LAT_INC
    };

    let lim = Lp {
        lam: (((ur.lam - ll.lam).abs() / del.lam + 0.5) + 1.).floor(),
        phi: (((ur.phi - ll.phi).abs() / del.phi + 0.5) + 1.).floor(),
    };

    ll.lam *= SEC_TO_RAD;
    ll.phi *= SEC_TO_RAD;
    del.lam *= SEC_TO_RAD;
    del.phi *= SEC_TO_RAD;

    let nrows = lim.phi as usize;
    let rowsize = lim.lam as usize;
    let gs_count = head.get_u32(168) as usize;
    if gs_count != nrows * rowsize {
        return Err(Error::GridLoad {
            name: "ntv2".into(),
            cause: "GS_COUNT does not match grid extent".into(),
        });
    }

    let mut record = Header::new(1);
    record.endian = overview.endian;
    let mut cvs: Vec<Lp> = Vec::with_capacity(gs_count);
    for _ in 0..gs_count {
        record.read(r)?;
        cvs.push(Lp {
            lam: SEC_TO_RAD * record.get_f32(0) as f64,
            phi: SEC_TO_RAD * record.get_f32(4) as f64,
        });
    }

    // Rows are stored west-to-east in the source but the interpolation
    // math above indexes east-increasing from `ll`; PROJ's own NTv2
    // readers reverse each row for the same reason.
    for i in 0..nrows {
        let offs = i * rowsize;
        cvs[offs..offs + rowsize].reverse();
    }

    let epsilon = (del.lam.abs() + del.phi.abs()) / 10_000.;

    Ok(Grid {
        name,
        parent,
        ll,
        del,
        lim,
        epsilon,
        cvs: cvs.into_boxed_slice(),
    })
}
