//! Lossless text encoding of halfsegment records.
//!
//! Region files carry one segment per line as whitespace-separated fields
//!
//! ```text
//! <hex-dx> <hex-dy> <hex-sx> <hex-sy> <la> <lb>
//! ```
//!
//! where the `hex-*` fields are the 16 lowercase hex digits of the
//! coordinate's IEEE-754 bit pattern, most significant digit first. The
//! encoding round-trips every finite double exactly, which keeps repeated
//! benchmark runs bit-identical.

use std::io::BufRead;

use crate::geom::{FaceId, Halfsegment, Point, RegionId};

/// Encode a double as its 16-digit hex bit pattern.
pub fn d2hex(x: f64) -> String {
    format!("{:016x}", x.to_bits())
}

/// Decode a 16-digit hex bit pattern into a double.
pub fn hex2d(s: &str) -> Option<f64> {
    if s.len() != 16 {
        return None;
    }
    u64::from_str_radix(s, 16).ok().map(f64::from_bits)
}

/// A malformed region file.
#[derive(Debug)]
pub enum Error {
    /// The underlying reader failed.
    Io(std::io::Error),
    /// A record line could not be parsed.
    Malformed {
        /// One-based line number of the offending record.
        line: usize,
        /// What was wrong with it.
        reason: &'static str,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "error reading region file: {err}"),
            Error::Malformed { line, reason } => {
                write!(f, "malformed region record on line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Malformed { .. } => None,
        }
    }
}

fn parse_coord(field: Option<&str>, line: usize) -> Result<f64, Error> {
    let field = field.ok_or(Error::Malformed {
        line,
        reason: "expected six fields",
    })?;
    let x = hex2d(field).ok_or(Error::Malformed {
        line,
        reason: "bad hex coordinate",
    })?;
    if x.is_nan() || x.is_infinite() {
        return Err(Error::Malformed {
            line,
            reason: "non-finite coordinate",
        });
    }
    Ok(x)
}

fn parse_label(field: Option<&str>, line: usize) -> Result<FaceId, Error> {
    let field = field.ok_or(Error::Malformed {
        line,
        reason: "expected six fields",
    })?;
    field.parse().map(FaceId).map_err(|_| Error::Malformed {
        line,
        reason: "bad face label",
    })
}

/// Read a region from hex records.
///
/// Blank lines and lines starting with `#` are skipped. Every record
/// yields the segment and its brother, with the overlap labels left at
/// [`FaceId::NONE`]; the result is in file order, so callers must sort
/// before sweeping.
pub fn read_region<R: BufRead>(reader: R, region: RegionId) -> Result<Vec<Halfsegment>, Error> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(Error::Io)?;
        let lineno = idx + 1;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let dx = parse_coord(fields.next(), lineno)?;
        let dy = parse_coord(fields.next(), lineno)?;
        let sx = parse_coord(fields.next(), lineno)?;
        let sy = parse_coord(fields.next(), lineno)?;
        let la = parse_label(fields.next(), lineno)?;
        let lb = parse_label(fields.next(), lineno)?;
        let h = Halfsegment::new(Point::new(dx, dy), Point::new(sx, sy), la, lb, region);
        out.push(h);
        out.push(h.brother());
    }
    Ok(out)
}
