//! Constants used by numeric approximation, computed at a given precision.

use rug::{float::Constant, Float};
use super::primitive::PRECISION;

/// Returns pi at the given precision, in bits.
pub fn pi(prec: u32) -> Float {
    Float::with_val(prec.max(PRECISION), Constant::Pi)
}

/// Returns Euler's number at the given precision, in bits.
pub fn e(prec: u32) -> Float {
    Float::with_val(prec.max(PRECISION), 1).exp()
}
