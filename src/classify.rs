//! Huge/native classification.
//!
//! A value is classified once, when it is constructed, from an estimate of
//! the memory it would occupy in expanded form. Nothing is re-classified on
//! read.

use std::mem::size_of;

use num_bigint::BigInt;

use crate::config::Config;
use crate::huge_int_constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Stored as a compressed decimal string.
    Huge,
    /// Stored as a plain `BigInt`.
    Native,
}

impl Classification {
    pub fn is_huge(self) -> bool {
        self == Classification::Huge
    }
}

/// Estimated heap plus inline size of `value`, in bytes.
pub fn int_footprint(value: &BigInt) -> usize {
    let limbs = (value.bits() + LIMB_BITS - 1) / LIMB_BITS;
    size_of::<BigInt>() + limbs as usize * LIMB_BYTES
}

/// Estimated size of a `String` holding `digits`, in bytes.
pub fn str_footprint(digits: &str) -> usize {
    size_of::<String>() + digits.len()
}

impl Config {
    pub fn classify_int(&self, value: &BigInt) -> Classification {
        if int_footprint(value) >= self.huge_num_threshold {
            Classification::Huge
        } else {
            Classification::Native
        }
    }

    pub fn classify_str(&self, digits: &str) -> Classification {
        if str_footprint(digits) >= self.huge_str_threshold {
            Classification::Huge
        } else {
            Classification::Native
        }
    }
}
