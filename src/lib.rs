//! GZ Int \
//! This crate provides:
//! - [`HugeInt`]: Immutable arbitrary-precision integers that store huge values as zlib-compressed decimal strings.
//!   Arithmetic is done by `num-bigint`; every integer result comes back as a new `HugeInt`.
//! - [`Operator`]: name-based dispatch of the same operators, for callers that pick operators at run time.

mod classify;
mod codec;
mod config;
mod error;
mod huge_int;
mod huge_int_cache;
mod huge_int_constants;
mod proxy;

pub use classify::{int_footprint, str_footprint, Classification};
pub use codec::{compress, decompress};
pub use config::Config;
pub use error::{Error, Result};
pub use huge_int::{native_hash, HugeInt};
pub use huge_int_constants::{DEBUG_PREVIEW_LEN, HUGE_NUM_THRESHOLD, HUGE_STR_THRESHOLD};
pub use proxy::{Operator, Proxied, Rounding};
