use lazy_static::*;
use num_bigint::BigInt;

use crate::config::Config;
use crate::huge_int::HugeInt;
use crate::huge_int_constants::*;

lazy_static! {
    /// Defaults with the build-time overrides applied, parsed on first use.
    pub static ref DEFAULT_CONFIG: Config = Config::from_build_env();

    pub static ref POS_CACHE: [HugeInt; MAX_CONSTANT + 1] = std::array::from_fn(|i| {
        HugeInt::with_config(BigInt::from(i), &DEFAULT_CONFIG)
    });

    pub static ref NEG_CACHE: [HugeInt; MAX_CONSTANT + 1] = std::array::from_fn(|i| {
        HugeInt::with_config(-BigInt::from(i), &DEFAULT_CONFIG)
    });
}
