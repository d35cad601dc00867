//! Storage policy: classification thresholds and compression level.
//!
//! The defaults are the named constants in `huge_int_constants`. They can be
//! overridden when the crate is built, through the compile-time environment
//! variables `GZ_INT_HUGE_NUM_THRESHOLD`, `GZ_INT_HUGE_STR_THRESHOLD` and
//! `GZ_INT_COMPRESSION_LEVEL`, or per value with [`HugeInt::with_config`].
//! Nothing here changes at run time.
//!
//! [`HugeInt::with_config`]: crate::HugeInt::with_config

use std::str::FromStr;

use flate2::Compression;

use crate::huge_int_constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Integer footprint (bytes) from which values are stored compressed.
    pub huge_num_threshold: usize,
    /// String footprint (bytes) from which string sources are stored compressed.
    pub huge_str_threshold: usize,
    /// zlib level, 0 (store) to 9 (best).
    pub compression_level: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            huge_num_threshold: HUGE_NUM_THRESHOLD,
            huge_str_threshold: HUGE_STR_THRESHOLD,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl Config {
    pub fn with_huge_num_threshold(mut self, bytes: usize) -> Self {
        self.huge_num_threshold = bytes;
        self
    }

    pub fn with_huge_str_threshold(mut self, bytes: usize) -> Self {
        self.huge_str_threshold = bytes;
        self
    }

    /// Levels above 9 are clamped to 9.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub(crate) fn compression(&self) -> Compression {
        Compression::new(self.compression_level.min(9))
    }

    /// Defaults with the build-time overrides applied.
    pub(crate) fn from_build_env() -> Self {
        let defaults = Config::default();
        Config {
            huge_num_threshold: build_override(
                "GZ_INT_HUGE_NUM_THRESHOLD",
                option_env!("GZ_INT_HUGE_NUM_THRESHOLD"),
                defaults.huge_num_threshold,
            ),
            huge_str_threshold: build_override(
                "GZ_INT_HUGE_STR_THRESHOLD",
                option_env!("GZ_INT_HUGE_STR_THRESHOLD"),
                defaults.huge_str_threshold,
            ),
            compression_level: build_override(
                "GZ_INT_COMPRESSION_LEVEL",
                option_env!("GZ_INT_COMPRESSION_LEVEL"),
                defaults.compression_level,
            )
            .min(9),
        }
    }
}

fn build_override<T>(name: &str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(name, raw, %default, "ignoring unparseable build-time override");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = Config::default();
        assert_eq!(config.huge_num_threshold, 415_280);
        assert_eq!(config.huge_str_threshold, 1000);
        assert_eq!(config.compression(), Compression::default());
    }

    #[test]
    fn builders_and_clamping() {
        let config = Config::default()
            .with_huge_num_threshold(64)
            .with_huge_str_threshold(32)
            .with_compression_level(42);
        assert_eq!(config.huge_num_threshold, 64);
        assert_eq!(config.huge_str_threshold, 32);
        assert_eq!(config.compression_level, 9);
    }

    #[test]
    fn overrides_fall_back_on_garbage() {
        assert_eq!(build_override("X", None, 7_usize), 7);
        assert_eq!(build_override("X", Some(" 12 "), 7_usize), 12);
        assert_eq!(build_override("X", Some("twelve"), 7_usize), 7);
    }
}
