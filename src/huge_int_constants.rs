/// Estimated in-memory footprint, in bytes, at which an integer is stored compressed.
///
/// Footprint is `size_of::<BigInt>()` plus 8 bytes per 64-bit limb. On a
/// 64-bit target 10^1_000_000 takes 51_906 limbs behind a 32-byte header,
/// i.e. exactly this many bytes: the threshold is the footprint of
/// 10^1_000_000. Smaller powers sharing its limb count (10^999_998 and
/// 10^999_999) are compressed as well.
pub const HUGE_NUM_THRESHOLD: usize = 415_280;

/// Footprint, in bytes, at which a decimal string source is considered huge.
/// Footprint is `size_of::<String>()` plus the string's byte length.
pub const HUGE_STR_THRESHOLD: usize = 1000;

/// zlib level used when none is configured (flate2's default).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Number of leading digits shown by the debug preview of a huge value.
pub const DEBUG_PREVIEW_LEN: usize = 16;

/// Magnitudes up to this bound are served from the instance cache.
pub const MAX_CONSTANT: usize = 16;

pub const LIMB_BYTES: usize = 8;

pub const LIMB_BITS: u64 = 64;
