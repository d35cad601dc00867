//! # HugeInt
//! Immutable arbitrary-precision integers that keep huge values compressed.
//!
//! Values whose expanded form would be large (see [`Config`]) are stored as a
//! zlib-compressed decimal string and decoded on every read. Everything else
//! is stored as a plain [`BigInt`]. Both forms compare, hash and format the
//! same way, and every arithmetic operator returns a new `HugeInt`.
//! # Example
//! ```
//! use gz_int::HugeInt;
//!
//! let a = HugeInt::from(10);
//! let b: HugeInt = "900000000000".parse().unwrap();
//! println!("a + b = {}", &a + &b);
//! println!("b / a = {}", &b / &a);
//! assert_eq!(a + 10, 20);
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{FromPrimitive, Num, ToPrimitive};

use crate::classify::{int_footprint, Classification};
use crate::codec;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::huge_int_cache::*;
use crate::huge_int_constants::*;

/// Hash of a native integer, as cached by every `HugeInt` of the same value.
pub fn native_hash(value: &BigInt) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[derive(Clone)]
enum Repr {
    Native(BigInt),
    Compressed(Box<[u8]>),
}

#[derive(Clone)]
pub struct HugeInt {
    repr: Repr,
    hash: u64,
}

// 实现构造
impl HugeInt {
    /// Wrap `value` using the default configuration.
    pub fn new(value: BigInt) -> Self {
        if let Some(cached) = HugeInt::cached(&value) {
            return cached;
        }
        HugeInt::with_config(value, &DEFAULT_CONFIG)
    }

    /// Wrap `value`, classifying it by its integer footprint under `config`.
    pub fn with_config(value: BigInt, config: &Config) -> Self {
        let hash = native_hash(&value);
        match config.classify_int(&value) {
            Classification::Native => HugeInt {
                repr: Repr::Native(value),
                hash,
            },
            Classification::Huge => {
                let digits = value.to_string();
                HugeInt::compressed(&digits, hash, config)
            }
        }
    }

    /// Parse a decimal string, classifying it by the string's footprint
    /// under `config`.
    ///
    /// Only the source string decides the form. A long parsed value may be
    /// compressed while `HugeInt::new` of the same number stays native, and
    /// arithmetic on it reclassifies the result by the integer footprint.
    ///
    /// Accepts surrounding whitespace, one leading sign and `_` between
    /// digits.
    pub fn parse_with_config(src: &str, config: &Config) -> Result<Self> {
        let digits = src.trim();
        let value = BigInt::from_str(digits)
            .map_err(|err| Error::invalid(format!("{:?} is not a decimal integer: {}", src, err)))?;
        let hash = native_hash(&value);

        match config.classify_str(digits) {
            Classification::Native => Ok(HugeInt {
                repr: Repr::Native(value),
                hash,
            }),
            Classification::Huge if is_canonical(digits) => {
                Ok(HugeInt::compressed(digits, hash, config))
            }
            Classification::Huge => Ok(HugeInt::compressed(&value.to_string(), hash, config)),
        }
    }

    pub fn from_str_radix(src: &str, radix: u32) -> Result<Self> {
        if !(2..=36).contains(&radix) {
            return Err(Error::invalid(format!("radix {} is outside 2..=36", radix)));
        }
        let value = BigInt::from_str_radix(src.trim(), radix).map_err(|err| {
            Error::invalid(format!("{:?} is not a base-{} integer: {}", src, radix, err))
        })?;
        Ok(HugeInt::new(value))
    }

    fn compressed(digits: &str, hash: u64, config: &Config) -> Self {
        let bytes = codec::compress(digits.as_bytes(), config.compression());
        tracing::debug!(
            digits = digits.len(),
            compressed = bytes.len(),
            "storing huge integer compressed"
        );
        HugeInt {
            repr: Repr::Compressed(bytes.into_boxed_slice()),
            hash,
        }
    }

    fn cached(value: &BigInt) -> Option<HugeInt> {
        let magnitude = value.magnitude().to_usize()?;
        if magnitude > MAX_CONSTANT {
            return None;
        }
        match value.sign() {
            Sign::Minus => Some(NEG_CACHE[magnitude].clone()),
            _ => Some(POS_CACHE[magnitude].clone()),
        }
    }
}

/// `0`, or an optional `-` followed by digits without a leading zero.
fn is_canonical(digits: &str) -> bool {
    let unsigned = digits.strip_prefix('-').unwrap_or(digits);
    match unsigned.as_bytes() {
        [b'0'] => unsigned.len() == digits.len(),
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

impl Default for HugeInt {
    fn default() -> Self {
        HugeInt::new(BigInt::default())
    }
}

impl From<BigInt> for HugeInt {
    fn from(val: BigInt) -> Self {
        HugeInt::new(val)
    }
}

impl From<&BigInt> for HugeInt {
    fn from(val: &BigInt) -> Self {
        HugeInt::new(val.clone())
    }
}

macro_rules! impl_primitive_to_huge_int {
    ($($t: ty),*) => {
    $(
    impl From<$t> for HugeInt {
        fn from(val: $t) -> Self {
            HugeInt::new(BigInt::from(val))
        }
    }
    )*
    };
}
impl_primitive_to_huge_int!(u8, u16, u32, u64, u128, usize);
impl_primitive_to_huge_int!(i8, i16, i32, i64, i128, isize);

impl FromStr for HugeInt {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self> {
        HugeInt::parse_with_config(src, &DEFAULT_CONFIG)
    }
}

impl TryFrom<f64> for HugeInt {
    type Error = Error;

    /// Truncates toward zero.
    fn try_from(val: f64) -> Result<Self> {
        if !val.is_finite() {
            return Err(Error::invalid(format!("cannot convert {} to an integer", val)));
        }
        BigInt::from_f64(val.trunc())
            .map(HugeInt::new)
            .ok_or_else(|| Error::invalid(format!("cannot convert {} to an integer", val)))
    }
}

impl TryFrom<f32> for HugeInt {
    type Error = Error;

    fn try_from(val: f32) -> Result<Self> {
        HugeInt::try_from(val as f64)
    }
}

// 实现解码
impl HugeInt {
    /// The logical value as a native integer.
    pub fn to_int(&self) -> Result<BigInt> {
        match &self.repr {
            Repr::Native(value) => Ok(value.clone()),
            Repr::Compressed(bytes) => decode(bytes),
        }
    }

    /// Borrowing variant of [`HugeInt::to_int`] used by the operators.
    ///
    /// # Panics
    /// If the compressed payload cannot be decoded. The payload is private
    /// and never mutated, so this only fires on a broken invariant.
    pub(crate) fn logical(&self) -> Cow<'_, BigInt> {
        match &self.repr {
            Repr::Native(value) => Cow::Borrowed(value),
            Repr::Compressed(bytes) => match decode(bytes) {
                Ok(value) => Cow::Owned(value),
                Err(err) => panic!("unreadable HugeInt payload: {}", err),
            },
        }
    }

    pub fn is_huge(&self) -> bool {
        matches!(self.repr, Repr::Compressed(_))
    }

    pub fn classification(&self) -> Classification {
        if self.is_huge() {
            Classification::Huge
        } else {
            Classification::Native
        }
    }

    /// Bytes held by this value: the compressed payload when huge, the
    /// estimated integer footprint otherwise.
    pub fn stored_bytes(&self) -> usize {
        match &self.repr {
            Repr::Native(value) => int_footprint(value),
            Repr::Compressed(bytes) => bytes.len(),
        }
    }

    /// Cached hash, equal to [`native_hash`] of the logical value.
    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    pub fn bits(&self) -> u64 {
        self.logical().bits()
    }

    pub fn sign(&self) -> Sign {
        self.logical().sign()
    }
}

fn decompress_digits(bytes: &[u8]) -> Result<String> {
    let raw = codec::decompress(bytes)?;
    tracing::trace!(compressed = bytes.len(), digits = raw.len(), "decompressed huge integer");
    String::from_utf8(raw).map_err(|err| Error::corrupted_by("payload is not UTF-8", err))
}

fn decode(bytes: &[u8]) -> Result<BigInt> {
    let digits = decompress_digits(bytes)?;
    BigInt::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| Error::corrupted("payload is not a decimal integer"))
}

// 实现打印
impl HugeInt {
    /// Full decimal expansion.
    pub fn try_to_string(&self) -> Result<String> {
        match &self.repr {
            Repr::Native(value) => Ok(value.to_string()),
            Repr::Compressed(bytes) => decompress_digits(bytes),
        }
    }

    /// Decimal expansion for native values; for huge values the first 16
    /// digits followed by `...(len)`, e.g. `1000000000000000...(1000001)`.
    pub fn to_debug_string(&self) -> Result<String> {
        match &self.repr {
            Repr::Native(value) => Ok(value.to_string()),
            Repr::Compressed(bytes) => {
                let digits = decompress_digits(bytes)?;
                let preview: String = digits.chars().take(DEBUG_PREVIEW_LEN).collect();
                Ok(format!("{}...({})", preview, digits.len()))
            }
        }
    }

    pub fn to_string_radix(&self, radix: u32) -> Result<String> {
        if !(2..=36).contains(&radix) {
            return Err(Error::invalid(format!("radix {} is outside 2..=36", radix)));
        }
        if radix == 10 {
            return self.try_to_string();
        }
        Ok(self.to_int()?.to_str_radix(radix))
    }
}

impl Display for HugeInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Native(value) => Display::fmt(value, f),
            Repr::Compressed(_) => {
                let digits = self.try_to_string().map_err(|_| fmt::Error)?;
                f.pad_integral(!digits.starts_with('-'), "", digits.trim_start_matches('-'))
            }
        }
    }
}

impl Debug for HugeInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_debug_string() {
            Ok(preview) => f.write_str(&preview),
            Err(err) => write!(f, "<{}>", err),
        }
    }
}

// 实现比较
impl PartialEq for HugeInt {
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        match (&self.repr, &other.repr) {
            (Repr::Native(a), Repr::Native(b)) => a == b,
            _ => self.logical() == other.logical(),
        }
    }
}

impl Eq for HugeInt {}

impl Hash for HugeInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl PartialOrd for HugeInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HugeInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.repr, &other.repr) {
            (Repr::Native(a), Repr::Native(b)) => a.cmp(b),
            _ => self.logical().as_ref().cmp(other.logical().as_ref()),
        }
    }
}

impl PartialEq<BigInt> for HugeInt {
    fn eq(&self, other: &BigInt) -> bool {
        match &self.repr {
            Repr::Native(value) => value == other,
            Repr::Compressed(_) => self.hash == native_hash(other) && *self.logical() == *other,
        }
    }
}

impl PartialEq<HugeInt> for BigInt {
    fn eq(&self, other: &HugeInt) -> bool {
        other == self
    }
}

impl PartialOrd<BigInt> for HugeInt {
    fn partial_cmp(&self, other: &BigInt) -> Option<Ordering> {
        Some(self.logical().as_ref().cmp(other))
    }
}

impl PartialOrd<HugeInt> for BigInt {
    fn partial_cmp(&self, other: &HugeInt) -> Option<Ordering> {
        Some(self.cmp(other.logical().as_ref()))
    }
}

macro_rules! impl_primitive_cmp {
    ($($t: ty),*) => {
    $(
    impl PartialEq<$t> for HugeInt {
        fn eq(&self, other: &$t) -> bool {
            *self == BigInt::from(*other)
        }
    }

    impl PartialEq<HugeInt> for $t {
        fn eq(&self, other: &HugeInt) -> bool {
            *other == BigInt::from(*self)
        }
    }

    impl PartialOrd<$t> for HugeInt {
        fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
            self.partial_cmp(&BigInt::from(*other))
        }
    }

    impl PartialOrd<HugeInt> for $t {
        fn partial_cmp(&self, other: &HugeInt) -> Option<Ordering> {
            BigInt::from(*self).partial_cmp(other)
        }
    }
    )*
    };
}
impl_primitive_cmp!(u8, u16, u32, u64, u128, usize);
impl_primitive_cmp!(i8, i16, i32, i64, i128, isize);

// 实现转换
impl From<HugeInt> for BigInt {
    /// # Panics
    /// If the compressed payload cannot be decoded.
    fn from(val: HugeInt) -> Self {
        match val.repr {
            Repr::Native(value) => value,
            Repr::Compressed(_) => val.logical().into_owned(),
        }
    }
}

impl From<&HugeInt> for BigInt {
    fn from(val: &HugeInt) -> Self {
        val.logical().into_owned()
    }
}

macro_rules! impl_huge_int_to_primitive {
    ($($t: ty => $to: ident),*) => {
    $(
    impl TryFrom<&HugeInt> for $t {
        type Error = Error;

        fn try_from(val: &HugeInt) -> Result<$t> {
            val.to_int()?
                .$to()
                .ok_or_else(|| Error::overflow(format!("{:?} does not fit in {}", val, stringify!($t))))
        }
    }
    )*
    };
}
impl_huge_int_to_primitive!(i64 => to_i64, u64 => to_u64, i128 => to_i128, u128 => to_u128, usize => to_usize);

#[cfg(test)]
fn huge_config() -> Config {
    Config::default().with_huge_num_threshold(0).with_huge_str_threshold(0)
}

#[test]
fn test_zero() {
    let zero = HugeInt::default();
    assert!(!zero.is_huge());
    assert_eq!(zero, 0);
    assert_eq!(zero.to_string(), "0");
    assert_eq!(zero.to_debug_string().unwrap(), "0");
    assert_eq!(format!("{:?}", zero), "0");
}

#[test]
fn test_round_trip_both_forms() {
    let values = [
        BigInt::from(0),
        BigInt::from(-1),
        BigInt::from(i64::MIN),
        BigInt::from(u128::MAX),
        BigInt::parse_bytes(b"-98765432109876543210987654321098765432109876543210", 10).unwrap(),
    ];
    for value in values {
        let native = HugeInt::new(value.clone());
        let huge = HugeInt::with_config(value.clone(), &huge_config());
        assert!(huge.is_huge());
        assert_eq!(native.to_int().unwrap(), value);
        assert_eq!(huge.to_int().unwrap(), value);
        assert_eq!(native.to_string(), huge.to_string());
        assert_eq!(native, huge);
        assert_eq!(native.hash_value(), huge.hash_value());
    }
}

#[test]
fn test_debug_preview() {
    let value: BigInt = "-123456789012345678901234567890".parse().unwrap();
    let huge = HugeInt::with_config(value.clone(), &huge_config());
    assert_eq!(huge.to_debug_string().unwrap(), "-123456789012345...(31)");
    assert_eq!(format!("{:?}", huge), "-123456789012345...(31)");
    assert_eq!(format!("{:?}", HugeInt::new(value)), "-123456789012345678901234567890");

    let short = HugeInt::with_config(BigInt::from(42), &huge_config());
    assert_eq!(short.to_debug_string().unwrap(), "42...(2)");
}

#[test]
fn test_display_padding() {
    let huge = HugeInt::with_config(BigInt::from(-42), &huge_config());
    assert_eq!(format!("{:>6}", huge), "   -42");
    assert_eq!(format!("{:+}", HugeInt::with_config(BigInt::from(7), &huge_config())), "+7");
    assert_eq!(format!("{:>6}", HugeInt::from(-42)), "   -42");
}

#[test]
fn test_parse() {
    assert_eq!("  +1_000 ".parse::<HugeInt>().unwrap(), 1000);
    assert_eq!("-007".parse::<HugeInt>().unwrap(), -7);
    for bad in ["", "-", "abc", "12a", "1.5", "--1"] {
        let err = bad.parse::<HugeInt>().unwrap_err();
        assert_eq!(err.category(), "invalid_value", "{:?}", bad);
    }
}

#[test]
fn test_parse_classifies_by_string_footprint() {
    let config = Config::default().with_huge_str_threshold(std::mem::size_of::<String>() + 10);
    let nine = HugeInt::parse_with_config("123456789", &config).unwrap();
    let ten = HugeInt::parse_with_config("1234567890", &config).unwrap();
    assert!(!nine.is_huge());
    assert!(ten.is_huge());
    assert_eq!(ten.to_string(), "1234567890");

    // non-canonical input is re-rendered before compression
    let padded = HugeInt::parse_with_config("+0001234567890", &config).unwrap();
    assert!(padded.is_huge());
    assert_eq!(padded.to_string(), "1234567890");
    assert_eq!(padded, ten);
}

#[test]
fn test_canonical_digits() {
    assert!(is_canonical("0"));
    assert!(is_canonical("-12"));
    assert!(is_canonical("9007199254740993"));
    assert!(!is_canonical("-0"));
    assert!(!is_canonical("012"));
    assert!(!is_canonical("+12"));
    assert!(!is_canonical("1_000"));
    assert!(!is_canonical(""));
}

#[test]
fn test_from_float() {
    assert_eq!(HugeInt::try_from(2.9_f64).unwrap(), 2);
    assert_eq!(HugeInt::try_from(-2.9_f64).unwrap(), -2);
    assert_eq!(HugeInt::try_from(1e30_f64).unwrap(), BigInt::from(1_000_000_000_000_000_019_884_624_838_656_u128));
    assert_eq!(HugeInt::try_from(-0.5_f32).unwrap(), 0);
    assert!(HugeInt::try_from(f64::NAN).is_err());
    assert!(HugeInt::try_from(f64::INFINITY).is_err());
}

#[test]
fn test_radix() {
    let value = HugeInt::from_str_radix("-ff", 16).unwrap();
    assert_eq!(value, -255);
    assert_eq!(value.to_string_radix(2).unwrap(), "-11111111");
    assert!(value.to_string_radix(37).is_err());
    assert!(HugeInt::from_str_radix("12", 1).is_err());
}

#[test]
fn test_cache_serves_small_values() {
    assert_eq!(HugeInt::from(16u8), 16);
    assert_eq!(HugeInt::from(-16i8), -16);
    assert_eq!(HugeInt::from(17), 17);
    assert!(!HugeInt::from(-3).is_huge());
}

#[test]
fn test_primitive_conversions() {
    let big = HugeInt::from(u64::MAX);
    assert_eq!(u64::try_from(&big).unwrap(), u64::MAX);
    assert_eq!(i64::try_from(&big).unwrap_err().category(), "overflow");
    assert_eq!(BigInt::from(big.clone()), BigInt::from(u64::MAX));
    assert_eq!(BigInt::from(&HugeInt::with_config(BigInt::from(-5), &huge_config())), BigInt::from(-5));
}

#[test]
fn test_ordering_across_forms() {
    let small = HugeInt::from(-10);
    let huge = HugeInt::with_config(BigInt::from(10), &huge_config());
    assert!(small < huge);
    assert!(huge > 9);
    assert!(11 > huge);
    assert!(BigInt::from(-11) < small);
    assert_eq!(huge.cmp(&HugeInt::from(10)), Ordering::Equal);
}

#[test]
fn test_corrupted_payload() {
    let broken = HugeInt {
        repr: Repr::Compressed(b"not zlib".to_vec().into_boxed_slice()),
        hash: 0,
    };
    assert_eq!(broken.to_int().unwrap_err().category(), "data_corruption");
    assert!(broken.try_to_string().is_err());
    assert!(format!("{:?}", broken).starts_with("<corrupted data"));

    let not_digits = HugeInt {
        repr: Repr::Compressed(codec::compress(b"12x4", Default::default()).into_boxed_slice()),
        hash: 0,
    };
    assert!(matches!(not_digits.to_int(), Err(Error::DataCorruption { .. })));
}

#[test]
#[should_panic(expected = "unreadable HugeInt payload")]
fn test_corrupted_payload_panics_in_operators() {
    let broken = HugeInt {
        repr: Repr::Compressed(b"not zlib".to_vec().into_boxed_slice()),
        hash: 0,
    };
    let _ = broken.logical();
}

#[test]
fn test_parsed_value_reclassified_by_arithmetic() {
    let digits = format!("7{}", "3".repeat(1_199));
    let parsed: HugeInt = digits.parse().unwrap();
    assert!(parsed.is_huge());

    let native = BigInt::from_str(&digits).unwrap();
    assert!(!HugeInt::new(native.clone()).is_huge());

    let sum = &parsed + 0i32;
    assert!(!sum.is_huge());
    assert_eq!(sum, parsed);
    assert_eq!(sum, native);
}
