//! Operator proxying.
//!
//! Every operator converts its operands to native `BigInt`s, runs the
//! `num-bigint` operator and wraps an integer result in a new [`HugeInt`].
//! Non-integer results (comparisons, true division, negative powers) come
//! back unwrapped. The static `std::ops` impls and the dynamic
//! [`Operator`] table share the kernels below.

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::iter::{Product, Sum};
use std::ops::{
    Add, AddAssign,
    Sub, SubAssign,
    Mul, MulAssign,
    Div, DivAssign,
    Rem, RemAssign,
    BitAnd, BitAndAssign,
    BitOr, BitOrAssign,
    BitXor, BitXorAssign,
    Shl, ShlAssign,
    Shr, ShrAssign,
    Neg, Not,
};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{
    CheckedDiv, CheckedRem, FromPrimitive, Num, One, Pow, Signed, ToPrimitive, Zero,
};

use crate::error::{Error, Result};
use crate::huge_int::HugeInt;

/// Anything that converts to a native integer for an operator.
trait Operand {
    fn native(&self) -> Cow<'_, BigInt>;
}

impl Operand for HugeInt {
    fn native(&self) -> Cow<'_, BigInt> {
        self.logical()
    }
}

impl Operand for BigInt {
    fn native(&self) -> Cow<'_, BigInt> {
        Cow::Borrowed(self)
    }
}

macro_rules! impl_primitive_operand {
    ($($t: ty),*) => {
    $(
    impl Operand for $t {
        fn native(&self) -> Cow<'_, BigInt> {
            Cow::Owned(BigInt::from(*self))
        }
    }
    )*
    };
}
impl_primitive_operand!(u8, u16, u32, u64, u128, usize);
impl_primitive_operand!(i8, i16, i32, i64, i128, isize);

type Kernel = fn(&BigInt, &BigInt) -> Result<BigInt>;

// 运算内核
fn add(a: &BigInt, b: &BigInt) -> Result<BigInt> {
    Ok(a + b)
}

fn sub(a: &BigInt, b: &BigInt) -> Result<BigInt> {
    Ok(a - b)
}

fn mul(a: &BigInt, b: &BigInt) -> Result<BigInt> {
    Ok(a * b)
}

fn floor_div(a: &BigInt, b: &BigInt) -> Result<BigInt> {
    if b.is_zero() {
        return Err(Error::DivisionByZero);
    }
    Ok(a.div_floor(b))
}

/// Remainder of floor division; takes the sign of the divisor.
fn floor_mod(a: &BigInt, b: &BigInt) -> Result<BigInt> {
    if b.is_zero() {
        return Err(Error::DivisionByZero);
    }
    Ok(a.mod_floor(b))
}

fn bit_and(a: &BigInt, b: &BigInt) -> Result<BigInt> {
    Ok(a & b)
}

fn bit_or(a: &BigInt, b: &BigInt) -> Result<BigInt> {
    Ok(a | b)
}

fn bit_xor(a: &BigInt, b: &BigInt) -> Result<BigInt> {
    Ok(a ^ b)
}

fn shift_count(count: &BigInt) -> Result<Option<usize>> {
    if count.is_negative() {
        return Err(Error::invalid(format!("negative shift count {}", count)));
    }
    Ok(count.to_usize())
}

fn shl(a: &BigInt, count: &BigInt) -> Result<BigInt> {
    match shift_count(count)? {
        _ if a.is_zero() => Ok(BigInt::zero()),
        Some(n) => Ok(a << n),
        None => Err(Error::overflow(format!("shift count {} is too large", count))),
    }
}

fn shr(a: &BigInt, count: &BigInt) -> Result<BigInt> {
    match shift_count(count)? {
        Some(n) => Ok(a >> n),
        // everything shifted out: floor toward negative infinity
        None if a.is_negative() => Ok(-BigInt::one()),
        None => Ok(BigInt::zero()),
    }
}

fn pow(a: &BigInt, exp: &BigInt) -> Result<Proxied> {
    if exp.is_negative() {
        if a.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let base = a.to_f64().unwrap_or(f64::NAN);
        let exp = exp.to_f64().unwrap_or(f64::NEG_INFINITY);
        return Ok(Proxied::Float(base.powf(exp)));
    }
    if let Some(exp) = exp.to_u32() {
        return Ok(Proxied::Int(HugeInt::new(Pow::pow(a, exp))));
    }
    // only 0, 1 and -1 survive an exponent beyond u32
    if a.is_zero() || a.is_one() {
        return Ok(Proxied::Int(HugeInt::new(a.clone())));
    }
    if *a == -BigInt::one() {
        let value = if exp.is_even() { BigInt::one() } else { -BigInt::one() };
        return Ok(Proxied::Int(HugeInt::new(value)));
    }
    Err(Error::overflow(format!("exponent {} is too large", exp)))
}

/// `a / b` as the nearest `f64`, computed from a 64-bit scaled quotient so
/// operands far outside `f64` range still divide correctly.
fn true_div(a: &BigInt, b: &BigInt) -> Result<f64> {
    if b.is_zero() {
        return Err(Error::DivisionByZero);
    }
    if a.is_zero() {
        return Ok(0.0);
    }
    let (num, den) = (a.magnitude(), b.magnitude());
    let shift = 64 + den.bits() as i64 - num.bits() as i64;
    let (mut quotient, remainder) = if shift >= 0 {
        (num << shift as usize).div_rem(den)
    } else {
        num.div_rem(&(den << (-shift) as usize))
    };
    if !remainder.is_zero() {
        // sticky bit, well below f64 precision
        quotient |= num_bigint::BigUint::one();
    }
    let magnitude = scale_pow2(quotient.to_f64().unwrap_or(f64::INFINITY), -shift);
    if magnitude.is_infinite() {
        return Err(Error::overflow("integer division result too large for a float"));
    }
    if a.sign() == b.sign() {
        Ok(magnitude)
    } else {
        Ok(-magnitude)
    }
}

fn scale_pow2(mut value: f64, mut exp: i64) -> f64 {
    let step = 2f64.powi(1000);
    while exp > 1000 {
        value *= step;
        exp -= 1000;
    }
    while exp < -1000 {
        value /= step;
        exp += 1000;
    }
    value * 2f64.powi(exp as i32)
}

/// Round to `10^-ndigits`, ties to even. Non-negative `ndigits` is identity.
fn round_to(a: &BigInt, ndigits: i64) -> BigInt {
    if ndigits >= 0 {
        return a.clone();
    }
    let exp = ndigits.unsigned_abs();
    // 10^exp > 2|a| rounds to zero
    if exp > a.bits() + 1 {
        return BigInt::zero();
    }
    let unit = Pow::pow(BigInt::from(10), exp as u32);
    let (quotient, remainder) = a.div_mod_floor(&unit);
    let twice = remainder << 1u32;
    let quotient = match twice.cmp(&unit) {
        std::cmp::Ordering::Greater => quotient + 1u32,
        std::cmp::Ordering::Equal if quotient.is_odd() => quotient + 1u32,
        _ => quotient,
    };
    quotient * unit
}

fn expect_ok<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{}", err),
    }
}

fn apply<L, R>(lhs: &L, rhs: &R, kernel: Kernel) -> HugeInt
where
    L: Operand + ?Sized,
    R: Operand + ?Sized,
{
    HugeInt::new(expect_ok(kernel(&lhs.native(), &rhs.native())))
}

macro_rules! impl_binary_op {
    ($($Op: ident :: $method: ident, $OpAssign: ident :: $assign: ident => $kernel: path;)*) => {
    $(
    impl $Op<&HugeInt> for &HugeInt {
        type Output = HugeInt;

        fn $method(self, rhs: &HugeInt) -> HugeInt {
            apply(self, rhs, $kernel)
        }
    }

    impl $Op<HugeInt> for HugeInt {
        type Output = HugeInt;

        fn $method(self, rhs: HugeInt) -> HugeInt {
            apply(&self, &rhs, $kernel)
        }
    }

    impl $Op<&HugeInt> for HugeInt {
        type Output = HugeInt;

        fn $method(self, rhs: &HugeInt) -> HugeInt {
            apply(&self, rhs, $kernel)
        }
    }

    impl $Op<HugeInt> for &HugeInt {
        type Output = HugeInt;

        fn $method(self, rhs: HugeInt) -> HugeInt {
            apply(self, &rhs, $kernel)
        }
    }

    impl $Op<&BigInt> for &HugeInt {
        type Output = HugeInt;

        fn $method(self, rhs: &BigInt) -> HugeInt {
            apply(self, rhs, $kernel)
        }
    }

    impl $Op<BigInt> for HugeInt {
        type Output = HugeInt;

        fn $method(self, rhs: BigInt) -> HugeInt {
            apply(&self, &rhs, $kernel)
        }
    }

    impl $Op<&HugeInt> for &BigInt {
        type Output = HugeInt;

        fn $method(self, rhs: &HugeInt) -> HugeInt {
            apply(self, rhs, $kernel)
        }
    }

    impl $Op<HugeInt> for BigInt {
        type Output = HugeInt;

        fn $method(self, rhs: HugeInt) -> HugeInt {
            apply(&self, &rhs, $kernel)
        }
    }

    impl $Op<BigInt> for &HugeInt {
        type Output = HugeInt;

        fn $method(self, rhs: BigInt) -> HugeInt {
            apply(self, &rhs, $kernel)
        }
    }

    impl $Op<&BigInt> for HugeInt {
        type Output = HugeInt;

        fn $method(self, rhs: &BigInt) -> HugeInt {
            apply(&self, rhs, $kernel)
        }
    }

    impl $Op<&HugeInt> for BigInt {
        type Output = HugeInt;

        fn $method(self, rhs: &HugeInt) -> HugeInt {
            apply(&self, rhs, $kernel)
        }
    }

    impl $Op<HugeInt> for &BigInt {
        type Output = HugeInt;

        fn $method(self, rhs: HugeInt) -> HugeInt {
            apply(self, &rhs, $kernel)
        }
    }

    impl $OpAssign<&BigInt> for HugeInt {
        fn $assign(&mut self, rhs: &BigInt) {
            *self = apply(&*self, rhs, $kernel);
        }
    }

    impl $OpAssign<HugeInt> for HugeInt {
        fn $assign(&mut self, rhs: HugeInt) {
            *self = apply(&*self, &rhs, $kernel);
        }
    }

    impl $OpAssign<&HugeInt> for HugeInt {
        fn $assign(&mut self, rhs: &HugeInt) {
            *self = apply(&*self, rhs, $kernel);
        }
    }

    impl $OpAssign<BigInt> for HugeInt {
        fn $assign(&mut self, rhs: BigInt) {
            *self = apply(&*self, &rhs, $kernel);
        }
    }

    impl_binary_op!(@primitive $Op::$method, $OpAssign::$assign => $kernel;
        u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
    )*
    };
    (@primitive $Op: ident :: $method: ident, $OpAssign: ident :: $assign: ident => $kernel: path; $($t: ty),*) => {
    $(
    impl $Op<$t> for HugeInt {
        type Output = HugeInt;

        fn $method(self, rhs: $t) -> HugeInt {
            apply(&self, &rhs, $kernel)
        }
    }

    impl $Op<$t> for &HugeInt {
        type Output = HugeInt;

        fn $method(self, rhs: $t) -> HugeInt {
            apply(self, &rhs, $kernel)
        }
    }

    impl $Op<HugeInt> for $t {
        type Output = HugeInt;

        fn $method(self, rhs: HugeInt) -> HugeInt {
            apply(&self, &rhs, $kernel)
        }
    }

    impl $Op<&HugeInt> for $t {
        type Output = HugeInt;

        fn $method(self, rhs: &HugeInt) -> HugeInt {
            apply(&self, rhs, $kernel)
        }
    }

    impl $OpAssign<$t> for HugeInt {
        fn $assign(&mut self, rhs: $t) {
            *self = apply(&*self, &rhs, $kernel);
        }
    }
    )*
    };
}

// `/` and `%` floor like `Integer::div_floor`/`mod_floor` and panic on a
// zero divisor, as `BigInt` does. Shifts panic on a negative count.
impl_binary_op! {
    Add::add, AddAssign::add_assign => add;
    Sub::sub, SubAssign::sub_assign => sub;
    Mul::mul, MulAssign::mul_assign => mul;
    Div::div, DivAssign::div_assign => floor_div;
    Rem::rem, RemAssign::rem_assign => floor_mod;
    BitAnd::bitand, BitAndAssign::bitand_assign => bit_and;
    BitOr::bitor, BitOrAssign::bitor_assign => bit_or;
    BitXor::bitxor, BitXorAssign::bitxor_assign => bit_xor;
    Shl::shl, ShlAssign::shl_assign => shl;
    Shr::shr, ShrAssign::shr_assign => shr;
}

// 实现取反
impl Neg for &HugeInt {
    type Output = HugeInt;

    fn neg(self) -> HugeInt {
        HugeInt::new(-self.logical().as_ref())
    }
}

impl Neg for HugeInt {
    type Output = HugeInt;

    fn neg(self) -> HugeInt {
        -&self
    }
}

/// Two's complement inversion, `!x == -x - 1`.
impl Not for &HugeInt {
    type Output = HugeInt;

    fn not(self) -> HugeInt {
        HugeInt::new(!self.logical().as_ref())
    }
}

impl Not for HugeInt {
    type Output = HugeInt;

    fn not(self) -> HugeInt {
        !&self
    }
}

// 实现其他运算
impl HugeInt {
    pub fn abs(&self) -> HugeInt {
        match self.sign() {
            Sign::Minus => -self,
            _ => self.clone(),
        }
    }

    /// Floor quotient and floor remainder.
    pub fn divmod(&self, rhs: &HugeInt) -> Result<(HugeInt, HugeInt)> {
        let (a, b) = (self.logical(), rhs.logical());
        if b.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let (q, r) = a.div_mod_floor(&b);
        Ok((HugeInt::new(q), HugeInt::new(r)))
    }

    /// Exact quotient rounded to the nearest `f64`.
    pub fn true_div(&self, rhs: &HugeInt) -> Result<f64> {
        true_div(&self.logical(), &rhs.logical())
    }

    /// `self^exp mod modulus`, result taking the sign of `modulus`.
    ///
    /// A negative exponent uses the modular inverse of `self`.
    pub fn pow_mod(&self, exp: &HugeInt, modulus: &HugeInt) -> Result<HugeInt> {
        let (base, exp, modulus) = (self.logical(), exp.logical(), modulus.logical());
        if modulus.is_zero() {
            return Err(Error::invalid("pow_mod modulus cannot be zero"));
        }
        if !exp.is_negative() {
            return Ok(HugeInt::new(base.modpow(&exp, &modulus)));
        }
        let m = modulus.abs();
        let gcd = base.mod_floor(&m).extended_gcd(&m);
        if !gcd.gcd.is_one() {
            return Err(Error::invalid("base is not invertible for the given modulus"));
        }
        let inverse = gcd.x.mod_floor(&m);
        Ok(HugeInt::new(inverse.modpow(&-exp.as_ref(), &modulus)))
    }
}

/// Rounding operations; identity on integers apart from [`Rounding::round`]
/// with negative `ndigits`.
pub trait Rounding {
    fn floor(&self) -> HugeInt;
    fn ceil(&self) -> HugeInt;
    fn trunc(&self) -> HugeInt;
    /// Round to a multiple of `10^-ndigits`, ties to even.
    fn round(&self, ndigits: i64) -> HugeInt;
}

impl Rounding for HugeInt {
    fn floor(&self) -> HugeInt {
        self.clone()
    }

    fn ceil(&self) -> HugeInt {
        self.clone()
    }

    fn trunc(&self) -> HugeInt {
        self.clone()
    }

    fn round(&self, ndigits: i64) -> HugeInt {
        if ndigits >= 0 {
            return self.clone();
        }
        HugeInt::new(round_to(&self.logical(), ndigits))
    }
}

// 实现 num-traits
impl Zero for HugeInt {
    fn zero() -> Self {
        HugeInt::new(BigInt::zero())
    }

    fn is_zero(&self) -> bool {
        self.logical().is_zero()
    }
}

impl One for HugeInt {
    fn one() -> Self {
        HugeInt::new(BigInt::one())
    }
}

impl Num for HugeInt {
    type FromStrRadixErr = Error;

    fn from_str_radix(src: &str, radix: u32) -> Result<Self> {
        HugeInt::from_str_radix(src, radix)
    }
}

impl Signed for HugeInt {
    fn abs(&self) -> Self {
        HugeInt::abs(self)
    }

    fn abs_sub(&self, other: &Self) -> Self {
        if self <= other {
            HugeInt::zero()
        } else {
            self - other
        }
    }

    fn signum(&self) -> Self {
        match self.sign() {
            Sign::Minus => HugeInt::from(-1),
            Sign::NoSign => HugeInt::zero(),
            Sign::Plus => HugeInt::one(),
        }
    }

    fn is_positive(&self) -> bool {
        self.sign() == Sign::Plus
    }

    fn is_negative(&self) -> bool {
        self.sign() == Sign::Minus
    }
}

macro_rules! impl_pow {
    ($($t: ty),*) => {
    $(
    impl Pow<$t> for &HugeInt {
        type Output = HugeInt;

        fn pow(self, exp: $t) -> HugeInt {
            HugeInt::new(Pow::pow(self.logical().as_ref(), exp))
        }
    }

    impl Pow<$t> for HugeInt {
        type Output = HugeInt;

        fn pow(self, exp: $t) -> HugeInt {
            Pow::pow(&self, exp)
        }
    }
    )*
    };
}
impl_pow!(u8, u16, u32, u64, usize);

impl ToPrimitive for HugeInt {
    fn to_i64(&self) -> Option<i64> {
        self.logical().to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        self.logical().to_u64()
    }

    fn to_i128(&self) -> Option<i128> {
        self.logical().to_i128()
    }

    fn to_u128(&self) -> Option<u128> {
        self.logical().to_u128()
    }

    fn to_f64(&self) -> Option<f64> {
        self.logical().to_f64()
    }
}

impl FromPrimitive for HugeInt {
    fn from_i64(n: i64) -> Option<Self> {
        Some(HugeInt::from(n))
    }

    fn from_u64(n: u64) -> Option<Self> {
        Some(HugeInt::from(n))
    }

    fn from_i128(n: i128) -> Option<Self> {
        Some(HugeInt::from(n))
    }

    fn from_u128(n: u128) -> Option<Self> {
        Some(HugeInt::from(n))
    }

    fn from_f64(n: f64) -> Option<Self> {
        HugeInt::try_from(n).ok()
    }
}

impl CheckedDiv for HugeInt {
    fn checked_div(&self, v: &Self) -> Option<Self> {
        floor_div(&self.logical(), &v.logical()).ok().map(HugeInt::new)
    }
}

impl CheckedRem for HugeInt {
    fn checked_rem(&self, v: &Self) -> Option<Self> {
        floor_mod(&self.logical(), &v.logical()).ok().map(HugeInt::new)
    }
}

impl Integer for HugeInt {
    fn div_floor(&self, other: &Self) -> Self {
        self / other
    }

    fn mod_floor(&self, other: &Self) -> Self {
        self % other
    }

    fn gcd(&self, other: &Self) -> Self {
        HugeInt::new(self.logical().gcd(&other.logical()))
    }

    fn lcm(&self, other: &Self) -> Self {
        HugeInt::new(self.logical().lcm(&other.logical()))
    }

    fn divides(&self, other: &Self) -> bool {
        self.is_multiple_of(other)
    }

    fn is_multiple_of(&self, other: &Self) -> bool {
        self.logical().is_multiple_of(&other.logical())
    }

    fn is_even(&self) -> bool {
        self.logical().is_even()
    }

    fn is_odd(&self) -> bool {
        self.logical().is_odd()
    }

    /// Truncated quotient and remainder, as for `BigInt`.
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        let (q, r) = self.logical().div_rem(&other.logical());
        (HugeInt::new(q), HugeInt::new(r))
    }
}

// Summing in native form compresses the result once instead of per term.
impl Sum for HugeInt {
    fn sum<I: Iterator<Item = HugeInt>>(iter: I) -> Self {
        HugeInt::new(iter.map(|item| item.logical().into_owned()).sum())
    }
}

impl<'a> Sum<&'a HugeInt> for HugeInt {
    fn sum<I: Iterator<Item = &'a HugeInt>>(iter: I) -> Self {
        HugeInt::new(iter.map(|item| item.logical().into_owned()).sum())
    }
}

impl Product for HugeInt {
    fn product<I: Iterator<Item = HugeInt>>(iter: I) -> Self {
        HugeInt::new(iter.map(|item| item.logical().into_owned()).product())
    }
}

impl<'a> Product<&'a HugeInt> for HugeInt {
    fn product<I: Iterator<Item = &'a HugeInt>>(iter: I) -> Self {
        HugeInt::new(iter.map(|item| item.logical().into_owned()).product())
    }
}

/// Result of a dynamically dispatched operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Proxied {
    Int(HugeInt),
    Bool(bool),
    Float(f64),
}

impl Proxied {
    pub fn into_int(self) -> Option<HugeInt> {
        match self {
            Proxied::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Proxied::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Proxied::Float(value) => Some(*value),
            _ => None,
        }
    }
}

/// Operators reachable by name, e.g. from an expression evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    FloorDiv,
    TrueDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    And,
    Or,
    Xor,
    Neg,
    Pos,
    Abs,
    Invert,
    Floor,
    Ceil,
    Trunc,
    Round,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

const OPERATORS: [(Operator, &str); 26] = [
    (Operator::Add, "add"),
    (Operator::Sub, "sub"),
    (Operator::Mul, "mul"),
    (Operator::FloorDiv, "floordiv"),
    (Operator::TrueDiv, "truediv"),
    (Operator::Mod, "mod"),
    (Operator::Pow, "pow"),
    (Operator::LShift, "lshift"),
    (Operator::RShift, "rshift"),
    (Operator::And, "and"),
    (Operator::Or, "or"),
    (Operator::Xor, "xor"),
    (Operator::Neg, "neg"),
    (Operator::Pos, "pos"),
    (Operator::Abs, "abs"),
    (Operator::Invert, "invert"),
    (Operator::Floor, "floor"),
    (Operator::Ceil, "ceil"),
    (Operator::Trunc, "trunc"),
    (Operator::Round, "round"),
    (Operator::Eq, "eq"),
    (Operator::Ne, "ne"),
    (Operator::Lt, "lt"),
    (Operator::Le, "le"),
    (Operator::Gt, "gt"),
    (Operator::Ge, "ge"),
];

impl Operator {
    pub fn name(self) -> &'static str {
        OPERATORS
            .iter()
            .find(|(op, _)| *op == self)
            .map(|(_, name)| *name)
            .unwrap_or("?")
    }

    /// Accepted operand counts. `round` takes an optional `ndigits`.
    pub fn arity(self) -> std::ops::RangeInclusive<usize> {
        use Operator::*;
        match self {
            Neg | Pos | Abs | Invert | Floor | Ceil | Trunc => 1..=1,
            Round => 1..=2,
            _ => 2..=2,
        }
    }

    pub fn apply(self, operands: &[&HugeInt]) -> Result<Proxied> {
        if !self.arity().contains(&operands.len()) {
            return Err(Error::unsupported(format!(
                "`{}` takes {:?} operands, got {}",
                self,
                self.arity(),
                operands.len()
            )));
        }
        let natives: Vec<Cow<'_, BigInt>> = operands.iter().map(|op| op.native()).collect();
        let a = natives[0].as_ref();
        let b = || natives[1].as_ref();
        let int = |kernel: Kernel| -> Result<Proxied> { Ok(Proxied::Int(HugeInt::new(kernel(a, b())?))) };

        use Operator::*;
        match self {
            Add => int(add),
            Sub => int(sub),
            Mul => int(mul),
            FloorDiv => int(floor_div),
            Mod => int(floor_mod),
            And => int(bit_and),
            Or => int(bit_or),
            Xor => int(bit_xor),
            LShift => int(shl),
            RShift => int(shr),
            TrueDiv => true_div(a, b()).map(Proxied::Float),
            Pow => pow(a, b()),
            Neg => Ok(Proxied::Int(HugeInt::new(-a))),
            Pos | Floor | Ceil | Trunc => Ok(Proxied::Int(operands[0].clone())),
            Abs => Ok(Proxied::Int(operands[0].abs())),
            Invert => Ok(Proxied::Int(HugeInt::new(!a))),
            Round => {
                let ndigits = match natives.get(1) {
                    None => 0,
                    Some(n) if !n.is_negative() => 0,
                    Some(n) => n.to_i64().unwrap_or(i64::MIN),
                };
                Ok(Proxied::Int(HugeInt::new(round_to(a, ndigits))))
            }
            Eq => Ok(Proxied::Bool(a == b())),
            Ne => Ok(Proxied::Bool(a != b())),
            Lt => Ok(Proxied::Bool(a < b())),
            Le => Ok(Proxied::Bool(a <= b())),
            Gt => Ok(Proxied::Bool(a > b())),
            Ge => Ok(Proxied::Bool(a >= b())),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        OPERATORS
            .iter()
            .find(|(_, known)| *known == name)
            .map(|(op, _)| *op)
            .ok_or_else(|| Error::unsupported(format!("no operator named `{}` for HugeInt", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use test_case::test_case;

    fn huge(value: i64) -> HugeInt {
        HugeInt::with_config(BigInt::from(value), &Config::default().with_huge_num_threshold(0))
    }

    #[test]
    fn mixed_operands_yield_huge_int() {
        let ten = HugeInt::from(10);
        let sum: HugeInt = &ten + 10i32;
        assert_eq!(sum, 20);
        let reflected: HugeInt = 10i32 + &ten;
        assert_eq!(reflected, 20);
        let with_big: HugeInt = BigInt::from(5) * &ten;
        assert_eq!(with_big, 50);
        assert_eq!(&ten - BigInt::from(20), -10);
        assert_eq!(HugeInt::from(20) - 20i32, 0);
    }

    #[test]
    fn big_int_operands_in_every_ownership() {
        let ten = HugeInt::from(10);
        let three = BigInt::from(3);
        assert_eq!(&ten - &three, 7);
        assert_eq!(&ten - three.clone(), 7);
        assert_eq!(ten.clone() - &three, 7);
        assert_eq!(ten.clone() - three.clone(), 7);
        assert_eq!(&three - &ten, -7);
        assert_eq!(&three - ten.clone(), -7);
        assert_eq!(three.clone() - &ten, -7);
        assert_eq!(three.clone() - ten.clone(), -7);

        let mut value = ten.clone();
        value *= &three;
        assert_eq!(value, 30);
    }

    #[test_case(7, 2 ; "both positive")]
    #[test_case(-7, 2 ; "negative dividend")]
    #[test_case(7, -2 ; "negative divisor")]
    #[test_case(-7, -2 ; "both negative")]
    #[test_case(12, 4 ; "exact")]
    fn operators_match_native(x: i64, y: i64) {
        let (a, b) = (BigInt::from(x), BigInt::from(y));
        for (lhs, rhs) in [(HugeInt::from(x), HugeInt::from(y)), (huge(x), huge(y))] {
            assert_eq!(&lhs + &rhs, &a + &b);
            assert_eq!(&lhs - &rhs, &a - &b);
            assert_eq!(&lhs * &rhs, &a * &b);
            assert_eq!(&lhs / &rhs, a.div_floor(&b));
            assert_eq!(&lhs % &rhs, a.mod_floor(&b));
            assert_eq!(&lhs & &rhs, &a & &b);
            assert_eq!(&lhs | &rhs, &a | &b);
            assert_eq!(&lhs ^ &rhs, &a ^ &b);
            assert_eq!(-&lhs, -&a);
            assert_eq!(!&lhs, !&a);
            assert_eq!(&lhs << 3u32, &a << 3u32);
            assert_eq!(&lhs >> 1u32, &a >> 1u32);
        }
    }

    #[test]
    fn floor_semantics() {
        assert_eq!(HugeInt::from(-7) / 2i32, -4);
        assert_eq!(HugeInt::from(-7) % 2i32, 1);
        assert_eq!(HugeInt::from(7) % -2i32, -1);
        let (q, r) = HugeInt::from(-7).divmod(&HugeInt::from(2)).unwrap();
        assert_eq!((q, r), (HugeInt::from(-4), HugeInt::from(1)));
        assert!(HugeInt::from(1).divmod(&HugeInt::zero()).is_err());
    }

    #[test]
    fn assign_ops_rebind() {
        let mut value = HugeInt::from(1);
        value += 41i32;
        value *= HugeInt::from(2);
        value -= BigInt::from(4);
        value <<= 2u8;
        value >>= 1usize;
        value %= 7i32;
        assert_eq!(value, 160 % 7);
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn div_by_zero_panics() {
        let _ = HugeInt::from(1) / 0i32;
    }

    #[test]
    #[should_panic(expected = "negative shift count")]
    fn negative_shift_panics() {
        let _ = HugeInt::from(1) << -1i32;
    }

    #[test]
    fn huge_shift_counts() {
        let far = HugeInt::from(u128::MAX);
        assert_eq!(HugeInt::from(-5) >> &far, -1);
        assert_eq!(HugeInt::from(5) >> &far, 0);
        assert_eq!(HugeInt::zero() << &far, 0);
    }

    #[test]
    fn true_division() {
        assert_eq!(HugeInt::from(20).true_div(&HugeInt::from(10)).unwrap(), 2.0);
        assert_eq!(HugeInt::from(1).true_div(&HugeInt::from(-4)).unwrap(), -0.25);
        assert_eq!(HugeInt::from(1).true_div(&HugeInt::from(3)).unwrap(), 1.0 / 3.0);

        let big = Pow::pow(HugeInt::from(10), 400u32);
        let ratio = (&big * 3i32).true_div(&big).unwrap();
        assert_eq!(ratio, 3.0);
        assert_eq!(big.true_div(&HugeInt::one()).unwrap_err().category(), "overflow");
        assert!(matches!(HugeInt::one().true_div(&HugeInt::zero()), Err(Error::DivisionByZero)));
    }

    #[test]
    fn powers() {
        assert_eq!(Pow::pow(HugeInt::from(2), 10u32), 1024);
        assert_eq!(Pow::pow(&huge(-3), 3u8), -27);
        let two = HugeInt::from(2);
        let result = Operator::Pow.apply(&[&two, &HugeInt::from(-2)]).unwrap();
        assert_eq!(result, Proxied::Float(0.25));
        let one = Operator::Pow.apply(&[&HugeInt::from(-1), &HugeInt::from(u64::MAX)]).unwrap();
        assert_eq!(one.into_int().unwrap(), -1);
        assert!(Operator::Pow.apply(&[&two, &HugeInt::from(u64::MAX)]).is_err());
    }

    #[test]
    fn modular_power() {
        let (base, modulus) = (HugeInt::from(3), HugeInt::from(7));
        assert_eq!(base.pow_mod(&HugeInt::from(4), &modulus).unwrap(), 4);
        assert_eq!(base.pow_mod(&HugeInt::from(-1), &modulus).unwrap(), 5);
        assert_eq!(base.pow_mod(&HugeInt::from(2), &HugeInt::from(-7)).unwrap(), -5);
        assert!(HugeInt::from(2).pow_mod(&HugeInt::from(-1), &HugeInt::from(4)).is_err());
        assert!(base.pow_mod(&HugeInt::one(), &HugeInt::zero()).is_err());
    }

    #[test_case(1234, -2 => 1200 ; "down")]
    #[test_case(1250, -2 => 1200 ; "tie to even below")]
    #[test_case(1350, -2 => 1400 ; "tie to even above")]
    #[test_case(-1251, -2 => -1300 ; "negative")]
    #[test_case(49, -5 => 0 ; "beyond magnitude")]
    #[test_case(1234, 3 => 1234 ; "positive ndigits")]
    fn rounding(value: i64, ndigits: i64) -> i64 {
        let rounded = Rounding::round(&HugeInt::from(value), ndigits);
        rounded.to_i64().unwrap()
    }

    #[test]
    fn rounding_identity_returns_new_instance() {
        let value = huge(-9);
        for rounded in [value.floor(), value.ceil(), value.trunc()] {
            assert_eq!(rounded, value);
            assert!(rounded.is_huge());
        }
    }

    #[test]
    fn num_traits_surface() {
        assert!(HugeInt::zero().is_zero());
        assert!(huge(0).is_zero());
        assert_eq!(Signed::abs(&huge(-5)), 5);
        assert_eq!(HugeInt::from(-5).signum(), -1);
        assert_eq!(HugeInt::from(3).abs_sub(&HugeInt::from(5)), 0);
        assert!(HugeInt::from(-1).is_negative());
        assert_eq!(HugeInt::from(12).gcd(&HugeInt::from(18)), 6);
        assert_eq!(HugeInt::from(4).lcm(&HugeInt::from(6)), 12);
        assert!(HugeInt::from(12).is_multiple_of(&HugeInt::from(4)));
        assert!(huge(7).is_odd());
        assert_eq!(HugeInt::from(-7).div_rem(&HugeInt::from(2)), (HugeInt::from(-3), HugeInt::from(-1)));
        assert_eq!(HugeInt::from(7).checked_div(&HugeInt::zero()), None);
        assert_eq!(HugeInt::from(7).checked_rem(&HugeInt::from(4)), Some(HugeInt::from(3)));
        assert_eq!(<HugeInt as Num>::from_str_radix("z", 36).unwrap(), 35);
        assert_eq!(HugeInt::from_f64(-3.7), Some(HugeInt::from(-3)));
        assert_eq!(huge(-3).to_i128(), Some(-3));
    }

    #[test]
    fn sums_and_products() {
        let values = [HugeInt::from(1), huge(2), HugeInt::from(3), huge(4)];
        assert_eq!(values.iter().sum::<HugeInt>(), 10);
        assert_eq!(values.iter().product::<HugeInt>(), 24);
        assert_eq!(values.into_iter().sum::<HugeInt>(), 10);
    }

    #[test]
    fn operator_names() {
        for (op, name) in OPERATORS {
            assert_eq!(name.parse::<Operator>().unwrap(), op);
            assert_eq!(op.to_string(), name);
        }
        let err = "matmul".parse::<Operator>().unwrap_err();
        assert_eq!(err.category(), "unsupported_operation");
    }

    #[test]
    fn dispatch_wraps_only_integers() {
        let (a, b) = (HugeInt::from(20), huge(10));
        let sum = Operator::Add.apply(&[&a, &b]).unwrap();
        assert_eq!(sum, Proxied::Int(HugeInt::from(30)));
        assert_eq!(Operator::FloorDiv.apply(&[&a, &b]).unwrap().into_int().unwrap(), 2);
        assert_eq!(Operator::TrueDiv.apply(&[&a, &b]).unwrap().as_float(), Some(2.0));
        assert_eq!(Operator::Gt.apply(&[&a, &b]).unwrap().as_bool(), Some(true));
        assert_eq!(Operator::Eq.apply(&[&b, &HugeInt::from(10)]).unwrap().as_bool(), Some(true));
        assert_eq!(Operator::Invert.apply(&[&a]).unwrap().into_int().unwrap(), -21);
        assert_eq!(Operator::Round.apply(&[&HugeInt::from(155)]).unwrap().into_int().unwrap(), 155);
        let rounded = Operator::Round.apply(&[&HugeInt::from(155), &HugeInt::from(-1)]).unwrap();
        assert_eq!(rounded.into_int().unwrap(), 160);
        assert!(matches!(
            Operator::Mod.apply(&[&a, &HugeInt::zero()]),
            Err(Error::DivisionByZero)
        ));
    }

    #[test]
    fn dispatch_checks_arity() {
        let a = HugeInt::from(1);
        for (op, operands) in [
            (Operator::Add, vec![&a]),
            (Operator::Neg, vec![&a, &a]),
            (Operator::Round, vec![]),
        ] {
            let err = op.apply(&operands).unwrap_err();
            assert_eq!(err.category(), "unsupported_operation", "{}", op);
        }
    }
}
