//! Fixed-width partially-known integers.
//!
//! `PartialInt<WIDTH, PRECISION>` keeps one [`ViableStates`] record per bit.
//! The record at position `i` lists the viable values of bits
//! `i - PRECISION + 1 ..= i`, with bit `i` in the top slot of the window.
//! Bits below position 0 are a synthetic zero padding.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::domain::{Digit, ViableStates};

/// A `WIDTH`-bit integer whose bits are only partially known.
///
/// Arithmetic lives in [`arith`](crate::domain::arith); every operation
/// returns a fresh value.
///
/// Equality compares the per-bit records, not the sets of admitted
/// concrete values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RawRecords", try_from = "RawRecords")]
pub struct PartialInt<const WIDTH: usize, const PRECISION: usize> {
    /// Records stored from least significant (index 0) to most significant.
    records: [ViableStates<PRECISION>; WIDTH],
}

/// 8-bit values tracked with a 4-bit window.
pub type Int8 = PartialInt<8, 4>;

/// 16-bit values tracked with a 5-bit window.
pub type Int16 = PartialInt<16, 5>;

/// 32-bit values tracked with a 6-bit window.
pub type Int32 = PartialInt<32, 6>;

/// 64-bit values tracked with a 6-bit window.
pub type Int64 = PartialInt<64, 6>;

// ============================================================================
// Construction
// ============================================================================

impl<const WIDTH: usize, const PRECISION: usize> PartialInt<WIDTH, PRECISION> {
    /// Window states per position; sentinel of the enumeration API.
    pub const STATES: u32 = ViableStates::<PRECISION>::STATES;

    const VALID: () = assert!(
        WIDTH >= 1 && WIDTH <= 64 && PRECISION >= 1 && PRECISION <= 6 && PRECISION <= WIDTH,
        "unsupported shape: need 1 <= PRECISION <= 6, PRECISION <= WIDTH <= 64"
    );

    /// Value with every record empty. Only used as scratch before filling.
    pub(crate) fn blank() -> Self {
        let () = Self::VALID;
        Self { records: [ViableStates::empty(); WIDTH] }
    }

    pub(crate) fn from_records(records: [ViableStates<PRECISION>; WIDTH]) -> Self {
        let () = Self::VALID;
        Self { records }
    }

    /// The definitely-zero value.
    pub fn zero() -> Self {
        let () = Self::VALID;
        Self { records: [ViableStates::only(0); WIDTH] }
    }

    /// The definitely-one value.
    pub fn one() -> Self {
        Self::constant(1)
    }

    /// Every bit unknown.
    pub fn unknown() -> Self {
        let mut value = Self::blank();
        let mut running = ViableStates::only(0);
        for record in value.records.iter_mut() {
            running = running.shift_in(true, true);
            *record = running;
        }
        value
    }

    /// Build from a unit literal.
    ///
    /// # Panics
    /// Panics if `value` is not 0 or 1.
    pub fn from_unit(value: u32) -> Self {
        assert!(value == 0 || value == 1, "unit literal must be 0 or 1, got {}", value);
        Self::constant(value as u64)
    }

    /// Build the exact value `value`.
    ///
    /// # Panics
    /// Panics if `value` does not fit in `WIDTH` bits.
    pub fn constant(value: u64) -> Self {
        match Self::try_constant(value) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }

    /// Build the exact value `value`, rejecting values wider than `WIDTH`.
    pub fn try_constant(value: u64) -> Result<Self, DomainError> {
        if !Self::fits(value) {
            return Err(DomainError::OutOfRange { value, width: WIDTH });
        }
        let mut result = Self::blank();
        for bit in 0..WIDTH {
            result.records[bit] = ViableStates::only(Self::window(value, bit));
        }
        Ok(result)
    }

    /// Decode a ternary digit string.
    ///
    /// # Panics
    /// Panics on strings longer than `WIDTH` or characters outside `{0, 1, u}`.
    pub fn new(digits: &str) -> Self {
        match Self::parse(digits) {
            Ok(v) => v,
            Err(e) => panic!("cannot decode {:?}: {}", digits, e),
        }
    }

    /// Decode a ternary digit string (MSB first, alphabet `{0, 1, u}`).
    ///
    /// Missing high digits are zero. Each position's record is derived from
    /// the previous one by shifting the new digit into the window, so the
    /// records stay jointly consistent all the way up.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let () = Self::VALID;
        let digits = s
            .chars()
            .enumerate()
            .map(|(index, c)| Digit::from_char(c).ok_or(ParseError::InvalidDigit { digit: c, index }))
            .collect::<Result<Vec<_>, _>>()?;

        if digits.len() > WIDTH {
            return Err(ParseError::TooLong { width: WIDTH, got: digits.len() });
        }

        let mut result = Self::blank();
        let mut running = ViableStates::only(0);
        for bit in 0..WIDTH {
            let digit = if bit < digits.len() {
                digits[digits.len() - 1 - bit]
            } else {
                Digit::Zero
            };
            running = running.shift_in(digit.may_be_zero(), digit.may_be_one());
            result.records[bit] = running;
        }
        Ok(result)
    }

    // ========================================================================
    // Window helpers
    // ========================================================================

    /// True if `value` fits in `WIDTH` bits.
    #[inline]
    pub(crate) const fn fits(value: u64) -> bool {
        WIDTH >= 64 || value >> WIDTH == 0
    }

    /// Window of `value` ending at `bit`, with zero padding below position 0.
    #[inline]
    pub(crate) const fn window(value: u64, bit: usize) -> u32 {
        let shifted = if bit + 1 >= PRECISION {
            value >> (bit + 1 - PRECISION)
        } else {
            value << (PRECISION - 1 - bit)
        };
        (shifted & ViableStates::<PRECISION>::STATE_MASK as u64) as u32
    }

    /// Window slots holding real bits at `bit` (the padding slots are cleared).
    #[inline]
    pub(crate) const fn real_bits(bit: usize) -> u32 {
        let mask = ViableStates::<PRECISION>::STATE_MASK;
        if bit + 1 >= PRECISION {
            mask
        } else {
            mask & !((1u32 << (PRECISION - 1 - bit)) - 1)
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All records, least significant first.
    #[inline]
    pub fn records(&self) -> &[ViableStates<PRECISION>; WIDTH] {
        &self.records
    }

    /// Viable states of the window ending at `bit`.
    #[inline]
    pub fn states(&self, bit: usize) -> ViableStates<PRECISION> {
        self.records[bit]
    }

    /// Smallest viable state at `bit`, or [`Self::STATES`] if there is none.
    #[inline]
    pub fn first_viable(&self, bit: usize) -> u32 {
        self.records[bit].first()
    }

    /// Smallest viable state at `bit` above `previous`, or [`Self::STATES`].
    #[inline]
    pub fn next_viable(&self, bit: usize, previous: u32) -> u32 {
        self.records[bit].next_after(previous)
    }

    /// Known-one and known-zero flags of `bit`, in that order.
    #[inline]
    pub fn coerce_bit(&self, bit: usize) -> (bool, bool) {
        let record = &self.records[bit];
        (record.known_one(), record.known_zero())
    }

    /// Classification of a single bit.
    #[inline]
    pub fn digit(&self, bit: usize) -> Digit {
        let (known_one, known_zero) = self.coerce_bit(bit);
        Digit::classify(known_one, known_zero)
    }

    /// Digits from least significant to most significant.
    pub fn digits(&self) -> [Digit; WIDTH] {
        std::array::from_fn(|bit| self.digit(bit))
    }

    /// True if `bit` is known zero or known one.
    pub fn is_known(&self, bit: usize) -> bool {
        self.digit(bit).is_known()
    }

    /// True if every bit is known zero or known one.
    pub fn is_fully_known(&self) -> bool {
        (0..WIDTH).all(|bit| self.is_known(bit))
    }

    /// True if some position has no viable state; such a value admits nothing.
    pub fn is_infeasible(&self) -> bool {
        self.records.iter().any(|r| r.is_empty())
    }

    /// Mask of bits known to be zero.
    pub fn known_zeros(&self) -> u64 {
        self.mask_of(Digit::Zero)
    }

    /// Mask of bits known to be one.
    pub fn known_ones(&self) -> u64 {
        self.mask_of(Digit::One)
    }

    fn mask_of(&self, wanted: Digit) -> u64 {
        (0..WIDTH)
            .filter(|&bit| self.digit(bit) == wanted)
            .fold(0u64, |mask, bit| mask | (1u64 << bit))
    }

    /// The concrete value, if every bit is known.
    pub fn to_constant(&self) -> Option<u64> {
        if !self.is_fully_known() {
            return None;
        }
        Some(self.known_ones())
    }

    /// Check whether the concrete value `value` is consistent with every record.
    ///
    /// Values wider than `WIDTH` are never admitted.
    pub fn admits(&self, value: u64) -> bool {
        Self::fits(value)
            && (0..WIDTH).all(|bit| self.records[bit].contains(Self::window(value, bit)))
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    /// Render as a ternary digit string, MSB first, alphabet `{0, 1, u, T}`.
    ///
    /// With `trim_leading_zeros` the leading run of `'0'` is dropped, keeping
    /// at least one character.
    pub fn write(&self, trim_leading_zeros: bool) -> String {
        let rendered: String = (0..WIDTH).rev().map(|bit| self.digit(bit).to_char()).collect();
        if !trim_leading_zeros {
            return rendered;
        }
        let trimmed = rendered.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl<const WIDTH: usize, const PRECISION: usize> Default for PartialInt<WIDTH, PRECISION> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const WIDTH: usize, const PRECISION: usize> fmt::Debug for PartialInt<WIDTH, PRECISION> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PartialInt<{}, {}>({})", WIDTH, PRECISION, self.write(true))
    }
}

impl<const WIDTH: usize, const PRECISION: usize> fmt::Display for PartialInt<WIDTH, PRECISION> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.write(true))
    }
}

impl<const WIDTH: usize, const PRECISION: usize> FromStr for PartialInt<WIDTH, PRECISION> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<const WIDTH: usize, const PRECISION: usize> TryFrom<u64> for PartialInt<WIDTH, PRECISION> {
    type Error = DomainError;

    /// Only the unit literals 0 and 1 convert; use [`PartialInt::constant`] for others.
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 | 1 => Self::try_constant(value),
            _ => Err(DomainError::NotAUnit(value)),
        }
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// Wire form of a [`PartialInt`]: the shape plus the raw record bits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecords {
    pub width: usize,
    pub precision: usize,
    /// Record bits, least significant position first.
    pub records: Vec<u64>,
}

impl<const WIDTH: usize, const PRECISION: usize> From<PartialInt<WIDTH, PRECISION>> for RawRecords {
    fn from(value: PartialInt<WIDTH, PRECISION>) -> Self {
        Self {
            width: WIDTH,
            precision: PRECISION,
            records: value.records.iter().map(|r| r.bits()).collect(),
        }
    }
}

impl<const WIDTH: usize, const PRECISION: usize> TryFrom<RawRecords> for PartialInt<WIDTH, PRECISION> {
    type Error = RecordError;

    fn try_from(raw: RawRecords) -> Result<Self, Self::Error> {
        if raw.width != WIDTH || raw.precision != PRECISION || raw.records.len() != WIDTH {
            return Err(RecordError::ShapeMismatch {
                width: raw.width,
                precision: raw.precision,
                records: raw.records.len(),
                expected_width: WIDTH,
                expected_precision: PRECISION,
            });
        }
        let mut result = Self::blank();
        for (bit, bits) in raw.records.into_iter().enumerate() {
            result.records[bit] = ViableStates::from_bits(bits)
                .ok_or(RecordError::StateOutOfRange { bit, bits })?;
        }
        Ok(result)
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when decoding digit strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected at most {width} digits, got {got}")]
    TooLong { width: usize, got: usize },

    #[error("invalid digit {digit:?} at index {index} (expected 0, 1 or u)")]
    InvalidDigit { digit: char, index: usize },
}

/// Errors that can occur when building values from concrete literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("literal {0} is not a unit value (0 or 1)")]
    NotAUnit(u64),

    #[error("value {value} does not fit in {width} bits")]
    OutOfRange { value: u64, width: usize },
}

/// Errors that can occur when rebuilding values from raw records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("shape mismatch: got width {width}, precision {precision} with {records} records, expected {expected_width}/{expected_precision}")]
    ShapeMismatch {
        width: usize,
        precision: usize,
        records: usize,
        expected_width: usize,
        expected_precision: usize,
    },

    #[error("record {bit} has states out of range: {bits:#x}")]
    StateOutOfRange { bit: usize, bits: u64 },
}

// ============================================================================
// Tests
// ============================================================================
