//! Per-bit knowledge classification.
//!
//! A bit of a partially-known integer is in one of four states:
//! - `'0'` = known zero
//! - `'1'` = known one
//! - `'u'` = unknown (both values viable)
//! - `'T'` = conflict (no value viable)

use std::fmt;
use serde::{Serialize, Deserialize};

/// What is known about a single bit position.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Digit {
    /// Definitely 0.
    Zero,
    /// Definitely 1.
    One,
    /// Either value is possible.
    Unknown,
    /// No value is possible (infeasible bit).
    Conflict,
}

impl Digit {
    /// The three digits accepted when decoding, in alphabet order.
    pub const DECODABLE: [Digit; 3] = [Digit::Zero, Digit::One, Digit::Unknown];

    /// Parse a decodable digit character.
    ///
    /// `'T'` is display-only and is rejected here.
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Digit::Zero),
            '1' => Some(Digit::One),
            'u' => Some(Digit::Unknown),
            _ => None,
        }
    }

    /// Render as a single character.
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            Digit::Zero => '0',
            Digit::One => '1',
            Digit::Unknown => 'u',
            Digit::Conflict => 'T',
        }
    }

    /// Build a digit from the two derived knowledge flags of a position.
    #[inline]
    pub const fn classify(known_one: bool, known_zero: bool) -> Self {
        match (known_one, known_zero) {
            (true, true) => Digit::Conflict,
            (true, false) => Digit::One,
            (false, true) => Digit::Zero,
            (false, false) => Digit::Unknown,
        }
    }

    /// Whether a concrete 0 is consistent with this digit.
    #[inline]
    pub const fn may_be_zero(self) -> bool {
        matches!(self, Digit::Zero | Digit::Unknown)
    }

    /// Whether a concrete 1 is consistent with this digit.
    #[inline]
    pub const fn may_be_one(self) -> bool {
        matches!(self, Digit::One | Digit::Unknown)
    }

    /// Returns true if the bit has a single known value.
    #[inline]
    pub const fn is_known(self) -> bool {
        matches!(self, Digit::Zero | Digit::One)
    }

    /// Whether the concrete bit `bit` is consistent with this digit.
    #[inline]
    pub const fn admits(self, bit: bool) -> bool {
        if bit { self.may_be_one() } else { self.may_be_zero() }
    }

    /// Swap known zero and known one; unknown and conflict are unchanged.
    #[inline]
    pub const fn not(self) -> Self {
        match self {
            Digit::Zero => Digit::One,
            Digit::One => Digit::Zero,
            other => other,
        }
    }
}

impl Default for Digit {
    fn default() -> Self {
        Digit::Zero
    }
}

impl fmt::Debug for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl std::ops::Not for Digit {
    type Output = Self;

    fn not(self) -> Self::Output {
        Digit::not(self)
    }
}

impl From<bool> for Digit {
    fn from(bit: bool) -> Self {
        if bit { Digit::One } else { Digit::Zero }
    }
}
