//! Arithmetic on partially-known integers.
//!
//! Provides addition, left shift, multiplication, negation and subtraction.
//! All operations are total and return fresh values.

use log::{debug, trace};
use crate::domain::{PartialInt, ViableStates};
use crate::domain::ops::Lattice;

/// Add two values.
///
/// Every position combines each viable window of `lhs` with each viable
/// window of `rhs` and every admitted carry into the window's lowest bit.
/// That carry is the carry out of position `bit - PRECISION`, so carry-out
/// flags are recorded per position and read back `PRECISION` steps later.
/// Below `PRECISION` the window reaches into the zero padding and the only
/// carry in is 0.
pub fn add<const W: usize, const P: usize>(
    lhs: &PartialInt<W, P>,
    rhs: &PartialInt<W, P>,
) -> PartialInt<W, P> {
    debug!("add({}, {})", lhs, rhs);

    let mut records = [ViableStates::<P>::empty(); W];
    // Carry flags describe the carry out of bit `i`.
    let mut no_carry_out = [false; W];
    let mut carry_out = [false; W];

    for bit in 0..W {
        let carry_in_zero = bit < P || no_carry_out[bit - P];
        let carry_in_one = bit >= P && carry_out[bit - P];

        let mut states = ViableStates::<P>::empty();
        for a in lhs.states(bit) {
            for b in rhs.states(bit) {
                for (admitted, carry) in [(carry_in_zero, 0), (carry_in_one, 1)] {
                    if !admitted {
                        continue;
                    }
                    let sum = a + b + carry;
                    states.insert(sum & ViableStates::<P>::STATE_MASK);
                    if sum >> P != 0 {
                        carry_out[bit] = true;
                    } else {
                        no_carry_out[bit] = true;
                    }
                }
            }
        }
        trace!(
            "add: bit {} carry-in {{0: {}, 1: {}}} -> {:?}",
            bit, carry_in_zero, carry_in_one, states
        );
        records[bit] = states;
    }

    PartialInt::from_records(records)
}

/// Shift left by `amount` bits, filling the low bits with known zeros.
///
/// # Panics
/// Panics unless `0 < amount < W`.
pub fn left_shift<const W: usize, const P: usize>(
    value: &PartialInt<W, P>,
    amount: usize,
) -> PartialInt<W, P> {
    assert!(amount != 0 && amount < W, "out of bounds shift: {} (width {})", amount, W);

    let source = value.records();
    let mut records = [ViableStates::<P>::only(0); W];
    records[amount..].copy_from_slice(&source[..W - amount]);
    PartialInt::from_records(records)
}

/// Multiply by shift-and-add over the bits of `rhs`.
///
/// Known-zero multiplier bits contribute nothing and are skipped. A known-one
/// bit adds `lhs << k`; an unknown bit adds `lhs << k` joined with zero, since
/// that partial product may be either.
pub fn multiply<const W: usize, const P: usize>(
    lhs: &PartialInt<W, P>,
    rhs: &PartialInt<W, P>,
) -> PartialInt<W, P> {
    debug!("multiply({}, {})", lhs, rhs);

    let zero = PartialInt::<W, P>::zero();
    let mut product = zero;
    for bit in 0..W {
        let (known_one, known_zero) = rhs.coerce_bit(bit);
        if known_zero {
            continue;
        }
        let term = if bit == 0 { *lhs } else { left_shift(lhs, bit) };
        let term = if known_one { term } else { term.join(&zero) };
        product = add(&product, &term);
    }
    product
}

/// Two's-complement negation: complement every bit, then add one.
///
/// Complementing flips the real bits of each window state and leaves the
/// zero padding below position 0 alone.
pub fn negate<const W: usize, const P: usize>(value: &PartialInt<W, P>) -> PartialInt<W, P> {
    debug!("negate({})", value);
    add(&complement(value), &PartialInt::one())
}

/// Bitwise complement (`!value`).
pub fn complement<const W: usize, const P: usize>(value: &PartialInt<W, P>) -> PartialInt<W, P> {
    let source = value.records();
    let records = std::array::from_fn(|bit| {
        source[bit].complement(PartialInt::<W, P>::real_bits(bit))
    });
    PartialInt::from_records(records)
}

/// Subtract `rhs` from `lhs` as `lhs + (-rhs)`.
#[inline]
pub fn subtract<const W: usize, const P: usize>(
    lhs: &PartialInt<W, P>,
    rhs: &PartialInt<W, P>,
) -> PartialInt<W, P> {
    add(lhs, &negate(rhs))
}

impl<const W: usize, const P: usize> PartialInt<W, P> {
    /// See [`add`].
    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        add(self, other)
    }

    /// See [`multiply`].
    #[inline]
    pub fn multiply(&self, other: &Self) -> Self {
        multiply(self, other)
    }

    /// See [`left_shift`].
    #[inline]
    pub fn left_shift(&self, amount: usize) -> Self {
        left_shift(self, amount)
    }

    /// Shift left, returning `None` unless `0 < amount < W`.
    pub fn checked_left_shift(&self, amount: usize) -> Option<Self> {
        (amount != 0 && amount < W).then(|| left_shift(self, amount))
    }

    /// See [`negate`].
    #[inline]
    pub fn negate(&self) -> Self {
        negate(self)
    }

    /// See [`subtract`].
    #[inline]
    pub fn subtract(&self, other: &Self) -> Self {
        subtract(self, other)
    }

    /// See [`complement`].
    #[inline]
    pub fn complement(&self) -> Self {
        complement(self)
    }
}
