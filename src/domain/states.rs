//! Viable window states of a single bit position.
//!
//! A bit position of a [`PartialInt`](crate::PartialInt) stores the set of
//! values its trailing `PRECISION`-bit window may take. With `PRECISION <= 6`
//! there are at most 64 states, so the set is a single `u64` with bit `s` set
//! iff state `s` is viable.

use std::fmt;

/// Dense set of viable states in `[0, 2^PRECISION)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViableStates<const PRECISION: usize> {
    bits: u64,
}

impl<const PRECISION: usize> ViableStates<PRECISION> {
    /// Number of distinct window states; also the "no more states" sentinel.
    pub const STATES: u32 = 1 << PRECISION;

    /// Largest state value, all window bits set.
    pub const STATE_MASK: u32 = Self::STATES - 1;

    /// Weight of the window's most significant bit (the bit the record describes).
    pub const TOP_BIT: u32 = 1 << (PRECISION - 1);

    /// Set-bits mask covering every state.
    const FULL: u64 = if PRECISION >= 6 { u64::MAX } else { (1u64 << Self::STATES) - 1 };

    /// Set-bits mask covering the low half, states whose top window bit is 0.
    const LOW_HALF: u64 = (1u64 << Self::TOP_BIT) - 1;

    /// Set-bits mask covering the high half, states whose top window bit is 1.
    const HIGH_HALF: u64 = Self::FULL & !Self::LOW_HALF;

    const VALID: () = assert!(
        PRECISION >= 1 && PRECISION <= 6,
        "precision must be between 1 and 6"
    );

    /// The empty set (the contradiction element).
    #[inline]
    pub const fn empty() -> Self {
        let () = Self::VALID;
        Self { bits: 0 }
    }

    /// Every state viable.
    #[inline]
    pub const fn full() -> Self {
        let () = Self::VALID;
        Self { bits: Self::FULL }
    }

    /// A set holding exactly one state.
    ///
    /// # Panics
    /// Panics if `state >= 2^PRECISION`.
    #[inline]
    pub fn only(state: u32) -> Self {
        let mut set = Self::empty();
        set.insert(state);
        set
    }

    /// Rebuild a set from its raw bits, rejecting states out of range.
    pub fn from_bits(bits: u64) -> Option<Self> {
        let () = Self::VALID;
        if bits & !Self::FULL != 0 {
            return None;
        }
        Some(Self { bits })
    }

    /// Raw set bits (bit `s` set iff state `s` is viable).
    #[inline]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Check whether `state` is viable.
    #[inline]
    pub const fn contains(&self, state: u32) -> bool {
        state < Self::STATES && self.bits & (1u64 << state) != 0
    }

    /// Mark `state` as viable.
    ///
    /// # Panics
    /// Panics if `state >= 2^PRECISION`.
    #[inline]
    pub fn insert(&mut self, state: u32) {
        assert!(
            state < Self::STATES,
            "window state {} out of range for precision {}",
            state, PRECISION
        );
        self.bits |= 1u64 << state;
    }

    /// True if no state is viable.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of viable states.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.bits.count_ones()
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self { bits: self.bits | other.bits }
    }

    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self { bits: self.bits & other.bits }
    }

    /// No viable state has a 0 in the top window slot.
    #[inline]
    pub const fn known_one(&self) -> bool {
        self.bits & Self::LOW_HALF == 0
    }

    /// No viable state has a 1 in the top window slot.
    #[inline]
    pub const fn known_zero(&self) -> bool {
        self.bits & Self::HIGH_HALF == 0
    }

    /// Smallest viable state, or [`Self::STATES`] when the set is empty.
    #[inline]
    pub const fn first(&self) -> u32 {
        if self.bits == 0 {
            Self::STATES
        } else {
            self.bits.trailing_zeros()
        }
    }

    /// Smallest viable state strictly greater than `previous`, or [`Self::STATES`].
    ///
    /// Stateless: any `previous` may be passed, in any order.
    #[inline]
    pub const fn next_after(&self, previous: u32) -> u32 {
        if previous >= Self::STATE_MASK {
            return Self::STATES;
        }
        let rest = self.bits & (u64::MAX << (previous + 1));
        if rest == 0 {
            Self::STATES
        } else {
            rest.trailing_zeros()
        }
    }

    /// Ascending iterator over the viable states.
    #[inline]
    pub fn iter(&self) -> StateIter<PRECISION> {
        StateIter { states: *self, cursor: None }
    }

    /// Window states after appending one more significant bit.
    ///
    /// Every viable state drops its lowest bit and takes the new bit in the top
    /// slot; `may_be_zero`/`may_be_one` say which new bit values are allowed.
    pub fn shift_in(&self, may_be_zero: bool, may_be_one: bool) -> Self {
        let mut next = Self::empty();
        for state in self.iter() {
            let kept = state >> 1;
            if may_be_zero {
                next.insert(kept);
            }
            if may_be_one {
                next.insert(kept | Self::TOP_BIT);
            }
        }
        next
    }

    /// Replace every state `s` with `s ^ mask`.
    pub fn complement(&self, mask: u32) -> Self {
        let mask = mask & Self::STATE_MASK;
        let mut flipped = Self::empty();
        for state in self.iter() {
            flipped.insert(state ^ mask);
        }
        flipped
    }
}

impl<const PRECISION: usize> fmt::Debug for ViableStates<PRECISION> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<const PRECISION: usize> IntoIterator for ViableStates<PRECISION> {
    type Item = u32;
    type IntoIter = StateIter<PRECISION>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<const PRECISION: usize> FromIterator<u32> for ViableStates<PRECISION> {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = Self::empty();
        for state in iter {
            set.insert(state);
        }
        set
    }
}

/// Cursor over a copied [`ViableStates`], driven by `first`/`next_after`.
#[derive(Clone, Debug)]
pub struct StateIter<const PRECISION: usize> {
    states: ViableStates<PRECISION>,
    cursor: Option<u32>,
}

impl<const PRECISION: usize> Iterator for StateIter<PRECISION> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let next = match self.cursor {
            None => self.states.first(),
            Some(prev) => self.states.next_after(prev),
        };
        self.cursor = Some(next);
        (next < ViableStates::<PRECISION>::STATES).then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type States6 = ViableStates<6>;
    type States3 = ViableStates<3>;

    #[test]
    fn test_empty_sentinel() {
        let empty = States3::empty();
        assert_eq!(empty.first(), 8);
        assert_eq!(empty.next_after(0), 8);
        assert!(empty.known_one() && empty.known_zero());
        assert_eq!(States6::empty().first(), 64);
    }

    #[test]
    fn test_enumeration_is_restartable() {
        let set: States6 = [3, 17, 40, 63].into_iter().collect();
        assert_eq!(set.first(), 3);
        assert_eq!(set.next_after(3), 17);
        assert_eq!(set.next_after(17), 40);
        assert_eq!(set.next_after(5), 17);
        assert_eq!(set.next_after(40), 63);
        assert_eq!(set.next_after(63), 64);
        // Asking again from an earlier point gives the same answers.
        assert_eq!(set.next_after(3), 17);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 17, 40, 63]);
        assert_eq!(set.iter().count(), set.len() as usize);
    }

    #[test]
    fn test_known_halves() {
        // Precision 3: low half is 0..4, high half is 4..8.
        let low: States3 = [0, 3].into_iter().collect();
        let high: States3 = [4, 7].into_iter().collect();
        let mixed: States3 = [1, 6].into_iter().collect();
        assert!(low.known_zero() && !low.known_one());
        assert!(high.known_one() && !high.known_zero());
        assert!(!mixed.known_one() && !mixed.known_zero());
    }

    #[test]
    fn test_shift_in() {
        let start = States3::only(0);
        assert_eq!(start.shift_in(false, true), States3::only(4));
        let both = start.shift_in(true, true);
        assert_eq!(both.iter().collect::<Vec<_>>(), vec![0, 4]);
        let next = both.shift_in(true, false);
        assert_eq!(next.iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_complement_masks_window() {
        let set: States3 = [0, 5].into_iter().collect();
        assert_eq!(set.complement(0b111).iter().collect::<Vec<_>>(), vec![2, 7]);
        assert_eq!(set.complement(0b100).iter().collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_from_bits_range() {
        assert!(States3::from_bits(0xFF).is_some());
        assert!(States3::from_bits(0x100).is_none());
        assert!(States6::from_bits(u64::MAX).is_some());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_insert_out_of_range() {
        States3::only(8);
    }
}
