//! Soundness properties checked against concrete arithmetic.

use partint::{Int8, Int16, Int32, Lattice};
use proptest::prelude::*;

/// A digit string plus one concrete value consistent with it.
///
/// Each element is (digit kind, fill bit); the fill bit is used where the
/// digit is `u`.
fn pattern(max_len: usize) -> impl Strategy<Value = (String, u64)> {
    prop::collection::vec((0u8..3, any::<bool>()), 0..=max_len).prop_map(|digits| {
        let mut text = String::new();
        let mut value = 0u64;
        for (kind, fill) in digits {
            let (c, bit) = match kind {
                0 => ('0', false),
                1 => ('1', true),
                _ => ('u', fill),
            };
            text.push(c);
            value = (value << 1) | bit as u64;
        }
        (text, value)
    })
}

fn known_pattern(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), 0..=max_len)
        .prop_map(|bits| bits.into_iter().map(|b| if b { '1' } else { '0' }).collect())
}

proptest! {
    #[test]
    fn decode_admits_consistent_values((digits, n) in pattern(16)) {
        let v = Int16::new(&digits);
        prop_assert!(v.admits(n), "{} should admit {}", digits, n);
    }

    #[test]
    fn addition_is_sound((a, x) in pattern(16), (b, y) in pattern(16)) {
        let sum = Int16::new(&a).add(&Int16::new(&b));
        prop_assert!(sum.admits((x + y) & 0xFFFF), "{} + {} lost {} + {}", a, b, x, y);
    }

    #[test]
    fn addition_commutes((a, _x) in pattern(16), (b, _y) in pattern(16)) {
        let (a, b) = (Int16::new(&a), Int16::new(&b));
        prop_assert_eq!(a.add(&b), b.add(&a));
    }

    #[test]
    fn multiplication_is_sound((a, x) in pattern(8), (b, y) in pattern(8)) {
        let product = Int8::new(&a).multiply(&Int8::new(&b));
        prop_assert!(product.admits((x * y) & 0xFF), "{} * {} lost {} * {}", a, b, x, y);
    }

    #[test]
    fn multiplication_of_constants_is_exact(x in any::<u16>(), y in any::<u16>()) {
        let product = Int16::constant(x as u64).multiply(&Int16::constant(y as u64));
        prop_assert_eq!(product, Int16::constant(x.wrapping_mul(y) as u64));
    }

    #[test]
    fn negation_of_constants_is_exact(n in any::<u32>()) {
        let neg = Int32::constant(n as u64).negate();
        prop_assert_eq!(neg, Int32::constant(n.wrapping_neg() as u64));
    }

    #[test]
    fn negation_is_sound((a, x) in pattern(8)) {
        let neg = Int8::new(&a).negate();
        prop_assert!(neg.admits(x.wrapping_neg() & 0xFF));
    }

    #[test]
    fn subtract_then_add_keeps_values((a, x) in pattern(8), (b, _y) in pattern(8)) {
        let (va, vb) = (Int8::new(&a), Int8::new(&b));
        let round = va.subtract(&vb).add(&vb);
        prop_assert!(round.admits(x), "({} - {}) + {} lost {}", a, b, b, x);
    }

    #[test]
    fn subtraction_is_sound((a, x) in pattern(16), (b, y) in pattern(16)) {
        let diff = Int16::new(&a).subtract(&Int16::new(&b));
        prop_assert!(diff.admits(x.wrapping_sub(y) & 0xFFFF));
    }

    #[test]
    fn shift_is_sound((a, x) in pattern(16), amount in 1usize..16) {
        let shifted = Int16::new(&a).left_shift(amount);
        prop_assert!(shifted.admits((x << amount) & 0xFFFF));
    }

    #[test]
    fn join_admits_both_sides((a, x) in pattern(16), (b, y) in pattern(16)) {
        let j = Int16::new(&a).join(&Int16::new(&b));
        prop_assert!(j.admits(x) && j.admits(y));
    }

    #[test]
    fn meet_keeps_common_values((a, x) in pattern(16)) {
        let v = Int16::new(&a);
        let m = v.meet(&Int16::constant(x));
        prop_assert!(m.admits(x));
        prop_assert_eq!(m, Int16::constant(x));
    }

    #[test]
    fn encode_is_idempotent_when_known(digits in known_pattern(16)) {
        let v = Int16::new(&digits);
        prop_assert!(v.is_fully_known());
        prop_assert_eq!(Int16::new(&v.write(true)), v);
        prop_assert_eq!(Int16::new(&v.write(false)), v);
    }

    #[test]
    fn enumeration_matches_contains((a, _x) in pattern(16), bit in 0usize..16) {
        let v = Int16::new(&a);
        let states = v.states(bit);
        let mut walked = Vec::new();
        let mut s = v.first_viable(bit);
        while s != Int16::STATES {
            walked.push(s);
            s = v.next_viable(bit, s);
        }
        let expected: Vec<u32> = (0..Int16::STATES).filter(|&s| states.contains(s)).collect();
        prop_assert_eq!(walked, expected);
    }
}
