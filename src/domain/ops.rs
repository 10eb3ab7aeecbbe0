//! Lattice operations and operator sugar.
//!
//! [`Lattice`] is implemented for both a single record and a whole value, so
//! code that merges knowledge works at either granularity.

use crate::domain::{PartialInt, ViableStates};

/// Trait for abstract values ordered by how much they admit.
pub trait Lattice {
    /// Least upper bound: admits everything either side admits.
    fn join(&self, other: &Self) -> Self;

    /// Greatest lower bound: admits only what both sides admit.
    fn meet(&self, other: &Self) -> Self;

    /// True if `self` is below or equal to `other` in the lattice.
    fn is_subsumed_by(&self, other: &Self) -> bool;
}

impl<const P: usize> Lattice for ViableStates<P> {
    #[inline]
    fn join(&self, other: &Self) -> Self {
        self.union(*other)
    }

    #[inline]
    fn meet(&self, other: &Self) -> Self {
        self.intersection(*other)
    }

    #[inline]
    fn is_subsumed_by(&self, other: &Self) -> bool {
        self.bits() & !other.bits() == 0
    }
}

// Record-wise lifting to whole values.
impl<const W: usize, const P: usize> Lattice for PartialInt<W, P> {
    fn join(&self, other: &Self) -> Self {
        let (lhs, rhs) = (self.records(), other.records());
        PartialInt::from_records(std::array::from_fn(|bit| lhs[bit].join(&rhs[bit])))
    }

    fn meet(&self, other: &Self) -> Self {
        let (lhs, rhs) = (self.records(), other.records());
        PartialInt::from_records(std::array::from_fn(|bit| lhs[bit].meet(&rhs[bit])))
    }

    fn is_subsumed_by(&self, other: &Self) -> bool {
        self.records()
            .iter()
            .zip(other.records())
            .all(|(lhs, rhs)| lhs.is_subsumed_by(rhs))
    }
}

// Implement the binary operators for every owned/borrowed combination using a macro
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $func:path) => {
        impl<const W: usize, const P: usize> std::ops::$trait for PartialInt<W, P> {
            type Output = PartialInt<W, P>;

            fn $method(self, rhs: Self) -> Self::Output {
                $func(&self, &rhs)
            }
        }

        impl<const W: usize, const P: usize> std::ops::$trait<&PartialInt<W, P>> for PartialInt<W, P> {
            type Output = PartialInt<W, P>;

            fn $method(self, rhs: &PartialInt<W, P>) -> Self::Output {
                $func(&self, rhs)
            }
        }

        impl<const W: usize, const P: usize> std::ops::$trait for &PartialInt<W, P> {
            type Output = PartialInt<W, P>;

            fn $method(self, rhs: Self) -> Self::Output {
                $func(self, rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, crate::domain::arith::add);
impl_binary_op!(Sub, sub, crate::domain::arith::subtract);
impl_binary_op!(Mul, mul, crate::domain::arith::multiply);

impl<const W: usize, const P: usize> std::ops::Neg for PartialInt<W, P> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        crate::domain::arith::negate(&self)
    }
}

impl<const W: usize, const P: usize> std::ops::Not for PartialInt<W, P> {
    type Output = Self;

    fn not(self) -> Self::Output {
        crate::domain::arith::complement(&self)
    }
}

impl<const W: usize, const P: usize> std::ops::Shl<usize> for PartialInt<W, P> {
    type Output = Self;

    /// # Panics
    /// Panics unless `0 < amount < W`.
    fn shl(self, amount: usize) -> Self::Output {
        crate::domain::arith::left_shift(&self, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Int8, Int64};

    #[test]
    fn test_join_admits_both() {
        let a = Int8::constant(3);
        let b = Int8::constant(12);
        let j = a.join(&b);
        assert!(j.admits(3));
        assert!(j.admits(12));
        assert!(a.is_subsumed_by(&j));
        assert!(b.is_subsumed_by(&j));
        assert!(!j.is_subsumed_by(&a));
    }

    #[test]
    fn test_meet_of_disjoint_is_infeasible() {
        let m = Int8::constant(3).meet(&Int8::constant(12));
        assert!(m.is_infeasible());
        assert!(!m.admits(3));
        assert!(!m.admits(12));
    }

    #[test]
    fn test_meet_narrows() {
        let a = Int8::new("u1");
        let b = Int8::new("1u");
        let m = a.meet(&b);
        assert_eq!(m, Int8::constant(3));
        assert_eq!(m.join(&m), m);
    }

    #[test]
    fn test_operators_match_methods() {
        let a = Int64::new("1u01");
        let b = Int64::new("u11");
        assert_eq!(a + b, a.add(&b));
        assert_eq!(&a + &b, a.add(&b));
        assert_eq!(a - b, a.subtract(&b));
        assert_eq!(a * &b, a.multiply(&b));
        assert_eq!(-a, a.negate());
        assert_eq!(!a, a.complement());
        assert_eq!(a << 3, a.left_shift(3));
    }

    #[test]
    fn test_record_lattice() {
        let x: ViableStates<3> = [1, 2].into_iter().collect();
        let y: ViableStates<3> = [2, 5].into_iter().collect();
        assert_eq!(x.join(&y).iter().collect::<Vec<_>>(), vec![1, 2, 5]);
        assert_eq!(x.meet(&y).iter().collect::<Vec<_>>(), vec![2]);
        assert!(x.meet(&y).is_subsumed_by(&x));
    }
}
