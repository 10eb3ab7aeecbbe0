//! Partially-known integer primitives.
//!
//! This module provides the core types of the abstract domain:
//! - [`Digit`] - What is known about one bit (0, 1, unknown, conflict)
//! - [`ViableStates`] - The viable trailing-window values of one bit position
//! - [`PartialInt`] - A fixed-width integer built from one record per bit

mod digit;
mod states;
mod integer;
pub mod ops;
pub mod arith;

pub use digit::Digit;
pub use states::{ViableStates, StateIter};
pub use integer::{PartialInt, Int8, Int16, Int32, Int64};
pub use integer::{ParseError, DomainError, RecordError, RawRecords};
pub use ops::Lattice;
pub use arith::{add, subtract, multiply, negate, left_shift, complement};
