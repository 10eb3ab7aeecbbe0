//! # partint
//!
//! Fixed-width binary integers whose bits are only partially known.
//!
//! Every bit position keeps the exact set of viable values of its trailing
//! `PRECISION`-bit window, so carries through addition and multiplication
//! lose no more precision than that window allows.
//!
//! ```
//! use partint::Int64;
//!
//! let a = Int64::new("00u");
//! let one = Int64::one();
//! assert_eq!(a.add(&one).add(&one).write(true), "1u");
//! ```

pub mod domain;
pub mod script;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use domain::{Digit, ViableStates, PartialInt, Lattice, Int8, Int16, Int32, Int64};
pub use domain::{ParseError, DomainError, RecordError};
pub use script::{parse_script, load_script, Script, ScriptError, Session, EvalError};
