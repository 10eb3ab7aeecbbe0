//! Line-oriented scripts over partially-known integers.
//!
//! This module provides:
//! - A parser (text → [`Script`])
//! - An evaluator ([`Session`]) for one fixed width and precision
//! - Loading and saving script files

pub mod parser;
pub mod session;
pub mod file;

pub use parser::{parse_script, Script, Statement, BinaryOp, Line, ScriptError};
pub use session::{Session, EvalError};
pub use file::{load_script, save_script};
