//! Script evaluation.
//!
//! A [`Session`] holds named values of one fixed shape and executes parsed
//! statements against them, collecting the lines they emit.

use std::collections::BTreeMap;
use log::{debug, info};
use thiserror::Error;
use crate::domain::{DomainError, Lattice, ParseError, PartialInt};
use crate::script::parser::{BinaryOp, Line, Script, Statement};

/// Evaluation state for `PartialInt<W, P>` scripts.
#[derive(Clone, Debug, Default)]
pub struct Session<const W: usize, const P: usize> {
    /// Named values.
    vars: BTreeMap<String, PartialInt<W, P>>,
    /// Lines emitted so far.
    output: Vec<String>,
    /// Statements executed (for reporting).
    pub executed: usize,
}

impl<const W: usize, const P: usize> Session<W, P> {
    /// Create an empty session.
    pub fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
            output: Vec::new(),
            executed: 0,
        }
    }

    /// Look up a variable.
    pub fn get(&self, name: &str) -> Option<&PartialInt<W, P>> {
        self.vars.get(name)
    }

    /// Bind a variable, replacing any previous value.
    pub fn set(&mut self, name: &str, value: PartialInt<W, P>) {
        self.vars.insert(name.to_string(), value);
    }

    /// Variables in name order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &PartialInt<W, P>)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Lines emitted so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Execute every statement, stopping at the first error.
    ///
    /// Returns the lines emitted by this run.
    pub fn run(&mut self, script: &Script) -> Result<Vec<String>, EvalError> {
        info!("running {} statements at width {}, precision {}", script.len(), W, P);
        let start = self.output.len();
        for line in &script.lines {
            if let Some(emitted) = self.execute(line)? {
                self.output.push(emitted);
            }
        }
        Ok(self.output[start..].to_vec())
    }

    /// Execute a single statement, returning the line it emits, if any.
    pub fn execute(&mut self, line: &Line) -> Result<Option<String>, EvalError> {
        debug!("line {}: {}", line.number, line.statement);
        let number = line.number;

        let emitted = match &line.statement {
            Statement::Let { dest, digits } => {
                let value = PartialInt::parse(digits)
                    .map_err(|source| EvalError::BadLiteral { line: number, source })?;
                self.set(dest, value);
                None
            }
            Statement::Const { dest, value } => {
                let value = PartialInt::try_constant(*value)
                    .map_err(|source| EvalError::OutOfRange { line: number, source })?;
                self.set(dest, value);
                None
            }
            Statement::Binary { op, dest, lhs, rhs } => {
                let a = self.lookup(lhs, number)?;
                let b = self.lookup(rhs, number)?;
                let value = match op {
                    BinaryOp::Add => a.add(&b),
                    BinaryOp::Sub => a.subtract(&b),
                    BinaryOp::Mul => a.multiply(&b),
                    BinaryOp::Join => a.join(&b),
                    BinaryOp::Meet => a.meet(&b),
                };
                self.set(dest, value);
                None
            }
            Statement::Neg { dest, src } => {
                let value = self.lookup(src, number)?.negate();
                self.set(dest, value);
                None
            }
            Statement::Shl { dest, src, amount } => {
                let value = self
                    .lookup(src, number)?
                    .checked_left_shift(*amount)
                    .ok_or(EvalError::ShiftOutOfRange { line: number, amount: *amount, width: W })?;
                self.set(dest, value);
                None
            }
            Statement::Print { src } => {
                let value = self.lookup(src, number)?;
                Some(format!("{} = {}", src, value))
            }
            Statement::Admits { src, value } => {
                let admitted = self.lookup(src, number)?.admits(*value);
                Some(format!("{} admits {}: {}", src, value, admitted))
            }
            Statement::Expect { src, digits } => {
                let actual = self.lookup(src, number)?.write(true);
                if actual != *digits {
                    return Err(EvalError::ExpectationFailed {
                        line: number,
                        name: src.clone(),
                        expected: digits.clone(),
                        actual,
                    });
                }
                None
            }
            Statement::Assert { src, value } | Statement::Refute { src, value } => {
                let wanted = matches!(line.statement, Statement::Assert { .. });
                let admitted = self.lookup(src, number)?.admits(*value);
                if admitted != wanted {
                    return Err(EvalError::AdmissionFailed {
                        line: number,
                        name: src.clone(),
                        value: *value,
                        admitted,
                    });
                }
                None
            }
        };

        self.executed += 1;
        Ok(emitted)
    }

    fn lookup(&self, name: &str, line: usize) -> Result<PartialInt<W, P>, EvalError> {
        self.vars.get(name).copied().ok_or_else(|| EvalError::UndefinedVariable {
            line,
            name: name.to_string(),
        })
    }
}

/// Errors that can occur while evaluating scripts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("undefined variable on line {line}: {name}")]
    UndefinedVariable { line: usize, name: String },

    #[error("bad literal on line {line}: {source}")]
    BadLiteral { line: usize, source: ParseError },

    #[error("constant out of range on line {line}: {source}")]
    OutOfRange { line: usize, source: DomainError },

    #[error("shift by {amount} out of range on line {line} (width {width})")]
    ShiftOutOfRange { line: usize, amount: usize, width: usize },

    #[error("expectation failed on line {line}: {name} is {actual}, expected {expected}")]
    ExpectationFailed { line: usize, name: String, expected: String, actual: String },

    #[error("admission check failed on line {line}: {name} admits {value} is {admitted}")]
    AdmissionFailed { line: usize, name: String, value: u64, admitted: bool },
}
