//! Parser for known-bits scripts.
//!
//! Syntax:
//! ```text
//! ; Comment
//! LET a 00u       ; Decode a digit string into `a`
//! CONST b 57      ; Exact constant (decimal, 0x hex or 0b binary)
//! ADD s a b       ; s = a + b   (also SUB, MUL, JOIN, MEET)
//! NEG n a         ; n = -a
//! SHL t a 3       ; t = a << 3
//! PRINT s         ; Emit "s = <digits>"
//! ADMITS s 57     ; Emit "s admits 57: true|false"
//! EXPECT s 1u     ; Fail unless s renders as "1u"
//! ASSERT s 57     ; Fail unless s admits 57
//! REFUTE s 58     ; Fail if s admits 58
//! ```

use std::fmt;
use thiserror::Error;
use crate::domain::Digit;

/// Parse script source into statements.
pub fn parse_script(source: &str) -> Result<Script, ScriptError> {
    let mut script = Script::new();
    for (line_num, line) in source.lines().enumerate() {
        if let Some(statement) = parse_line(line, line_num + 1)? {
            script.push(line_num + 1, statement);
        }
    }
    Ok(script)
}

/// A parsed script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    /// Statements in source order.
    pub lines: Vec<Line>,
}

impl Script {
    /// Create a new empty script.
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Append a statement.
    pub fn push(&mut self, number: usize, statement: Statement) {
        self.lines.push(Line { number, statement });
    }

    /// Get the number of statements.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line.statement)?;
        }
        Ok(())
    }
}

/// A statement together with its source line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub statement: Statement,
}

/// Two-operand operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Join,
    Meet,
}

impl BinaryOp {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Add => "ADD",
            BinaryOp::Sub => "SUB",
            BinaryOp::Mul => "MUL",
            BinaryOp::Join => "JOIN",
            BinaryOp::Meet => "MEET",
        }
    }
}

/// One script statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Decode a digit string.
    Let { dest: String, digits: String },
    /// Build an exact constant.
    Const { dest: String, value: u64 },
    /// `dest = lhs <op> rhs`
    Binary { op: BinaryOp, dest: String, lhs: String, rhs: String },
    /// `dest = -src`
    Neg { dest: String, src: String },
    /// `dest = src << amount`
    Shl { dest: String, src: String, amount: usize },
    /// Emit the rendered value.
    Print { src: String },
    /// Emit whether `value` is admitted.
    Admits { src: String, value: u64 },
    /// Require a rendering.
    Expect { src: String, digits: String },
    /// Require `value` to be admitted.
    Assert { src: String, value: u64 },
    /// Require `value` to be rejected.
    Refute { src: String, value: u64 },
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { dest, digits } => write!(f, "LET {} {}", dest, digits),
            Statement::Const { dest, value } => write!(f, "CONST {} {}", dest, value),
            Statement::Binary { op, dest, lhs, rhs } => {
                write!(f, "{} {} {} {}", op.mnemonic(), dest, lhs, rhs)
            }
            Statement::Neg { dest, src } => write!(f, "NEG {} {}", dest, src),
            Statement::Shl { dest, src, amount } => write!(f, "SHL {} {} {}", dest, src, amount),
            Statement::Print { src } => write!(f, "PRINT {}", src),
            Statement::Admits { src, value } => write!(f, "ADMITS {} {}", src, value),
            Statement::Expect { src, digits } => write!(f, "EXPECT {} {}", src, digits),
            Statement::Assert { src, value } => write!(f, "ASSERT {} {}", src, value),
            Statement::Refute { src, value } => write!(f, "REFUTE {} {}", src, value),
        }
    }
}

fn parse_line(line: &str, line_num: usize) -> Result<Option<Statement>, ScriptError> {
    // Remove comments
    let line = match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Ok(None);
    }

    let mnemonic = parts[0].to_uppercase();
    let operands = &parts[1..];

    let statement = match mnemonic.as_str() {
        "LET" => {
            let [dest, digits] = expect_operands::<2>(&mnemonic, operands, line_num)?;
            Statement::Let { dest: name(dest, line_num)?, digits: digit_string(digits, line_num)? }
        }
        "CONST" => {
            let [dest, value] = expect_operands::<2>(&mnemonic, operands, line_num)?;
            Statement::Const { dest: name(dest, line_num)?, value: number(value, line_num)? }
        }
        "ADD" | "SUB" | "MUL" | "JOIN" | "MEET" => {
            let op = match mnemonic.as_str() {
                "ADD" => BinaryOp::Add,
                "SUB" => BinaryOp::Sub,
                "MUL" => BinaryOp::Mul,
                "JOIN" => BinaryOp::Join,
                _ => BinaryOp::Meet,
            };
            let [dest, lhs, rhs] = expect_operands::<3>(&mnemonic, operands, line_num)?;
            Statement::Binary {
                op,
                dest: name(dest, line_num)?,
                lhs: name(lhs, line_num)?,
                rhs: name(rhs, line_num)?,
            }
        }
        "NEG" => {
            let [dest, src] = expect_operands::<2>(&mnemonic, operands, line_num)?;
            Statement::Neg { dest: name(dest, line_num)?, src: name(src, line_num)? }
        }
        "SHL" => {
            let [dest, src, amount] = expect_operands::<3>(&mnemonic, operands, line_num)?;
            let amount = number(amount, line_num)?;
            Statement::Shl {
                dest: name(dest, line_num)?,
                src: name(src, line_num)?,
                amount: usize::try_from(amount).map_err(|_| ScriptError::SyntaxError {
                    line: line_num,
                    message: format!("shift amount {} too large", amount),
                })?,
            }
        }
        "PRINT" => {
            let [src] = expect_operands::<1>(&mnemonic, operands, line_num)?;
            Statement::Print { src: name(src, line_num)? }
        }
        "EXPECT" => {
            let [src, digits] = expect_operands::<2>(&mnemonic, operands, line_num)?;
            Statement::Expect { src: name(src, line_num)?, digits: expected_rendering(digits, line_num)? }
        }
        "ADMITS" | "ASSERT" | "REFUTE" => {
            let [src, value] = expect_operands::<2>(&mnemonic, operands, line_num)?;
            let src = name(src, line_num)?;
            let value = number(value, line_num)?;
            match mnemonic.as_str() {
                "ADMITS" => Statement::Admits { src, value },
                "ASSERT" => Statement::Assert { src, value },
                _ => Statement::Refute { src, value },
            }
        }
        _ => {
            return Err(ScriptError::UnknownMnemonic {
                line: line_num,
                mnemonic: parts[0].to_string(),
            })
        }
    };

    Ok(Some(statement))
}

fn expect_operands<'a, const N: usize>(
    mnemonic: &str,
    operands: &[&'a str],
    line_num: usize,
) -> Result<[&'a str; N], ScriptError> {
    <[&'a str; N]>::try_from(operands).map_err(|_| ScriptError::SyntaxError {
        line: line_num,
        message: format!("{} takes {} operands, got {}", mnemonic, N, operands.len()),
    })
}

fn name(operand: &str, line_num: usize) -> Result<String, ScriptError> {
    let mut chars = operand.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(ScriptError::SyntaxError {
            line: line_num,
            message: format!("invalid variable name: {}", operand),
        });
    }
    Ok(operand.to_string())
}

fn digit_string(operand: &str, line_num: usize) -> Result<String, ScriptError> {
    match operand.chars().find(|&c| Digit::from_char(c).is_none()) {
        Some(c) => Err(ScriptError::InvalidDigits {
            line: line_num,
            digits: operand.to_string(),
            digit: c,
        }),
        None => Ok(operand.to_string()),
    }
}

/// Like [`digit_string`], but also allows the conflict marker `T`.
fn expected_rendering(operand: &str, line_num: usize) -> Result<String, ScriptError> {
    match operand.chars().find(|&c| c != 'T' && Digit::from_char(c).is_none()) {
        Some(c) => Err(ScriptError::InvalidDigits {
            line: line_num,
            digits: operand.to_string(),
            digit: c,
        }),
        None => Ok(operand.to_string()),
    }
}

fn number(operand: &str, line_num: usize) -> Result<u64, ScriptError> {
    let parsed = if let Some(hex) = operand.strip_prefix("0x").or_else(|| operand.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = operand.strip_prefix("0b").or_else(|| operand.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2)
    } else {
        operand.parse::<u64>()
    };
    parsed.map_err(|_| ScriptError::SyntaxError {
        line: line_num,
        message: format!("invalid number: {}", operand),
    })
}

/// Errors that can occur while reading scripts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("syntax error on line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("unknown mnemonic on line {line}: {mnemonic}")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("invalid digit {digit:?} in {digits:?} on line {line}")]
    InvalidDigits { line: usize, digits: String, digit: char },

    #[error("I/O error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let source = r#"
            ; Sample additions
            LET a 00u
            LET b 001
            ADD s a b   ; s = a + b
            PRINT s
        "#;

        let script = parse_script(source).unwrap();
        assert_eq!(script.len(), 4);
        assert_eq!(script.lines[0].number, 3);
        assert_eq!(
            script.lines[2].statement,
            Statement::Binary {
                op: BinaryOp::Add,
                dest: "s".into(),
                lhs: "a".into(),
                rhs: "b".into(),
            }
        );
    }

    #[test]
    fn test_parse_numbers() {
        let script = parse_script("const a 0x2A\nCONST b 0b101\nAdmits a 42\nSHL c a 3").unwrap();
        assert_eq!(script.lines[0].statement, Statement::Const { dest: "a".into(), value: 42 });
        assert_eq!(script.lines[1].statement, Statement::Const { dest: "b".into(), value: 5 });
        assert_eq!(script.lines[2].statement, Statement::Admits { src: "a".into(), value: 42 });
        assert_eq!(
            script.lines[3].statement,
            Statement::Shl { dest: "c".into(), src: "a".into(), amount: 3 }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_script("FOO a b"),
            Err(ScriptError::UnknownMnemonic { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("\nADD a b"),
            Err(ScriptError::SyntaxError { line: 2, .. })
        ));
        assert!(matches!(
            parse_script("LET a 01x"),
            Err(ScriptError::InvalidDigits { digit: 'x', .. })
        ));
        assert!(matches!(
            parse_script("LET a 1U"),
            Err(ScriptError::InvalidDigits { digit: 'U', .. })
        ));
        assert!(matches!(
            parse_script("LET 9a 01"),
            Err(ScriptError::SyntaxError { .. })
        ));
        assert!(matches!(
            parse_script("ASSERT a -1"),
            Err(ScriptError::SyntaxError { .. })
        ));
    }

    #[test]
    fn test_expect_accepts_conflict_marker() {
        let script = parse_script("EXPECT m 1T0").unwrap();
        assert_eq!(
            script.lines[0].statement,
            Statement::Expect { src: "m".into(), digits: "1T0".into() }
        );
        assert!(parse_script("LET m 1T0").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let source = "LET a 0u1\nMUL p a a\nNEG n p\nREFUTE n 3\nEXPECT p u01\n";
        let script = parse_script(source).unwrap();
        assert_eq!(script.to_string(), source);
        assert_eq!(parse_script(&script.to_string()).unwrap(), script);
    }
}
