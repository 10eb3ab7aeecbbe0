//! Script files on disk.
//!
//! Scripts are plain text, one statement per line, `;` starting a comment.
//! Saving writes the normalized form: upper-case mnemonics, one space
//! between operands, comments dropped.

use std::io::Write;
use std::path::Path;
use crate::script::parser::{parse_script, Script, ScriptError};

/// Load and parse a script file.
pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Script, ScriptError> {
    let source = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ScriptError::Io(e.to_string()))?;
    parse_script(&source)
}

/// Save a script in normalized form.
pub fn save_script<P: AsRef<Path>>(path: P, script: &Script) -> Result<(), ScriptError> {
    let mut file = std::fs::File::create(path.as_ref())
        .map_err(|e| ScriptError::Io(e.to_string()))?;

    writeln!(file, "; partint script")
        .map_err(|e| ScriptError::Io(e.to_string()))?;
    writeln!(file, "; {} statements", script.len())
        .map_err(|e| ScriptError::Io(e.to_string()))?;
    writeln!(file).map_err(|e| ScriptError::Io(e.to_string()))?;

    write!(file, "{}", script).map_err(|e| ScriptError::Io(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("partint-roundtrip-{}.pis", std::process::id()));
        let script = parse_script("let a 0u1   ; odd\nneg n a\nprint n").unwrap();

        save_script(&path, &script).unwrap();
        let loaded = load_script(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        // Line numbers move past the header, the statements do not change.
        let statements: Vec<_> = loaded.lines.iter().map(|l| l.statement.clone()).collect();
        let expected: Vec<_> = script.lines.iter().map(|l| l.statement.clone()).collect();
        assert_eq!(statements, expected);
        assert_eq!(loaded.lines[0].number, 4);
    }

    #[test]
    fn test_missing_file() {
        let err = load_script("/nonexistent/partint/script.pis").unwrap_err();
        assert!(matches!(err, ScriptError::Io(_)));
    }
}
