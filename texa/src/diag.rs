// diag.rs — Diagnostics model for IR verification
//
// Well-formedness findings are reported as values, never raised. The
// analyses themselves emit no diagnostics: absence is an empty result and a
// malformed store value is a panic.
//
// Preconditions: none (types only).
// Postconditions: none (types only).
// Failure modes: none.
// Side effects: none.

use std::fmt;

// ── Diagnostic code ──────────────────────────────────────────────────────

/// A stable diagnostic code (e.g., `E0101`).
///
/// Once assigned, a code must never be reassigned to a different meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagCode(pub &'static str);

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub mod codes {
    use super::DiagCode;

    /// One variable id used with two different names or types.
    pub const E0101: DiagCode = DiagCode("E0101");
    /// One buffer id used with two different name hints or ranks.
    pub const E0102: DiagCode = DiagCode("E0102");
    /// Intrinsic called with the wrong number of operands.
    pub const E0103: DiagCode = DiagCode("E0103");
    /// Buffer freed without a preceding allocation in the same tree.
    pub const W0104: DiagCode = DiagCode("W0104");
}

// ── Severity level ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagLevel {
    Error,
    Warning,
}

// ── Diagnostic ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<DiagCode>,
    pub level: DiagLevel,
    pub message: String,
    pub hint: Option<String>,
    /// Extra context lines, printed after the message.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with no code, hint, or notes.
    pub fn new(level: DiagLevel, message: impl Into<String>) -> Self {
        Self {
            code: None,
            level,
            message: message.into(),
            hint: None,
            notes: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagLevel::Warning, message)
    }

    /// Attach a stable diagnostic code.
    pub fn with_code(mut self, code: DiagCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagLevel::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagLevel::Error => "error",
            DiagLevel::Warning => "warning",
        };
        if let Some(code) = &self.code {
            write!(f, "{}[{}]: {}", level, code, self.message)?;
        } else {
            write!(f, "{}: {}", level, self.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_without_code() {
        let d = Diagnostic::error("something failed");
        assert_eq!(format!("{d}"), "error: something failed");
    }

    #[test]
    fn display_with_code() {
        let d = Diagnostic::warning("buffer 'A' freed but never allocated").with_code(codes::W0104);
        assert_eq!(
            format!("{d}"),
            "warning[W0104]: buffer 'A' freed but never allocated"
        );
    }

    #[test]
    fn builder_chain() {
        let d = Diagnostic::error("variable id 3 used inconsistently")
            .with_code(codes::E0101)
            .with_note("first seen as 'i: int'")
            .with_hint("allocate a fresh variable instead of reusing the id");

        assert_eq!(d.code, Some(codes::E0101));
        assert!(d.is_error());
        assert_eq!(d.notes.len(), 1);
        assert_eq!(
            format!("{d}"),
            "error[E0101]: variable id 3 used inconsistently\n  note: first seen as 'i: int'\n  hint: allocate a fresh variable instead of reusing the id"
        );
    }
}
