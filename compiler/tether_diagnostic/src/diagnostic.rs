use std::fmt;

use tether_ir::Symbol;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A declaration (or a whole unit) involved in a diagnostic.
///
/// Tether never sees source text, so labels point at `unit_path` plus the
/// declaration name rather than at byte spans.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub unit_path: String,
    /// Declaration name, or `None` when the label covers the whole unit.
    pub declaration: Option<String>,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the declaration at fault).
    pub fn primary(symbol: &Symbol, message: impl Into<String>) -> Self {
        Label {
            unit_path: symbol.unit_path().to_string(),
            declaration: Some(symbol.name().to_string()),
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related declaration).
    pub fn secondary(symbol: &Symbol, message: impl Into<String>) -> Self {
        Label {
            is_primary: false,
            ..Label::primary(symbol, message)
        }
    }

    /// Create a primary label covering a whole unit.
    pub fn unit(unit_path: impl Into<String>, message: impl Into<String>) -> Self {
        Label {
            unit_path: unit_path.into(),
            declaration: None,
            message: message.into(),
            is_primary: true,
        }
    }

    /// `unit_path::declaration`, or just the unit path.
    pub fn location(&self) -> String {
        match &self.declaration {
            Some(name) => format!("{}::{}", self.unit_path, name),
            None => self.unit_path.clone(),
        }
    }
}

/// A diagnostic with all context needed for an actionable report.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Severity level.
    pub severity: Severity,
    /// Main message.
    pub message: String,
    /// Declarations involved.
    pub labels: Vec<Label>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
    /// Human-readable suggestions for fixing the problem.
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label on a declaration.
    pub fn with_label(mut self, symbol: &Symbol, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(symbol, message));
        self
    }

    /// Add a secondary label on a related declaration.
    pub fn with_secondary_label(mut self, symbol: &Symbol, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(symbol, message));
        self
    }

    /// Add a primary label covering a whole unit.
    pub fn with_unit_label(
        mut self,
        unit_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.labels.push(Label::unit(unit_path, message));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a suggestion for fixing the problem.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// The first primary label, if any.
    pub fn primary_label(&self) -> Option<&Label> {
        self.labels.iter().find(|l| l.is_primary)
    }

    /// Check if this is an error (vs warning/note).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {}: {}", marker, label.location(), label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
