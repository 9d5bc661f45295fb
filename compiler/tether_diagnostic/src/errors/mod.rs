//! Embedded error documentation for `tether explain`.
//!
//! Each error code has a markdown file in this directory that explains the
//! problem, shows an example, and says how to fix it. The files are embedded
//! at compile time.
//!
//! # Adding New Documentation
//!
//! 1. Create a new file `EXXXX.md` (or `WXXXX.md`) in this directory
//! 2. Add an entry to the `DOCS` array below

use crate::ErrorCode;

/// Registry of embedded error documentation.
pub struct ErrorDocs;

impl ErrorDocs {
    /// Get the documentation for an error code.
    pub fn get(code: ErrorCode) -> Option<&'static str> {
        DOCS.iter().find(|(c, _)| *c == code).map(|(_, doc)| *doc)
    }

    /// Get all documented error codes.
    pub fn all_codes() -> impl Iterator<Item = ErrorCode> {
        DOCS.iter().map(|(code, _)| *code)
    }

    /// Check if an error code has documentation.
    pub fn has_docs(code: ErrorCode) -> bool {
        DOCS.iter().any(|(c, _)| *c == code)
    }
}

static DOCS: &[(ErrorCode, &str)] = &[
    // Malformed input (E0xxx)
    (ErrorCode::E0001, include_str!("E0001.md")),
    (ErrorCode::E0002, include_str!("E0002.md")),
    (ErrorCode::E0003, include_str!("E0003.md")),
    (ErrorCode::E0004, include_str!("E0004.md")),
    (ErrorCode::E0005, include_str!("E0005.md")),
    // Resolution graph (E1xxx)
    (ErrorCode::E1001, include_str!("E1001.md")),
    // Constructor verification (E2xxx)
    (ErrorCode::E2001, include_str!("E2001.md")),
    (ErrorCode::E2002, include_str!("E2002.md")),
    // Output (E9xxx)
    (ErrorCode::E9001, include_str!("E9001.md")),
    // Warnings
    (ErrorCode::W1001, include_str!("W1001.md")),
    (ErrorCode::W1002, include_str!("W1002.md")),
    (ErrorCode::W3001, include_str!("W3001.md")),
];
