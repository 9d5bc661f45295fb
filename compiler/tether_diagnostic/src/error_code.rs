use std::fmt;
use std::str::FromStr;

/// Error codes for all tether diagnostics.
///
/// Format: E#### / W#### where the first digit indicates the phase:
/// - E0xxx: Malformed input (fact feed and unit validation)
/// - E1xxx / W1xxx: Resolution graph
/// - E2xxx: Constructor verification
/// - W3xxx: Incremental cache
/// - E9xxx: Internal and I/O errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub enum ErrorCode {
    // Malformed Input (E0xxx)
    /// Multiple constructors declared on one class
    E0001,
    /// Constructor parameter without a type
    E0002,
    /// Registered declaration is not exported
    E0003,
    /// Primitive constructor parameter that is not whitelisted
    E0004,
    /// Fact feed could not be read or parsed
    E0005,

    // Resolution Graph (E1xxx)
    /// Several concretes claim the same class identifier
    E1001,

    // Constructor Verification (E2xxx)
    /// Cyclic constructor dependency
    E2001,
    /// Constructor dependency with no resolution
    E2002,

    // Internal (E9xxx)
    /// I/O failure while writing build output
    E9001,

    // Resolution Graph Warnings (W1xxx)
    /// Several concretes implement one interface; it becomes unresolvable
    W1001,
    /// Registration whose class heritage never arrived
    W1002,

    // Incremental Cache Warnings (W3xxx)
    /// Incremental cache was unreadable and has been discarded
    W3001,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E0005,
        ErrorCode::E1001,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E9001,
        ErrorCode::W1001,
        ErrorCode::W1002,
        ErrorCode::W3001,
    ];

    /// Check if this is a malformed-input error (E0xxx range).
    pub fn is_input_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Input
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            // Graph
            ErrorCode::E1001 => "E1001",
            // Verification
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            // Internal
            ErrorCode::E9001 => "E9001",
            // Warnings
            ErrorCode::W1001 => "W1001",
            ErrorCode::W1002 => "W1002",
            ErrorCode::W3001 => "W3001",
        }
    }

    /// Check if this is a warning code (Wxxx range).
    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == upper)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
        assert_eq!(ErrorCode::E2001.as_str(), "E2001");
    }

    #[test]
    fn test_error_code_parse() {
        assert_eq!("e2001".parse::<ErrorCode>(), Ok(ErrorCode::E2001));
        assert_eq!(" W3001 ".parse::<ErrorCode>(), Ok(ErrorCode::W3001));
        assert!("E4242".parse::<ErrorCode>().is_err());
    }

    #[test]
    fn test_all_codes_roundtrip() {
        for code in ErrorCode::ALL {
            assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
        }
    }

    #[test]
    fn test_warning_range() {
        assert!(ErrorCode::W1001.is_warning());
        assert!(!ErrorCode::E1001.is_warning());
        assert!(ErrorCode::E0003.is_input_error());
        assert!(!ErrorCode::E2001.is_input_error());
    }
}
