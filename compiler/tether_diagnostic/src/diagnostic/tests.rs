use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_builder_collects_context() {
    let a = Symbol::new("index.ts", "A");
    let b = Symbol::new("other.ts", "B");
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("ambiguous")
        .with_label(&a, "first")
        .with_secondary_label(&b, "second")
        .with_note("a note")
        .with_suggestion("do something");

    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(
        diag.primary_label().map(Label::location),
        Some("index.ts::A".to_string())
    );
    assert_eq!(diag.notes, vec!["a note".to_string()]);
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::W1001).with_message("soft");
    assert!(!diag.is_error());
    assert_eq!(diag.severity, Severity::Warning);
}

#[test]
fn test_display_format() {
    let diag = Diagnostic::error(ErrorCode::E0001)
        .with_message("multiple constructors")
        .with_unit_label("index.ts", "declared here")
        .with_note("only one constructor is allowed");

    assert_eq!(
        diag.to_string(),
        "error [E0001]: multiple constructors\n  --> index.ts: declared here\n  = note: only one constructor is allowed"
    );
}
