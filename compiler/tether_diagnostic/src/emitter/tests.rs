use super::*;
use crate::ErrorCode;
use tether_ir::Symbol;

fn sample_diagnostic() -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message("cyclical dependency detected: a.ts::A -> b.ts::B -> a.ts::A")
        .with_label(&Symbol::new("a.ts", "A"), "cycle starts here")
        .with_secondary_label(&Symbol::new("b.ts", "B"), "depends back on `A`")
        .with_note("constructor dependencies must form a DAG")
        .with_suggestion("break the cycle by injecting a factory")
}

fn render_terminal(diags: &[Diagnostic], colors: ColorMode) -> String {
    let mut output = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, colors, false);
        emitter.emit_all(diags);
        emitter.emit_summary(1, 0);
        emitter.flush();
    }
    String::from_utf8(output).unwrap_or_else(|e| panic!("utf8: {e}"))
}

#[test]
fn test_escape_json() {
    assert_eq!(escape_json("hello"), "hello");
    assert_eq!(escape_json("\"quoted\""), "\\\"quoted\\\"");
    assert_eq!(escape_json("line1\nline2"), "line1\\nline2");
    assert_eq!(escape_json("tab\there"), "tab\\there");
}

#[test]
fn test_trailing_comma() {
    assert_eq!(trailing_comma(0, 2), ",");
    assert_eq!(trailing_comma(1, 2), "");
}

#[test]
fn test_terminal_emitter_no_color() {
    let text = render_terminal(&[sample_diagnostic()], ColorMode::Never);
    assert!(text.contains("error[E2001]"));
    assert!(text.contains("--> a.ts::A: cycle starts here"));
    assert!(text.contains("b.ts::B"));
    assert!(text.contains("note: constructor dependencies"));
    assert!(text.contains("help: break the cycle"));
    assert!(text.contains("aborting due to previous error"));
    assert!(!text.contains("\x1b["));
}

#[test]
fn test_terminal_emitter_with_color() {
    let text = render_terminal(&[sample_diagnostic()], ColorMode::Always);
    assert!(text.contains("\x1b["));
    assert!(text.contains("E2001"));
}

#[test]
fn test_json_emitter_shape() {
    let mut output = Vec::new();
    {
        let mut emitter = JsonEmitter::new(&mut output);
        emitter.begin();
        emitter.emit(&sample_diagnostic());
        emitter.emit(&Diagnostic::warning(ErrorCode::W1001).with_message("soft"));
        emitter.end();
        emitter.flush();
    }
    let text = String::from_utf8(output).unwrap_or_else(|e| panic!("utf8: {e}"));
    assert!(text.starts_with("[\n"));
    assert!(text.contains("\"code\": \"E2001\""));
    assert!(text.contains("\"severity\": \"warning\""));
    assert!(text.contains("\"unit\": \"a.ts\""));
    assert!(text.contains("\"declaration\": \"A\""));
    assert!(text.trim_end().ends_with(']'));
}

#[test]
fn test_color_mode_parse() {
    assert_eq!(ColorMode::parse("always"), Some(ColorMode::Always));
    assert_eq!(ColorMode::parse("never"), Some(ColorMode::Never));
    assert_eq!(ColorMode::parse("auto"), Some(ColorMode::Auto));
    assert_eq!(ColorMode::parse("sometimes"), None);
}
