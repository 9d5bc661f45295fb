//! JSON Emitter
//!
//! Machine-readable diagnostic output in JSON format.

use std::io::Write;

use crate::Diagnostic;

use super::{escape_json, trailing_comma, DiagnosticEmitter};

/// JSON emitter for machine-readable output.
///
/// Writes one array; call [`JsonEmitter::begin`] and [`JsonEmitter::end`]
/// around the emitted diagnostics.
pub struct JsonEmitter<W: Write> {
    writer: W,
    first: bool,
}

impl<W: Write> JsonEmitter<W> {
    /// Create a new JSON emitter.
    pub fn new(writer: W) -> Self {
        JsonEmitter {
            writer,
            first: true,
        }
    }

    /// Begin the JSON array output.
    pub fn begin(&mut self) {
        let _ = writeln!(self.writer, "[");
    }

    /// End the JSON array output.
    pub fn end(&mut self) {
        let _ = writeln!(self.writer, "\n]");
    }

    fn write_string_list(&mut self, key: &str, items: &[String], last: bool) {
        let _ = writeln!(self.writer, "    \"{key}\": [");
        for (i, item) in items.iter().enumerate() {
            let comma = trailing_comma(i, items.len());
            let _ = writeln!(self.writer, "      \"{}\"{}", escape_json(item), comma);
        }
        let _ = writeln!(self.writer, "    ]{}", if last { "" } else { "," });
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        if !self.first {
            let _ = writeln!(self.writer, ",");
        }
        self.first = false;

        let _ = writeln!(self.writer, "  {{");
        let _ = writeln!(
            self.writer,
            "    \"code\": \"{}\",",
            diagnostic.code.as_str()
        );
        let _ = writeln!(
            self.writer,
            "    \"severity\": \"{}\",",
            diagnostic.severity
        );
        let _ = writeln!(
            self.writer,
            "    \"message\": \"{}\",",
            escape_json(&diagnostic.message)
        );

        let _ = writeln!(self.writer, "    \"labels\": [");
        for (i, label) in diagnostic.labels.iter().enumerate() {
            let comma = trailing_comma(i, diagnostic.labels.len());
            let _ = writeln!(self.writer, "      {{");
            let _ = writeln!(
                self.writer,
                "        \"unit\": \"{}\",",
                escape_json(&label.unit_path)
            );
            match &label.declaration {
                Some(name) => {
                    let _ = writeln!(
                        self.writer,
                        "        \"declaration\": \"{}\",",
                        escape_json(name)
                    );
                }
                None => {
                    let _ = writeln!(self.writer, "        \"declaration\": null,");
                }
            }
            let _ = writeln!(
                self.writer,
                "        \"message\": \"{}\",",
                escape_json(&label.message)
            );
            let _ = writeln!(self.writer, "        \"primary\": {}", label.is_primary);
            let _ = writeln!(self.writer, "      }}{comma}");
        }
        let _ = writeln!(self.writer, "    ],");

        self.write_string_list("notes", &diagnostic.notes, false);
        self.write_string_list("suggestions", &diagnostic.suggestions, true);

        let _ = write!(self.writer, "  }}");
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, _error_count: usize, _warning_count: usize) {}
}
