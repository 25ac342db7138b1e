//! Frontmatter document emitter.
//!
//! Writes a block-style YAML body between `---` delimiters:
//!
//! ```text
//! ---
//! specification: brownfield-land
//! description: |-
//!   First paragraph.
//!
//!   Second paragraph.
//! datasets:
//!   - dataset: brownfield-land
//!     fields:
//!       - field: reference
//! ---
//! ```
//!
//! Mappings indent two spaces. Sequences sit two spaces under their parent
//! key with items two further spaces in. Lines are never wrapped. Multi-line
//! strings use literal block scalars; every other scalar, keys included, is
//! written by serde_yaml, which only quotes when the plain form would be
//! ambiguous.

use serde_yaml::{Mapping, Value};

use specsync_core::Envelope;

use crate::error::RenderError;

pub const DELIMITER: &str = "---";

const MAPPING_INDENT: usize = 2;
const SEQUENCE_OFFSET: usize = 2;

/// Renders ordered records as frontmatter documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontmatterRenderer {
    envelope: Envelope,
}

impl FrontmatterRenderer {
    pub fn new(envelope: Envelope) -> Self {
        Self { envelope }
    }

    /// Render `record` wrapped in the configured envelope.
    ///
    /// An empty record still yields the delimiter line(s).
    pub fn render(&self, record: &Mapping) -> Result<String, RenderError> {
        let body = render_body(record)?;
        let mut out = String::with_capacity(body.len() + 8);
        out.push_str(DELIMITER);
        out.push('\n');
        out.push_str(&body);
        if self.envelope == Envelope::Closed {
            out.push_str(DELIMITER);
            out.push('\n');
        }
        Ok(out)
    }
}

/// The YAML body alone, newline-terminated (empty for an empty record).
pub fn render_body(record: &Mapping) -> Result<String, RenderError> {
    let mut out = String::new();
    write_mapping(record, 0, false, &mut out)?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Block writers
// ---------------------------------------------------------------------------

fn pad(out: &mut String, width: usize) {
    out.extend(std::iter::repeat(' ').take(width));
}

/// `inline_first`: the first key continues the current line (after `- `).
fn write_mapping(
    map: &Mapping,
    indent: usize,
    inline_first: bool,
    out: &mut String,
) -> Result<(), RenderError> {
    for (i, (key, value)) in map.iter().enumerate() {
        if !(inline_first && i == 0) {
            pad(out, indent);
        }
        out.push_str(&render_key(key)?);
        out.push(':');
        write_mapping_value(value, indent, out)?;
    }
    Ok(())
}

fn write_mapping_value(value: &Value, indent: usize, out: &mut String) -> Result<(), RenderError> {
    match value {
        Value::Null => out.push('\n'),
        Value::Mapping(m) if m.is_empty() => out.push_str(" {}\n"),
        Value::Mapping(m) => {
            out.push('\n');
            write_mapping(m, indent + MAPPING_INDENT, false, out)?;
        }
        Value::Sequence(s) if s.is_empty() => out.push_str(" []\n"),
        Value::Sequence(s) => {
            out.push('\n');
            write_sequence(s, indent + SEQUENCE_OFFSET, false, out)?;
        }
        Value::Tagged(tagged) => {
            out.push(' ');
            out.push_str(&tagged.tag.to_string());
            write_mapping_value(&tagged.value, indent, out)?;
        }
        scalar => {
            out.push(' ');
            write_scalar(scalar, indent, out)?;
        }
    }
    Ok(())
}

/// `dash_col`: column of the `-` indicator.
fn write_sequence(
    seq: &[Value],
    dash_col: usize,
    inline_first: bool,
    out: &mut String,
) -> Result<(), RenderError> {
    for (i, item) in seq.iter().enumerate() {
        if !(inline_first && i == 0) {
            pad(out, dash_col);
        }
        out.push('-');
        write_sequence_item(item, dash_col, out)?;
    }
    Ok(())
}

fn write_sequence_item(item: &Value, dash_col: usize, out: &mut String) -> Result<(), RenderError> {
    let content_col = dash_col + SEQUENCE_OFFSET;
    match item {
        Value::Null => out.push('\n'),
        Value::Mapping(m) if m.is_empty() => out.push_str(" {}\n"),
        Value::Mapping(m) => {
            out.push(' ');
            write_mapping(m, content_col, true, out)?;
        }
        Value::Sequence(s) if s.is_empty() => out.push_str(" []\n"),
        Value::Sequence(s) => {
            out.push(' ');
            write_sequence(s, content_col, true, out)?;
        }
        Value::Tagged(tagged) => {
            out.push(' ');
            out.push_str(&tagged.tag.to_string());
            match &tagged.value {
                Value::Mapping(m) if !m.is_empty() => {
                    out.push('\n');
                    write_mapping(m, content_col, false, out)?;
                }
                Value::Sequence(s) if !s.is_empty() => {
                    out.push('\n');
                    write_sequence(s, content_col, false, out)?;
                }
                inner => write_sequence_item(inner, dash_col, out)?,
            }
        }
        scalar => {
            out.push(' ');
            write_scalar(scalar, dash_col, out)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// `parent_indent`: indentation of the owning key or dash; literal block
/// content goes two columns further in.
fn write_scalar(value: &Value, parent_indent: usize, out: &mut String) -> Result<(), RenderError> {
    if let Value::String(s) = value {
        if literal_eligible(s) {
            write_literal(s, parent_indent + MAPPING_INDENT, out);
            return Ok(());
        }
    }
    out.push_str(&inline_scalar(value)?);
    out.push('\n');
    Ok(())
}

fn inline_scalar(value: &Value) -> Result<String, RenderError> {
    let text = serde_yaml::to_string(value)?;
    let text = text.trim_end_matches('\n');
    if let Value::String(s) = value {
        // A block header with its content trimmed off would read back as "".
        if text.starts_with(['|', '>']) {
            return Ok(double_quoted(s));
        }
    }
    if !text.contains('\n') {
        return Ok(text.to_owned());
    }
    // The emitter folded the scalar over several lines; keep it on one.
    match value {
        Value::String(s) if !text.starts_with(['\'', '"', '|', '>']) => Ok(s.clone()),
        Value::String(s) => Ok(double_quoted(s)),
        _ => Ok(text.split_whitespace().collect::<Vec<_>>().join(" ")),
    }
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() || is_unicode_break(c) => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn render_key(key: &Value) -> Result<String, RenderError> {
    match key {
        Value::String(s) if s.contains('\n') => {
            Err(RenderError::UnsupportedKey(format!("{s:?}")))
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => inline_scalar(key),
        Value::Sequence(_) => Err(RenderError::UnsupportedKey("sequence".into())),
        Value::Mapping(_) => Err(RenderError::UnsupportedKey("mapping".into())),
        Value::Tagged(t) => Err(RenderError::UnsupportedKey(format!("tagged {}", t.tag))),
    }
}

/// Literal style keeps text byte-for-byte only when it holds line breaks, no
/// carriage returns or other control characters, and some non-break content.
fn literal_eligible(s: &str) -> bool {
    s.contains('\n')
        && !s.trim_end_matches('\n').is_empty()
        && !s
            .chars()
            .any(|c| (c.is_control() && c != '\n' && c != '\t') || is_unicode_break(c))
}

/// YAML readers also break lines on LS and PS.
fn is_unicode_break(c: char) -> bool {
    matches!(c, '\u{2028}' | '\u{2029}')
}

fn write_literal(s: &str, content_indent: usize, out: &mut String) {
    let core = s.trim_end_matches('\n');
    let trailing = s.len() - core.len();

    out.push('|');
    // Leading whitespace or a blank first line would be read as indentation.
    if core.starts_with([' ', '\t', '\n']) {
        out.push_str(&MAPPING_INDENT.to_string());
    }
    match trailing {
        0 => out.push('-'),
        1 => {}
        _ => out.push('+'),
    }
    out.push('\n');

    for line in core.split('\n') {
        if !line.is_empty() {
            pad(out, content_indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    for _ in 1..trailing {
        out.push('\n');
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
