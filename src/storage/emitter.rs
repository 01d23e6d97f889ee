//! YAML emitter for document trees
//!
//! `serde_yaml` parses fine but gives no control over indentation or
//! scalar style, so definitions are rendered here. Output is always block
//! style with keys in insertion order. Entry comments are written above
//! their key or at the end of its line.

use thiserror::Error;

use crate::domain::{Mapping, Node, Scalar, ScalarStyle};

#[derive(Debug, Error, PartialEq)]
pub enum EmitError {
    #[error("Mapping keys must be scalars")]
    ComplexKey,

    #[error("Invalid emit style: {0}")]
    InvalidStyle(String),
}

/// Indentation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitStyle {
    /// Indent of a nested mapping relative to its key
    pub mapping_indent: usize,

    /// Indent of sequence item content relative to the parent key
    pub sequence_indent: usize,

    /// Indent of the `-` relative to the parent key
    pub sequence_offset: usize,
}

impl EmitStyle {
    /// Sequences flush with their parent key
    pub const COMPACT: EmitStyle = EmitStyle {
        mapping_indent: 2,
        sequence_indent: 2,
        sequence_offset: 0,
    };

    /// Sequences indented under their parent key
    pub const INDENTED: EmitStyle = EmitStyle {
        mapping_indent: 2,
        sequence_indent: 4,
        sequence_offset: 2,
    };

    fn validate(&self) -> Result<(), EmitError> {
        if self.mapping_indent == 0 {
            return Err(EmitError::InvalidStyle("mapping indent must be positive".to_string()));
        }
        if self.sequence_indent < self.sequence_offset + 2 {
            return Err(EmitError::InvalidStyle(format!(
                "sequence indent {} leaves no room after a dash at offset {}",
                self.sequence_indent, self.sequence_offset
            )));
        }
        Ok(())
    }

    /// Distance from a dash to its item content
    fn item_gap(&self) -> usize {
        self.sequence_indent - self.sequence_offset
    }
}

/// Renders a document as YAML text ending in a newline
pub fn to_string(node: &Node, style: EmitStyle) -> Result<String, EmitError> {
    style.validate()?;
    let mut emitter = Emitter {
        out: String::new(),
        style,
    };
    emitter.document(node)?;
    Ok(emitter.out)
}

struct Emitter {
    out: String,
    style: EmitStyle,
}

impl Emitter {
    fn pad(&mut self, width: usize) {
        self.out.push_str(&" ".repeat(width));
    }

    fn document(&mut self, node: &Node) -> Result<(), EmitError> {
        match node {
            Node::Mapping(m) if !m.is_empty() => self.mapping(m, 0, false),
            Node::Sequence(items) if !items.is_empty() => {
                self.sequence(items, self.style.sequence_offset, false)
            }
            Node::Tagged(tagged) => {
                self.out.push('!');
                self.out.push_str(&tagged.tag);
                self.after_tag(&tagged.value, 0, 0, self.style.mapping_indent, None)
            }
            other => self.inline(other, self.style.mapping_indent, None),
        }
    }

    fn comment_lines(&mut self, comments: &[String], col: usize) {
        for comment in comments {
            self.pad(col);
            self.out.push_str(comment);
            self.out.push('\n');
        }
    }

    /// Ends the current line, with a trailing comment if there is one
    fn end_line(&mut self, trailing: Option<&str>) {
        if let Some(comment) = trailing {
            self.out.push(' ');
            self.out.push_str(comment);
        }
        self.out.push('\n');
    }

    /// Writes a block mapping. With `inline`, the first key continues the
    /// current line (after a `- `) and its leading comments have already
    /// been written above the dash.
    fn mapping(&mut self, mapping: &Mapping, indent: usize, inline: bool) -> Result<(), EmitError> {
        for (i, entry) in mapping.entries().enumerate() {
            if i > 0 || !inline {
                self.comment_lines(&entry.comments.before, indent);
                self.pad(indent);
            }
            let key = render_key(&entry.key)?;
            self.out.push_str(&key);
            self.out.push(':');
            self.mapping_value(&entry.value, indent, entry.comments.trailing.as_deref())?;
        }
        Ok(())
    }

    fn mapping_value(
        &mut self,
        value: &Node,
        indent: usize,
        trailing: Option<&str>,
    ) -> Result<(), EmitError> {
        let nested = indent + self.style.mapping_indent;
        match value {
            Node::Scalar(Scalar::Null) => {
                self.end_line(trailing);
                Ok(())
            }
            Node::Mapping(m) if !m.is_empty() => {
                self.end_line(trailing);
                self.mapping(m, nested, false)
            }
            Node::Sequence(items) if !items.is_empty() => {
                self.end_line(trailing);
                self.sequence(items, indent + self.style.sequence_offset, false)
            }
            Node::Tagged(tagged) => {
                self.out.push_str(" !");
                self.out.push_str(&tagged.tag);
                self.after_tag(
                    &tagged.value,
                    nested,
                    indent + self.style.sequence_offset,
                    nested,
                    trailing,
                )
            }
            other => {
                self.out.push(' ');
                self.inline(other, nested, trailing)
            }
        }
    }

    /// Writes a block sequence with dashes at column `dash`. With `inline`,
    /// the first dash continues the current line.
    fn sequence(&mut self, items: &[Node], dash: usize, inline: bool) -> Result<(), EmitError> {
        let content = dash + self.style.item_gap();
        for (i, item) in items.iter().enumerate() {
            if i > 0 || !inline {
                self.comment_lines(leading_comments(item), dash);
                self.pad(dash);
            }
            self.out.push('-');
            match item {
                Node::Scalar(Scalar::Null) => self.out.push('\n'),
                Node::Mapping(m) if !m.is_empty() => {
                    self.pad(content - dash - 1);
                    self.mapping(m, content, true)?;
                }
                Node::Sequence(nested) if !nested.is_empty() => {
                    self.pad(content - dash - 1);
                    self.sequence(nested, content, true)?;
                }
                Node::Tagged(tagged) => {
                    self.out.push_str(" !");
                    self.out.push_str(&tagged.tag);
                    self.after_tag(&tagged.value, content, content, content, None)?;
                }
                other => {
                    self.pad(content - dash - 1);
                    self.inline(other, content, None)?;
                }
            }
        }
        Ok(())
    }

    /// Writes the value of a tagged node; the tag is already on the line.
    fn after_tag(
        &mut self,
        value: &Node,
        mapping_col: usize,
        dash_col: usize,
        block_col: usize,
        trailing: Option<&str>,
    ) -> Result<(), EmitError> {
        match value {
            Node::Scalar(Scalar::Null) => {
                self.end_line(trailing);
                Ok(())
            }
            Node::Mapping(m) if !m.is_empty() => {
                self.end_line(trailing);
                self.mapping(m, mapping_col, false)
            }
            Node::Sequence(items) if !items.is_empty() => {
                self.end_line(trailing);
                self.sequence(items, dash_col, false)
            }
            Node::Tagged(tagged) => {
                self.out.push_str(" !");
                self.out.push_str(&tagged.tag);
                self.after_tag(&tagged.value, mapping_col, dash_col, block_col, trailing)
            }
            other => {
                self.out.push(' ');
                self.inline(other, block_col, trailing)
            }
        }
    }

    /// Writes a scalar or empty collection and ends the line. Literal block
    /// lines are indented to `block_col`.
    fn inline(&mut self, node: &Node, block_col: usize, trailing: Option<&str>) -> Result<(), EmitError> {
        match node {
            Node::Mapping(_) => self.out.push_str("{}"),
            Node::Sequence(_) => self.out.push_str("[]"),
            Node::Tagged(_) => unreachable!("tagged values are written by after_tag"),
            Node::Scalar(Scalar::String { value, style }) => {
                let wants_block = match style {
                    ScalarStyle::Literal => true,
                    ScalarStyle::Auto => value.contains('\n'),
                    ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted => false,
                };
                if wants_block && literal_ok(value) {
                    self.literal(value, block_col, trailing);
                    return Ok(());
                }
                self.out.push_str(&render_flow_string(value, *style));
            }
            Node::Scalar(scalar) => self.out.push_str(&render_plain_scalar(scalar)),
        }
        self.end_line(trailing);
        Ok(())
    }

    fn literal(&mut self, value: &str, block_col: usize, trailing: Option<&str>) {
        let newlines = value.len() - value.trim_end_matches('\n').len();
        let (chomp, body) = match newlines {
            0 => ("-", value),
            1 => ("", &value[..value.len() - 1]),
            _ => ("+", &value[..value.len() - 1]),
        };

        self.out.push('|');
        self.out.push_str(chomp);
        self.end_line(trailing);
        for line in body.split('\n') {
            if !line.is_empty() {
                self.pad(block_col);
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
    }
}

/// Returns true if `value` survives a round trip as a literal block
fn literal_ok(value: &str) -> bool {
    if value.trim().is_empty() {
        return false;
    }
    if value
        .chars()
        .any(|c| c == '\r' || (c.is_control() && c != '\n' && c != '\t') || is_special(c))
    {
        return false;
    }
    // Indentation is detected from the first non-empty line.
    match value.split('\n').find(|line| !line.is_empty()) {
        Some(line) => !line.starts_with([' ', '\t']),
        None => false,
    }
}

/// YAML 1.1 booleans that YAML 1.2 readers take as strings
fn is_legacy_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "y" | "n" | "yes" | "no" | "on" | "off"
    )
}

/// Returns true if `value` can be written without quotes and read back as
/// the same string
fn plain_ok(value: &str) -> bool {
    if value.is_empty() || value.contains('\n') || is_legacy_bool(value) {
        return false;
    }
    if value.chars().any(|c| c.is_control() || is_special(c)) {
        return false;
    }
    matches!(
        serde_yaml::from_str::<serde_yaml::Value>(value),
        Ok(serde_yaml::Value::String(ref parsed)) if parsed == value
    )
}

/// Characters YAML readers treat as line breaks or a byte order mark,
/// though `char::is_control` does not flag them
fn is_special(c: char) -> bool {
    matches!(c, '\u{2028}' | '\u{2029}' | '\u{85}' | '\u{feff}')
}

fn needs_double_quotes(value: &str) -> bool {
    value.chars().any(|c| c.is_control() || is_special(c))
}

/// Renders a string on one line. Quoted styles from the source are kept
/// where they can represent the value; otherwise the value is plain when
/// safe, then single-quoted, then double-quoted.
fn render_flow_string(value: &str, style: ScalarStyle) -> String {
    match style {
        ScalarStyle::DoubleQuoted => double_quoted(value),
        _ if needs_double_quotes(value) => double_quoted(value),
        ScalarStyle::SingleQuoted => single_quoted(value),
        _ if plain_ok(value) => value.to_string(),
        _ => single_quoted(value),
    }
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() || is_special(c) => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn render_plain_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Null => "null".to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Number { repr: Some(text), .. } => text.clone(),
        Scalar::Number { value, .. } => value.to_string(),
        Scalar::String { value, style } => render_flow_string(value, *style),
    }
}

/// Comments to write above a sequence item's dash: those of its first key
fn leading_comments(item: &Node) -> &[String] {
    match item {
        Node::Mapping(m) => m.entries().next().map(|e| e.comments.before.as_slice()).unwrap_or(&[]),
        Node::Sequence(items) => items.first().map(leading_comments).unwrap_or(&[]),
        _ => &[],
    }
}

fn render_key(key: &Node) -> Result<String, EmitError> {
    match key {
        Node::Scalar(scalar) => Ok(render_plain_scalar(scalar)),
        _ => Err(EmitError::ComplexKey),
    }
}
