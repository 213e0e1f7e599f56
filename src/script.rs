use std::{path::Path, sync::Arc};

use serde::Serialize;

use crate::parser::escape::EscapeDelimiter;

/// Identifies the script a piece of text came from. Cheap to clone.
#[derive(
    derive_more::Debug, derive_more::Display, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[display("{}", name)]
pub struct ScriptFile {
    name: Arc<str>,
}

impl ScriptFile {
    pub fn new(file: impl AsRef<Path>) -> Self {
        Self {
            name: file.as_ref().display().to_string().into(),
        }
    }

    /// A placeholder file for scripts parsed from an in-memory string.
    pub fn in_memory() -> Self {
        Self {
            name: "<script>".into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScriptLocation {
    pub file: ScriptFile,
    pub line: usize,
}

impl ScriptLocation {
    pub fn new(file: ScriptFile, line: usize) -> Self {
        Self { file, line }
    }
}

impl std::fmt::Display for ScriptLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One raw line of a script, with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub location: ScriptLocation,
    text: String,
}

impl ScriptLine {
    pub fn new(file: ScriptFile, line: usize, text: impl Into<String>) -> Self {
        Self {
            location: ScriptLocation::new(file, line),
            text: text.into(),
        }
    }

    /// Split a script into lines with 1-based line numbers. Line terminators
    /// are not included in the line text.
    pub fn parse(file: ScriptFile, text: &str) -> Vec<Self> {
        text.lines()
            .enumerate()
            .map(|(index, text)| Self::new(file.clone(), index + 1, text))
            .collect()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Classification of a run of statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum SegmentKind {
    /// Plain SQL text outside any escape region.
    Unescaped,
    /// Text inside one escape region, including its start and end markers.
    Escaped(EscapeDelimiter),
}

/// A contiguous run of text within a statement. Concatenating a statement's
/// segments in order reproduces the statement text exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptSegment {
    pub kind: SegmentKind,
    pub text: String,
}

impl ScriptSegment {
    pub fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// A single statement split out of a script: the segments between two
/// delimiter lines (or script start/end), and the location of the line the
/// statement began on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedStatement {
    location: ScriptLocation,
    segments: Vec<ScriptSegment>,
}

impl ParsedStatement {
    pub(crate) fn new(location: ScriptLocation, segments: Vec<ScriptSegment>) -> Self {
        Self { location, segments }
    }

    /// Location of the first line of the statement.
    pub fn location(&self) -> &ScriptLocation {
        &self.location
    }

    pub fn segments(&self) -> &[ScriptSegment] {
        &self.segments
    }

    /// The statement text, exclusive of the delimiter line that terminated it
    /// and the newline immediately before that line.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for segment in &self.segments {
            text.push_str(&segment.text);
        }
        text
    }
}

impl std::fmt::Display for ParsedStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, derive_more::Display)]
#[display("{error} at {location}{}", statement.as_deref().map_or(String::new(), |s| format!(":\n{s}")))]
pub struct ParseError {
    pub error: ParseErrorType,
    pub location: ScriptLocation,
    /// The offending statement's text, where one was identifiable.
    pub statement: Option<String>,
}

impl ParseError {
    pub fn new(error: ParseErrorType, location: ScriptLocation) -> Self {
        Self {
            error,
            location,
            statement: None,
        }
    }

    pub fn new_with_statement(
        error: ParseErrorType,
        location: ScriptLocation,
        statement: String,
    ) -> Self {
        Self {
            error,
            location,
            statement: Some(statement),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseErrorType {
    #[error("unterminated escape sequence (started with {0})")]
    UnterminatedEscape(EscapeDelimiter),
    #[error("undelimited input still in buffer at end of script")]
    UnterminatedStatement,
    #[error(
        "statement ends with a semi-colon but is not an anonymous block; \
         only \"/\" terminates a statement (only the first error is reported, \
         there may be others)"
    )]
    InvalidSemicolonTerminator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_line_parse() {
        let lines = ScriptLine::parse(ScriptFile::new("test.sql"), "a\nb\r\nc");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text(), "a");
        assert_eq!(lines[1].text(), "b");
        assert_eq!(lines[2].text(), "c");
        assert_eq!(lines[2].location.line, 3);
        assert_eq!(lines[2].location.to_string(), "test.sql:3");
    }

    #[test]
    fn test_statement_text_is_segment_concatenation() {
        let statement = ParsedStatement::new(
            ScriptLocation::new(ScriptFile::in_memory(), 1),
            vec![
                ScriptSegment::new(SegmentKind::Unescaped, "SELECT "),
                ScriptSegment::new(
                    SegmentKind::Escaped(EscapeDelimiter::SingleQuote),
                    "'x''y'",
                ),
                ScriptSegment::new(SegmentKind::Unescaped, " FROM dual"),
            ],
        );
        assert_eq!(statement.text(), "SELECT 'x''y' FROM dual");
        assert_eq!(statement.to_string(), statement.text());
    }

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::new_with_statement(
            ParseErrorType::UnterminatedStatement,
            ScriptLocation::new(ScriptFile::new("patch.sql"), 12),
            "SELECT 1".to_string(),
        );
        let message = error.to_string();
        assert!(message.contains("patch.sql:12"));
        assert!(message.contains("SELECT 1"));
    }
}
