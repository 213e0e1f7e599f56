use serde::Serialize;

use crate::script::{ScriptLine, ScriptLocation, ScriptSegment, SegmentKind};

/// Character sequences which delimit escaped SQL regions.
///
/// Order is important: the q-quote variants must be tested before
/// `SingleQuote`, otherwise the quote inside a q-quote start sequence would
/// match first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::IsVariant)]
pub enum EscapeDelimiter {
    QQuoteBrace,
    QQuoteSquare,
    QQuoteBang,
    QQuoteParen,
    QQuoteAngle,
    BlockComment,
    DoubleQuote,
    SingleQuote,
    LineComment,
}

impl EscapeDelimiter {
    /// Every delimiter, in matching priority order.
    pub const ALL: [EscapeDelimiter; 9] = [
        EscapeDelimiter::QQuoteBrace,
        EscapeDelimiter::QQuoteSquare,
        EscapeDelimiter::QQuoteBang,
        EscapeDelimiter::QQuoteParen,
        EscapeDelimiter::QQuoteAngle,
        EscapeDelimiter::BlockComment,
        EscapeDelimiter::DoubleQuote,
        EscapeDelimiter::SingleQuote,
        EscapeDelimiter::LineComment,
    ];

    pub fn start_sequence(self) -> &'static str {
        match self {
            EscapeDelimiter::QQuoteBrace => "q'{",
            EscapeDelimiter::QQuoteSquare => "q'[",
            EscapeDelimiter::QQuoteBang => "q'!",
            EscapeDelimiter::QQuoteParen => "q'(",
            EscapeDelimiter::QQuoteAngle => "q'<",
            EscapeDelimiter::BlockComment => "/*",
            EscapeDelimiter::DoubleQuote => "\"",
            EscapeDelimiter::SingleQuote => "'",
            EscapeDelimiter::LineComment => "--",
        }
    }

    pub fn end_sequence(self) -> &'static str {
        match self {
            EscapeDelimiter::QQuoteBrace => "}'",
            EscapeDelimiter::QQuoteSquare => "]'",
            EscapeDelimiter::QQuoteBang => "!'",
            EscapeDelimiter::QQuoteParen => ")'",
            EscapeDelimiter::QQuoteAngle => ">'",
            EscapeDelimiter::BlockComment => "*/",
            EscapeDelimiter::DoubleQuote => "\"",
            EscapeDelimiter::SingleQuote => "'",
            EscapeDelimiter::LineComment => "\n",
        }
    }

    /// Whether the region must be explicitly closed by its end sequence.
    /// Line comments close implicitly at the end of the line.
    pub fn requires_end_delimiter(self) -> bool {
        !self.is_line_comment()
    }

    pub fn is_q_quote(self) -> bool {
        matches!(
            self,
            EscapeDelimiter::QQuoteBrace
                | EscapeDelimiter::QQuoteSquare
                | EscapeDelimiter::QQuoteBang
                | EscapeDelimiter::QQuoteParen
                | EscapeDelimiter::QQuoteAngle
        )
    }

    /// The first delimiter whose start sequence begins `text`, if any.
    /// Q-quote starts also match an uppercase `Q`.
    pub fn matching_start(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|delimiter| delimiter.starts(text))
    }

    fn starts(self, text: &str) -> bool {
        let start = self.start_sequence();
        if self.is_q_quote() {
            let mut chars = text.chars();
            matches!(chars.next(), Some('q' | 'Q')) && chars.as_str().starts_with(&start[1..])
        } else {
            text.starts_with(start)
        }
    }
}

impl std::fmt::Display for EscapeDelimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.start_sequence())
    }
}

#[derive(Debug, Clone)]
struct OpenRegion {
    delimiter: EscapeDelimiter,
    opened_at: ScriptLocation,
}

/// Scanner state carried across lines: either no escape region is open, or a
/// region of one kind is open and we are searching for its end sequence.
///
/// The tracker accumulates the text it scans into [`ScriptSegment`]s, one
/// unescaped segment per run of plain text and one escaped segment per
/// region, so statement reconstruction is lossless.
#[derive(Debug, Default)]
pub struct EscapeTracker {
    open: Option<OpenRegion>,
    segments: Vec<ScriptSegment>,
    current: String,
}

impl EscapeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The escape region open at the current scan position, with the location
    /// it was opened at. After [`scan_line`](Self::scan_line) this is always a
    /// region that spans lines, since line comments close at end of line.
    pub fn open_region(&self) -> Option<(EscapeDelimiter, &ScriptLocation)> {
        self.open
            .as_ref()
            .map(|region| (region.delimiter, &region.opened_at))
    }

    pub fn is_idle(&self) -> bool {
        self.open.is_none()
    }

    /// Scan one line into the current statement, including its newline.
    pub fn scan_line(&mut self, line: &ScriptLine) {
        let text = line.text();
        let mut pos = 0;
        while pos < text.len() {
            let rest = &text[pos..];
            match self.open.as_ref().map(|region| region.delimiter) {
                None => {
                    if let Some(delimiter) = EscapeDelimiter::matching_start(rest) {
                        self.flush(SegmentKind::Unescaped);
                        self.open = Some(OpenRegion {
                            delimiter,
                            opened_at: line.location.clone(),
                        });
                        let len = delimiter.start_sequence().len();
                        self.current.push_str(&rest[..len]);
                        pos += len;
                    } else {
                        pos += self.push_char(rest);
                    }
                }
                Some(EscapeDelimiter::SingleQuote) => {
                    // A doubled quote is an escaped quote, not a terminator.
                    if rest.starts_with("''") {
                        self.current.push_str("''");
                        pos += 2;
                    } else if rest.starts_with('\'') {
                        self.current.push('\'');
                        pos += 1;
                        self.close_region();
                    } else {
                        pos += self.push_char(rest);
                    }
                }
                Some(EscapeDelimiter::LineComment) => {
                    // Nothing closes a line comment before the end of the line.
                    self.current.push_str(rest);
                    pos = text.len();
                }
                Some(delimiter) => {
                    let end = delimiter.end_sequence();
                    if rest.starts_with(end) {
                        self.current.push_str(end);
                        pos += end.len();
                        self.close_region();
                    } else {
                        pos += self.push_char(rest);
                    }
                }
            }
        }

        // Every line carries an implicit newline, which also closes an open
        // line comment.
        self.current.push('\n');
        if let Some(region) = &self.open {
            if region.delimiter.is_line_comment() {
                self.close_region();
            }
        }
    }

    /// Take the accumulated segments as a completed statement, stripping the
    /// newline that preceded the delimiter line. Must only be called while no
    /// region is open.
    pub fn finish_statement(&mut self) -> Vec<ScriptSegment> {
        debug_assert!(self.open.is_none(), "finish_statement inside an open region");
        if self.current.ends_with('\n') {
            self.current.pop();
        } else if self.current.is_empty() {
            // The statement ended inside a line comment, whose segment
            // swallowed the newline.
            if let Some(last) = self.segments.last_mut() {
                if last.text.ends_with('\n') {
                    last.text.pop();
                }
            }
        }
        self.flush(SegmentKind::Unescaped);
        std::mem::take(&mut self.segments)
    }

    /// The text scanned since the last completed statement.
    pub fn leftover_text(&self) -> String {
        let mut text = String::new();
        for segment in &self.segments {
            text.push_str(&segment.text);
        }
        text.push_str(&self.current);
        text
    }

    fn push_char(&mut self, rest: &str) -> usize {
        let c = rest.chars().next().unwrap_or_default();
        self.current.push(c);
        c.len_utf8()
    }

    fn close_region(&mut self) {
        if let Some(region) = self.open.take() {
            self.flush(SegmentKind::Escaped(region.delimiter));
        }
    }

    fn flush(&mut self, kind: SegmentKind) {
        if !self.current.is_empty() {
            self.segments
                .push(ScriptSegment::new(kind, std::mem::take(&mut self.current)));
        }
    }
}
