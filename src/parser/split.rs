use crate::parser::escape::EscapeTracker;
use crate::script::{
    ParseError, ParseErrorType, ParsedStatement, ScriptFile, ScriptLine, ScriptLocation,
};

/// Tests a buffer for a statement delimiter at the given byte index. The
/// character at the index must be `/`; the line containing it is isolated by
/// the nearest newline on either side (string start/end count as boundaries)
/// and qualifies only if its trimmed content is exactly `/`.
pub fn statement_delimiter_at(buffer: &str, at: usize) -> bool {
    if buffer.as_bytes().get(at) != Some(&b'/') {
        return false;
    }

    let line_start = buffer[..at].rfind('\n').map_or(0, |index| index + 1);
    let line_end = buffer[at..].find('\n').map_or(buffer.len(), |index| at + index);

    buffer[line_start..line_end].trim() == "/"
}

/// True if the line is a statement delimiter: a `/` on a line by itself,
/// disregarding whitespace.
fn is_delimiter_line(line: &str) -> bool {
    line.find('/')
        .is_some_and(|at| statement_delimiter_at(line, at))
}

fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'$' | b'#')
}

/// True if an already-uppercased last line closes a PL/SQL anonymous block:
/// the word `END`, optionally followed by other characters, then a `;`.
fn ends_like_anonymous_block(last_line: &str) -> bool {
    let bytes = last_line.as_bytes();
    let mut search = 0;
    while let Some(found) = last_line[search..].find("END") {
        let at = search + found;
        let boundary_before = at == 0 || !is_identifier_byte(bytes[at - 1]);
        let boundary_after = bytes
            .get(at + 3)
            .is_none_or(|byte| !is_identifier_byte(*byte));
        if boundary_before && boundary_after && last_line[at + 3..].contains(';') {
            return true;
        }
        search = at + 3;
    }
    false
}

/// Statements must be terminated by the delimiter line alone; a trailing
/// semi-colon is only legal on an anonymous block, whose `END ... ;` is part
/// of the block itself.
fn validate_terminator(
    statement: &ParsedStatement,
    allow_semicolon_terminators: bool,
) -> Result<(), ParseError> {
    if allow_semicolon_terminators {
        return Ok(());
    }

    let text = statement.text();
    let upper = text.to_uppercase();
    if upper.ends_with(';') {
        let last_line = upper.rsplit('\n').next().unwrap_or_default();
        if !ends_like_anonymous_block(last_line) {
            return Err(ParseError::new_with_statement(
                ParseErrorType::InvalidSemicolonTerminator,
                statement.location().clone(),
                text,
            ));
        }
    }
    Ok(())
}

/// Split a script into its delimited statements.
///
/// Each non-delimiter line is accumulated into the current statement; a naked
/// `/` line completes it. The escape tracker's state is carried across lines,
/// so a `/`-only line inside a still-open block comment, q-quote or string
/// literal is statement content, not a terminator.
pub(crate) fn split_statements(
    file: ScriptFile,
    script: &str,
    allow_semicolon_terminators: bool,
) -> Result<Vec<ParsedStatement>, ParseError> {
    let lines = ScriptLine::parse(file.clone(), script);
    let mut statements = Vec::new();
    let mut tracker = EscapeTracker::new();
    let mut statement_start: Option<ScriptLocation> = None;

    for line in &lines {
        if tracker.is_idle() && is_delimiter_line(line.text()) {
            let location = statement_start
                .take()
                .unwrap_or_else(|| line.location.clone());
            let statement = ParsedStatement::new(location, tracker.finish_statement());
            validate_terminator(&statement, allow_semicolon_terminators)?;
            statements.push(statement);
        } else {
            if statement_start.is_none() {
                statement_start = Some(line.location.clone());
            }
            tracker.scan_line(line);
        }
    }

    if let Some((delimiter, opened_at)) = tracker.open_region() {
        return Err(ParseError::new(
            ParseErrorType::UnterminatedEscape(delimiter),
            opened_at.clone(),
        ));
    }

    let leftover = tracker.leftover_text();
    if !leftover.trim().is_empty() {
        let location = statement_start.unwrap_or_else(|| ScriptLocation::new(file, 1));
        return Err(ParseError::new_with_statement(
            ParseErrorType::UnterminatedStatement,
            location,
            leftover,
        ));
    }

    Ok(statements)
}
