use std::path::Path;

use crate::script::{ParseError, ParsedStatement, ScriptFile};

pub mod escape;
pub mod split;

#[derive(thiserror::Error, Debug)]
pub enum ScriptReadError {
    #[error("error parsing script file {file}: {error}")]
    Parse { file: ScriptFile, error: ParseError },
    #[error("error reading script file {file}: {error}")]
    Io {
        file: ScriptFile,
        error: std::io::Error,
    },
}

/// Splits a string containing one or more delimited SQL statements into a
/// list of [`ParsedStatement`]s. The splitter performs a basic lexical parse
/// of the string to account for the following Oracle SQL escape sequences:
///
/// - Single quote (string literal, with `''` doubling)
/// - Double quote (identifier)
/// - Q-quoted string (e.g. `q'{What's up}'`)
/// - Single line comment (`--`)
/// - Multi line comment
///
/// Statement delimiters within escape sequences do not split the script. The
/// delimiter is a single forward slash on an otherwise empty line, mirroring
/// the Oracle SQL*Plus client syntax.
///
/// With `allow_semicolon_terminators` false, a statement may only end with a
/// semi-colon if it is a PL/SQL anonymous block (`END ... ;`).
pub fn parse_script(
    file: ScriptFile,
    script: &str,
    allow_semicolon_terminators: bool,
) -> Result<Vec<ParsedStatement>, ParseError> {
    split::split_statements(file, script, allow_semicolon_terminators)
}

/// [`parse_script`] for in-memory text with a synthetic file label.
pub fn parse(
    script: &str,
    allow_semicolon_terminators: bool,
) -> Result<Vec<ParsedStatement>, ParseError> {
    parse_script(ScriptFile::in_memory(), script, allow_semicolon_terminators)
}

/// Reads and splits a script file.
pub fn parse_script_file(
    path: impl AsRef<Path>,
    allow_semicolon_terminators: bool,
) -> Result<Vec<ParsedStatement>, ScriptReadError> {
    let file = ScriptFile::new(path.as_ref());
    let script = std::fs::read_to_string(path.as_ref()).map_err(|error| ScriptReadError::Io {
        file: file.clone(),
        error,
    })?;
    parse_script(file.clone(), &script, allow_semicolon_terminators)
        .map_err(|error| ScriptReadError::Parse { file, error })
}
