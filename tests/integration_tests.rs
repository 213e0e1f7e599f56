use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use sqlsplit::binds::bind_variables;
use sqlsplit::parser::escape::EscapeDelimiter;
use sqlsplit::parser::{ScriptReadError, parse_script_file};
use sqlsplit::script::{ParseErrorType, SegmentKind};

fn script_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/scripts")
        .join(name)
}

#[test]
fn test_deploy_script() {
    let statements = parse_script_file(script_path("deploy.sql"), false).unwrap();

    assert_eq!(statements.len(), 4);
    assert_eq!(
        statements
            .iter()
            .map(|statement| statement.location().line)
            .collect::<Vec<_>>(),
        vec![1, 8, 10, 16]
    );

    assert_eq!(
        statements[0].text(),
        "-- Audit trail bootstrap.\n\
         CREATE TABLE audit_trail (\n\
         \x20 id          NUMBER(10)   NOT NULL,\n\
         \x20 table_name  VARCHAR2(30) NOT NULL,\n\
         \x20 change_note VARCHAR2(200)\n\
         )"
    );
    assert_eq!(
        statements[1].text(),
        "COMMENT ON TABLE audit_trail IS q'{Every change and why it's recorded}'"
    );
    assert_eq!(
        statements[2].text(),
        "/* a slash alone on the next line is still comment text\n\
         /\n\
         and does not end anything */\n\
         INSERT INTO audit_trail (id, table_name, change_note)\n\
         VALUES (:id, 'AUDIT_TRAIL', q'[isn't real data -- just a marker]')"
    );
    assert_eq!(
        statements[3].text(),
        "BEGIN\n\
         \x20 UPDATE audit_trail SET change_note = 'it''s done' WHERE id = :id;\n\
         END;"
    );
}

#[test]
fn test_deploy_script_segments() {
    let statements = parse_script_file(script_path("deploy.sql"), false).unwrap();

    let kinds = statements[2]
        .segments()
        .iter()
        .map(|segment| segment.kind)
        .collect::<Vec<_>>();
    assert!(kinds.contains(&SegmentKind::Escaped(EscapeDelimiter::BlockComment)));
    assert!(kinds.contains(&SegmentKind::Escaped(EscapeDelimiter::QQuoteSquare)));
    assert!(kinds.contains(&SegmentKind::Escaped(EscapeDelimiter::SingleQuote)));

    // Segment concatenation reproduces each statement exactly.
    for statement in &statements {
        let rebuilt = statement
            .segments()
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<String>();
        assert_eq!(rebuilt, statement.text());
    }
}

#[test]
fn test_deploy_script_binds() {
    let statements = parse_script_file(script_path("deploy.sql"), false).unwrap();

    assert_eq!(bind_variables(&statements[0]), Vec::<String>::new());
    assert_eq!(bind_variables(&statements[2]), vec!["id"]);
    assert_eq!(bind_variables(&statements[3]), vec!["id"]);
}

#[test]
fn test_bad_semicolon_script() {
    let error = parse_script_file(script_path("bad_semicolon.sql"), false).unwrap_err();
    match error {
        ScriptReadError::Parse { error, .. } => {
            assert_eq!(error.error, ParseErrorType::InvalidSemicolonTerminator);
            assert_eq!(error.location.line, 1);
            assert_eq!(
                error.statement.as_deref(),
                Some("INSERT INTO t VALUES (1);")
            );
        }
        other => panic!("expected a parse error, got: {other}"),
    }
}

#[test]
fn test_bad_semicolon_script_with_semicolons_allowed() {
    let statements = parse_script_file(script_path("bad_semicolon.sql"), true).unwrap();
    assert_eq!(statements.len(), 1);
}

#[test]
fn test_unterminated_comment_script() {
    let error = parse_script_file(script_path("unterminated_comment.sql"), false).unwrap_err();
    match error {
        ScriptReadError::Parse { error, .. } => {
            assert_eq!(
                error.error,
                ParseErrorType::UnterminatedEscape(EscapeDelimiter::BlockComment)
            );
            assert_eq!(error.location.line, 3);
        }
        other => panic!("expected a parse error, got: {other}"),
    }
}

#[test]
fn test_missing_file_is_a_read_error() {
    let error = parse_script_file(script_path("does_not_exist.sql"), false).unwrap_err();
    assert!(matches!(error, ScriptReadError::Io { .. }));
}

#[test]
fn test_generated_script_file_round_trip() {
    let mut script = String::new();
    for index in 0..100 {
        script.push_str(&format!(
            "INSERT INTO numbers VALUES ({index}, 'row''{index}')\n/\n"
        ));
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generated.sql");
    std::fs::write(&path, &script).unwrap();

    let statements = parse_script_file(&path, false).unwrap();
    assert_eq!(statements.len(), 100);
    assert_eq!(
        statements[41].text(),
        "INSERT INTO numbers VALUES (41, 'row''41')"
    );
    assert_eq!(statements[41].location().line, 83);

    let rebuilt = statements
        .iter()
        .map(|statement| format!("{}\n/\n", statement.text()))
        .collect::<String>();
    assert_eq!(rebuilt, script);
}
