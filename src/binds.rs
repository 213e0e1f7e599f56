use crate::script::ParsedStatement;

/// Collects the bind variable names used by a statement, in source order.
///
/// A bind variable is a `:` followed by a letter, then any run of letters,
/// digits, `#`, `_` or `$`. Only unescaped segments are searched: text inside
/// string literals, quoted identifiers and comments never binds anything.
/// Duplicate names are kept; uniqueness is the caller's policy.
pub fn bind_variables(statement: &ParsedStatement) -> Vec<String> {
    let mut binds = Vec::new();
    for segment in statement.segments() {
        if segment.kind.is_unescaped() {
            collect_binds(&segment.text, &mut binds);
        }
    }
    binds
}

fn is_bind_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'#' | b'_' | b'$')
}

fn collect_binds(text: &str, binds: &mut Vec<String>) {
    let bytes = text.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b':'
            && bytes
                .get(index + 1)
                .is_some_and(|byte| byte.is_ascii_alphabetic())
        {
            let start = index + 1;
            let mut end = start + 1;
            while end < bytes.len() && is_bind_byte(bytes[end]) {
                end += 1;
            }
            binds.push(text[start..end].to_string());
            index = end;
        } else {
            index += 1;
        }
    }
}
