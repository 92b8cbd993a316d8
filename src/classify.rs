//! Character classes used by the scanner.
//!
//! Every input character falls into exactly one class: whitespace, identifier,
//! delimiter, operator, or unrecognized. `;` belongs to no class and the scan
//! loop rejects it explicitly; other unrecognized characters are skipped.

/// Whitespace between tokens.
pub fn is_space(ch: char) -> bool {
    ch.is_whitespace()
}

/// Decimal digit. Digits are also identifier characters; this narrower
/// predicate drives the number paths.
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Characters that may appear in an identifier: ASCII letters, digits,
/// `@`, `_`, and `$`. Template dialects use `@`-prefixed loop aliases
/// (`@index`) and `$`-prefixed helpers, so both are ordinary name characters.
pub fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '@' || ch == '_' || ch == '$'
}

/// Structural delimiters, each with its own handler in the scanner.
pub fn is_delimiter(ch: char) -> bool {
    matches!(
        ch,
        '.' | '{' | '}' | '[' | ']' | '(' | ')' | ',' | '\'' | '"'
    )
}

/// Characters that can start or continue an operator symbol. Multi-character
/// symbols (`===`, `&&`, ...) resolve by longest match in the scanner.
pub fn is_operator_char(ch: char) -> bool {
    matches!(
        ch,
        '+' | '-' | '*' | '/' | '%' | '<' | '>' | '=' | '!' | '&' | '|' | '?' | ':'
    )
}

#[test]
fn test_classes_partition_ascii() {
    for code in 0u8..128 {
        let ch = code as char;
        let memberships = [
            is_space(ch),
            is_identifier_char(ch),
            is_delimiter(ch),
            is_operator_char(ch),
        ]
        .iter()
        .filter(|m| **m)
        .count();
        assert!(
            memberships <= 1,
            "character {:?} belongs to {} classes",
            ch,
            memberships
        );
    }
}

#[test]
fn test_semicolon_has_no_class() {
    assert!(!is_space(';'));
    assert!(!is_identifier_char(';'));
    assert!(!is_delimiter(';'));
    assert!(!is_operator_char(';'));
}

#[test]
fn test_digits_are_identifier_chars() {
    for ch in '0'..='9' {
        assert!(is_digit(ch));
        assert!(is_identifier_char(ch));
    }
    assert!(!is_digit('a'));
}
