//! Flat properties text parser
//!
//! Implements the classic properties file format: natural lines end at
//! `\n`, `\r\n`, or `\r`; a logical line ending in an odd number of
//! backslashes continues on the next natural line with its leading
//! whitespace stripped; keys end at the first unescaped `=`, `:`, or
//! whitespace; `\t` `\n` `\f` `\r` `\\` and `\uXXXX` escapes apply to
//! keys and values alike. Input bytes are ISO-8859-1.

/// Parse failure for a properties document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed \\uXXXX escape on line {line}")]
    MalformedUnicode { line: usize },
}

/// Decodes ISO-8859-1 bytes. Every byte maps to the code point of the
/// same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Parses flat properties text into key/value pairs.
///
/// First-seen key order is preserved; a key repeated later in the same
/// document keeps its last value.
pub fn parse(input: &str) -> Result<Vec<(String, String)>, ParseError> {
    let mut entries: Vec<(String, String)> = Vec::new();

    for (line, chars) in logical_lines(input) {
        let (raw_key, raw_value) = split_entry(&chars);
        let key = unescape(raw_key, line)?;
        let value = unescape(raw_value, line)?;

        if let Some(entry) = entries.iter_mut().find(|entry| entry.0 == key) {
            entry.1 = value;
        } else {
            entries.push((key, value));
        }
    }

    Ok(entries)
}

/// Blank characters within a line (line terminators excluded)
fn is_line_space(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0C'
}

/// Splits input into natural lines on `\n`, `\r\n`, or `\r`
fn natural_lines(input: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c == '\n' {
            lines.push(&input[start..idx]);
            start = idx + 1;
        } else if c == '\r' {
            lines.push(&input[start..idx]);
            start = idx + 1;
            if let Some(&(next_idx, '\n')) = chars.peek() {
                chars.next();
                start = next_idx + 1;
            }
        }
    }
    if start < input.len() {
        lines.push(&input[start..]);
    }

    lines
}

/// Assembles logical lines: blank and comment lines are dropped, and a
/// trailing odd backslash joins the next natural line. Returns each
/// logical line with the number of the natural line it started on.
///
/// Comment detection only applies at logical-line starts; a
/// continuation line beginning with `#` or `!` is data.
fn logical_lines(input: &str) -> Vec<(usize, Vec<char>)> {
    let mut logical = Vec::new();
    let naturals = natural_lines(input);
    let mut index = 0;

    while index < naturals.len() {
        let number = index + 1;
        let line = naturals[index].trim_start_matches(is_line_space);
        index += 1;

        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut chars: Vec<char> = line.chars().collect();
        while ends_with_continuation(&chars) {
            chars.pop();
            if index >= naturals.len() {
                break;
            }
            chars.extend(naturals[index].trim_start_matches(is_line_space).chars());
            index += 1;
        }

        logical.push((number, chars));
    }

    logical
}

fn ends_with_continuation(chars: &[char]) -> bool {
    let trailing = chars.iter().rev().take_while(|&&c| c == '\\').count();
    trailing % 2 == 1
}

/// Splits a logical line into raw (still escaped) key and value parts.
///
/// The key runs to the first unescaped `=`, `:`, or blank; a blank run
/// may be followed by a single `=`/`:` separator; the value starts at
/// the next non-blank character. A key-only line has an empty value.
fn split_entry(chars: &[char]) -> (&[char], &[char]) {
    let limit = chars.len();
    let mut key_len = 0;
    let mut value_start = limit;
    let mut has_separator = false;
    let mut preceding_backslash = false;

    while key_len < limit {
        let c = chars[key_len];
        if (c == '=' || c == ':') && !preceding_backslash {
            value_start = key_len + 1;
            has_separator = true;
            break;
        }
        if is_line_space(c) && !preceding_backslash {
            value_start = key_len + 1;
            break;
        }
        if c == '\\' {
            preceding_backslash = !preceding_backslash;
        } else {
            preceding_backslash = false;
        }
        key_len += 1;
    }

    while value_start < limit {
        let c = chars[value_start];
        if !is_line_space(c) {
            if !has_separator && (c == '=' || c == ':') {
                has_separator = true;
            } else {
                break;
            }
        }
        value_start += 1;
    }

    (&chars[..key_len], &chars[value_start..])
}

/// Processes backslash escapes. A backslash before a character without
/// a special meaning yields that character.
fn unescape(chars: &[char], line: usize) -> Result<String, ParseError> {
    let mut out = String::with_capacity(chars.len());
    let mut iter = chars.iter().copied();

    while let Some(c) = iter.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match iter.next() {
            // A lone backslash at end of input is dropped.
            None => break,
            Some('u') => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = iter
                        .next()
                        .and_then(|h| h.to_digit(16))
                        .ok_or(ParseError::MalformedUnicode { line })?;
                    code = code * 16 + digit;
                }
                let decoded = char::from_u32(code).ok_or(ParseError::MalformedUnicode { line })?;
                out.push(decoded);
            }
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('f') => out.push('\x0C'),
            Some(other) => out.push(other),
        }
    }

    Ok(out)
}
