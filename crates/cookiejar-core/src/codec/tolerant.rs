//! Tolerant reading
//!
//! Store files may carry `//` and `/* */` comments and trailing commas.
//! Both are removed before the text reaches `serde_json`. String literals
//! are copied through untouched.

use std::iter::Peekable;
use std::str::Chars;

/// Remove `//` line comments and `/* */` block comments
///
/// A comment is replaced by whitespace so adjacent tokens stay separate.
/// An unterminated block comment is left in place and fails the parse.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => copy_string(&mut chars, &mut out),
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut body = String::new();
                let mut closed = false;
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        closed = true;
                        break;
                    }
                    body.push(next);
                    prev = next;
                }
                if closed {
                    out.push(' ');
                } else {
                    out.push_str("/*");
                    out.push_str(&body);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Remove a single comma that directly precedes `}` or `]`
///
/// Only whitespace may sit between the comma and the closing bracket, so
/// run this after `strip_comments`. Commas in `[,]` or `[1,,]` are kept so
/// those still fail to parse.
pub fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => copy_string(&mut chars, &mut out),
            ',' => {
                let closes = chars
                    .clone()
                    .find(|next| !next.is_whitespace())
                    .is_some_and(|next| next == '}' || next == ']');
                let dangling = out.trim_end().ends_with(['[', '{', ',']);
                if !closes || dangling {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Copy a string literal whose opening quote was just consumed
fn copy_string(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    out.push('"');
    while let Some(c) = chars.next() {
        out.push(c);
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '"' => return,
            _ => {}
        }
    }
}
