//! Type Validator — pure validation and comparison of column values.
//!
//! Values are stored as text and validated only at write time; comparison
//! is deterministic and total over every input, so a query can never fail
//! inside a filter pass.

use crate::engine::types::{ColumnType, CompareOp};
use std::cmp::Ordering;

/// Syntactic validation of a raw value against a declared column type.
pub fn validate(column_type: ColumnType, raw: &str) -> bool {
    match column_type {
        ColumnType::String => true,
        ColumnType::Integer => validate_integer(raw),
        ColumnType::Float => validate_float(raw),
        ColumnType::Date => validate_date(raw),
    }
}

/// Optional leading sign, then at least one decimal digit, nothing else.
fn validate_integer(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let digits = match bytes.first() {
        Some(b'+') | Some(b'-') => &bytes[1..],
        _ => bytes,
    };
    !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
}

/// Optional sign, digits, at most one `.`.
fn validate_float(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let body = match bytes.first() {
        Some(b'+') | Some(b'-') => &bytes[1..],
        _ => bytes,
    };
    if body.is_empty() {
        return false;
    }
    let mut seen_dot = false;
    for &b in body {
        match b {
            b'.' if !seen_dot => seen_dot = true,
            b'.' => return false,
            b'0'..=b'9' => {}
            _ => return false,
        }
    }
    true
}

/// Exactly 10 characters, `-` at positions 4 and 7, digits elsewhere.
/// No calendar validity check: `2024-13-99` is accepted.
fn validate_date(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, &b)| {
        if i == 4 || i == 7 {
            b == b'-'
        } else {
            b.is_ascii_digit()
        }
    })
}

/// Evaluate `a <op> b` under the column type's comparison semantics.
///
/// Integers and floats compare numerically, dates and strings compare
/// byte-lexicographically. Numeric parsing is lenient (longest numeric
/// prefix, zero on no digits) so the function stays total even when the
/// condition's right-hand side was never validated.
pub fn compare(column_type: ColumnType, a: &str, b: &str, op: CompareOp) -> bool {
    let ordering = match column_type {
        ColumnType::Integer => lenient_integer(a).cmp(&lenient_integer(b)),
        ColumnType::Float => {
            let (fa, fb) = (lenient_float(a), lenient_float(b));
            match fa.partial_cmp(&fb) {
                Some(ord) => ord,
                // NaN cannot be produced by the lenient parser.
                None => return false,
            }
        }
        ColumnType::Date | ColumnType::String => a.cmp(b),
    };
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Ge => ordering != Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
    }
}

/// Longest-prefix integer parse: leading whitespace skipped, optional sign,
/// digits until the first non-digit, zero if none. Saturates on overflow.
fn lenient_integer(raw: &str) -> i64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    let mut value: i64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
    }
    if negative { -value } else { value }
}

/// Longest-prefix float parse, zero if no leading numeric prefix.
fn lenient_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    s[..end].parse::<f64>().unwrap_or(0.0)
}
