//! Condition Parser — turns WHERE tokens into structured condition steps.
//!
//! Grammar over a flat token sequence:
//!
//! ```text
//! <col><op><value> ((AND|OR) <col><op><value>)*
//! ```
//!
//! Combinators are case-insensitive. Evaluation order downstream is
//! strictly left-to-right with no precedence: `A AND B OR C` means
//! `(A AND B) OR C` textually in sequence, not a general boolean
//! expression. This module is independent of storage.

use crate::engine::types::{Combinator, CompareOp, Condition, ConditionStep};
use crate::error::{TableError, TableResult};

/// Split a single condition token into (column, operator, value).
///
/// Scans left-to-right for the first occurrence of `>=`/`<=` (two-char
/// operators checked first), else the first of `=`/`>`/`<`. Fails if no
/// operator is found, or the operator sits at the very start or end of the
/// token.
pub fn split_condition(token: &str) -> TableResult<Condition> {
    let bytes = token.as_bytes();
    let malformed = || TableError::MalformedCondition(token.to_string());

    let mut found: Option<(usize, usize, CompareOp)> = None;
    for i in 0..bytes.len().saturating_sub(1) {
        match (bytes[i], bytes[i + 1]) {
            (b'>', b'=') => {
                found = Some((i, 2, CompareOp::Ge));
                break;
            }
            (b'<', b'=') => {
                found = Some((i, 2, CompareOp::Le));
                break;
            }
            _ => {}
        }
    }
    if found.is_none() {
        for (i, &b) in bytes.iter().enumerate() {
            let op = match b {
                b'=' => CompareOp::Eq,
                b'>' => CompareOp::Gt,
                b'<' => CompareOp::Lt,
                _ => continue,
            };
            found = Some((i, 1, op));
            break;
        }
    }

    let (pos, op_len, op) = found.ok_or_else(malformed)?;
    if pos == 0 || pos + op_len >= bytes.len() {
        return Err(malformed());
    }

    Ok(Condition {
        column: token[..pos].to_string(),
        op,
        value: token[pos + op_len..].to_string(),
    })
}

/// Parse a full condition token sequence into ordered steps.
///
/// The first step carries no combinator; every later step records the
/// AND/OR that preceded it. A combinator with nothing following it is a
/// `DanglingOperator` error.
pub fn parse_steps(tokens: &[String]) -> TableResult<Vec<ConditionStep>> {
    let mut steps = Vec::with_capacity(tokens.len() / 2 + 1);
    let mut pending: Option<Combinator> = None;
    let mut expect_condition = true;

    for token in tokens {
        if expect_condition {
            steps.push(ConditionStep {
                combinator: pending.take(),
                condition: split_condition(token)?,
            });
            expect_condition = false;
        } else {
            match Combinator::parse(token) {
                Some(c) => {
                    pending = Some(c);
                    expect_condition = true;
                }
                None => return Err(TableError::MalformedCondition(token.clone())),
            }
        }
    }

    if expect_condition && !tokens.is_empty() {
        return Err(TableError::DanglingOperator);
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_equality() {
        let c = split_condition("id=1").unwrap();
        assert_eq!(c.column, "id");
        assert_eq!(c.op, CompareOp::Eq);
        assert_eq!(c.value, "1");
    }

    #[test]
    fn test_split_two_char_before_one_char() {
        let c = split_condition("age>=30").unwrap();
        assert_eq!(c.op, CompareOp::Ge);
        assert_eq!(c.value, "30");

        let c = split_condition("age<=30").unwrap();
        assert_eq!(c.op, CompareOp::Le);
    }

    #[test]
    fn test_split_value_may_contain_operator_chars() {
        // First operator wins; the rest belongs to the value.
        let c = split_condition("note=a=b").unwrap();
        assert_eq!(c.column, "note");
        assert_eq!(c.value, "a=b");
    }

    #[test]
    fn test_split_rejects_missing_operator() {
        assert!(matches!(
            split_condition("justacolumn"),
            Err(TableError::MalformedCondition(_))
        ));
    }

    #[test]
    fn test_split_rejects_operator_at_ends() {
        assert!(split_condition("=value").is_err());
        assert!(split_condition("col=").is_err());
        assert!(split_condition(">=5").is_err());
        assert!(split_condition("col>=").is_err());
    }

    #[test]
    fn test_parse_single_step() {
        let steps = parse_steps(&tokens(&["id=1"])).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].combinator, None);
    }

    #[test]
    fn test_parse_and_or_sequence() {
        let steps = parse_steps(&tokens(&["id=1", "AND", "age>26", "or", "id=2"])).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].combinator, None);
        assert_eq!(steps[1].combinator, Some(Combinator::And));
        assert_eq!(steps[2].combinator, Some(Combinator::Or));
    }

    #[test]
    fn test_parse_dangling_operator() {
        assert!(matches!(
            parse_steps(&tokens(&["id=1", "AND"])),
            Err(TableError::DanglingOperator)
        ));
        assert!(matches!(
            parse_steps(&tokens(&["id=1", "or"])),
            Err(TableError::DanglingOperator)
        ));
    }

    #[test]
    fn test_parse_rejects_missing_combinator() {
        // Two conditions in a row with no AND/OR between them.
        assert!(matches!(
            parse_steps(&tokens(&["id=1", "id=2"])),
            Err(TableError::MalformedCondition(_))
        ));
    }

    #[test]
    fn test_parse_empty_is_empty() {
        assert!(parse_steps(&[]).unwrap().is_empty());
    }
}
