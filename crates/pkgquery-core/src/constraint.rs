//! Version constraint expressions.
//!
//! A constraint is a single comparison operator paired with an operand
//! version, e.g. `>=1.2.0` or `~=1.4.2`. Compound expressions (ranges,
//! AND/OR combinations) are not supported.

use crate::error::{CoreError, Result};

/// Comparison operator of a constraint expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `==` exact string match
    Exact,
    /// `>=`
    GreaterEq,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `<`
    Less,
    /// `~=` compatible release (textual prefix match)
    Compatible,
}

/// A parsed constraint: one operator and its operand version string.
///
/// # Examples
///
/// ```
/// use pkgquery_core::constraint::{Constraint, Op};
///
/// let c = Constraint::parse(">=1.2.0").unwrap();
/// assert_eq!(c.op, Op::GreaterEq);
/// assert_eq!(c.operand, "1.2.0");
///
/// assert!(Constraint::parse("^1.0").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub op: Op,
    pub operand: String,
}

/// Operator prefixes in match order. Multi-character operators must come
/// before their single-character prefixes (`>=` before `>`, `<=` before `<`).
const OPERATORS: &[(&str, Op)] = &[
    ("==", Op::Exact),
    (">=", Op::GreaterEq),
    ("<=", Op::LessEq),
    ("~=", Op::Compatible),
    (">", Op::Greater),
    ("<", Op::Less),
];

impl Constraint {
    /// Parses a constraint expression of the form `<op><version>`.
    ///
    /// The operand is trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConstraint` when the expression does not
    /// start with a recognized operator or the operand is empty. The
    /// reference behavior silently skipped filtering on an unknown
    /// operator; rejecting it outright makes a typo'd operator visible to
    /// the caller instead.
    pub fn parse(input: &str) -> Result<Self> {
        let expr = input.trim();
        for (prefix, op) in OPERATORS {
            if let Some(operand) = expr.strip_prefix(prefix) {
                let operand = operand.trim();
                if operand.is_empty() {
                    return Err(CoreError::InvalidConstraint(input.to_string()));
                }
                return Ok(Self {
                    op: *op,
                    operand: operand.to_string(),
                });
            }
        }
        Err(CoreError::InvalidConstraint(input.to_string()))
    }

    /// Prefix used by the `~=` operator: all operand components except the
    /// last, joined with `.` and terminated by `.`.
    ///
    /// `~=1.4.2` yields `1.4.`, so `1.4.9` matches while `1.4` (no trailing
    /// dot) and `1.5.0` do not. This is a textual prefix test, not a
    /// numeric compatible-release range.
    pub fn compatible_prefix(&self) -> String {
        let parts: Vec<&str> = self.operand.split('.').collect();
        let mut prefix = parts[..parts.len() - 1].join(".");
        prefix.push('.');
        prefix
    }
}
