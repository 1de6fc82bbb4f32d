//! Constraint-based version selection.
//!
//! Given the candidate versions reported by a registry and an optional
//! constraint expression, [`resolve`] filters the candidates, ranks the
//! matches newest-first, and picks a recommended version. This is a pure
//! function over its inputs; the candidate list is never mutated.

use crate::constraint::{Constraint, Op};
use crate::error::Result;
use crate::version::Version;
use std::cmp::Ordering;

/// Outcome of resolving a constraint against a candidate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Matching versions, sorted descending when a constraint was applied.
    pub compatible: Vec<String>,
    /// Highest matching version, or the registry-reported latest when no
    /// constraint was given. Absent when nothing matched.
    pub recommended: Option<String>,
}

/// Filters `candidates` by `constraint` and ranks the matches.
///
/// With no constraint (or a blank one) the full candidate set is returned
/// in its original order and `latest` becomes the recommendation - the
/// registry's own notion of "latest", not a sort-derived one.
///
/// With a constraint:
///
/// - `==` keeps exact string matches of the operand;
/// - `>=`, `>`, `<=`, `<` compare under the lenient total order; candidates
///   that do not parse as versions cannot be ordered and are excluded;
/// - `~=` keeps candidates whose raw string starts with the operand's
///   components minus the last, joined with `.` plus a trailing `.`
///   (a textual prefix test, see [`Constraint::compatible_prefix`]);
/// - matches are sorted descending by parsed version (stable, so identical
///   strings keep their input order) and the first becomes the
///   recommendation. An empty match set yields no recommendation.
///
/// # Errors
///
/// Returns an error when the constraint has an unrecognized operator or a
/// comparison operand that does not parse as a version.
///
/// # Examples
///
/// ```
/// use pkgquery_core::resolver::resolve;
///
/// let candidates: Vec<String> =
///     ["1.0.0", "1.2.0", "1.2.3", "2.0.0"].map(String::from).into();
/// let resolution = resolve(&candidates, "2.0.0", Some(">=1.2.0")).unwrap();
///
/// assert_eq!(resolution.compatible, vec!["2.0.0", "1.2.3", "1.2.0"]);
/// assert_eq!(resolution.recommended.as_deref(), Some("2.0.0"));
/// ```
pub fn resolve(
    candidates: &[String],
    latest: &str,
    constraint: Option<&str>,
) -> Result<Resolution> {
    let expr = constraint.map(str::trim).filter(|c| !c.is_empty());

    let Some(expr) = expr else {
        return Ok(Resolution {
            compatible: candidates.to_vec(),
            recommended: (!latest.is_empty()).then(|| latest.to_string()),
        });
    };

    let constraint = Constraint::parse(expr)?;

    let matches: Vec<&String> = match constraint.op {
        Op::Exact => candidates
            .iter()
            .filter(|v| v.as_str() == constraint.operand)
            .collect(),
        Op::Compatible => {
            let prefix = constraint.compatible_prefix();
            candidates
                .iter()
                .filter(|v| v.starts_with(&prefix))
                .collect()
        }
        Op::GreaterEq | Op::Greater | Op::LessEq | Op::Less => {
            let operand = Version::parse(&constraint.operand)?;
            candidates
                .iter()
                .filter(|v| {
                    // Candidates that fail to parse cannot be ordered
                    Version::parse(v).is_ok_and(|version| {
                        matches!(
                            (constraint.op, version.cmp(&operand)),
                            (Op::GreaterEq, Ordering::Greater | Ordering::Equal)
                                | (Op::Greater, Ordering::Greater)
                                | (Op::LessEq, Ordering::Less | Ordering::Equal)
                                | (Op::Less, Ordering::Less)
                        )
                    })
                })
                .collect()
        }
    };

    let mut ranked: Vec<(String, Option<Version>)> = matches
        .into_iter()
        .map(|v| (v.clone(), Version::parse(v).ok()))
        .collect();

    // Sort newest-first; pairs involving an unparsable version keep their
    // relative input order
    ranked.sort_by(|a, b| match (&a.1, &b.1) {
        (Some(va), Some(vb)) => vb.cmp(va),
        _ => Ordering::Equal,
    });

    let compatible: Vec<String> = ranked.into_iter().map(|(v, _)| v).collect();
    let recommended = compatible.first().cloned();

    Ok(Resolution {
        compatible,
        recommended,
    })
}
