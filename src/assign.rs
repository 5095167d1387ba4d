//! Statement-level assignments: which names are local variables, and which
//! right-hand sides still need scanning.

use crate::lexer::{identifiers, split_top_level, tokenize, TokenKind};
use std::collections::{BTreeSet, HashSet};

/// Result of scanning a statement sequence for top-level assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignments {
    /// Identifiers assigned at statement level; never reported as fields.
    pub defined_variables: BTreeSet<String>,
    /// Right-hand sides of assignments, plus every statement without one.
    pub rhs_fragments: Vec<String>,
}

impl Assignments {
    /// The statement sequence with every assignment target removed.
    pub fn statements_joined(&self) -> String {
        self.rhs_fragments.join("; ")
    }
}

/// Splits `cleaned` into `;`-separated statements and records the target of
/// each top-level assignment.
///
/// The first bare `=` outside any brackets splits a statement; `==`, `<=`,
/// `>=` and `!=` are comparisons, not assignments.
pub fn resolve_assignments(cleaned: &str, operator_names: &HashSet<String>) -> Assignments {
    let mut out = Assignments::default();
    for statement in split_top_level(cleaned, |tok| tok.kind == TokenKind::Semicolon) {
        match split_assignment(statement) {
            Some((lhs, rhs)) => {
                for name in identifiers(lhs) {
                    if !operator_names.contains(name) {
                        out.defined_variables.insert(name.to_string());
                    }
                }
                if !rhs.is_empty() {
                    out.rhs_fragments.push(rhs.to_string());
                }
            }
            None => out.rhs_fragments.push(statement.to_string()),
        }
    }
    out
}

fn split_assignment(statement: &str) -> Option<(&str, &str)> {
    let mut depth: i32 = 0;
    for tok in tokenize(statement) {
        match tok.kind {
            kind if kind.opens_group() => depth += 1,
            kind if kind.closes_group() => depth -= 1,
            TokenKind::Equal if depth == 0 => {
                return Some((
                    statement[..tok.start].trim(),
                    statement[tok.end..].trim(),
                ));
            }
            _ => {}
        }
    }
    None
}
