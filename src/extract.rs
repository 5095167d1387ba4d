//! Data-field extraction from alpha expressions.
//!
//! The formula language is small and forgiving, so extraction never fails:
//! malformed calls, unknown functions and runaway nesting all degrade to a
//! flat identifier scan rather than an error.
//!
//! Operators with no usable positional rule only have their first argument
//! scanned. That is a heuristic and can miss fields passed in later positions
//! of multi-argument operators; add an override rule for such operators.

use crate::assign::resolve_assignments;
use crate::clean::strip_comments;
use crate::config::EngineConfig;
use crate::lexer::{split_top_level, split_top_level_args, tokenize, Token, TokenKind};
use crate::ops::{OperatorCatalog, ParamRule, RuleTable};
use crate::types::FieldSet;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Word forms of `&&` / `||`.
const LOGICAL_WORDS: [&str; 2] = ["and", "or"];

/// Read-only operator knowledge shared by every extraction in a session.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    operator_names: HashSet<String>,
    rules: RuleTable,
    max_depth: usize,
}

impl ExtractionContext {
    pub fn new(operator_names: HashSet<String>, rules: RuleTable) -> Self {
        Self {
            operator_names,
            rules,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Builds names and rules from a fetched catalog. Config overrides are
    /// layered over the built-in ones.
    pub fn from_catalog(catalog: &OperatorCatalog, config: &EngineConfig) -> Self {
        let overrides: BTreeMap<String, ParamRule> = config.override_rules();
        let rules = RuleTable::build(catalog.operators(), &overrides);
        Self::new(catalog.names(), rules).with_max_depth(config.max_depth)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn is_operator(&self, name: &str) -> bool {
        self.operator_names.contains(name)
    }

    pub fn operator_names(&self) -> &HashSet<String> {
        &self.operator_names
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Returns the set of data fields referenced by `input`.
///
/// The whole statement sequence (assignment targets removed) is scanned, and
/// so is every right-hand side on its own; the union is filtered of local
/// variables and operator names.
pub fn extract_fields(input: &str, ctx: &ExtractionContext) -> FieldSet {
    let cleaned = strip_comments(input);
    let assignments = resolve_assignments(&cleaned, &ctx.operator_names);

    let mut candidates = extract(&assignments.statements_joined(), ctx, 0);
    for fragment in &assignments.rhs_fragments {
        candidates.extend(extract(fragment, ctx, 0));
    }

    candidates
        .into_iter()
        .filter(|name| !assignments.defined_variables.contains(name) && !ctx.is_operator(name))
        .collect()
}

/// Recursive scan of one expression. The result may contain duplicates.
pub fn extract(expr: &str, ctx: &ExtractionContext, depth: usize) -> Vec<String> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Vec::new();
    }
    if depth > ctx.max_depth {
        debug!(
            depth,
            expr, "nesting exceeds depth limit, scanning identifiers only"
        );
        return flat_scan(expr, ctx);
    }

    let tokens = tokenize(expr);

    // Operators nested only inside parentheses leave a single operand, which
    // recurses until the depth guard hands it to the flat scan.
    if has_comparison_or_logical(expr, &tokens) {
        return split_top_level_operands(expr)
            .into_iter()
            .flat_map(|operand| extract(operand, ctx, depth + 1))
            .collect();
    }

    let fields = peel_calls(expr, &tokens, ctx, depth);
    if fields.is_empty() {
        flat_scan(expr, ctx)
    } else {
        fields
    }
}

fn has_comparison_or_logical(expr: &str, tokens: &[Token]) -> bool {
    let mut depth: i32 = 0;
    for tok in tokens {
        if tok.kind.is_comparison_or_logical() {
            return true;
        }
        if tok.kind.opens_group() {
            depth += 1;
        } else if tok.kind.closes_group() {
            depth -= 1;
        } else if depth == 0 && is_logical_word(expr, tok) {
            return true;
        }
    }
    false
}

fn is_logical_word(source: &str, tok: &Token) -> bool {
    tok.kind == TokenKind::Ident && LOGICAL_WORDS.contains(&tok.text(source))
}

/// Operands between depth-0 comparison/logical operators, including the word
/// forms `and` / `or`.
fn split_top_level_operands(expr: &str) -> Vec<&str> {
    split_top_level(expr, |tok| {
        tok.kind.is_comparison_or_logical() || is_logical_word(expr, tok)
    })
}

/// Peels top-level `name(args)` calls left to right and scans their field
/// arguments according to each operator's rule.
fn peel_calls(
    expr: &str,
    tokens: &[Token],
    ctx: &ExtractionContext,
    depth: usize,
) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cursor = 0;
    while cursor + 1 < tokens.len() {
        let name_tok = tokens[cursor];
        if name_tok.kind != TokenKind::Ident || tokens[cursor + 1].kind != TokenKind::LParen {
            cursor += 1;
            continue;
        }
        let Some(close) = matching_paren(tokens, cursor + 1) else {
            debug!(expr, "unterminated call, stopping call scan");
            break;
        };

        let name = name_tok.text(expr);
        let args = split_top_level_args(&expr[tokens[cursor + 1].end..tokens[close].start]);
        match ctx.rules.get(name) {
            Some(rule) if !rule.is_empty() => {
                for &pos in &rule.field_positions {
                    let Some(arg) = args.get(pos) else {
                        continue;
                    };
                    if rule.ignore_named && is_named_binding(arg) {
                        continue;
                    }
                    fields.extend(extract(arg, ctx, depth + 1));
                }
            }
            _ if ctx.is_operator(name) => {
                if let Some(first) = args.first() {
                    fields.extend(extract(first, ctx, depth + 1));
                }
            }
            _ => {}
        }
        cursor = close + 1;
    }
    fields
}

fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, tok) in tokens.iter().enumerate().skip(open) {
        match tok.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Arguments skipped under `ignore_named`: any text containing `=`, which
/// also covers `>=`, `==` and nested `key=value` pairs.
fn is_named_binding(arg: &str) -> bool {
    arg.contains('=')
}

/// Every identifier that is not an operator name, a logical word, or the key
/// of a `key = value` binding anywhere in `expr`.
fn flat_scan(expr: &str, ctx: &ExtractionContext) -> Vec<String> {
    let tokens = tokenize(expr);
    let named_keys: HashSet<&str> = tokens
        .windows(2)
        .filter(|pair| pair[0].kind == TokenKind::Ident && pair[1].kind == TokenKind::Equal)
        .map(|pair| pair[0].text(expr))
        .collect();

    tokens
        .iter()
        .filter(|tok| tok.kind == TokenKind::Ident)
        .map(|tok| tok.text(expr))
        .filter(|name| {
            !ctx.is_operator(name) && !named_keys.contains(name) && !LOGICAL_WORDS.contains(name)
        })
        .map(str::to_string)
        .collect()
}
