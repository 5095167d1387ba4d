use crate::ops::catalog::Operator;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Which argument positions of an operator may carry data fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamRule {
    /// 0-based positions after top-level comma splitting.
    pub field_positions: Vec<usize>,
    /// Skip a listed position when the argument is written as `name = value`.
    pub ignore_named: bool,
}

impl ParamRule {
    pub fn new(field_positions: Vec<usize>) -> Self {
        Self {
            field_positions,
            ignore_named: true,
        }
    }

    /// Rule accepting fields in positions `0..count`.
    pub fn leading(count: usize) -> Self {
        Self::new((0..count).collect())
    }

    pub fn from_signature(signature: &str) -> Self {
        Self::new(derive_field_positions(signature))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.field_positions.is_empty()
    }
}

/// Hand-written rules for operators whose authored signatures do not name
/// their field parameters in the `x`/`input`/`alpha` convention.
pub fn builtin_overrides() -> BTreeMap<String, ParamRule> {
    [
        ("greater_equal", ParamRule::leading(2)),
        ("multiply", ParamRule::leading(7)),
        ("max", ParamRule::leading(7)),
        ("min", ParamRule::leading(7)),
    ]
    .into_iter()
    .map(|(name, rule)| (name.to_string(), rule))
    .collect()
}

/// Reads the parameter list of an authored signature and returns the positions
/// of field-bearing parameters.
///
/// Only the text between the first `(` and the first `)` is considered.
/// Empty and `...` parameters are skipped and do not consume a position.
pub fn derive_field_positions(signature: &str) -> Vec<usize> {
    let (Some(open), Some(close)) = (signature.find('('), signature.find(')')) else {
        return Vec::new();
    };
    if open >= close {
        return Vec::new();
    }

    let mut positions = Vec::new();
    let mut position = 0;
    for raw in signature[open + 1..close].split(',') {
        let param = raw.trim();
        if param.is_empty() || param == "..." {
            continue;
        }
        let param = match param.find('=') {
            Some(eq) => param[..eq].trim(),
            None => param,
        };
        if is_field_param(param) {
            positions.push(position);
        }
        position += 1;
    }
    positions
}

fn is_field_param(param: &str) -> bool {
    match param {
        "x" | "y" | "z" | "alpha" | "input" => true,
        _ => param.strip_prefix("input").is_some_and(|suffix| {
            let digits = suffix.strip_prefix(' ').unwrap_or(suffix).trim();
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }),
    }
}

/// Per-operator rules for one extraction session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: HashMap<String, ParamRule>,
}

impl RuleTable {
    /// Derives a rule for every operator not covered by `overrides`, then adds
    /// all overrides verbatim.
    pub fn build<'a>(
        operators: impl IntoIterator<Item = &'a Operator>,
        overrides: &BTreeMap<String, ParamRule>,
    ) -> Self {
        let mut rules = HashMap::new();
        let mut without_fields = 0usize;
        for op in operators {
            if overrides.contains_key(&op.name) {
                continue;
            }
            let rule = ParamRule::from_signature(&op.definition);
            if rule.is_empty() {
                without_fields += 1;
            }
            rules.insert(op.name.clone(), rule);
        }
        let derived = rules.len();
        for (name, rule) in overrides {
            rules.insert(name.clone(), rule.clone());
        }
        debug!(
            derived,
            without_fields,
            overrides = overrides.len(),
            "built operator rule table"
        );
        Self { rules }
    }

    pub fn insert(&mut self, name: impl Into<String>, rule: ParamRule) {
        self.rules.insert(name.into(), rule);
    }

    pub fn get(&self, name: &str) -> Option<&ParamRule> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<(String, ParamRule)> for RuleTable {
    fn from_iter<T: IntoIterator<Item = (String, ParamRule)>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_single_letter_and_named_field_params() {
        assert_eq!(derive_field_positions("ts_rank(x, d, constant = 0)"), vec![0]);
        assert_eq!(derive_field_positions("ts_corr(x, y, d)"), vec![0, 1]);
        assert_eq!(derive_field_positions("if_else(input1, input2, input 3)"), vec![0, 1, 2]);
        assert_eq!(derive_field_positions("trade_when(x, alpha, z)"), vec![0, 1, 2]);
        assert_eq!(derive_field_positions("vec_sum(input)"), vec![0]);
    }

    #[test]
    fn default_values_are_dropped_before_classification() {
        assert_eq!(derive_field_positions("winsorize(x, std=4)"), vec![0]);
        assert_eq!(derive_field_positions("f(d = 5, x = close)"), vec![1]);
    }

    #[test]
    fn skipped_params_do_not_consume_positions() {
        assert_eq!(derive_field_positions("add(x, , ..., y)"), vec![0, 1]);
    }

    #[test]
    fn scalar_like_names_are_not_fields() {
        assert!(derive_field_positions("ts_delay(d, n, lookback)").is_empty());
        assert!(derive_field_positions("f(inputs, input_x, inputa, xx)").is_empty());
        assert!(derive_field_positions("f(input 2a)").is_empty());
    }

    #[test]
    fn missing_or_misordered_parens_yield_empty_rule() {
        assert!(derive_field_positions("x + y").is_empty());
        assert!(derive_field_positions("broken(x, y").is_empty());
        assert!(derive_field_positions(") reversed (x").is_empty());
        assert!(derive_field_positions("x < y ? x : y").is_empty());
    }

    #[test]
    fn first_close_paren_terminates_param_list() {
        assert_eq!(derive_field_positions("group_op(x, f(g), y)"), vec![0]);
    }

    #[test]
    fn overrides_skip_derivation() {
        let operators = vec![
            Operator::new("multiply", "x * y"),
            Operator::new("ts_mean", "ts_mean(x, d)"),
            Operator::new("days_from_last_change", "days_from_last_change(d)"),
        ];
        let table = RuleTable::build(&operators, &builtin_overrides());
        assert_eq!(table.get("multiply"), Some(&ParamRule::leading(7)));
        assert_eq!(table.get("ts_mean"), Some(&ParamRule::new(vec![0])));
        assert!(table.get("days_from_last_change").is_some_and(ParamRule::is_empty));
        // overrides for operators absent from the catalog still apply
        assert_eq!(table.get("greater_equal"), Some(&ParamRule::leading(2)));
        assert!(table.get("max").is_some_and(|rule| rule.ignore_named));
    }
}
