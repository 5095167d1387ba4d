use crate::ops::{builtin_overrides, Operator, OperatorCatalog, ParamRule, RuleTable};
use crate::{extract_fields, EngineConfig, ExtractionContext, FieldSet};
use std::collections::HashSet;


fn platform_operators() -> Vec<Operator> {
    vec![
        Operator::new("rank", "rank(x, rate=2)"),
        Operator::new("ts_rank", "ts_rank(x, d, constant = 0)"),
        Operator::new("ts_mean", "ts_mean(x, d)"),
        Operator::new("ts_corr", "ts_corr(x, y, d)"),
        Operator::new("ts_backfill", "ts_backfill(x, lookback = d, k=1)"),
        Operator::new("winsorize", "winsorize(x, std=4)"),
        Operator::new("group_neutralize", "group_neutralize(x, group)"),
        Operator::new("if_else", "if_else(input1, input2, input 3)"),
        Operator::new("trade_when", "trade_when(x, y, z)"),
        Operator::new("bucket", "bucket(rank(x), range=\"0, 1, 0.1\")"),
        Operator::new("multiply", "multiply(x ,y, ... , filter=false), x * y"),
        Operator::new("add", "add(x, y, filter = false), x + y"),
        Operator::new("reverse", "reverse(x)"),
        Operator::new("days_from_last_change", "days_from_last_change(x)"),
    ]
}

/// Session context built the way the CLI builds it: catalog plus built-in
/// overrides and default depth.
fn session_ctx() -> ExtractionContext {
    let catalog = OperatorCatalog::new(platform_operators()).expect("fixture catalog is valid");
    ExtractionContext::from_catalog(&catalog, &EngineConfig::default())
}

/// Context with explicit names and rules only.
fn bare_ctx(names: &[&str], rules: &[(&str, ParamRule)]) -> ExtractionContext {
    let names: HashSet<String> = names.iter().map(|n| n.to_string()).collect();
    let rules: RuleTable = rules
        .iter()
        .map(|(name, rule)| (name.to_string(), rule.clone()))
        .collect();
    ExtractionContext::new(names, rules)
}

fn fields(items: &[&str]) -> FieldSet {
    items.iter().map(|s| s.to_string()).collect()
}

fn check(expr: &str) -> FieldSet {
    extract_fields(expr, &session_ctx())
}

#[test]
fn session_context_merges_catalog_and_overrides() {
    let ctx = session_ctx();
    assert_eq!(ctx.max_depth(), 50);
    assert!(ctx.is_operator("bucket"));
    assert!(!ctx.is_operator("greater_equal"));
    assert_eq!(ctx.rules().get("multiply"), Some(&ParamRule::leading(7)));
    assert_eq!(ctx.rules().get("ts_corr"), Some(&ParamRule::new(vec![0, 1])));
    assert!(ctx.rules().get("bucket").is_some_and(ParamRule::is_empty));
    assert_eq!(
        ctx.rules().len(),
        platform_operators().len() + builtin_overrides().len() - 1
    );
}
