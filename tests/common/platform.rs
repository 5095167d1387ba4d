use alpha_field_engine::{parse_alpha_listing, AlphaRecord, OperatorCatalog};

/// A slice of the platform's operator listing, including operators whose
/// signatures need override rules.
pub const OPERATORS_JSON: &str = r#"[
    {"name": "rank", "category": "Cross Sectional", "scope": ["REGULAR"],
     "definition": "rank(x, rate=2)", "description": "Ranks the input among all instruments"},
    {"name": "ts_rank", "category": "Time Series", "scope": ["REGULAR"],
     "definition": "ts_rank(x, d, constant = 0)", "description": "Rank of x over the past d days"},
    {"name": "ts_corr", "category": "Time Series", "scope": ["REGULAR"],
     "definition": "ts_corr(x, y, d)", "description": "Correlation of x and y for the past d days"},
    {"name": "ts_delta", "category": "Time Series", "scope": ["REGULAR"],
     "definition": "ts_delta(x, d)", "description": "x - ts_delay(x, d)"},
    {"name": "ts_backfill", "category": "Time Series", "scope": ["REGULAR"],
     "definition": "ts_backfill(x,lookback = d, k=1, ignore=\"NAN\")", "description": "Backfill NaN values"},
    {"name": "group_neutralize", "category": "Group", "scope": ["REGULAR"],
     "definition": "group_neutralize(x, group)", "description": "Neutralize alpha against groups"},
    {"name": "vec_avg", "category": "Vector", "scope": ["REGULAR"],
     "definition": "vec_avg(x)", "description": "Mean of vector field x"},
    {"name": "multiply", "category": "Arithmetic", "scope": ["REGULAR"],
     "definition": "multiply(x ,y, ... , filter=false), x * y", "description": "Multiply all inputs"},
    {"name": "max", "category": "Arithmetic", "scope": ["REGULAR"],
     "definition": "max(x, y, ..)", "description": "Maximum of all inputs"},
    {"name": "greater_equal", "category": "Logical", "scope": ["REGULAR"],
     "definition": "input1 >= input2", "description": "True if input1 >= input2"},
    {"name": "if_else", "category": "Logical", "scope": ["REGULAR"],
     "definition": "if_else(input1, input2, input 3)", "description": "Ternary selection"},
    {"name": "trade_when", "category": "Transformational", "scope": ["REGULAR"],
     "definition": "trade_when(x, y, z)", "description": "Change alpha values only under a condition"},
    {"name": "days_from_last_change", "category": "Time Series", "scope": ["REGULAR"],
     "definition": "days_from_last_change(x)", "description": "Days since x last changed",
     "documentation": "/operators/days_from_last_change"}
]"#;

/// One page of the alpha listing endpoint.
pub const ALPHAS_JSON: &str = r#"{
    "count": 5,
    "next": null,
    "previous": null,
    "results": [
        {"id": "1Y5Nj28K", "type": "REGULAR",
         "regular": {"code": "rank(ts_corr(close, volume, 10))", "description": null, "operatorCount": 2}},
        {"id": "Ok2Qa9pZ", "type": "REGULAR",
         "regular": {"code": "sig = ts_rank(ts_backfill(fnd6_eps, 60), 252);\ngroup_neutralize(sig, subindustry)",
                     "description": "eps momentum", "operatorCount": 3}},
        {"id": "Mx7Tt0rB", "type": "REGULAR",
         "regular": {"code": "multiply(rank(returns), ts_delta(vwap, 5), -1) // reversal", "operatorCount": 3}},
        {"id": "Wq3Lp4sN", "type": "REGULAR",
         "regular": {"code": "trade_when(greater_equal(volume, adv20), -ts_delta(close, 3), -1)", "operatorCount": 3}},
        {"id": "Sup3rAlp", "type": "SUPER", "regular": null}
    ]
}"#;

pub fn catalog() -> OperatorCatalog {
    OperatorCatalog::from_json_str(OPERATORS_JSON).expect("operator fixture should parse")
}

pub fn alphas() -> Vec<AlphaRecord> {
    parse_alpha_listing(ALPHAS_JSON).expect("alpha fixture should parse")
}
