//! Single-alpha checks and reverse lookups, as run by the `alpha-fields` CLI.

use crate::config::EngineConfig;
use crate::extract::{extract_fields, ExtractionContext};
use crate::index::FieldIndex;
use crate::types::{AlphaRecord, CheckInput, FieldSet};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Set when the input named an alpha found in the listing.
    pub alpha_id: Option<String>,
    pub fields: FieldSet,
    /// Alphas sharing a field; only present when a listing was given.
    pub matching_alphas: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupReport {
    pub fields: Vec<String>,
    pub matching_alphas: BTreeSet<String>,
}

/// Turns check input into `(alpha id, expression)`.
///
/// A platform URL or a bare id listed in `alphas` resolves to that alpha's
/// code. A URL whose id is not listed is checked as text.
pub fn resolve_check_input(
    platform_addr: &str,
    input: &str,
    alphas: Option<&[AlphaRecord]>,
) -> (Option<String>, String) {
    match CheckInput::classify(platform_addr, input) {
        CheckInput::AlphaId(id) => match listed_code(alphas, &id) {
            Some(code) => (Some(id), code.to_string()),
            None => {
                warn!(%id, "alpha not found in listing, checking input as an expression");
                (None, input.trim().to_string())
            }
        },
        CheckInput::Expression(expr) => match listed_code(alphas, &expr) {
            Some(code) => (Some(expr), code.to_string()),
            None => (None, expr),
        },
    }
}

fn listed_code<'a>(alphas: Option<&'a [AlphaRecord]>, id: &str) -> Option<&'a str> {
    alphas?
        .iter()
        .find(|alpha| alpha.id == id)
        .and_then(AlphaRecord::code)
}

pub fn check(
    config: &EngineConfig,
    ctx: &ExtractionContext,
    alphas: Option<&[AlphaRecord]>,
    input: &str,
) -> CheckReport {
    let (alpha_id, expression) = resolve_check_input(&config.platform_addr, input, alphas);
    let fields = extract_fields(&expression, ctx);
    let matching_alphas = alphas.map(|list| FieldIndex::from_alphas(list, ctx).lookup(&fields));
    CheckReport {
        alpha_id,
        fields,
        matching_alphas,
    }
}

pub fn lookup(
    ctx: &ExtractionContext,
    alphas: &[AlphaRecord],
    fields: &[String],
) -> LookupReport {
    let matching_alphas = FieldIndex::from_alphas(alphas, ctx).lookup(fields);
    LookupReport {
        fields: fields.to_vec(),
        matching_alphas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ADDR: &str = "https://platform.worldquantbrain.com";

    fn listing() -> Vec<AlphaRecord> {
        vec![
            AlphaRecord::regular("1Y5Nj28K", "rank(ts_corr(close, volume, 10))"),
            AlphaRecord::regular("Ok2Qa9pZ", "ts_mean(open, 5)"),
        ]
    }

    #[test]
    fn bare_listed_id_resolves_to_its_code() {
        let alphas = listing();
        assert_eq!(
            resolve_check_input(ADDR, " 1Y5Nj28K ", Some(alphas.as_slice())),
            (
                Some("1Y5Nj28K".to_string()),
                "rank(ts_corr(close, volume, 10))".to_string()
            )
        );
        assert_eq!(
            resolve_check_input(ADDR, "1Y5Nj28K", None),
            (None, "1Y5Nj28K".to_string())
        );
    }

    #[test]
    fn url_resolves_through_listing_or_falls_back_to_text() {
        let alphas = listing();
        let url = "https://platform.worldquantbrain.com/alpha/Ok2Qa9pZ?tab=pnl";
        assert_eq!(
            resolve_check_input(ADDR, url, Some(alphas.as_slice())),
            (Some("Ok2Qa9pZ".to_string()), "ts_mean(open, 5)".to_string())
        );

        let unknown = "https://platform.worldquantbrain.com/alpha/Zz9Zz9Zz";
        assert_eq!(
            resolve_check_input(ADDR, unknown, Some(alphas.as_slice())),
            (None, unknown.to_string())
        );
    }

    #[test]
    fn expression_passes_through() {
        let alphas = listing();
        assert_eq!(
            resolve_check_input(ADDR, "rank(close)", Some(alphas.as_slice())),
            (None, "rank(close)".to_string())
        );
    }
}
