use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Deduplicated data-field names referenced by one expression.
pub type FieldSet = BTreeSet<String>;

/// Expression body of a submitted alpha.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphaCode {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The subset of the platform's alpha record this crate reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphaRecord {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub regular: Option<AlphaCode>,
}

impl AlphaRecord {
    pub fn regular(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: Some("REGULAR".to_string()),
            regular: Some(AlphaCode {
                code: code.into(),
                description: None,
            }),
        }
    }

    /// Records without a `type` (bare listings) count as regular.
    pub fn is_regular(&self) -> bool {
        match self.kind.as_deref() {
            Some(kind) => kind.eq_ignore_ascii_case("REGULAR"),
            None => true,
        }
    }

    /// Regular expression code, if the record carries one.
    pub fn code(&self) -> Option<&str> {
        self.regular.as_ref().map(|regular| regular.code.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AlphaListing {
    Page { results: Vec<AlphaRecord> },
    Bare(Vec<AlphaRecord>),
}

/// Parses an alpha listing: either one page of the listing endpoint
/// (`{"count", "next", "previous", "results"}`) or a bare JSON array.
pub fn parse_alpha_listing(raw: &str) -> Result<Vec<AlphaRecord>, CatalogError> {
    let listing: AlphaListing = serde_json::from_str(raw)?;
    Ok(match listing {
        AlphaListing::Page { results } => results,
        AlphaListing::Bare(records) => records,
    })
}

/// What the user asked the field checker about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInput {
    /// An alpha id, given directly as a platform URL.
    AlphaId(String),
    Expression(String),
}

impl CheckInput {
    /// Treats `input` as an alpha reference when it contains `platform_addr`:
    /// the id is the last non-empty path segment after the address, with any
    /// query string dropped. Anything else is an expression.
    pub fn classify(platform_addr: &str, input: &str) -> Self {
        let input = input.trim();
        if platform_addr.is_empty() {
            return Self::Expression(input.to_string());
        }
        let Some(prefix_at) = input.find(platform_addr) else {
            return Self::Expression(input.to_string());
        };
        let after = &input[prefix_at + platform_addr.len()..];
        let path = after.split_once('?').map_or(after, |(path, _)| path);
        let id = path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(input);
        Self::AlphaId(id.to_string())
    }
}
