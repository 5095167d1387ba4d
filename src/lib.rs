pub mod assign;
pub mod check;
pub mod clean;
pub mod config;
pub mod error;
pub mod extract;
pub mod index;
pub mod lexer;
pub mod ops;
pub mod types;

pub use check::{check, lookup, resolve_check_input, CheckReport, LookupReport};
pub use config::EngineConfig;
pub use error::{CatalogError, ConfigError};
pub use extract::{extract, extract_fields, ExtractionContext, DEFAULT_MAX_DEPTH};
pub use index::FieldIndex;
pub use ops::{Operator, OperatorCatalog, ParamRule, RuleTable};
pub use types::{parse_alpha_listing, AlphaCode, AlphaRecord, CheckInput, FieldSet};

#[cfg(test)]
mod tests;
