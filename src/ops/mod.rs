//! Operator layer: the fetched operator catalog and the per-operator rules
//! saying which argument positions may carry data fields.
//!
//! Operators whose authored signature does not follow the `x`/`input`/`alpha`
//! naming convention get a hand-written entry in `builtin_overrides()` (or in
//! the `[overrides]` table of the config file).

pub mod arg_spec;
pub mod catalog;

pub use arg_spec::{builtin_overrides, derive_field_positions, ParamRule, RuleTable};
pub use catalog::{Operator, OperatorCatalog};
