use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One operator of the platform's formula language, as listed by the
/// platform's operator endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub scope: Vec<String>,
    /// Parameter signature as authored, e.g. `ts_rank(x, d, constant = 0)`.
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Operator {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: String::new(),
            scope: Vec::new(),
            definition: definition.into(),
            description: String::new(),
            documentation: None,
        }
    }
}

/// Immutable operator listing keyed by name.
#[derive(Debug, Clone, Default)]
pub struct OperatorCatalog {
    operators: Vec<Operator>,
    by_name: HashMap<String, usize>,
}

impl OperatorCatalog {
    pub fn new(operators: Vec<Operator>) -> Result<Self, CatalogError> {
        let mut by_name = HashMap::with_capacity(operators.len());
        for (idx, op) in operators.iter().enumerate() {
            if op.name.trim().is_empty() {
                return Err(CatalogError::EmptyOperatorName { index: idx });
            }
            if by_name.insert(op.name.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateOperator {
                    name: op.name.clone(),
                });
            }
        }
        Ok(Self { operators, by_name })
    }

    /// Parses the JSON array returned by the operator endpoint.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let operators: Vec<Operator> = serde_json::from_str(raw)?;
        Self::new(operators)
    }

    pub fn get(&self, name: &str) -> Option<&Operator> {
        self.by_name.get(name).map(|idx| &self.operators[*idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn names(&self) -> HashSet<String> {
        self.by_name.keys().cloned().collect()
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}
