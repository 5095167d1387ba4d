use crate::extract::{extract_fields, ExtractionContext};
use crate::types::{AlphaRecord, FieldSet};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Record id -> fields its expression references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldIndex {
    entries: BTreeMap<String, FieldSet>,
}

impl FieldIndex {
    /// Extracts every record's fields in order. A repeated id keeps the fields
    /// of its last occurrence.
    pub fn build<I, K, E>(records: I, ctx: &ExtractionContext) -> Self
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: AsRef<str>,
    {
        let mut index = Self::default();
        for (id, expr) in records {
            index.insert(id, extract_fields(expr.as_ref(), ctx));
        }
        debug!(entries = index.len(), "built field index");
        index
    }

    /// Same result as [`FieldIndex::build`], with extraction fanned out over
    /// the rayon pool.
    pub fn build_parallel<K, E>(records: &[(K, E)], ctx: &ExtractionContext) -> Self
    where
        K: AsRef<str> + Sync,
        E: AsRef<str> + Sync,
    {
        let extracted: Vec<(String, FieldSet)> = records
            .par_iter()
            .map(|(id, expr)| (id.as_ref().to_string(), extract_fields(expr.as_ref(), ctx)))
            .collect();
        let mut index = Self::default();
        for (id, fields) in extracted {
            index.insert(id, fields);
        }
        debug!(entries = index.len(), "built field index in parallel");
        index
    }

    /// Indexes the code of each regular alpha. Other alpha types and records
    /// without code are skipped.
    pub fn from_alphas(alphas: &[AlphaRecord], ctx: &ExtractionContext) -> Self {
        let records: Vec<(&str, &str)> = alphas
            .iter()
            .filter_map(|alpha| match alpha.code() {
                Some(code) if alpha.is_regular() => Some((alpha.id.as_str(), code)),
                Some(_) => {
                    debug!(id = %alpha.id, kind = ?alpha.kind, "alpha is not regular, skipping");
                    None
                }
                None => {
                    debug!(id = %alpha.id, "alpha has no regular code, skipping");
                    None
                }
            })
            .collect();
        Self::build_parallel(&records, ctx)
    }

    pub fn insert(&mut self, id: impl Into<String>, fields: FieldSet) {
        self.entries.insert(id.into(), fields);
    }

    pub fn get(&self, id: &str) -> Option<&FieldSet> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldSet)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids whose field set shares at least one field with `fields`.
    pub fn lookup<I, S>(&self, fields: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: HashSet<String> = fields
            .into_iter()
            .map(|field| field.as_ref().to_string())
            .collect();
        if wanted.is_empty() {
            return BTreeSet::new();
        }
        self.entries
            .iter()
            .filter(|(_, used)| used.iter().any(|field| wanted.contains(field)))
            .map(|(id, _)| id.clone())
            .collect()
    }
}

impl FromIterator<(String, FieldSet)> for FieldIndex {
    fn from_iter<T: IntoIterator<Item = (String, FieldSet)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
