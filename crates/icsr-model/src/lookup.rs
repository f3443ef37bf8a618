//! Lookup collaborators for code sets and MedDRA terms.
//!
//! The mapping engine only needs "read by code"; real terminology services
//! live outside this workspace and plug in through these traits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::CodeList;

/// A resolved term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub code: String,
    pub name: String,
}

pub trait CodeSetLookup {
    /// Resolve `code` in the named code set. `language` selects a
    /// translation when the implementation carries more than one.
    fn read(&self, set_name: &str, code: &str, language: Option<&str>) -> Option<Term>;

    /// Names of the code sets this lookup can answer for.
    fn set_names(&self) -> Vec<String>;
}

pub trait MeddraLookup {
    fn read(&self, code: i64, version: &str) -> Option<Term>;
}

/// Code sets compiled into the model (English labels only).
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCodeSets;

impl CodeSetLookup for BuiltinCodeSets {
    fn read(&self, set_name: &str, code: &str, language: Option<&str>) -> Option<Term> {
        if language.is_some_and(|lang| !lang.eq_ignore_ascii_case("en")) {
            return None;
        }
        let list = CodeList::from_name(set_name).ok()?;
        let code: i64 = code.trim().parse().ok()?;
        list.label_of(code).map(|label| Term {
            code: code.to_string(),
            name: label.to_string(),
        })
    }

    fn set_names(&self) -> Vec<String> {
        CodeList::ALL
            .iter()
            .map(|list| list.name().to_string())
            .collect()
    }
}

/// MedDRA terms keyed by version and code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMeddra {
    terms: BTreeMap<(String, i64), String>,
}

impl InMemoryMeddra {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: impl Into<String>, code: i64, name: impl Into<String>) {
        self.terms.insert((version.into(), code), name.into());
    }

    pub fn with_term(mut self, version: impl Into<String>, code: i64, name: impl Into<String>) -> Self {
        self.insert(version, code, name);
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl MeddraLookup for InMemoryMeddra {
    fn read(&self, code: i64, version: &str) -> Option<Term> {
        self.terms
            .get(&(version.trim().to_string(), code))
            .map(|name| Term {
                code: code.to_string(),
                name: name.clone(),
            })
    }
}
