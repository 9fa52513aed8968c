//! City catalog lookups
//!
//! The catalog maps normalized city names to the city codes the flight
//! inspiration search expects. It is loaded from a JSON object such as
//! `{"london": "LON", "paris": "PAR"}` and never modified here.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::matcher::suggest;
use crate::InspoError;

/// Outcome of resolving a typed city name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CityLookup {
    /// The name is in the catalog
    Found { name: String, code: String },
    /// Not in the catalog, but these names are close
    Suggestions { query: String, candidates: Vec<String> },
    NotFound { query: String },
}

/// Read-only mapping from city name to city code
#[derive(Debug, Clone, Default)]
pub struct CityCatalog {
    codes: BTreeMap<String, String>,
}

/// Catalog keys are compared trimmed and lower-cased
pub fn normalize_city_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl CityCatalog {
    /// Build a catalog from name/code pairs.
    ///
    /// Names that normalize to the same key collapse into one entry; the
    /// last pair wins.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut codes = BTreeMap::new();
        for (name, code) in entries {
            let name = normalize_city_name(name.as_ref());
            let code = code.into();
            if let Some(previous) = codes.insert(name.clone(), code.clone()) {
                debug!(city = %name, previous = %previous, code = %code, "Duplicate catalog entry replaced");
            }
        }

        Self { codes }
    }

    pub fn from_json_str(json: &str) -> Result<Self, InspoError> {
        let entries: BTreeMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, InspoError> {
        let entries: BTreeMap<String, String> = serde_json::from_reader(reader)?;
        Ok(Self::new(entries))
    }

    /// Load a catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InspoError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(std::io::BufReader::new(file))?;

        info!(path = %path.display(), cities = catalog.len(), "Loaded city catalog");
        Ok(catalog)
    }

    /// Exact lookup of a city code
    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.codes.get(&normalize_city_name(name)).map(String::as_str)
    }

    /// Known city names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.codes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Resolve a typed city name: exact hit first, then close spellings.
    pub fn resolve(&self, name: &str, threshold: f64) -> CityLookup {
        let query = normalize_city_name(name);
        if query.is_empty() {
            return CityLookup::NotFound { query };
        }

        if let Some(code) = self.codes.get(&query) {
            debug!(city = %query, code = %code, "City found in catalog");
            return CityLookup::Found {
                name: query,
                code: code.clone(),
            };
        }

        let candidates = suggest(&query, self.names(), threshold);
        if candidates.is_empty() {
            debug!(city = %query, "No close match in catalog");
            CityLookup::NotFound { query }
        } else {
            CityLookup::Suggestions { query, candidates }
        }
    }
}
