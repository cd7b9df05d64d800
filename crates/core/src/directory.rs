// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Country and region reference data.
//!
//! Members record their country by display name ("United States") and
//! their region by name ("California"). The holiday data source wants ISO
//! codes, so this directory translates between the two.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const BUILTIN_COUNTRIES: &str = include_str!("../assets/countries.json");

/// One supported country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEntry {
    /// Display name.
    pub name: String,
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    /// Region display name to subdivision code.
    #[serde(default)]
    pub regions: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    countries: BTreeMap<String, CountryEntry>,
}

/// Lookup table from country and region names to codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryDirectory {
    countries: BTreeMap<String, CountryEntry>,
}

impl CountryDirectory {
    /// Parses a directory document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON of the expected shape.
    pub fn from_json(document: &str) -> Result<Self, serde_json::Error> {
        let file: DirectoryFile = serde_json::from_str(document)?;
        Ok(Self {
            countries: file.countries,
        })
    }

    /// The directory shipped with the crate.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_COUNTRIES).unwrap_or_default()
    }

    /// Loads a directory file, falling back to [`CountryDirectory::builtin`]
    /// when the file is missing or invalid.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let document: String = match std::fs::read_to_string(path) {
            Ok(document) => document,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Countries config unreadable, using built-in directory");
                return Self::builtin();
            }
        };
        match Self::from_json(&document) {
            Ok(directory) => {
                info!(path = %path.display(), countries = directory.countries.len(), "Loaded countries config");
                directory
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Countries config invalid, using built-in directory");
                Self::builtin()
            }
        }
    }

    /// Finds a country by display name or code, ignoring case.
    #[must_use]
    pub fn find(&self, country: &str) -> Option<&CountryEntry> {
        let wanted: &str = country.trim();
        self.countries.values().find(|entry| {
            entry.name.eq_ignore_ascii_case(wanted) || entry.code.eq_ignore_ascii_case(wanted)
        })
    }

    /// The ISO code for a country name or code.
    #[must_use]
    pub fn country_code(&self, country: &str) -> Option<&str> {
        self.find(country).map(|entry| entry.code.as_str())
    }

    /// The subdivision code for a region, or the region itself when unknown.
    #[must_use]
    pub fn subdivision_code(&self, country: &str, region: &str) -> String {
        let wanted: &str = region.trim();
        self.find(country)
            .and_then(|entry| {
                entry
                    .regions
                    .iter()
                    .find(|(name, code)| {
                        name.eq_ignore_ascii_case(wanted) || code.eq_ignore_ascii_case(wanted)
                    })
                    .map(|(_, code)| code.clone())
            })
            .unwrap_or_else(|| wanted.to_string())
    }

    /// Sorted region names for a country; empty when it has none.
    #[must_use]
    pub fn regions(&self, country: &str) -> Vec<String> {
        self.find(country)
            .map(|entry| entry.regions.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Every country, sorted by display name.
    #[must_use]
    pub fn countries(&self) -> Vec<&CountryEntry> {
        let mut entries: Vec<&CountryEntry> = self.countries.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}
