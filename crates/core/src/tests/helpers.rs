// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rollcall_domain::{CalendarDate, HolidayFact};
use rollcall_persistence::{LocalBackend, PersistenceError, RecordKey, RecordStore, StorageBackend};
use serde_json::Value;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::catalog::HolidaySource;
use crate::clock::Clock;
use crate::directory::CountryDirectory;
use crate::oracle::{HolidayOracle, OracleError};
use crate::roster::Roster;

pub fn date(s: &str) -> CalendarDate {
    s.parse().expect("valid test date")
}

fn facts(rows: &[(&str, &str)]) -> Vec<HolidayFact> {
    rows.iter()
        .map(|(day, name)| HolidayFact::new(date(day), name))
        .collect()
}

/// Oracle answering from fixed tables. Unknown lookups return no facts.
#[derive(Default)]
pub struct StaticOracle {
    national: BTreeMap<(String, i32), Vec<HolidayFact>>,
    regional: BTreeMap<(String, String, i32), Vec<HolidayFact>>,
    failing: BTreeSet<String>,
    calls: AtomicUsize,
}

impl StaticOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_national(mut self, code: &str, rows: &[(&str, &str)]) -> Self {
        for fact in facts(rows) {
            self.national
                .entry((code.to_string(), fact.date.year()))
                .or_default()
                .push(fact);
        }
        self
    }

    pub fn with_regional(mut self, code: &str, subdivision: &str, rows: &[(&str, &str)]) -> Self {
        for fact in facts(rows) {
            self.regional
                .entry((code.to_string(), subdivision.to_string(), fact.date.year()))
                .or_default()
                .push(fact);
        }
        self
    }

    pub fn failing_for(mut self, code: &str) -> Self {
        self.failing.insert(code.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, code: &str) -> Result<(), OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(code) {
            return Err(OracleError::Api {
                status: 503,
                message: String::from("unavailable"),
            });
        }
        Ok(())
    }
}

impl HolidayOracle for StaticOracle {
    fn national(&self, country_code: &str, year: i32) -> Result<Vec<HolidayFact>, OracleError> {
        self.check(country_code)?;
        Ok(self
            .national
            .get(&(country_code.to_string(), year))
            .cloned()
            .unwrap_or_default())
    }

    fn regional(
        &self,
        country_code: &str,
        subdivision: &str,
        year: i32,
    ) -> Result<Vec<HolidayFact>, OracleError> {
        self.check(country_code)?;
        Ok(self
            .regional
            .get(&(country_code.to_string(), subdivision.to_string(), year))
            .cloned()
            .unwrap_or_default())
    }
}

/// Clock starting at 2025-06-15 09:00 UTC that advances one second per reading.
pub struct FixedClock {
    start: OffsetDateTime,
    ticks: AtomicI64,
}

impl FixedClock {
    pub fn new() -> Self {
        Self::starting_at(datetime!(2025-06-15 09:00:00 UTC))
    }

    pub fn starting_at(start: OffsetDateTime) -> Self {
        Self {
            start,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.start + Duration::seconds(self.ticks.fetch_add(1, Ordering::SeqCst))
    }

    fn today(&self) -> CalendarDate {
        CalendarDate::new(self.start.date())
    }
}

/// Oracle with US, Australian, and Californian holidays for 2025 and 2026.
pub fn us_au_oracle() -> StaticOracle {
    StaticOracle::new()
        .with_national(
            "US",
            &[
                ("2025-01-01", "New Year's Day"),
                ("2025-07-04", "Independence Day"),
                ("2025-12-25", "Christmas Day"),
                ("2026-01-01", "New Year's Day"),
                ("2026-07-03", "Independence Day"),
            ],
        )
        .with_regional(
            "US",
            "CA",
            &[
                ("2025-03-31", "Cesar Chavez Day"),
                ("2025-07-04", "California Independence Observance"),
                ("2026-03-31", "Cesar Chavez Day"),
            ],
        )
        .with_national(
            "AU",
            &[("2025-01-26", "Australia Day"), ("2025-04-25", "Anzac Day")],
        )
        .with_regional("AU", "NSW", &[("2025-10-06", "Labour Day")])
}

pub fn create_test_source(oracle: StaticOracle) -> (Arc<StaticOracle>, HolidaySource) {
    let oracle: Arc<StaticOracle> = Arc::new(oracle);
    let source: HolidaySource = HolidaySource::new(oracle.clone(), CountryDirectory::builtin());
    (oracle, source)
}

/// A roster over a temporary directory.
pub fn create_test_roster(oracle: StaticOracle) -> (tempfile::TempDir, Roster) {
    let dir: tempfile::TempDir = tempfile::tempdir().expect("temp dir");
    let backend: LocalBackend = LocalBackend::new(dir.path()).expect("local backend");
    let roster: Roster = create_roster_over(Arc::new(backend), oracle);
    (dir, roster)
}

pub fn create_roster_over(backend: Arc<dyn StorageBackend>, oracle: StaticOracle) -> Roster {
    let (_, source) = create_test_source(oracle);
    Roster::new(RecordStore::new(backend), source, Arc::new(FixedClock::new()))
}

/// In-memory backend whose writes can be switched off.
#[derive(Default)]
pub struct SwitchableBackend {
    documents: Mutex<BTreeMap<&'static str, Value>>,
    read_only: AtomicBool,
}

impl SwitchableBackend {
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

impl StorageBackend for SwitchableBackend {
    fn load(&self, key: RecordKey, default: Value) -> Value {
        self.documents
            .lock()
            .unwrap()
            .get(key.as_str())
            .cloned()
            .unwrap_or(default)
    }

    fn save(&self, key: RecordKey, document: &Value) -> Result<(), PersistenceError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(PersistenceError::Status {
                status: 403,
                message: String::from("read only"),
            });
        }
        self.documents
            .lock()
            .unwrap()
            .insert(key.as_str(), document.clone());
        Ok(())
    }

    fn exists(&self, key: RecordKey) -> bool {
        self.documents.lock().unwrap().contains_key(key.as_str())
    }

    fn list(&self) -> Vec<RecordKey> {
        let mut keys: Vec<RecordKey> = RecordKey::ALL
            .into_iter()
            .filter(|key| self.exists(*key))
            .collect();
        keys.sort_by_key(|key| key.as_str());
        keys
    }
}
