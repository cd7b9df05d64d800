// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The roster service.
//!
//! [`Roster`] is the single entry point for every read and write. It owns
//! the record store, the holiday source, and the clock, and is constructed
//! once per process. Every mutation goes through a record-level lock in the
//! store and appends one history entry when it changes something.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rollcall_audit::{HistoryEntry, OperationType, SYSTEM_ACTOR, UNKNOWN_MEMBER, list_recent};
use rollcall_domain::{
    Availability, CalendarDate, DayAvailability, DomainError, HolidayCalendar, HolidayFact, HolidayListing,
    Member, MemberDirectory, MemberId, OooEntry, OooLedger, resolve, resolve_month,
    validate_holiday_name, validate_member_fields, validate_ooo_entry,
};
use rollcall_persistence::RecordStore;
use serde::Serialize;
use tracing::info;

use crate::catalog::{GenerationReport, HolidaySource};
use crate::clock::Clock;
use crate::directory::CountryDirectory;
use crate::error::CoreError;
use crate::history;

/// Distinct locations used by the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberLocations {
    /// Sorted distinct countries.
    pub countries: Vec<String>,
    /// Sorted `Region (Country)` labels.
    pub regions: Vec<String>,
}

/// The out-of-office interval covering a member's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OooDetails {
    /// The covering interval.
    pub entry: OooEntry,
    /// The member's name.
    pub member_name: String,
    /// Interval length in days, both ends included.
    pub duration_days: i64,
}

/// One member's verdict on one day, with their name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberAvailability {
    /// The member's name.
    pub name: String,
    /// Whether the member is reachable.
    pub available: bool,
    /// Why not, when unavailable.
    pub reason: Option<String>,
}

/// Every member's verdict on every day of a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthAvailability {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1 to 12.
    pub month: u8,
    /// The roster the verdicts were computed for.
    pub members: MemberDirectory,
    /// Verdicts per day.
    pub days: BTreeMap<CalendarDate, DayAvailability>,
}

/// The roster service.
pub struct Roster {
    store: RecordStore,
    holidays: HolidaySource,
    clock: Arc<dyn Clock>,
}

impl Roster {
    /// Creates a roster.
    ///
    /// # Arguments
    ///
    /// * `store` - Record store over the configured backend
    /// * `holidays` - Oracle and directory used to fill the holiday catalog
    /// * `clock` - Source of "today" and history timestamps
    #[must_use]
    pub fn new(store: RecordStore, holidays: HolidaySource, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            holidays,
            clock,
        }
    }

    /// The underlying record store.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The country directory.
    #[must_use]
    pub const fn directory(&self) -> &CountryDirectory {
        self.holidays.directory()
    }

    /// Today according to the roster's clock.
    #[must_use]
    pub fn today(&self) -> CalendarDate {
        self.clock.today()
    }

    /// All members by id.
    #[must_use]
    pub fn members(&self) -> MemberDirectory {
        self.store.members()
    }

    /// Distinct countries and regions in use.
    #[must_use]
    pub fn member_locations(&self) -> MemberLocations {
        let members: MemberDirectory = self.store.members();

        let countries: BTreeSet<String> = members
            .values()
            .filter(|m| !m.country.is_empty())
            .map(|m| m.country.clone())
            .collect();
        let regions: BTreeSet<String> = members
            .values()
            .filter(|m| !m.country.is_empty())
            .filter_map(|m| m.region().map(|r| format!("{r} ({})", m.country)))
            .collect();

        MemberLocations {
            countries: countries.into_iter().collect(),
            regions: regions.into_iter().collect(),
        }
    }

    /// Region names offered for a country.
    #[must_use]
    pub fn regions_for(&self, country: &str) -> Vec<String> {
        self.directory().regions(country)
    }

    /// Adds a member and populates holidays for their location.
    ///
    /// The id is the current member count plus one. Holidays are fetched
    /// for the current year.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or country is empty, or a record
    /// cannot be saved.
    pub fn add_member(
        &self,
        name: &str,
        country: &str,
        region: Option<&str>,
    ) -> Result<(MemberId, Member), CoreError> {
        let member: Member = Member::new(name, country, region);
        validate_member_fields(&member)?;

        let member_id: MemberId = self.store.update_members(|members: &mut MemberDirectory| {
            let id: MemberId = MemberId::next_for_count(members.len());
            members.insert(id.clone(), member.clone());
            Ok::<MemberId, CoreError>(id)
        })?;
        info!(member_id = %member_id.value(), name = %member.name, "Added member");

        let year: i32 = self.clock.today().year();
        let written: usize = self.store.update_holidays(|calendar: &mut HolidayCalendar| {
            Ok::<usize, CoreError>(self.holidays.populate(
                calendar,
                &member.country,
                member.region(),
                year,
            ))
        })?;
        info!(member_id = %member_id.value(), written, year, "Populated holidays for new member");

        let details: String = format!(
            "Added member: {} from {}, {}",
            member.name,
            member.country,
            member.region().unwrap_or_default()
        );
        history::append(
            &self.store,
            self.clock.as_ref(),
            OperationType::AddMember,
            Some(&member_id),
            details,
            Some(&member.name),
        )?;

        Ok((member_id, member))
    }

    /// The holiday catalog.
    #[must_use]
    pub fn holidays(&self) -> HolidayCalendar {
        self.store.holidays()
    }

    /// Adds a holiday by hand.
    ///
    /// With a region the fact goes into the regional bucket, otherwise the
    /// national one. No shadowing check is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or country is empty, or a record
    /// cannot be saved.
    pub fn add_holiday(
        &self,
        name: &str,
        date: CalendarDate,
        country: &str,
        region: Option<&str>,
    ) -> Result<(), CoreError> {
        validate_holiday_name(name)?;
        let name: &str = name.trim();
        let country: &str = country.trim();
        if country.is_empty() {
            return Err(CoreError::Domain(DomainError::InvalidCountry(String::from(
                "Country cannot be empty",
            ))));
        }
        let region: Option<&str> = region.map(str::trim).filter(|r| !r.is_empty());

        self.store.update_holidays(|calendar: &mut HolidayCalendar| {
            let fact: HolidayFact = HolidayFact::new(date, name);
            match region {
                Some(region) => calendar.insert_regional(country, region, fact),
                None => calendar.insert_national(country, fact),
            }
            Ok::<(), CoreError>(())
        })?;

        let location: String =
            region.map_or_else(|| country.to_string(), |r| format!("{country}, {r}"));
        info!(name = %name, date = %date, location = %location, "Added holiday");

        history::append(
            &self.store,
            self.clock.as_ref(),
            OperationType::AddHoliday,
            None,
            format!("Added holiday: {name} on {date} for {location}"),
            Some(SYSTEM_ACTOR),
        )
    }

    /// Rebuilds the holiday catalog for this year and next from the roster.
    ///
    /// Manually added holidays are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no members, no member has a country,
    /// or a record cannot be saved.
    pub fn generate_holidays(&self) -> Result<GenerationReport, CoreError> {
        let current_year: i32 = self.clock.today().year();
        let years: [i32; 2] = [current_year, current_year + 1];
        let members: MemberDirectory = self.store.members();

        let report: GenerationReport = self
            .store
            .update_holidays(|calendar: &mut HolidayCalendar| {
                self.holidays.regenerate(calendar, &members, &years)
            })?;

        history::append(
            &self.store,
            self.clock.as_ref(),
            OperationType::GenerateHolidays,
            None,
            report.summary(),
            Some(SYSTEM_ACTOR),
        )?;
        Ok(report)
    }

    /// Flattened holiday listing sorted by year, scope, country, then date.
    #[must_use]
    pub fn sorted_holidays(&self) -> Vec<HolidayListing> {
        self.store.holidays().sorted_listing()
    }

    /// The out-of-office ledger.
    #[must_use]
    pub fn ooo(&self) -> OooLedger {
        self.store.ooo()
    }

    /// Records an out-of-office interval for a member.
    ///
    /// A missing or blank reason becomes `Vacation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the member does not exist, the interval ends
    /// before it starts, or a record cannot be saved.
    pub fn add_ooo(
        &self,
        member_id: &MemberId,
        start: CalendarDate,
        end: CalendarDate,
        reason: Option<&str>,
    ) -> Result<OooEntry, CoreError> {
        let member_name: String = self.member_name(member_id)?;
        let entry: OooEntry = OooEntry::new(start, end, reason);

        self.store.update_ooo(|ledger: &mut OooLedger| {
            validate_ooo_entry(ledger.entries_for(member_id), &entry)?;
            ledger.add(member_id, entry.clone());
            Ok::<(), CoreError>(())
        })?;

        let details: String = if entry.is_single_day() {
            format!("Added OOO ({}) for {}", entry.reason, entry.start_date)
        } else {
            format!(
                "Added OOO ({}) from {} to {}",
                entry.reason, entry.start_date, entry.end_date
            )
        };
        info!(member_id = %member_id.value(), start = %start, end = %end, "Added OOO");

        history::append(
            &self.store,
            self.clock.as_ref(),
            OperationType::AddOoo,
            Some(member_id),
            details,
            Some(&member_name),
        )?;
        Ok(entry)
    }

    /// Removes the first interval covering `date`.
    ///
    /// Returns the removed interval, or `None` if nothing covered the day.
    /// History is written only when something was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be saved.
    pub fn delete_ooo(
        &self,
        member_id: &MemberId,
        date: CalendarDate,
    ) -> Result<Option<OooEntry>, CoreError> {
        let removed: Option<OooEntry> = self.store.update_ooo(|ledger: &mut OooLedger| {
            Ok::<Option<OooEntry>, CoreError>(ledger.remove_by_date(member_id, &date))
        })?;

        if let Some(entry) = &removed {
            info!(member_id = %member_id.value(), date = %date, "Deleted OOO");
            history::append(
                &self.store,
                self.clock.as_ref(),
                OperationType::DeleteOoo,
                Some(member_id),
                format!("Deleted OOO entry for {date} (was {})", entry.reason),
                None,
            )?;
        }
        Ok(removed)
    }

    /// Removes the first interval whose endpoints are exactly `start` and `end`.
    ///
    /// Returns the removed interval, or `None` if no interval matched.
    /// History is written only when something was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be saved.
    pub fn cancel_vacation(
        &self,
        member_id: &MemberId,
        start: CalendarDate,
        end: CalendarDate,
    ) -> Result<Option<OooEntry>, CoreError> {
        let removed: Option<OooEntry> = self.store.update_ooo(|ledger: &mut OooLedger| {
            Ok::<Option<OooEntry>, CoreError>(ledger.cancel_by_range(member_id, &start, &end))
        })?;

        if let Some(entry) = &removed {
            let details: String = if start == end {
                format!("Canceled vacation ({}) for {start}", entry.reason)
            } else {
                format!("Canceled vacation ({}) from {start} to {end}", entry.reason)
            };
            info!(member_id = %member_id.value(), start = %start, end = %end, "Canceled vacation");
            history::append(
                &self.store,
                self.clock.as_ref(),
                OperationType::CancelVacation,
                Some(member_id),
                details,
                None,
            )?;
        }
        Ok(removed)
    }

    /// The interval covering a member's day, with its length.
    #[must_use]
    pub fn ooo_details(&self, member_id: &MemberId, date: CalendarDate) -> Option<OooDetails> {
        let ledger: OooLedger = self.store.ooo();
        let entry: OooEntry = ledger.covering_entry(member_id, &date)?.clone();
        let member_name: String = self
            .store
            .members()
            .get(member_id)
            .map_or_else(|| UNKNOWN_MEMBER.to_string(), |m| m.name.clone());

        Some(OooDetails {
            duration_days: entry.duration_days(),
            entry,
            member_name,
        })
    }

    /// Resolves one member on one day.
    ///
    /// # Errors
    ///
    /// Returns an error if the member does not exist.
    pub fn resolve(&self, member_id: &MemberId, date: CalendarDate) -> Result<Availability, CoreError> {
        let members: MemberDirectory = self.store.members();
        let member: &Member = members
            .get(member_id)
            .ok_or_else(|| CoreError::MemberNotFound(member_id.value().to_string()))?;

        Ok(resolve(
            member_id,
            member,
            &date,
            &self.store.holidays(),
            &self.store.ooo(),
        ))
    }

    /// Every member's verdict on one day.
    #[must_use]
    pub fn availability_on(&self, date: CalendarDate) -> BTreeMap<MemberId, MemberAvailability> {
        let members: MemberDirectory = self.store.members();
        let holidays: HolidayCalendar = self.store.holidays();
        let ooo: OooLedger = self.store.ooo();

        members
            .iter()
            .map(|(id, member)| {
                let verdict: Availability = resolve(id, member, &date, &holidays, &ooo);
                let row: MemberAvailability = MemberAvailability {
                    name: member.name.clone(),
                    available: verdict.available,
                    reason: verdict.reason,
                };
                (id.clone(), row)
            })
            .collect()
    }

    /// Every member's verdict on every day of a month.
    ///
    /// # Errors
    ///
    /// Returns an error if `month` is not between 1 and 12.
    pub fn month_availability(&self, year: i32, month: u8) -> Result<MonthAvailability, CoreError> {
        let members: MemberDirectory = self.store.members();
        let days: BTreeMap<CalendarDate, DayAvailability> = resolve_month(
            year,
            month,
            &members,
            &self.store.holidays(),
            &self.store.ooo(),
        )?;

        Ok(MonthAvailability {
            year,
            month,
            members,
            days,
        })
    }

    /// The history log, newest first.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        list_recent(&self.store.history())
    }

    fn member_name(&self, member_id: &MemberId) -> Result<String, CoreError> {
        self.store
            .members()
            .get(member_id)
            .map(|m| m.name.clone())
            .ok_or_else(|| CoreError::MemberNotFound(member_id.value().to_string()))
    }
}

impl std::fmt::Debug for Roster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Roster")
            .field("holidays", &self.holidays)
            .finish_non_exhaustive()
    }
}
