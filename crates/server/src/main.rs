// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use rollcall::{
    CoreError, CountryDirectory, DEFAULT_HOLIDAY_API, GenerationReport, HolidaySource,
    MemberAvailability, MemberLocations, MonthAvailability, NagerOracle, OooDetails, Roster,
    SystemClock,
};
use rollcall_audit::HistoryEntry;
use rollcall_domain::{
    CalendarDate, DomainError, HolidayCalendar, HolidayListing, Member, MemberDirectory,
    MemberId, OooEntry, OooLedger,
};
use rollcall_persistence::{
    DEFAULT_DATA_DIR, PersistenceError, RecordStore, RemoteConfig, StorageBackend, StorageConfig,
    StorageInfo, StorageKind,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Rollcall Server - JSON API for team availability
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Storage backend: `local` or `remote`
    #[arg(long, env = "STORAGE_TYPE", default_value = "local")]
    storage_type: String,

    /// Directory for the local backend
    #[arg(long, env = "DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Storage account name for the remote backend
    #[arg(long, env = "STORAGE_ACCOUNT_NAME")]
    storage_account: Option<String>,

    /// Container name for the remote backend
    #[arg(long, env = "STORAGE_CONTAINER_NAME")]
    storage_container: Option<String>,

    /// Service URL override for the remote backend
    #[arg(long, env = "STORAGE_ENDPOINT")]
    storage_endpoint: Option<String>,

    /// Shared access signature for the remote backend
    #[arg(long, env = "STORAGE_SAS_TOKEN", hide_env_values = true)]
    storage_sas_token: Option<String>,

    /// Countries and regions JSON file. The built-in directory is used if absent.
    #[arg(long, env = "COUNTRIES_CONFIG")]
    countries: Option<PathBuf>,

    /// Base URL of the public holiday API
    #[arg(long, env = "HOLIDAY_API_URL", default_value = DEFAULT_HOLIDAY_API)]
    holiday_api: String,
}

impl Args {
    /// Resolves the storage flags into a [`StorageConfig`].
    fn storage_config(&self) -> Result<StorageConfig, PersistenceError> {
        let kind: StorageKind = self.storage_type.parse()?;
        match kind {
            StorageKind::Local => Ok(StorageConfig::local(&self.data_dir)),
            StorageKind::Remote => {
                let remote: RemoteConfig = RemoteConfig::new(
                    self.storage_account.as_deref(),
                    self.storage_container.as_deref(),
                    self.storage_endpoint.as_deref(),
                    self.storage_sas_token.as_deref(),
                )?;
                Ok(StorageConfig::remote(remote))
            }
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The roster service. All calls into it block.
    roster: Arc<Roster>,
    /// Where records are stored, for display.
    storage: StorageInfo,
}

/// API request for adding a member.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AddMemberRequest {
    /// Display name.
    name: String,
    /// Country name.
    country: String,
    /// Optional region name.
    #[serde(default)]
    region: Option<String>,
}

/// API request for adding a holiday by hand.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AddHolidayRequest {
    /// Holiday name.
    name: String,
    /// Day of the holiday (`YYYY-MM-DD`).
    date: String,
    /// Country name.
    country: String,
    /// Optional region name.
    #[serde(default)]
    region: Option<String>,
}

/// API request for adding an out-of-office interval.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AddOooRequest {
    /// The member's id.
    member_id: String,
    /// First day (`YYYY-MM-DD`).
    start_date: String,
    /// Last day; defaults to `start_date`.
    #[serde(default)]
    end_date: Option<String>,
    /// Optional reason; defaults to `Vacation`.
    #[serde(default)]
    reason: Option<String>,
}

/// API request for deleting the interval covering a day.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct DeleteOooRequest {
    /// The member's id.
    member_id: String,
    /// Any day inside the interval.
    date: String,
}

/// API request for cancelling an interval by its exact range.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CancelVacationRequest {
    /// The member's id.
    member_id: String,
    /// First day of the interval.
    start_date: String,
    /// Last day of the interval.
    end_date: String,
}

/// Response for member listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MembersResponse {
    /// Members keyed by id.
    members: MemberDirectory,
}

/// Response after adding a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AddMemberResponse {
    /// The assigned id.
    member_id: MemberId,
    /// The stored member.
    member: Member,
}

/// Response for region listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegionsResponse {
    /// The country asked about.
    country: String,
    /// Region names, sorted.
    regions: Vec<String>,
}

/// Response for country listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CountriesResponse {
    /// Country names, sorted.
    countries: Vec<String>,
}

/// Response after holiday generation.
#[derive(Debug, Clone, Serialize)]
struct GenerateResponse {
    /// Human-readable summary.
    message: String,
    /// The full report.
    #[serde(flatten)]
    report: GenerationReport,
}

/// Response after removing an interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RemovedOooResponse {
    /// Human-readable summary.
    message: String,
    /// The removed interval.
    entry: OooEntry,
}

/// Generic write acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse {
    /// Human-readable summary.
    message: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error message.
    error: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        let status: StatusCode = match &err {
            CoreError::Domain(_) | CoreError::NoMembers | CoreError::NoCountries => {
                StatusCode::BAD_REQUEST
            }
            CoreError::MemberNotFound(_) | CoreError::OooNotFound { .. } => StatusCode::NOT_FOUND,
            CoreError::Storage(e) => {
                error!(error = %e, "Storage error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for HttpError {
    fn from(err: DomainError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

/// Parses a `YYYY-MM-DD` path or body value.
fn parse_date(raw: &str) -> Result<CalendarDate, HttpError> {
    Ok(raw.trim().parse::<CalendarDate>()?)
}

/// Runs a roster call on the blocking pool.
async fn with_roster<T, F>(app_state: &AppState, f: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&Roster) -> Result<T, CoreError> + Send + 'static,
{
    let roster: Arc<Roster> = Arc::clone(&app_state.roster);
    tokio::task::spawn_blocking(move || f(&roster))
        .await
        .map_err(|e| {
            error!(error = %e, "Roster task failed");
            HttpError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: String::from("Internal error"),
            }
        })?
        .map_err(HttpError::from)
}

/// Handler for GET `/members` endpoint.
async fn handle_list_members(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<MembersResponse>, HttpError> {
    let members: MemberDirectory = with_roster(&app_state, |r| Ok(r.members())).await?;
    Ok(Json(MembersResponse { members }))
}

/// Handler for POST `/members` endpoint.
///
/// Adds a member and populates holidays for their location.
async fn handle_add_member(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddMemberRequest>,
) -> Result<Json<AddMemberResponse>, HttpError> {
    info!(name = %req.name, country = %req.country, "Handling add_member request");

    let (member_id, member) = with_roster(&app_state, move |r| {
        r.add_member(&req.name, &req.country, req.region.as_deref())
    })
    .await?;
    Ok(Json(AddMemberResponse { member_id, member }))
}

/// Handler for GET `/member_locations` endpoint.
async fn handle_member_locations(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<MemberLocations>, HttpError> {
    let locations: MemberLocations =
        with_roster(&app_state, |r| Ok(r.member_locations())).await?;
    Ok(Json(locations))
}

/// Handler for GET `/countries` endpoint.
async fn handle_countries(AxumState(app_state): AxumState<AppState>) -> Json<CountriesResponse> {
    let countries: Vec<String> = app_state
        .roster
        .directory()
        .countries()
        .into_iter()
        .map(|entry| entry.name.clone())
        .collect();
    Json(CountriesResponse { countries })
}

/// Handler for GET `/regions/{country}` endpoint.
async fn handle_regions(
    AxumState(app_state): AxumState<AppState>,
    Path(country): Path<String>,
) -> Json<RegionsResponse> {
    let regions: Vec<String> = app_state.roster.regions_for(&country);
    Json(RegionsResponse { country, regions })
}

/// Handler for GET `/holidays` endpoint.
async fn handle_holidays(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<HolidayCalendar>, HttpError> {
    let calendar: HolidayCalendar = with_roster(&app_state, |r| Ok(r.holidays())).await?;
    Ok(Json(calendar))
}

/// Handler for GET `/holidays/sorted` endpoint.
async fn handle_sorted_holidays(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<HolidayListing>>, HttpError> {
    let listing: Vec<HolidayListing> =
        with_roster(&app_state, |r| Ok(r.sorted_holidays())).await?;
    Ok(Json(listing))
}

/// Handler for POST `/holidays` endpoint.
async fn handle_add_holiday(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddHolidayRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(name = %req.name, date = %req.date, country = %req.country, "Handling add_holiday request");

    let date: CalendarDate = parse_date(&req.date)?;
    with_roster(&app_state, move |r| {
        r.add_holiday(&req.name, date, &req.country, req.region.as_deref())
    })
    .await?;
    Ok(Json(WriteResponse {
        message: String::from("Holiday added successfully"),
    }))
}

/// Handler for POST `/generate_holidays` endpoint.
///
/// Rebuilds the holiday catalog for this year and next.
async fn handle_generate_holidays(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<GenerateResponse>, HttpError> {
    info!("Handling generate_holidays request");

    let report: GenerationReport = with_roster(&app_state, Roster::generate_holidays).await?;
    Ok(Json(GenerateResponse {
        message: report.message(),
        report,
    }))
}

/// Handler for GET `/ooo` endpoint.
async fn handle_list_ooo(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<OooLedger>, HttpError> {
    let ledger: OooLedger = with_roster(&app_state, |r| Ok(r.ooo())).await?;
    Ok(Json(ledger))
}

/// Handler for POST `/ooo` endpoint.
async fn handle_add_ooo(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddOooRequest>,
) -> Result<Json<OooEntry>, HttpError> {
    info!(member_id = %req.member_id, start = %req.start_date, "Handling add_ooo request");

    let start: CalendarDate = parse_date(&req.start_date)?;
    let end: CalendarDate = match &req.end_date {
        Some(raw) if !raw.trim().is_empty() => parse_date(raw)?,
        _ => start,
    };
    let member_id: MemberId = MemberId::new(&req.member_id);

    let entry: OooEntry = with_roster(&app_state, move |r| {
        r.add_ooo(&member_id, start, end, req.reason.as_deref())
    })
    .await?;
    Ok(Json(entry))
}

/// Handler for POST `/ooo/delete` endpoint.
///
/// Removes the interval covering the given day.
async fn handle_delete_ooo(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<DeleteOooRequest>,
) -> Result<Json<RemovedOooResponse>, HttpError> {
    info!(member_id = %req.member_id, date = %req.date, "Handling delete_ooo request");

    let date: CalendarDate = parse_date(&req.date)?;
    let member_id: MemberId = MemberId::new(&req.member_id);

    let entry: OooEntry = with_roster(&app_state, move |r| {
        r.delete_ooo(&member_id, date)?
            .ok_or_else(|| CoreError::OooNotFound {
                member_id: member_id.to_string(),
                date: date.to_string(),
            })
    })
    .await?;
    Ok(Json(RemovedOooResponse {
        message: String::from("Out of office entry deleted"),
        entry,
    }))
}

/// Handler for POST `/ooo/cancel` endpoint.
///
/// Removes the interval with exactly the given range.
async fn handle_cancel_vacation(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CancelVacationRequest>,
) -> Result<Json<RemovedOooResponse>, HttpError> {
    info!(
        member_id = %req.member_id,
        start = %req.start_date,
        end = %req.end_date,
        "Handling cancel_vacation request"
    );

    let start: CalendarDate = parse_date(&req.start_date)?;
    let end: CalendarDate = parse_date(&req.end_date)?;
    let member_id: MemberId = MemberId::new(&req.member_id);

    let entry: OooEntry = with_roster(&app_state, move |r| {
        r.cancel_vacation(&member_id, start, end)?
            .ok_or_else(|| CoreError::OooNotFound {
                member_id: member_id.to_string(),
                date: format!("{start} to {end}"),
            })
    })
    .await?;
    Ok(Json(RemovedOooResponse {
        message: String::from("Vacation canceled"),
        entry,
    }))
}

/// Handler for GET `/ooo_details/{member_id}/{date}` endpoint.
async fn handle_ooo_details(
    AxumState(app_state): AxumState<AppState>,
    Path((member_id, date)): Path<(String, String)>,
) -> Result<Json<OooDetails>, HttpError> {
    let day: CalendarDate = parse_date(&date)?;
    let member_id: MemberId = MemberId::new(&member_id);

    let details: OooDetails = with_roster(&app_state, move |r| {
        r.ooo_details(&member_id, day)
            .ok_or_else(|| CoreError::OooNotFound {
                member_id: member_id.to_string(),
                date: day.to_string(),
            })
    })
    .await?;
    Ok(Json(details))
}

/// Handler for GET `/availability/{date}` endpoint.
async fn handle_availability(
    AxumState(app_state): AxumState<AppState>,
    Path(date): Path<String>,
) -> Result<Json<BTreeMap<MemberId, MemberAvailability>>, HttpError> {
    let day: CalendarDate = parse_date(&date)?;
    let verdicts: BTreeMap<MemberId, MemberAvailability> =
        with_roster(&app_state, move |r| Ok(r.availability_on(day))).await?;
    Ok(Json(verdicts))
}

/// Handler for GET `/month/{year}/{month}` endpoint.
async fn handle_month(
    AxumState(app_state): AxumState<AppState>,
    Path((year, month)): Path<(i32, u8)>,
) -> Result<Json<MonthAvailability>, HttpError> {
    let view: MonthAvailability =
        with_roster(&app_state, move |r| r.month_availability(year, month)).await?;
    Ok(Json(view))
}

/// Handler for GET `/history` endpoint.
async fn handle_history(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, HttpError> {
    let entries: Vec<HistoryEntry> = with_roster(&app_state, |r| Ok(r.history())).await?;
    Ok(Json(entries))
}

/// Handler for GET `/storage` endpoint.
async fn handle_storage(AxumState(app_state): AxumState<AppState>) -> Json<StorageInfo> {
    Json(app_state.storage)
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/members", get(handle_list_members).post(handle_add_member))
        .route("/member_locations", get(handle_member_locations))
        .route("/countries", get(handle_countries))
        .route("/regions/{country}", get(handle_regions))
        .route("/holidays", get(handle_holidays).post(handle_add_holiday))
        .route("/holidays/sorted", get(handle_sorted_holidays))
        .route("/generate_holidays", post(handle_generate_holidays))
        .route("/ooo", get(handle_list_ooo).post(handle_add_ooo))
        .route("/ooo/delete", post(handle_delete_ooo))
        .route("/ooo/cancel", post(handle_cancel_vacation))
        .route("/ooo_details/{member_id}/{date}", get(handle_ooo_details))
        .route("/availability/{date}", get(handle_availability))
        .route("/month/{year}/{month}", get(handle_month))
        .route("/history", get(handle_history))
        .route("/storage", get(handle_storage))
        .with_state(app_state)
}

/// Builds the roster from the command-line configuration.
///
/// Runs outside the async runtime because the storage and oracle clients
/// are blocking.
fn build_state(args: &Args) -> Result<AppState, Box<dyn std::error::Error>> {
    let config: StorageConfig = args.storage_config()?;
    let backend: Arc<dyn StorageBackend> = config.build()?;
    let storage: StorageInfo = config.describe();
    info!(storage_type = %storage.storage_type, location = %storage.location, "Storage initialized");

    let directory: CountryDirectory = args
        .countries
        .as_deref()
        .map_or_else(CountryDirectory::builtin, CountryDirectory::load);
    let oracle: NagerOracle = NagerOracle::new(args.holiday_api.clone())?;

    let roster: Roster = Roster::new(
        RecordStore::new(backend),
        HolidaySource::new(Arc::new(oracle), directory),
        Arc::new(SystemClock),
    );

    Ok(AppState {
        roster: Arc::new(roster),
        storage,
    })
}

async fn serve(app: Router, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr: std::net::SocketAddr = format!("{host}:{port}").parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Rollcall Server");

    let app_state: AppState = build_state(&args).inspect_err(|e| {
        error!(error = %e, "Failed to initialize");
    })?;
    let app: Router = build_router(app_state);

    let runtime: tokio::runtime::Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(app, &args.host, args.port))
}

#[cfg(test)]
mod tests;
