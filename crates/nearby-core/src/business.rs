use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinates;
use crate::ConfigError;

/// Weekday names indexed by `Weekday::num_days_from_sunday`.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Owner-toggled availability flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveStatus {
    Online,
    #[default]
    Offline,
}

impl LiveStatus {
    /// Parses a stored status value. Anything other than `online` is offline.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("online") {
            LiveStatus::Online
        } else {
            LiveStatus::Offline
        }
    }
}

impl std::fmt::Display for LiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiveStatus::Online => write!(f, "online"),
            LiveStatus::Offline => write!(f, "offline"),
        }
    }
}

/// One day's entry in a weekly schedule. Times are `HH:MM` strings as entered
/// by the business owner and are parsed lazily.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub close: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

impl DayHours {
    #[must_use]
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: Some(open.to_string()),
            close: Some(close.to_string()),
            closed: false,
        }
    }

    #[must_use]
    pub fn closed() -> Self {
        Self {
            open: None,
            close: None,
            closed: true,
        }
    }
}

/// Weekly operating hours keyed either by weekday index (`"0"` = Sunday) or by
/// weekday name. Both spellings occur in stored data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatingHours(BTreeMap<String, DayHours>);

impl OperatingHours {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_day(mut self, key: impl Into<String>, hours: DayHours) -> Self {
        self.0.insert(key.into(), hours);
        self
    }

    /// Same hours for all seven days, keyed by index.
    #[must_use]
    pub fn every_day(hours: &DayHours) -> Self {
        (0..7).fold(Self::new(), |acc, day| acc.with_day(day.to_string(), hours.clone()))
    }

    /// Looks up a day by numeric index first, then by weekday name
    /// (case-insensitive).
    #[must_use]
    pub fn day(&self, weekday: Weekday) -> Option<&DayHours> {
        let index = weekday.num_days_from_sunday() as usize;
        self.0.get(&index.to_string()).or_else(|| {
            let name = WEEKDAY_NAMES[index];
            self.0
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, hours)| hours)
        })
    }
}

fn default_true() -> bool {
    true
}

/// Read-only snapshot of a marketplace business as supplied by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub operating_hours: OperatingHours,
    #[serde(default)]
    pub status: LiveStatus,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default, rename = "acceptsCOD")]
    pub accepts_cod: bool,
    #[serde(default)]
    pub has_offers: bool,
    #[serde(default)]
    pub verified: bool,
    /// Platform commission, in percent.
    #[serde(default)]
    pub commission_rate: Decimal,
    #[serde(default)]
    pub min_order_amount: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_approved: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl BusinessRecord {
    /// Approved and active businesses are the only ones search may return.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        self.is_approved && self.is_active
    }
}

#[derive(Debug, Deserialize)]
pub struct BusinessSnapshot {
    pub businesses: Vec<BusinessRecord>,
}

/// Load and validate a JSON business snapshot, the fixture format used by the
/// CLI and by tests.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_business_snapshot(path: &Path) -> Result<BusinessSnapshot, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SnapshotIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let snapshot: BusinessSnapshot =
        serde_json::from_str(&content).map_err(ConfigError::SnapshotParse)?;

    validate_snapshot(&snapshot)?;

    Ok(snapshot)
}

fn validate_snapshot(snapshot: &BusinessSnapshot) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for business in &snapshot.businesses {
        if business.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "business {} has an empty name",
                business.id
            )));
        }

        if let Err(e) = business.coordinates.validate() {
            return Err(ConfigError::Validation(format!(
                "business '{}' has invalid coordinates: {e}",
                business.name
            )));
        }

        if !(0.0..=5.0).contains(&business.average_rating) {
            return Err(ConfigError::Validation(format!(
                "business '{}' has rating {} outside 0-5",
                business.name, business.average_rating
            )));
        }

        if !seen_ids.insert(business.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate business id: {}",
                business.id
            )));
        }
    }

    Ok(())
}
