//! Records exchanged with the catalog API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bucket key used for photographs without a usable capture time.
pub const UNKNOWN: &str = "Unknown";

/// A collection endpoint and the record it returns.
pub trait Resource: serde::de::DeserializeOwned + Send + 'static {
    /// Path relative to the API base, with a trailing slash.
    const PATH: &'static str;
}

/// Paginated list envelope.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Photograph {
    pub id: u64,
    #[serde(default)]
    pub hash: Option<String>,
    /// Capture time exactly as delivered; parsed lazily.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub paths: Vec<PhotoPath>,
    /// Ids of the albums this photograph belongs to.
    #[serde(default)]
    pub albums: Vec<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Photograph {
    const PATH: &'static str = "photographs/";
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SiblingPath {
    pub id: u64,
    pub path: String,
    #[serde(default)]
    pub device: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PhotoPath {
    pub id: u64,
    pub path: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub photograph: Option<u64>,
    #[serde(default)]
    pub siblings: Vec<SiblingPath>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for PhotoPath {
    const PATH: &'static str = "photo-paths/";
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Album {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photos_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Album {
    const PATH: &'static str = "albums/";
}

/// Body of an album creation request.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewAlbum {
    pub name: String,
    pub description: String,
}

/// Partial album update; unset fields are left untouched by the server.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct AlbumPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AlbumPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Kind of change the server is asked to carry out later.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    Delete,
}

/// A change recorded against a photograph and carried out by the server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlannedAction {
    pub id: u64,
    pub action_type: ActionType,
    /// Id of the photograph the action applies to.
    pub photograph: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for PlannedAction {
    const PATH: &'static str = "planned-actions/";
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewPlannedAction {
    pub action_type: ActionType,
    pub photograph: u64,
}

/// Answer to a hash computation request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ComputedHash {
    pub hash: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Hash {
    pub id: u64,
    pub path: String,
    pub hash: String,
}

impl Resource for Hash {
    const PATH: &'static str = "hashes/";
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Directory {
    pub id: u64,
    pub path: String,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mirror: i64,
    pub kind: u64,
    #[serde(default)]
    pub kind_name: Option<String>,
}

impl Resource for Directory {
    const PATH: &'static str = "directories/";
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DirKind {
    pub id: u64,
    pub name: String,
}

impl Resource for DirKind {
    const PATH: &'static str = "dir-kinds/";
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    pub id: u64,
    pub name: String,
}

impl Resource for Location {
    const PATH: &'static str = "locations/";
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimeLoc {
    pub id: u64,
    pub path: u64,
    #[serde(default)]
    pub directory_path: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub location: u64,
    #[serde(default)]
    pub location_name: Option<String>,
}

impl Resource for TimeLoc {
    const PATH: &'static str = "time-locs/";
}

/// One row of a year, month or day summary.
///
/// The key arrives as `year`, `month` or `day`, either as a number or a
/// string, and is normalized to its zero-padded form (`2023`, `07`, `05`).
/// A missing or literal `Unknown` year becomes [`UNKNOWN`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(try_from = "RawBucket")]
pub struct DateBucket {
    pub key: String,
    pub count: u64,
}

#[derive(Deserialize)]
struct RawBucket {
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    month: Option<Value>,
    #[serde(default)]
    day: Option<Value>,
    #[serde(default)]
    count: u64,
}

impl TryFrom<RawBucket> for DateBucket {
    type Error = String;

    fn try_from(raw: RawBucket) -> Result<Self, Self::Error> {
        let key = if let Some(day) = raw.day {
            pad_component(&day, 2)?
        } else if let Some(month) = raw.month {
            pad_component(&month, 2)?
        } else {
            match raw.year {
                None | Some(Value::Null) => UNKNOWN.to_string(),
                Some(year) => pad_component(&year, 4)?,
            }
        };
        Ok(DateBucket { key, count: raw.count })
    }
}

fn pad_component(value: &Value, width: usize) -> Result<String, String> {
    let number = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) if s == UNKNOWN => return Ok(UNKNOWN.to_string()),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    number
        .map(|n| format!("{:0width$}", n, width = width))
        .ok_or_else(|| format!("invalid date component: {}", value))
}

/// A sub-directory of a path prefix with the number of paths below it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DirectorySummary {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub count: u64,
}

/// Filter for the photographs collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PhotographFilter {
    #[default]
    All,
    Year(String),
    Month(String, String),
    Day(String, String, String),
    Unknown,
}

impl PhotographFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        match self {
            PhotographFilter::All => Vec::new(),
            PhotographFilter::Year(y) => vec![("year", y.clone())],
            PhotographFilter::Month(y, m) => vec![("year", y.clone()), ("month", m.clone())],
            PhotographFilter::Day(y, m, d) => vec![
                ("year", y.clone()),
                ("month", m.clone()),
                ("day", d.clone()),
            ],
            PhotographFilter::Unknown => vec![("year", UNKNOWN.to_string())],
        }
    }
}

/// Filter for the photo-paths collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    pub path_prefix: Option<String>,
    pub direct_children_only: bool,
}

impl PathFilter {
    pub fn under(prefix: impl Into<String>) -> Self {
        PathFilter {
            path_prefix: Some(prefix.into()),
            direct_children_only: false,
        }
    }

    pub fn direct_children(prefix: impl Into<String>) -> Self {
        PathFilter {
            path_prefix: Some(prefix.into()),
            direct_children_only: true,
        }
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        // An empty prefix means the catalog root
        if let Some(prefix) = self.path_prefix.as_deref().filter(|p| !p.is_empty()) {
            // The server compares with forward slashes only
            query.push(("path_prefix", prefix.replace('\\', "/")));
        }
        if self.direct_children_only {
            query.push(("direct_children_only", "true".to_string()));
        }
        query
    }
}
