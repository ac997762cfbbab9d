//! Remote tabular store - trait seam and HTTP implementation
//!
//! The remote tier is a tabular REST store with two collections: `persons`
//! rows and append-only `activity_log` rows. The [`RemoteStore`] trait is
//! the seam tests inject failures through; [`HttpRemoteStore`] speaks
//! PostgREST-style conventions (query-string filters, bulk insert bodies).
//!
//! Rows cross the boundary as a strict schema ([`PersonRow`], [`LogRow`])
//! with one decode point: fields are defaulted where safe and rows dropped
//! with a warning when unsalvageable, so loosely-typed remote state never
//! leaks past this module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::roster::{clamp_level, Person};
use crate::types::{Result, RollbookError};

// ============================================================================
// Wire schema
// ============================================================================

/// One `persons` row as stored remotely
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRow {
    pub id: i64,
    pub name: String,
    pub level: i64,
    #[serde(default)]
    pub history: Vec<i64>,
    #[serde(default)]
    pub notes: String,
    /// JSON map, optional on older rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub zero_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PersonRow {
    pub fn from_person(p: &Person) -> Self {
        Self {
            id: p.id as i64,
            name: p.name.clone(),
            level: p.level as i64,
            history: p.history.iter().map(|&v| v as i64).collect(),
            notes: p.notes.clone(),
            admin_notes: Some(p.admin_notes.clone()),
            zero_count: p.zero_count as i64,
            updated_at: Some(Utc::now()),
        }
    }

    /// The single decode point for remote roster rows.
    ///
    /// Defaults what can be defaulted (missing notes, missing admin_notes,
    /// out-of-range levels are clamped, empty history becomes `[level]`,
    /// a history tail that disagrees with `level` gets the level appended)
    /// and drops the row with a warning when it cannot be made sound
    /// (non-positive id, empty name).
    pub fn into_person(self) -> Option<Person> {
        if self.id <= 0 || self.id > u32::MAX as i64 {
            warn!(id = self.id, "Dropping roster row with invalid id");
            return None;
        }
        if self.name.is_empty() {
            warn!(id = self.id, "Dropping roster row with empty name");
            return None;
        }

        let level = clamp_level(self.level.clamp(i32::MIN as i64, i32::MAX as i64) as i32);
        let mut history: Vec<u8> = self
            .history
            .iter()
            .map(|&v| clamp_level(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32))
            .collect();
        if history.is_empty() {
            history.push(level);
        } else if *history.last().unwrap() != level {
            debug!(id = self.id, "History tail disagrees with level, appending");
            history.push(level);
        }

        Some(Person {
            id: self.id as u32,
            name: self.name,
            level,
            history,
            notes: self.notes,
            admin_notes: self.admin_notes.unwrap_or_default(),
            zero_count: self.zero_count.max(0) as u32,
        })
    }
}

/// One `activity_log` row as stored remotely
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRow {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Trait seam
// ============================================================================

/// Operations the core needs from the remote store: ordered select, point
/// update by id, append insert, and bulk delete-then-reinsert.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Full roster, ordered by id ascending
    async fn fetch_roster(&self) -> Result<Vec<PersonRow>>;

    /// Full activity log, most recent first (store-assigned timestamps)
    async fn fetch_log(&self) -> Result<Vec<LogRow>>;

    /// Point update of one person row by id
    async fn update_person(&self, row: &PersonRow) -> Result<()>;

    /// Append one log entry
    async fn insert_log(&self, message: &str) -> Result<()>;

    /// Delete both collections and reinsert the given roster plus a single
    /// reset log entry
    async fn replace_all(&self, rows: &[PersonRow], reset_message: &str) -> Result<()>;
}

// ============================================================================
// HTTP implementation
// ============================================================================

/// PostgREST-style HTTP client for the remote store
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRemoteStore {
    pub fn new(base_url: &str, api_key: Option<String>, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| RollbookError::Remote(format!("HTTP client init failed: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}/{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            builder = builder
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}"));
        }
        builder
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| RollbookError::Remote(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RollbookError::Remote(format!(
                "HTTP {} from {}",
                response.status(),
                response.url()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch_roster(&self) -> Result<Vec<PersonRow>> {
        let response = self
            .send(self.request(reqwest::Method::GET, "persons?select=*&order=id.asc"))
            .await?;
        response
            .json()
            .await
            .map_err(|e| RollbookError::Decode(format!("roster body: {e}")))
    }

    async fn fetch_log(&self) -> Result<Vec<LogRow>> {
        let response = self
            .send(self.request(
                reqwest::Method::GET,
                "activity_log?select=*&order=created_at.desc",
            ))
            .await?;
        response
            .json()
            .await
            .map_err(|e| RollbookError::Decode(format!("log body: {e}")))
    }

    async fn update_person(&self, row: &PersonRow) -> Result<()> {
        self.send(
            self.request(
                reqwest::Method::PATCH,
                &format!("persons?id=eq.{}", row.id),
            )
            .json(&json!({
                "level": row.level,
                "history": row.history,
                "notes": row.notes,
                "admin_notes": row.admin_notes,
                "zero_count": row.zero_count,
                "updated_at": row.updated_at,
            })),
        )
        .await?;
        Ok(())
    }

    async fn insert_log(&self, message: &str) -> Result<()> {
        self.send(
            self.request(reqwest::Method::POST, "activity_log")
                .json(&json!({ "message": message })),
        )
        .await?;
        Ok(())
    }

    async fn replace_all(&self, rows: &[PersonRow], reset_message: &str) -> Result<()> {
        // Delete-all needs an always-true filter in PostgREST
        self.send(self.request(reqwest::Method::DELETE, "persons?id=not.is.null"))
            .await?;
        self.send(self.request(reqwest::Method::POST, "persons").json(&rows))
            .await?;
        self.send(self.request(
            reqwest::Method::DELETE,
            "activity_log?created_at=not.is.null",
        ))
        .await?;
        self.insert_log(reset_message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name: &str, level: i64) -> PersonRow {
        PersonRow {
            id,
            name: name.to_string(),
            level,
            history: vec![level],
            notes: String::new(),
            admin_notes: None,
            zero_count: 0,
            updated_at: None,
        }
    }

    #[test]
    fn test_decode_defaults_optional_fields() {
        let p = row(1, "يوسف", 5).into_person().unwrap();
        assert_eq!(p.id, 1);
        assert_eq!(p.level, 5);
        assert_eq!(p.history, vec![5]);
        assert!(p.admin_notes.is_empty());
    }

    #[test]
    fn test_decode_clamps_out_of_range_level() {
        let mut r = row(1, "x", 42);
        r.history = vec![-3, 42];
        let p = r.into_person().unwrap();
        assert_eq!(p.level, 10);
        assert_eq!(p.history, vec![0, 10]);
    }

    #[test]
    fn test_decode_rebuilds_empty_history() {
        let mut r = row(2, "x", 4);
        r.history = vec![];
        let p = r.into_person().unwrap();
        assert_eq!(p.history, vec![4]);
    }

    #[test]
    fn test_decode_repairs_divergent_history_tail() {
        let mut r = row(2, "x", 4);
        r.history = vec![5, 7];
        let p = r.into_person().unwrap();
        assert_eq!(*p.history.last().unwrap(), 4);
    }

    #[test]
    fn test_decode_drops_unsalvageable_rows() {
        assert!(row(0, "x", 5).into_person().is_none());
        assert!(row(-4, "x", 5).into_person().is_none());
        assert!(row(1, "", 5).into_person().is_none());
    }

    #[test]
    fn test_row_round_trip_preserves_admin_notes() {
        let mut p = crate::roster::Person::seeded(3, "علي", 3);
        p.admin_notes
            .insert("Alice".to_string(), "note".to_string());
        let back = PersonRow::from_person(&p).into_person().unwrap();
        assert_eq!(back.admin_notes.get("Alice").map(String::as_str), Some("note"));
    }

    #[test]
    fn test_row_json_shape() {
        let r = row(1, "n", 5);
        let v: serde_json::Value = serde_json::to_value(&r).unwrap();
        assert_eq!(v["zero_count"], 0);
        // Optional fields stay off the wire when unset
        assert!(v.get("admin_notes").is_none());
        assert!(v.get("updated_at").is_none());
    }
}
