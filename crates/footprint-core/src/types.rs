//! Shared types used across the Footprint application.
//!
//! This module defines common newtypes and enums that provide type safety
//! and clear domain modeling.

use crate::error::FootprintError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use std::str::FromStr;

/// Newtype for surface identifiers with validation.
///
/// Surface keys must be lowercase alphanumeric with hyphens, 3-40 characters
/// (e.g. `linkedin`, `dns-dmarc`, `google-business-profile`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceKey(String);

impl SurfaceKey {
    /// Create a new `SurfaceKey` from a string.
    ///
    /// # Errors
    /// Returns error if the key doesn't match the required format.
    pub fn new(key: impl Into<String>) -> Result<Self, FootprintError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate surface key format: lowercase alphanumeric with hyphens, 3-40 chars.
    fn validate(key: &str) -> Result<(), FootprintError> {
        static KEY_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = KEY_REGEX
            .get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,38}[a-z0-9]$").expect("valid regex"));

        if key.len() < 3 || key.len() > 40 {
            return Err(FootprintError::Validation(format!(
                "invalid surface key: must be 3-40 characters, got {} characters",
                key.len()
            )));
        }

        if regex.is_match(key) {
            Ok(())
        } else {
            Err(FootprintError::Validation(format!(
                "invalid surface key: must be lowercase alphanumeric with hyphens, got '{key}'"
            )))
        }
    }
}

impl fmt::Display for SurfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for scan identifiers with validation.
///
/// Scan IDs must be valid UUIDs (v4 format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanId(String);

impl ScanId {
    /// Create a new `ScanId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is not a valid UUID v4.
    pub fn new(id: impl Into<String>) -> Result<Self, FootprintError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Create a new random `ScanId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that a string is a valid UUID v4.
    fn validate(id: &str) -> Result<(), FootprintError> {
        static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = UUID_REGEX.get_or_init(|| {
            Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
                .expect("valid regex")
        });

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(FootprintError::Validation(format!(
                "invalid scan ID: must be a valid UUID v4, got '{id}'"
            )))
        }
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a scan is allowed to gather evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanMode {
    /// Direct crawling and DNS only; provider-backed surfaces are skipped.
    CrawlOnly,
    /// Crawling plus paid-provider lookups where a surface requires them.
    CrawlPlusProvider,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CrawlOnly => write!(f, "crawl-only"),
            Self::CrawlPlusProvider => write!(f, "crawl-plus-provider"),
        }
    }
}

impl FromStr for ScanMode {
    type Err = FootprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crawl-only" => Ok(Self::CrawlOnly),
            "crawl-plus-provider" => Ok(Self::CrawlPlusProvider),
            other => Err(FootprintError::Validation(format!(
                "invalid scan mode '{other}'"
            ))),
        }
    }
}

/// Lifecycle status of a scan row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanStatus {
    /// Scan is currently in progress
    Running,
    /// Every surface reached a terminal status
    Completed,
    /// Scan aborted (startup failure or cancellation)
    Failed,
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ScanStatus {
    type Err = FootprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(FootprintError::Validation(format!(
                "invalid scan status '{other}'"
            ))),
        }
    }
}

/// The acquisition method a probe used to gather evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeKind {
    /// Direct HTTP fetch of a target URL
    Http,
    /// DNS TXT record lookup
    Dns,
    /// Third-party organic search results lookup
    Search,
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Dns => write!(f, "dns"),
            Self::Search => write!(f, "search"),
        }
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
///
/// Provides serialization/deserialization and utility methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a `DateTime<Utc>`.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, FootprintError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| FootprintError::Validation(format!("invalid timestamp: {e}")))
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Get seconds since Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
