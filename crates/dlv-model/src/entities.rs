//! Plan entities
//!
//! Plain owned records. None of them carries its own identifier; the
//! collection that owns a record assigns it one (see `dlv-store`).

use crate::error::ModelError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parse a calendar date in `YYYY-MM-DD` form
///
/// # Errors
/// Returns [`ModelError::MissingField`] for blank input and
/// [`ModelError::InvalidDate`] when the text is not a valid date
pub fn parse_iso_date(field: &'static str, value: &str) -> Result<NaiveDate, ModelError> {
    crate::error::require(field, value)?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ModelError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// A named strategy, the parent of interventions, schedule and risks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub title: String,
    pub description: String,
    pub owner: String,
    /// Relevant links and references
    pub reference_info: String,
}

/// A planned intervention under a strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention {
    pub title: String,
    pub description: String,
    pub owner: String,
    pub target_end_date: NaiveDate,
}

/// Progress of a schedule item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScheduleStatus {
    #[default]
    #[serde(rename = "Not started")]
    NotStarted,
    #[serde(rename = "In progress")]
    InProgress,
    #[serde(rename = "For review")]
    ForReview,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Requires attention")]
    RequiresAttention,
}

impl ScheduleStatus {
    /// Every status, in menu order
    pub const ALL: [ScheduleStatus; 5] = [
        ScheduleStatus::NotStarted,
        ScheduleStatus::InProgress,
        ScheduleStatus::ForReview,
        ScheduleStatus::Completed,
        ScheduleStatus::RequiresAttention,
    ];

    /// Human-readable label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ScheduleStatus::NotStarted => "Not started",
            ScheduleStatus::InProgress => "In progress",
            ScheduleStatus::ForReview => "For review",
            ScheduleStatus::Completed => "Completed",
            ScheduleStatus::RequiresAttention => "Requires attention",
        }
    }

    /// Gantt bar color
    #[inline]
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            ScheduleStatus::Completed => "green",
            ScheduleStatus::InProgress => "blue",
            ScheduleStatus::ForReview => "orange",
            ScheduleStatus::RequiresAttention => "red",
            ScheduleStatus::NotStarted => "grey",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScheduleStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|status| normalize(status.label()) == wanted)
            .ok_or_else(|| ModelError::unknown("status", s))
    }
}

/// A dated activity in a strategy's schedule
///
/// `start_date <= end_date` is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ScheduleStatus,
}

impl ScheduleItem {
    /// Duration in whole days (negative when the dates are reversed)
    #[inline]
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Whether a register entry is a risk or an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskKind {
    #[default]
    Risk,
    Issue,
}

impl RiskKind {
    /// Human-readable label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RiskKind::Risk => "Risk",
            RiskKind::Issue => "Issue",
        }
    }
}

impl fmt::Display for RiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "risk" => Ok(RiskKind::Risk),
            "issue" => Ok(RiskKind::Issue),
            _ => Err(ModelError::unknown("risk kind", s)),
        }
    }
}

/// Three-point likelihood / impact scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Rating {
    #[default]
    Low,
    Medium,
    High,
}

impl Rating {
    /// Human-readable label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Low => "Low",
            Rating::Medium => "Medium",
            Rating::High => "High",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rating {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" => Ok(Rating::Low),
            "medium" => Ok(Rating::Medium),
            "high" => Ok(Rating::High),
            _ => Err(ModelError::unknown("rating", s)),
        }
    }
}

/// Risk or issue register entry for a strategy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskOrIssue {
    pub intervention_title: String,
    pub kind: RiskKind,
    pub description: String,
    pub likelihood: Rating,
    pub impact: Rating,
    pub mitigation: String,
    pub post_mitigation_likelihood: Rating,
    pub post_mitigation_impact: Rating,
    pub comment: String,
}

/// How a stakeholder prefers to be contacted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
    Text,
}

impl ContactMethod {
    /// Human-readable label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ContactMethod::Email => "Email",
            ContactMethod::Phone => "Phone",
            ContactMethod::Text => "Text",
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContactMethod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "email" => Ok(ContactMethod::Email),
            "phone" => Ok(ContactMethod::Phone),
            "text" => Ok(ContactMethod::Text),
            _ => Err(ModelError::unknown("contact method", s)),
        }
    }
}

/// Stakeholder contact, not tied to any strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    pub preferred_contact: ContactMethod,
    pub comment: String,
}

// Case- and separator-insensitive label comparison ("in-progress" == "In progress")
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
