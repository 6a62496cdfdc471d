//! Domain entities for the Jobs domain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an application stands
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(type_name = "job_status")]
pub enum JobStatus {
    #[default]
    Flagged,
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl JobStatus {
    /// Every status, in pipeline order
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Flagged,
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Offer,
        JobStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flagged => "Flagged",
            Self::Applied => "Applied",
            Self::Interview => "Interview",
            Self::Offer => "Offer",
            Self::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown job status: {}", s))
    }
}

/// Job posting entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub position: String,
    pub company: String,
    pub location: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub contact_email: String,
    pub status: JobStatus,
    pub poster_id: i64,
}

impl Job {
    /// Salary range for display, e.g. `50000 - 70000`
    pub fn salary_range(&self) -> String {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => format!("{} - {}", min, max),
            (Some(min), None) => format!("from {}", min),
            (None, Some(max)) => format!("up to {}", max),
            (None, None) => String::new(),
        }
    }

    pub fn location_or_blank(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }

    /// Overwrite the fields the edit form exposes.
    ///
    /// Salary and location are deliberately left as created.
    pub fn apply(&mut self, update: &JobUpdate) {
        self.position = update.position.clone();
        self.company = update.company.clone();
        self.contact_email = update.contact_email.clone();
        self.status = update.status;
    }
}

/// Fields for a new job posting
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub position: String,
    pub company: String,
    pub location: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub contact_email: String,
    pub status: JobStatus,
}

impl NewJob {
    /// Minimal posting with the default status
    pub fn new(
        position: impl Into<String>,
        company: impl Into<String>,
        contact_email: impl Into<String>,
    ) -> Self {
        Self {
            position: position.into(),
            company: company.into(),
            location: None,
            salary_min: None,
            salary_max: None,
            contact_email: contact_email.into(),
            status: JobStatus::default(),
        }
    }
}

/// Fields the edit form may overwrite
#[derive(Debug, Clone, PartialEq)]
pub struct JobUpdate {
    pub position: String,
    pub company: String,
    pub contact_email: String,
    pub status: JobStatus,
}
