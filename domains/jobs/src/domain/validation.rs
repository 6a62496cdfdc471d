//! Form parsing and validation for the job pages
//!
//! Browser forms arrive as strings. Each form is trimmed, validated with
//! `validator`, and only then converted into typed domain values, so a
//! rejected form can be re-rendered exactly as the user typed it.

use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use super::entities::{Job, JobStatus, JobUpdate, NewJob};

/// Field name to first error message, for re-rendering a form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let map = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                let first = errs.first()?;
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field.replace('_', " ")));
                Some((field.to_string(), message))
            })
            .collect();
        Self(map)
    }
}

fn validate_salary(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    match value.parse::<i32>() {
        Ok(n) if n >= 0 => Ok(()),
        _ => Err(ValidationError::new("salary")),
    }
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    value
        .parse::<JobStatus>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("status"))
}

fn optional_text(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn optional_salary(value: &str) -> Option<i32> {
    value.parse().ok()
}

fn status_or_default(value: &str) -> JobStatus {
    value.parse().unwrap_or_default()
}

/// The add-job form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct JobForm {
    #[validate(length(min = 1, max = 200, message = "Position is required"))]
    pub position: String,

    #[validate(length(min = 1, max = 200, message = "Company is required"))]
    pub company: String,

    #[validate(length(max = 200, message = "Location is too long"))]
    pub location: String,

    #[validate(custom(function = "validate_salary", message = "Salary must be a whole number"))]
    pub salary_min: String,

    #[validate(custom(function = "validate_salary", message = "Salary must be a whole number"))]
    pub salary_max: String,

    #[validate(email(message = "A valid contact email is required"))]
    pub contact_email: String,

    #[validate(custom(function = "validate_status", message = "Unknown status"))]
    pub status: String,
}

impl JobForm {
    /// Validate and convert into the fields for a new posting
    pub fn parse(mut self) -> Result<NewJob, (Self, FieldErrors)> {
        self.trim();
        if let Err(e) = self.validate() {
            let errors = FieldErrors::from(&e);
            return Err((self, errors));
        }

        Ok(NewJob {
            location: optional_text(&self.location),
            salary_min: optional_salary(&self.salary_min),
            salary_max: optional_salary(&self.salary_max),
            status: status_or_default(&self.status),
            position: self.position,
            company: self.company,
            contact_email: self.contact_email,
        })
    }

    fn trim(&mut self) {
        for field in [
            &mut self.position,
            &mut self.company,
            &mut self.location,
            &mut self.salary_min,
            &mut self.salary_max,
            &mut self.contact_email,
            &mut self.status,
        ] {
            *field = field.trim().to_string();
        }
    }
}

/// The edit-job form; salary and location are not editable
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct JobEditForm {
    #[validate(length(min = 1, max = 200, message = "Position is required"))]
    pub position: String,

    #[validate(length(min = 1, max = 200, message = "Company is required"))]
    pub company: String,

    #[validate(email(message = "A valid contact email is required"))]
    pub contact_email: String,

    /// Required here; a blank value must not reset the stored status
    #[validate(
        length(min = 1, message = "Status is required"),
        custom(function = "validate_status", message = "Unknown status")
    )]
    pub status: String,
}

impl JobEditForm {
    /// Prefill from the stored job
    pub fn from_job(job: &Job) -> Self {
        Self {
            position: job.position.clone(),
            company: job.company.clone(),
            contact_email: job.contact_email.clone(),
            status: job.status.to_string(),
        }
    }

    pub fn parse(mut self) -> Result<JobUpdate, (Self, FieldErrors)> {
        for field in [
            &mut self.position,
            &mut self.company,
            &mut self.contact_email,
            &mut self.status,
        ] {
            *field = field.trim().to_string();
        }
        if let Err(e) = self.validate() {
            let errors = FieldErrors::from(&e);
            return Err((self, errors));
        }

        Ok(JobUpdate {
            status: status_or_default(&self.status),
            position: self.position,
            company: self.company,
            contact_email: self.contact_email,
        })
    }
}

/// The contact email form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct EmailForm {
    #[validate(length(min = 1, max = 200, message = "Subject is required"))]
    pub subject: String,

    #[validate(length(min = 1, max = 10000, message = "Message is required"))]
    pub body: String,
}

impl EmailForm {
    pub fn check(mut self) -> Result<Self, (Self, FieldErrors)> {
        self.subject = self.subject.trim().to_string();
        if let Err(e) = self.validate() {
            let errors = FieldErrors::from(&e);
            return Err((self, errors));
        }
        Ok(self)
    }
}
