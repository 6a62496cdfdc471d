//! Page templates for the job views

use askama::Template;

use crate::domain::entities::{Job, JobStatus};
use crate::domain::validation::{EmailForm, FieldErrors, JobEditForm, JobForm};

/// One `<option>` of a status picker
#[derive(Debug, Clone, PartialEq)]
pub struct StatusOption {
    pub name: &'static str,
    pub selected: bool,
}

/// Status picker entries with `selected` matching case-insensitively
pub fn status_options(selected: &str) -> Vec<StatusOption> {
    JobStatus::ALL
        .into_iter()
        .map(|status| StatusOption {
            name: status.as_str(),
            selected: status.as_str().eq_ignore_ascii_case(selected),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage<'a> {
    pub username: &'a str,
    pub jobs: Vec<Job>,
    pub status_options: Vec<StatusOption>,
    pub flashes: Vec<String>,
}

#[derive(Template)]
#[template(path = "job_form.html")]
pub struct JobFormPage {
    pub form: JobForm,
    pub errors: FieldErrors,
    pub status_options: Vec<StatusOption>,
    pub flashes: Vec<String>,
}

impl JobFormPage {
    pub fn new(form: JobForm, errors: FieldErrors) -> Self {
        let status_options = if form.status.is_empty() {
            status_options(JobStatus::default().as_str())
        } else {
            status_options(&form.status)
        };
        Self {
            form,
            errors,
            status_options,
            flashes: Vec::new(),
        }
    }
}

#[derive(Template)]
#[template(path = "job_edit.html")]
pub struct JobEditPage<'a> {
    pub job: &'a Job,
    pub form: JobEditForm,
    pub errors: FieldErrors,
    pub status_options: Vec<StatusOption>,
    pub flashes: Vec<String>,
}

impl<'a> JobEditPage<'a> {
    pub fn new(job: &'a Job, form: JobEditForm, errors: FieldErrors) -> Self {
        let status_options = status_options(&form.status);
        Self {
            job,
            form,
            errors,
            status_options,
            flashes: Vec::new(),
        }
    }
}

#[derive(Template)]
#[template(path = "email_form.html")]
pub struct EmailFormPage<'a> {
    pub job: &'a Job,
    pub form: EmailForm,
    pub errors: FieldErrors,
    pub flashes: Vec<String>,
}
