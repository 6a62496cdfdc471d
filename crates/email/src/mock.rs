//! Mock Email Service Implementation
//!
//! In-memory email capture for tests. Can be switched into a failing mode
//! to simulate the relay being unreachable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EmailError, EmailMessage, EmailReceipt, EmailService};

const MOCK_FROM: &str = "notifications@jobtrack.app";

/// Email captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    /// Job id the email was sent about, if any
    pub fn job_id(&self) -> Option<i64> {
        self.message
            .metadata
            .get("job_id")
            .and_then(|id| id.parse().ok())
    }
}

/// Mock email service for testing
#[derive(Debug, Clone)]
pub struct MockEmailService {
    emails: Arc<Mutex<Vec<CapturedEmail>>>,
    email_by_recipient: Arc<Mutex<HashMap<String, Vec<CapturedEmail>>>>,
    failing: Arc<Mutex<bool>>,
    enabled: bool,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self {
            emails: Arc::new(Mutex::new(Vec::new())),
            email_by_recipient: Arc::new(Mutex::new(HashMap::new())),
            failing: Arc::new(Mutex::new(false)),
            enabled: true,
        }
    }

    /// Create a disabled mock email service; sends succeed but nothing is captured
    pub fn new_disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Get all captured emails
    pub fn get_all_emails(&self) -> Vec<CapturedEmail> {
        self.emails
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Get emails sent to a specific recipient
    pub fn get_emails_for_recipient(&self, email: &str) -> Vec<CapturedEmail> {
        self.email_by_recipient
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(email)
            .cloned()
            .unwrap_or_default()
    }

    /// Get count of emails sent
    pub fn email_count(&self) -> usize {
        self.emails.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    /// Clear all captured emails
    pub fn clear(&self) {
        self.emails
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
        self.email_by_recipient
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }

    /// Make every send fail as if the relay were down
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap_or_else(|p| p.into_inner()) = failing;
    }

    /// Check if email sending is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        if *self.failing.lock().unwrap_or_else(|p| p.into_inner()) {
            return Err(EmailError::AwsSes("mock relay unavailable".to_string()));
        }

        if !self.enabled {
            tracing::warn!("Mock email service disabled, skipping send");
            return Ok(EmailReceipt {
                message_id: format!("disabled-{}", Uuid::new_v4()),
                sent_at: Utc::now(),
                provider: "mock-disabled".to_string(),
                metadata: message.metadata,
            });
        }

        tracing::info!(to = %message.to, "Mock email service capturing email");

        let receipt = EmailReceipt {
            message_id: format!("mock-{}", Uuid::new_v4()),
            sent_at: Utc::now(),
            provider: "mock".to_string(),
            metadata: message.metadata.clone(),
        };

        let captured = CapturedEmail {
            message: message.clone(),
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        };

        self.emails
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(captured.clone());

        self.email_by_recipient
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entry(message.to)
            .or_default()
            .push(captured);

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        MOCK_FROM.to_string()
    }
}
