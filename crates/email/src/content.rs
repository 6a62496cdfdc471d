//! Job contact email content

use crate::SenderIdentity;

/// Plain-text body for a job contact email.
///
/// The user's text is sent as written, followed by a signature naming the
/// user so the recipient knows who to reply to.
pub fn job_contact_text(body: &str, sender: &SenderIdentity) -> String {
    format!(
        "{}\n\n--\n{} <{}>\nSent via Jobtrack",
        body.trim_end(),
        sender.name,
        sender.email
    )
}
