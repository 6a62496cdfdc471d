//! Request context for authenticated users

use crate::session::{Session, SessionUser};

/// An authenticated request: the logged-in account and its live session
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: SessionUser,
    pub session: Session,
}

impl AuthContext {
    /// Build a context from a session, if it is authenticated
    pub fn from_session(session: Session) -> Option<Self> {
        let user = session.user.clone()?;
        Some(Self { user, session })
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    /// Check if this user owns a row with the given owner id
    pub fn owns(&self, owner_id: i64) -> bool {
        self.user.id == owner_id
    }
}
