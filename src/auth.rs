use crate::record::Record;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

/// An authenticated collaborator session.
///
/// Session state is an explicit store keyed by opaque ids rather than a
/// process-wide logged-in flag, so one session never bleeds into another.
#[derive(Debug, Clone)]
pub struct Session {
    /// Collaborator scope granted by the matching credential row
    pub collaborator_id: String,

    /// Time when the session expires
    pub expires_at: SystemTime,
}

/// Global sessions storage
///
/// Stores all active collaborator sessions in a thread-safe map.
lazy_static! {
    static ref SESSIONS: RwLock<HashMap<String, Session>> = RwLock::new(HashMap::new());
}

const SESSION_DURATION: u64 = 24 * 60 * 60; // 24 hours in seconds

/// Check submitted credentials against the normalized table.
///
/// The source sheet stores plaintext credentials on the activity rows
/// themselves; the contract is literally "does any row carry this
/// User/Password pair". The first matching row's collaborator id becomes
/// the scope of the session. Comparison is exact and case-sensitive, with
/// no lockout and no hashing — behavioral parity with the upstream sheet.
///
/// # Arguments
/// * `records` - Normalized records
/// * `user` - Submitted login name
/// * `password` - Submitted password
///
/// # Returns
/// * `Option<String>` - The matching row's collaborator id, or `None`
pub fn authenticate(records: &[Record], user: &str, password: &str) -> Option<String> {
    records
        .iter()
        .find(|r| r.login_user == user && r.login_password == password)
        .map(|r| r.collaborator_id.clone())
}

/// Create a new session for an authenticated collaborator.
///
/// # Arguments
/// * `collaborator_id` - The collaborator scope to bind to the session
///
/// # Returns
/// * `String` - A unique session id to hand back as a cookie
#[cfg(feature = "web")]
pub fn create_session(collaborator_id: &str) -> String {
    let session_id = uuid::Uuid::new_v4().to_string();
    let expires_at = SystemTime::now() + Duration::from_secs(SESSION_DURATION);

    let session = Session {
        collaborator_id: collaborator_id.to_string(),
        expires_at,
    };

    let mut sessions = SESSIONS.write().unwrap();
    sessions.insert(session_id.clone(), session);

    session_id
}

/// Validate a session id.
///
/// # Arguments
/// * `session_id` - The session id to validate
///
/// # Returns
/// * `Option<String>` - The session's collaborator id if valid and not
///   expired, `None` otherwise
pub fn validate_session(session_id: &str) -> Option<String> {
    let sessions = SESSIONS.read().unwrap();

    if let Some(session) = sessions.get(session_id) {
        if session.expires_at > SystemTime::now() {
            return Some(session.collaborator_id.clone());
        }
    }

    None
}

/// Remove a session, if it exists. Used by logout.
pub fn destroy_session(session_id: &str) {
    let mut sessions = SESSIONS.write().unwrap();
    sessions.remove(session_id);
}

/// Insert a session directly. Test hook for exercising validation without
/// the web feature's uuid-backed `create_session`.
#[cfg(test)]
fn insert_session(session_id: &str, collaborator_id: &str, ttl: Duration) {
    let mut sessions = SESSIONS.write().unwrap();
    sessions.insert(
        session_id.to_string(),
        Session {
            collaborator_id: collaborator_id.to_string(),
            expires_at: SystemTime::now() + ttl,
        },
    );
}
