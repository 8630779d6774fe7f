//! # Session Store (mock auth)
//!
//! Client-local authentication as the original app shipped it: one
//! registered credential record, one active session, last writer wins.
//! This is a placeholder, not a pattern to build on; a real deployment
//! needs a server-side identity service issuing verifiable tokens.

use crate::error::{MarketError, MarketResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Academic year of the account holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Year {
    Freshman,
    Sophomore,
    Junior,
    Senior,
    Graduate,
}

impl Default for Year {
    fn default() -> Self {
        Year::Freshman
    }
}

/// Public user record, as stored on the session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub university: String,
    #[serde(default)]
    pub year: Year,
    pub rating: f64,
    pub review_count: u32,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The registered record keeps the password alongside the profile.
/// Never serialized back out; `sign_in` strips it.
#[derive(Debug, Clone)]
struct Registered {
    profile: UserProfile,
    password: String,
}

#[derive(Default)]
struct SessionSlots {
    registered: Option<Registered>,
    active: Option<UserProfile>,
}

/// Single-record session store.
///
/// At most one registered user and one active session per client;
/// signing up again overwrites the previous record.
#[derive(Default)]
pub struct SessionStore {
    slots: Mutex<SessionSlots>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. Does not activate a session.
    pub fn sign_up(&self, profile: UserProfile, password: impl Into<String>) {
        let mut slots = self.slots.lock().expect("session lock poisoned");
        slots.registered = Some(Registered {
            profile,
            password: password.into(),
        });
    }

    /// Validate credentials and activate the session.
    pub fn sign_in(&self, email: &str, password: &str) -> MarketResult<UserProfile> {
        let mut slots = self.slots.lock().expect("session lock poisoned");

        let registered = slots.registered.as_ref().ok_or_else(|| {
            MarketError::SessionRejected("No user found. Please sign up first.".to_string())
        })?;

        if registered.profile.email != email || registered.password != password {
            return Err(MarketError::SessionRejected(
                "Invalid credentials".to_string(),
            ));
        }

        let profile = registered.profile.clone();
        slots.active = Some(profile.clone());
        Ok(profile)
    }

    /// Destroy the active session; the registered record survives.
    pub fn sign_out(&self) {
        let mut slots = self.slots.lock().expect("session lock poisoned");
        slots.active = None;
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.slots
            .lock()
            .expect("session lock poisoned")
            .active
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(email: &str) -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            email: email.to_string(),
            name: "Jamie Lee".to_string(),
            university: "State University".to_string(),
            year: Year::Junior,
            rating: 5.0,
            review_count: 0,
            is_verified: false,
            avatar: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sign_in_before_sign_up_is_rejected() {
        let store = SessionStore::new();
        let err = store.sign_in("a@uni.edu", "pw").unwrap_err();
        assert!(matches!(err, MarketError::SessionRejected(_)));
    }

    #[test]
    fn sign_up_then_sign_in_activates_session() {
        let store = SessionStore::new();
        store.sign_up(profile("a@uni.edu"), "pw");

        assert!(!store.is_authenticated());
        let user = store.sign_in("a@uni.edu", "pw").unwrap();
        assert_eq!(user.email, "a@uni.edu");
        assert!(store.is_authenticated());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let store = SessionStore::new();
        store.sign_up(profile("a@uni.edu"), "pw");
        assert!(store.sign_in("a@uni.edu", "nope").is_err());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn sign_out_destroys_session_only() {
        let store = SessionStore::new();
        store.sign_up(profile("a@uni.edu"), "pw");
        store.sign_in("a@uni.edu", "pw").unwrap();

        store.sign_out();
        assert!(!store.is_authenticated());
        // Registered record survives sign-out
        assert!(store.sign_in("a@uni.edu", "pw").is_ok());
    }

    #[test]
    fn last_writer_wins_on_repeat_sign_up() {
        let store = SessionStore::new();
        store.sign_up(profile("a@uni.edu"), "pw-a");
        store.sign_up(profile("b@uni.edu"), "pw-b");

        assert!(store.sign_in("a@uni.edu", "pw-a").is_err());
        assert!(store.sign_in("b@uni.edu", "pw-b").is_ok());
    }
}
