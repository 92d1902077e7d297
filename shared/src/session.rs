//! Signed-in session: the bearer token and the user blob, persisted verbatim
//! under the `token` and `user` storage keys.

use std::fmt::Display;

use crux_kv::KeyValue;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::capabilities::{decode_json, decode_text, encode_json, encode_text, KvError, StorageKey};
use crate::error::{AppError, ErrorKind};
use crate::event::Event;

/// Raised whenever the stored user is written or removed, so every page can
/// react to sign-in and sign-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionChange {
    UserSet,
    UserRemoved,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("bearer token cannot be empty")]
    EmptyToken,

    #[error(transparent)]
    Storage(#[from] KvError),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let kind = match &err {
            SessionError::EmptyToken => ErrorKind::Validation,
            SessionError::Storage(KvError::Serialization { .. }) => ErrorKind::Serialization,
            SessionError::Storage(_) => ErrorKind::Storage,
        };
        AppError::new(kind, "Unable to save your session").with_internal(err.to_string())
    }
}

/// In-memory mirror of what the session keys hold.
#[derive(Debug, Default)]
pub struct Session {
    token: Option<SecretString>,
    user: Option<serde_json::Value>,
    revision: u64,
    last_change: Option<SessionChange>,
}

impl Session {
    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }

    pub fn user(&self) -> Option<&serde_json::Value> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: serde_json::Value) {
        self.user = Some(user);
        self.record(SessionChange::UserSet);
    }

    pub fn remove_user(&mut self) {
        self.user = None;
        self.record(SessionChange::UserRemoved);
    }

    /// Mirrors a user read back from storage without raising a change.
    pub fn restore_user(&mut self, user: Option<serde_json::Value>) {
        self.user = user;
    }

    /// Bumped once per change notification.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn last_change(&self) -> Option<SessionChange> {
        self.last_change
    }

    fn record(&mut self, change: SessionChange) {
        self.revision += 1;
        self.last_change = Some(change);
        debug!(?change, revision = self.revision, "session changed");
    }
}

/// Session persistence over the injected key-value capability.
pub struct SessionStore<'a> {
    kv: &'a KeyValue<Event>,
}

impl<'a> SessionStore<'a> {
    pub fn new(kv: &'a KeyValue<Event>) -> Self {
        Self { kv }
    }

    pub fn set_token(&self, token: &SecretString) -> Result<(), SessionError> {
        let bytes = encode_token(token)?;
        self.write(StorageKey::Token, bytes);
        Ok(())
    }

    /// Persists a sign-in. Both values are encoded before either is written,
    /// so a rejected user leaves storage untouched.
    pub fn save(&self, token: &SecretString, user: &serde_json::Value) -> Result<(), SessionError> {
        let token = encode_token(token)?;
        let user = encode_json(StorageKey::User, user)?;
        self.write(StorageKey::Token, token);
        self.write(StorageKey::User, user);
        Ok(())
    }

    fn write(&self, key: StorageKey, bytes: Vec<u8>) {
        self.kv
            .set(key.to_string(), bytes, move |result| storage_written(key, result));
    }

    pub fn get_token<F>(&self, make_event: F)
    where
        F: FnOnce(Result<Option<String>, KvError>) -> Event + Send + Sync + 'static,
    {
        self.kv.get(StorageKey::Token.to_string(), move |result| {
            make_event(decode_text(StorageKey::Token, result))
        });
    }

    pub fn remove_token(&self) {
        self.kv.delete(StorageKey::Token.to_string(), move |result| {
            storage_written(StorageKey::Token, result)
        });
    }

    pub fn set_user(&self, user: &serde_json::Value) -> Result<(), SessionError> {
        let bytes = encode_json(StorageKey::User, user)?;
        self.write(StorageKey::User, bytes);
        Ok(())
    }

    pub fn get_user<F>(&self, make_event: F)
    where
        F: FnOnce(Result<Option<serde_json::Value>, KvError>) -> Event + Send + Sync + 'static,
    {
        self.kv.get(StorageKey::User.to_string(), move |result| {
            make_event(decode_json(StorageKey::User, result))
        });
    }

    pub fn remove_user(&self) {
        self.kv.delete(StorageKey::User.to_string(), move |result| {
            storage_written(StorageKey::User, result)
        });
    }
}

fn encode_token(token: &SecretString) -> Result<Vec<u8>, SessionError> {
    let token = token.expose_secret();
    if token.is_empty() {
        return Err(SessionError::EmptyToken);
    }
    Ok(encode_text(StorageKey::Token, token)?)
}

fn storage_written<T, E: Display>(key: StorageKey, result: Result<T, E>) -> Event {
    Event::StorageWritten {
        key,
        result: result.map(|_| ()).map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_write_and_remove_each_notify_once() {
        let mut session = Session::default();
        assert_eq!(session.revision(), 0);
        assert!(session.last_change().is_none());

        session.set_user(serde_json::json!({ "name": "Asha" }));
        assert_eq!(session.revision(), 1);
        assert_eq!(session.last_change(), Some(SessionChange::UserSet));

        session.remove_user();
        assert_eq!(session.revision(), 2);
        assert_eq!(session.last_change(), Some(SessionChange::UserRemoved));
        assert!(session.user().is_none());
    }

    #[test]
    fn test_restore_is_silent() {
        let mut session = Session::default();
        session.restore_user(Some(serde_json::json!({ "name": "Asha" })));
        assert_eq!(session.revision(), 0);
        assert!(session.user().is_some());
    }

    #[test]
    fn test_token_is_redacted_in_debug() {
        let mut session = Session::default();
        session.set_token(SecretString::new("super-secret-jwt".into()));
        assert!(session.is_signed_in());
        assert!(!format!("{session:?}").contains("super-secret-jwt"));
    }

    #[test]
    fn test_empty_token_is_not_signed_in() {
        let mut session = Session::default();
        session.set_token(SecretString::new(String::new()));
        assert!(!session.is_signed_in());
        session.clear_token();
        assert!(session.token().is_none());
    }

    #[test]
    fn test_error_mapping() {
        let err: AppError = SessionError::EmptyToken.into();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err: AppError = SessionError::Storage(KvError::Storage {
            key: StorageKey::User,
            message: "quota".into(),
        })
        .into();
        assert_eq!(err.kind, ErrorKind::Storage);
    }

    #[test]
    fn test_storage_written_maps_errors_to_text() {
        let ok = storage_written::<Option<Vec<u8>>, String>(StorageKey::Token, Ok(None));
        assert!(matches!(ok, Event::StorageWritten { result: Ok(()), .. }));

        let err = storage_written::<(), &str>(StorageKey::User, Err("denied"));
        assert!(matches!(
            err,
            Event::StorageWritten { key: StorageKey::User, result: Err(ref msg) } if msg == "denied"
        ));
    }
}
