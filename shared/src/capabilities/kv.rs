use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

pub const MAX_VALUE_SIZE: usize = 5 * 1024 * 1024;

/// Every key the site keeps in shell storage. The raw names are shared with
/// the web build's `localStorage`, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKey {
    Token,
    User,
}

impl StorageKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::User => "user",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum KvError {
    #[error("value too large for '{key}': {size} bytes exceeds maximum of {max} bytes")]
    ValueTooLarge { key: StorageKey, size: usize, max: usize },

    #[error("storage error on '{key}': {message}")]
    Storage { key: StorageKey, message: String },

    #[error("serialization error on '{key}': {message}")]
    Serialization { key: StorageKey, message: String },
}

pub fn encode_text(key: StorageKey, value: &str) -> Result<Vec<u8>, KvError> {
    check_size(key, value.len())?;
    Ok(value.as_bytes().to_vec())
}

pub fn encode_json<T: Serialize>(key: StorageKey, value: &T) -> Result<Vec<u8>, KvError> {
    let data = serde_json::to_vec(value).map_err(|e| KvError::Serialization {
        key,
        message: e.to_string(),
    })?;
    check_size(key, data.len())?;
    Ok(data)
}

/// Decodes the shell's answer to a read of a string-valued key.
pub fn decode_text<E: Display>(
    key: StorageKey,
    result: Result<Option<Vec<u8>>, E>,
) -> Result<Option<String>, KvError> {
    match result {
        Ok(Some(bytes)) => String::from_utf8(bytes).map(Some).map_err(|e| KvError::Serialization {
            key,
            message: e.to_string(),
        }),
        Ok(None) => Ok(None),
        Err(e) => Err(KvError::Storage {
            key,
            message: e.to_string(),
        }),
    }
}

/// Decodes the shell's answer to a read of a JSON-valued key.
pub fn decode_json<T, E>(key: StorageKey, result: Result<Option<Vec<u8>>, E>) -> Result<Option<T>, KvError>
where
    T: serde::de::DeserializeOwned,
    E: Display,
{
    match result {
        Ok(Some(bytes)) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| KvError::Serialization {
                key,
                message: e.to_string(),
            }),
        Ok(None) => Ok(None),
        Err(e) => Err(KvError::Storage {
            key,
            message: e.to_string(),
        }),
    }
}

fn check_size(key: StorageKey, size: usize) -> Result<(), KvError> {
    if size > MAX_VALUE_SIZE {
        return Err(KvError::ValueTooLarge {
            key,
            size,
            max: MAX_VALUE_SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_key_names() {
        assert_eq!(StorageKey::Token.as_str(), "token");
        assert_eq!(StorageKey::User.as_str(), "user");
    }

    #[test]
    fn test_text_is_stored_verbatim() {
        let bytes = encode_text(StorageKey::Token, "eyJhbGciOi.x.y").unwrap();
        assert_eq!(bytes, b"eyJhbGciOi.x.y");
        let decoded = decode_text::<String>(StorageKey::Token, Ok(Some(bytes))).unwrap();
        assert_eq!(decoded.as_deref(), Some("eyJhbGciOi.x.y"));
    }

    #[test]
    fn test_missing_key_decodes_to_none() {
        let decoded = decode_text::<String>(StorageKey::Token, Ok(None)).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_invalid_utf8_is_serialization_error() {
        let result = decode_text::<String>(StorageKey::Token, Ok(Some(vec![0xff, 0xfe])));
        assert!(matches!(result, Err(KvError::Serialization { key: StorageKey::Token, .. })));
    }

    #[test]
    fn test_shell_error_is_storage_error() {
        let result = decode_text(StorageKey::Token, Err("quota exceeded".to_string()));
        assert!(matches!(result, Err(KvError::Storage { .. })));
    }

    #[test]
    fn test_json_user_blob() {
        let user = serde_json::json!({ "name": "Asha", "email": "asha@example.com" });
        let bytes = encode_json(StorageKey::User, &user).unwrap();
        let back: Option<serde_json::Value> = decode_json::<_, String>(StorageKey::User, Ok(Some(bytes))).unwrap();
        assert_eq!(back, Some(user));
    }

    #[test]
    fn test_json_garbage_rejected() {
        let result = decode_json::<serde_json::Value, String>(StorageKey::User, Ok(Some(b"{not json".to_vec())));
        assert!(matches!(result, Err(KvError::Serialization { key: StorageKey::User, .. })));
    }

    #[test]
    fn test_value_size_limit() {
        let big = "a".repeat(MAX_VALUE_SIZE + 1);
        assert!(matches!(
            encode_text(StorageKey::Token, &big),
            Err(KvError::ValueTooLarge { .. })
        ));
    }
}
