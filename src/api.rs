//! Credential-keyed client registry.
//!
//! A [`ClientRegistry`] hands out one shared [`MoySklad`] handle per
//! login/password pair. The registry is an ordinary value: create one where
//! the application wires its services and share it by reference or `Arc`.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use moysklad_api::ClientRegistry;
//!
//! let registry = ClientRegistry::new();
//! let first = registry.get_or_create("admin@company", "secret", None).unwrap();
//! let second = registry.get_or_create("admin@company", "secret", None).unwrap();
//!
//! assert!(Arc::ptr_eq(&first, &second));
//! assert_eq!(registry.len(), 1);
//! ```

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sha2::{Digest, Sha256};

use crate::clients::HttpClient;
use crate::config::{Login, MoySkladConfig, Password, PosToken};
use crate::error::ConfigError;

/// Returns the registry key of a credential pair: hex SHA-256 of
/// `login:password`.
///
/// # Example
///
/// ```rust
/// use moysklad_api::credentials_hash;
///
/// let hash = credentials_hash("admin@company", "secret");
/// assert_eq!(hash.len(), 64);
/// assert_ne!(hash, credentials_hash("admin@company", "other"));
/// ```
#[must_use]
pub fn credentials_hash(login: &str, password: &str) -> String {
    let digest = Sha256::digest(format!("{login}:{password}").as_bytes());
    digest.iter().fold(String::with_capacity(64), |mut hex, byte| {
        let _ = write!(hex, "{byte:02x}");
        hex
    })
}

/// A client bound to one set of credentials.
#[derive(Debug)]
pub struct MoySklad {
    client: HttpClient,
    hash_code: String,
}

impl MoySklad {
    /// Creates a handle with a reqwest-backed client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &MoySkladConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_client(HttpClient::new(config)?))
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(client: HttpClient) -> Self {
        let config = client.config();
        let hash_code = credentials_hash(config.login().as_ref(), config.password().as_ref());
        Self { client, hash_code }
    }

    /// Returns the HTTP client.
    #[must_use]
    pub const fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Replaces the POS token used by this handle's client.
    ///
    /// The usual flow is to request a token from
    /// [`urls::pos_attach_token`](crate::urls::pos_attach_token) with the
    /// password and install the returned value here.
    pub fn set_pos_token(&self, token: Option<PosToken>) {
        self.client.set_pos_token(token);
    }

    /// Returns the registry key of this handle's credentials.
    #[must_use]
    pub fn hash_code(&self) -> &str {
        &self.hash_code
    }
}

/// Shared map from credential hash to [`MoySklad`] handle.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: Mutex<HashMap<String, Arc<MoySklad>>>,
}

// Verify ClientRegistry is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientRegistry>();
};

impl ClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<MoySklad>>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the handle for `login`/`password`, creating it with default
    /// endpoints on first use.
    ///
    /// `pos_token` is only applied when the handle is created; it is ignored
    /// for credentials already registered. Use [`MoySklad::set_pos_token`]
    /// to change the token of an existing handle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a credential is empty or the HTTP client
    /// cannot be built.
    pub fn get_or_create(
        &self,
        login: &str,
        password: &str,
        pos_token: Option<&str>,
    ) -> Result<Arc<MoySklad>, ConfigError> {
        let hash = credentials_hash(login, password);
        let mut clients = self.lock();
        if let Some(existing) = clients.get(&hash) {
            return Ok(Arc::clone(existing));
        }

        let mut builder = MoySkladConfig::builder()
            .login(Login::new(login)?)
            .password(Password::new(password)?);
        if let Some(token) = pos_token {
            builder = builder.pos_token(PosToken::new(token)?);
        }
        let handle = Arc::new(MoySklad::new(&builder.build()?)?);

        tracing::debug!(hash = %hash, "Registered MoySklad client");
        clients.insert(hash, Arc::clone(&handle));
        Ok(handle)
    }

    /// Returns the handle for the configuration's credentials, creating it
    /// from `config` on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the HTTP client cannot be built.
    pub fn get_or_create_with(&self, config: &MoySkladConfig) -> Result<Arc<MoySklad>, ConfigError> {
        let hash = credentials_hash(config.login().as_ref(), config.password().as_ref());
        let mut clients = self.lock();
        if let Some(existing) = clients.get(&hash) {
            return Ok(Arc::clone(existing));
        }

        let handle = Arc::new(MoySklad::new(config)?);
        clients.insert(hash, Arc::clone(&handle));
        Ok(handle)
    }

    /// Returns a registered handle by its credential hash.
    #[must_use]
    pub fn find_by_hash(&self, hash: &str) -> Option<Arc<MoySklad>> {
        self.lock().get(hash).cloned()
    }

    /// Returns the number of registered handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_hash_is_stable_hex() {
        let hash = credentials_hash("login", "password");

        assert_eq!(hash, credentials_hash("login", "password"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_credentials_hash_known_value() {
        assert_eq!(
            credentials_hash("a", "b"),
            "6783a31eabf68ccc0660f935c0826282bdd2241f3a80a9f2d10d59aea9ebb5d8"
        );
    }

    #[test]
    fn test_same_credentials_share_handle() {
        let registry = ClientRegistry::new();
        let first = registry.get_or_create("admin@company", "secret", None).unwrap();
        let second = registry
            .get_or_create("admin@company", "secret", Some("pos-token"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(second.client().pos_token().is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_different_credentials_get_distinct_handles() {
        let registry = ClientRegistry::new();
        let first = registry.get_or_create("admin@company", "secret", None).unwrap();
        let second = registry.get_or_create("admin@company", "other", None).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_find_by_hash() {
        let registry = ClientRegistry::new();
        assert!(registry.is_empty());

        let handle = registry
            .get_or_create("admin@company", "secret", Some("pos-token"))
            .unwrap();
        let found = registry.find_by_hash(handle.hash_code()).unwrap();

        assert!(Arc::ptr_eq(&handle, &found));
        assert!(found.client().pos_token().is_some());
        assert!(registry.find_by_hash("missing").is_none());
    }

    #[test]
    fn test_empty_credentials_are_rejected() {
        let registry = ClientRegistry::new();

        assert!(matches!(
            registry.get_or_create("", "secret", None),
            Err(ConfigError::EmptyLogin)
        ));
        assert!(matches!(
            registry.get_or_create("admin", "", None),
            Err(ConfigError::EmptyPassword)
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_set_pos_token_reaches_registered_handle() {
        let registry = ClientRegistry::new();
        let handle = registry.get_or_create("admin@company", "secret", None).unwrap();

        handle.set_pos_token(Some(PosToken::new("pos-token").unwrap()));

        let again = registry.get_or_create("admin@company", "secret", None).unwrap();
        assert_eq!(again.client().pos_token().unwrap().as_ref(), "pos-token");
    }

    #[test]
    fn test_get_or_create_with_config() {
        let config = MoySkladConfig::builder()
            .login(Login::new("admin@company").unwrap())
            .password(Password::new("secret").unwrap())
            .build()
            .unwrap();
        let registry = ClientRegistry::new();

        let from_config = registry.get_or_create_with(&config).unwrap();
        let from_credentials = registry.get_or_create("admin@company", "secret", None).unwrap();

        assert!(Arc::ptr_eq(&from_config, &from_credentials));
    }
}
