//! Credential lookup for the calendar API.
//!
//! Token acquisition (OAuth flows, refresh) is a collaborator concern;
//! the core only needs something that can hand over a bearer token.
//! Credentials live in the OS keyring under the `dayplan` service.

use keyring::Entry;

use crate::error::CredentialError;

const KEYRING_SERVICE: &str = "dayplan";
const TOKEN_USER: &str = "google_token";

/// Supplies a bearer token for the remote calendar API. Absence of a
/// token is a recoverable failure, not a fatal one.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Result<String, CredentialError>;
}

/// Fixed token, used in tests and for ad-hoc runs.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn access_token(&self) -> Result<String, CredentialError> {
        Ok(self.token.clone())
    }
}

/// Reads the bearer token stored in the OS keyring.
#[derive(Debug, Default)]
pub struct KeyringTokenProvider;

impl KeyringTokenProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TokenProvider for KeyringTokenProvider {
    fn access_token(&self) -> Result<String, CredentialError> {
        let entry = Entry::new(KEYRING_SERVICE, TOKEN_USER)?;
        Ok(entry.get_password()?)
    }
}

/// Persist a bearer token to the OS keyring.
pub fn store_token(token: &str) -> Result<(), CredentialError> {
    let entry = Entry::new(KEYRING_SERVICE, TOKEN_USER)?;
    entry.set_password(token)?;
    Ok(())
}

/// Remove the stored bearer token, if any.
pub fn clear_token() -> Result<(), CredentialError> {
    let entry = Entry::new(KEYRING_SERVICE, TOKEN_USER)?;
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
