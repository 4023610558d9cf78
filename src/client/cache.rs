//! The token cache seam and a simple in-memory implementation.
//!
//! The cache is an external collaborator: this crate defines the narrow
//! interface it is consumed through and ships [`InMemoryTokenCache`] as a
//! non-persistent reference implementation. Durable storage formats are out
//! of scope.

use crate::types::{AccessCredential, ScopeSet};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Narrow interface to the token store.
///
/// Lookups are keyed by (account, scopes, authority); a cached grant whose
/// scopes are a superset of the requested ones satisfies the request.
/// Expiry is judged by the caller, not the cache.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Find a cached access credential covering every requested scope for
    /// the account under the given authority.
    async fn lookup(
        &self,
        account_id: &str,
        scopes: &ScopeSet,
        authority: &str,
    ) -> Option<AccessCredential>;

    /// The refresh token stored for the account under the given authority.
    async fn refresh_token(&self, account_id: &str, authority: &str) -> Option<String>;

    /// Store a credential (and optionally a rotated refresh token) after a
    /// successful exchange or an initial sign-in.
    async fn store(
        &self,
        account_id: &str,
        authority: &str,
        credential: AccessCredential,
        refresh_token: Option<String>,
    );

    /// Remove every credential for the account. Returns true when anything
    /// was removed.
    async fn remove_account(&self, account_id: &str) -> bool;
}

#[derive(Default)]
struct AccountEntry {
    credentials: Vec<(String, AccessCredential)>, // (authority, credential)
    refresh_tokens: HashMap<String, String>,      // authority -> refresh token
}

/// Process-local token cache. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryTokenCache {
    entries: RwLock<HashMap<String, AccountEntry>>,
}

impl InMemoryTokenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn lookup(
        &self,
        account_id: &str,
        scopes: &ScopeSet,
        authority: &str,
    ) -> Option<AccessCredential> {
        let entries = self.entries.read();
        let entry = entries.get(account_id)?;
        entry
            .credentials
            .iter()
            .find(|(cred_authority, credential)| {
                cred_authority == authority && credential.scopes.contains_all(scopes)
            })
            .map(|(_, credential)| credential.clone())
    }

    async fn refresh_token(&self, account_id: &str, authority: &str) -> Option<String> {
        let entries = self.entries.read();
        entries
            .get(account_id)?
            .refresh_tokens
            .get(authority)
            .cloned()
    }

    async fn store(
        &self,
        account_id: &str,
        authority: &str,
        credential: AccessCredential,
        refresh_token: Option<String>,
    ) {
        let mut entries = self.entries.write();
        let entry = entries.entry(account_id.to_string()).or_default();

        // A new grant for the same (authority, scopes) replaces the old one.
        entry.credentials.retain(|(cred_authority, existing)| {
            cred_authority != authority || !credential.scopes.contains_all(&existing.scopes)
        });
        entry.credentials.push((authority.to_string(), credential));

        if let Some(refresh_token) = refresh_token {
            entry
                .refresh_tokens
                .insert(authority.to_string(), refresh_token);
        }
    }

    async fn remove_account(&self, account_id: &str) -> bool {
        self.entries.write().remove(account_id).is_some()
    }
}
