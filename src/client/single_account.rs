//! The silent acquisition coordinator for single-account mode.
//!
//! At most one account is active at a time. The current-account slot is
//! owned exclusively by the client and guarded by a mutex, so sign-in,
//! sign-out and refresh serialize (single-writer discipline) and readers
//! always observe a consistent snapshot. Transitions are reported through
//! [`get_current_account`](SingleAccountClient::get_current_account), which
//! compares the slot against the account it last reported and emits an
//! [`AccountChange`] exactly once per transition; the slot is never
//! observed going from empty to occupied (or back) without one.
//!
//! Each acquisition call walks a fixed path with no observable intermediate
//! states and no cross-call coalescing:
//!
//! ```text
//! Init → CacheLookup → CacheHit                → Done(success)
//!                    → CacheMiss/ForceRefresh  → NetworkExchange → Done
//! ```
//!
//! Retry behavior lives entirely in the request executor; this layer
//! propagates executor failures verbatim and adds none of its own.

use crate::client::cache::{InMemoryTokenCache, TokenCache};
use crate::client::config::{ClientConfig, RESERVED_SCOPES};
use crate::client::exchange;
use crate::client::subscription::{AccountChangeSubscription, ChangeObservers};
use crate::error::{AuthError, Result};
use crate::http::RequestExecutor;
use crate::types::{
    AccessCredential, Account, AccountChange, AuthenticationResult, CurrentAccount, ScopeSet,
    TokenRequest,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The current-account slot plus the account last reported to callers.
/// Both live under one lock so change detection can never race a writer.
#[derive(Default)]
struct AccountSlot {
    current: Option<Account>,
    last_reported: Option<Account>,
}

/// Coordinator for obtaining tokens without user interaction.
///
/// # Examples
///
/// ```ignore
/// use silent_auth::{ClientConfig, SingleAccountClient, TokenRequest};
///
/// let client = SingleAccountClient::new(ClientConfig::new(
///     "client-id",
///     "https://login.example.com/common",
/// ));
///
/// // Seeded from an interactive sign-in performed outside this crate:
/// client.sign_in(account, credential, Some(refresh_token)).await?;
///
/// let result = client
///     .acquire_token_silent(&TokenRequest::new(["user.read"]))
///     .await?;
/// ```
pub struct SingleAccountClient {
    config: ClientConfig,
    executor: RequestExecutor,
    cache: Arc<dyn TokenCache>,
    slot: Mutex<AccountSlot>,
    observers: ChangeObservers,
}

impl SingleAccountClient {
    /// Client with the production executor and an in-memory token cache.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_parts(config, RequestExecutor::new(), Arc::new(InMemoryTokenCache::new()))
    }

    /// Client with a custom executor and cache. This is the seam tests and
    /// embedders with their own cache use.
    pub fn with_parts(
        config: ClientConfig,
        executor: RequestExecutor,
        cache: Arc<dyn TokenCache>,
    ) -> Self {
        SingleAccountClient {
            config,
            executor,
            cache,
            slot: Mutex::new(AccountSlot::default()),
            observers: ChangeObservers::default(),
        }
    }

    /// Register an observer for account transitions.
    pub fn subscribe_account_changes(&self) -> AccountChangeSubscription {
        self.observers.subscribe()
    }

    /// Resolve the active account and report a transition when it differs
    /// from the previously reported one.
    ///
    /// Call this whenever the application resumes or before scheduled
    /// background work: the returned [`CurrentAccount::change`] (also
    /// delivered to observers) is how sign-outs and account switches that
    /// happened since the last report become visible.
    pub async fn get_current_account(&self) -> Result<CurrentAccount> {
        let mut slot = self.slot.lock().await;
        let current = slot.current.clone();

        let change = if slot.last_reported != current {
            let change = AccountChange {
                prior: slot.last_reported.clone(),
                current: current.clone(),
            };
            slot.last_reported = current.clone();
            self.observers.publish(&change);
            Some(change)
        } else {
            None
        };

        Ok(CurrentAccount {
            account: current,
            change,
        })
    }

    /// Seed the slot and cache from an externally obtained sign-in result.
    ///
    /// Interactive sign-in itself (UI, broker hand-off, consent) happens
    /// outside this crate; this consumes the resulting account and initial
    /// credentials. Fails with [`AuthError::AccountAlreadySignedIn`] when a
    /// different account occupies the slot; it must be signed out first.
    pub async fn sign_in(
        &self,
        account: Account,
        credential: AccessCredential,
        refresh_token: Option<String>,
    ) -> Result<()> {
        let mut slot = self.slot.lock().await;
        if let Some(existing) = &slot.current {
            if existing.id != account.id {
                return Err(AuthError::AccountAlreadySignedIn);
            }
        }

        self.cache
            .store(&account.id, &account.authority, credential, refresh_token)
            .await;

        tracing::info!(account = %account.id, "account signed in");
        slot.current = Some(account);
        Ok(())
    }

    /// Remove the current account and its credentials.
    ///
    /// Returns `Ok(true)` when an account was removed, `Ok(false)` when none
    /// was signed in. The next [`get_current_account`] call reports the
    /// prior → absent transition exactly once.
    ///
    /// [`get_current_account`]: SingleAccountClient::get_current_account
    pub async fn sign_out(&self) -> Result<bool> {
        let mut slot = self.slot.lock().await;
        let Some(account) = slot.current.take() else {
            return Ok(false);
        };

        self.cache.remove_account(&account.id).await;
        tracing::info!(account = %account.id, "account signed out");
        Ok(true)
    }

    /// Obtain an access token without user interaction.
    ///
    /// With `force_refresh` off, a non-expired cached credential for the
    /// (account, scopes, authority) tuple is returned without any network
    /// activity. Otherwise a refresh-token exchange runs through the
    /// request executor; success updates the cache, and executor failures
    /// surface to the caller unchanged. A sign-out completing while the
    /// exchange is in flight wins: the late token is discarded and the call
    /// fails with [`AuthError::NoCurrentAccount`].
    ///
    /// The requested scopes must exclude the reserved scopes
    /// (`openid`, `profile`, `offline_access`); the client appends them.
    pub async fn acquire_token_silent(
        &self,
        request: &TokenRequest,
    ) -> Result<AuthenticationResult> {
        let account = {
            let slot = self.slot.lock().await;
            slot.current.clone().ok_or(AuthError::NoCurrentAccount)?
        };

        let authority = self
            .config
            .effective_authority(request.authority.as_deref());
        let scopes = with_reserved_scopes(&request.scopes);

        if !request.force_refresh {
            if let Some(credential) = self.cache.lookup(&account.id, &scopes, &authority).await {
                if !credential.is_expired() {
                    tracing::debug!(account = %account.id, "served token from cache");
                    return Ok(result_from(credential, account, true));
                }
            }
        }

        let refresh_token = self
            .cache
            .refresh_token(&account.id, &authority)
            .await
            .ok_or(AuthError::CacheMiss)?;

        let outcome = exchange::redeem_refresh_token(
            &self.executor,
            &self.config,
            request.authority.as_deref(),
            &refresh_token,
            &scopes,
        )
        .await?;

        // The slot may have changed while the exchange was in flight. A
        // concurrent sign-out must win: storing here would undo its cache
        // purge, so the late result is discarded instead. The lock is held
        // across the store so no sign-out can slip in between.
        let slot = self.slot.lock().await;
        match &slot.current {
            Some(current) if current.id == account.id => {}
            _ => {
                tracing::warn!(
                    account = %account.id,
                    "account left the slot during refresh; discarding the token"
                );
                return Err(AuthError::NoCurrentAccount);
            }
        }
        self.cache
            .store(
                &account.id,
                &authority,
                outcome.credential.clone(),
                outcome.refresh_token,
            )
            .await;
        drop(slot);

        tracing::debug!(account = %account.id, "token refreshed over the network");
        Ok(result_from(outcome.credential, account, false))
    }
}

/// Requested scopes followed by the reserved set, deduplicated in order.
fn with_reserved_scopes(requested: &ScopeSet) -> ScopeSet {
    let mut scopes = requested.clone();
    for reserved in RESERVED_SCOPES {
        scopes.insert(reserved);
    }
    scopes
}

fn result_from(
    credential: AccessCredential,
    account: Account,
    from_cache: bool,
) -> AuthenticationResult {
    AuthenticationResult {
        access_token: credential.secret,
        scopes: credential.scopes,
        expires_on: credential.expires_on,
        account,
        from_cache,
    }
}
