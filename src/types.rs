//! Core data types: accounts, scopes, credentials, and acquisition results.
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Account`] | A signed-in identity (opaque id + home/tenant claims) |
//! | [`ScopeSet`] | Ordered, deduplicated set of requested scopes |
//! | [`AccessCredential`] | A cached access token with its scopes and expiry |
//! | [`TokenRequest`] | Descriptor for one silent acquisition call |
//! | [`AuthenticationResult`] | Successful acquisition outcome |
//! | [`AccountChange`] | A prior → current account transition |
//! | [`CurrentAccount`] | Snapshot returned by `get_current_account` |
//!
//! All of these are plain immutable values; the coordinator hands out clones,
//! never shared mutable references.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Clock-skew buffer applied when judging whether a cached credential is
/// still usable. A token within this window of its expiry is treated as
/// expired and refreshed.
pub const EXPIRY_BUFFER: Duration = Duration::from_secs(300);

/// A signed-in account.
///
/// The identifier is opaque to this layer; the claims describe where the
/// account came from so cache lookups can be keyed on
/// (account, scopes, authority).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque, stable identifier for the account.
    pub id: String,
    /// Home account identifier claim (user + tenant).
    pub home_account_id: String,
    /// Tenant/realm the account belongs to.
    pub tenant_id: String,
    /// Authority the account was obtained from.
    pub authority: String,
    /// Display username. Informational only.
    pub username: String,
}

/// An ordered set of OAuth scopes with insertion-order deduplication.
///
/// # Examples
///
/// ```
/// use silent_auth::ScopeSet;
///
/// let mut scopes = ScopeSet::new(["user.read", "mail.read", "user.read"]);
/// assert_eq!(scopes.as_slice(), ["user.read", "mail.read"]);
///
/// scopes.insert("files.read");
/// assert_eq!(scopes.join(), "user.read mail.read files.read");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSet(Vec<String>);

impl ScopeSet {
    /// Build a scope set from an iterator, dropping duplicates while keeping
    /// first-insertion order.
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = ScopeSet(Vec::new());
        for scope in scopes {
            set.insert(scope);
        }
        set
    }

    /// Insert a scope if not already present. Comparison is case-sensitive;
    /// scope strings are passed through verbatim.
    pub fn insert<S: Into<String>>(&mut self, scope: S) {
        let scope = scope.into();
        if !scope.is_empty() && !self.0.contains(&scope) {
            self.0.push(scope);
        }
    }

    /// The scopes in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of scopes in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the set holds no scopes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Space-joined form, as sent in the `scope` parameter of a token grant.
    pub fn join(&self) -> String {
        self.0.join(" ")
    }

    /// True when every scope in `other` is present in `self`, regardless of
    /// order. Cache lookups use this to let a broader cached grant satisfy a
    /// narrower request.
    pub fn contains_all(&self, other: &ScopeSet) -> bool {
        other.0.iter().all(|s| self.0.contains(s))
    }
}

/// A cached access token together with the scopes it was granted for and its
/// absolute expiry time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCredential {
    /// The access token secret.
    pub secret: String,
    /// Scopes the token was granted for.
    pub scopes: ScopeSet,
    /// Absolute expiry time.
    pub expires_on: SystemTime,
}

impl AccessCredential {
    /// Whether the credential is expired (or within [`EXPIRY_BUFFER`] of
    /// expiring) at the given instant.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        now + EXPIRY_BUFFER >= self.expires_on
    }

    /// Whether the credential is expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemTime::now())
    }
}

/// Descriptor for a single silent acquisition call.
///
/// The requested scopes must not include the reserved scopes the client
/// always sends (`openid`, `profile`, `offline_access`); those are appended
/// automatically. This is a caller contract, not defensively enforced.
///
/// # Examples
///
/// ```
/// use silent_auth::TokenRequest;
///
/// let request = TokenRequest::new(["user.read"])
///     .with_authority("https://login.example.com/tenant")
///     .force_refresh(true);
/// assert!(request.force_refresh);
/// ```
#[derive(Debug, Clone)]
pub struct TokenRequest {
    /// Scopes to request, excluding the reserved set.
    pub scopes: ScopeSet,
    /// Authority override; defaults to the configured authority when `None`.
    pub authority: Option<String>,
    /// When true, skip the cache lookup and always perform a network
    /// exchange.
    pub force_refresh: bool,
}

impl TokenRequest {
    /// Create a request for the given scopes with no authority override and
    /// `force_refresh` off.
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TokenRequest {
            scopes: ScopeSet::new(scopes),
            authority: None,
            force_refresh: false,
        }
    }

    /// Override the authority for this request only.
    pub fn with_authority<S: Into<String>>(mut self, authority: S) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Set the force-refresh flag.
    pub fn force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }
}

/// The outcome of a successful token acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationResult {
    /// The access token to attach to API calls.
    pub access_token: String,
    /// Scopes the token is valid for.
    pub scopes: ScopeSet,
    /// Absolute expiry time of the token.
    pub expires_on: SystemTime,
    /// The account the token was issued for.
    pub account: Account,
    /// True when the token came straight from the cache without a network
    /// call.
    pub from_cache: bool,
}

/// A transition of the current-account slot.
///
/// Either side may be `None`: `prior == None` represents the initial
/// sign-in, `current == None` represents sign-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountChange {
    /// The previously reported account, if any.
    pub prior: Option<Account>,
    /// The account active now, if any.
    pub current: Option<Account>,
}

/// Snapshot returned by `get_current_account`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAccount {
    /// The active account, or `None` when nobody is signed in.
    pub account: Option<Account>,
    /// Present when the account differs from the one previously reported;
    /// the same change is delivered to registered observers.
    pub change: Option<AccountChange>,
}
