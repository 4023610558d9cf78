//! Silent token acquisition for a single signed-in account.
//!
//! This module is the coordinator side of the crate: it decides, per call,
//! whether a cached credential satisfies a token request or whether a
//! refresh-token exchange has to run through the request executor, and it
//! reports the active account (plus account transitions) to callers and
//! observers.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── config         - ClientConfig and the reserved scope set
//! ├── cache          - TokenCache seam + InMemoryTokenCache
//! ├── exchange       - refresh-token grant (form body, JSON parsing)
//! ├── subscription   - account-change observer streams
//! └── single_account - SingleAccountClient coordinator
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SingleAccountClient`] | The coordinator; one active account at a time |
//! | [`ClientConfig`] | Client id + default authority |
//! | [`TokenCache`] | Narrow seam to the (external) token store |
//! | [`InMemoryTokenCache`] | Process-local reference cache |
//! | [`AccountChangeSubscription`] | Observer stream of account transitions |

mod cache;
mod config;
mod exchange;
mod single_account;
mod subscription;

pub use cache::{InMemoryTokenCache, TokenCache};
pub use config::{ClientConfig, RESERVED_SCOPES};
pub use single_account::SingleAccountClient;
pub use subscription::AccountChangeSubscription;
