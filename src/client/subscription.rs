//! Account-change observation.
//!
//! Observers register through
//! [`SingleAccountClient::subscribe_account_changes`] and receive every
//! [`AccountChange`] the client reports, in order. A change is delivered
//! exactly once per transition; dropping the subscription unregisters the
//! observer.
//!
//! # Examples
//!
//! ```ignore
//! use silent_auth::{ClientConfig, SingleAccountClient};
//!
//! let client = SingleAccountClient::new(config);
//! let mut changes = client.subscribe_account_changes();
//!
//! while let Some(change) = changes.next().await {
//!     println!("account changed: {:?} -> {:?}", change.prior, change.current);
//! }
//! ```
//!
//! [`SingleAccountClient::subscribe_account_changes`]: crate::SingleAccountClient::subscribe_account_changes

use crate::types::AccountChange;
use futures::Stream;
use parking_lot::Mutex;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

const CHANNEL_CAPACITY: usize = 16;

/// A read-only stream of account transitions.
///
/// Implements [`Stream`], so `StreamExt` combinators work, and offers an
/// async [`next`](AccountChangeSubscription::next) for plain loops. Returns
/// `None` once the client has been dropped.
pub struct AccountChangeSubscription {
    receiver: mpsc::Receiver<AccountChange>,
}

impl AccountChangeSubscription {
    /// The next account transition, or `None` when the client is gone.
    pub async fn next(&mut self) -> Option<AccountChange> {
        self.receiver.recv().await
    }

    /// Convert into a plain [`ReceiverStream`] for use where an owned,
    /// `Unpin` stream type is required.
    pub fn into_stream(self) -> ReceiverStream<AccountChange> {
        ReceiverStream::new(self.receiver)
    }
}

impl Stream for AccountChangeSubscription {
    type Item = AccountChange;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Registry of observer channels. Owned by the client; senders for dropped
/// subscriptions are pruned on the next publish.
#[derive(Default)]
pub(crate) struct ChangeObservers {
    senders: Mutex<Vec<mpsc::Sender<AccountChange>>>,
}

impl ChangeObservers {
    pub(crate) fn subscribe(&self) -> AccountChangeSubscription {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        self.senders.lock().push(tx);
        AccountChangeSubscription { receiver: rx }
    }

    /// Deliver a change to every live observer. A full or closed channel
    /// never fails the operation that produced the change; slow observers
    /// just miss the event.
    pub(crate) fn publish(&self, change: &AccountChange) {
        self.senders.lock().retain(|sender| {
            match sender.try_send(change.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Closed(_)) => false,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!("account-change observer is not keeping up, dropping event");
                    true
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Account;

    fn account(id: &str) -> Account {
        Account {
            id: id.to_string(),
            home_account_id: id.to_string(),
            tenant_id: "t".to_string(),
            authority: "https://login.example.com/t".to_string(),
            username: format!("{id}@example.com"),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let observers = ChangeObservers::default();
        let mut first = observers.subscribe();
        let mut second = observers.subscribe();

        let change = AccountChange {
            prior: None,
            current: Some(account("a")),
        };
        observers.publish(&change);

        assert_eq!(first.next().await.unwrap(), change);
        assert_eq!(second.next().await.unwrap(), change);
    }

    #[tokio::test]
    async fn test_dropped_subscription_is_pruned() {
        let observers = ChangeObservers::default();
        let subscription = observers.subscribe();
        drop(subscription);

        observers.publish(&AccountChange {
            prior: None,
            current: None,
        });
        assert!(observers.senders.lock().is_empty());
    }

    #[tokio::test]
    async fn test_stream_impl_yields_changes() {
        use futures::StreamExt;

        let observers = ChangeObservers::default();
        let subscription = observers.subscribe();

        let change = AccountChange {
            prior: Some(account("a")),
            current: None,
        };
        observers.publish(&change);
        drop(observers);

        let collected: Vec<_> = subscription.collect().await;
        assert_eq!(collected, vec![change]);
    }
}
