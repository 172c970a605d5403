//! Block-ready notification.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::observability::metrics;

/// One-way signal that new transactions are waiting for a block.
///
/// Implementations must never block the caller.
pub trait BlockNotifier: Send + Sync {
    fn notify_block_ready(&self);
}

/// Notifier backed by a bounded channel.
///
/// The consumer drains the whole pool on every signal, so a full channel
/// already guarantees that a pending admission will be picked up.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<()>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver the block producer listens on.
    ///
    /// `buffer` must be at least 1.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }
}

impl BlockNotifier for ChannelNotifier {
    fn notify_block_ready(&self) {
        match self.tx.try_send(()) {
            Ok(()) => metrics::record_notification("sent"),
            Err(TrySendError::Full(())) => {
                tracing::debug!("Block-ready signal already pending");
                metrics::record_notification("coalesced");
            }
            Err(TrySendError::Closed(())) => {
                tracing::warn!("Block producer is not listening; signal dropped");
                metrics::record_notification("closed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signal_delivered() {
        let (notifier, mut rx) = ChannelNotifier::channel(4);
        notifier.notify_block_ready();
        assert_eq!(rx.recv().await, Some(()));
    }

    #[tokio::test]
    async fn test_full_channel_does_not_block() {
        let (notifier, mut rx) = ChannelNotifier::channel(1);
        notifier.notify_block_ready();
        notifier.notify_block_ready();
        notifier.notify_block_ready();

        assert_eq!(rx.recv().await, Some(()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_does_not_panic() {
        let (notifier, rx) = ChannelNotifier::channel(1);
        drop(rx);
        notifier.notify_block_ready();
    }
}
