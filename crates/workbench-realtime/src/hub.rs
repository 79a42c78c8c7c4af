//! In-process fan-out of reload signals.

use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

/// A signal pushed to connected browsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadEvent {
    /// First event of every stream.
    Connected,
    /// A watched asset changed.
    Reload {
        /// Changed file, for logging only.
        path: String,
    },
}

impl ReloadEvent {
    /// Payload written to the event stream.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Reload { .. } => "reload",
        }
    }
}

/// Broadcast hub for reload signals.
///
/// Subscribers that fall behind skip the missed signals; a single reload
/// after a burst is enough for a browser.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    tx: broadcast::Sender<ReloadEvent>,
}

impl ReloadHub {
    /// Create a hub whose subscribers buffer up to `buffer_size` signals.
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size.max(1));
        Self { tx }
    }

    /// Subscribe to raw reload signals.
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.tx.subscribe()
    }

    /// Broadcast a reload for `path`, returning how many subscribers got it.
    pub fn notify_reload(&self, path: impl Into<String>) -> usize {
        let path = path.into();
        match self.tx.send(ReloadEvent::Reload { path: path.clone() }) {
            Ok(count) => {
                tracing::info!(path = %path, clients = count, "Reload signal sent");
                count
            }
            Err(_) => {
                tracing::debug!(path = %path, "Reload signal dropped, no clients connected");
                0
            }
        }
    }

    /// Number of live subscribers.
    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Subscribe and return a stream that starts with [`ReloadEvent::Connected`].
    ///
    /// The subscription is taken immediately, so signals sent after this
    /// call returns are never missed.
    pub fn stream(&self) -> impl Stream<Item = ReloadEvent> + Send + 'static + use<> {
        let rx = self.tx.subscribe();
        let updates = stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => return Some((event, rx)),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Reload subscriber lagged");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });
        stream::once(async { ReloadEvent::Connected }).chain(updates)
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_starts_connected_then_relays() {
        let hub = ReloadHub::new(4);
        let mut events = Box::pin(hub.stream());

        assert_eq!(hub.client_count(), 1);
        assert_eq!(hub.notify_reload("public/app.js"), 1);

        assert_eq!(events.next().await, Some(ReloadEvent::Connected));
        let next = events.next().await.unwrap();
        assert_eq!(next.as_str(), "reload");
    }

    #[tokio::test]
    async fn test_notify_without_clients_is_harmless() {
        let hub = ReloadHub::default();
        assert_eq!(hub.client_count(), 0);
        assert_eq!(hub.notify_reload("index.html"), 0);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_to_latest() {
        let hub = ReloadHub::new(1);
        let mut events = Box::pin(hub.stream());
        hub.notify_reload("a.js");
        hub.notify_reload("b.js");

        assert_eq!(events.next().await, Some(ReloadEvent::Connected));
        assert_eq!(
            events.next().await,
            Some(ReloadEvent::Reload { path: "b.js".into() })
        );
    }

    #[tokio::test]
    async fn test_stream_ends_when_hub_dropped() {
        let hub = ReloadHub::new(2);
        let mut events = Box::pin(hub.stream());
        drop(hub);

        assert_eq!(events.next().await, Some(ReloadEvent::Connected));
        assert_eq!(events.next().await, None);
    }
}
