use std::collections::HashSet;
use std::time::Duration;

use futures::{Stream, StreamExt};

/// How long the network must stay quiet before a page counts as loaded.
pub const NETWORK_IDLE_QUIET: Duration = Duration::from_millis(500);

/// Request lifecycle events, keyed by the browser's request id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    Started(String),
    /// Finished or failed.
    Settled(String),
}

/// Resolve once no request has been in flight for `quiet`.
///
/// If the event stream ends while requests are still outstanding the future
/// never resolves; callers bound it with a timeout.
pub async fn wait_for_idle<S>(events: S, quiet: Duration)
where
    S: Stream<Item = NetworkEvent>,
{
    let mut events = std::pin::pin!(events);
    let mut inflight = HashSet::new();
    loop {
        let next = if inflight.is_empty() {
            match tokio::time::timeout(quiet, events.next()).await {
                Ok(next) => next,
                Err(_) => return,
            }
        } else {
            events.next().await
        };

        match next {
            Some(NetworkEvent::Started(id)) => {
                inflight.insert(id);
            }
            Some(NetworkEvent::Settled(id)) => {
                inflight.remove(&id);
            }
            None if inflight.is_empty() => return,
            None => {
                tracing::debug!(
                    inflight = inflight.len(),
                    "network event stream closed with requests in flight"
                );
                std::future::pending::<()>().await;
            }
        }
    }
}
