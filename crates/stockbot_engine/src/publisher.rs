use std::sync::{Arc, Mutex, MutexGuard, Weak};

use stockbot_core::{LogEntry, LogLevel};
use stockbot_logging::{bot_error, bot_info, bot_warn};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    senders: Vec<(SubscriptionId, mpsc::UnboundedSender<LogEntry>)>,
}

/// Fan-out of run log entries to any number of subscribers.
///
/// Each subscriber gets its own unbounded queue, so a slow reader never drops
/// or reorders entries. Entries are also mirrored to the diagnostic log.
#[derive(Clone, Default)]
pub struct LogPublisher {
    inner: Arc<Mutex<Subscribers>>,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, entry: LogEntry) {
        match entry.level() {
            LogLevel::Info | LogLevel::Step => bot_info!("[{}] {}", entry.level(), entry.message()),
            LogLevel::Warning => bot_warn!("{}", entry.message()),
            LogLevel::Error => bot_error!("{}", entry.message()),
        }
        self.lock()
            .senders
            .retain(|(_, tx)| tx.send(entry.clone()).is_ok());
    }

    /// Convenience for publishing a freshly stamped entry.
    pub fn emit(&self, message: impl Into<String>, level: LogLevel) {
        self.publish(LogEntry::now(message, level));
    }

    pub fn subscribe(&self) -> LogSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscribers = self.lock();
        subscribers.next_id += 1;
        let id = SubscriptionId(subscribers.next_id);
        subscribers.senders.push((id, tx));
        LogSubscription {
            id,
            rx,
            publisher: Arc::downgrade(&self.inner),
        }
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove(&self.inner, id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().senders.len()
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn remove(inner: &Mutex<Subscribers>, id: SubscriptionId) -> bool {
    let mut subscribers = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let before = subscribers.senders.len();
    subscribers.senders.retain(|(sid, _)| *sid != id);
    subscribers.senders.len() != before
}

/// Receiving end of a subscription. Dropping it unsubscribes.
pub struct LogSubscription {
    id: SubscriptionId,
    rx: mpsc::UnboundedReceiver<LogEntry>,
    publisher: Weak<Mutex<Subscribers>>,
}

impl LogSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next entry; `None` once unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<LogEntry> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<LogEntry> {
        self.rx.try_recv().ok()
    }

    /// Everything queued right now, in publish order.
    pub fn drain(&mut self) -> Vec<LogEntry> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl Drop for LogSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.publisher.upgrade() {
            remove(&inner, self.id);
        }
    }
}
