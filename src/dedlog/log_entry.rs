use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::error;

use super::sanitizer::{Sanitizer, WithCollapseSpaces};
use super::COMPONENT;

const FLUSH_INTERVAL: Duration = Duration::from_secs(5);
const QUEUE_SIZE: usize = 1024;

/// Log entry for deduplication
struct LogEntry {
    err: Option<String>,
    reason: String,
    extra: Option<String>,
    count: usize,
}

impl LogEntry {
    fn key(&self) -> String {
        match &self.extra {
            Some(extra) => format!("{}|{}", self.reason, extra),
            None => self.reason.clone(),
        }
    }
}

static ERR_CH: Mutex<Option<mpsc::Sender<LogEntry>>> = Mutex::new(None);

fn get_err_ch() -> Option<mpsc::Sender<LogEntry>> {
    ERR_CH.try_lock().ok().and_then(|guard| guard.clone())
}

fn set_err_ch(tx: Option<mpsc::Sender<LogEntry>>) {
    if let Ok(mut guard) = ERR_CH.lock() {
        *guard = tx;
    }
}

/// Queues an error for aggregated logging. Never blocks; entries are
/// dropped when the logger is not running or its queue is full.
pub fn err(err: Option<&dyn std::error::Error>, extra: Option<&str>, msg: &str) {
    if let Some(tx) = get_err_ch() {
        let entry = LogEntry {
            err: err.map(|e| e.to_string()),
            reason: msg.to_string(),
            extra: extra.map(|s| s.to_string()),
            count: 1,
        };
        let _ = tx.try_send(entry);
    }
}

/// Runs the deduplicated logger until `ctx` is cancelled.
pub async fn start_dedup_logger(ctx: CancellationToken) {
    let (tx, mut rx) = mpsc::channel(QUEUE_SIZE);
    set_err_ch(Some(tx));

    let mut window: HashMap<String, LogEntry> = HashMap::new();
    let mut interval = tokio::time::interval(FLUSH_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let sanitizer = Sanitizer::new(WithCollapseSpaces(true));

    loop {
        tokio::select! {
            _ = ctx.cancelled() => {
                flush(&sanitizer, &mut window);
                set_err_ch(None);
                break;
            }
            entry = rx.recv() => {
                let Some(entry) = entry else { break };
                let key = entry.key();
                match window.get_mut(&key) {
                    Some(existing) => {
                        existing.count += 1;
                        // Keep the most recent cause.
                        if entry.err.is_some() {
                            existing.err = entry.err;
                        }
                    }
                    None => {
                        window.insert(key, entry);
                    }
                }
            }
            _ = interval.tick() => {
                flush(&sanitizer, &mut window);
            }
        }
    }
}

fn flush(sanitizer: &Sanitizer, window: &mut HashMap<String, LogEntry>) {
    for (_, entry) in window.drain() {
        let err = entry.err.as_deref().map(|e| sanitizer.sanitize(e)).unwrap_or_default();
        let extra = entry.extra.as_deref().unwrap_or_default();
        error!(
            component = COMPONENT,
            count = entry.count,
            err = %err,
            extra = %extra,
            "{}", entry.reason
        );
    }
}
