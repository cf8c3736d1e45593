use std::{
    panic::AssertUnwindSafe,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Utc;
use futures::FutureExt;
use tokio::time::sleep;

use crate::{
    classifier::PhraseClassifier,
    config::AppConfig,
    domain::{ChangeRecord, StateMap},
    infrastructure::shutdown::ShutdownListener,
    mailjet::AlertSink,
    state::{StateError, StateStore},
    tasks::report,
    web_content::PageSource,
};

const JITTER_RATIO: u64 = 10;

#[derive(Debug, Default)]
pub struct CycleReport {
    pub checked: usize,
    pub changes: Vec<ChangeRecord>,
    pub notified: bool,
}

pub struct MonitorLoop<S, N> {
    source: S,
    notifier: N,
    classifier: PhraseClassifier,
    store: StateStore,
    config: Arc<AppConfig>,
    // In-memory labels that have not reached disk yet.
    unsaved: AtomicBool,
}

impl<S: PageSource, N: AlertSink> MonitorLoop<S, N> {
    pub fn new(
        source: S,
        notifier: N,
        classifier: PhraseClassifier,
        store: StateStore,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            source,
            notifier,
            classifier,
            store,
            config,
            unsaved: AtomicBool::new(false),
        }
    }

    pub fn load_state(&self) -> StateMap {
        self.store.load()
    }

    /// Runs until shutdown. Cycle failures (errors or panics) back off and retry.
    pub async fn run(&self, shutdown: &mut ShutdownListener) {
        let mut state = self.store.load();
        loop {
            if shutdown.is_triggered() {
                break;
            }

            let cycle = AssertUnwindSafe(self.run_cycle(&mut state)).catch_unwind();
            let pause = tokio::select! {
                outcome = cycle => match outcome {
                    Ok(Ok(summary)) => {
                        let wait = jittered(self.config.monitor.check_interval, random_u64());
                        if summary.changes.is_empty() {
                            tracing::info!(
                                target: "monitor",
                                checked = summary.checked,
                                sleep_secs = wait.as_secs(),
                                "no changes"
                            );
                        }
                        wait
                    }
                    Ok(Err(err)) => {
                        tracing::error!(target: "monitor", error = %err, "check cycle failed; backing off");
                        self.config.monitor.error_backoff
                    }
                    Err(_) => {
                        tracing::error!(target: "monitor", "check cycle panicked; backing off");
                        self.config.monitor.error_backoff
                    }
                },
                _ = shutdown.notified() => {
                    tracing::info!(target: "monitor", "shutdown requested during check cycle");
                    break;
                }
            };

            tokio::select! {
                _ = sleep(pause) => {}
                _ = shutdown.notified() => break,
            }
        }
        tracing::info!(target: "monitor", "monitor stopped");
    }

    /// Fetch, classify and diff every URL; notify and persist only when something changed
    /// or an earlier save failed.
    pub async fn run_cycle(&self, state: &mut StateMap) -> Result<CycleReport, StateError> {
        let mut summary = CycleReport::default();

        for url in &self.config.monitor.urls {
            tracing::info!(target: "monitor", url = %url, "checking");
            let text = match self.source.fetch(url).await {
                Ok(body) => body,
                Err(err) => {
                    tracing::warn!(target: "fetch", url = %url, error = %err, "fetch failed");
                    String::new()
                }
            };

            let current = self.classifier.classify(&text);
            let previous = state.get(url).copied().unwrap_or_default();
            if previous != current {
                tracing::info!(target: "monitor", url = %url, %previous, %current, "status changed");
                summary.changes.push(ChangeRecord {
                    url: url.clone(),
                    previous,
                    current,
                });
            }
            state.insert(url.clone(), current);
            summary.checked += 1;
        }

        if summary.changes.is_empty() {
            if self.unsaved.load(Ordering::Relaxed) {
                tracing::info!(target: "state", "retrying state save from an earlier cycle");
                self.persist(state)?;
            }
            return Ok(summary);
        }

        let body = report::build_message(&summary.changes, Utc::now());
        summary.notified = match self.notifier.send(report::ALERT_SUBJECT, &body).await {
            Ok(receipt) => {
                tracing::info!(target: "monitor", status = receipt.status.as_u16(), changes = summary.changes.len(), "alert sent");
                true
            }
            Err(err) => {
                tracing::warn!(target: "monitor", error = %err, "alert NOT sent");
                false
            }
        };

        self.persist(state)?;
        Ok(summary)
    }

    fn persist(&self, state: &StateMap) -> Result<(), StateError> {
        match self.store.save(state) {
            Ok(()) => {
                self.unsaved.store(false, Ordering::Relaxed);
                Ok(())
            }
            Err(err) => {
                self.unsaved.store(true, Ordering::Relaxed);
                Err(err)
            }
        }
    }
}

/// `base` shifted by a uniform offset within +/-10%, in whole seconds.
pub fn jittered(base: Duration, entropy: u64) -> Duration {
    let base_secs = base.as_secs();
    let spread = base_secs / JITTER_RATIO;
    if spread == 0 {
        return base;
    }
    let offset = entropy % (2 * spread + 1);
    Duration::from_secs(base_secs - spread + offset)
}

fn random_u64() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(_) => u64::from(Utc::now().timestamp_subsec_nanos()),
    }
}
