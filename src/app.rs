use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use reqwest::Client;

use crate::{
    classifier::PhraseClassifier,
    config::AppConfig,
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    mailjet::{AlertSink, MailjetClient},
    state::StateStore,
    tasks::{monitor::MonitorLoop, report},
    web_content::WebContentFetcher,
};

pub struct MonitorApp {
    config: Arc<AppConfig>,
    shutdown: Shutdown,
    mailer: MailjetClient,
    monitor: MonitorLoop<WebContentFetcher, MailjetClient>,
}

impl MonitorApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        let config = Arc::new(config);

        let http_client = Client::builder()
            .user_agent(format!("visa-slot-monitor/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        let classifier = match &config.monitor.negative_phrases {
            Some(phrases) => PhraseClassifier::new(phrases),
            None => PhraseClassifier::default(),
        };
        tracing::debug!(target: "classifier", phrases = classifier.phrases().len(), "classifier ready");
        let fetcher = WebContentFetcher::new(http_client.clone(), config.fetch.clone());
        let mailer = MailjetClient::new(http_client, config.mailjet.clone());
        let store = StateStore::new(paths.state_path);

        let monitor = MonitorLoop::new(fetcher, mailer.clone(), classifier, store, config.clone());

        Ok(Self {
            config,
            shutdown,
            mailer,
            monitor,
        })
    }

    pub async fn run(self) -> Result<()> {
        tracing::info!(
            target: "lifecycle",
            interval_minutes = self.config.monitor.check_interval.as_secs() / 60,
            urls = self.config.monitor.urls.len(),
            "starting safe F-1 monitor"
        );
        if self.config.mailjet.credentials().is_none() {
            tracing::warn!(target: "mailjet", "mailjet not fully configured; alerts will be skipped");
        }

        let mut listener = self.shutdown.subscribe();
        self.monitor.run(&mut listener).await;
        tracing::info!(target: "lifecycle", "monitor exited");
        Ok(())
    }

    /// Single check cycle, then exit.
    pub async fn run_once(self) -> Result<()> {
        let mut state = self.monitor.load_state();
        let mut listener = self.shutdown.subscribe();
        tokio::select! {
            res = self.monitor.run_cycle(&mut state) => {
                let summary = res.context("check cycle failed")?;
                tracing::info!(
                    target: "lifecycle",
                    checked = summary.checked,
                    changes = summary.changes.len(),
                    notified = summary.notified,
                    "single check finished"
                );
            }
            _ = listener.notified() => {
                tracing::info!(target: "lifecycle", "interrupted during check");
            }
        }
        Ok(())
    }

    /// Sends one synthetic alert without touching any monitored page.
    pub async fn send_test(self) -> Result<()> {
        let body = report::build_test_message(self.config.monitor.alert_url(), Utc::now());

        match self.mailer.send(report::TEST_SUBJECT, &body).await {
            Ok(receipt) => {
                tracing::info!(target: "mailjet", status = receipt.status.as_u16(), "test send succeeded");
                Ok(())
            }
            Err(err) => {
                tracing::error!(target: "mailjet", error = %err, "test send failed");
                bail!("test send failed: {err}")
            }
        }
    }
}
