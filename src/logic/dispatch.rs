use super::clock::{now_local, Clock, SystemClock};
use super::rain::RainDetector;
use super::RulesEngine;
use crate::config::Config;
use crate::datasources::{QWeatherClient, WeatherSource};
use crate::delivery::{Mailer, SmtpMailer};
use crate::error::Result;
use crate::render::{EmailComposer, EmailContent};
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one send cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub sent: usize,
    pub failed: usize,
}

impl CycleReport {
    pub fn succeeded(&self) -> bool {
        self.sent > 0
    }
}

/// Fetch, compose and deliver, one recipient at a time
pub struct DispatchService {
    source: Box<dyn WeatherSource>,
    mailer: Box<dyn Mailer>,
    composer: EmailComposer,
    clock: Arc<dyn Clock>,
    recipients: Vec<String>,
    pause: Duration,
}

impl DispatchService {
    pub fn new(
        source: Box<dyn WeatherSource>,
        mailer: Box<dyn Mailer>,
        composer: EmailComposer,
        clock: Arc<dyn Clock>,
        recipients: Vec<String>,
        pause: Duration,
    ) -> Self {
        Self {
            source,
            mailer,
            composer,
            clock,
            recipients,
            pause,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let engine = RulesEngine::new(config.keywords.clone(), config.advice.closing_rule());
        let composer = EmailComposer::new(engine, RainDetector::from_table(&config.keywords));

        if config.recipients.is_empty() {
            tracing::warn!("No recipients configured - cycles will not send email");
        }

        Ok(Self::new(
            Box::new(QWeatherClient::new(config.weather.clone())?),
            Box::new(SmtpMailer::new(config.smtp.clone())),
            composer,
            Arc::new(SystemClock),
            config.recipients.clone(),
            Duration::from_millis(config.smtp.pause_ms),
        ))
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Fetch fresh data and compose the message without sending it
    pub async fn compose_now(&self) -> Result<EmailContent> {
        let report = self.source.fetch_report().await?;
        let local_time = now_local(self.clock.as_ref());

        let mut rng = rand::thread_rng();
        Ok(self.composer.compose(&report, local_time, &mut rng))
    }

    pub async fn run_cycle(&self) -> Result<CycleReport> {
        tracing::info!("Starting weather email cycle");

        let content = match self.compose_now().await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to fetch weather, skipping cycle: {}", e);
                return Err(e);
            }
        };

        if self.recipients.is_empty() {
            tracing::warn!("No recipients configured");
            return Ok(CycleReport::default());
        }

        let mut report = CycleReport::default();
        for (i, to) in self.recipients.iter().enumerate() {
            match self.mailer.send(to, &content.subject, &content.html).await {
                Ok(()) => {
                    tracing::info!("Email sent: {}", to);
                    report.sent += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to send to {}: {}", to, e);
                    report.failed += 1;
                }
            }

            // Stay under provider rate limits
            if i + 1 < self.recipients.len() && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }

        if report.succeeded() {
            tracing::info!(
                sent = report.sent,
                failed = report.failed,
                "Weather email cycle finished"
            );
        } else {
            tracing::error!(failed = report.failed, "Weather email cycle delivered nothing");
        }

        Ok(report)
    }
}
