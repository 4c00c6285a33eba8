use super::clock::{local_offset, now_local, Clock};
use super::dispatch::DispatchService;
use crate::error::Result;
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveDate, NaiveTime};
use std::time::Duration;

/// How often the loop checks for due jobs
pub const TICK_INTERVAL: Duration = Duration::from_secs(60);

fn at_local(date: NaiveDate, time: NaiveTime) -> DateTime<FixedOffset> {
    let offset = local_offset();
    DateTime::from_naive_utc_and_offset(date.and_time(time) - offset, offset)
}

/// Daily jobs at fixed UTC+8 wall-clock times
///
/// A job whose time has already passed when the schedule is created first
/// runs the next day. Missed runs are not replayed.
#[derive(Debug, Clone)]
pub struct DailySchedule {
    next_runs: Vec<DateTime<FixedOffset>>,
}

impl DailySchedule {
    pub fn new(times: &[NaiveTime], now: DateTime<FixedOffset>) -> Self {
        let today = now.date_naive();
        let next_runs = times
            .iter()
            .map(|&time| {
                let candidate = at_local(today, time);
                if candidate > now {
                    candidate
                } else {
                    candidate + ChronoDuration::days(1)
                }
            })
            .collect();

        Self { next_runs }
    }

    /// Number of jobs due at `now`; each due job is moved to its next day
    pub fn take_due(&mut self, now: DateTime<FixedOffset>) -> usize {
        let mut due = 0;
        for next in &mut self.next_runs {
            if *next <= now {
                due += 1;
                while *next <= now {
                    *next += ChronoDuration::days(1);
                }
            }
        }
        due
    }

    pub fn next_run(&self) -> Option<DateTime<FixedOffset>> {
        self.next_runs.iter().min().copied()
    }
}

/// Runs the dispatch cycle on schedule until Ctrl+C
pub struct Scheduler {
    dispatch: DispatchService,
    schedule: DailySchedule,
}

impl Scheduler {
    pub fn new(dispatch: DispatchService, times: &[NaiveTime]) -> Self {
        let now = now_local(dispatch.clock().as_ref());
        Self {
            schedule: DailySchedule::new(times, now),
            dispatch,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let clock = self.dispatch.clock();

        for time in &self.schedule.next_runs {
            tracing::info!("Scheduled daily send at {}", time.format("%H:%M"));
        }
        if let Some(next) = self.schedule.next_run() {
            tracing::info!("Next send at {}", next.format("%Y-%m-%d %H:%M %:z"));
        }
        tracing::info!("Scheduler started, press Ctrl+C to stop...");

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Scheduler stopped");
                    break;
                }
                _ = interval.tick() => {
                    self.tick(clock.as_ref()).await;
                }
            }
        }

        Ok(())
    }

    async fn tick(&mut self, clock: &dyn Clock) {
        let due = self.schedule.take_due(now_local(clock));
        for _ in 0..due {
            tracing::info!("Scheduled send triggered");
            // A failed cycle never stops the loop
            if let Err(e) = self.dispatch.run_cycle().await {
                tracing::debug!("Cycle failed: {}", e);
            }
        }
    }
}
