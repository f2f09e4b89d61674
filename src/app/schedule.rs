//! Weekly trigger for the refresh job.
//!
//! Precondition: at most one pipeline run executes at a time. [`run_weekly`]
//! awaits each run before computing the next fire time, so a single scheduler
//! process satisfies it; when the job is driven by CI cron instead, the
//! workflow's concurrency group owns the guarantee. Nothing here takes a lock.

use crate::config::toml_config::ScheduleConfig;
use crate::utils::error::Result;
use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyTrigger {
    pub weekday: Weekday,
    pub time: NaiveTime,
}

impl WeeklyTrigger {
    pub fn new(weekday: Weekday, hour: u32, minute: u32) -> Option<Self> {
        Some(Self {
            weekday,
            time: NaiveTime::from_hms_opt(hour, minute, 0)?,
        })
    }

    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        let weekday = config.weekday()?;
        Self::new(weekday, config.hour, config.minute).ok_or_else(|| {
            crate::utils::error::SyncError::InvalidConfigValueError {
                field: "schedule".to_string(),
                value: format!("{:02}:{:02}", config.hour, config.minute),
                reason: "Not a valid time of day".to_string(),
            }
        })
    }

    /// First fire time strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days_ahead = (7 + self.weekday.num_days_from_monday() as i64
            - now.weekday().num_days_from_monday() as i64)
            % 7;
        let candidate = (now.date_naive() + Duration::days(days_ahead))
            .and_time(self.time)
            .and_utc();

        if candidate > now {
            candidate
        } else {
            candidate + Duration::days(7)
        }
    }
}

/// Runs `job` at every trigger, forever. Runs never overlap.
pub async fn run_weekly<F, Fut>(trigger: WeeklyTrigger, mut job: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    loop {
        let now = Utc::now();
        let next = trigger.next_after(now);
        tracing::info!("⏰ Next refresh scheduled for {}", next.to_rfc3339());

        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        if let Err(e) = job().await {
            // 排程不因單次失敗中止
            tracing::error!(
                "❌ Scheduled refresh failed: {} (Severity: {:?})",
                e,
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        }
    }
}
