//! Background jobs

use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::services::IrrigationService;
use crate::AppState;

/// Start the irrigation reminder worker.
///
/// Every tick sends SMS reminders for schedules whose time has come and marks
/// them completed. A failed sweep is logged and retried on the next tick.
pub fn spawn_irrigation_reminders(state: AppState) -> JoinHandle<()> {
    let period = Duration::from_secs(state.config.irrigation.poll_interval_seconds.max(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval_secs = period.as_secs(), "irrigation reminder worker started");

        loop {
            ticker.tick().await;

            let service = IrrigationService::new(state.db.clone());
            match service
                .process_due_schedules(state.sms.as_ref(), Utc::now())
                .await
            {
                Ok(0) => {}
                Ok(count) => tracing::debug!(count, "irrigation reminders sent"),
                Err(e) => tracing::error!(error = %e, "irrigation reminder sweep failed"),
            }
        }
    })
}
