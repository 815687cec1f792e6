//! Irrigation schedule models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle of an irrigation schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IrrigationStatus {
    #[default]
    Pending,
    Completed,
}

impl IrrigationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationStatus::Pending => "pending",
            IrrigationStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for IrrigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IrrigationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(IrrigationStatus::Pending),
            "completed" => Ok(IrrigationStatus::Completed),
            other => Err(format!("Unknown irrigation status: {}", other)),
        }
    }
}

/// A planned irrigation with its SMS reminder state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrrigationSchedule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub soil_type: String,
    pub weather_condition: String,
    pub irrigation_time: DateTime<Utc>,
    /// Duration in minutes
    pub duration: i32,
    pub status: IrrigationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IrrigationSchedule {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == IrrigationStatus::Pending && self.irrigation_time <= now
    }

    /// Text of the SMS sent when the schedule comes due
    pub fn reminder_message(&self) -> String {
        format!(
            "Reminder: It's time for irrigation! Soil Type: {}, Duration: {} mins.",
            self.soil_type, self.duration
        )
    }
}

/// Whether a weather description means irrigation can be skipped
pub fn is_rain_condition(description: &str) -> bool {
    description.to_lowercase().contains("rain")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn schedule(status: IrrigationStatus, offset_minutes: i64) -> IrrigationSchedule {
        let now = Utc::now();
        IrrigationSchedule {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            soil_type: "loamy".to_string(),
            weather_condition: "clear sky".to_string(),
            irrigation_time: now + Duration::minutes(offset_minutes),
            duration: 30,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn rain_detection_is_case_insensitive() {
        assert!(is_rain_condition("light rain"));
        assert!(is_rain_condition("Heavy Intensity RAIN"));
        assert!(is_rain_condition("freezing rain"));
        assert!(!is_rain_condition("clear sky"));
        assert!(!is_rain_condition("overcast clouds"));
    }

    #[test]
    fn only_pending_past_schedules_are_due() {
        let now = Utc::now() + Duration::seconds(1);
        assert!(schedule(IrrigationStatus::Pending, -5).is_due(now));
        assert!(!schedule(IrrigationStatus::Pending, 60).is_due(now));
        assert!(!schedule(IrrigationStatus::Completed, -5).is_due(now));
    }

    #[test]
    fn reminder_message_mentions_soil_and_duration() {
        let message = schedule(IrrigationStatus::Pending, 0).reminder_message();
        assert_eq!(
            message,
            "Reminder: It's time for irrigation! Soil Type: loamy, Duration: 30 mins."
        );
    }

    #[test]
    fn status_parses_from_storage() {
        assert_eq!("pending".parse(), Ok(IrrigationStatus::Pending));
        assert_eq!("completed".parse(), Ok(IrrigationStatus::Completed));
        assert!("done".parse::<IrrigationStatus>().is_err());
    }
}
