//! Irrigation scheduling and SMS reminders

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{is_rain_condition, validate_duration_minutes, IrrigationSchedule, IrrigationStatus};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::SmsSender;
use crate::services::{UserPhone, UserService, WeatherService};

/// Irrigation service
#[derive(Clone)]
pub struct IrrigationService {
    db: PgPool,
}

/// Input for creating a schedule. Every field but `city` is required.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleInput {
    pub user_id: Option<Uuid>,
    pub soil_type: Option<String>,
    pub irrigation_time: Option<DateTime<Utc>>,
    pub duration: Option<i32>,
    pub city: Option<String>,
}

/// Schedule with all input checks passed, waiting for a weather check
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub user_id: Uuid,
    pub soil_type: String,
    pub irrigation_time: DateTime<Utc>,
    pub duration: i32,
    pub city: Option<String>,
}

impl CreateScheduleInput {
    pub fn validate(self) -> AppResult<ScheduleRequest> {
        let (Some(user_id), Some(soil_type), Some(irrigation_time), Some(duration)) =
            (self.user_id, self.soil_type, self.irrigation_time, self.duration)
        else {
            return Err(AppError::Validation("All fields are required".to_string()));
        };

        if soil_type.trim().is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }
        validate_duration_minutes(duration).map_err(|msg| AppError::Validation(msg.to_string()))?;

        Ok(ScheduleRequest {
            user_id,
            soil_type,
            irrigation_time,
            duration,
            city: self.city.filter(|c| !c.trim().is_empty()),
        })
    }
}

/// One SMS to send for a due schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub schedule_id: Uuid,
    pub to: String,
    pub body: String,
}

/// Pair due schedules with their users' phone numbers.
///
/// Schedules whose user has no phone on file get no reminder.
pub fn plan_reminders(schedules: &[IrrigationSchedule], phones: &[UserPhone]) -> Vec<Reminder> {
    let phone_by_user: HashMap<Uuid, &str> = phones
        .iter()
        .filter_map(|p| p.phone_number.as_deref().map(|n| (p.id, n)))
        .filter(|(_, n)| !n.trim().is_empty())
        .collect();

    schedules
        .iter()
        .filter_map(|schedule| {
            phone_by_user.get(&schedule.user_id).map(|to| Reminder {
                schedule_id: schedule.id,
                to: to.to_string(),
                body: schedule.reminder_message(),
            })
        })
        .collect()
}

#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    id: Uuid,
    user_id: Uuid,
    soil_type: String,
    weather_condition: String,
    irrigation_time: DateTime<Utc>,
    duration: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ScheduleRow> for IrrigationSchedule {
    type Error = AppError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<IrrigationStatus>().map_err(AppError::Internal)?;
        Ok(IrrigationSchedule {
            id: row.id,
            user_id: row.user_id,
            soil_type: row.soil_type,
            weather_condition: row.weather_condition,
            irrigation_time: row.irrigation_time,
            duration: row.duration,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SCHEDULE_COLUMNS: &str = "id, user_id, soil_type, weather_condition, irrigation_time, \
     duration, status, created_at, updated_at";

impl IrrigationService {
    /// Create a new IrrigationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a pending schedule unless rain is expected.
    ///
    /// The weather description at creation time is stored with the schedule.
    pub async fn create_schedule(
        &self,
        request: ScheduleRequest,
        weather: &WeatherService,
        default_city: &str,
    ) -> AppResult<IrrigationSchedule> {
        let user_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(request.user_id)
                .fetch_one(&self.db)
                .await?;
        if !user_exists {
            return Err(AppError::NotFound("User".to_string()));
        }

        let city = request.city.as_deref().unwrap_or(default_city);
        let report = weather.current(city).await?;
        let condition = report
            .description()
            .ok_or_else(|| AppError::upstream("weather data", "response has no weather entries"))?
            .to_string();

        if is_rain_condition(&condition) {
            tracing::info!(city, condition = %condition, "irrigation skipped for rain");
            return Err(AppError::Validation(
                "Irrigation not needed due to rain".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            r#"
            INSERT INTO irrigation_schedules (user_id, soil_type, weather_condition, irrigation_time, duration)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SCHEDULE_COLUMNS
        ))
        .bind(request.user_id)
        .bind(&request.soil_type)
        .bind(&condition)
        .bind(request.irrigation_time)
        .bind(request.duration)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(schedule_id = %row.id, user_id = %row.user_id, "irrigation scheduled");
        row.try_into()
    }

    /// All schedules, soonest first
    pub async fn list_schedules(&self) -> AppResult<Vec<IrrigationSchedule>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {} FROM irrigation_schedules ORDER BY irrigation_time, id",
            SCHEDULE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(IrrigationSchedule::try_from).collect()
    }

    /// Complete every pending schedule whose time has come and return them.
    ///
    /// Rows locked by a concurrent sweep are skipped, so each schedule is
    /// claimed by exactly one server instance.
    pub async fn claim_due_schedules(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<IrrigationSchedule>> {
        let mut rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            r#"
            UPDATE irrigation_schedules
            SET status = 'completed', updated_at = NOW()
            WHERE id IN (
                SELECT id FROM irrigation_schedules
                WHERE status = 'pending' AND irrigation_time <= $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING {}
            "#,
            SCHEDULE_COLUMNS
        ))
        .bind(now)
        .fetch_all(&self.db)
        .await?;

        // RETURNING has no ORDER BY
        rows.sort_by_key(|row| (row.irrigation_time, row.id));
        rows.into_iter().map(IrrigationSchedule::try_from).collect()
    }

    /// Claim every due schedule, then send its reminder.
    ///
    /// Schedules are completed before sending, so a failed SMS is logged and
    /// not retried. Returns the number of schedules claimed.
    pub async fn process_due_schedules(
        &self,
        sms: &dyn SmsSender,
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        let schedules = self.claim_due_schedules(now).await?;
        if schedules.is_empty() {
            return Ok(0);
        }

        let user_ids: Vec<Uuid> = schedules.iter().map(|s| s.user_id).collect();
        let phones = UserService::new(self.db.clone())
            .phone_numbers(&user_ids)
            .await?;

        for reminder in plan_reminders(&schedules, &phones) {
            if let Err(e) = sms.send(&reminder.to, &reminder.body).await {
                tracing::error!(
                    schedule_id = %reminder.schedule_id,
                    error = %e,
                    "failed to send irrigation reminder"
                );
            }
        }

        tracing::info!(count = schedules.len(), "processed due irrigation schedules");
        Ok(schedules.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_rejected() {
        let input = CreateScheduleInput {
            user_id: Some(Uuid::new_v4()),
            soil_type: Some("loamy".to_string()),
            irrigation_time: Some(Utc::now()),
            duration: None,
            city: None,
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.public_message(), "All fields are required");
    }

    #[test]
    fn test_non_positive_duration_is_rejected() {
        let input = CreateScheduleInput {
            user_id: Some(Uuid::new_v4()),
            soil_type: Some("loamy".to_string()),
            irrigation_time: Some(Utc::now()),
            duration: Some(0),
            city: None,
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_blank_city_falls_back_to_default() {
        let input = CreateScheduleInput {
            user_id: Some(Uuid::new_v4()),
            soil_type: Some("clay".to_string()),
            irrigation_time: Some(Utc::now()),
            duration: Some(20),
            city: Some("  ".to_string()),
        };
        assert_eq!(input.validate().unwrap().city, None);
    }
}
