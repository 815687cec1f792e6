//! Database-backed service tests
//!
//! Run against a migrated database:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use farmlink_backend::cache::MemoryCacheStore;
use farmlink_backend::config::RateLimitConfig;
use farmlink_backend::error::AppError;
use farmlink_backend::external::LogSmsSender;
use farmlink_backend::services::auth::{LoginInput, RegisterInput};
use farmlink_backend::services::{
    AuthService, DiscussionService, IrrigationService, LikeTarget, LoginRateLimiter, UserService,
};
use farmlink_backend::Config;
use uuid::Uuid;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

fn unique_email() -> String {
    format!("farmer-{}@example.com", Uuid::new_v4())
}

async fn insert_user(db: &PgPool, phone: Option<&str>) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash, phone_number) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind("Test Farmer")
    .bind(unique_email())
    .bind("not-a-real-hash")
    .bind(phone)
    .fetch_one(db)
    .await
    .unwrap()
}

#[tokio::test]
#[ignore] // Requires database connection and FARMLINK__JWT__SECRET
async fn test_register_then_login() {
    let db = pool().await;
    let config = Config::load().unwrap();
    let limiter = LoginRateLimiter::new(
        Arc::new(MemoryCacheStore::new()),
        &RateLimitConfig::default(),
    );
    let auth = AuthService::new(db, &config, limiter);
    let email = unique_email();

    let session = auth
        .register(RegisterInput {
            name: "Asha".to_string(),
            email: email.clone(),
            password: "harvest-2026".to_string(),
            phone_number: None,
        })
        .await
        .unwrap();
    assert!(!session.token.is_empty());

    let duplicate = auth
        .register(RegisterInput {
            name: "Asha".to_string(),
            email: email.clone(),
            password: "harvest-2026".to_string(),
            phone_number: None,
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let wrong = auth
        .login(LoginInput {
            email: email.clone(),
            password: "wrong-password".to_string(),
        })
        .await;
    assert!(matches!(wrong, Err(AppError::Unauthorized(_))));

    let session = auth
        .login(LoginInput {
            email,
            password: "harvest-2026".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.user.name, "Asha");
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_like_toggle_round_trip() {
    let db = pool().await;
    let author = insert_user(&db, None).await;
    let reader = insert_user(&db, None).await;
    let discussion = DiscussionService::new(db);

    let post = discussion
        .create_post(author, "Clay soil tips", "What grows best?")
        .await
        .unwrap();

    let liked = discussion
        .toggle_like(LikeTarget::Post, post.id, reader)
        .await
        .unwrap();
    assert_eq!(liked.likes, 1);

    let unliked = discussion
        .toggle_like(LikeTarget::Post, post.id, reader)
        .await
        .unwrap();
    assert_eq!(unliked.likes, 0);
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_only_author_can_delete_comment() {
    let db = pool().await;
    let author = insert_user(&db, None).await;
    let other = insert_user(&db, None).await;
    let discussion = DiscussionService::new(db);

    let post = discussion.create_post(author, "Rain", "Too much?").await.unwrap();
    let comment = discussion.add_comment(post.id, author, "Yes").await.unwrap();
    discussion.add_reply(comment.id, other, "Agreed").await.unwrap();

    let denied = discussion.delete_comment(comment.id, other).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    discussion.delete_comment(comment.id, author).await.unwrap();
    let detail = discussion.get_post(post.id).await.unwrap();
    assert!(detail.comments.is_empty());
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_due_schedules_are_completed() {
    let db = pool().await;
    let farmer = insert_user(&db, Some("+919800000001")).await;
    let irrigation = IrrigationService::new(db.clone());

    sqlx::query(
        "INSERT INTO irrigation_schedules (user_id, soil_type, weather_condition, irrigation_time, duration)
         VALUES ($1, 'loamy', 'clear sky', $2, 30)",
    )
    .bind(farmer)
    .bind(Utc::now() - Duration::minutes(5))
    .execute(&db)
    .await
    .unwrap();

    let processed = irrigation
        .process_due_schedules(&LogSmsSender, Utc::now())
        .await
        .unwrap();
    assert!(processed >= 1);
    assert!(irrigation
        .claim_due_schedules(Utc::now())
        .await
        .unwrap()
        .is_empty());

    let phones = UserService::new(db).phone_numbers(&[farmer]).await.unwrap();
    assert_eq!(phones[0].phone_number.as_deref(), Some("+919800000001"));
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_concurrent_sweeps_claim_each_schedule_once() {
    let db = pool().await;
    let farmer = insert_user(&db, None).await;
    // Ahead of the clock so sweeps in other tests leave these rows alone
    let sweep_at = Utc::now() + Duration::days(10);

    for minutes in 1..=4 {
        sqlx::query(
            "INSERT INTO irrigation_schedules (user_id, soil_type, weather_condition, irrigation_time, duration)
             VALUES ($1, 'clay', 'few clouds', $2, 20)",
        )
        .bind(farmer)
        .bind(sweep_at - Duration::minutes(minutes))
        .execute(&db)
        .await
        .unwrap();
    }

    let first = IrrigationService::new(db.clone());
    let second = IrrigationService::new(db.clone());
    let (a, b) = tokio::join!(
        first.claim_due_schedules(sweep_at),
        second.claim_due_schedules(sweep_at)
    );

    let mut claimed: Vec<_> = a
        .unwrap()
        .into_iter()
        .chain(b.unwrap())
        .filter(|s| s.user_id == farmer)
        .map(|s| s.id)
        .collect();
    let total = claimed.len();
    claimed.sort();
    claimed.dedup();

    assert_eq!(total, 4);
    assert_eq!(claimed.len(), 4);
}
