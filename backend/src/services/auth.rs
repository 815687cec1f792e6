//! Authentication service for registration, login and session tokens

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::LoginRateLimiter;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    limiter: LoginRateLimiter,
    jwt_secret: String,
    token_expiry: i64,
}

/// Input for registering a new user
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Signed-in user returned by register and login
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Session issued after a successful register or login
#[derive(Debug)]
pub struct Session {
    pub user: AuthenticatedUser,
    pub token: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config, limiter: LoginRateLimiter) -> Self {
        Self {
            db,
            limiter,
            jwt_secret: config.jwt.secret.clone(),
            token_expiry: config.jwt.expiry_seconds,
        }
    }

    /// Register a new user and start a session
    pub async fn register(&self, input: RegisterInput) -> AppResult<Session> {
        input.validate()?;

        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&input.email)
            .fetch_one(&self.db)
            .await?;

        if existing > 0 {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        // Hash password
        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (name, email, password_hash, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(&input.phone_number)
        .fetch_one(&self.db)
        .await
        // A concurrent registration can pass the check above
        .map_err(|e| AppError::on_unique_violation(e, "User already exists"))?;

        tracing::info!(user_id = %id, "user registered");

        let token = self.issue_token(id)?;
        Ok(Session {
            user: AuthenticatedUser {
                id,
                name: input.name,
                email: input.email,
            },
            token,
        })
    }

    /// Authenticate with email and password, limited per email
    pub async fn login(&self, input: LoginInput) -> AppResult<Session> {
        let user = self
            .limiter
            .attempt(&input.email, || {
                self.verify_credentials(&input.email, &input.password)
            })
            .await?;

        let token = self.issue_token(user.id)?;
        Ok(Session { user, token })
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let user = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        // Verify password
        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        Ok(AuthenticatedUser {
            id: user.id,
            name: user.name,
            email: user.email,
        })
    }

    /// Sign a session token for a user
    pub fn issue_token(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(self.token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }
}

/// Validate a session token and return the user it was issued to
pub fn decode_token(token: &str, secret: &str) -> AppResult<Uuid> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    Uuid::parse_str(&data.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_with(secret: &str, sub: &str, exp_offset: i64) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            exp: (now + Duration::seconds(exp_offset)).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_valid_token() {
        let user_id = Uuid::new_v4();
        let token = encode_with("secret", &user_id.to_string(), 3600);
        assert_eq!(decode_token(&token, "secret").unwrap(), user_id);
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let token = encode_with("secret", &Uuid::new_v4().to_string(), 3600);
        assert!(matches!(
            decode_token(&token, "other"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_decode_rejects_expired_token() {
        let token = encode_with("secret", &Uuid::new_v4().to_string(), -3600);
        assert!(decode_token(&token, "secret").is_err());
    }

    #[test]
    fn test_decode_rejects_non_uuid_subject() {
        let token = encode_with("secret", "farmer-1", 3600);
        assert!(decode_token(&token, "secret").is_err());
    }

    #[test]
    fn test_register_input_validation() {
        let input = RegisterInput {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "short".to_string(),
            phone_number: None,
        };
        assert!(input.validate().is_err());

        let input = RegisterInput {
            password: "long-enough".to_string(),
            ..input
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_register_input_rejects_bad_email_and_blank_name() {
        let valid = RegisterInput {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "long-enough".to_string(),
            phone_number: None,
        };

        let bad_email = RegisterInput {
            email: "asha.example.com".to_string(),
            ..valid.clone()
        };
        let errors = bad_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let blank_name = RegisterInput {
            name: String::new(),
            ..valid
        };
        let errors = blank_name.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
