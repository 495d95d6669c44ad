//! Member records and their moderation status. Enough to give swap requests
//! real counterparts; this is not a login system.

use anyhow::anyhow;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use tracing::info;

use skillswap_db::{Database, queries};
use skillswap_types::api::CreateUserRequest;
use skillswap_types::models::{ModerationEntry, User, UserId, UserStatus};

use crate::error::{CoreError, CoreResult, required_text};

pub const INVALID_USER_STATUS: &str =
    "Invalid status. Must be \"active\", \"flagged\" or \"banned\"";

/// How many moderation entries the log returns.
pub const MODERATION_LOG_LIMIT: i64 = 50;

fn not_found(id: UserId) -> CoreError {
    CoreError::NotFound { entity: "User", id }
}

pub fn create(db: &Database, req: CreateUserRequest) -> CoreResult<User> {
    let missing = || CoreError::Validation("Name, email, and password are required.".into());
    let name = required_text(req.name).ok_or_else(missing)?;
    let email = required_text(req.email).ok_or_else(missing)?;
    let password = required_text(req.password).ok_or_else(missing)?;

    let password_hash = hash_password(&password)?;

    let user = db.with_tx(|gw| -> CoreResult<User> {
        if queries::users::find_by_email(gw, &email)?.is_some() {
            return Err(CoreError::Conflict("Email is already registered".into()));
        }

        let id = queries::users::insert(gw, &name, &email, &password_hash)?;
        let row = queries::users::find(gw, id)?.ok_or_else(|| not_found(id))?;
        Ok(row.try_into()?)
    })?;

    info!(user_id = user.id, "user created");
    Ok(user)
}

pub fn get(db: &Database, id: UserId) -> CoreResult<User> {
    let row = db
        .with_gateway(|gw| queries::users::find(gw, id))?
        .ok_or_else(|| not_found(id))?;
    Ok(row.try_into()?)
}

pub fn list(db: &Database) -> CoreResult<Vec<User>> {
    let rows = db.with_gateway(|gw| queries::users::list(gw))?;
    let users = rows
        .into_iter()
        .map(User::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(users)
}

/// Moves a user to `active`, `flagged` or `banned` and records the change in
/// the moderation log. The update and the log entry commit together.
pub fn set_status(db: &Database, id: UserId, requested: Option<&str>) -> CoreResult<User> {
    let status: UserStatus = requested
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| CoreError::Validation(INVALID_USER_STATUS.into()))?;

    let user = db.with_tx(|gw| -> CoreResult<User> {
        if queries::users::update_status(gw, id, status.as_str())? == 0 {
            return Err(not_found(id));
        }
        queries::admin_logs::insert(
            gw,
            "update_user_status",
            "user",
            id,
            &format!("User status changed to {}", status.as_str()),
        )?;

        let row = queries::users::find(gw, id)?.ok_or_else(|| not_found(id))?;
        Ok(row.try_into()?)
    })?;

    info!(user_id = id, status = status.as_str(), "user status changed");
    Ok(user)
}

/// Most recent moderation actions, newest first.
pub fn moderation_log(db: &Database) -> CoreResult<Vec<ModerationEntry>> {
    let rows = db.with_gateway(|gw| queries::admin_logs::list_recent(gw, MODERATION_LOG_LIMIT))?;
    let entries = rows
        .into_iter()
        .map(ModerationEntry::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(entries)
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("password hashing failed: {}", e))
}
