//! Password check with failed-attempt lockout.

use chrono::{Duration, Utc};
use userstore::{Clock, user::UserStore};

use super::require_user;
use crate::backend::Snapshot;
use crate::cli::{LoginArgs, StoreArgs};
use crate::output::OutputFormat;
use crate::password::verify_password;

/// Result of one login attempt.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failed { failed_attempts: u32 },
    LockedOut { until: chrono::DateTime<Utc> },
}

/// Run the login command
pub async fn run(
    args: &LoginArgs,
    store_args: &StoreArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = Snapshot::open(store_args).await?;
    let store = UserStore::new(snapshot.backend.clone());

    let outcome = attempt(&store, args).await?;
    snapshot.save().await?;

    match format {
        OutputFormat::Human => match &outcome {
            Outcome::Success => println!("Login succeeded for {}", args.name),
            Outcome::Failed { failed_attempts } => {
                println!("Login failed for {} ({failed_attempts} failed)", args.name)
            }
            Outcome::LockedOut { until } => {
                println!("{} is locked out until {}", args.name, until.to_rfc3339())
            }
        },
        OutputFormat::Json => println!("{}", serde_json::to_string(&outcome)?),
    }

    match outcome {
        Outcome::Success => Ok(()),
        _ => Err("login failed".into()),
    }
}

/// Checks the password and updates the lockout state of the user.
///
/// A locked-out user is refused before the password is checked. A wrong
/// password increments the failure count; reaching `max_failed_attempts`
/// starts a lockout and resets the count. A correct password resets it.
pub async fn attempt(
    store: &UserStore,
    args: &LoginArgs,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let mut user = require_user(store, &args.name).await?;

    if store.is_locked_out(&user) {
        if let Some(until) = store.get_lockout_end(&user) {
            return Ok(Outcome::LockedOut { until });
        }
    }

    let verified = store
        .get_password_hash(&user)
        .is_some_and(|hash| verify_password(&args.password, hash));
    if verified {
        if store.get_access_failed_count(&user) > 0
            && !store.reset_access_failed_count(&mut user).await
        {
            tracing::warn!(user = %args.name, "Failed to reset failed login count");
        }
        tracing::info!(user = %args.name, "Login succeeded");
        return Ok(Outcome::Success);
    }

    let failed_attempts = store
        .increment_access_failed_count(&mut user)
        .await
        .ok_or("failed to record failed login")?;
    tracing::warn!(user = %args.name, failed_attempts, "Login failed");

    if store.get_lockout_enabled(&user) && failed_attempts >= args.max_failed_attempts {
        let until = Duration::try_minutes(args.lockout_minutes)
            .and_then(|length| store.clock().now().checked_add_signed(length))
            .ok_or_else(|| format!("lockout of {} minutes is out of range", args.lockout_minutes))?;
        if !store.set_lockout_end(&mut user, Some(until)).await {
            return Err("failed to record lockout".into());
        }
        if !store.reset_access_failed_count(&mut user).await {
            tracing::warn!(user = %args.name, "Failed to reset failed login count after lockout");
        }
        tracing::warn!(user = %args.name, until = %until, "User locked out");
        return Ok(Outcome::LockedOut { until });
    }

    Ok(Outcome::Failed { failed_attempts })
}
