//! User management commands.

use userstore::user::{User, UserStore, codec, new_stamp, normalize};

use super::require_user;
use crate::backend::Snapshot;
use crate::cli::{CreateArgs, NameArgs, PasswdArgs, StoreArgs, UserCommand};
use crate::output::{OutputFormat, print_table, print_user};
use crate::password::hash_password;

/// Run a `user` subcommand
pub async fn run(
    command: &UserCommand,
    store_args: &StoreArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = Snapshot::open(store_args).await?;
    let store = UserStore::new(snapshot.backend.clone());

    match command {
        UserCommand::Create(args) => create(&store, &snapshot, args, format).await,
        UserCommand::Show(args) => show(&store, args, format).await,
        UserCommand::List => list(&store, &snapshot, format).await,
        UserCommand::Delete(args) => delete(&store, &snapshot, args).await,
        UserCommand::Passwd(args) => passwd(&store, &snapshot, args).await,
    }
}

async fn create(
    store: &UserStore,
    snapshot: &Snapshot,
    args: &CreateArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if store.find_by_name(&normalize(&args.name)).await?.is_some() {
        return Err(format!("user already exists: {}", args.name).into());
    }

    let mut user = User::new(&args.name).with_lockout_enabled(!args.no_lockout);
    if let Some(email) = &args.email {
        user = user.with_email(email);
    }
    if let Some(password) = &args.password {
        user.password_hash = Some(hash_password(password)?);
    }

    let result = store.create(&user).await;
    if !result.succeeded() {
        let reasons: Vec<_> = result.errors().iter().map(|e| e.description.as_str()).collect();
        return Err(format!("failed to create {}: {}", args.name, reasons.join("; ")).into());
    }
    snapshot.save().await?;

    match format {
        OutputFormat::Human => println!("Created user {} ({})", args.name, user.id),
        OutputFormat::Json => println!("{}", serde_json::to_string(&user)?),
    }
    Ok(())
}

async fn show(
    store: &UserStore,
    args: &NameArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = require_user(store, &args.name).await?;
    match format {
        OutputFormat::Human => {
            print_user(&user);
            if store.is_locked_out(&user) {
                println!("{:<16} yes", "Locked out:");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&user)?),
    }
    Ok(())
}

async fn list(
    store: &UserStore,
    snapshot: &Snapshot,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let users = snapshot
        .backend
        .rows()
        .await
        .iter()
        .map(codec::decode)
        .collect::<userstore::Result<Vec<_>>>()?;

    match format {
        OutputFormat::Human => {
            if users.is_empty() {
                println!("No users found.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = users
                .iter()
                .map(|u| {
                    vec![
                        u.id.clone(),
                        u.user_name.clone().unwrap_or_default(),
                        u.email.clone().unwrap_or_default(),
                        u.access_failed_count.to_string(),
                        if store.is_locked_out(u) { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "USERNAME", "EMAIL", "FAILED", "LOCKED"], &rows);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&users)?),
    }
    Ok(())
}

async fn delete(
    store: &UserStore,
    snapshot: &Snapshot,
    args: &NameArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = require_user(store, &args.name).await?;
    if !store.delete(&user).await.succeeded() {
        return Err(format!("failed to delete {}", args.name).into());
    }
    snapshot.save().await?;
    println!("Deleted user {}", args.name);
    Ok(())
}

/// Replaces the password hash and rotates the security stamp.
async fn passwd(
    store: &UserStore,
    snapshot: &Snapshot,
    args: &PasswdArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut user = require_user(store, &args.name).await?;
    let hash = hash_password(&args.password)?;

    if !store.set_password_hash(&mut user, Some(hash)).await {
        return Err(format!("failed to change password for {}", args.name).into());
    }
    if !store.set_security_stamp(&mut user, Some(new_stamp())).await {
        tracing::warn!(user = %args.name, "Password changed but security stamp was not rotated");
    }
    snapshot.save().await?;
    println!("Password changed for {}", args.name);
    Ok(())
}
