//! CLI argument definitions for the Userstore binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Userstore credential storage
#[derive(Parser, Debug)]
#[command(name = "userstore")]
#[command(about = "Userstore: user identity records behind named procedures")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output format
    #[arg(long, global = true, default_value = "human", env = "USERSTORE_FORMAT")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the table snapshot lives
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Data directory holding userstore.json
    #[arg(short = 'D', long, global = true, env = "USERSTORE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// Check a password and apply the lockout policy
    Login(LoginArgs),
    /// Run a named procedure directly
    Call(CallArgs),
    /// Show snapshot location and table size
    Info,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a new user
    Create(CreateArgs),
    /// Show a single user
    Show(NameArgs),
    /// List every user
    List,
    /// Delete a user
    Delete(NameArgs),
    /// Change a user's password
    Passwd(PasswdArgs),
}

#[derive(Args, Debug)]
pub struct NameArgs {
    /// User name (case-insensitive)
    pub name: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// User name
    pub name: String,

    /// Initial password
    #[arg(long)]
    pub password: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Never lock this user out after failed logins
    #[arg(long)]
    pub no_lockout: bool,
}

#[derive(Args, Debug)]
pub struct PasswdArgs {
    /// User name (case-insensitive)
    pub name: String,

    /// New password
    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// User name (case-insensitive)
    pub name: String,

    #[arg(long)]
    pub password: String,

    /// Failed attempts before the user is locked out
    #[arg(long, default_value_t = 5, env = "USERSTORE_MAX_FAILED_ATTEMPTS")]
    pub max_failed_attempts: u32,

    /// How long a lockout lasts
    #[arg(long, default_value_t = 15, env = "USERSTORE_LOCKOUT_MINUTES")]
    pub lockout_minutes: i64,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Procedure name, e.g. findById
    pub operation: String,

    /// Procedure parameter as name=value; may be repeated
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    if name.is_empty() {
        return Err(format!("missing parameter name in '{s}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
