//! Output formatting helpers for human-readable and JSON output.

use clap::ValueEnum;
use userstore::user::User;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_line.join("  ").trim_end());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .take(col_count)
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

/// Print a user's fields as aligned `label: value` lines.
pub fn print_user(user: &User) {
    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let lines = [
        ("ID", user.id.clone()),
        ("User name", opt(&user.user_name)),
        ("Email", opt(&user.email)),
        ("Email confirmed", user.email_confirmed.to_string()),
        ("Phone", opt(&user.phone_number)),
        ("Phone confirmed", user.phone_number_confirmed.to_string()),
        ("Password", if user.password_hash.is_some() { "set" } else { "-" }.to_string()),
        ("Failed logins", user.access_failed_count.to_string()),
        ("Lockout enabled", user.lockout_enabled.to_string()),
        (
            "Lockout end",
            user.lockout_end
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("Two-factor", user.two_factor_enabled.to_string()),
    ];
    for (label, value) in lines {
        println!("{:<16} {value}", format!("{label}:"));
    }
}
