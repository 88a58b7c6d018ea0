//! Snapshot info command - shows location, row count and procedures.

use crate::backend::Snapshot;
use crate::cli::StoreArgs;
use crate::output::OutputFormat;

/// Run the info command
pub async fn run(args: &StoreArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = Snapshot::open(args).await?;
    let rows = snapshot.backend.len().await;
    let exists = snapshot.path().exists();
    let operations: Vec<&str> = snapshot
        .backend
        .registry()
        .operations()
        .into_iter()
        .map(|op| op.as_str())
        .collect();

    match format {
        OutputFormat::Human => {
            println!("Snapshot:    {}", snapshot.path().display());
            println!("Exists:      {}", if exists { "yes" } else { "no" });
            println!("Users:       {rows}");
            println!("Procedures:  {}", operations.join(", "));
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "snapshot": snapshot.path().display().to_string(),
                "exists": exists,
                "users": rows,
                "procedures": operations,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }

    Ok(())
}
