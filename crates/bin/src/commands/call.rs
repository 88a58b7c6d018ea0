//! Raw procedure dispatch.

use userstore::{
    backend::ProcedureBackend,
    procedure::{Operation, Parameters},
    store::Record,
};

use crate::backend::Snapshot;
use crate::cli::{CallArgs, StoreArgs};
use crate::output::{OutputFormat, print_table};

/// Run the call command
///
/// Every parameter is passed as text; the procedures coerce flags, counters
/// and timestamps from their text forms.
pub async fn run(
    args: &CallArgs,
    store_args: &StoreArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = Snapshot::open(store_args).await?;
    let params: Parameters = args.params.iter().cloned().collect();

    let rows = snapshot.backend.call(&args.operation, &params).await?;
    let is_query = args
        .operation
        .parse::<Operation>()
        .is_ok_and(Operation::is_query);
    if !is_query {
        snapshot.save().await?;
    }

    match format {
        OutputFormat::Human => print_records(&rows),
        OutputFormat::Json => println!("{}", serde_json::to_string(&rows)?),
    }
    Ok(())
}

fn print_records(rows: &[Record]) {
    if rows.is_empty() {
        println!("OK (no rows)");
        return;
    }
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let lines: Vec<Vec<String>> = row
            .iter()
            .map(|(k, v)| vec![k.to_string(), v.to_string()])
            .collect();
        print_table(&["FIELD", "VALUE"], &lines);
    }
}
