//! Aggregate command implementation.

use anyhow::Result;
use qem_mitigate::aggregate_counts;
use tracing::debug;

use super::common::load_counts;

/// Execute the aggregate command.
pub fn execute(files: &[String], normalize: bool) -> Result<()> {
    let runs = files
        .iter()
        .map(|f| load_counts(f))
        .collect::<Result<Vec<_>>>()?;
    debug!("Loaded {} count sets", runs.len());

    let combined = aggregate_counts(&runs, normalize);
    println!("{}", serde_json::to_string_pretty(&combined)?);
    Ok(())
}
