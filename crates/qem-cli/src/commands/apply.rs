//! Apply command implementation.

use anyhow::{Context, Result};
use console::style;
use qem_mitigate::{MitigationConfig, PassManagerBuilder};

use super::common::run_passes;

/// Execute the apply command.
pub fn execute(input: &str, output: Option<&str>, config: &str) -> Result<()> {
    let cfg = MitigationConfig::from_file(config)
        .with_context(|| format!("Failed to load config: {config}"))?;
    cfg.validate()?;

    if cfg.is_empty() {
        println!(
            "{} config enables no passes, circuit is copied unchanged",
            style("Note:").yellow().bold()
        );
    }

    let pm = PassManagerBuilder::new().with_config(&cfg).build()?;
    println!(
        "{} {} with [{}]",
        style("Applying").cyan().bold(),
        style(input).green(),
        pm.pass_names().join(", ")
    );

    run_passes(input, output, "mitigated", &pm)?;
    Ok(())
}
