//! Twirl command implementation.

use anyhow::Result;
use console::style;
use qem_ir::StandardGate;
use qem_mitigate::PassManagerBuilder;

use super::common::run_passes;

/// Execute the twirl command.
pub fn execute(
    input: &str,
    output: Option<&str>,
    gate: StandardGate,
    seed: Option<u32>,
) -> Result<()> {
    println!(
        "{} {} (gate {})",
        style("Twirling").cyan().bold(),
        style(input).green(),
        style(gate).yellow()
    );

    let pm = PassManagerBuilder::new().with_twirling(gate, seed).build()?;
    run_passes(input, output, "twirl", &pm)?;
    Ok(())
}
