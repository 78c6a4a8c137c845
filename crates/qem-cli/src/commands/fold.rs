//! Fold command implementation.

use anyhow::Result;
use console::style;
use qem_ir::StandardGate;
use qem_mitigate::PassManagerBuilder;

use super::common::run_passes;

/// Execute the fold command.
pub fn execute(
    input: &str,
    output: Option<&str>,
    scale: f64,
    gate: StandardGate,
    seed: Option<u32>,
) -> Result<()> {
    println!(
        "{} {} (gate {}, scale {})",
        style("Folding").cyan().bold(),
        style(input).green(),
        style(gate).yellow(),
        scale
    );

    let mut builder = PassManagerBuilder::new().with_folding(scale, gate);
    if let Some(seed) = seed {
        builder = builder.with_folding_seed(seed);
    }
    let pm = builder.build()?;

    run_passes(input, output, "fold", &pm)?;
    Ok(())
}
