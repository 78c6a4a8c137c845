//! Twirl-set command implementation.

use std::f64::consts::PI;

use anyhow::Result;
use console::style;
use qem_ir::StandardGate;
use qem_mitigate::{TwirlingSet, twirling_set};

/// Execute the twirl-set command.
pub fn execute(gate: StandardGate, format: &str) -> Result<()> {
    let set = twirling_set(gate)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(set)?),
        "table" => print_table(set),
        other => anyhow::bail!("Unknown format: {other}. Use 'table' or 'json'."),
    }
    Ok(())
}

fn phase_label(phase: f64) -> &'static str {
    if (phase - PI).abs() < 1e-12 { "π" } else { "0" }
}

fn print_table(set: &TwirlingSet) {
    println!(
        "{} {} ({} entries)",
        style("Twirling set for").cyan().bold(),
        style(set.gate()).yellow(),
        set.len()
    );
    println!();
    println!(
        "  {:>3}  {:<8} {:<8} {:<9} {:<9} {}",
        "#", "pre c", "pre t", "post c", "post t", "phase"
    );
    println!("  {}", "─".repeat(46));
    for (i, entry) in set.iter().enumerate() {
        let [a, b, c, d] = entry.gates;
        println!(
            "  {:>3}  {:<8} {:<8} {:<9} {:<9} {}",
            i,
            a.name(),
            b.name(),
            c.name(),
            d.name(),
            phase_label(entry.phase)
        );
    }
}
