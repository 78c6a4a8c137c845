//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;

use qem_ir::{Circuit, CircuitSnapshot};
use qem_mitigate::{Counts, FoldingReport, PassManager, PropertySet, TwirlingReport};

/// Load a circuit from a JSON snapshot file.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    let snapshot: CircuitSnapshot = serde_json::from_str(&source)
        .with_context(|| format!("Failed to parse circuit JSON: {path}"))?;

    Circuit::from_snapshot(&snapshot).with_context(|| format!("Invalid circuit in {path}"))
}

/// Save a circuit as a JSON snapshot.
pub fn save_circuit(circuit: &Circuit, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(&circuit.to_snapshot())
        .context("Failed to serialize circuit")?;
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Output path for a command: the explicit one, or `<stem>_<command>.json`
/// next to the input.
pub fn output_path(input: &str, output: Option<&str>, command: &str) -> PathBuf {
    if let Some(output) = output {
        return PathBuf::from(output);
    }
    let p = Path::new(input);
    let stem = p.file_stem().unwrap_or_default().to_string_lossy();
    p.with_file_name(format!("{stem}_{command}.json"))
}

/// Load a JSON object of outcome counts, integer or fractional.
pub fn load_counts(path: &str) -> Result<Counts> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    serde_json::from_str(&source).with_context(|| format!("Failed to parse counts JSON: {path}"))
}

/// Load a circuit, run `pm` on it and write the result.
pub fn run_passes(
    input: &str,
    output: Option<&str>,
    command: &str,
    pm: &PassManager,
) -> Result<PropertySet> {
    let circuit = load_circuit(input)?;
    println!(
        "  Loaded: {} qubits, depth {}, {} ops",
        circuit.num_qubits(),
        circuit.depth(),
        circuit.dag().num_ops()
    );

    let name = circuit.name().to_string();
    let mut dag = circuit.into_dag();
    let mut props = PropertySet::new();
    pm.run(&mut dag, &mut props)?;
    let result = Circuit::from_dag_named(name, dag);

    print_reports(&props);
    println!(
        "  Result: depth {}, {} ops, global phase {:.6}",
        result.depth(),
        result.dag().num_ops(),
        result.global_phase()
    );

    let path = output_path(input, output, command);
    save_circuit(&result, &path)?;
    println!("  Output: {}", style(path.display()).green());

    Ok(props)
}

/// Print whatever pass reports the run left behind.
pub fn print_reports(props: &PropertySet) {
    if let Some(r) = props.get::<FoldingReport>() {
        println!(
            "  Folded {} of {} {} gates {}x (scale {})",
            style(r.num_folded).yellow(),
            r.num_target_gates,
            style(r.gate).cyan(),
            r.odd_fold_factor,
            r.scale_factor
        );
    }
    if let Some(r) = props.get::<TwirlingReport>() {
        println!(
            "  Twirled {} {} gates, phase added {:.6}",
            style(r.num_twirled).yellow(),
            style(r.gate).cyan(),
            r.phase_added
        );
    }
}
