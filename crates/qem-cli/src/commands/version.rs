//! Version command implementation.

use console::style;
use qem_mitigate::TWIRLABLE_GATES;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - gate folding and Pauli twirling",
        style("qem").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qem-ir        Circuit DAG and gate catalog");
    println!("  qem-mitigate  Folding and twirling passes");
    println!("  qem-cli       Command-line interface");
    println!();
    let gates: Vec<_> = TWIRLABLE_GATES.iter().map(|g| g.name()).collect();
    println!("Twirlable:  {}", gates.join(", "));
    println!(
        "Repository: {}",
        style("https://github.com/qem-rs/qem").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
