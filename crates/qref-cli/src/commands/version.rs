//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - qubit ordering, registers and statevectors",
        style("qref").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qref-ir    Registers, gates, circuits and text drawing");
    println!("  qref-info  Ordering convention, operators and statevectors");
    println!("  qref-cli   Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
