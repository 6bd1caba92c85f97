//! Shared helpers for CLI commands.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use console::style;
use qref_info::Statevector;
use qref_info::format::{format_complex, format_real};
use qref_ir::Circuit;
use serde_json::{Value, json};

use crate::config::DisplayConfig;

/// Print a section heading.
pub fn print_section(title: &str) {
    println!("\n{} {}", style("==").cyan().bold(), style(title).bold());
}

/// Draw a circuit honouring `reverse_bits` from the config.
pub fn draw(circuit: &Circuit, config: &DisplayConfig) -> String {
    circuit
        .drawer()
        .reverse_bits(config.reverse_bits)
        .render()
}

/// Print basis-label probabilities with a bar per outcome.
pub fn print_probabilities(probabilities: &BTreeMap<String, f64>, precision: usize) {
    for (label, p) in probabilities {
        let bar_len = (p * 50.0).round() as usize;
        println!(
            "  {}: {:>width$} {}",
            style(label).cyan(),
            format_real(*p, precision),
            style("█".repeat(bar_len)).green(),
            width = precision + 2
        );
    }
}

/// Print sampled counts sorted by label.
pub fn print_counts(counts: &BTreeMap<String, usize>) {
    let total: usize = counts.values().sum();
    println!(
        "\n{} Sampled counts ({} shots):",
        style("✓").green().bold(),
        total
    );
    for (label, count) in counts {
        let pct = *count as f64 / total.max(1) as f64 * 100.0;
        println!("  {}: {:>6} ({:>5.2}%)", style(label).cyan(), count, pct);
    }
}

/// Print a statevector in ket notation followed by its probabilities.
pub fn print_state(name: &str, psi: &Statevector, config: &DisplayConfig) {
    println!(
        "{} = {:.prec$}",
        style(name).yellow(),
        psi,
        prec = config.precision
    );
    if !psi.is_valid(config.tolerance.max(1e-9)) {
        println!("  {} state is not normalized", style("!").red().bold());
    }
    print_probabilities(&psi.probabilities_dict(), config.precision);
}

/// JSON view of a statevector: amplitudes as `[re, im]` and probabilities.
pub fn state_json(psi: &Statevector, config: &DisplayConfig) -> Value {
    let amplitudes: BTreeMap<String, Value> = psi
        .to_dict()
        .into_iter()
        .map(|(label, a)| (label, json!([a.re, a.im])))
        .collect();
    let formatted: BTreeMap<String, String> = psi
        .to_dict()
        .into_iter()
        .map(|(label, a)| (label, format_complex(a, config.precision)))
        .collect();
    json!({
        "num_qubits": psi.num_qubits(),
        "amplitudes": amplitudes,
        "formatted": formatted,
        "probabilities": psi.probabilities_dict(),
    })
}

/// Print a JSON value, pretty-printed.
pub fn print_json(value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{json}");
    Ok(())
}
