//! Order command implementation.
//!
//! Prints which basis label each amplitude index stands for.

use anyhow::Result;
use console::style;
use qref_info::basis_label;
use serde_json::json;

use super::common::print_json;
use crate::OutputFormat;

/// Largest table the command prints.
const MAX_TABLE_QUBITS: usize = 10;

/// Execute the order command.
pub fn execute(num_qubits: usize, format: OutputFormat) -> Result<()> {
    if num_qubits == 0 || num_qubits > MAX_TABLE_QUBITS {
        anyhow::bail!("--qubits must be between 1 and {MAX_TABLE_QUBITS}, got {num_qubits}");
    }
    let rows = order_table(num_qubits);

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = rows
                .iter()
                .map(|(index, label)| json!({ "index": index, "label": label }))
                .collect();
            print_json(&json!({ "num_qubits": num_qubits, "basis": entries }))
        }
        OutputFormat::Text => {
            println!(
                "{} Basis order for {} qubits (qubit 0 is the rightmost bit)",
                style("→").cyan().bold(),
                num_qubits
            );
            let header: Vec<String> = (0..num_qubits).rev().map(|q| format!("q{q}")).collect();
            println!("  {:>5}  {}", style("index").dim(), style(header.join(" ")).dim());
            for (index, label) in &rows {
                let bits: Vec<String> = label
                    .chars()
                    .zip(&header)
                    .map(|(bit, name)| format!("{bit:>w$}", w = name.len()))
                    .collect();
                println!("  {:>5}  {}   |{}⟩", index, bits.join(" "), style(label).cyan());
            }
            Ok(())
        }
    }
}

/// `(index, label)` for every basis state.
fn order_table(num_qubits: usize) -> Vec<(usize, String)> {
    (0..1_usize << num_qubits)
        .map(|k| (k, basis_label(k, num_qubits)))
        .collect()
}
