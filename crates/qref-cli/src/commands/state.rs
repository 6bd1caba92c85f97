//! State command implementation.

use anyhow::{Context, Result};
use console::style;
use qref_info::Statevector;
use serde_json::json;
use tracing::info;

use super::common::{print_counts, print_json, print_state, state_json};
use crate::OutputFormat;
use crate::config::DisplayConfig;

/// Execute the state command.
pub fn execute(
    config: &DisplayConfig,
    format: OutputFormat,
    label: Option<&str>,
    int: Option<usize>,
    dims: Option<usize>,
    shots: Option<usize>,
) -> Result<()> {
    let (name, psi) = build_state(label, int, dims)?;
    info!(num_qubits = psi.num_qubits(), "built {name}");

    let counts = match shots {
        Some(0) => anyhow::bail!("--shots must be at least 1"),
        Some(n) => Some(psi.sample_counts(n, config.seed)),
        None => None,
    };

    match format {
        OutputFormat::Json => {
            let mut value = state_json(&psi, config);
            value["name"] = json!(name);
            if let Some(counts) = &counts {
                value["counts"] = json!(counts);
            }
            print_json(&value)
        }
        OutputFormat::Text => {
            println!(
                "{} {} on {} qubits",
                style("→").cyan().bold(),
                name,
                psi.num_qubits()
            );
            print_state("ψ", &psi, config);
            if let Some(counts) = &counts {
                print_counts(counts);
            }
            Ok(())
        }
    }
}

fn build_state(
    label: Option<&str>,
    int: Option<usize>,
    dims: Option<usize>,
) -> Result<(String, Statevector)> {
    match (label, int, dims) {
        (Some(label), _, _) => {
            let psi = Statevector::from_label(label)
                .with_context(|| format!("invalid basis label '{label}'"))?;
            Ok((format!("from_label(\"{label}\")"), psi))
        }
        (None, Some(index), Some(dims)) => {
            let psi = Statevector::from_int(index, dims)
                .with_context(|| format!("cannot build |{index}⟩ in dimension {dims}"))?;
            Ok((format!("from_int({index}, dims={dims})"), psi))
        }
        _ => anyhow::bail!("pass either --label or --int with --dims"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_from_label() {
        let (name, psi) = build_state(Some("011"), None, None).unwrap();
        assert_eq!(name, "from_label(\"011\")");
        assert_eq!(psi.probabilities_dict().keys().collect::<Vec<_>>(), vec!["011"]);
    }

    #[test]
    fn test_build_from_int() {
        let (_, psi) = build_state(None, Some(3), Some(16)).unwrap();
        assert_eq!(psi.num_qubits(), 4);
        assert_eq!(psi.probabilities_dict().keys().collect::<Vec<_>>(), vec!["0011"]);
    }

    #[test]
    fn test_build_requires_input() {
        assert!(build_state(None, None, None).is_err());
        assert!(build_state(None, Some(3), Some(6)).is_err());
        assert!(build_state(Some("01x"), None, None).is_err());
    }
}
