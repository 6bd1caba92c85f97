//! Walkthrough command implementation.
//!
//! Rebuilds the reference circuits step by step: registers, the example
//! circuit and its operator, the inverse, statevectors from circuits and
//! labels, bit-order reversal, parameter binding and gate composition.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use console::style;
use qref_info::{Operator, Statevector};
use qref_ir::{Circuit, Gate, Parameter, ParameterExpression, QubitId, Register};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::common::{draw, print_counts, print_json, print_section, print_state, state_json};
use crate::OutputFormat;
use crate::config::DisplayConfig;

/// Execute the walkthrough command.
pub fn execute(config: &DisplayConfig, format: OutputFormat) -> Result<()> {
    let steps = build_steps(config)?;
    info!(steps = steps.len(), "walkthrough built");

    match format {
        OutputFormat::Json => {
            let sections: Vec<Value> = steps.iter().map(|s| s.to_json(config)).collect();
            print_json(&json!({ "sections": sections }))
        }
        OutputFormat::Text => {
            for step in &steps {
                step.print(config);
            }
            println!(
                "\n{} {} sections complete",
                style("✓").green().bold(),
                steps.len()
            );
            Ok(())
        }
    }
}

/// One printed section.
struct Step {
    title: String,
    notes: Vec<String>,
    drawings: Vec<(String, String)>,
    operator: Option<Operator>,
    states: Vec<(String, Statevector)>,
    counts: Option<BTreeMap<String, usize>>,
}

impl Step {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: vec![],
            drawings: vec![],
            operator: None,
            states: vec![],
            counts: None,
        }
    }

    fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    fn drawing(
        mut self,
        caption: impl Into<String>,
        circuit: &Circuit,
        config: &DisplayConfig,
    ) -> Self {
        self.drawings.push((caption.into(), draw(circuit, config)));
        self
    }

    fn reversed_drawing(mut self, caption: impl Into<String>, circuit: &Circuit) -> Self {
        self.drawings
            .push((caption.into(), circuit.drawer().reverse_bits(true).render()));
        self
    }

    fn state(mut self, name: impl Into<String>, psi: Statevector) -> Self {
        self.states.push((name.into(), psi));
        self
    }

    fn print(&self, config: &DisplayConfig) {
        print_section(&self.title);
        for note in &self.notes {
            println!("{note}");
        }
        for (caption, drawing) in &self.drawings {
            println!("{}", style(caption).dim());
            println!("{drawing}");
        }
        if let Some(op) = &self.operator {
            print!("{:.prec$}", op, prec = config.precision);
        }
        for (name, psi) in &self.states {
            print_state(name, psi, config);
        }
        if let Some(counts) = &self.counts {
            print_counts(counts);
        }
    }

    fn to_json(&self, config: &DisplayConfig) -> Value {
        let drawings: Vec<Value> = self
            .drawings
            .iter()
            .map(|(caption, drawing)| json!({ "caption": caption, "text": drawing }))
            .collect();
        let states: Vec<Value> = self
            .states
            .iter()
            .map(|(name, psi)| {
                let mut value = state_json(psi, config);
                value["name"] = json!(name);
                value
            })
            .collect();
        json!({
            "title": self.title,
            "notes": self.notes,
            "drawings": drawings,
            "operator": self.operator.as_ref().map(|op| op.to_rows(config.precision)),
            "states": states,
            "counts": self.counts,
        })
    }
}

/// Two data qubits `x` and one ancilla `a`: H, CX, CCX then Y on the ancilla.
fn example_circuit() -> Result<Circuit> {
    let mut circuit = Circuit::with_registers(
        "example circuit",
        [Register::quantum("x", 2), Register::ancilla("a", 1)],
    )?;
    let x0 = circuit.qubit_in("x", 0)?;
    let x1 = circuit.qubit_in("x", 1)?;
    let a0 = circuit.qubit_in("a", 0)?;
    circuit.h(x0)?.cx(x0, x1)?.ccx(x0, x1, a0)?.y(a0)?;
    Ok(circuit)
}

/// X on qubit 0 of a two-qubit circuit.
fn two_qubit_x() -> Result<Circuit> {
    let mut circuit = Circuit::with_size("two_qubit_x", 2);
    circuit.x(QubitId(0))?;
    Ok(circuit)
}

/// Three data qubits and two ancillas, with `gate` placed on `[x1, x2, a0]`.
fn composed_circuit(gate: Gate) -> Result<Circuit> {
    let mut circuit = Circuit::with_registers(
        "circuit2",
        [Register::quantum("x", 3), Register::ancilla("a", 2)],
    )?;
    let x: Vec<_> = circuit.register("x")?.qubits().to_vec();
    let a: Vec<_> = circuit.register("a")?.qubits().to_vec();
    circuit
        .x(x[1])?
        .cz(x[0], a[0])?
        .gate(gate, [x[1], x[2], a[0]])?
        .barrier_all()?
        .h_each(x.iter().copied())?
        .barrier_all()?
        .ccz(x[1], a[0], a[1])?;
    Ok(circuit)
}

/// A copy of `circuit` with `rz(theta)` on `x_1`.
fn with_rz(circuit: &Circuit, theta: &Parameter) -> Result<Circuit> {
    let mut parameterized = circuit.clone();
    let x1 = parameterized.qubit_in("x", 1)?;
    parameterized.rz(theta, x1)?;
    Ok(parameterized)
}

fn build_steps(config: &DisplayConfig) -> Result<Vec<Step>> {
    let tol = config.tolerance.max(1e-9);
    let mut steps = Vec::new();

    // Registers and the example circuit.
    let circuit = example_circuit()?;
    let layout: Vec<String> = circuit
        .qubits()
        .iter()
        .map(|q| format!("  qubit {} = {}", q.id.index(), q.wire_label()))
        .collect();
    steps.push(
        Step::new("Registers and circuit")
            .note(format!(
                "{} qubits, {} ancilla, depth {}",
                circuit.num_qubits(),
                circuit.num_ancillas(),
                circuit.depth()
            ))
            .note(layout.join("\n"))
            .drawing("circuit", &circuit, config),
    );

    // Operator.
    let op = Operator::from_circuit(&circuit).context("failed to build the operator")?;
    let mut step = Step::new("Operator")
        .note("Rows and columns are indexed with qubit 0 as the least significant bit.")
        .note(format!("unitary: {}", op.is_unitary(tol)));
    step.operator = Some(op.clone());
    steps.push(step);

    // Inverse.
    let inverse = circuit.inverse();
    let inverse_op = Operator::from_circuit(&inverse)?;
    let undone = op.compose(&inverse_op)?.approx_eq(&Operator::identity(op.num_qubits())?, tol);
    let mut step = Step::new("Inverse")
        .drawing("inverse", &inverse, config)
        .note(format!("circuit followed by its inverse is the identity: {undone}"));
    step.operator = Some(inverse_op);
    steps.push(step);

    // Statevector.
    let psi = Statevector::from_circuit(&circuit)?;
    let mut step = Step::new("Statevector").state("ψ", psi.clone());
    step.counts = Some(psi.sample_counts(config.shots, config.seed));
    steps.push(step);

    // States from labels and integers.
    steps.push(
        Step::new("States from labels")
            .note("The leftmost character of a label is the highest qubit.")
            .state("from_label(\"011\")", Statevector::from_label("011")?)
            .state("from_label(\"+1-\")", Statevector::from_label("+1-")?)
            .state("from_int(3, dims=16)", Statevector::from_int(3, 16)?),
    );

    // Bit order.
    let flip = two_qubit_x()?;
    let reversed = flip.reverse_bits();
    steps.push(
        Step::new("Bit order")
            .note("X on qubit 0 sets the rightmost bit of the label.")
            .drawing("two_qubit_x", &flip, config)
            .reversed_drawing("two_qubit_x, drawn with reverse_bits", &flip)
            .state("two_qubit_x", Statevector::from_circuit(&flip)?)
            .drawing("two_qubit_x.reverse_bits()", &reversed, config)
            .state("two_qubit_x.reverse_bits()", Statevector::from_circuit(&reversed)?),
    );

    // Parameters.
    let theta = Parameter::new("θ");
    let parameterized = with_rz(&circuit, &theta)?;
    let unbound = Statevector::from_circuit(&parameterized).is_err();
    let half_pi = (ParameterExpression::pi() / ParameterExpression::from(2)).evaluate()?;
    let bound = parameterized.assign_parameters([(theta.name(), half_pi)])?;
    debug!(parameters = ?parameterized.parameters(), "bound parameters");
    steps.push(
        Step::new("Parameters")
            .drawing("with rz(θ) on x_1", &parameterized, config)
            .note(format!(
                "parameters: {:?}, simulating unbound fails: {unbound}",
                parameterized.parameters()
            ))
            .drawing("θ = π/2", &bound, config)
            .state("ψ(θ = π/2)", Statevector::from_circuit(&bound)?),
    );

    // Composition.
    let gate = bound.to_gate()?.with_label("qc1");
    let circuit2 = composed_circuit(gate)?;
    let ops: Vec<String> = circuit2
        .count_ops()
        .iter()
        .map(|(name, count)| format!("{name}: {count}"))
        .collect();
    steps.push(
        Step::new("Composition")
            .note("qc1 operand 0 is x_1, operand 1 is x_2 and operand 2 is a_0.")
            .drawing("circuit2", &circuit2, config)
            .note(format!(
                "size {}, depth {}, ops {{{}}}",
                circuit2.size(),
                circuit2.depth(),
                ops.join(", ")
            ))
            .state("circuit2", Statevector::from_circuit(&circuit2)?),
    );

    Ok(steps)
}
