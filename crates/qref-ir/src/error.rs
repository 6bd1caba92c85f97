//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building or transforming circuits.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A register with this name is already part of the circuit.
    #[error("Register '{0}' already exists in circuit")]
    DuplicateRegister(String),

    /// No register with this name exists in the circuit.
    #[error("Register '{0}' not found in circuit")]
    RegisterNotFound(String),

    /// Index past the end of a register.
    #[error("Index {index} out of range for register '{register}' of size {size}")]
    RegisterIndexOutOfRange {
        /// Register name.
        register: String,
        /// Requested index.
        index: u32,
        /// Register size.
        size: u32,
    },

    /// Parameter is unbound.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),

    /// Expression cannot be evaluated, e.g. division by zero.
    #[error("Parameter expression '{0}' does not evaluate to a number")]
    InvalidExpression(String),

    /// Binding names a parameter the circuit does not contain.
    #[error("Cannot bind parameter '{0}' not present in the circuit")]
    UnknownParameter(String),

    /// The circuit being composed has more qubits than the target.
    #[error("Cannot compose a {needed}-qubit circuit onto {available} qubits")]
    CircuitTooWide {
        /// Qubits required by the operand.
        needed: usize,
        /// Qubits available in the target.
        available: usize,
    },

    /// Instruction cannot be part of a gate definition.
    #[error("Instruction '{0}' cannot be converted to a gate")]
    NotAGate(String),

    /// Serialized circuit data is inconsistent.
    #[error("Invalid circuit data: {0}")]
    InvalidCircuit(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
