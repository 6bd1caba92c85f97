//! Error types for the info crate.

use thiserror::Error;

/// Errors produced while building matrices and states.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InfoError {
    /// Circuit IR error, e.g. an unbound parameter.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qref_ir::IrError),

    /// Two objects of different sizes were combined.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// The dimension required.
        expected: usize,
        /// The dimension supplied.
        got: usize,
    },

    /// A basis or state label contains an unsupported character.
    #[error("Invalid label '{label}': {reason}")]
    InvalidLabel {
        /// The offending label.
        label: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Basis index outside the space.
    #[error("Index {index} out of range for dimension {dim}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Space dimension.
        dim: usize,
    },

    /// Dimension is not 2^n.
    #[error("Dimension {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// Matrix is not square.
    #[error("Matrix of shape {rows}x{cols} is not square")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Qubit index past the end of the system.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit system")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Number of qubits in the system.
        num_qubits: usize,
    },

    /// The same qubit appears twice in an operand list.
    #[error("Duplicate qubit {0} in operand list")]
    DuplicateQubit(usize),

    /// Dense representation would not fit in memory.
    #[error("{num_qubits} qubits exceeds the dense limit of {max}")]
    TooManyQubits {
        /// Qubits requested.
        num_qubits: usize,
        /// Largest supported size.
        max: usize,
    },
}

/// Result type for info operations.
pub type InfoResult<T> = Result<T, InfoError>;
