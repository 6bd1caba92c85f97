//! Matrices and states for `qref-ir` circuits.
//!
//! Everything here is indexed with the convention defined in [`ordering`]:
//! qubit 0 is the least significant bit of a basis index, and multi-qubit
//! operators are Kronecker products with the highest qubit as the leftmost
//! factor.
//!
//! ```rust
//! use qref_info::{Operator, Statevector};
//! use qref_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("x0", 2);
//! circuit.x(QubitId(0)).unwrap();
//!
//! let psi = Statevector::from_circuit(&circuit).unwrap();
//! assert_eq!(psi.probabilities_dict().keys().collect::<Vec<_>>(), vec!["01"]);
//!
//! let op = Operator::from_circuit(&circuit).unwrap();
//! assert_eq!(op.dim(), 4);
//! ```

pub mod error;
pub mod format;
pub mod matrices;
pub mod operator;
pub mod ordering;
pub mod statevector;

pub use error::{InfoError, InfoResult};
pub use matrices::{gate_matrix, standard_gate_matrix};
pub use operator::Operator;
pub use ordering::{Matrix, basis_index, basis_label, embed, embed_single, kron, permute_qubits};
pub use statevector::Statevector;
