//! Registers, gates and circuits for qref.
//!
//! Every type in this crate follows one ordering convention: qubit `i` of a
//! circuit is bit `i` of a computational-basis index, so qubit 0 is the least
//! significant bit. Registers are laid out contiguously in the order they are
//! added, and the first operand of a gate is its local least significant
//! qubit. Matrices and state vectors built from these circuits live in
//! `qref-info`.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qref_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Example: Registers and Bit Reversal
//!
//! ```rust
//! use qref_ir::{Circuit, QubitId, Register};
//!
//! let circuit = Circuit::with_registers(
//!     "example",
//!     [Register::quantum("x", 2), Register::ancilla("a", 1)],
//! )
//! .unwrap();
//! assert_eq!(circuit.qubit_in("a", 0).unwrap(), QubitId(2));
//!
//! let reversed = circuit.reverse_bits();
//! assert_eq!(reversed.qubit_in("a", 0).unwrap(), QubitId(0));
//! assert_eq!(reversed.reverse_bits(), circuit);
//! ```
//!
//! # Example: Parameterized Circuit
//!
//! ```rust
//! use qref_ir::{Circuit, Parameter, QubitId};
//! use std::f64::consts::PI;
//!
//! let theta = Parameter::new("θ");
//! let mut circuit = Circuit::with_size("variational", 1);
//! circuit.rx(&theta, QubitId(0)).unwrap();
//! assert!(circuit.is_parameterized());
//!
//! let bound = circuit.assign_parameters([(&theta, PI / 4.0)]).unwrap();
//! assert!(!bound.is_parameterized());
//! ```

pub mod circuit;
pub mod draw;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use draw::TextDrawer;
pub use error::{IrError, IrResult};
pub use gate::{CompositeGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use parameter::{Parameter, ParameterBindings, ParameterExpression, format_angle};
pub use qubit::{Qubit, QubitId, Register, RegisterKind, RegisterLayout};
