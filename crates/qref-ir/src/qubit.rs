//! Qubits and registers.
//!
//! Qubit indices are assigned in the order registers are added to a circuit:
//! the first register's slots get the lowest indices.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Index of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The index as a `usize`, for addressing amplitudes and bit positions.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// What a register is used for.
///
/// Ancilla registers behave exactly like quantum registers; the tag only
/// records that their qubits are auxiliary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RegisterKind {
    /// A register carrying primary data.
    #[default]
    Quantum,
    /// A register of bookkeeping qubits.
    Ancilla,
}

/// A named, ordered group of qubit slots, not yet bound to a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    name: String,
    size: u32,
    kind: RegisterKind,
}

impl Register {
    /// Create a quantum register.
    pub fn quantum(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
            kind: RegisterKind::Quantum,
        }
    }

    /// Create an ancilla register.
    pub fn ancilla(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
            kind: RegisterKind::Ancilla,
        }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of slots.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Register kind.
    pub fn kind(&self) -> RegisterKind {
        self.kind
    }

    /// Whether this is an ancilla register.
    pub fn is_ancilla(&self) -> bool {
        self.kind == RegisterKind::Ancilla
    }
}

/// A register bound into a circuit: slot `i` is the qubit `qubits[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterLayout {
    register: Register,
    qubits: Vec<QubitId>,
}

impl RegisterLayout {
    pub(crate) fn new(register: Register, qubits: Vec<QubitId>) -> Self {
        debug_assert_eq!(register.size as usize, qubits.len());
        Self { register, qubits }
    }

    /// The register definition.
    pub fn register(&self) -> &Register {
        &self.register
    }

    /// Register name.
    pub fn name(&self) -> &str {
        self.register.name()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Whether the register has no slots.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Whether this is an ancilla register.
    pub fn is_ancilla(&self) -> bool {
        self.register.is_ancilla()
    }

    /// Circuit qubits in slot order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// The circuit qubit at slot `index`.
    pub fn qubit(&self, index: u32) -> IrResult<QubitId> {
        self.qubits
            .get(index as usize)
            .copied()
            .ok_or_else(|| IrError::RegisterIndexOutOfRange {
                register: self.register.name.clone(),
                index,
                size: self.register.size,
            })
    }
}

/// A qubit with optional register membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    /// The circuit index.
    pub id: QubitId,
    /// The name of the register this qubit belongs to, if any.
    pub register: Option<String>,
    /// The slot within the register, if any.
    pub index: Option<u32>,
    /// Whether the owning register is an ancilla register.
    #[serde(default)]
    pub ancilla: bool,
}

impl Qubit {
    /// Create a qubit outside any register.
    pub fn new(id: QubitId) -> Self {
        Self {
            id,
            register: None,
            index: None,
            ancilla: false,
        }
    }

    /// Create a qubit belonging to `register` at slot `index`.
    pub fn with_register(id: QubitId, register: &Register, index: u32) -> Self {
        Self {
            id,
            register: Some(register.name.clone()),
            index: Some(index),
            ancilla: register.is_ancilla(),
        }
    }

    /// Wire label used by the text drawer, e.g. `x_0`.
    pub fn wire_label(&self) -> String {
        match (&self.register, self.index) {
            (Some(reg), Some(idx)) => format!("{reg}_{idx}"),
            _ => format!("q_{}", self.id.0),
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.register, self.index) {
            (Some(reg), Some(idx)) => write!(f, "{reg}[{idx}]"),
            _ => write!(f, "{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        let q = Qubit::new(QubitId(0));
        assert_eq!(format!("{q}"), "q0");
        assert_eq!(q.wire_label(), "q_0");

        let reg = Register::ancilla("a", 2);
        let q_reg = Qubit::with_register(QubitId(3), &reg, 1);
        assert_eq!(format!("{q_reg}"), "a[1]");
        assert_eq!(q_reg.wire_label(), "a_1");
        assert!(q_reg.ancilla);
    }

    #[test]
    fn test_register_kinds() {
        assert!(!Register::quantum("x", 2).is_ancilla());
        assert!(Register::ancilla("a", 1).is_ancilla());
        assert_eq!(Register::quantum("x", 2).kind(), RegisterKind::Quantum);
    }

    #[test]
    fn test_layout_lookup() {
        let layout =
            RegisterLayout::new(Register::quantum("x", 2), vec![QubitId(4), QubitId(5)]);
        assert_eq!(layout.qubit(1).unwrap(), QubitId(5));
        assert!(matches!(
            layout.qubit(2),
            Err(IrError::RegisterIndexOutOfRange { index: 2, size: 2, .. })
        ));
    }
}
