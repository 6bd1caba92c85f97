//! High-level circuit builder API.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::draw::TextDrawer;
use crate::error::{IrError, IrResult};
use crate::gate::{CompositeGate, Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::{ParameterBindings, ParameterExpression};
use crate::qubit::{Qubit, QubitId, Register, RegisterLayout};

/// A quantum circuit: an ordered list of instructions over owned registers.
///
/// Qubit `i` is bit `i` of a basis-state index, so the qubits of the first
/// register added are the least significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CircuitData")]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in index order.
    qubits: Vec<Qubit>,
    /// Registers in insertion order.
    registers: Vec<RegisterLayout>,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
    /// Global phase in radians.
    global_phase: f64,
}

/// Wire form of a [`Circuit`], checked before it becomes one.
#[derive(Deserialize)]
struct CircuitData {
    name: String,
    qubits: Vec<Qubit>,
    registers: Vec<RegisterLayout>,
    instructions: Vec<Instruction>,
    global_phase: f64,
}

impl TryFrom<CircuitData> for Circuit {
    type Error = IrError;

    /// Rebuilds the circuit through the same checks the builders apply.
    fn try_from(data: CircuitData) -> IrResult<Self> {
        for (i, qubit) in data.qubits.iter().enumerate() {
            if qubit.id.index() != i {
                return Err(IrError::InvalidCircuit(format!(
                    "qubit at position {i} has id {}",
                    qubit.id
                )));
            }
        }

        let mut circuit = Circuit::new(data.name);
        circuit.qubits = data.qubits;
        circuit.global_phase = data.global_phase;

        for layout in data.registers {
            if circuit.registers.iter().any(|r| r.name() == layout.name()) {
                return Err(IrError::DuplicateRegister(layout.name().to_string()));
            }
            if layout.len() != layout.register().size() as usize {
                return Err(IrError::InvalidCircuit(format!(
                    "register '{}' has {} slots, expected {}",
                    layout.name(),
                    layout.len(),
                    layout.register().size()
                )));
            }
            for (slot, &id) in layout.qubits().iter().enumerate() {
                let qubit = circuit.qubits.get(id.index()).ok_or(IrError::QubitNotFound {
                    qubit: id,
                    gate_name: None,
                })?;
                if qubit.register.as_deref() != Some(layout.name())
                    || qubit.index != Some(slot as u32)
                {
                    return Err(IrError::InvalidCircuit(format!(
                        "qubit {id} is not slot {slot} of register '{}'",
                        layout.name()
                    )));
                }
            }
            circuit.registers.push(layout);
        }

        for instruction in data.instructions {
            circuit.append(instruction)?;
        }
        Ok(circuit)
    }
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            registers: vec![],
            instructions: vec![],
            global_phase: 0.0,
        }
    }

    /// Create a circuit with a single register `q` of `num_qubits` qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        let mut circuit = Self::new(name);
        if num_qubits > 0 {
            circuit.push_register(Register::quantum("q", num_qubits));
        }
        circuit
    }

    /// Create a circuit from registers, assigning indices in the given order.
    pub fn with_registers(
        name: impl Into<String>,
        registers: impl IntoIterator<Item = Register>,
    ) -> IrResult<Self> {
        let mut circuit = Self::new(name);
        for register in registers {
            circuit.add_register(register)?;
        }
        Ok(circuit)
    }

    /// Add a single qubit outside any register.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = self.next_qubit_id();
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a register; its slots take the next free qubit indices.
    pub fn add_register(&mut self, register: Register) -> IrResult<Vec<QubitId>> {
        if self.registers.iter().any(|r| r.name() == register.name()) {
            return Err(IrError::DuplicateRegister(register.name().to_string()));
        }
        Ok(self.push_register(register))
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<QubitId>> {
        self.add_register(Register::quantum(name, size))
    }

    /// Add an ancilla register with multiple qubits.
    pub fn add_ancilla_reg(
        &mut self,
        name: impl Into<String>,
        size: u32,
    ) -> IrResult<Vec<QubitId>> {
        self.add_register(Register::ancilla(name, size))
    }

    fn push_register(&mut self, register: Register) -> Vec<QubitId> {
        let ids: Vec<_> = (0..register.size())
            .map(|i| {
                let id = self.next_qubit_id();
                self.qubits.push(Qubit::with_register(id, &register, i));
                id
            })
            .collect();
        self.registers.push(RegisterLayout::new(register, ids.clone()));
        ids
    }

    fn next_qubit_id(&self) -> QubitId {
        QubitId(self.qubits.len() as u32)
    }

    /// Look up a register by name.
    pub fn register(&self, name: &str) -> IrResult<&RegisterLayout> {
        self.registers
            .iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| IrError::RegisterNotFound(name.to_string()))
    }

    /// The circuit qubit at `register[index]`.
    pub fn qubit_in(&self, register: &str, index: u32) -> IrResult<QubitId> {
        self.register(register)?.qubit(index)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::I, [qubit])
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::H, [qubit])
    }

    /// Apply Hadamard to each qubit in turn, e.g. every slot of a register.
    pub fn h_each(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        for qubit in qubits {
            self.h(qubit)?;
        }
        Ok(self)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::X, [qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Y, [qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Z, [qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::S, [qubit])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Sdg, [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::T, [qubit])
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Tdg, [qubit])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::SX, [qubit])
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::SXdg, [qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Rx(theta.into()), [qubit])
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Ry(theta.into()), [qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Rz(theta.into()), [qubit])
    }

    /// Apply phase gate.
    pub fn p(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::P(theta.into()), [qubit])
    }

    /// Apply universal U gate.
    pub fn u(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_standard(
            StandardGate::U(theta.into(), phi.into(), lambda.into()),
            [qubit],
        )
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CX, [control, target])
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CY, [control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CZ, [control, target])
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CH, [control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Swap, [q1, q2])
    }

    /// Apply controlled-Rx gate.
    pub fn crx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CRx(theta.into()), [control, target])
    }

    /// Apply controlled-Ry gate.
    pub fn cry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CRy(theta.into()), [control, target])
    }

    /// Apply controlled-Rz gate.
    pub fn crz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CRz(theta.into()), [control, target])
    }

    /// Apply controlled-phase gate.
    pub fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CP(theta.into()), [control, target])
    }

    /// Apply RZZ (ZZ rotation) gate.
    pub fn rzz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        q1: QubitId,
        q2: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::RZZ(theta.into()), [q1, q2])
    }

    // =========================================================================
    // Three-qubit gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CCX, [c1, c2, target])
    }

    /// Apply doubly-controlled Z gate.
    pub fn ccz(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CCZ, [c1, c2, target])
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CSwap, [control, t1, t2])
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply any gate, including one produced by [`Circuit::to_gate`].
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.append(Instruction::barrier(qubits))?;
        Ok(self)
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.barrier(qubits)
    }

    /// Shift the global phase by `phase` radians.
    pub fn add_global_phase(&mut self, phase: f64) -> &mut Self {
        self.global_phase += phase;
        self
    }

    fn apply_standard<const N: usize>(
        &mut self,
        gate: StandardGate,
        qubits: [QubitId; N],
    ) -> IrResult<&mut Self> {
        self.append(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Validate and append an instruction.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<()> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(())
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits();
            let got = instruction.qubits.len() as u32;
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got,
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if qubit.index() >= self.qubits.len() {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Transformations
    // =========================================================================

    /// The adjoint circuit: instructions reversed, each gate inverted.
    pub fn inverse(&self) -> Self {
        Self {
            name: format!("{}_dg", self.name),
            qubits: self.qubits.clone(),
            registers: self.registers.clone(),
            instructions: self.instructions.iter().rev().map(Instruction::inverse).collect(),
            global_phase: -self.global_phase,
        }
    }

    /// Relabel qubit `i` as `N-1-i`.
    ///
    /// Registers are re-added in reverse order and each register's slots are
    /// mirrored, so registers stay contiguous and applying this twice gives
    /// back the original circuit. The ordering convention itself is
    /// unchanged: only which qubit is called index 0 moves.
    pub fn reverse_bits(&self) -> Self {
        let n = self.qubits.len() as u32;
        let flip = |q: QubitId| QubitId(n - 1 - q.0);

        let registers: Vec<_> = self
            .registers
            .iter()
            .rev()
            .map(|layout| {
                let qubits = layout.qubits().iter().rev().map(|&q| flip(q)).collect();
                RegisterLayout::new(layout.register().clone(), qubits)
            })
            .collect();

        let mut qubits: Vec<_> = (0..n).map(|i| Qubit::new(QubitId(i))).collect();
        for layout in &registers {
            for (slot, &q) in layout.qubits().iter().enumerate() {
                qubits[q.index()] = Qubit::with_register(q, layout.register(), slot as u32);
            }
        }

        debug!(circuit = %self.name, num_qubits = n, "reversing bit order");
        Self {
            name: self.name.clone(),
            qubits,
            registers,
            instructions: self.instructions.iter().map(|i| i.remapped(flip)).collect(),
            global_phase: self.global_phase,
        }
    }

    /// Return a copy with parameters bound.
    ///
    /// Every name in `bindings` must be a parameter of the circuit.
    pub fn assign_parameters<I, K>(&self, bindings: I) -> IrResult<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut circuit = self.clone();
        circuit.assign_parameters_in_place(bindings)?;
        Ok(circuit)
    }

    /// Bind parameters in place. See [`Circuit::assign_parameters`].
    pub fn assign_parameters_in_place<I, K>(&mut self, bindings: I) -> IrResult<&mut Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let bindings: ParameterBindings =
            bindings.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let known = self.parameters();
        if let Some(unknown) = bindings.keys().find(|name| !known.contains(*name)) {
            return Err(IrError::UnknownParameter(unknown.clone()));
        }
        self.bind_known(&bindings);
        Ok(self)
    }

    pub(crate) fn bind_known(&mut self, bindings: &ParameterBindings) {
        for gate in self.instructions.iter_mut().filter_map(Instruction::gate_mut) {
            *gate = gate.bind_parameters(bindings);
        }
    }

    /// Return a copy with `other` appended, its qubit `i` mapped to
    /// `qubits[i]`. An empty mapping places `other` on qubits `0..`.
    pub fn compose(&self, other: &Circuit, qubits: &[QubitId]) -> IrResult<Self> {
        let mut circuit = self.clone();
        circuit.compose_in_place(other, qubits)?;
        Ok(circuit)
    }

    /// Append `other` in place. Nothing is appended if any instruction fails
    /// validation.
    pub fn compose_in_place(&mut self, other: &Circuit, qubits: &[QubitId]) -> IrResult<&mut Self> {
        let mapping: Vec<QubitId> = if qubits.is_empty() {
            if other.num_qubits() > self.num_qubits() {
                return Err(IrError::CircuitTooWide {
                    needed: other.num_qubits(),
                    available: self.num_qubits(),
                });
            }
            other.qubits.iter().map(|q| q.id).collect()
        } else {
            if qubits.len() != other.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: other.name.clone(),
                    expected: other.num_qubits() as u32,
                    got: qubits.len() as u32,
                });
            }
            qubits.to_vec()
        };

        let mapped: Vec<_> = other
            .instructions
            .iter()
            .map(|inst| inst.remapped(|q| mapping[q.index()]))
            .collect();
        for inst in &mapped {
            self.validate(inst)?;
        }
        debug!(
            target_circuit = %self.name,
            operand = %other.name,
            instructions = mapped.len(),
            "composing circuit"
        );
        self.instructions.extend(mapped);
        self.global_phase += other.global_phase;
        Ok(self)
    }

    /// Wrap this circuit as a gate whose operand `i` is qubit `i`.
    ///
    /// Fails if the circuit contains barriers.
    pub fn to_gate(&self) -> IrResult<Gate> {
        if let Some(inst) = self.instructions.iter().find(|i| !i.is_gate()) {
            return Err(IrError::NotAGate(inst.name().to_string()));
        }
        Ok(Gate::composite(CompositeGate::new(
            self.name.clone(),
            self.clone(),
        )))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Number of qubits that belong to ancilla registers.
    pub fn num_ancillas(&self) -> usize {
        self.qubits.iter().filter(|q| q.ancilla).count()
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the registers in insertion order.
    pub fn registers(&self) -> &[RegisterLayout] {
        &self.registers
    }

    /// Get the instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Global phase in radians.
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Number of gates (barriers excluded).
    pub fn size(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Longest chain of gates on any qubit path (barriers excluded).
    pub fn depth(&self) -> usize {
        let mut levels = vec![0_usize; self.qubits.len()];
        for inst in self.instructions.iter().filter(|i| i.is_gate()) {
            let level = inst
                .qubits
                .iter()
                .map(|q| levels[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &inst.qubits {
                levels[q.index()] = level;
            }
        }
        levels.into_iter().max().unwrap_or(0)
    }

    /// Count of each instruction name.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Names of all unbound parameters, sorted.
    pub fn parameters(&self) -> BTreeSet<String> {
        self.instructions
            .iter()
            .filter_map(Instruction::as_gate)
            .flat_map(Gate::parameters)
            .collect()
    }

    /// Whether any gate still has unbound parameters.
    pub fn is_parameterized(&self) -> bool {
        self.instructions
            .iter()
            .filter_map(Instruction::as_gate)
            .any(Gate::is_parameterized)
    }

    /// A text drawer for this circuit.
    pub fn drawer(&self) -> TextDrawer<'_> {
        TextDrawer::new(self)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.drawer().render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Parameter;
    use std::f64::consts::PI;

    fn example_circuit() -> Circuit {
        let mut circuit = Circuit::with_registers(
            "example circuit",
            [Register::quantum("x", 2), Register::ancilla("a", 1)],
        )
        .unwrap();
        let x0 = circuit.qubit_in("x", 0).unwrap();
        let x1 = circuit.qubit_in("x", 1).unwrap();
        let a0 = circuit.qubit_in("a", 0).unwrap();
        circuit
            .h(x0)
            .unwrap()
            .cx(x0, x1)
            .unwrap()
            .ccx(x0, x1, a0)
            .unwrap()
            .y(a0)
            .unwrap();
        circuit
    }

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_with_size_creates_q_register() {
        let circuit = Circuit::with_size("test", 3);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.register("q").unwrap().len(), 3);
    }

    #[test]
    fn test_register_insertion_order_assigns_indices() {
        let circuit = example_circuit();
        assert_eq!(circuit.qubit_in("x", 0).unwrap(), QubitId(0));
        assert_eq!(circuit.qubit_in("x", 1).unwrap(), QubitId(1));
        assert_eq!(circuit.qubit_in("a", 0).unwrap(), QubitId(2));
        assert_eq!(circuit.num_ancillas(), 1);
    }

    #[test]
    fn test_duplicate_register_rejected() {
        let mut circuit = Circuit::new("test");
        circuit.add_qreg("x", 2).unwrap();
        assert_eq!(
            circuit.add_ancilla_reg("x", 1),
            Err(IrError::DuplicateRegister("x".into()))
        );
        assert_eq!(circuit.num_qubits(), 2);
    }

    #[test]
    fn test_unknown_register_lookup() {
        let circuit = example_circuit();
        assert!(matches!(
            circuit.qubit_in("b", 0),
            Err(IrError::RegisterNotFound(_))
        ));
        assert!(matches!(
            circuit.qubit_in("a", 1),
            Err(IrError::RegisterIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_validation_errors() {
        let mut circuit = Circuit::with_size("test", 2);
        assert!(matches!(
            circuit.h(QubitId(5)),
            Err(IrError::QubitNotFound { .. })
        ));
        assert!(matches!(
            circuit.cx(QubitId(1), QubitId(1)),
            Err(IrError::DuplicateQubit { .. })
        ));
        assert!(matches!(
            circuit.gate(StandardGate::CX, [QubitId(0)]),
            Err(IrError::QubitCountMismatch { expected: 2, got: 1, .. })
        ));
        assert_eq!(circuit.size(), 0);
    }

    #[test]
    fn test_depth_ignores_barriers() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.h(QubitId(1)).unwrap();
        assert_eq!(circuit.depth(), 1);
        assert_eq!(circuit.size(), 2);
        assert_eq!(circuit.count_ops()["barrier"], 1);
    }

    #[test]
    fn test_inverse_reverses_and_adjoints() {
        let mut circuit = Circuit::with_size("test", 1);
        circuit.s(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
        let inv = circuit.inverse();
        let names: Vec<_> = inv.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, vec!["h", "sdg"]);
        assert_eq!(inv.name(), "test_dg");
    }

    #[test]
    fn test_reverse_bits_remaps_operations_and_registers() {
        let circuit = example_circuit();
        let reversed = circuit.reverse_bits();

        let names: Vec<_> = reversed.registers().iter().map(RegisterLayout::name).collect();
        assert_eq!(names, vec!["a", "x"]);
        assert_eq!(reversed.qubit_in("a", 0).unwrap(), QubitId(0));
        assert_eq!(reversed.qubit_in("x", 0).unwrap(), QubitId(1));
        assert_eq!(reversed.qubit_in("x", 1).unwrap(), QubitId(2));
        assert_eq!(reversed.instructions()[0].qubits, vec![QubitId(2)]);
        assert_eq!(
            reversed.instructions()[2].qubits,
            vec![QubitId(2), QubitId(1), QubitId(0)]
        );
    }

    #[test]
    fn test_reverse_bits_is_involution() {
        let circuit = example_circuit();
        assert_eq!(circuit.reverse_bits().reverse_bits(), circuit);
    }

    #[test]
    fn test_assign_parameters_returns_new_circuit() {
        let theta = Parameter::new("θ");
        let mut circuit = Circuit::with_size("test", 1);
        circuit.rz(&theta, QubitId(0)).unwrap();
        assert!(circuit.is_parameterized());

        let bound = circuit.assign_parameters([(&theta, PI / 2.0)]).unwrap();
        assert!(!bound.is_parameterized());
        assert!(circuit.is_parameterized());

        let err = circuit.assign_parameters([("φ", 1.0)]).unwrap_err();
        assert_eq!(err, IrError::UnknownParameter("φ".into()));
    }

    #[test]
    fn test_compose_maps_qubits() {
        let sub = example_circuit();
        let mut target = Circuit::with_size("target", 5);
        target
            .compose_in_place(&sub, &[QubitId(4), QubitId(2), QubitId(0)])
            .unwrap();
        assert_eq!(target.instructions()[0].qubits, vec![QubitId(4)]);
        assert_eq!(
            target.instructions()[2].qubits,
            vec![QubitId(4), QubitId(2), QubitId(0)]
        );
    }

    #[test]
    fn test_compose_validates_before_mutating() {
        let sub = example_circuit();
        let mut target = Circuit::with_size("target", 2);
        assert!(matches!(
            target.compose_in_place(&sub, &[]),
            Err(IrError::CircuitTooWide { needed: 3, available: 2 })
        ));
        assert!(matches!(
            target.compose(&sub, &[QubitId(0), QubitId(1)]),
            Err(IrError::QubitCountMismatch { .. })
        ));
        assert!(target.instructions().is_empty());
    }

    #[test]
    fn test_to_gate_rejects_barriers() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit.h(QubitId(0)).unwrap();
        let gate = circuit.to_gate().unwrap().with_label("qc1");
        assert_eq!(gate.num_qubits(), 2);
        assert_eq!(gate.display_name(), "qc1");

        circuit.barrier_all().unwrap();
        assert_eq!(circuit.to_gate(), Err(IrError::NotAGate("barrier".into())));
    }

    #[test]
    fn test_json_roundtrip() {
        let circuit = example_circuit();
        let json = circuit.to_json().unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
