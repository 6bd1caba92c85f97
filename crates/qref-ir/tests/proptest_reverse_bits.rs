//! Property-based tests for qubit relabelling.
//!
//! `reverse_bits` must be an involution and must keep every register
//! contiguous, whatever the register layout and gate list.

use proptest::prelude::*;
use qref_ir::{Circuit, QubitId, Register};

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    Rz(f64, u32),
    CX(u32, u32),
    CCX(u32, u32, u32),
    Barrier,
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        // Invalid operand combinations are rejected by the builder; skip them.
        let _ = match self {
            GateOp::H(q) => circuit.h(QubitId(q)).map(|_| ()),
            GateOp::Rz(theta, q) => circuit.rz(theta, QubitId(q)).map(|_| ()),
            GateOp::CX(c, t) => circuit.cx(QubitId(c), QubitId(t)).map(|_| ()),
            GateOp::CCX(a, b, t) => circuit.ccx(QubitId(a), QubitId(b), QubitId(t)).map(|_| ()),
            GateOp::Barrier => circuit.barrier_all().map(|_| ()),
        };
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (-3.0_f64..3.0, 0..num_qubits).prop_map(|(t, q)| GateOp::Rz(t, q)),
        (0..num_qubits, 0..num_qubits).prop_map(|(c, t)| GateOp::CX(c, t)),
        (0..num_qubits, 0..num_qubits, 0..num_qubits)
            .prop_map(|(a, b, t)| GateOp::CCX(a, b, t)),
        Just(GateOp::Barrier),
    ]
}

/// Circuits over 1-4 registers of 1-3 qubits each, some of them ancillas.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    prop::collection::vec((1_u32..=3, any::<bool>()), 1..=4).prop_flat_map(|sizes| {
        let num_qubits: u32 = sizes.iter().map(|(s, _)| s).sum();
        (
            Just(sizes),
            prop::collection::vec(arb_gate_op(num_qubits), 0..=12),
        )
            .prop_map(|(sizes, ops)| {
                let registers = sizes.iter().enumerate().map(|(i, &(size, ancilla))| {
                    if ancilla {
                        Register::ancilla(format!("a{i}"), size)
                    } else {
                        Register::quantum(format!("r{i}"), size)
                    }
                });
                let mut circuit = Circuit::with_registers("prop", registers).unwrap();
                for op in ops {
                    op.apply(&mut circuit);
                }
                circuit
            })
    })
}

proptest! {
    #[test]
    fn reverse_bits_twice_is_identity(circuit in arb_circuit()) {
        prop_assert_eq!(circuit.reverse_bits().reverse_bits(), circuit);
    }

    #[test]
    fn reverse_bits_keeps_structure(circuit in arb_circuit()) {
        let reversed = circuit.reverse_bits();
        prop_assert_eq!(reversed.num_qubits(), circuit.num_qubits());
        prop_assert_eq!(reversed.num_ancillas(), circuit.num_ancillas());
        prop_assert_eq!(reversed.size(), circuit.size());
        prop_assert_eq!(reversed.depth(), circuit.depth());
        prop_assert_eq!(reversed.count_ops(), circuit.count_ops());
    }

    #[test]
    fn reversed_registers_stay_contiguous(circuit in arb_circuit()) {
        let reversed = circuit.reverse_bits();
        let mut next = 0_u32;
        for layout in reversed.registers() {
            for (slot, q) in layout.qubits().iter().enumerate() {
                prop_assert_eq!(*q, QubitId(next));
                let qubit = &reversed.qubits()[q.index()];
                prop_assert_eq!(qubit.register.as_deref(), Some(layout.name()));
                prop_assert_eq!(qubit.index, Some(slot as u32));
                next += 1;
            }
        }
    }

    #[test]
    fn first_register_moves_to_the_top(circuit in arb_circuit()) {
        let n = circuit.num_qubits() as u32;
        let first = &circuit.registers()[0];
        let reversed = circuit.reverse_bits();
        let moved = reversed.register(first.name()).unwrap();
        for (slot, q) in first.qubits().iter().enumerate() {
            let mirror = moved.qubits()[first.len() - 1 - slot];
            prop_assert_eq!(mirror, QubitId(n - 1 - q.0));
        }
    }
}
