//! Property-based tests for the ordering convention on random circuits.

use proptest::prelude::*;
use qref_info::{Operator, Statevector};
use qref_ir::{Circuit, QubitId};

#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    Ry(f64, u32),
    T(u32),
    CX(u32, u32),
    CP(f64, u32, u32),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        let _ = match self {
            GateOp::H(q) => circuit.h(QubitId(q)).map(|_| ()),
            GateOp::Ry(t, q) => circuit.ry(t, QubitId(q)).map(|_| ()),
            GateOp::T(q) => circuit.t(QubitId(q)).map(|_| ()),
            GateOp::CX(c, t) => circuit.cx(QubitId(c), QubitId(t)).map(|_| ()),
            GateOp::CP(p, c, t) => circuit.cp(p, QubitId(c), QubitId(t)).map(|_| ()),
        };
    }
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=4).prop_flat_map(|n| {
        let op = prop_oneof![
            (0..n).prop_map(GateOp::H),
            (-3.0_f64..3.0, 0..n).prop_map(|(t, q)| GateOp::Ry(t, q)),
            (0..n).prop_map(GateOp::T),
            (0..n, 0..n).prop_map(|(c, t)| GateOp::CX(c, t)),
            (-3.0_f64..3.0, 0..n, 0..n).prop_map(|(p, c, t)| GateOp::CP(p, c, t)),
        ];
        prop::collection::vec(op, 0..=12).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", n);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

proptest! {
    #[test]
    fn probabilities_sum_to_one(circuit in arb_circuit()) {
        let psi = Statevector::from_circuit(&circuit).unwrap();
        let total: f64 = psi.probabilities().iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn statevector_is_first_operator_column(circuit in arb_circuit()) {
        let psi = Statevector::from_circuit(&circuit).unwrap();
        let op = Operator::from_circuit(&circuit).unwrap();
        for (row, amp) in psi.data().iter().enumerate() {
            prop_assert!((amp - op.data()[[row, 0]]).norm() < 1e-9);
        }
    }

    #[test]
    fn reverse_bits_matches_reverse_qargs(circuit in arb_circuit()) {
        let direct = Statevector::from_circuit(&circuit.reverse_bits()).unwrap();
        let relabelled = Statevector::from_circuit(&circuit).unwrap().reverse_qargs();
        prop_assert!(direct.equiv(&relabelled, 1e-9));
        for (a, b) in direct.data().iter().zip(relabelled.data()) {
            prop_assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn double_reverse_keeps_operator(circuit in arb_circuit()) {
        let op = Operator::from_circuit(&circuit).unwrap();
        let twice = Operator::from_circuit(&circuit.reverse_bits().reverse_bits()).unwrap();
        prop_assert!(op.approx_eq(&twice, 1e-12));
    }
}
