//! End-to-end checks of the qubit-ordering convention.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use num_complex::Complex64;
use qref_info::{Operator, Statevector, embed, embed_single, kron, matrices, ordering};
use qref_ir::{Circuit, QubitId, Register};

const TOL: f64 = 1e-10;

fn example_circuit() -> Circuit {
    let mut circuit = Circuit::with_registers(
        "example circuit",
        [Register::quantum("x", 2), Register::ancilla("a", 1)],
    )
    .unwrap();
    let x0 = circuit.qubit_in("x", 0).unwrap();
    let x1 = circuit.qubit_in("x", 1).unwrap();
    let a0 = circuit.qubit_in("a", 0).unwrap();
    circuit.h(x0).unwrap();
    circuit.cx(x0, x1).unwrap();
    circuit.ccx(x0, x1, a0).unwrap();
    circuit.y(a0).unwrap();
    circuit
}

#[test]
fn flip_on_qubit_zero_is_labelled_01() {
    let mut circuit = Circuit::with_size("two_qubit_x", 2);
    circuit.x(QubitId(0)).unwrap();

    let psi = Statevector::from_circuit(&circuit).unwrap();
    let probs = psi.probabilities_dict();
    assert_eq!(probs.len(), 1);
    assert!((probs["01"] - 1.0).abs() < TOL);

    let op = Operator::from_circuit(&circuit).unwrap();
    let i_kron_x = kron(&ordering::identity(2), &matrices::pauli_x());
    assert!(op.approx_eq(&Operator::new(i_kron_x).unwrap(), TOL));
}

#[test]
fn reversed_circuit_moves_the_flip_to_the_top() {
    let mut circuit = Circuit::with_size("two_qubit_x", 2);
    circuit.x(QubitId(0)).unwrap();
    let psi = Statevector::from_circuit(&circuit.reverse_bits()).unwrap();
    assert!((psi.probabilities_dict()["10"] - 1.0).abs() < TOL);
    assert_eq!(psi, Statevector::from_circuit(&circuit).unwrap().reverse_qargs());
}

#[test]
fn label_011_is_basis_index_3() {
    let psi = Statevector::from_label("011").unwrap();
    assert_eq!(psi, Statevector::from_int(3, 8).unwrap());
    assert_eq!(qref_info::basis_index("011").unwrap(), 3);
    assert_eq!(qref_info::basis_label(3, 3), "011");
}

#[test]
fn plus_one_minus_product_state() {
    let psi = Statevector::from_label("+1-").unwrap();
    let expected = [(2, 0.5), (3, -0.5), (6, 0.5), (7, -0.5)];
    for (index, amp) in psi.data().iter().enumerate() {
        let want = expected
            .iter()
            .find(|(i, _)| *i == index)
            .map_or(0.0, |(_, a)| *a);
        assert!((amp - Complex64::new(want, 0.0)).norm() < TOL, "index {index}");
    }
}

#[test]
fn from_int_in_sixteen_dimensions() {
    let psi = Statevector::from_int(3, 16).unwrap();
    assert_eq!(psi.num_qubits(), 4);
    assert_eq!(psi.to_dict().keys().collect::<Vec<_>>(), vec!["0011"]);
}

#[test]
fn example_circuit_state_and_probabilities() {
    let psi = Statevector::from_circuit(&example_circuit()).unwrap();
    let s = FRAC_1_SQRT_2;
    assert!((psi.data()[4] - Complex64::new(0.0, s)).norm() < TOL);
    assert!((psi.data()[3] - Complex64::new(0.0, -s)).norm() < TOL);

    let probs = psi.probabilities_dict();
    assert_eq!(probs.len(), 2);
    assert!((probs["011"] - 0.5).abs() < TOL);
    assert!((probs["100"] - 0.5).abs() < TOL);
}

#[test]
fn probabilities_are_squared_magnitudes_summing_to_one() {
    let theta = qref_ir::Parameter::new("θ");
    let mut circuit = example_circuit();
    circuit.rz(&theta, QubitId(1)).unwrap();
    circuit.sx(QubitId(0)).unwrap();
    let bound = circuit.assign_parameters([(&theta, PI / 2.0)]).unwrap();

    let psi = Statevector::from_circuit(&bound).unwrap();
    let probs = psi.probabilities();
    for (p, amp) in probs.iter().zip(psi.data()) {
        assert!((p - amp.norm_sqr()).abs() < TOL);
    }
    assert!((probs.iter().sum::<f64>() - 1.0).abs() < TOL);
    assert!(psi.is_valid(TOL));
}

#[test]
fn unbound_parameter_is_an_error() {
    let theta = qref_ir::Parameter::new("θ");
    let mut circuit = Circuit::with_size("c", 1);
    circuit.rz(&theta, QubitId(0)).unwrap();
    assert!(Statevector::from_circuit(&circuit).is_err());
    assert!(Operator::from_circuit(&circuit).is_err());
}

#[test]
fn double_reverse_bits_keeps_the_operator() {
    let circuit = example_circuit();
    let op = Operator::from_circuit(&circuit).unwrap();
    let twice = Operator::from_circuit(&circuit.reverse_bits().reverse_bits()).unwrap();
    assert!(op.approx_eq(&twice, TOL));

    let once = Operator::from_circuit(&circuit.reverse_bits()).unwrap();
    assert!(!op.approx_eq(&once, TOL));
}

#[test]
fn composite_gate_reproduces_its_operator_on_the_mapped_qubits() {
    let sub = example_circuit();
    let sub_op = Operator::from_circuit(&sub).unwrap();
    let gate = sub.to_gate().unwrap().with_label("qc1");

    let mut big = Circuit::with_registers(
        "quantum_circuit2",
        [Register::quantum("x", 3), Register::ancilla("a", 2)],
    )
    .unwrap();
    let mapping = [
        big.qubit_in("x", 1).unwrap(),
        big.qubit_in("x", 2).unwrap(),
        big.qubit_in("a", 0).unwrap(),
    ];
    big.gate(gate, mapping).unwrap();

    let targets: Vec<usize> = mapping.iter().map(|q| q.index()).collect();
    let expected = embed(sub_op.data(), &targets, 5).unwrap();
    let big_op = Operator::from_circuit(&big).unwrap();
    assert!(big_op.approx_eq(&Operator::new(expected).unwrap(), TOL));

    // Same result when composing the circuit itself instead of its gate.
    let mut composed = Circuit::with_registers(
        "composed",
        [Register::quantum("x", 3), Register::ancilla("a", 2)],
    )
    .unwrap();
    composed.compose_in_place(&sub, &mapping).unwrap();
    assert!(Operator::from_circuit(&composed).unwrap().approx_eq(&big_op, TOL));
}

#[test]
fn embedding_matches_kron_chain_for_every_qubit() {
    let h = matrices::hadamard();
    for q in 0..3 {
        let chain = (0..3).rev().fold(ordering::identity(1), |acc, k| {
            if k == q {
                kron(&acc, &h)
            } else {
                kron(&acc, &ordering::identity(2))
            }
        });
        let embedded = embed_single(&h, q, 3).unwrap();
        for (a, b) in chain.iter().zip(embedded.iter()) {
            assert!((a - b).norm() < TOL);
        }
    }
}

#[test]
fn inverse_undoes_the_example_circuit() {
    let circuit = example_circuit();
    let mut roundtrip = circuit.clone();
    roundtrip.compose_in_place(&circuit.inverse(), &[]).unwrap();
    let psi = Statevector::from_circuit(&roundtrip).unwrap();
    assert!(psi.equiv(&Statevector::zero(3).unwrap(), TOL));
}
