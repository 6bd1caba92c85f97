//! Gate-local unitary matrices.
//!
//! Every matrix is indexed over the gate's operand list with the first
//! operand as the least significant bit. For controlled gates the controls
//! are the leading operands, so they occupy the low bits.

use std::f64::consts::FRAC_1_SQRT_2;

use ndarray::{Array2, array};
use num_complex::Complex64;
use qref_ir::{Gate, GateKind, ParameterExpression, StandardGate};

use crate::error::InfoResult;
use crate::operator::Operator;
use crate::ordering::{Matrix, identity};

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn phase(theta: f64) -> Complex64 {
    Complex64::from_polar(1.0, theta)
}

fn angle(expr: &ParameterExpression) -> InfoResult<f64> {
    Ok(expr.evaluate()?)
}

/// Matrix of any gate; composite gates are expanded through their definition.
pub fn gate_matrix(gate: &Gate) -> InfoResult<Matrix> {
    match &gate.kind {
        GateKind::Standard(g) => standard_gate_matrix(g),
        GateKind::Composite(g) => Ok(Operator::from_circuit(&g.definition)?.into_data()),
    }
}

/// Matrix of a standard gate. Fails if a parameter is still symbolic.
pub fn standard_gate_matrix(gate: &StandardGate) -> InfoResult<Matrix> {
    let target = target_matrix(gate)?;
    Ok(match gate.num_controls() {
        0 => target,
        n => controlled(&target, n as usize),
    })
}

/// The part of a gate that acts above its controls.
fn target_matrix(gate: &StandardGate) -> InfoResult<Matrix> {
    let m = match gate {
        StandardGate::I => identity(2),
        StandardGate::X | StandardGate::CX | StandardGate::CCX => pauli_x(),
        StandardGate::Y | StandardGate::CY => pauli_y(),
        StandardGate::Z | StandardGate::CZ | StandardGate::CCZ => pauli_z(),
        StandardGate::H | StandardGate::CH => hadamard(),
        StandardGate::S => phase_gate(std::f64::consts::FRAC_PI_2),
        StandardGate::Sdg => phase_gate(-std::f64::consts::FRAC_PI_2),
        StandardGate::T => phase_gate(std::f64::consts::FRAC_PI_4),
        StandardGate::Tdg => phase_gate(-std::f64::consts::FRAC_PI_4),
        StandardGate::SX => sqrt_x(),
        StandardGate::SXdg => sqrt_x().mapv(|z| z.conj()),
        StandardGate::Rx(t) | StandardGate::CRx(t) => rx(angle(t)?),
        StandardGate::Ry(t) | StandardGate::CRy(t) => ry(angle(t)?),
        StandardGate::Rz(t) | StandardGate::CRz(t) => rz(angle(t)?),
        StandardGate::P(t) | StandardGate::CP(t) => phase_gate(angle(t)?),
        StandardGate::U(t, p, l) => u(angle(t)?, angle(p)?, angle(l)?),
        StandardGate::Swap | StandardGate::CSwap => swap(),
        StandardGate::RZZ(t) => rzz(angle(t)?),
    };
    Ok(m)
}

/// Pauli-X.
pub fn pauli_x() -> Matrix {
    array![[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]]
}

/// Pauli-Y.
pub fn pauli_y() -> Matrix {
    array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]]
}

/// Pauli-Z.
pub fn pauli_z() -> Matrix {
    array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]]
}

/// Hadamard.
pub fn hadamard() -> Matrix {
    let s = FRAC_1_SQRT_2;
    array![[c(s, 0.0), c(s, 0.0)], [c(s, 0.0), c(-s, 0.0)]]
}

fn sqrt_x() -> Matrix {
    array![[c(0.5, 0.5), c(0.5, -0.5)], [c(0.5, -0.5), c(0.5, 0.5)]]
}

fn phase_gate(theta: f64) -> Matrix {
    array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), phase(theta)]]
}

fn rx(theta: f64) -> Matrix {
    let (s, co) = (theta / 2.0).sin_cos();
    array![[c(co, 0.0), c(0.0, -s)], [c(0.0, -s), c(co, 0.0)]]
}

fn ry(theta: f64) -> Matrix {
    let (s, co) = (theta / 2.0).sin_cos();
    array![[c(co, 0.0), c(-s, 0.0)], [c(s, 0.0), c(co, 0.0)]]
}

fn rz(theta: f64) -> Matrix {
    array![
        [phase(-theta / 2.0), c(0.0, 0.0)],
        [c(0.0, 0.0), phase(theta / 2.0)]
    ]
}

fn u(theta: f64, phi: f64, lambda: f64) -> Matrix {
    let (s, co) = (theta / 2.0).sin_cos();
    array![
        [c(co, 0.0), -phase(lambda) * s],
        [phase(phi) * s, phase(phi + lambda) * co]
    ]
}

fn swap() -> Matrix {
    let mut m = Array2::zeros((4, 4));
    for (row, col) in [(0, 0), (1, 2), (2, 1), (3, 3)] {
        m[[row, col]] = c(1.0, 0.0);
    }
    m
}

fn rzz(theta: f64) -> Matrix {
    let mut m = Array2::zeros((4, 4));
    for k in 0..4_usize {
        let parity = (k.count_ones() % 2) as f64;
        // Even parity picks up e^{-iθ/2}, odd parity e^{iθ/2}.
        m[[k, k]] = phase((2.0 * parity - 1.0) * theta / 2.0);
    }
    m
}

/// Add `num_controls` controls on the low bits of `base`.
///
/// The base acts on the bits above the controls when all controls are 1.
pub fn controlled(base: &Matrix, num_controls: usize) -> Matrix {
    let control_mask = (1_usize << num_controls) - 1;
    let dim = base.nrows() << num_controls;
    let mut m = identity(dim);
    for ((row, col), &value) in base.indexed_iter() {
        m[[(row << num_controls) | control_mask, (col << num_controls) | control_mask]] = value;
    }
    m
}
