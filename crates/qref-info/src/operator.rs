//! Unitary matrix of a circuit.

use std::fmt;

use ndarray::Array2;
use num_complex::Complex64;
use qref_ir::{Circuit, Gate, InstructionKind};
use tracing::{debug, instrument};

use crate::error::{InfoError, InfoResult};
use crate::format::format_complex;
use crate::matrices::gate_matrix;
use crate::ordering::{
    MAX_MATRIX_QUBITS, Matrix, apply_matrix, check_matrix_width, identity, kron, num_qubits_for,
};

/// Largest circuit [`Operator::from_circuit`] will expand.
pub const MAX_OPERATOR_QUBITS: usize = MAX_MATRIX_QUBITS;

/// A square matrix over `2^n` basis states, indexed with qubit 0 as the
/// least significant bit of both row and column.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    data: Matrix,
    num_qubits: usize,
}

impl Operator {
    /// Wrap a `2^n × 2^n` matrix.
    pub fn new(data: Matrix) -> InfoResult<Self> {
        let (rows, cols) = data.dim();
        if rows != cols {
            return Err(InfoError::NotSquare { rows, cols });
        }
        let num_qubits = num_qubits_for(rows)?;
        Ok(Self { data, num_qubits })
    }

    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> InfoResult<Self> {
        check_matrix_width(num_qubits)?;
        Ok(Self {
            data: identity(1 << num_qubits),
            num_qubits,
        })
    }

    /// The gate-local matrix of a single gate.
    pub fn from_gate(gate: &Gate) -> InfoResult<Self> {
        Self::new(gate_matrix(gate)?)
    }

    /// The full unitary of a circuit, including its global phase.
    ///
    /// Barriers are skipped. Fails if any parameter is unbound.
    #[instrument(skip(circuit), fields(circuit = circuit.name(), num_qubits = circuit.num_qubits()))]
    pub fn from_circuit(circuit: &Circuit) -> InfoResult<Self> {
        let n = circuit.num_qubits();
        check_matrix_width(n)?;

        let mut steps = Vec::new();
        for inst in circuit.instructions() {
            if let InstructionKind::Gate(gate) = &inst.kind {
                let targets: Vec<usize> = inst.qubits.iter().map(|q| q.index()).collect();
                steps.push((gate_matrix(gate)?, targets));
            }
        }

        let dim = 1_usize << n;
        let global = Complex64::from_polar(1.0, circuit.global_phase());
        let mut data = Array2::zeros((dim, dim));
        let mut column = vec![Complex64::new(0.0, 0.0); dim];
        for col in 0..dim {
            column.iter_mut().for_each(|z| *z = Complex64::new(0.0, 0.0));
            column[col] = global;
            for (matrix, targets) in &steps {
                apply_matrix(&mut column, matrix, targets)?;
            }
            for (row, &value) in column.iter().enumerate() {
                data[[row, col]] = value;
            }
        }
        debug!(gates = steps.len(), "built circuit operator");
        Ok(Self {
            data,
            num_qubits: n,
        })
    }

    /// The matrix.
    pub fn data(&self) -> &Matrix {
        &self.data
    }

    /// Take ownership of the matrix.
    pub fn into_data(self) -> Matrix {
        self.data
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Matrix dimension `2^n`.
    pub fn dim(&self) -> usize {
        self.data.nrows()
    }

    /// Apply `self` first, then `other`: returns `other · self`.
    pub fn compose(&self, other: &Operator) -> InfoResult<Self> {
        if self.dim() != other.dim() {
            return Err(InfoError::DimensionMismatch {
                expected: self.dim(),
                got: other.dim(),
            });
        }
        Ok(Self {
            data: other.data.dot(&self.data),
            num_qubits: self.num_qubits,
        })
    }

    /// `self ⊗ other`: `other` acts on the low qubits.
    pub fn tensor(&self, other: &Operator) -> InfoResult<Self> {
        let num_qubits = self.num_qubits + other.num_qubits;
        check_matrix_width(num_qubits)?;
        Ok(Self {
            data: kron(&self.data, &other.data),
            num_qubits,
        })
    }

    /// Conjugate transpose.
    #[must_use]
    pub fn adjoint(&self) -> Self {
        Self {
            data: self.data.t().mapv(|z| z.conj()),
            num_qubits: self.num_qubits,
        }
    }

    /// Whether `U† U = I` entrywise within `tolerance`.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let product = self.adjoint().data.dot(&self.data);
        product
            .indexed_iter()
            .all(|((r, c), z)| {
                let expected = if r == c { 1.0 } else { 0.0 };
                (z - Complex64::new(expected, 0.0)).norm() <= tolerance
            })
    }

    /// Entrywise equality within `tolerance`.
    pub fn approx_eq(&self, other: &Operator, tolerance: f64) -> bool {
        self.dim() == other.dim()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).norm() <= tolerance)
    }

    /// Equality up to a global phase.
    pub fn equiv(&self, other: &Operator, tolerance: f64) -> bool {
        if self.dim() != other.dim() {
            return false;
        }
        let Some((a, b)) = self
            .data
            .iter()
            .zip(other.data.iter())
            .find(|(a, _)| a.norm() > tolerance)
        else {
            return other.data.iter().all(|z| z.norm() <= tolerance);
        };
        let ratio = b / a;
        if (ratio.norm() - 1.0).abs() > tolerance {
            return false;
        }
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a * ratio - b).norm() <= tolerance)
    }

    /// Entries rounded to `decimals` places; `-0` becomes `0`.
    #[must_use]
    pub fn rounded(&self, decimals: u32) -> Self {
        let scale = 10_f64.powi(decimals as i32);
        let round = |x: f64| {
            let r = (x * scale).round() / scale;
            if r == 0.0 { 0.0 } else { r }
        };
        Self {
            data: self.data.mapv(|z| Complex64::new(round(z.re), round(z.im))),
            num_qubits: self.num_qubits,
        }
    }

    /// Rows of formatted entries, for tabular output.
    pub fn to_rows(&self, decimals: usize) -> Vec<Vec<String>> {
        self.data
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|&z| format_complex(z, decimals)).collect())
            .collect()
    }
}

impl fmt::Display for Operator {
    /// Prints one bracketed row per line; `{:.N}` sets the decimals (default 3).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.to_rows(f.precision().unwrap_or(3));
        let width = rows
            .iter()
            .flatten()
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0);
        for (i, row) in rows.iter().enumerate() {
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i + 1 == rows.len() { "]]" } else { "]" };
            let cells: Vec<_> = row.iter().map(|s| format!("{s:>width$}")).collect();
            writeln!(f, "{open}{}{close}", cells.join(", "))?;
        }
        Ok(())
    }
}
