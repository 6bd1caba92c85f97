//! Statevector simulation engine.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

use num_complex::Complex64;
use qref_ir::{Circuit, InstructionKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{InfoError, InfoResult};
use crate::format::format_complex;
use crate::matrices::gate_matrix;
use crate::operator::Operator;
use crate::ordering::{
    MAX_QUBITS, apply_matrix, basis_label, check_qubits, gather_bits, num_qubits_for,
    permute_qubits,
};

/// Amplitudes below this magnitude are treated as zero.
const EPSILON: f64 = 1e-10;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A pure state over `2^n` basis states.
///
/// Amplitude `k` belongs to the basis state whose label is
/// `basis_label(k, n)`: qubit 0 is bit 0 of `k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StatevectorData")]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    data: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

/// Wire form of a [`Statevector`], checked before it becomes one.
#[derive(Deserialize)]
struct StatevectorData {
    data: Vec<Complex64>,
    num_qubits: usize,
}

impl TryFrom<StatevectorData> for Statevector {
    type Error = InfoError;

    fn try_from(raw: StatevectorData) -> InfoResult<Self> {
        let state = Self::new(raw.data)?;
        if state.num_qubits != raw.num_qubits {
            return Err(InfoError::DimensionMismatch {
                expected: state.num_qubits,
                got: raw.num_qubits,
            });
        }
        Ok(state)
    }
}

impl Statevector {
    /// `|0…0⟩` on `num_qubits` qubits.
    pub fn zero(num_qubits: usize) -> InfoResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(InfoError::TooManyQubits {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        let mut data = vec![ZERO; 1 << num_qubits];
        data[0] = ONE;
        Ok(Self { data, num_qubits })
    }

    /// Wrap raw amplitudes. The length must be a power of two; the vector is
    /// not normalized.
    pub fn new(data: Vec<Complex64>) -> InfoResult<Self> {
        let num_qubits = num_qubits_for(data.len())?;
        Ok(Self { data, num_qubits })
    }

    /// Basis state `index` in a space of dimension `dims`.
    pub fn from_int(index: usize, dims: usize) -> InfoResult<Self> {
        let num_qubits = num_qubits_for(dims)?;
        if index >= dims {
            return Err(InfoError::IndexOutOfRange { index, dim: dims });
        }
        let mut data = vec![ZERO; dims];
        data[index] = ONE;
        Ok(Self { data, num_qubits })
    }

    /// Product state from a label; the leftmost character is the highest
    /// qubit.
    ///
    /// Characters: `0`, `1`, `+`, `-`, `r` (`|+i⟩`) and `l` (`|-i⟩`).
    pub fn from_label(label: &str) -> InfoResult<Self> {
        let num_qubits = label.chars().count();
        if num_qubits > MAX_QUBITS {
            return Err(InfoError::TooManyQubits {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        let s = FRAC_1_SQRT_2;
        let mut data = vec![ONE];
        for ch in label.chars() {
            let factor = match ch {
                '0' => [ONE, ZERO],
                '1' => [ZERO, ONE],
                '+' => [Complex64::new(s, 0.0), Complex64::new(s, 0.0)],
                '-' => [Complex64::new(s, 0.0), Complex64::new(-s, 0.0)],
                'r' => [Complex64::new(s, 0.0), Complex64::new(0.0, s)],
                'l' => [Complex64::new(s, 0.0), Complex64::new(0.0, -s)],
                other => {
                    return Err(InfoError::InvalidLabel {
                        label: label.to_string(),
                        reason: format!("unexpected character '{other}'"),
                    });
                }
            };
            // Characters seen so far are the high qubits.
            data = data
                .iter()
                .flat_map(|&hi| factor.iter().map(move |&lo| hi * lo))
                .collect();
        }
        Ok(Self { data, num_qubits })
    }

    /// Run a circuit on `|0…0⟩`.
    pub fn from_circuit(circuit: &Circuit) -> InfoResult<Self> {
        Self::zero(circuit.num_qubits())?.evolve(circuit)
    }

    /// Apply a circuit; barriers are skipped.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn evolve(&self, circuit: &Circuit) -> InfoResult<Self> {
        if circuit.num_qubits() != self.num_qubits {
            return Err(InfoError::DimensionMismatch {
                expected: self.num_qubits,
                got: circuit.num_qubits(),
            });
        }
        let mut data = self.data.clone();
        for inst in circuit.instructions() {
            if let InstructionKind::Gate(gate) = &inst.kind {
                let targets: Vec<usize> = inst.qubits.iter().map(|q| q.index()).collect();
                apply_matrix(&mut data, &gate_matrix(gate)?, &targets)?;
            }
        }
        if circuit.global_phase() != 0.0 {
            let phase = Complex64::from_polar(1.0, circuit.global_phase());
            data.iter_mut().for_each(|z| *z *= phase);
        }
        debug!(gates = circuit.size(), "evolved statevector");
        Ok(Self {
            data,
            num_qubits: self.num_qubits,
        })
    }

    /// Apply a full-width operator.
    pub fn evolve_operator(&self, operator: &Operator) -> InfoResult<Self> {
        if operator.dim() != self.dim() {
            return Err(InfoError::DimensionMismatch {
                expected: self.dim(),
                got: operator.dim(),
            });
        }
        let data = operator
            .data()
            .rows()
            .into_iter()
            .map(|row| row.iter().zip(&self.data).map(|(m, a)| m * a).sum::<Complex64>())
            .collect();
        Ok(Self {
            data,
            num_qubits: self.num_qubits,
        })
    }

    /// The amplitudes.
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension `2^n`.
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
    }

    /// Whether the norm is 1 within `tolerance`.
    pub fn is_valid(&self, tolerance: f64) -> bool {
        (self.norm() - 1.0).abs() <= tolerance
    }

    /// `⟨self|other⟩`.
    pub fn inner(&self, other: &Statevector) -> InfoResult<Complex64> {
        if self.dim() != other.dim() {
            return Err(InfoError::DimensionMismatch {
                expected: self.dim(),
                got: other.dim(),
            });
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Equality up to a global phase.
    pub fn equiv(&self, other: &Statevector, tolerance: f64) -> bool {
        match self.inner(other) {
            Ok(overlap) => (overlap.norm() - self.norm() * other.norm()).abs() <= tolerance,
            Err(_) => false,
        }
    }

    /// Probability of each basis state, indexed like the amplitudes.
    pub fn probabilities(&self) -> Vec<f64> {
        self.data.iter().map(Complex64::norm_sqr).collect()
    }

    /// Marginal probabilities over `qargs`; `qargs[0]` is the least
    /// significant bit of the result index.
    pub fn probabilities_for(&self, qargs: &[usize]) -> InfoResult<Vec<f64>> {
        check_qubits(qargs, self.num_qubits)?;
        let mut out = vec![0.0; 1 << qargs.len()];
        for (i, p) in self.probabilities().into_iter().enumerate() {
            out[gather_bits(i, qargs)] += p;
        }
        Ok(out)
    }

    /// Nonzero probabilities keyed by basis label.
    pub fn probabilities_dict(&self) -> BTreeMap<String, f64> {
        self.probabilities()
            .into_iter()
            .enumerate()
            .filter(|(_, p)| *p > EPSILON)
            .map(|(i, p)| (basis_label(i, self.num_qubits), p))
            .collect()
    }

    /// Nonzero amplitudes keyed by basis label.
    pub fn to_dict(&self) -> BTreeMap<String, Complex64> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, a)| a.norm() > EPSILON)
            .map(|(i, &a)| (basis_label(i, self.num_qubits), a))
            .collect()
    }

    /// The same state with qubit `i` renamed `n-1-i`.
    #[must_use]
    pub fn reverse_qargs(&self) -> Self {
        let n = self.num_qubits;
        let permutation: Vec<usize> = (0..n).rev().collect();
        let mut data = vec![ZERO; self.dim()];
        for (i, &a) in self.data.iter().enumerate() {
            data[permute_qubits(i, &permutation)] = a;
        }
        Self {
            data,
            num_qubits: n,
        }
    }

    /// Sample measurement outcomes of all qubits.
    ///
    /// The same `seed` always gives the same counts; `None` seeds from the OS.
    /// A vector with no probability mass gives no counts.
    pub fn sample_counts(&self, shots: usize, seed: Option<u64>) -> BTreeMap<String, usize> {
        let cumulative: Vec<f64> = self
            .probabilities()
            .into_iter()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .collect();
        let total = cumulative.last().copied().unwrap_or(0.0);
        if !total.is_finite() || total <= 0.0 {
            return BTreeMap::new();
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut counts = BTreeMap::new();
        for _ in 0..shots {
            let r: f64 = rng.r#gen::<f64>() * total;
            let index = cumulative
                .partition_point(|&c| c <= r)
                .min(self.dim() - 1);
            *counts
                .entry(basis_label(index, self.num_qubits))
                .or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for Statevector {
    /// Ket notation, e.g. `0.707|00⟩ + 0.707|11⟩`. `{:.N}` sets the decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = f.precision().unwrap_or(3);
        let terms: Vec<String> = self
            .to_dict()
            .into_iter()
            .filter_map(|(label, a)| {
                let coeff = format_complex(a, decimals);
                match coeff.as_str() {
                    "0" => None,
                    "1" => Some(format!("|{label}⟩")),
                    "-1" => Some(format!("-|{label}⟩")),
                    _ if a.re.abs() > EPSILON && a.im.abs() > EPSILON => {
                        Some(format!("({coeff})|{label}⟩"))
                    }
                    _ => Some(format!("{coeff}|{label}⟩")),
                }
            })
            .collect();
        if terms.is_empty() {
            return f.write_str("0");
        }
        f.write_str(&terms.join(" + ").replace("+ -", "- "))
    }
}
