//! Tensor-ordering convention.
//!
//! An N-qubit basis state with integer label `k` has qubit `q` equal to bit
//! `q` of `k`. Written as a label string, qubit N-1 is the leftmost
//! character and qubit 0 the rightmost, so `"01"` is qubit 0 in `|1⟩`.
//!
//! Operators embed into the full space through the Kronecker chain with qubit
//! N-1 as the leftmost factor:
//!
//! ```text
//! U_full = I_{N-1} ⊗ … ⊗ G_q ⊗ … ⊗ I_0
//! ```
//!
//! A k-qubit gate on operands `[t_0, …, t_{k-1}]` is indexed with the same
//! rule over its operand list: `t_0` is the gate-local least significant bit.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{InfoError, InfoResult};

/// Dense complex matrix.
pub type Matrix = Array2<Complex64>;

/// Largest system the dense representations accept.
pub const MAX_QUBITS: usize = 24;

/// Largest system a full `2^n × 2^n` matrix is built for.
pub const MAX_MATRIX_QUBITS: usize = 12;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Label string for basis index `index`, qubit `num_qubits - 1` first.
///
/// ```rust
/// use qref_info::ordering::basis_label;
/// assert_eq!(basis_label(1, 2), "01");
/// assert_eq!(basis_label(6, 3), "110");
/// ```
pub fn basis_label(index: usize, num_qubits: usize) -> String {
    (0..num_qubits)
        .rev()
        .map(|q| if (index >> q) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Basis index of a `0`/`1` label; the rightmost character is qubit 0.
pub fn basis_index(label: &str) -> InfoResult<usize> {
    let len = label.chars().count();
    if len > MAX_QUBITS {
        return Err(InfoError::InvalidLabel {
            label: label.to_string(),
            reason: format!("longer than {MAX_QUBITS} qubits"),
        });
    }
    label.chars().try_fold(0_usize, |acc, c| match c {
        '0' => Ok(acc << 1),
        '1' => Ok((acc << 1) | 1),
        other => Err(InfoError::InvalidLabel {
            label: label.to_string(),
            reason: format!("unexpected character '{other}', expected '0' or '1'"),
        }),
    })
}

/// Identity matrix of dimension `dim`.
pub fn identity(dim: usize) -> Matrix {
    Array2::eye(dim)
}

/// Kronecker product `a ⊗ b`; `a` acts on the high-order qubits.
pub fn kron(a: &Matrix, b: &Matrix) -> Matrix {
    let (br, bc) = b.dim();
    let (ar, ac) = a.dim();
    Array2::from_shape_fn((ar * br, ac * bc), |(i, j)| {
        a[[i / br, j / bc]] * b[[i % br, j % bc]]
    })
}

/// Embed a single-qubit gate on `qubit` of an `num_qubits` system.
pub fn embed_single(gate: &Matrix, qubit: usize, num_qubits: usize) -> InfoResult<Matrix> {
    check_matrix_width(num_qubits)?;
    check_shape(gate, 1)?;
    check_qubits(&[qubit], num_qubits)?;
    let eye = identity(2);
    let ones = identity(1);
    Ok((0..num_qubits).rev().fold(ones, |acc, q| {
        if q == qubit {
            kron(&acc, gate)
        } else {
            kron(&acc, &eye)
        }
    }))
}

/// Embed a gate of any arity; operand `k` of the gate lands on `targets[k]`.
pub fn embed(gate: &Matrix, targets: &[usize], num_qubits: usize) -> InfoResult<Matrix> {
    check_matrix_width(num_qubits)?;
    check_qubits(targets, num_qubits)?;
    check_shape(gate, targets.len())?;
    let dim = 1_usize << num_qubits;
    let local_dim = 1_usize << targets.len();
    let mask = targets.iter().fold(0_usize, |m, &t| m | (1 << t));

    let mut full = Array2::zeros((dim, dim));
    for col in 0..dim {
        let rest = col & !mask;
        let local_col = gather_bits(col, targets);
        for local_row in 0..local_dim {
            let row = scatter_bits(local_row, targets, rest);
            full[[row, col]] = gate[[local_row, local_col]];
        }
    }
    Ok(full)
}

/// Apply a gate in place to `amplitudes` without building the full matrix.
///
/// Equivalent to multiplying by `embed(gate, targets, n)`.
pub fn apply_matrix(
    amplitudes: &mut [Complex64],
    gate: &Matrix,
    targets: &[usize],
) -> InfoResult<()> {
    let num_qubits = num_qubits_for(amplitudes.len())?;
    check_qubits(targets, num_qubits)?;
    check_shape(gate, targets.len())?;

    let local_dim = 1_usize << targets.len();
    let mask = targets.iter().fold(0_usize, |m, &t| m | (1 << t));
    let mut indices = vec![0_usize; local_dim];
    let mut local = vec![ZERO; local_dim];

    for base in (0..amplitudes.len()).filter(|i| i & mask == 0) {
        for (l, idx) in indices.iter_mut().enumerate() {
            *idx = scatter_bits(l, targets, base);
        }
        for (slot, &idx) in local.iter_mut().zip(&indices) {
            *slot = amplitudes[idx];
        }
        for (r, &idx) in indices.iter().enumerate() {
            amplitudes[idx] = local
                .iter()
                .enumerate()
                .map(|(c, &a)| gate[[r, c]] * a)
                .sum();
        }
    }
    Ok(())
}

/// Collect bit `positions[k]` of `index` into bit `k` of the result.
pub fn gather_bits(index: usize, positions: &[usize]) -> usize {
    positions
        .iter()
        .enumerate()
        .fold(0, |acc, (k, &p)| acc | (((index >> p) & 1) << k))
}

/// Write bit `k` of `local` into bit `positions[k]` of `base`.
pub fn scatter_bits(local: usize, positions: &[usize], base: usize) -> usize {
    positions.iter().enumerate().fold(base, |acc, (k, &p)| {
        if (local >> k) & 1 == 1 {
            acc | (1 << p)
        } else {
            acc & !(1 << p)
        }
    })
}

/// Move bit `q` of `index` to bit `permutation[q]`.
///
/// ```rust
/// use qref_info::ordering::permute_qubits;
/// // Reversing 3 qubits maps |001⟩ to |100⟩.
/// assert_eq!(permute_qubits(0b001, &[2, 1, 0]), 0b100);
/// ```
pub fn permute_qubits(index: usize, permutation: &[usize]) -> usize {
    permutation
        .iter()
        .enumerate()
        .fold(0, |acc, (q, &p)| acc | (((index >> q) & 1) << p))
}

/// Number of qubits for a `dim`-dimensional space.
pub fn num_qubits_for(dim: usize) -> InfoResult<usize> {
    if dim == 0 || !dim.is_power_of_two() {
        return Err(InfoError::NotPowerOfTwo(dim));
    }
    let n = dim.trailing_zeros() as usize;
    if n > MAX_QUBITS {
        return Err(InfoError::TooManyQubits {
            num_qubits: n,
            max: MAX_QUBITS,
        });
    }
    Ok(n)
}

pub(crate) fn check_matrix_width(num_qubits: usize) -> InfoResult<()> {
    if num_qubits > MAX_MATRIX_QUBITS {
        return Err(InfoError::TooManyQubits {
            num_qubits,
            max: MAX_MATRIX_QUBITS,
        });
    }
    Ok(())
}

fn check_shape(gate: &Matrix, arity: usize) -> InfoResult<()> {
    let (rows, cols) = gate.dim();
    if rows != cols {
        return Err(InfoError::NotSquare { rows, cols });
    }
    let expected = 1_usize << arity;
    if rows != expected {
        return Err(InfoError::DimensionMismatch {
            expected,
            got: rows,
        });
    }
    Ok(())
}

pub(crate) fn check_qubits(qubits: &[usize], num_qubits: usize) -> InfoResult<()> {
    for (i, &q) in qubits.iter().enumerate() {
        if q >= num_qubits {
            return Err(InfoError::QubitOutOfRange {
                qubit: q,
                num_qubits,
            });
        }
        if qubits[..i].contains(&q) {
            return Err(InfoError::DuplicateQubit(q));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn pauli_x() -> Matrix {
        array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]]
    }

    fn assert_close(a: &Matrix, b: &Matrix) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).norm() < 1e-12, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_label_roundtrip() {
        for k in 0..8 {
            assert_eq!(basis_index(&basis_label(k, 3)).unwrap(), k);
        }
        assert_eq!(basis_label(3, 3), "011");
        assert!(matches!(
            basis_index("01x"),
            Err(InfoError::InvalidLabel { .. })
        ));
    }

    #[test]
    fn test_x_on_qubit_zero_is_i_kron_x() {
        let embedded = embed_single(&pauli_x(), 0, 2).unwrap();
        assert_close(&embedded, &kron(&identity(2), &pauli_x()));
        // |00⟩ maps to |01⟩, i.e. index 1.
        assert_eq!(embedded[[1, 0]], c(1.0));
    }

    #[test]
    fn test_embed_agrees_with_kron_chain() {
        for q in 0..3 {
            assert_close(
                &embed(&pauli_x(), &[q], 3).unwrap(),
                &embed_single(&pauli_x(), q, 3).unwrap(),
            );
        }
    }

    #[test]
    fn test_embed_two_qubit_operand_order() {
        // A gate-local matrix that maps |00⟩ to |01⟩: X on its first operand.
        let local = kron(&identity(2), &pauli_x());
        let full = embed(&local, &[2, 0], 3).unwrap();
        assert_close(&full, &embed_single(&pauli_x(), 2, 3).unwrap());
    }

    #[test]
    fn test_apply_matrix_matches_embed() {
        let local = kron(&pauli_x(), &identity(2));
        let full = embed(&local, &[1, 2], 3).unwrap();
        let mut state = vec![ZERO; 8];
        state[0] = c(1.0);
        apply_matrix(&mut state, &local, &[1, 2]).unwrap();
        for (row, amp) in state.iter().enumerate() {
            assert!((amp - full[[row, 0]]).norm() < 1e-12);
        }
        assert_eq!(state[4], c(1.0));
    }

    #[test]
    fn test_invalid_operands() {
        assert!(matches!(
            embed_single(&pauli_x(), 2, 2),
            Err(InfoError::QubitOutOfRange { qubit: 2, num_qubits: 2 })
        ));
        assert!(matches!(
            embed(&identity(4), &[1, 1], 2),
            Err(InfoError::DuplicateQubit(1))
        ));
        assert!(matches!(
            embed(&identity(4), &[0], 2),
            Err(InfoError::DimensionMismatch { expected: 2, got: 4 })
        ));
        assert!(matches!(num_qubits_for(6), Err(InfoError::NotPowerOfTwo(6))));
    }

    #[test]
    fn test_bit_helpers() {
        assert_eq!(gather_bits(0b1010, &[1, 3]), 0b11);
        assert_eq!(scatter_bits(0b01, &[1, 3], 0), 0b0010);
        assert_eq!(permute_qubits(0b011, &[2, 0, 1]), 0b101);
    }

    #[test]
    fn test_wide_embeddings_are_rejected() {
        for n in [MAX_MATRIX_QUBITS + 1, 30, 64] {
            assert!(matches!(
                embed(&pauli_x(), &[0], n),
                Err(InfoError::TooManyQubits { max: MAX_MATRIX_QUBITS, .. })
            ));
            assert!(matches!(
                embed_single(&pauli_x(), 0, n),
                Err(InfoError::TooManyQubits { max: MAX_MATRIX_QUBITS, .. })
            ));
        }
    }

    #[test]
    fn test_apply_matrix_rejects_oversized_operand_list() {
        let mut state = vec![ZERO; 4];
        state[0] = c(1.0);
        let targets: Vec<usize> = (0..64).collect();
        assert!(matches!(
            apply_matrix(&mut state, &pauli_x(), &targets),
            Err(InfoError::QubitOutOfRange { .. })
        ));
    }
}
