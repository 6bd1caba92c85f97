//! Plain-text circuit diagrams.
//!
//! One horizontal wire per qubit, qubit 0 on top by default. Gates are packed
//! greedily into columns; a gate occupies every row between its lowest and
//! highest operand so vertical links never cross another gate.

use std::fmt;

use crate::circuit::Circuit;
use crate::gate::{Gate, GateKind, StandardGate};
use crate::instruction::InstructionKind;
use crate::parameter::format_angle;
use crate::qubit::QubitId;

const WIRE: char = '─';

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Wire,
    Cross,
    Barrier,
    Symbol(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Link {
    None,
    Wire,
    Barrier,
}

#[derive(Debug, Clone)]
struct Column {
    cells: Vec<Cell>,
    /// `links[r]` joins row `r` to row `r + 1`.
    links: Vec<Link>,
}

impl Column {
    fn new(rows: usize) -> Self {
        Self {
            cells: vec![Cell::Wire; rows],
            links: vec![Link::None; rows.saturating_sub(1)],
        }
    }

    fn width(&self) -> usize {
        self.cells
            .iter()
            .map(|c| match c {
                Cell::Symbol(s) => s.chars().count(),
                _ => 1,
            })
            .max()
            .unwrap_or(1)
    }
}

/// Renders a [`Circuit`] as a text diagram.
#[derive(Debug, Clone)]
pub struct TextDrawer<'a> {
    circuit: &'a Circuit,
    reverse_bits: bool,
}

impl<'a> TextDrawer<'a> {
    /// Create a drawer with qubit 0 on the top wire.
    pub fn new(circuit: &'a Circuit) -> Self {
        Self {
            circuit,
            reverse_bits: false,
        }
    }

    /// Put the highest-index qubit on top. Only the picture changes.
    #[must_use]
    pub fn reverse_bits(mut self, reverse: bool) -> Self {
        self.reverse_bits = reverse;
        self
    }

    fn row(&self, qubit: QubitId) -> usize {
        let n = self.circuit.num_qubits();
        if self.reverse_bits {
            n - 1 - qubit.index()
        } else {
            qubit.index()
        }
    }

    fn layout(&self) -> Vec<Column> {
        let rows = self.circuit.num_qubits();
        let mut columns: Vec<Column> = Vec::new();
        let mut frontier = vec![0_usize; rows];

        for inst in self.circuit.instructions() {
            let operand_rows: Vec<usize> = inst.qubits.iter().map(|&q| self.row(q)).collect();
            let (Some(&lo), Some(&hi)) = (operand_rows.iter().min(), operand_rows.iter().max())
            else {
                continue;
            };

            let col = frontier[lo..=hi].iter().copied().max().unwrap_or(0);
            if col == columns.len() {
                columns.push(Column::new(rows));
            }
            for f in &mut frontier[lo..=hi] {
                *f = col + 1;
            }
            let column = &mut columns[col];

            match &inst.kind {
                InstructionKind::Gate(gate) => {
                    for r in lo..=hi {
                        column.cells[r] = Cell::Cross;
                    }
                    for (&r, symbol) in operand_rows.iter().zip(operand_symbols(gate)) {
                        column.cells[r] = Cell::Symbol(symbol);
                    }
                    for link in &mut column.links[lo..hi] {
                        *link = Link::Wire;
                    }
                }
                InstructionKind::Barrier => {
                    for &r in &operand_rows {
                        column.cells[r] = Cell::Barrier;
                    }
                    for r in lo..hi {
                        if operand_rows.contains(&r) && operand_rows.contains(&(r + 1)) {
                            column.links[r] = Link::Barrier;
                        }
                    }
                }
            }
        }
        columns
    }

    /// Render the diagram, one line per wire with link lines in between.
    pub fn render(&self) -> String {
        let rows = self.circuit.num_qubits();
        let mut out = String::new();
        let phase = self.circuit.global_phase();
        if phase.abs() > 1e-12 {
            out.push_str(&format!("global phase: {}\n", format_angle(phase)));
        }
        if rows == 0 {
            return out;
        }

        let mut labels = vec![String::new(); rows];
        for qubit in self.circuit.qubits() {
            labels[self.row(qubit.id)] = qubit.wire_label();
        }
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let columns = self.layout();
        let widths: Vec<usize> = columns.iter().map(Column::width).collect();

        for (r, label) in labels.iter().enumerate() {
            let mut line = format!("{label:>label_width$}: ");
            for (column, &w) in columns.iter().zip(&widths) {
                line.push_str(&render_cell(&column.cells[r], w));
            }
            out.push_str(line.trim_end());
            out.push('\n');

            if r + 1 < rows {
                let mut gap = " ".repeat(label_width + 2);
                for (column, &w) in columns.iter().zip(&widths) {
                    gap.push_str(&render_link(column.links[r], w));
                }
                out.push_str(gap.trim_end());
                out.push('\n');
            }
        }
        out
    }
}

impl fmt::Display for TextDrawer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn repeat(c: char, n: usize) -> String {
    std::iter::repeat_n(c, n).collect()
}

fn centered(center: &str, width: usize, fill: char) -> String {
    let len = center.chars().count();
    let left = width.saturating_sub(len) / 2;
    let right = width.saturating_sub(len + left);
    format!(
        "{fill}{}{center}{}{fill}",
        repeat(fill, left),
        repeat(fill, right)
    )
}

fn render_cell(cell: &Cell, width: usize) -> String {
    match cell {
        Cell::Wire => repeat(WIRE, width + 2),
        Cell::Cross => centered("┼", width, WIRE),
        Cell::Barrier => centered("░", width, WIRE),
        Cell::Symbol(s) => centered(s, width, WIRE),
    }
}

fn render_link(link: Link, width: usize) -> String {
    match link {
        Link::None => repeat(' ', width + 2),
        Link::Wire => centered("│", width, ' '),
        Link::Barrier => centered("░", width, ' '),
    }
}

/// One symbol per operand, in operand order.
fn operand_symbols(gate: &Gate) -> Vec<String> {
    let arity = gate.num_qubits() as usize;
    let boxed = |name: &str| -> Vec<String> {
        if arity == 1 {
            vec![name.to_string()]
        } else {
            (0..arity).map(|k| format!("{name}:{k}")).collect()
        }
    };

    let standard = match &gate.kind {
        GateKind::Standard(g) if gate.label.is_none() => g,
        _ => return boxed(gate.display_name()),
    };

    // Controls are the leading operands.
    let mut symbols = vec!["■".to_string(); standard.num_controls() as usize];
    match standard {
        StandardGate::CX | StandardGate::CCX => symbols.push("⊕".into()),
        StandardGate::CY => symbols.push("Y".into()),
        StandardGate::CZ | StandardGate::CCZ => symbols.push("■".into()),
        StandardGate::CH => symbols.push("H".into()),
        StandardGate::CRx(t) => symbols.push(format!("Rx({t})")),
        StandardGate::CRy(t) => symbols.push(format!("Ry({t})")),
        StandardGate::CRz(t) => symbols.push(format!("Rz({t})")),
        StandardGate::CP(t) => symbols.push(format!("P({t})")),
        StandardGate::Swap | StandardGate::CSwap => symbols.extend(["X".into(), "X".into()]),
        StandardGate::RZZ(t) => symbols.extend([format!("ZZ({t})"), format!("ZZ({t})")]),
        single => symbols.push(single_qubit_symbol(single)),
    }
    symbols
}

fn single_qubit_symbol(gate: &StandardGate) -> String {
    match gate {
        StandardGate::I => "I".into(),
        StandardGate::X => "X".into(),
        StandardGate::Y => "Y".into(),
        StandardGate::Z => "Z".into(),
        StandardGate::H => "H".into(),
        StandardGate::S => "S".into(),
        StandardGate::Sdg => "Sdg".into(),
        StandardGate::T => "T".into(),
        StandardGate::Tdg => "Tdg".into(),
        StandardGate::SX => "√X".into(),
        StandardGate::SXdg => "√Xdg".into(),
        StandardGate::Rx(t) => format!("Rx({t})"),
        StandardGate::Ry(t) => format!("Ry({t})"),
        StandardGate::Rz(t) => format!("Rz({t})"),
        StandardGate::P(t) => format!("P({t})"),
        StandardGate::U(t, p, l) => format!("U({t},{p},{l})"),
        other => other.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ParameterExpression;
    use crate::qubit::Register;

    fn bell() -> Circuit {
        let mut circuit = Circuit::with_size("bell", 2);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        circuit
    }

    #[test]
    fn test_bell_diagram() {
        let circuit = bell();
        let expected = format!("q_0: ─H──■─\n{}│\nq_1: ─────⊕─\n", " ".repeat(9));
        assert_eq!(circuit.drawer().render(), expected);
    }

    #[test]
    fn test_reverse_bits_puts_last_qubit_on_top() {
        let circuit = bell();
        let expected = format!("q_1: ─────⊕─\n{}│\nq_0: ─H──■─\n", " ".repeat(9));
        assert_eq!(circuit.drawer().reverse_bits(true).render(), expected);
    }

    #[test]
    fn test_independent_gates_share_a_column() {
        let mut circuit = Circuit::with_size("c", 2);
        circuit.h(QubitId(0)).unwrap().x(QubitId(1)).unwrap();
        let text = circuit.to_string();
        assert_eq!(text, "q_0: ─H─\n\nq_1: ─X─\n");
    }

    #[test]
    fn test_spanned_row_is_crossed() {
        let mut circuit = Circuit::with_size("c", 3);
        circuit.cx(QubitId(0), QubitId(2)).unwrap();
        let text = circuit.to_string();
        assert!(text.contains("q_1: ─┼─"));
    }

    #[test]
    fn test_register_labels_and_composite() {
        let mut sub = Circuit::with_size("sub", 2);
        sub.h(QubitId(0)).unwrap();
        let gate = sub.to_gate().unwrap().with_label("qc1");

        let mut circuit = Circuit::with_registers(
            "c",
            [Register::quantum("x", 2), Register::ancilla("anc", 1)],
        )
        .unwrap();
        circuit.gate(gate, [QubitId(2), QubitId(0)]).unwrap();
        circuit.barrier_all().unwrap();

        let text = circuit.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("  x_0: ─qc1:1─"));
        assert!(lines[4].starts_with("anc_0: ─qc1:0─"));
        assert!(lines[0].ends_with("░─"));
        assert!(lines[1].ends_with('░'));
    }

    #[test]
    fn test_global_phase_header() {
        let mut circuit = Circuit::with_size("c", 1);
        circuit.add_global_phase(std::f64::consts::PI / 2.0);
        assert!(circuit.to_string().starts_with("global phase: π/2\n"));
    }
    #[test]
    fn test_controls_drawn_from_num_controls() {
        let t = ParameterExpression::constant(0.5);
        let gates = [
            StandardGate::CX,
            StandardGate::CY,
            StandardGate::CZ,
            StandardGate::CH,
            StandardGate::CRz(t.clone()),
            StandardGate::CP(t.clone()),
            StandardGate::Swap,
            StandardGate::RZZ(t),
            StandardGate::CCX,
            StandardGate::CCZ,
            StandardGate::CSwap,
        ];
        for g in gates {
            let symbols = operand_symbols(&Gate::from(g.clone()));
            assert_eq!(symbols.len(), g.num_qubits() as usize, "{}", g.name());
            let controls = symbols.iter().take_while(|s| *s == "■").count();
            assert!(controls >= g.num_controls() as usize, "{}", g.name());
        }
        assert_eq!(
            operand_symbols(&StandardGate::CSwap.into()),
            vec!["■", "X", "X"]
        );
    }
}
