//! Symbolic parameters for template circuits.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;

use crate::error::{IrError, IrResult};

/// Name-to-value bindings used by `assign_parameters`.
pub type ParameterBindings = FxHashMap<String, f64>;

/// A named placeholder that can be bound to a number later.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
}

impl Parameter {
    /// Create a parameter. The name is what bindings refer to.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This parameter as an expression.
    pub fn expr(&self) -> ParameterExpression {
        ParameterExpression::Symbol(self.name.clone())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<Parameter> for String {
    fn from(p: Parameter) -> Self {
        p.name
    }
}

impl From<&Parameter> for String {
    fn from(p: &Parameter) -> Self {
        p.name.clone()
    }
}

/// A symbolic or concrete parameter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A symbolic parameter.
    Symbol(String),
    /// The constant π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Addition.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Subtraction.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Multiplication.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Division.
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// Create a constant parameter.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a symbolic parameter.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Create a π constant.
    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    /// Check if this expression contains any symbols.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) | ParameterExpression::Pi => false,
            ParameterExpression::Neg(e) => e.is_symbolic(),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Try to evaluate as a concrete f64 value.
    ///
    /// Returns `None` for symbolic expressions and division by zero.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Pi => Some(PI),
            ParameterExpression::Neg(e) => e.as_f64().map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.as_f64()? + b.as_f64()?),
            ParameterExpression::Sub(a, b) => Some(a.as_f64()? - b.as_f64()?),
            ParameterExpression::Mul(a, b) => Some(a.as_f64()? * b.as_f64()?),
            ParameterExpression::Div(a, b) => {
                let divisor = b.as_f64()?;
                if divisor == 0.0 {
                    return None;
                }
                Some(a.as_f64()? / divisor)
            }
        }
    }

    /// Evaluate to a number, naming the first unbound symbol on failure.
    pub fn evaluate(&self) -> IrResult<f64> {
        if let Some(name) = self.symbols().into_iter().next() {
            return Err(IrError::UnboundParameter(name));
        }
        self.as_f64()
            .ok_or_else(|| IrError::InvalidExpression(self.to_string()))
    }

    /// All symbol names in this expression, sorted.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        self.collect_symbols(&mut set);
        set
    }

    fn collect_symbols(&self, set: &mut BTreeSet<String>) {
        match self {
            ParameterExpression::Constant(_) | ParameterExpression::Pi => {}
            ParameterExpression::Symbol(name) => {
                set.insert(name.clone());
            }
            ParameterExpression::Neg(e) => e.collect_symbols(set),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => {
                a.collect_symbols(set);
                b.collect_symbols(set);
            }
        }
    }

    /// Bind a single symbol, returning a new expression.
    pub fn bind(&self, name: &str, value: f64) -> Self {
        self.substitute(&|n| (n == name).then_some(value))
    }

    /// Bind every symbol found in `bindings`; unknown symbols stay symbolic.
    ///
    /// Fully bound expressions collapse to a single constant.
    pub fn bind_all(&self, bindings: &ParameterBindings) -> Self {
        let bound = self.substitute(&|n| bindings.get(n).copied());
        if bound.is_symbolic() { bound } else { bound.simplify() }
    }

    fn substitute(&self, lookup: &dyn Fn(&str) -> Option<f64>) -> Self {
        let sub = |e: &ParameterExpression| Box::new(e.substitute(lookup));
        match self {
            ParameterExpression::Symbol(n) => match lookup(n) {
                Some(v) => ParameterExpression::Constant(v),
                None => self.clone(),
            },
            ParameterExpression::Constant(_) | ParameterExpression::Pi => self.clone(),
            ParameterExpression::Neg(e) => ParameterExpression::Neg(sub(e)),
            ParameterExpression::Add(a, b) => ParameterExpression::Add(sub(a), sub(b)),
            ParameterExpression::Sub(a, b) => ParameterExpression::Sub(sub(a), sub(b)),
            ParameterExpression::Mul(a, b) => ParameterExpression::Mul(sub(a), sub(b)),
            ParameterExpression::Div(a, b) => ParameterExpression::Div(sub(a), sub(b)),
        }
    }

    /// Simplify the expression by evaluating constant subexpressions.
    pub fn simplify(&self) -> Self {
        if let Some(v) = self.as_f64() {
            return ParameterExpression::Constant(v);
        }
        let fold = |a: &ParameterExpression,
                    b: &ParameterExpression,
                    op: fn(f64, f64) -> Option<f64>,
                    ctor: fn(Box<Self>, Box<Self>) -> Self| {
            let (a, b) = (a.simplify(), b.simplify());
            match (a.as_f64(), b.as_f64()) {
                (Some(av), Some(bv)) => match op(av, bv) {
                    Some(v) => ParameterExpression::Constant(v),
                    None => ctor(Box::new(a), Box::new(b)),
                },
                _ => ctor(Box::new(a), Box::new(b)),
            }
        };
        match self {
            ParameterExpression::Neg(e) => {
                let e = e.simplify();
                match e.as_f64() {
                    Some(v) => ParameterExpression::Constant(-v),
                    None => ParameterExpression::Neg(Box::new(e)),
                }
            }
            ParameterExpression::Add(a, b) => fold(a, b, |x, y| Some(x + y), Self::Add),
            ParameterExpression::Sub(a, b) => fold(a, b, |x, y| Some(x - y), Self::Sub),
            ParameterExpression::Mul(a, b) => fold(a, b, |x, y| Some(x * y), Self::Mul),
            ParameterExpression::Div(a, b) => {
                fold(a, b, |x, y| (y != 0.0).then(|| x / y), Self::Div)
            }
            _ => self.clone(),
        }
    }
}

/// Format an angle, preferring a rational multiple of π when one is close.
pub fn format_angle(value: f64) -> String {
    const TOLERANCE: f64 = 1e-9;
    if value.abs() < TOLERANCE {
        return "0".into();
    }
    let ratio = value / PI;
    for denom in 1..=8_i64 {
        let numer = ratio * denom as f64;
        let rounded = numer.round();
        if (numer - rounded).abs() < TOLERANCE && rounded.abs() <= 16.0 {
            let n = rounded as i64;
            let sign = if n < 0 { "-" } else { "" };
            let coeff = match n.abs() {
                1 => "π".to_string(),
                k => format!("{k}π"),
            };
            return if denom == 1 {
                format!("{sign}{coeff}")
            } else {
                format!("{sign}{coeff}/{denom}")
            };
        }
    }
    let text = format!("{value:.4}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => f.write_str(&format_angle(*v)),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
            ParameterExpression::Pi => write!(f, "π"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
            ParameterExpression::Sub(a, b) => write!(f, "({a} - {b})"),
            ParameterExpression::Mul(a, b) => write!(f, "({a} * {b})"),
            ParameterExpression::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<i32> for ParameterExpression {
    fn from(value: i32) -> Self {
        ParameterExpression::Constant(f64::from(value))
    }
}

impl From<Parameter> for ParameterExpression {
    fn from(p: Parameter) -> Self {
        ParameterExpression::Symbol(p.name)
    }
}

impl From<&Parameter> for ParameterExpression {
    fn from(p: &Parameter) -> Self {
        p.expr()
    }
}

impl std::ops::Add for ParameterExpression {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ParameterExpression::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for ParameterExpression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        ParameterExpression::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for ParameterExpression {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        ParameterExpression::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for ParameterExpression {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        ParameterExpression::Div(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_evaluation_fails_until_bound() {
        let theta = Parameter::new("θ");
        let expr = theta.expr() * ParameterExpression::constant(2.0);
        assert_eq!(expr.evaluate(), Err(IrError::UnboundParameter("θ".into())));

        let bound = expr.bind("θ", PI / 4.0);
        assert!((bound.evaluate().unwrap() - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_bind_all_collapses_to_constant() {
        let mut bindings = ParameterBindings::default();
        bindings.insert("a".into(), 1.0);
        bindings.insert("b".into(), 2.0);
        let expr = ParameterExpression::symbol("a") + ParameterExpression::symbol("b");
        assert_eq!(expr.bind_all(&bindings), ParameterExpression::Constant(3.0));

        let partial = ParameterExpression::symbol("a") - ParameterExpression::symbol("c");
        let bound = partial.bind_all(&bindings);
        assert!(bound.is_symbolic());
        assert_eq!(bound.symbols().into_iter().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_simplify_keeps_division_by_zero() {
        let expr = ParameterExpression::constant(1.0) / ParameterExpression::constant(0.0);
        assert!(matches!(expr.simplify(), ParameterExpression::Div(_, _)));
        assert_eq!(expr.as_f64(), None);
    }

    #[test]
    fn test_format_angle() {
        assert_eq!(format_angle(PI), "π");
        assert_eq!(format_angle(PI / 2.0), "π/2");
        assert_eq!(format_angle(-3.0 * PI / 4.0), "-3π/4");
        assert_eq!(format_angle(0.0), "0");
        assert_eq!(format_angle(0.25), "0.25");
    }

    #[test]
    fn test_display_uses_pi_multiples() {
        let expr = ParameterExpression::constant(PI / 2.0);
        assert_eq!(expr.to_string(), "π/2");
        assert_eq!(Parameter::new("θ").expr().to_string(), "θ");
    }
}
