//! # Symbolic Engine Module
//!
//! The term model of the calculus engine: an immutable expression tree and its
//! canonical textual rendering.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - the bound variable or a symbolic parameter
//! - **Constants**: `Const(f64)` - numerical constants (π and e included)
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div` - binary arithmetic
//! - **Powers**: `Pow(base, n)` - numeric exponent only, `0.5` and `-1` allowed
//! - **Functions**: `sin`, `cos`, `tan`, `Ln`, `Log`, `Exp`, `Sqrt`, `arcsin`, `arctan`, `Abs`
//!
//! ### Key Methods
//! - `to_string()` (via `Display`) - the canonical string used for display, cache keys,
//!   textual pattern matching and the unresolved-integral marker
//! - `contains_variable()`, `node_count()`, `linear_coefficients()` - structural queries
//! - `eval_at()`, `eval_constant()`, `lambdify1D()` - numerical evaluation
//!
//! ## Canonical rendering
//!
//! The rendering uses the fewest parentheses that still parse back into the same
//! tree: `x^2+sin(x)`, `e^x/(1+e^x)`, `-(2*x)`, `ln|cos(x)|`, `x^(-1)`.
//! Right operands of the same precedence are always parenthesized, so
//! `Add(a, Add(b, c))` renders as `a+(b+c)`.

#![allow(non_camel_case_types)]

use crate::symbolic::symbolic_errors::EvaluationError;
use crate::symbolic::utils::format_number;
use std::f64::consts::{E, PI};
use std::fmt;

/// Core symbolic expression enum representing a single-variable calculus term.
///
/// Children are owned through `Box<Expr>`: a strict tree without sharing. Every
/// transform of the engine builds a new tree.
///
/// # Examples
/// ```rust, ignore
/// use RustedCalculus::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x.clone().pow(2.0)), Box::new(Expr::sin(Box::new(x))));
/// assert_eq!(expr.to_string(), "x^2+sin(x)");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "t", "a")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power with a numeric exponent: base ^ n
    Pow(Box<Expr>, f64),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Decimal logarithm: log(x)
    Log(Box<Expr>),
    /// Square root: sqrt(x)
    Sqrt(Box<Expr>),
    /// Absolute value: |x|
    Abs(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x)
    tan(Box<Expr>),
    /// Arcsine function: arcsin(x)
    arcsin(Box<Expr>),
    /// Arctangent function: arctan(x)
    arctan(Box<Expr>),
}

// precedence levels of the canonical rendering
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_POWER: u8 = 3;
const PREC_ATOM: u8 = 4;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => PREC_SUM,
            Expr::Const(c) if *c < 0.0 => PREC_SUM,
            Expr::Mul(lhs, _) if lhs.is_minus_one() => PREC_SUM,
            Expr::Mul(..) | Expr::Div(..) => PREC_PRODUCT,
            Expr::Pow(..) | Expr::Exp(_) => PREC_POWER,
            _ => PREC_ATOM,
        }
    }

    fn is_sum(&self) -> bool {
        matches!(self, Expr::Add(..) | Expr::Sub(..))
    }

    // true if the rendering begins with a minus sign
    fn starts_with_minus(&self) -> bool {
        match self {
            Expr::Const(c) => *c < 0.0,
            Expr::Mul(lhs, _) if lhs.is_minus_one() => true,
            Expr::Mul(lhs, _) | Expr::Div(lhs, _) => lhs.starts_with_minus(),
            _ => false,
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter, parens: bool) -> fmt::Result {
        if parens {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Canonical rendering. Deterministic and parseable by `parse_expr`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", format_number(*val)),
            Expr::Add(lhs, rhs) => {
                lhs.fmt_child(f, false)?;
                write!(f, "+")?;
                rhs.fmt_child(f, rhs.precedence() <= PREC_SUM || rhs.starts_with_minus())
            }
            Expr::Sub(lhs, rhs) => {
                lhs.fmt_child(f, false)?;
                write!(f, "-")?;
                rhs.fmt_child(f, rhs.precedence() <= PREC_SUM || rhs.starts_with_minus())
            }
            Expr::Mul(lhs, rhs) if lhs.is_minus_one() => {
                write!(f, "-")?;
                rhs.fmt_child(f, rhs.precedence() < PREC_POWER)
            }
            Expr::Mul(lhs, rhs) => {
                lhs.fmt_child(f, lhs.is_sum())?;
                write!(f, "*")?;
                rhs.fmt_child(f, rhs.precedence() <= PREC_PRODUCT)
            }
            Expr::Div(lhs, rhs) => {
                lhs.fmt_child(f, lhs.is_sum())?;
                write!(f, "/")?;
                rhs.fmt_child(f, rhs.precedence() <= PREC_PRODUCT)
            }
            Expr::Pow(base, exp) => {
                base.fmt_child(f, base.precedence() <= PREC_POWER)?;
                if *exp < 0.0 {
                    write!(f, "^({})", format_number(*exp))
                } else {
                    write!(f, "^{}", format_number(*exp))
                }
            }
            Expr::Exp(expr) => match expr.as_ref() {
                Expr::Var(_) => write!(f, "e^{}", expr),
                Expr::Const(c) if *c >= 0.0 => write!(f, "e^{}", expr),
                _ => write!(f, "e^({})", expr),
            },
            Expr::Ln(expr) => match expr.as_ref() {
                Expr::Abs(inner) => write!(f, "ln|{}|", inner),
                _ => write!(f, "ln({})", expr),
            },
            Expr::Log(expr) => write!(f, "log({})", expr),
            Expr::Sqrt(expr) => write!(f, "sqrt({})", expr),
            Expr::Abs(expr) => write!(f, "|{}|", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tan(expr) => write!(f, "tan({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arctan(expr) => write!(f, "arctan({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Expr::Const(c) => Expr::Const(-c),
            Expr::Mul(lhs, rhs) if lhs.is_minus_one() => *rhs,
            other => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(other)),
        }
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates power expression self^n.
    pub fn pow(self, n: f64) -> Expr {
        Expr::Pow(self.boxed(), n)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates ln|self|.
    pub fn ln_abs(self) -> Expr {
        Expr::Ln(Expr::Abs(self.boxed()).boxed())
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// Checks if expression is exactly the constant 1.0.
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 1.0)
    }

    pub fn is_minus_one(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == -1.0)
    }

    /// Value of a `Const` node, `None` for anything else.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(c) => Some(*c),
            _ => None,
        }
    }

    /// true if the expression is exactly the variable `var`
    pub fn is_var(&self, var: &str) -> bool {
        matches!(self, Expr::Var(name) if name == var)
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Pow(base, _) => base.contains_variable(var_name),
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::Log(expr)
            | Expr::Sqrt(expr)
            | Expr::Abs(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tan(expr)
            | Expr::arcsin(expr)
            | Expr::arctan(expr) => expr.contains_variable(var_name),
        }
    }

    /// Number of nodes in the tree; the numeric exponent of `Pow` is not a node.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Var(_) | Expr::Const(_) => 1,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right) => 1 + left.node_count() + right.node_count(),
            Expr::Pow(base, _) => 1 + base.node_count(),
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::Log(expr)
            | Expr::Sqrt(expr)
            | Expr::Abs(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tan(expr)
            | Expr::arcsin(expr)
            | Expr::arctan(expr) => 1 + expr.node_count(),
        }
    }

    /// Recognises `a*var + b` with numeric `a` and `b`.
    ///
    /// Returns `Some((a, b))` for any expression that is affine in `var` with
    /// constant coefficients (`a` may be zero when `var` is absent), `None` otherwise.
    pub fn linear_coefficients(&self, var: &str) -> Option<(f64, f64)> {
        match self {
            Expr::Var(name) if name == var => Some((1.0, 0.0)),
            Expr::Var(_) => None,
            Expr::Const(c) => Some((0.0, *c)),
            Expr::Add(lhs, rhs) => {
                let (a1, b1) = lhs.linear_coefficients(var)?;
                let (a2, b2) = rhs.linear_coefficients(var)?;
                Some((a1 + a2, b1 + b2))
            }
            Expr::Sub(lhs, rhs) => {
                let (a1, b1) = lhs.linear_coefficients(var)?;
                let (a2, b2) = rhs.linear_coefficients(var)?;
                Some((a1 - a2, b1 - b2))
            }
            Expr::Mul(lhs, rhs) => {
                let (a1, b1) = lhs.linear_coefficients(var)?;
                let (a2, b2) = rhs.linear_coefficients(var)?;
                // one side must be a pure number
                if a1 == 0.0 {
                    Some((b1 * a2, b1 * b2))
                } else if a2 == 0.0 {
                    Some((a1 * b2, b1 * b2))
                } else {
                    None
                }
            }
            Expr::Div(lhs, rhs) => {
                let (a1, b1) = lhs.linear_coefficients(var)?;
                let (a2, b2) = rhs.linear_coefficients(var)?;
                if a2 == 0.0 && b2 != 0.0 {
                    Some((a1 / b2, b1 / b2))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Slope `a` of a term linear in `var` (`a*var + b`, `a != 0`).
    pub fn linear_slope(&self, var: &str) -> Option<f64> {
        match self.linear_coefficients(var) {
            Some((a, _)) if a != 0.0 => Some(a),
            _ => None,
        }
    }

    //___________________________________EVALUATION____________________________________

    /// Evaluates the expression with `var` bound to `value`.
    ///
    /// Any other variable is reported as `UnboundSymbol`; division by zero, logarithms of
    /// non-positive numbers, even roots of negative numbers and non-finite results are
    /// reported instead of producing NaN.
    pub fn eval_at(&self, var: &str, value: f64) -> Result<f64, EvaluationError> {
        self.eval_with(Some((var, value)))
    }

    /// Evaluates an expression that contains no symbols at all.
    pub fn eval_constant(&self) -> Result<f64, EvaluationError> {
        self.eval_with(None)
    }

    fn eval_with(&self, binding: Option<(&str, f64)>) -> Result<f64, EvaluationError> {
        let result = match self {
            Expr::Var(name) => match binding {
                Some((var, value)) if var == name => value,
                _ => return Err(EvaluationError::UnboundSymbol(name.clone())),
            },
            Expr::Const(c) => *c,
            Expr::Add(lhs, rhs) => lhs.eval_with(binding)? + rhs.eval_with(binding)?,
            Expr::Sub(lhs, rhs) => lhs.eval_with(binding)? - rhs.eval_with(binding)?,
            Expr::Mul(lhs, rhs) => lhs.eval_with(binding)? * rhs.eval_with(binding)?,
            Expr::Div(lhs, rhs) => {
                let denominator = rhs.eval_with(binding)?;
                if denominator == 0.0 {
                    return Err(EvaluationError::DivisionByZero);
                }
                lhs.eval_with(binding)? / denominator
            }
            Expr::Pow(base, exp) => {
                let b = base.eval_with(binding)?;
                if b < 0.0 && exp.fract() != 0.0 {
                    return Err(EvaluationError::Domain(format!(
                        "fractional power {} of negative number {}",
                        exp, b
                    )));
                }
                if b == 0.0 && *exp < 0.0 {
                    return Err(EvaluationError::DivisionByZero);
                }
                b.powf(*exp)
            }
            Expr::Exp(expr) => expr.eval_with(binding)?.exp(),
            Expr::Ln(expr) => {
                let arg = expr.eval_with(binding)?;
                if arg <= 0.0 {
                    return Err(EvaluationError::Domain(format!("ln of {}", arg)));
                }
                arg.ln()
            }
            Expr::Log(expr) => {
                let arg = expr.eval_with(binding)?;
                if arg <= 0.0 {
                    return Err(EvaluationError::Domain(format!("log of {}", arg)));
                }
                arg.log10()
            }
            Expr::Sqrt(expr) => {
                let arg = expr.eval_with(binding)?;
                if arg < 0.0 {
                    return Err(EvaluationError::Domain(format!("sqrt of {}", arg)));
                }
                arg.sqrt()
            }
            Expr::Abs(expr) => expr.eval_with(binding)?.abs(),
            Expr::sin(expr) => expr.eval_with(binding)?.sin(),
            Expr::cos(expr) => expr.eval_with(binding)?.cos(),
            Expr::tan(expr) => expr.eval_with(binding)?.tan(),
            Expr::arcsin(expr) => {
                let arg = expr.eval_with(binding)?;
                if !(-1.0..=1.0).contains(&arg) {
                    return Err(EvaluationError::Domain(format!("arcsin of {}", arg)));
                }
                arg.asin()
            }
            Expr::arctan(expr) => expr.eval_with(binding)?.atan(),
        };
        if result.is_finite() {
            Ok(result)
        } else {
            Err(EvaluationError::Domain(format!("{} is not finite", self)))
        }
    }

    /// Turns the expression into a closure of one argument; evaluation errors become NaN.
    pub fn lambdify1D(&self, var: &str) -> impl Fn(f64) -> f64 + '_ {
        let var = var.to_owned();
        move |x| self.eval_at(&var, x).unwrap_or(f64::NAN)
    }
}

/// π and e as terms
pub fn pi() -> Expr {
    Expr::Const(PI)
}

pub fn euler() -> Expr {
    Expr::Const(E)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_canonical_rendering() {
        let expr = x().pow(2.0) + Expr::sin(x().boxed());
        assert_eq!(expr.to_string(), "x^2+sin(x)");
        let quotient = x().exp() / (Expr::Const(1.0) + x().exp());
        assert_eq!(quotient.to_string(), "e^x/(1+e^x)");
        let neg = -(Expr::Const(2.0) * x());
        assert_eq!(neg.to_string(), "-(2*x)");
        assert_eq!(x().pow(-1.0).to_string(), "x^(-1)");
        assert_eq!(Expr::cos(x().boxed()).ln_abs().to_string(), "ln|cos(x)|");
        assert_eq!((x() - (x() + Expr::Const(1.0))).to_string(), "x-(x+1)");
        assert_eq!(Expr::Pow(x().exp().boxed(), 2.0).to_string(), "(e^x)^2");
        assert_eq!((Expr::Const(2.0) * x()).exp().to_string(), "e^(2*x)");
        assert_eq!(pi().to_string(), "π");
        let scaled = Expr::Const(-2.0) * Expr::sin(x().boxed());
        assert_eq!(scaled.to_string(), "-2*sin(x)");
        assert_eq!((x() - scaled).to_string(), "x-(-2*sin(x))");
    }

    #[test]
    fn test_node_count() {
        let expr = x().pow(2.0) + Expr::sin(x().boxed());
        assert_eq!(expr.node_count(), 5);
        assert_eq!(Expr::Const(3.0).node_count(), 1);
    }

    #[test]
    fn test_contains_variable() {
        let expr = Expr::Var("a".to_string()) * Expr::cos(x().boxed());
        assert!(expr.contains_variable("x"));
        assert!(expr.contains_variable("a"));
        assert!(!expr.contains_variable("y"));
    }

    #[test]
    fn test_linear_coefficients() {
        let expr = Expr::Const(3.0) * x() + Expr::Const(2.0);
        assert_eq!(expr.linear_coefficients("x"), Some((3.0, 2.0)));
        let expr = (x() - Expr::Const(1.0)) / Expr::Const(2.0);
        assert_eq!(expr.linear_coefficients("x"), Some((0.5, -0.5)));
        assert_eq!(x().pow(2.0).linear_coefficients("x"), None);
        assert_eq!((x() * x()).linear_coefficients("x"), None);
        assert_eq!(Expr::Const(4.0).linear_slope("x"), None);
    }

    #[test]
    fn test_eval_at() {
        let expr = x().pow(2.0) + Expr::sin(x().boxed());
        assert_relative_eq!(expr.eval_at("x", 2.0).unwrap(), 4.0 + 2f64.sin(), epsilon = 1e-12);
        let f = expr.lambdify1D("x");
        assert_relative_eq!(f(0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_eval_errors() {
        let inv = Expr::Const(1.0) / x();
        assert_eq!(inv.eval_at("x", 0.0), Err(EvaluationError::DivisionByZero));
        assert!(matches!(x().ln().eval_at("x", -1.0), Err(EvaluationError::Domain(_))));
        assert!(matches!(
            Expr::Sqrt(x().boxed()).eval_at("x", -4.0),
            Err(EvaluationError::Domain(_))
        ));
        assert_eq!(
            Expr::Var("a".to_string()).eval_at("x", 1.0),
            Err(EvaluationError::UnboundSymbol("a".to_string()))
        );
        assert_relative_eq!((pi() / Expr::Const(2.0)).eval_constant().unwrap(), PI / 2.0);
    }

    #[test]
    fn test_neg() {
        assert_eq!(-Expr::Const(2.0), Expr::Const(-2.0));
        assert_eq!(-(-x()), x());
        assert_eq!(
            -x(),
            Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(x()))
        );
    }
}
