//! # Symbolic Integration Module
//!
//! Best-effort indefinite integration producing a formula string, plus Gauss-Legendre
//! quadrature used when a definite integral has no usable closed form.
//!
//! Whatever the engine cannot integrate is kept as the marker `integral(<term>)`
//! inside the formula; this is a normal result, not an error. Internal results never
//! carry the constant of integration; [`CalculusEngine::integrate`] appends one `+C`
//! when the integrand is a sum or difference at its top level.
//!
//! ## Rules, in order
//! - cache lookup (canonical string + variable)
//! - a term free of the variable: `∫k dx = k*x`
//! - the integral registry for quotients, roots and trig of non-linear arguments
//! - per node: power rule with linear substitution, `e^u`, `ln(u)`, `log(u)`, trig of a
//!   linear argument, `sin(u)^2`, `cos(u)^2`, `sin(u)^3`, `cos(u)^3`, the by-parts table,
//!   a variable-free factor or denominator pulled out, `f'/f = ln|f|`
//! - everything else is unresolved

use crate::symbolic::symbolic_cache::cache_key;
use crate::symbolic::symbolic_context::CalculusEngine;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::EvaluationError;
use crate::symbolic::symbolic_patterns::{BY_PARTS_PATTERNS, INTEGRAL_PATTERNS, detect};
use crate::symbolic::utils::{
    difference_strings, format_number, has_top_level_sum, negate_string, product_strings,
    strip_constant, sum_strings,
};
use gauss_quad::GaussLegendre;
use log::debug;

/// prefix of the marker left for terms without a known antiderivative
pub const UNRESOLVED_PREFIX: &str = "integral(";

/// `integral(<canonical string>)`
pub fn unresolved(expr: &Expr) -> String {
    format!("{}{})", UNRESOLVED_PREFIX, expr)
}

pub fn is_unresolved(formula: &str) -> bool {
    formula.contains(UNRESOLVED_PREFIX)
}

/// `k * s` for a numeric `k`, moving a leading minus of `s` into `k`
fn scale_string(k: f64, s: &str) -> String {
    let (k, s) = match s.strip_prefix('-') {
        Some(rest) if !has_top_level_sum(s) => (-k, rest.to_string()),
        _ => (k, s.to_string()),
    };
    if k == 1.0 {
        s
    } else if k == -1.0 {
        negate_string(&s)
    } else {
        product_strings(&format_number(k), &s)
    }
}

/// `s / den` as text
fn quotient_string(s: &str, den: &Expr) -> String {
    let numerator = if has_top_level_sum(s) {
        format!("({})", s)
    } else {
        s.to_string()
    };
    let grouped = matches!(den, Expr::Add(..) | Expr::Sub(..) | Expr::Mul(..) | Expr::Div(..))
        || matches!(den, Expr::Const(c) if *c < 0.0);
    if grouped {
        format!("{}/({})", numerator, den)
    } else {
        format!("{}/{}", numerator, den)
    }
}

/// `result / a` for the slope `a` of a linear substitution
fn divide_by_slope(result: Expr, a: f64) -> Expr {
    if a == 1.0 {
        result
    } else {
        result / Expr::Const(a)
    }
}

/// c with `numerator = c * derivative` when both are simple enough to compare
fn proportionality(numerator: &Expr, derivative: &Expr) -> Option<f64> {
    let numerator = numerator.simplify();
    let derivative = derivative.simplify();
    if derivative.is_zero() {
        return None;
    }
    if numerator == derivative {
        return Some(1.0);
    }
    if let (Ok(n), Ok(d)) = (numerator.eval_constant(), derivative.eval_constant()) {
        return Some(n / d);
    }
    let split = |e: &Expr| -> (f64, Expr) {
        match e {
            Expr::Mul(lhs, rhs) => match lhs.as_const() {
                Some(c) => (c, rhs.as_ref().clone()),
                None => (1.0, e.clone()),
            },
            _ => (1.0, e.clone()),
        }
    };
    let (cn, rn) = split(&numerator);
    let (cd, rd) = split(&derivative);
    if rn == rd { Some(cn / cd) } else { None }
}

/// `constant * s` where `constant` is free of the variable
fn scale_by(constant: &Expr, s: &str) -> String {
    match constant.as_const() {
        Some(k) => scale_string(k, s),
        None => product_strings(&constant.to_string(), s),
    }
}

fn product_factors<'a>(expr: &'a Expr, factors: &mut Vec<&'a Expr>) {
    match expr {
        Expr::Mul(lhs, rhs) => {
            product_factors(lhs, factors);
            product_factors(rhs, factors);
        }
        _ => factors.push(expr),
    }
}

/// (variable-free part, rest) of a product with at least one factor of each kind.
/// Numeric factors are folded into one constant in front of the symbolic ones.
fn split_constant_factors(expr: &Expr, var: &str) -> Option<(Expr, Expr)> {
    let mut factors = Vec::new();
    product_factors(expr, &mut factors);
    let (constant, dependent): (Vec<&Expr>, Vec<&Expr>) = factors
        .into_iter()
        .partition(|factor| !factor.contains_variable(var));
    if constant.is_empty() {
        return None;
    }
    let rest = dependent.into_iter().cloned().reduce(|acc, f| acc * f)?;
    let k: f64 = constant.iter().filter_map(|f| f.as_const()).product();
    let symbolic = constant
        .into_iter()
        .filter(|f| f.as_const().is_none())
        .cloned()
        .reduce(|acc, f| acc * f);
    let constant = match symbolic {
        None => Expr::Const(k),
        Some(symbolic) if k == 1.0 => symbolic,
        Some(symbolic) => Expr::Const(k) * symbolic,
    };
    Some((constant, rest))
}

fn x_of(var: &str) -> Expr {
    Expr::Var(var.to_string())
}

impl CalculusEngine {
    /// SYMBOLIC INTEGRATION

    /// Indefinite integral of `expr` as a formula string. A sum or difference at the top
    /// level gets exactly one trailing `+C`; unresolved parts appear as `integral(...)`.
    pub fn integrate(&self, expr: &Expr, var: &str) -> String {
        let result = self.integrate_term(expr, var);
        match expr {
            Expr::Add(..) | Expr::Sub(..) => format!("{}+C", strip_constant(&result)),
            _ => result,
        }
    }

    /// Antiderivative without the constant of integration (cached).
    pub fn integrate_term(&self, expr: &Expr, var: &str) -> String {
        let key = cache_key(expr, var);
        if let Some(cached) = self.cached_integral(&key) {
            return cached;
        }
        let result = self.integrate_uncached(expr, var);
        self.store_integral(key, result.clone());
        result
    }

    fn integrate_uncached(&self, expr: &Expr, var: &str) -> String {
        if !expr.contains_variable(var) {
            // ∫ k dx = k*x
            if expr.is_one() {
                return var.to_string();
            }
            return (expr.clone() * x_of(var)).to_string();
        }
        if matches!(
            expr,
            Expr::Div(..) | Expr::Sqrt(_) | Expr::Pow(..) | Expr::sin(_) | Expr::cos(_)
        ) {
            if let Some((name, result)) = detect(INTEGRAL_PATTERNS, expr, var) {
                debug!("∫ {} d{} by pattern {}", expr, var, name);
                return result;
            }
        }
        match expr {
            Expr::Var(_) => (x_of(var).pow(2.0) / Expr::Const(2.0)).to_string(),
            Expr::Add(lhs, rhs) => {
                let (l, r) = self.join(
                    expr,
                    || self.integrate_term(lhs, var),
                    || self.integrate_term(rhs, var),
                );
                sum_strings(strip_constant(&l), strip_constant(&r))
            }
            Expr::Sub(lhs, rhs) => {
                let (l, r) = self.join(
                    expr,
                    || self.integrate_term(lhs, var),
                    || self.integrate_term(rhs, var),
                );
                difference_strings(strip_constant(&l), strip_constant(&r))
            }
            Expr::Mul(..) => self.integrate_product(expr, var),
            Expr::Div(num, den) => self.integrate_quotient(expr, num, den, var),
            Expr::Pow(base, n) => self.integrate_power(expr, base, *n, var),
            Expr::Exp(u) => match u.linear_slope(var) {
                // ∫ e^(a*x+b) dx = e^(a*x+b)/a
                Some(a) => divide_by_slope(expr.clone(), a).to_string(),
                None => unresolved(expr),
            },
            Expr::Ln(u) => match u.linear_slope(var) {
                // ∫ ln(u) dx = (u*ln(u) - u)/a
                Some(a) => {
                    let u = u.as_ref().clone();
                    divide_by_slope(u.clone() * u.clone().ln() - u, a).to_string()
                }
                None => unresolved(expr),
            },
            Expr::Log(u) => match u.linear_slope(var) {
                // ∫ log(u) dx = (u*ln(u) - u)/(a*ln(10))
                Some(a) => {
                    let u = u.as_ref().clone();
                    let ln10 = Expr::Const(10.0).ln();
                    let denominator = if a == 1.0 { ln10 } else { Expr::Const(a) * ln10 };
                    ((u.clone() * u.clone().ln() - u) / denominator).to_string()
                }
                None => unresolved(expr),
            },
            Expr::sin(u) => match u.linear_slope(var) {
                Some(a) => divide_by_slope(-Expr::cos(u.clone()), a).to_string(),
                None => unresolved(expr),
            },
            Expr::cos(u) => match u.linear_slope(var) {
                Some(a) => divide_by_slope(Expr::sin(u.clone()), a).to_string(),
                None => unresolved(expr),
            },
            Expr::tan(u) => match u.linear_slope(var) {
                Some(a) => divide_by_slope(-Expr::cos(u.clone()).ln_abs(), a).to_string(),
                None => unresolved(expr),
            },
            Expr::Sqrt(u) => match u.linear_slope(var) {
                // ∫ sqrt(u) dx = 2*u^1.5/(3a)
                Some(a) => {
                    let power = Expr::Const(2.0) * u.as_ref().clone().pow(1.5);
                    (power / Expr::Const(3.0 * a)).to_string()
                }
                None => unresolved(expr),
            },
            Expr::Abs(u) if u.is_var(var) => {
                // ∫ |x| dx = x*|x|/2
                (x_of(var) * expr.clone() / Expr::Const(2.0)).to_string()
            }
            Expr::arctan(u) if u.is_var(var) => {
                // ∫ arctan(x) dx = x*arctan(x) - ln(1+x^2)/2
                let x = x_of(var);
                let log = (Expr::Const(1.0) + x.clone().pow(2.0)).ln();
                (x * expr.clone() - log / Expr::Const(2.0)).to_string()
            }
            Expr::arcsin(u) if u.is_var(var) => {
                // ∫ arcsin(x) dx = x*arcsin(x) + sqrt(1-x^2)
                let x = x_of(var);
                let root = Expr::Sqrt((Expr::Const(1.0) - x.clone().pow(2.0)).boxed());
                (x * expr.clone() + root).to_string()
            }
            _ => unresolved(expr),
        }
    }

    fn integrate_product(&self, expr: &Expr, var: &str) -> String {
        // variable-free factors anywhere in the product are pulled out
        if let Some((constant, rest)) = split_constant_factors(expr, var) {
            let inner = self.integrate_term(&rest, var);
            return scale_by(&constant, &inner);
        }
        match detect(BY_PARTS_PATTERNS, expr, var) {
            Some((name, result)) => {
                debug!("∫ {} d{} by parts ({})", expr, var, name);
                result.to_string()
            }
            None => unresolved(expr),
        }
    }

    fn integrate_quotient(&self, expr: &Expr, num: &Expr, den: &Expr, var: &str) -> String {
        if !den.contains_variable(var) {
            return quotient_string(&self.integrate_term(num, var), den);
        }
        let constant_numerator = !num.contains_variable(var);
        // k/u^n = k*u^(-n) for a linear u
        if let Expr::Pow(base, n) = den {
            if constant_numerator && base.linear_slope(var).is_some() {
                let inner = self.integrate_term(&Expr::Pow(base.clone(), -n), var);
                return scale_by(num, &inner);
            }
        }
        // ∫ c*f'/f dx = c*ln|f|
        let derivative = self.differentiate(den, var);
        match proportionality(num, &derivative) {
            Some(c) if c.is_finite() && c != 0.0 => {
                let log = den.clone().ln_abs();
                let result = if c == 1.0 { log } else { Expr::Const(c) * log };
                return result.to_string();
            }
            _ => {}
        }
        // k/f = k * (1/f)
        if constant_numerator && !num.is_one() {
            let reciprocal = Expr::Const(1.0) / den.clone();
            let inner = self.integrate_term(&reciprocal, var);
            if !is_unresolved(&inner) {
                return scale_by(num, &inner);
            }
        }
        unresolved(expr)
    }

    fn integrate_power(&self, expr: &Expr, base: &Expr, n: f64, var: &str) -> String {
        // u^0 = 1
        if n == 0.0 {
            return var.to_string();
        }
        if let Some(a) = base.linear_slope(var) {
            let base = base.clone();
            // ∫ u^-1 dx = ln|u|/a, ∫ u^n dx = u^(n+1)/((n+1)*a)
            let result = if n == -1.0 {
                divide_by_slope(base.ln_abs(), a)
            } else {
                base.pow(n + 1.0) / Expr::Const((n + 1.0) * a)
            };
            return result.to_string();
        }
        match (base, n) {
            (Expr::sin(u) | Expr::cos(u), n) if n == 2.0 => match u.linear_slope(var) {
                // ∫ sin(u)^2 dx = x/2 - sin(2u)/(4a), ∫ cos(u)^2 dx = x/2 + sin(2u)/(4a)
                Some(a) => {
                    let half = x_of(var) / Expr::Const(2.0);
                    let double = Expr::sin((Expr::Const(2.0) * u.as_ref().clone()).boxed())
                        / Expr::Const(4.0 * a);
                    match base {
                        Expr::sin(_) => (half - double).to_string(),
                        _ => (half + double).to_string(),
                    }
                }
                None => unresolved(expr),
            },
            (Expr::sin(u), n) if n == 3.0 => match u.linear_slope(var) {
                // ∫ sin(u)^3 dx = (cos(u)^3/3 - cos(u))/a
                Some(a) => {
                    let cos = Expr::cos(u.clone());
                    let result = cos.clone().pow(3.0) / Expr::Const(3.0) - cos;
                    divide_by_slope(result, a).to_string()
                }
                None => unresolved(expr),
            },
            (Expr::cos(u), n) if n == 3.0 => match u.linear_slope(var) {
                // ∫ cos(u)^3 dx = (sin(u) - sin(u)^3/3)/a
                Some(a) => {
                    let sin = Expr::sin(u.clone());
                    let result = sin.clone() - sin.pow(3.0) / Expr::Const(3.0);
                    divide_by_slope(result, a).to_string()
                }
                None => unresolved(expr),
            },
            (Expr::Exp(u), _) => match u.linear_slope(var) {
                // (e^u)^n = e^(n*u)
                Some(a) => {
                    let exponent = Expr::Const(n) * u.as_ref().clone();
                    (exponent.exp() / Expr::Const(n * a)).to_string()
                }
                None => unresolved(expr),
            },
            _ => unresolved(expr),
        }
    }

    /// Short name of the rule the engine applies to `expr`, used for derivation steps.
    pub fn integration_rule(&self, expr: &Expr, var: &str) -> String {
        if !expr.contains_variable(var) {
            return "constant".to_string();
        }
        if matches!(
            expr,
            Expr::Div(..) | Expr::Sqrt(_) | Expr::Pow(..) | Expr::sin(_) | Expr::cos(_)
        ) {
            if let Some((name, _)) = detect(INTEGRAL_PATTERNS, expr, var) {
                return format!("table ({})", name);
            }
        }
        let rule = match expr {
            Expr::Var(_) => "power rule",
            Expr::Add(..) => "sum rule",
            Expr::Sub(..) => "difference rule",
            Expr::Mul(..) if split_constant_factors(expr, var).is_some() => "constant factor",
            Expr::Mul(..) => "integration by parts",
            Expr::Div(_, den) if !den.contains_variable(var) => "constant denominator",
            Expr::Pow(_, n) if *n == 0.0 => "constant",
            Expr::Div(..) => "logarithmic derivative",
            Expr::Pow(base, _) if base.is_var(var) => "power rule",
            _ => "substitution",
        };
        rule.to_string()
    }
}

impl Expr {
    /// Indefinite integral through the shared engine; see [`CalculusEngine::integrate`].
    pub fn integrate(&self, var: &str) -> String {
        CalculusEngine::global().integrate(self, var)
    }

    /// Gauss-Legendre quadrature of the expression over `[lower, upper]`.
    pub fn quadrature(
        &self,
        var: &str,
        lower: f64,
        upper: f64,
        degree: usize,
    ) -> Result<f64, EvaluationError> {
        let quad = GaussLegendre::new(degree).map_err(|e| {
            EvaluationError::Quadrature(format!(
                "Failed to create Gauss-Legendre quadrature: {:?}",
                e
            ))
        })?;
        let f = self.lambdify1D(var);
        let result = quad.integrate(lower, upper, &f);
        if result.is_finite() {
            Ok(result)
        } else {
            Err(EvaluationError::Quadrature(format!(
                "{} is not integrable on [{}, {}]",
                self, lower, upper
            )))
        }
    }
}
