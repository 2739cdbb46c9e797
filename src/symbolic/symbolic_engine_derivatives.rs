//! # Symbolic Engine Derivatives Module
//!
//! Analytical differentiation of a term with respect to one variable.
//!
//! ## Order of evaluation
//!
//! 1. the derivative cache of the engine (key: canonical string + variable)
//! 2. the derivative registry (`e^x`, `sin(x)`, `x^n`, `sin(u)*cos(u)`, `x/(x^2+1)` ...)
//! 3. the recursive rules:
//!    - Power rule: d/dx(u^n) = n*u^(n-1)*u'
//!    - Product rule: d/dx(f*g) = f'*g + f*g', numeric factors folded
//!    - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
//!    - Chain rule: d/dx(f(u)) = f'(u)*u', the factor dropped when u' = 1
//!
//! Sums, differences and products of more than `complexity_threshold` nodes have their
//! two sides differentiated in parallel. Differentiation is total: every term has a
//! derivative, so nothing here returns a `Result`.

use crate::symbolic::symbolic_cache::cache_key;
use crate::symbolic::symbolic_context::CalculusEngine;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_patterns::{DERIVATIVE_PATTERNS, detect};
use log::debug;

/// `c * d` with numeric folding: `3 * (2*x)` is `6*x`, `1 * d` is `d`
fn scale(c: f64, d: Expr) -> Expr {
    if c == 0.0 || d.is_zero() {
        return Expr::Const(0.0);
    }
    if c == 1.0 {
        return d;
    }
    match d {
        Expr::Const(k) => Expr::Const(c * k),
        Expr::Mul(lhs, rhs) if lhs.as_const().is_some() => {
            let k = c * lhs.as_const().unwrap_or(1.0);
            if k == 1.0 {
                *rhs
            } else if k == -1.0 {
                -*rhs
            } else {
                Expr::Const(k) * *rhs
            }
        }
        other => Expr::Const(c) * other,
    }
}

/// `outer * du`; the chain factor is dropped when it is 1 and folded when numeric
fn chain(outer: Expr, du: Expr) -> Expr {
    if du.is_zero() {
        return Expr::Const(0.0);
    }
    if outer.is_one() {
        return du;
    }
    match du.as_const() {
        Some(k) => scale(k, outer),
        None => outer * du,
    }
}

/// `f * g` dropping unit factors
fn product(f: Expr, g: Expr) -> Expr {
    if f.is_zero() || g.is_zero() {
        Expr::Const(0.0)
    } else if f.is_one() {
        g
    } else if g.is_one() {
        f
    } else if let Some(k) = f.as_const() {
        scale(k, g)
    } else if let Some(k) = g.as_const() {
        scale(k, f)
    } else {
        f * g
    }
}

impl CalculusEngine {
    /// DIFFERENTIATION

    /// Derivative of `expr` with respect to `var`. Other variables are treated as constants.
    pub fn differentiate(&self, expr: &Expr, var: &str) -> Expr {
        let key = cache_key(expr, var);
        if let Some(cached) = self.cached_derivative(&key) {
            return cached;
        }
        let result = match detect(DERIVATIVE_PATTERNS, expr, var) {
            Some((name, derivative)) => {
                debug!("d/d{} {} by pattern {}", var, expr, name);
                derivative
            }
            None => self.differentiate_by_rules(expr, var),
        };
        self.store_derivative(key, result.clone());
        result
    }

    /// n-th derivative; `n = 0` returns the term itself
    pub fn differentiate_n(&self, expr: &Expr, var: &str, n: usize) -> Expr {
        (0..n).fold(expr.clone(), |acc, _| self.differentiate(&acc, var))
    }

    fn differentiate_by_rules(&self, expr: &Expr, var: &str) -> Expr {
        match expr {
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Add(lhs, rhs) => {
                let (dl, dr) = self.join(
                    expr,
                    || self.differentiate(lhs, var),
                    || self.differentiate(rhs, var),
                );
                match (dl.is_zero(), dr.is_zero()) {
                    (true, true) => Expr::Const(0.0),
                    (true, false) => dr,
                    (false, true) => dl,
                    (false, false) => dl + dr,
                }
            }
            Expr::Sub(lhs, rhs) => {
                let (dl, dr) = self.join(
                    expr,
                    || self.differentiate(lhs, var),
                    || self.differentiate(rhs, var),
                );
                match (dl.is_zero(), dr.is_zero()) {
                    (true, true) => Expr::Const(0.0),
                    (true, false) => -dr,
                    (false, true) => dl,
                    (false, false) => dl - dr,
                }
            }
            Expr::Mul(lhs, rhs) => {
                // numeric factor: (c*g)' = c*g'
                if let Some(c) = lhs.as_const() {
                    return scale(c, self.differentiate(rhs, var));
                }
                if let Some(c) = rhs.as_const() {
                    return scale(c, self.differentiate(lhs, var));
                }
                let (dl, dr) = self.join(
                    expr,
                    || self.differentiate(lhs, var),
                    || self.differentiate(rhs, var),
                );
                let first = product(dl, *rhs.clone());
                let second = product(*lhs.clone(), dr);
                match (first.is_zero(), second.is_zero()) {
                    (true, true) => Expr::Const(0.0),
                    (true, false) => second,
                    (false, true) => first,
                    (false, false) => first + second,
                }
            }
            Expr::Div(lhs, rhs) => {
                let dl = self.differentiate(lhs, var);
                let dr = self.differentiate(rhs, var);
                match (dl.is_zero(), dr.is_zero()) {
                    (true, true) => Expr::Const(0.0),
                    // (f/c)' = f'/c
                    (false, true) => match rhs.as_const() {
                        Some(c) if c != 0.0 => scale(1.0 / c, dl),
                        _ => dl / *rhs.clone(),
                    },
                    // (c/g)' = -c*g'/g^2
                    (true, false) => {
                        -(product(*lhs.clone(), dr) / rhs.as_ref().clone().pow(2.0))
                    }
                    (false, false) => {
                        let numerator =
                            product(dl, *rhs.clone()) - product(*lhs.clone(), dr);
                        numerator / rhs.as_ref().clone().pow(2.0)
                    }
                }
            }
            Expr::Pow(base, n) => {
                if *n == 0.0 {
                    return Expr::Const(0.0);
                }
                let du = self.differentiate(base, var);
                if du.is_zero() {
                    return Expr::Const(0.0);
                }
                let reduced = if *n - 1.0 == 1.0 {
                    base.as_ref().clone()
                } else if *n - 1.0 == 0.0 {
                    Expr::Const(1.0)
                } else {
                    base.as_ref().clone().pow(*n - 1.0)
                };
                chain(scale(*n, reduced), du)
            }
            Expr::Exp(u) => chain(expr.clone(), self.differentiate(u, var)),
            Expr::Ln(u) => match u.as_ref() {
                // ln(x^n)' = n/x
                Expr::Pow(base, n) if base.is_var(var) => {
                    Expr::Const(*n) / base.as_ref().clone()
                }
                _ => {
                    let du = self.differentiate(u, var);
                    if du.is_zero() {
                        Expr::Const(0.0)
                    } else {
                        du / u.as_ref().clone()
                    }
                }
            },
            Expr::Log(u) => {
                let du = self.differentiate(u, var);
                if du.is_zero() {
                    return Expr::Const(0.0);
                }
                du / (u.as_ref().clone() * Expr::Const(10.0).ln())
            }
            Expr::sin(u) => chain(Expr::cos(u.clone()), self.differentiate(u, var)),
            Expr::cos(u) => chain(-Expr::sin(u.clone()), self.differentiate(u, var)),
            Expr::tan(u) => {
                let du = self.differentiate(u, var);
                if du.is_zero() {
                    return Expr::Const(0.0);
                }
                du / Expr::cos(u.clone()).pow(2.0)
            }
            Expr::Sqrt(u) => {
                let du = self.differentiate(u, var);
                if du.is_zero() {
                    return Expr::Const(0.0);
                }
                du / (Expr::Const(2.0) * Expr::Sqrt(u.clone()))
            }
            Expr::arcsin(u) => {
                let du = self.differentiate(u, var);
                if du.is_zero() {
                    return Expr::Const(0.0);
                }
                let radicand = Expr::Const(1.0) - u.as_ref().clone().pow(2.0);
                du / Expr::Sqrt(radicand.boxed())
            }
            Expr::arctan(u) => {
                let du = self.differentiate(u, var);
                if du.is_zero() {
                    return Expr::Const(0.0);
                }
                du / (Expr::Const(1.0) + u.as_ref().clone().pow(2.0))
            }
            Expr::Abs(u) => chain(
                u.as_ref().clone() / Expr::Abs(u.clone()),
                self.differentiate(u, var),
            ),
        }
    }
}

impl Expr {
    /// Derivative through the shared engine (cached).
    pub fn diff(&self, var: &str) -> Expr {
        CalculusEngine::global().differentiate(self, var)
    }
}
