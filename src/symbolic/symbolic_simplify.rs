//! # Symbolic Expression Simplification Module
//!
//! Light algebraic clean-up used where two terms have to be compared structurally
//! (logarithmic-derivative detection in the integral engine) and by tests that check
//! generated formulas.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: arithmetic on two numeric constants is evaluated
//! 2. **Algebraic Identities**: x + 0 = x, x * 1 = x, x * 0 = 0, x^1 = x, x^0 = 1
//! 3. **Sign Normalization**: a + (-b) = a - b, a - (-b) = a + b, --a = a
//! 4. **Constant Gathering**: numeric factors move to the left and merge, 2*(3*x) = 6*x
//!
//! Functions of a constant are folded only when the value is an integer (`sqrt(4)`,
//! `ln(1)`), so `sqrt(2)` and `π` stay exact.

use crate::symbolic::symbolic_engine::Expr;

fn fold_if_integer(expr: Expr) -> Expr {
    match expr.eval_constant() {
        Ok(value) if value.fract() == 0.0 => Expr::Const(value),
        _ => expr,
    }
}

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Simplifies the expression bottom-up; the result is numerically equal wherever
    /// the input is defined.
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => simplify_add(lhs.simplify(), rhs.simplify()),
            Expr::Sub(lhs, rhs) => simplify_sub(lhs.simplify(), rhs.simplify()),
            Expr::Mul(lhs, rhs) => simplify_mul(lhs.simplify(), rhs.simplify()),
            Expr::Div(lhs, rhs) => simplify_div(lhs.simplify(), rhs.simplify()),
            Expr::Pow(base, exp) => simplify_pow(base.simplify(), *exp),
            Expr::Exp(arg) => simplify_unary(arg, Expr::Exp),
            Expr::Ln(arg) => simplify_unary(arg, Expr::Ln),
            Expr::Log(arg) => simplify_unary(arg, Expr::Log),
            Expr::Sqrt(arg) => simplify_unary(arg, Expr::Sqrt),
            Expr::Abs(arg) => simplify_unary(arg, Expr::Abs),
            Expr::sin(arg) => simplify_unary(arg, Expr::sin),
            Expr::cos(arg) => simplify_unary(arg, Expr::cos),
            Expr::tan(arg) => simplify_unary(arg, Expr::tan),
            Expr::arcsin(arg) => simplify_unary(arg, Expr::arcsin),
            Expr::arctan(arg) => simplify_unary(arg, Expr::arctan),
        }
    }

    /// Simplifies and renders in one go.
    pub fn simplified_string(&self) -> String {
        self.simplify().to_string()
    }
}

fn simplify_unary(arg: &Expr, rebuild: fn(Box<Expr>) -> Expr) -> Expr {
    let arg = arg.simplify();
    let is_const = arg.as_const().is_some();
    let rebuilt = rebuild(arg.boxed());
    if is_const {
        fold_if_integer(rebuilt)
    } else {
        rebuilt
    }
}

fn simplify_add(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
        _ if lhs.is_zero() => rhs,
        _ if rhs.is_zero() => lhs,
        // a + (-b) = a - b
        (_, Expr::Const(b)) if *b < 0.0 => lhs - Expr::Const(-b),
        (_, Expr::Mul(factor, inner)) if factor.is_minus_one() => lhs - *inner.clone(),
        _ => lhs + rhs,
    }
}

fn simplify_sub(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
        _ if rhs.is_zero() => lhs,
        _ if lhs.is_zero() => -rhs,
        _ if lhs == rhs => Expr::Const(0.0),
        // a - (-b) = a + b
        (_, Expr::Const(b)) if *b < 0.0 => lhs + Expr::Const(-b),
        (_, Expr::Mul(factor, inner)) if factor.is_minus_one() => lhs + *inner.clone(),
        _ => lhs - rhs,
    }
}

fn simplify_mul(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
        _ if lhs.is_zero() || rhs.is_zero() => Expr::Const(0.0),
        _ if lhs.is_one() => rhs,
        _ if rhs.is_one() => lhs,
        _ if lhs.is_minus_one() => -rhs,
        _ if rhs.is_minus_one() => -lhs,
        // x*c = c*x
        (_, Expr::Const(_)) => simplify_mul(rhs, lhs),
        // a*(b*x) = (a*b)*x
        (Expr::Const(a), Expr::Mul(inner_factor, inner)) if inner_factor.as_const().is_some() => {
            let product = a * inner_factor.as_const().unwrap_or(1.0);
            simplify_mul(Expr::Const(product), *inner.clone())
        }
        _ => lhs * rhs,
    }
}

fn simplify_div(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b),
        _ if rhs.is_one() => lhs,
        _ if lhs.is_zero() && !rhs.is_zero() => Expr::Const(0.0),
        _ if lhs == rhs && !rhs.is_zero() => Expr::Const(1.0),
        _ => lhs / rhs,
    }
}

fn simplify_pow(base: Expr, exp: f64) -> Expr {
    if exp == 0.0 {
        return Expr::Const(1.0);
    }
    if exp == 1.0 {
        return base;
    }
    match base {
        Expr::Const(b) => {
            let folded = Expr::Const(b).pow(exp);
            match folded.eval_constant() {
                Ok(value) => Expr::Const(value),
                Err(_) => folded,
            }
        }
        // (b^m)^n = b^(m*n) for integer exponents
        Expr::Pow(inner, m) if m.fract() == 0.0 && exp.fract() == 0.0 => (*inner).pow(m * exp),
        other => other.pow(exp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_constant_folding() {
        let expr = Expr::Const(2.0) * Expr::Const(3.0) + Expr::Const(1.0);
        assert_eq!(expr.simplify(), Expr::Const(7.0));
        let expr = Expr::Const(2.0).pow(3.0);
        assert_eq!(expr.simplify(), Expr::Const(8.0));
        assert_eq!(Expr::Sqrt(Expr::Const(4.0).boxed()).simplify(), Expr::Const(2.0));
        let root_two = Expr::Sqrt(Expr::Const(2.0).boxed());
        assert_eq!(root_two.simplify(), root_two);
    }

    #[test]
    fn test_identities() {
        assert_eq!((x() + Expr::Const(0.0)).simplify(), x());
        assert_eq!((Expr::Const(1.0) * x()).simplify(), x());
        assert_eq!((Expr::Const(0.0) * x()).simplify(), Expr::Const(0.0));
        assert_eq!(x().pow(1.0).simplify(), x());
        assert_eq!(x().pow(0.0).simplify(), Expr::Const(1.0));
        assert_eq!((x() / Expr::Const(1.0)).simplify(), x());
        assert_eq!((x() - x()).simplify(), Expr::Const(0.0));
    }

    #[test]
    fn test_sign_normalization() {
        assert_eq!((x() + Expr::Const(-4.0)).simplify(), x() - Expr::Const(4.0));
        assert_eq!((x() - (-x())).simplify(), x() + x());
        assert_eq!((Expr::Const(0.0) - x()).simplify(), -x());
    }

    #[test]
    fn test_constant_gathering() {
        let expr = x() * Expr::Const(2.0);
        assert_eq!(expr.simplify(), Expr::Const(2.0) * x());
        let expr = Expr::Const(2.0) * (Expr::Const(3.0) * x());
        assert_eq!(expr.simplify(), Expr::Const(6.0) * x());
        assert_eq!(expr.simplified_string(), "6*x");
    }

    #[test]
    fn test_nested_powers() {
        assert_eq!(x().pow(2.0).pow(3.0).simplify(), x().pow(6.0));
        // (x^2)^0.5 is |x|, not x
        assert_eq!(x().pow(2.0).pow(0.5).simplify(), x().pow(2.0).pow(0.5));
    }
}
