//! # Pattern registries
//!
//! Ordered tables of known closed forms consulted before the generic recursive rules
//! of the derivative and integral engines.
//!
//! Every [`Pattern`] carries:
//! - a structural matcher working on the tree in its canonical shape (`x^2+4`, `4-x^2`)
//! - optionally a textual matcher working on the canonical string; it exists only for
//!   patterns whose commuted spellings (`4+x^2`, `-x^2+4`) are worth catching
//! - a builder producing the result; a builder that fails (e.g. `sqrt` of a negative
//!   coefficient) makes [`detect`] move on to the next pattern
//!
//! [`detect`] makes a single pass in table order and renders the canonical string at
//! most once, and only if a textual matcher is reached.
use crate::symbolic::symbolic_engine::{Expr, pi};
use crate::symbolic::symbolic_errors::EvaluationError;
use crate::symbolic::utils::format_number;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

pub type StructuralMatcher = fn(&Expr, &str) -> bool;
pub type TextualMatcher = fn(&str, &str) -> bool;
pub type Builder<R> = fn(&Expr, &str) -> Result<R, EvaluationError>;

/// One entry of a registry.
pub struct Pattern<R> {
    pub name: &'static str,
    pub structural: StructuralMatcher,
    pub textual: Option<TextualMatcher>,
    pub build: Builder<R>,
}

/// First pattern of `patterns` that matches `expr` and builds successfully.
pub fn detect<R>(patterns: &[Pattern<R>], expr: &Expr, var: &str) -> Option<(&'static str, R)> {
    let mut canonical: Option<String> = None;
    for pattern in patterns {
        let matched = (pattern.structural)(expr, var)
            || pattern.textual.is_some_and(|textual| {
                let text = canonical.get_or_insert_with(|| expr.to_string());
                textual(text, var)
            });
        if !matched {
            continue;
        }
        match (pattern.build)(expr, var) {
            Ok(result) => return Some((pattern.name, result)),
            Err(e) => debug!("pattern {} skipped for {}: {}", pattern.name, expr, e),
        }
    }
    None
}

//___________________________________SHAPE HELPERS____________________________________

fn var_expr(var: &str) -> Expr {
    Expr::Var(var.to_string())
}

/// `x^2` or `x*x`
fn is_square_of_var(expr: &Expr, var: &str) -> bool {
    match expr {
        Expr::Pow(base, n) => *n == 2.0 && base.is_var(var),
        Expr::Mul(lhs, rhs) => lhs.is_var(var) && rhs.is_var(var),
        _ => false,
    }
}

fn is_negated_square(expr: &Expr, var: &str) -> bool {
    matches!(expr, Expr::Mul(factor, inner) if factor.is_minus_one() && is_square_of_var(inner, var))
}

/// `c` of `x^2 + c` in any of its spellings: `x^2+c`, `c+x^2`, `x^2-k` (c = -k)
pub fn square_plus_constant(expr: &Expr, var: &str) -> Option<f64> {
    match expr {
        Expr::Add(lhs, rhs) if is_square_of_var(lhs, var) => rhs.as_const(),
        Expr::Add(lhs, rhs) if is_square_of_var(rhs, var) => lhs.as_const(),
        Expr::Sub(lhs, rhs) if is_square_of_var(lhs, var) => rhs.as_const().map(|c| -c),
        _ => None,
    }
}

/// `c` of `c - x^2` in any of its spellings: `c-x^2`, `-x^2+c`, `c+(-x^2)`
pub fn constant_minus_square(expr: &Expr, var: &str) -> Option<f64> {
    match expr {
        Expr::Sub(lhs, rhs) if is_square_of_var(rhs, var) => lhs.as_const(),
        Expr::Add(lhs, rhs) if is_negated_square(lhs, var) => rhs.as_const(),
        Expr::Add(lhs, rhs) if is_negated_square(rhs, var) => lhs.as_const(),
        _ => None,
    }
}

// canonical shapes only: `x^2+c` / `x^2-c` and `c-x^2`
fn canonical_square_plus_constant(expr: &Expr, var: &str) -> Option<f64> {
    match expr {
        Expr::Add(lhs, rhs) if is_square_of_var(lhs, var) => rhs.as_const(),
        Expr::Sub(lhs, rhs) if is_square_of_var(lhs, var) => rhs.as_const().map(|c| -c),
        _ => None,
    }
}

fn canonical_constant_minus_square(expr: &Expr, var: &str) -> Option<f64> {
    match expr {
        Expr::Sub(lhs, rhs) if is_square_of_var(rhs, var) => lhs.as_const(),
        _ => None,
    }
}

/// `sqrt(c)` as a term: a plain number when the root is an integer
fn root_of(c: f64) -> Result<Expr, EvaluationError> {
    if c <= 0.0 {
        return Err(EvaluationError::Domain(format!(
            "square root of non-positive coefficient {}",
            format_number(c)
        )));
    }
    let root = c.sqrt();
    if root.fract() == 0.0 {
        Ok(Expr::Const(root))
    } else {
        Ok(Expr::Sqrt(Expr::Const(c).boxed()))
    }
}

/// `1/(k*root)` with `root = sqrt(c)`
fn reciprocal_of_scaled_root(k: f64, c: f64) -> Result<Expr, EvaluationError> {
    let root = root_of(c)?;
    let denominator = match root {
        Expr::Const(r) => Expr::Const(k * r),
        other if k == 1.0 => other,
        other => Expr::Const(k) * other,
    };
    Ok(Expr::Const(1.0) / denominator)
}

/// the term a `Div(1, _)` divides by
fn unit_denominator(expr: &Expr) -> Option<&Expr> {
    match expr {
        Expr::Div(num, den) if num.is_one() => Some(den.as_ref()),
        _ => None,
    }
}

fn sqrt_argument(expr: &Expr) -> Option<&Expr> {
    match expr {
        Expr::Sqrt(arg) => Some(arg.as_ref()),
        Expr::Pow(base, n) if *n == 0.5 => Some(base.as_ref()),
        _ => None,
    }
}

fn not_matched(name: &str) -> EvaluationError {
    EvaluationError::Domain(format!("{} does not apply", name))
}

//___________________________________TEXTUAL MATCHERS____________________________________
// each regex names the variable `v` so the capture can be compared with the bound variable

fn textual_match(re: &Regex, text: &str, var: &str) -> bool {
    re.captures(text)
        .is_some_and(|caps| caps.name("v").is_some_and(|v| v.as_str() == var))
}

static ONE_PLUS_SQUARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1/\(1\+(?P<v>[A-Za-z]+)\^2\)$").unwrap());
static CONST_PLUS_SQUARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1/\(\d+(\.\d+)?\+(?P<v>[A-Za-z]+)\^2\)$").unwrap());
static NEG_SQUARE_PLUS_CONST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1/\(-(?P<v>[A-Za-z]+)\^2\+\d+(\.\d+)?\)$").unwrap());
static INV_SQRT_NEG_SQUARE_PLUS_ONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1/sqrt\(-(?P<v>[A-Za-z]+)\^2\+1\)$").unwrap());
static INV_SQRT_NEG_SQUARE_PLUS_CONST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1/sqrt\(-(?P<v>[A-Za-z]+)\^2\+\d+(\.\d+)?\)$").unwrap());
static INV_SQRT_CONST_PLUS_SQUARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1/sqrt\(\d+(\.\d+)?\+(?P<v>[A-Za-z]+)\^2\)$").unwrap());
static SQRT_NEG_SQUARE_PLUS_CONST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sqrt\(-(?P<v>[A-Za-z]+)\^2\+\d+(\.\d+)?\)$").unwrap());
static SQRT_CONST_PLUS_SQUARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sqrt\(\d+(\.\d+)?\+(?P<v>[A-Za-z]+)\^2\)$").unwrap());

//___________________________________DERIVATIVE REGISTRY____________________________________

/// d/dx x^n for a numeric n
pub fn power_of_variable(n: f64, var: &str) -> Expr {
    let x = var_expr(var);
    if n == 0.0 {
        Expr::Const(0.0)
    } else if n == 1.0 {
        Expr::Const(1.0)
    } else if n == 0.5 {
        Expr::Const(1.0) / (Expr::Const(2.0) * Expr::Sqrt(x.boxed()))
    } else if n == 2.0 {
        Expr::Const(2.0) * x
    } else {
        Expr::Const(n) * x.pow(n - 1.0)
    }
}

fn sin_cos_arguments<'a>(expr: &'a Expr) -> Option<&'a Expr> {
    match expr {
        Expr::Mul(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
            (Expr::sin(u), Expr::cos(v)) | (Expr::cos(u), Expr::sin(v)) if u == v => {
                Some(u.as_ref())
            }
            _ => None,
        },
        _ => None,
    }
}

fn d_sin_cos_product(expr: &Expr, var: &str) -> Result<Expr, EvaluationError> {
    let u = sin_cos_arguments(expr).ok_or_else(|| not_matched("sin_cos_product"))?;
    let slope = u
        .linear_slope(var)
        .ok_or_else(|| not_matched("sin_cos_product"))?;
    let u = u.clone();
    let double_angle = Expr::cos(u.clone().boxed()).pow(2.0) - Expr::sin(u.boxed()).pow(2.0);
    if slope == 1.0 {
        Ok(double_angle)
    } else {
        Ok(Expr::Const(slope) * double_angle)
    }
}

fn is_x_over_square_plus_one(expr: &Expr, var: &str) -> bool {
    match expr {
        Expr::Div(num, den) => {
            num.is_var(var) && canonical_square_plus_constant(den, var) == Some(1.0)
        }
        _ => false,
    }
}

fn d_x_over_square_plus_one(_expr: &Expr, var: &str) -> Result<Expr, EvaluationError> {
    let square = var_expr(var).pow(2.0);
    Ok((Expr::Const(1.0) - square.clone()) / (square + Expr::Const(1.0)).pow(2.0))
}

fn is_exp_of_var(expr: &Expr, var: &str) -> bool {
    matches!(expr, Expr::Exp(arg) if arg.is_var(var))
}

fn is_sin_of_var(expr: &Expr, var: &str) -> bool {
    matches!(expr, Expr::sin(arg) if arg.is_var(var))
}

fn is_cos_of_var(expr: &Expr, var: &str) -> bool {
    matches!(expr, Expr::cos(arg) if arg.is_var(var))
}

fn is_tan_of_var(expr: &Expr, var: &str) -> bool {
    matches!(expr, Expr::tan(arg) if arg.is_var(var))
}

fn is_ln_of_var(expr: &Expr, var: &str) -> bool {
    matches!(expr, Expr::Ln(arg) if arg.is_var(var))
}

fn is_sqrt_of_var(expr: &Expr, var: &str) -> bool {
    matches!(expr, Expr::Sqrt(arg) if arg.is_var(var))
}

fn is_power_of_var(expr: &Expr, var: &str) -> bool {
    matches!(expr, Expr::Pow(base, _) if base.is_var(var))
}

fn is_sin_cos_product(expr: &Expr, var: &str) -> bool {
    sin_cos_arguments(expr).is_some_and(|u| u.linear_slope(var).is_some())
}

pub static DERIVATIVE_PATTERNS: &[Pattern<Expr>] = &[
    Pattern {
        name: "sin_cos_product",
        structural: is_sin_cos_product,
        textual: None,
        build: d_sin_cos_product,
    },
    Pattern {
        name: "x_over_square_plus_one",
        structural: is_x_over_square_plus_one,
        textual: None,
        build: d_x_over_square_plus_one,
    },
    Pattern {
        name: "exp",
        structural: is_exp_of_var,
        textual: None,
        build: |_, var| Ok(var_expr(var).exp()),
    },
    Pattern {
        name: "sin",
        structural: is_sin_of_var,
        textual: None,
        build: |_, var| Ok(Expr::cos(var_expr(var).boxed())),
    },
    Pattern {
        name: "cos",
        structural: is_cos_of_var,
        textual: None,
        build: |_, var| Ok(-Expr::sin(var_expr(var).boxed())),
    },
    Pattern {
        name: "tan",
        structural: is_tan_of_var,
        textual: None,
        build: |_, var| Ok(Expr::Const(1.0) / Expr::cos(var_expr(var).boxed()).pow(2.0)),
    },
    Pattern {
        name: "ln",
        structural: is_ln_of_var,
        textual: None,
        build: |_, var| Ok(Expr::Const(1.0) / var_expr(var)),
    },
    Pattern {
        name: "sqrt",
        structural: is_sqrt_of_var,
        textual: None,
        build: |_, var| Ok(power_of_variable(0.5, var)),
    },
    Pattern {
        name: "power",
        structural: is_power_of_var,
        textual: None,
        build: |expr, var| match expr {
            Expr::Pow(_, n) => Ok(power_of_variable(*n, var)),
            _ => Err(not_matched("power")),
        },
    },
];

//___________________________________INTEGRAL REGISTRY____________________________________

fn is_exp_over_one_plus_exp(expr: &Expr, var: &str) -> bool {
    match expr {
        Expr::Div(num, den) => {
            is_exp_of_var(num, var)
                && matches!(den.as_ref(), Expr::Add(one, e) if one.is_one() && is_exp_of_var(e, var))
        }
        _ => false,
    }
}

fn i_exp_over_one_plus_exp(_expr: &Expr, var: &str) -> Result<String, EvaluationError> {
    Ok((Expr::Const(1.0) + var_expr(var).exp()).ln().to_string())
}

fn is_reciprocal(expr: &Expr, var: &str) -> bool {
    matches!(expr, Expr::Div(num, den) if den.is_var(var) && num.as_const().is_some_and(|k| k != 0.0))
}

fn i_reciprocal(expr: &Expr, var: &str) -> Result<String, EvaluationError> {
    let k = match expr {
        Expr::Div(num, _) => num.as_const(),
        _ => None,
    }
    .ok_or_else(|| not_matched("reciprocal"))?;
    let log = var_expr(var).ln_abs();
    let result = if k == 1.0 { log } else { Expr::Const(k) * log };
    Ok(result.to_string())
}

fn unit_over_square_offset(expr: &Expr, var: &str) -> Option<f64> {
    unit_denominator(expr).and_then(|den| square_plus_constant(den, var))
}

fn unit_over_constant_minus_square(expr: &Expr, var: &str) -> Option<f64> {
    unit_denominator(expr).and_then(|den| constant_minus_square(den, var))
}

fn is_inverse_square_difference(expr: &Expr, var: &str) -> bool {
    unit_denominator(expr)
        .and_then(|den| canonical_square_plus_constant(den, var))
        .is_some_and(|c| c < 0.0)
}

// 1/(x^2-a^2) = 1/(2a) ln|(x-a)/(x+a)|
fn i_inverse_square_difference(expr: &Expr, var: &str) -> Result<String, EvaluationError> {
    let c = unit_over_square_offset(expr, var).ok_or_else(|| not_matched("inverse_square_difference"))?;
    let a = root_of(-c)?;
    let x = var_expr(var);
    let ratio = (x.clone() - a.clone()) / (x + a);
    Ok((reciprocal_of_scaled_root(2.0, -c)? * ratio.ln_abs()).to_string())
}

fn is_arctan(expr: &Expr, var: &str) -> bool {
    unit_denominator(expr).and_then(|den| canonical_square_plus_constant(den, var)) == Some(1.0)
}

fn is_inverse_square_sum(expr: &Expr, var: &str) -> bool {
    unit_denominator(expr)
        .and_then(|den| canonical_square_plus_constant(den, var))
        .is_some_and(|c| c > 0.0)
}

// 1/(x^2+a^2) = 1/a arctan(x/a)
fn i_inverse_square_sum(expr: &Expr, var: &str) -> Result<String, EvaluationError> {
    let c = unit_over_square_offset(expr, var).ok_or_else(|| not_matched("inverse_square_sum"))?;
    if c == 1.0 {
        return Ok(Expr::arctan(var_expr(var).boxed()).to_string());
    }
    let a = root_of(c)?;
    let arctan = Expr::arctan((var_expr(var) / a).boxed());
    Ok((reciprocal_of_scaled_root(1.0, c)? * arctan).to_string())
}

fn is_inverse_constant_minus_square(expr: &Expr, var: &str) -> bool {
    unit_denominator(expr)
        .and_then(|den| canonical_constant_minus_square(den, var))
        .is_some_and(|c| c > 0.0)
}

// 1/(a^2-x^2) = 1/(2a) ln|(a+x)/(a-x)|
fn i_inverse_constant_minus_square(expr: &Expr, var: &str) -> Result<String, EvaluationError> {
    let c = unit_over_constant_minus_square(expr, var)
        .ok_or_else(|| not_matched("inverse_constant_minus_square"))?;
    let a = root_of(c)?;
    let x = var_expr(var);
    let ratio = (a.clone() + x.clone()) / (a - x);
    Ok((reciprocal_of_scaled_root(2.0, c)? * ratio.ln_abs()).to_string())
}

fn unit_over_sqrt(expr: &Expr) -> Option<&Expr> {
    unit_denominator(expr).and_then(sqrt_argument)
}

fn is_arcsin(expr: &Expr, var: &str) -> bool {
    unit_over_sqrt(expr).and_then(|rad| canonical_constant_minus_square(rad, var)) == Some(1.0)
}

fn is_arcsin_scaled(expr: &Expr, var: &str) -> bool {
    unit_over_sqrt(expr)
        .and_then(|rad| canonical_constant_minus_square(rad, var))
        .is_some_and(|c| c > 0.0)
}

// 1/sqrt(a^2-x^2) = arcsin(x/a)
fn i_arcsin(expr: &Expr, var: &str) -> Result<String, EvaluationError> {
    let c = unit_over_sqrt(expr)
        .and_then(|rad| constant_minus_square(rad, var))
        .ok_or_else(|| not_matched("arcsin"))?;
    let x = var_expr(var);
    let argument = if c == 1.0 { x } else { x / root_of(c)? };
    Ok(Expr::arcsin(argument.boxed()).to_string())
}

fn is_inverse_sqrt_square_offset(expr: &Expr, var: &str) -> bool {
    unit_over_sqrt(expr)
        .and_then(|rad| canonical_square_plus_constant(rad, var))
        .is_some_and(|c| c != 0.0)
}

// 1/sqrt(x^2±a) = ln|x+sqrt(x^2±a)|
fn i_inverse_sqrt_square_offset(expr: &Expr, var: &str) -> Result<String, EvaluationError> {
    let rad = unit_over_sqrt(expr).ok_or_else(|| not_matched("inverse_sqrt_square_offset"))?;
    match square_plus_constant(rad, var) {
        Some(c) if c != 0.0 => {
            let rad = var_expr(var).pow(2.0) + Expr::Const(c);
            Ok((var_expr(var) + Expr::Sqrt(rad.boxed())).ln_abs().to_string())
        }
        _ => Err(not_matched("inverse_sqrt_square_offset")),
    }
}

fn is_sqrt_constant_minus_square(expr: &Expr, var: &str) -> bool {
    sqrt_argument(expr)
        .and_then(|rad| canonical_constant_minus_square(rad, var))
        .is_some_and(|c| c > 0.0)
}

// sqrt(a^2-x^2) = x/2*sqrt(a^2-x^2) + a^2/2*arcsin(x/a)
fn i_sqrt_constant_minus_square(expr: &Expr, var: &str) -> Result<String, EvaluationError> {
    let c = sqrt_argument(expr)
        .and_then(|rad| constant_minus_square(rad, var))
        .ok_or_else(|| not_matched("sqrt_constant_minus_square"))?;
    let x = var_expr(var);
    let rad = Expr::Const(c) - x.clone().pow(2.0);
    let argument = if c == 1.0 {
        x.clone()
    } else {
        x.clone() / root_of(c)?
    };
    let first = (x / Expr::Const(2.0)) * Expr::Sqrt(rad.boxed());
    let second = Expr::Const(c / 2.0) * Expr::arcsin(argument.boxed());
    Ok((first + second).to_string())
}

fn is_sqrt_square_offset(expr: &Expr, var: &str) -> bool {
    sqrt_argument(expr)
        .and_then(|rad| canonical_square_plus_constant(rad, var))
        .is_some_and(|c| c != 0.0)
}

// sqrt(x^2±a) = x/2*sqrt(x^2±a) ± a/2*ln|x+sqrt(x^2±a)|
fn i_sqrt_square_offset(expr: &Expr, var: &str) -> Result<String, EvaluationError> {
    let c = sqrt_argument(expr)
        .and_then(|rad| square_plus_constant(rad, var))
        .filter(|c| *c != 0.0)
        .ok_or_else(|| not_matched("sqrt_square_offset"))?;
    let x = var_expr(var);
    let rad = if c > 0.0 {
        x.clone().pow(2.0) + Expr::Const(c)
    } else {
        x.clone().pow(2.0) - Expr::Const(-c)
    };
    let first = (x.clone() / Expr::Const(2.0)) * Expr::Sqrt(rad.clone().boxed());
    let log = (x + Expr::Sqrt(rad.boxed())).ln_abs();
    let combined = if c > 0.0 {
        first + Expr::Const(c / 2.0) * log
    } else {
        first - Expr::Const(-c / 2.0) * log
    };
    Ok(combined.to_string())
}

fn is_fresnel_sin(expr: &Expr, var: &str) -> bool {
    matches!(expr, Expr::sin(arg) if is_square_of_var(arg, var))
}

fn is_fresnel_cos(expr: &Expr, var: &str) -> bool {
    matches!(expr, Expr::cos(arg) if is_square_of_var(arg, var))
}

// sqrt(π/2)*F(sqrt(2/π)*x) with F the Fresnel integral S or C
fn fresnel(function: &str, var: &str) -> String {
    format!(
        "sqrt({}/2)*{}(sqrt(2/{})*{})",
        pi(),
        function,
        pi(),
        var
    )
}

pub static INTEGRAL_PATTERNS: &[Pattern<String>] = &[
    Pattern {
        name: "exp_over_one_plus_exp",
        structural: is_exp_over_one_plus_exp,
        textual: None,
        build: i_exp_over_one_plus_exp,
    },
    Pattern {
        name: "reciprocal",
        structural: is_reciprocal,
        textual: None,
        build: i_reciprocal,
    },
    Pattern {
        name: "inverse_square_difference",
        structural: is_inverse_square_difference,
        textual: None,
        build: i_inverse_square_difference,
    },
    Pattern {
        name: "arctan",
        structural: is_arctan,
        textual: Some(|text, var| textual_match(&ONE_PLUS_SQUARE, text, var)),
        build: i_inverse_square_sum,
    },
    Pattern {
        name: "inverse_square_sum",
        structural: is_inverse_square_sum,
        textual: Some(|text, var| textual_match(&CONST_PLUS_SQUARE, text, var)),
        build: i_inverse_square_sum,
    },
    Pattern {
        name: "inverse_constant_minus_square",
        structural: is_inverse_constant_minus_square,
        textual: Some(|text, var| textual_match(&NEG_SQUARE_PLUS_CONST, text, var)),
        build: i_inverse_constant_minus_square,
    },
    Pattern {
        name: "arcsin",
        structural: is_arcsin,
        textual: Some(|text, var| textual_match(&INV_SQRT_NEG_SQUARE_PLUS_ONE, text, var)),
        build: i_arcsin,
    },
    Pattern {
        name: "arcsin_scaled",
        structural: is_arcsin_scaled,
        textual: Some(|text, var| textual_match(&INV_SQRT_NEG_SQUARE_PLUS_CONST, text, var)),
        build: i_arcsin,
    },
    Pattern {
        name: "inverse_sqrt_square_offset",
        structural: is_inverse_sqrt_square_offset,
        textual: Some(|text, var| textual_match(&INV_SQRT_CONST_PLUS_SQUARE, text, var)),
        build: i_inverse_sqrt_square_offset,
    },
    Pattern {
        name: "sqrt_constant_minus_square",
        structural: is_sqrt_constant_minus_square,
        textual: Some(|text, var| textual_match(&SQRT_NEG_SQUARE_PLUS_CONST, text, var)),
        build: i_sqrt_constant_minus_square,
    },
    Pattern {
        name: "sqrt_square_offset",
        structural: is_sqrt_square_offset,
        textual: Some(|text, var| textual_match(&SQRT_CONST_PLUS_SQUARE, text, var)),
        build: i_sqrt_square_offset,
    },
    Pattern {
        name: "fresnel_sin",
        structural: is_fresnel_sin,
        textual: None,
        build: |_, var| Ok(fresnel("S", var)),
    },
    Pattern {
        name: "fresnel_cos",
        structural: is_fresnel_cos,
        textual: None,
        build: |_, var| Ok(fresnel("C", var)),
    },
];

//___________________________________INTEGRATION BY PARTS____________________________________

/// `x` times `g(x)` in either order
fn times_var<'a>(expr: &'a Expr, var: &str) -> Option<&'a Expr> {
    match expr {
        Expr::Mul(lhs, rhs) if lhs.is_var(var) => Some(rhs.as_ref()),
        Expr::Mul(lhs, rhs) if rhs.is_var(var) => Some(lhs.as_ref()),
        _ => None,
    }
}

pub static BY_PARTS_PATTERNS: &[Pattern<Expr>] = &[
    // x*sin(x) -> sin(x) - x*cos(x)
    Pattern {
        name: "x_sin",
        structural: |expr, var| times_var(expr, var).is_some_and(|g| is_sin_of_var(g, var)),
        textual: None,
        build: |_, var| {
            let x = var_expr(var);
            Ok(Expr::sin(x.clone().boxed()) - x.clone() * Expr::cos(x.boxed()))
        },
    },
    // x*cos(x) -> cos(x) + x*sin(x)
    Pattern {
        name: "x_cos",
        structural: |expr, var| times_var(expr, var).is_some_and(|g| is_cos_of_var(g, var)),
        textual: None,
        build: |_, var| {
            let x = var_expr(var);
            Ok(Expr::cos(x.clone().boxed()) + x.clone() * Expr::sin(x.boxed()))
        },
    },
    // x*e^x -> x*e^x - e^x
    Pattern {
        name: "x_exp",
        structural: |expr, var| times_var(expr, var).is_some_and(|g| is_exp_of_var(g, var)),
        textual: None,
        build: |_, var| {
            let x = var_expr(var);
            Ok(x.clone() * x.clone().exp() - x.exp())
        },
    },
    // x*ln(x) -> x^2/2*ln(x) - x^2/4
    Pattern {
        name: "x_ln",
        structural: |expr, var| times_var(expr, var).is_some_and(|g| is_ln_of_var(g, var)),
        textual: None,
        build: |_, var| {
            let x = var_expr(var);
            let half_square = x.clone().pow(2.0) / Expr::Const(2.0);
            Ok(half_square * x.clone().ln() - x.pow(2.0) / Expr::Const(4.0))
        },
    },
];
