//! # Calculus API Module
//!
//! Text in, result out: the two entry points callers use without touching the term model.
//!
//! - [`differentiate`]: expression text and variable name to the derivative `Expr`
//! - [`integrate`]: expression text, variable name, [`IntegrationMode`] and optional bounds
//!   to an [`IntegrationResult`] holding the formula, derivation steps and, for definite
//!   integrals, the numeric value
//!
//! Both use the process-wide engine; `CalculusEngine::differentiate_text` and
//! `CalculusEngine::integrate_text` do the same on an engine of your own.
//!
//! # Example
//! ```rust, ignore
//! use RustedCalculus::symbolic::calculus_api::{integrate, IntegrationMode};
//! let result = integrate("x^2+sin(x)", "x", IntegrationMode::Indefinite, None, None).unwrap();
//! assert_eq!(result.formula, "x^3/3-cos(x)+C");
//! let result = integrate("sin(x)", "x", IntegrationMode::Definite, Some("0"), Some("π")).unwrap();
//! assert!((result.value.unwrap() - 2.0).abs() < 1e-12);
//! ```
use crate::symbolic::parse_expr::parse_expression_func;
use crate::symbolic::symbolic_context::CalculusEngine;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::{CalculusError, EvaluationError};
use crate::symbolic::symbolic_integration::is_unresolved;
use crate::symbolic::utils::strip_constant;
use log::{info, warn};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum IntegrationMode {
    Indefinite,
    Definite,
}

/// Outcome of [`integrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationResult {
    /// antiderivative; ends with a single `+C` in indefinite mode
    pub formula: String,
    /// human-readable derivation, one step per line
    pub steps: Vec<String>,
    /// F(b) - F(a) in definite mode
    pub value: Option<f64>,
}

/// top-level summands of a sum/difference with their signs
fn summands<'a>(expr: &'a Expr, negative: bool, out: &mut Vec<(bool, &'a Expr)>) {
    match expr {
        Expr::Add(lhs, rhs) => {
            summands(lhs, negative, out);
            summands(rhs, negative, out);
        }
        Expr::Sub(lhs, rhs) => {
            summands(lhs, negative, out);
            summands(rhs, !negative, out);
        }
        _ => out.push((negative, expr)),
    }
}

fn parse_bound(text: &str, var: &str) -> Result<f64, CalculusError> {
    let bound = parse_expression_func(text, var)?;
    if bound.contains_variable(var) {
        return Err(EvaluationError::Domain(format!(
            "bound '{}' depends on the integration variable {}",
            text, var
        ))
        .into());
    }
    Ok(bound.eval_constant()?)
}

/// F(b) - F(a) of a closed-form antiderivative
fn closed_form_value(formula: &str, var: &str, a: f64, b: f64) -> Result<f64, CalculusError> {
    if is_unresolved(formula) {
        return Err(EvaluationError::Domain("antiderivative is not closed".to_string()).into());
    }
    let antiderivative = parse_expression_func(formula, var)?;
    let upper = antiderivative.eval_at(var, b)?;
    let lower = antiderivative.eval_at(var, a)?;
    Ok(upper - lower)
}

impl CalculusEngine {
    /// Parses `text` with `var` bound and differentiates it.
    pub fn differentiate_text(&self, text: &str, var: &str) -> Result<Expr, CalculusError> {
        let expr = parse_expression_func(text, var)?;
        let derivative = self.differentiate(&expr, var);
        info!("d/d{} {} = {}", var, expr, derivative);
        Ok(derivative)
    }

    /// Parses `text` with `var` bound and integrates it. Definite mode needs both bounds.
    pub fn integrate_text(
        &self,
        text: &str,
        var: &str,
        mode: IntegrationMode,
        lower: Option<&str>,
        upper: Option<&str>,
    ) -> Result<IntegrationResult, CalculusError> {
        let expr = parse_expression_func(text, var)?;
        let mut steps = vec![format!("∫ {} d{}", expr, var)];
        let mut terms = Vec::new();
        summands(&expr, false, &mut terms);
        if terms.len() > 1 {
            for (negative, term) in &terms {
                let sign = if *negative { "-" } else { "+" };
                steps.push(format!(
                    "{} ∫ {} d{} = {}  [{}]",
                    sign,
                    term,
                    var,
                    self.integrate_term(term, var),
                    self.integration_rule(term, var)
                ));
            }
        } else {
            steps.push(format!("rule: {}", self.integration_rule(&expr, var)));
        }
        let antiderivative = strip_constant(&self.integrate(&expr, var)).to_string();
        if is_unresolved(&antiderivative) {
            warn!("no closed form for part of ∫ {} d{}", expr, var);
        }

        match mode {
            IntegrationMode::Indefinite => {
                let formula = format!("{}+C", antiderivative);
                steps.push(format!("= {}", formula));
                info!("∫ {} d{} = {}", expr, var, formula);
                Ok(IntegrationResult {
                    formula,
                    steps,
                    value: None,
                })
            }
            IntegrationMode::Definite => {
                let lower = lower.ok_or(EvaluationError::MissingBound("lower"))?;
                let upper = upper.ok_or(EvaluationError::MissingBound("upper"))?;
                let a = parse_bound(lower, var)?;
                let b = parse_bound(upper, var)?;
                steps.push(format!("F({}) = {}", var, antiderivative));
                let value = match closed_form_value(&antiderivative, var, a, b) {
                    Ok(value) => {
                        steps.push(format!("F({}) - F({}) = {}", upper, lower, value));
                        value
                    }
                    Err(reason) => {
                        warn!("closed form unusable on [{}, {}]: {}", lower, upper, reason);
                        let degree = self.config.quadrature_degree;
                        let value = expr.quadrature(var, a, b, degree)?;
                        steps.push(format!(
                            "Gauss-Legendre quadrature ({} nodes) on [{}, {}] = {}",
                            degree, lower, upper, value
                        ));
                        value
                    }
                };
                info!("∫ {} d{} on [{}, {}] = {}", expr, var, lower, upper, value);
                Ok(IntegrationResult {
                    formula: antiderivative,
                    steps,
                    value: Some(value),
                })
            }
        }
    }
}

/// Derivative of `text` with respect to `var`.
pub fn differentiate(text: &str, var: &str) -> Result<Expr, CalculusError> {
    CalculusEngine::global().differentiate_text(text, var)
}

/// Integral of `text` with respect to `var`; see [`CalculusEngine::integrate_text`].
pub fn integrate(
    text: &str,
    var: &str,
    mode: IntegrationMode,
    lower: Option<&str>,
    upper: Option<&str>,
) -> Result<IntegrationResult, CalculusError> {
    CalculusEngine::global().integrate_text(text, var, mode, lower, upper)
}
