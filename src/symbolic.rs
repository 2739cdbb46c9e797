#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression bound to one variable
///
///# Example
/// ```
/// use RustedCalculus::symbolic::parse_expr::parse_expression_func;
/// let parsed_expression = parse_expression_func("2x sin(x) + √x", "x").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.to_string(), "2*x*sin(x)+sqrt(x)");
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) defines the symbolic expression tree
/// 2) renders it into the canonical string used for printing, cache keys and pattern matching
/// 3) evaluates it numerically
///# Example#
/// ```
/// use RustedCalculus::symbolic::symbolic_engine::Expr;
/// let input = "x^2+sin(x)";
/// let parsed_expression = Expr::parse_expression(input, "x").unwrap();
/// let value = parsed_expression.eval_at("x", 0.0).unwrap();
/// assert_eq!(value, 0.0);
/// // differentiate with respect to x
/// let df_dx = parsed_expression.diff("x");
/// println!("df_dx = {}", df_dx);
/// assert_eq!(df_dx.to_string(), "2*x+cos(x)");
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
pub mod symbolic_errors;
pub mod symbolic_simplify;
///________________________________________________________________________________________________________________________________________________
///
/// best-effort indefinite integration and Gauss-Legendre quadrature
/// Example#
/// ```
/// use RustedCalculus::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x*e^x + 1/(x^2+1)", "x").unwrap();
/// let integral = f.integrate("x");
/// assert_eq!(integral, "x*e^x-e^x+arctan(x)+C");
/// // what the engine cannot integrate is kept as a marker
/// let g = Expr::parse_expression("e^(x^2)", "x").unwrap();
/// assert_eq!(g.integrate("x"), "integral(e^(x^2))");
/// ```
pub mod symbolic_integration;
/// ordered rule tables consulted before the recursive rules of both engines
pub mod symbolic_patterns;
/// bounded LRU memo caches
pub mod symbolic_cache;
/// engine context: configuration, caches and the complexity-gated parallel split
pub mod symbolic_context;
///________________________________________________________________________________________________________________________________________________
/// text in, result out
/// Example#
/// ```
/// use RustedCalculus::symbolic::calculus_api::{differentiate, integrate, IntegrationMode};
/// let derivative = differentiate("x^3", "x").unwrap();
/// assert_eq!(derivative.to_string(), "3*x^2");
/// let result = integrate("x^2", "x", IntegrationMode::Definite, Some("0"), Some("3")).unwrap();
/// assert!((result.value.unwrap() - 9.0).abs() < 1e-12);
/// for step in &result.steps {
///     println!("{}", step);
/// }
/// ```
pub mod calculus_api;
mod symbolic_engine_tests;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket checks and gluing formula strings
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
