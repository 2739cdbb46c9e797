//! a module turns a String expression into a symbolic expression bound to one variable
//!# Example
//! ```
//! use RustedCalculus::symbolic::parse_expr::parse_expression_func;
//! let parsed = parse_expression_func("3sin(x)+x²", "x").unwrap();
//! assert_eq!(parsed.to_string(), "3*sin(x)+x^2");
//! ```
//! pipeline:
//! ```text
//!   "2x·sen²(x) + √x"                      raw text
//!          | normalize_sugar
//!   "2x*sen^2(x) + sqrtx"                  ascii text
//!          | tokenize
//!   [2][x][*][sin][^][2][(][x][)][+][sqrt][x]
//!          | insert_implicit_multiplication
//!   [2][*][x][*][sin][^][2][(][x][)][+][sqrt][x]
//!          | ExprParser (recursive descent)
//!   2*x*sin(x)^2+sqrt(x)
//! ```
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::ParseError;
use crate::symbolic::utils::brackets_balanced;
use log::debug;
use std::f64::consts::{E, PI};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Function {
    Sin,
    Cos,
    Tan,
    Ln,
    Log,
    Exp,
    Sqrt,
    Abs,
    Arcsin,
    Arctan,
}

impl Function {
    fn apply(self, arg: Expr) -> Expr {
        let arg = Box::new(arg);
        match self {
            Function::Sin => Expr::sin(arg),
            Function::Cos => Expr::cos(arg),
            Function::Tan => Expr::tan(arg),
            Function::Ln => Expr::Ln(arg),
            Function::Log => Expr::Log(arg),
            Function::Exp => Expr::Exp(arg),
            Function::Sqrt => Expr::Sqrt(arg),
            Function::Abs => Expr::Abs(arg),
            Function::Arcsin => Expr::arcsin(arg),
            Function::Arctan => Expr::arctan(arg),
        }
    }
}

// every spelling the lexer accepts; aliases map onto the same function
const FUNCTION_NAMES: &[(&str, Function)] = &[
    ("arcsin", Function::Arcsin),
    ("arctan", Function::Arctan),
    ("arctg", Function::Arctan),
    ("asin", Function::Arcsin),
    ("atan", Function::Arctan),
    ("sqrt", Function::Sqrt),
    ("sin", Function::Sin),
    ("sen", Function::Sin),
    ("cos", Function::Cos),
    ("tan", Function::Tan),
    ("tg", Function::Tan),
    ("exp", Function::Exp),
    ("abs", Function::Abs),
    ("ln", Function::Ln),
    ("log", Function::Log),
];

const CONSTANT_NAMES: &[(&str, f64)] = &[("pi", PI), ("π", PI), ("e", E)];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Constant(f64),
    Ident(String),
    Func(Function),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Bar,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(n) | Token::Constant(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Func(func) => write!(f, "{:?}", func),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Bar => write!(f, "|"),
        }
    }
}

fn superscript_digit(c: char) -> Option<char> {
    match c {
        '⁰' => Some('0'),
        '¹' => Some('1'),
        '²' => Some('2'),
        '³' => Some('3'),
        '⁴' => Some('4'),
        '⁵' => Some('5'),
        '⁶' => Some('6'),
        '⁷' => Some('7'),
        '⁸' => Some('8'),
        '⁹' => Some('9'),
        '⁻' => Some('-'),
        _ => None,
    }
}

/// Rewrites notational sugar into plain ascii operators: `x²` → `x^2`, `√` → `sqrt`,
/// `·`/`×` → `*`, `÷` → `/`, `−` → `-`.
fn normalize_sugar(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    let mut in_superscript = false;
    for c in input.chars() {
        if let Some(digit) = superscript_digit(c) {
            if !in_superscript {
                out.push('^');
                in_superscript = true;
            }
            out.push(digit);
            continue;
        }
        in_superscript = false;
        match c {
            '√' => out.push_str("sqrt"),
            '·' | '×' | '∙' => out.push('*'),
            '÷' => out.push('/'),
            '−' => out.push('-'),
            _ => out.push(c),
        }
    }
    out
}

// longest known name (function, constant or the bound variable) starting at `word[k..]`
fn longest_name_at(word: &[char], k: usize, var: &[char]) -> Option<(usize, Token)> {
    let rest = &word[k..];
    let mut best: Option<(usize, Token)> = None;
    let mut consider = |len: usize, token: Token| {
        if best.as_ref().is_none_or(|(best_len, _)| len > *best_len) {
            best = Some((len, token));
        }
    };
    if !var.is_empty() && rest.starts_with(var) {
        consider(var.len(), Token::Ident(var.iter().collect()));
    }
    for (name, func) in FUNCTION_NAMES {
        let name: Vec<char> = name.chars().collect();
        if rest.starts_with(&name) {
            consider(name.len(), Token::Func(*func));
        }
    }
    for (name, value) in CONSTANT_NAMES {
        let name: Vec<char> = name.chars().collect();
        if rest.starts_with(&name) {
            consider(name.len(), Token::Constant(*value));
        }
    }
    best
}

// splits a run of letters into known names and single-letter parameters
fn split_word(
    word: &[char],
    var: &[char],
    followed_by_paren: bool,
) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut unknown_run = 0usize;
    let mut k = 0;
    while k < word.len() {
        if let Some((len, token)) = longest_name_at(word, k, var) {
            if unknown_run >= 3 {
                return Err(ParseError::UnknownToken(word.iter().collect()));
            }
            unknown_run = 0;
            tokens.push(token);
            k += len;
        } else {
            unknown_run += 1;
            tokens.push(Token::Ident(word[k].to_string()));
            k += 1;
        }
    }
    if unknown_run >= 3 || (unknown_run >= 2 && followed_by_paren) {
        return Err(ParseError::UnknownToken(word.iter().collect()));
    }
    Ok(tokens)
}

fn tokenize(input: &str, var: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let var: Vec<char> = var.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            _ if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ParseError::UnknownToken(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            _ if c.is_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_alphabetic() {
                    i += 1;
                }
                let followed_by_paren = chars[i..]
                    .iter()
                    .find(|c| !c.is_whitespace())
                    .is_some_and(|c| *c == '(');
                tokens.extend(split_word(&chars[start..i], &var, followed_by_paren)?);
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' | '[' | '{' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' | ']' | '}' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '|' => {
                tokens.push(Token::Bar);
                i += 1;
            }
            _ => return Err(ParseError::UnknownToken(c.to_string())),
        }
    }
    Ok(tokens)
}

/// Check if implicit multiplication should be inserted between two tokens
fn should_insert_mul(current: &Token, next: &Token) -> bool {
    match (current, next) {
        // 2x, 2sin(x), 2(x+1), 2π
        (Token::Number(_), Token::Ident(_) | Token::Func(_) | Token::LParen | Token::Constant(_)) => {
            true
        }
        // xy, x sin(x), x(x+1), x2, xπ
        (
            Token::Ident(_) | Token::Constant(_) | Token::RParen,
            Token::Ident(_) | Token::Func(_) | Token::LParen | Token::Number(_) | Token::Constant(_),
        ) => true,
        _ => false,
    }
}

/// Insert implicit multiplication operators between appropriate tokens
///
/// The exponent of a function power (`sin^2(x)`) is left alone: `2(x)` there is
/// the exponent followed by the argument, not a product.
fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    let mut result: Vec<Token> = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();
    while let Some(current) = it.next() {
        let function_exponent = matches!(current, Token::Number(_))
            && result.len() >= 2
            && matches!(result[result.len() - 1], Token::Caret)
            && matches!(result[result.len() - 2], Token::Func(_))
            || matches!(current, Token::Number(_))
                && result.len() >= 3
                && matches!(result[result.len() - 1], Token::Minus)
                && matches!(result[result.len() - 2], Token::Caret)
                && matches!(result[result.len() - 3], Token::Func(_));
        let needs_mul = !function_exponent
            && it.peek().is_some_and(|next| should_insert_mul(&current, next));
        result.push(current);
        if needs_mul {
            result.push(Token::Star);
        }
    }
    result
}

/// bound on parenthesis, sign and function nesting, keeps the recursion off the stack limit
pub const MAX_NESTING_DEPTH: usize = 128;

struct ExprParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        match self.next() {
            Some(token) if *token == expected => Ok(()),
            Some(token) => Err(ParseError::UnexpectedToken(token.to_string())),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    // sum := product (('+' | '-') product)*
    fn parse_sum(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_product()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    lhs = Expr::Add(lhs.boxed(), self.parse_product()?.boxed());
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    lhs = Expr::Sub(lhs.boxed(), self.parse_product()?.boxed());
                }
                _ => return Ok(lhs),
            }
        }
    }

    // product := unary (('*' | '/') unary)*
    fn parse_product(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    lhs = Expr::Mul(lhs.boxed(), self.parse_unary()?.boxed());
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    lhs = Expr::Div(lhs.boxed(), self.parse_unary()?.boxed());
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::TooDeep(MAX_NESTING_DEPTH));
        }
        Ok(())
    }

    // unary := ('-' | '+') unary | power
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let result = self.parse_signed();
        self.depth -= 1;
        result
    }

    fn parse_signed(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.parse_unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    // power := primary ('^' unary)?   (right associative through unary)
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_primary()?;
        if self.peek() != Some(&Token::Caret) {
            return Ok(base);
        }
        self.pos += 1;
        let exponent = self.parse_unary()?;
        build_power(base, exponent)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.next().cloned().ok_or(ParseError::UnexpectedEnd)?;
        match token {
            Token::Number(n) | Token::Constant(n) => Ok(Expr::Const(n)),
            Token::Ident(name) => Ok(Expr::Var(name)),
            Token::LParen => {
                let inner = self.parse_sum()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Bar => {
                let inner = self.parse_sum()?;
                self.expect(Token::Bar)?;
                Ok(Expr::Abs(inner.boxed()))
            }
            Token::Func(func) => {
                // sin^2(x) means (sin(x))^2
                let power = if self.peek() == Some(&Token::Caret) {
                    self.pos += 1;
                    let negative = if self.peek() == Some(&Token::Minus) {
                        self.pos += 1;
                        true
                    } else {
                        false
                    };
                    match self.next() {
                        Some(Token::Number(n)) => Some(if negative { -n } else { *n }),
                        Some(other) => {
                            return Err(ParseError::NonNumericExponent(other.to_string()));
                        }
                        None => return Err(ParseError::UnexpectedEnd),
                    }
                } else {
                    None
                };
                self.descend()?;
                let argument = self.parse_primary()?;
                self.depth -= 1;
                let applied = func.apply(argument);
                Ok(match power {
                    Some(n) => applied.pow(n),
                    None => applied,
                })
            }
            other => Err(ParseError::UnexpectedToken(other.to_string())),
        }
    }
}

/// `base ^ exponent` with a numeric exponent; `e^g` becomes `Exp(g)` and a symbolic
/// exponent on any other base becomes `Exp(g*ln(base))`.
fn build_power(base: Expr, exponent: Expr) -> Result<Expr, ParseError> {
    if base == Expr::Const(E) {
        return Ok(Expr::Exp(exponent.boxed()));
    }
    match exponent.eval_constant() {
        Ok(n) => Ok(base.pow(n)),
        Err(_) if has_symbols(&exponent) => Ok(Expr::Exp((exponent * base.ln()).boxed())),
        Err(_) => Err(ParseError::NonNumericExponent(exponent.to_string())),
    }
}

fn has_symbols(expr: &Expr) -> bool {
    match expr {
        Expr::Var(_) => true,
        Expr::Const(_) => false,
        Expr::Add(l, r) | Expr::Sub(l, r) | Expr::Mul(l, r) | Expr::Div(l, r) => {
            has_symbols(l) || has_symbols(r)
        }
        Expr::Pow(b, _) => has_symbols(b),
        Expr::Exp(a)
        | Expr::Ln(a)
        | Expr::Log(a)
        | Expr::Sqrt(a)
        | Expr::Abs(a)
        | Expr::sin(a)
        | Expr::cos(a)
        | Expr::tan(a)
        | Expr::arcsin(a)
        | Expr::arctan(a) => has_symbols(a),
    }
}

/// Parses `input` into a term whose free variable is `var`.
///
/// Fails when the text is empty, the brackets are unbalanced, or a token is not part
/// of the grammar.
pub fn parse_expression_func(input: &str, var: &str) -> Result<Expr, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    if !brackets_balanced(input) || input.chars().filter(|c| *c == '|').count() % 2 != 0 {
        return Err(ParseError::UnbalancedParentheses(input.to_string()));
    }
    let normalized = normalize_sugar(input);
    let tokens = insert_implicit_multiplication(tokenize(&normalized, var)?);
    debug!("tokens of '{}': {:?}", input, tokens);
    let mut parser = ExprParser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_sum()?;
    if let Some(extra) = parser.peek() {
        return Err(ParseError::UnexpectedToken(extra.to_string()));
    }
    Ok(expr)
}

impl Expr {
    /// Parses a string bound to the variable `var`; see [`parse_expression_func`].
    pub fn parse_expression(input: &str, var: &str) -> Result<Expr, ParseError> {
        parse_expression_func(input, var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Box<Expr> {
        Box::new(Expr::Var("x".to_string()))
    }

    #[test]
    fn test_parse_constant() {
        let expr = parse_expression_func("42", "x").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse_expression_func("x", "x").unwrap();
        assert_eq!(expr, Expr::Var("x".to_string()));
    }

    #[test]
    fn test_parse_addition() {
        let expr = parse_expression_func("x + 2", "x").unwrap();
        assert_eq!(expr, Expr::Add(x(), Box::new(Expr::Const(2.0))));
    }

    #[test]
    fn test_multiple_subtraction_is_left_associative() {
        let result = parse_expression_func("x^2 - x - 1", "x").unwrap();
        let to_check = Expr::Var("x".to_string()).pow(2.0) - *x() - Expr::Const(1.0);
        assert_eq!(result, to_check);
    }

    #[test]
    fn test_parse_power() {
        let expr = parse_expression_func("x^2", "x").unwrap();
        assert_eq!(expr, Expr::Pow(x(), 2.0));
        let expr = parse_expression_func("x^(-1)", "x").unwrap();
        assert_eq!(expr, Expr::Pow(x(), -1.0));
        let expr = parse_expression_func("x^(1/2)", "x").unwrap();
        assert_eq!(expr, Expr::Pow(x(), 0.5));
    }

    #[test]
    fn test_power_binds_tighter_than_unary_minus() {
        let expr = parse_expression_func("-x^2", "x").unwrap();
        assert_eq!(expr, -Expr::Pow(x(), 2.0));
        let expr = parse_expression_func("-3", "x").unwrap();
        assert_eq!(expr, Expr::Const(-3.0));
    }

    #[test]
    fn test_implicit_multiplication() {
        let expr = parse_expression_func("2x", "x").unwrap();
        assert_eq!(expr, Expr::Mul(Box::new(Expr::Const(2.0)), x()));
        let expr = parse_expression_func("3sin(x)", "x").unwrap();
        assert_eq!(expr, Expr::Mul(Box::new(Expr::Const(3.0)), Box::new(Expr::sin(x()))));
        let expr = parse_expression_func("(x+1)(x-1)", "x").unwrap();
        assert_eq!(expr.to_string(), "(x+1)*(x-1)");
        let expr = parse_expression_func("x sin(x)", "x").unwrap();
        assert_eq!(expr.to_string(), "x*sin(x)");
    }

    #[test]
    fn test_notational_sugar() {
        assert_eq!(
            parse_expression_func("sen(x)", "x").unwrap(),
            Expr::sin(x())
        );
        assert_eq!(
            parse_expression_func("tg(x)", "x").unwrap(),
            Expr::tan(x())
        );
        assert_eq!(
            parse_expression_func("√x", "x").unwrap(),
            Expr::Sqrt(x())
        );
        assert_eq!(
            parse_expression_func("x²", "x").unwrap(),
            Expr::Pow(x(), 2.0)
        );
        assert_eq!(
            parse_expression_func("sin²(x)", "x").unwrap(),
            Expr::Pow(Box::new(Expr::sin(x())), 2.0)
        );
        assert_eq!(
            parse_expression_func("2·x", "x").unwrap(),
            Expr::Mul(Box::new(Expr::Const(2.0)), x())
        );
        assert_eq!(parse_expression_func("π", "x").unwrap(), Expr::Const(PI));
    }

    #[test]
    fn test_exponentials() {
        assert_eq!(parse_expression_func("e^x", "x").unwrap(), Expr::Exp(x()));
        assert_eq!(parse_expression_func("exp(x)", "x").unwrap(), Expr::Exp(x()));
        let expr = parse_expression_func("e^x/(1+e^x)", "x").unwrap();
        assert_eq!(expr.to_string(), "e^x/(1+e^x)");
        let expr = parse_expression_func("2^x", "x").unwrap();
        assert_eq!(expr.to_string(), "e^(x*ln(2))");
    }

    #[test]
    fn test_parse_nested_trig() {
        let expr = parse_expression_func("sin(cos(x))", "x").unwrap();
        assert_eq!(expr, Expr::sin(Box::new(Expr::cos(x()))));
    }

    #[test]
    fn test_absolute_value_and_ln_bar() {
        let expr = parse_expression_func("ln|x|", "x").unwrap();
        assert_eq!(expr, Expr::Ln(Box::new(Expr::Abs(x()))));
        let expr = parse_expression_func("-ln|cos(x)|", "x").unwrap();
        assert_eq!(expr.to_string(), "-ln|cos(x)|");
    }

    #[test]
    fn test_other_variable_name() {
        let expr = parse_expression_func("t^2 + a t", "t").unwrap();
        assert_eq!(expr.to_string(), "t^2+a*t");
        let expr = parse_expression_func("tan(t)", "t").unwrap();
        assert_eq!(expr, Expr::tan(Box::new(Expr::Var("t".to_string()))));
    }

    #[test]
    fn test_canonical_round_trip() {
        for input in [
            "x^2+sin(x)",
            "e^x/(1+e^x)",
            "x/(x^2+1)",
            "-(2*x)",
            "x-(x+1)",
            "(e^x)^2",
            "1/cos(x)^2",
            "x^1.5/1.5",
            "ln|x|+arctan(x)",
        ] {
            let parsed = parse_expression_func(input, "x").unwrap();
            assert_eq!(parsed.to_string(), input);
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_expression_func("   ", "x"), Err(ParseError::Empty));
        assert!(matches!(
            parse_expression_func("(x + y", "x"),
            Err(ParseError::UnbalancedParentheses(_))
        ));
        assert!(matches!(
            parse_expression_func("x $ 2", "x"),
            Err(ParseError::UnknownToken(_))
        ));
        assert!(matches!(
            parse_expression_func("foo(x)", "x"),
            Err(ParseError::UnknownToken(_))
        ));
        assert_eq!(parse_expression_func("(x +)", "x"), Err(ParseError::UnexpectedToken(")".to_string())));
        assert_eq!(parse_expression_func("x +", "x"), Err(ParseError::UnexpectedEnd));
        assert!(matches!(
            parse_expression_func("[x+1", "x"),
            Err(ParseError::UnbalancedParentheses(_))
        ));
        assert!(matches!(
            parse_expression_func("(x+1]", "x"),
            Err(ParseError::UnbalancedParentheses(_))
        ));
    }

    #[test]
    fn test_square_and_curly_brackets() {
        let expr = parse_expression_func("[x+1]*{x-1}", "x").unwrap();
        assert_eq!(expr, parse_expression_func("(x+1)*(x-1)", "x").unwrap());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse_expression_func(&nested(100), "x").unwrap(), *x());
        assert_eq!(
            parse_expression_func(&nested(50_000), "x"),
            Err(ParseError::TooDeep(MAX_NESTING_DEPTH))
        );
        let signs = format!("{}x", "-".repeat(50_000));
        assert_eq!(
            parse_expression_func(&signs, "x"),
            Err(ParseError::TooDeep(MAX_NESTING_DEPTH))
        );
        let functions = format!("{}x", "sin ".repeat(50_000));
        assert_eq!(
            parse_expression_func(&functions, "x"),
            Err(ParseError::TooDeep(MAX_NESTING_DEPTH))
        );
    }
}
