// the collection of utility functions mainly for bracket checks, number formatting
// and gluing formula strings together
use std::f64::consts::{E, PI};

/// true if every opening bracket of `( [ {` is closed by its own kind, innermost first
pub fn brackets_balanced(s: &str) -> bool {
    let mut stack = Vec::new();
    for c in s.chars() {
        match c {
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                let opening = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(opening) {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

/// Shortest text of a number the parser reads back unchanged; π and e keep their symbols.
pub fn format_number(value: f64) -> String {
    if value == PI {
        return "π".to_string();
    }
    if value == -PI {
        return "-π".to_string();
    }
    if value == E {
        return "e".to_string();
    }
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// find positions of '+' and '-' that are binary and outside brackets and |..|
fn top_level_sign_positions(s: &str) -> Vec<usize> {
    let mut depth = 0i32;
    let mut inside_abs = false;
    let mut positions = Vec::new();
    let mut previous: Option<char> = None;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '|' => inside_abs = !inside_abs,
            '+' | '-' if depth == 0 && !inside_abs => {
                let unary = matches!(previous, None | Some('+' | '-' | '*' | '/' | '^'));
                if !unary {
                    positions.push(i);
                }
            }
            _ => {}
        }
        previous = Some(c);
    }
    positions
}

/// true if the formula is a sum/difference at its top level (`x^2/2+x`, not `-cos(x)`)
pub fn has_top_level_sum(s: &str) -> bool {
    !top_level_sign_positions(s).is_empty()
}

/// Removes one trailing constant of integration.
pub fn strip_constant(s: &str) -> &str {
    s.strip_suffix("+C").unwrap_or(s)
}

/// `l + r` as text
pub fn sum_strings(l: &str, r: &str) -> String {
    if r.starts_with('-') {
        format!("{}{}", l, r)
    } else {
        format!("{}+{}", l, r)
    }
}

/// `l - r` as text, grouping `r` when it is itself a sum
pub fn difference_strings(l: &str, r: &str) -> String {
    if has_top_level_sum(r) {
        format!("{}-({})", l, r)
    } else if let Some(rest) = r.strip_prefix('-') {
        format!("{}+{}", l, rest)
    } else {
        format!("{}-{}", l, r)
    }
}

/// `factor * s` as text; `factor` is already rendered canonically
pub fn product_strings(factor: &str, s: &str) -> String {
    let factor = if has_top_level_sum(factor) || factor.starts_with('-') {
        format!("({})", factor)
    } else {
        factor.to_string()
    };
    if has_top_level_sum(s) || s.starts_with('-') {
        format!("{}*({})", factor, s)
    } else {
        format!("{}*{}", factor, s)
    }
}

/// `-s` as text
pub fn negate_string(s: &str) -> String {
    if has_top_level_sum(s) {
        format!("-({})", s)
    } else if let Some(rest) = s.strip_prefix('-') {
        rest.to_string()
    } else {
        format!("-{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brackets_balanced() {
        assert!(brackets_balanced("(x+1)*(x-1)"));
        assert!(!brackets_balanced("(x+1"));
        assert!(!brackets_balanced(")x("));
        assert!(brackets_balanced("[x+1]*{x-1}"));
        assert!(!brackets_balanced("[x+1"));
        assert!(!brackets_balanced("(x+1]"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(PI), "π");
    }

    #[test]
    fn test_top_level_sum() {
        assert!(has_top_level_sum("x^2/2+x"));
        assert!(!has_top_level_sum("-cos(x)"));
        assert!(!has_top_level_sum("ln|x-1|"));
        assert!(!has_top_level_sum("x^(-1)"));
        assert!(!has_top_level_sum("2*-x"));
    }

    #[test]
    fn test_string_joins() {
        assert_eq!(strip_constant("x+C"), "x");
        assert_eq!(strip_constant("x"), "x");
        assert_eq!(sum_strings("x^3/3", "-cos(x)"), "x^3/3-cos(x)");
        assert_eq!(difference_strings("x", "-cos(x)"), "x+cos(x)");
        assert_eq!(difference_strings("x", "sin(x)+x"), "x-(sin(x)+x)");
        assert_eq!(product_strings("3", "x^2/2+x"), "3*(x^2/2+x)");
        assert_eq!(product_strings("a", "e^x"), "a*e^x");
        assert_eq!(negate_string("-cos(x)"), "cos(x)");
    }
}
