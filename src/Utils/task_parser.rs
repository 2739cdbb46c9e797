/// parse a settings document with structure like "title1 key1: value1, value2 key2: value3 title2 key3: value4"
/// which has titles and pairs key - list of values. Lines starting with //, #, % or ; are comments.
/// Result is a HashMap<title, HashMap<key, Vec<Value>>>.
///
/// ```text
/// engine
///   cache_capacity: 500
///   parallel: false
///   loglevel: debug
/// ```
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type SectionMap = HashMap<String, Vec<Value>>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// scalar found on the right side of a `key:` pair
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// integers are accepted where a float is expected
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// identifier: letter or '_' followed by letters, digits or '_'
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let mut parser = map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        String::from,
    );
    parser.parse(input)
}

fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, title) = parse_identifier(input)?;
    Ok((input.trim_start(), title))
}

fn classify(raw: &str) -> Value {
    if let Ok(val) = raw.parse::<i64>() {
        Value::Integer(val)
    } else if let Ok(val) = raw.parse::<f64>() {
        Value::Float(val)
    } else if let Ok(val) = raw.parse::<bool>() {
        Value::Boolean(val)
    } else {
        Value::String(raw.to_string())
    }
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    // a value ends at a comma, whitespace or a semicolon
    let raw = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';'));
    let mut parser = map(raw, classify);
    parser.parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator = delimited(space0, tag(","), space0);
    let mut parser = separated_list1(separator, parse_value);
    parser.parse(input)
}

fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_identifier, colon, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim_start(), result))
}

fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, multispace0));
    let (input, pairs) = parser.parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

/// Removes comment lines and blank lines
pub fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !(trimmed.is_empty()
                || trimmed.starts_with("//")
                || trimmed.starts_with('#')
                || trimmed.starts_with('%')
                || trimmed.starts_with(';'))
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

fn parse_sections(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = many1(delimited(multispace0, parse_section, multispace0));
    let (input, sections) = parser.parse(input)?;
    Ok((input, sections.into_iter().collect()))
}

/// Parses the whole document; text left over after the last section is an error.
pub fn parse_document(input: &str) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    match parse_sections(&filtered) {
        Ok((remaining, parsed)) => {
            if !remaining.trim().is_empty() {
                return Err(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining
                ));
            }
            Ok(parsed)
        }
        Err(e) => Err(format!("Parsing error: {:?}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifier() {
        let (remaining, key) = parse_identifier("cache_capacity: 10").unwrap();
        assert_eq!(key, "cache_capacity");
        assert_eq!(remaining, ": 10");
        assert!(parse_identifier("1abc").is_err());
    }

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("500").unwrap().1, Value::Integer(500));
        assert_eq!(parse_value("0.5, 1").unwrap(), (", 1", Value::Float(0.5)));
        assert_eq!(parse_value("false").unwrap().1, Value::Boolean(false));
        assert_eq!(
            parse_value("debug\n").unwrap().1,
            Value::String("debug".to_string())
        );
    }

    #[test]
    fn test_parse_key_value_pair_with_list() {
        let (remaining, (key, values)) = parse_key_value_pair("bounds: 0, 1 next: 2").unwrap();
        assert_eq!(key, "bounds");
        assert_eq!(values, vec![Value::Integer(0), Value::Integer(1)]);
        assert_eq!(remaining, "next: 2");
    }

    #[test]
    fn test_parse_document_multiline() {
        let doc = "
        // engine settings
        engine
          cache_capacity: 500
          parallel: false
        # output
        output
          loglevel: debug
        ";
        let parsed = parse_document(doc).unwrap();
        assert_eq!(parsed.len(), 2);
        let engine = &parsed["engine"];
        assert_eq!(engine["cache_capacity"], vec![Value::Integer(500)]);
        assert_eq!(engine["parallel"], vec![Value::Boolean(false)]);
        assert_eq!(
            parsed["output"]["loglevel"][0].as_string().map(|s| s.as_str()),
            Some("debug")
        );
    }

    #[test]
    fn test_parse_document_single_line() {
        let parsed = parse_document("engine cache_capacity: 3 parallel: true").unwrap();
        assert_eq!(parsed["engine"]["cache_capacity"][0].as_integer(), Some(3));
        assert_eq!(parsed["engine"]["parallel"][0].as_boolean(), Some(true));
    }

    #[test]
    fn test_malformed_document() {
        assert!(parse_document("").is_err());
        assert!(parse_document("engine").is_err());
    }

    #[test]
    fn test_filter_comments() {
        let filtered = filter_comments("# a\nengine\n; b\n  key: 1\n\n% c");
        assert_eq!(filtered, "engine\n  key: 1");
    }
}
