// randvcf: Random generation of syntactically valid VCF documents.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! Single typed values for INFO and FORMAT fields.
//!
//! Values are drawn with [draw_value] or [draw_values] and rendered to VCF
//! text through their [Display](std::fmt::Display) implementation. All
//! constraints are enforced when the value is drawn, so rendering never fails
//! and never produces a delimiter that would break the surrounding record.
//!
//! Text rules:
//!   - Integer values lie in [INTEGER_MIN, i32::MAX].
//!   - Float values are finite and always contain a decimal point.
//!   - Character values are one printable character that is not `.` or a delimiter.
//!   - String values are non-empty, never equal to `.` and percent-encode
//!     `%`, `:`, `;`, `=` and `,` when the [Alphabet::Printable] alphabet is used.
//!   - Missing values are written as `.`.
//!

pub mod genotype;

pub use genotype::Genotype;

use rand::Rng;
use rand::seq::IndexedRandom;

/// Smallest Integer value, the 8 values below it are reserved by BCF.
pub const INTEGER_MIN: i32 = i32::MIN + 8;

pub const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Characters that must be percent-encoded inside String values.
pub const ESCAPED: &[u8] = b"%:;=,";

/// Value types that can be declared for INFO and FORMAT fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    Float,
    Flag,
    Character,
    String,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ValueType::Integer => "Integer",
            ValueType::Float => "Float",
            ValueType::Flag => "Flag",
            ValueType::Character => "Character",
            ValueType::String => "String",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Integer" => Ok(ValueType::Integer),
            "Float" => Ok(ValueType::Float),
            "Flag" => Ok(ValueType::Flag),
            "Character" => Ok(ValueType::Character),
            "String" => Ok(ValueType::String),
            _ => Err(format!("'{}' is not a valid Type", s)),
        }
    }
}

/// Characters available to String and Character values.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alphabet {
    #[default]
    Alphanumeric,
    /// Printable ASCII without whitespace, delimiters are percent-encoded.
    Printable,
}

impl std::str::FromStr for Alphabet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alphanumeric" => Ok(Alphabet::Alphanumeric),
            "printable" => Ok(Alphabet::Printable),
            _ => Err(format!("'{}' is not a valid Alphabet", s)),
        }
    }
}

impl Alphabet {
    fn chars(&self) -> Vec<u8> {
        match self {
            Alphabet::Alphanumeric => ALPHANUMERIC.to_vec(),
            Alphabet::Printable => (b'!'..=b'~').collect(),
        }
    }
}

/// A single value in an INFO or FORMAT field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i32),
    Float(f32),
    Character(char),
    String(String),
    Genotype(Genotype),
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

/// Renders a float with a decimal point and without exponent notation.
pub fn format_float(x: f32) -> String {
    let mut out = x.to_string();
    if !out.contains('.') {
        out += ".0";
    }
    out
}

/// Percent-encodes the characters listed in [ESCAPED].
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii() && ESCAPED.contains(&(c as u8)) {
            out += &format!("%{:02X}", c as u8);
        } else {
            out.push(c);
        }
    }
    out
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Value::Integer(x) => write!(f, "{}", x),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Character(c) => write!(f, "{}", c),
            Value::String(s) => write!(f, "{}", escape_string(s)),
            Value::Genotype(gt) => write!(f, "{}", gt),
            Value::Missing => write!(f, "."),
        }
    }
}

/// Parameters shared by all value draws in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueParams {
    pub alphabet: Alphabet,
    pub max_string_len: usize,
    pub missing_value_rate: f64,
}

impl Default for ValueParams {
    fn default() -> Self {
        ValueParams { alphabet: Alphabet::Alphanumeric, max_string_len: 8, missing_value_rate: 0.1 }
    }
}

impl From<&crate::VcfConfig> for ValueParams {
    fn from(config: &crate::VcfConfig) -> Self {
        ValueParams {
            alphabet: config.alphabet,
            max_string_len: config.max_string_len,
            missing_value_rate: config.missing_value_rate,
        }
    }
}

/// Draws an Integer, half of the time from a small range around zero.
pub fn draw_integer<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    if rng.random_bool(0.5) {
        rng.random_range(-100..=100)
    } else {
        rng.random_range(INTEGER_MIN..=i32::MAX)
    }
}

/// Draws a finite Float.
pub fn draw_float<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    match rng.random_range(0..4) {
        0 => *[0.0_f32, 1.0, -1.0, 0.5].choose(rng).unwrap_or(&0.0),
        1 => rng.random_range(-100_i32..=100) as f32,
        2 => rng.random_range(-1.0e3_f32..1.0e3),
        _ => rng.random_range(-1.0e9_f32..1.0e9),
    }
}

/// Draws a non-negative Float for the QUAL column.
pub fn draw_quality<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    draw_float(rng).abs()
}

/// Draws one Character that is not `.` or a delimiter.
pub fn draw_character<R: Rng + ?Sized>(alphabet: Alphabet, rng: &mut R) -> char {
    let chars: Vec<u8> = alphabet.chars().into_iter()
        .filter(|c| *c != b'.' && !ESCAPED.contains(c))
        .collect();
    *chars.choose(rng).unwrap_or(&b'A') as char
}

/// Draws a non-empty string that is not `.`.
///
/// Delimiters are kept as-is in the returned String, they are escaped when the
/// value is rendered.
pub fn draw_string<R: Rng + ?Sized>(alphabet: Alphabet, max_len: usize, rng: &mut R) -> String {
    let chars = alphabet.chars();
    let len = rng.random_range(1..=max_len.max(1));
    let mut out: String = (0..len).map(|_| *chars.choose(rng).unwrap_or(&b'A') as char).collect();
    if out == "." {
        out = draw_character(alphabet, rng).to_string();
    }
    out
}

/// Draws an alphanumeric name starting with a letter.
pub fn draw_name<R: Rng + ?Sized>(max_len: usize, rng: &mut R) -> String {
    let first = *ALPHANUMERIC[..52].choose(rng).unwrap_or(&b'A') as char;
    let len = rng.random_range(0..max_len.max(1));
    let rest = (0..len).map(|_| *ALPHANUMERIC.choose(rng).unwrap_or(&b'A') as char);
    std::iter::once(first).chain(rest).collect()
}

/// Draws whether a Flag is set.
pub fn draw_flag<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random_bool(0.5)
}

/// Draws one non-missing value of `value_type`.
///
/// Returns None for [ValueType::Flag] which never carries a value.
pub fn draw_value<R: Rng + ?Sized>(
    value_type: ValueType,
    params: &ValueParams,
    rng: &mut R,
) -> Option<Value> {
    match value_type {
        ValueType::Integer => Some(Value::Integer(draw_integer(rng))),
        ValueType::Float => Some(Value::Float(draw_float(rng))),
        ValueType::Character => Some(Value::Character(draw_character(params.alphabet, rng))),
        ValueType::String => Some(Value::String(draw_string(params.alphabet, params.max_string_len, rng))),
        ValueType::Flag => None,
    }
}

/// Draws exactly `count` values, each missing with `params.missing_value_rate`.
///
/// Returns an empty vector for [ValueType::Flag].
pub fn draw_values<R: Rng + ?Sized>(
    value_type: ValueType,
    count: usize,
    params: &ValueParams,
    rng: &mut R,
) -> Vec<Value> {
    if value_type == ValueType::Flag {
        return Vec::new()
    }
    (0..count).map(|_| {
        if rng.random_bool(params.missing_value_rate) {
            Value::Missing
        } else {
            draw_value(value_type, params, rng).unwrap_or(Value::Missing)
        }
    }).collect()
}

/// Joins values with `,`, an empty list is written as `.`.
pub fn join_values(values: &[Value]) -> String {
    if values.is_empty() {
        return ".".to_string()
    }
    values.iter().map(|x| x.to_string()).collect::<Vec<String>>().join(",")
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_float_has_decimal_point() {
        use super::format_float;

        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(-3.0), "-3.0");
        assert_eq!(format_float(12.5), "12.5");
        assert!(!format_float(1.0e9).contains('e'));
        assert!(!format_float(1.0e-7).contains('e'));
    }

    #[test]
    fn escape_string_encodes_delimiters() {
        use super::escape_string;

        assert_eq!(escape_string("a:b;c=d,e%f"), "a%3Ab%3Bc%3Dd%2Ce%25f");
        assert_eq!(escape_string("plain"), "plain");
    }

    #[test]
    fn render_values() {
        use super::{Value, join_values};

        let values = vec![Value::Integer(-5), Value::Missing, Value::Float(2.0), Value::Character('x'), Value::String("ab".to_string())];
        assert_eq!(join_values(&values), "-5,.,2.0,x,ab");
        assert_eq!(join_values(&[]), ".");
    }

    #[test]
    fn value_type_roundtrips_through_header_spelling() {
        use super::ValueType;
        use std::str::FromStr;

        for value_type in [ValueType::Integer, ValueType::Float, ValueType::Flag, ValueType::Character, ValueType::String] {
            assert_eq!(ValueType::from_str(&value_type.to_string()), Ok(value_type));
        }
        assert!(ValueType::from_str("integer").is_err());
    }

    #[test]
    fn drawn_values_have_valid_text() {
        use super::{Alphabet, ValueParams, ValueType, draw_values, ESCAPED};
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(7);
        let params = ValueParams { alphabet: Alphabet::Printable, max_string_len: 12, missing_value_rate: 0.2 };

        for _ in 0..500 {
            for value in draw_values(ValueType::Integer, 3, &params, &mut rng) {
                let text = value.to_string();
                assert!(text == "." || text.parse::<i32>().is_ok_and(|x| x >= super::INTEGER_MIN));
            }
            for value in draw_values(ValueType::Float, 3, &params, &mut rng) {
                let text = value.to_string();
                assert!(text == "." || (text.contains('.') && text.parse::<f32>().is_ok_and(|x| x.is_finite())));
            }
            for value in draw_values(ValueType::Character, 3, &params, &mut rng) {
                let text = value.to_string();
                assert_eq!(text.chars().count(), 1);
                assert!(!ESCAPED.contains(&text.as_bytes()[0]));
            }
            for value in draw_values(ValueType::String, 3, &params, &mut rng) {
                let text = value.to_string();
                assert!(!text.is_empty());
                assert!(!text.contains([':', ';', '=', ',', ' ', '\t']));
            }
        }
    }

    #[test]
    fn flag_draws_no_values() {
        use super::{ValueParams, ValueType, draw_value, draw_values};
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(1);
        let params = ValueParams::default();

        assert_eq!(draw_value(ValueType::Flag, &params, &mut rng), None);
        assert!(draw_values(ValueType::Flag, 3, &params, &mut rng).is_empty());
    }

    #[test]
    fn draw_values_honors_count() {
        use super::{ValueParams, ValueType, draw_values};
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(3);
        let params = ValueParams::default();

        for count in 0..6 {
            assert_eq!(draw_values(ValueType::String, count, &params, &mut rng).len(), count);
        }
    }

    #[test]
    fn drawn_names_start_with_letter() {
        use super::draw_name;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let name = draw_name(6, &mut rng);
            assert!(name.len() <= 6 && !name.is_empty());
            assert!(name.as_bytes()[0].is_ascii_alphabetic());
            assert!(name.bytes().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}
