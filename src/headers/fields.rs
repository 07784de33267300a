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
use indexmap::map::IndexMap;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::arity::Number;
use crate::values::ValueType;

/// Reserved INFO keys (VCFv4.3 Table 1 and the structural variant keys).
pub const RESERVED_INFO_KEYS: &[&str] = &[
    "AA", "AC", "AD", "ADF", "ADR", "AF", "AN", "BQ", "CIGAR", "DB", "DP",
    "END", "H2", "H3", "MQ", "MQ0", "NS", "SB", "SOMATIC", "VALIDATED", "1000G",
    "IMPRECISE", "NOVEL", "SVTYPE", "SVLEN", "CIPOS", "CIEND", "HOMLEN",
    "HOMSEQ", "BKPTID", "MEINFO", "METRANS", "DGVID", "DBVARID", "DBRIPID",
    "MATEID", "PARID", "EVENT", "CILEN", "DPADJ", "CN", "CNADJ", "CICN", "CICNADJ",
];

/// Reserved genotype keys (VCFv4.3 Table 2 and the structural variant keys).
pub const RESERVED_FORMAT_KEYS: &[&str] = &[
    "AD", "ADF", "ADR", "DP", "EC", "FT", "GL", "GP", "GQ", "GT", "HQ", "MQ",
    "PL", "PP", "PQ", "PS", "CN", "CNQ", "CNL", "CNP", "NQ", "HAP", "AHAP",
];

const KEY_FIRST: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
const KEY_REST: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_.";

/// Header section that a [FieldSpec] is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Info,
    Format,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Category::Info => write!(f, "INFO"),
            Category::Format => write!(f, "FORMAT"),
        }
    }
}

/// Declaration of an INFO or FORMAT field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub category: Category,
    pub key: String,
    pub value_type: ValueType,
    pub number: Number,
    pub description: String,
}

impl FieldSpec {
    /// Creates a declaration whose description states its own section, type and number.
    pub fn new(
        category: Category,
        key: &str,
        value_type: ValueType,
        number: Number,
    ) -> Self {
        let description = format!("{},Type={},Number={}", category, value_type, number);
        FieldSpec { category, key: key.to_string(), value_type, number, description }
    }

    /// The standard GT declaration.
    pub fn genotype() -> Self {
        FieldSpec {
            category: Category::Format,
            key: "GT".to_string(),
            value_type: ValueType::String,
            number: Number::Count(1),
            description: "Genotype".to_string(),
        }
    }

    pub fn is_genotype(&self) -> bool {
        self.category == Category::Format && self.key == "GT"
    }

    /// Formats the `##INFO=<...>` or `##FORMAT=<...>` line without a newline.
    pub fn header_line(&self) -> String {
        format!(
            "##{}=<ID={},Number={},Type={},Description=\"{}\">",
            self.category, self.key, self.number, self.value_type, self.description,
        )
    }
}

/// Keys that generated fields must not use in `category`.
pub fn is_reserved_key(category: Category, key: &str) -> bool {
    match category {
        Category::Info => RESERVED_INFO_KEYS.contains(&key) || key.eq_ignore_ascii_case("id"),
        Category::Format => RESERVED_FORMAT_KEYS.contains(&key),
    }
}

/// Checks that `key` matches `[A-Za-z_][0-9A-Za-z_.]*` or is `1000G`.
pub fn is_valid_key(key: &str) -> bool {
    let mut bytes = key.bytes();
    match bytes.next() {
        Some(first) if KEY_FIRST.contains(&first) => bytes.all(|c| KEY_REST.contains(&c)),
        _ => key == "1000G",
    }
}

/// Draws a key that is valid, not reserved and not in `taken`.
///
/// Colliding keys are extended one character at a time until they are free,
/// which always terminates because `taken` is finite.
pub fn draw_field_key<R: Rng + ?Sized>(
    category: Category,
    taken: &IndexMap<String, FieldSpec>,
    rng: &mut R,
) -> String {
    let mut key = String::new();
    key.push(*KEY_FIRST.choose(rng).unwrap_or(&b'X') as char);
    let len = rng.random_range(0..3);
    (0..len).for_each(|_| key.push(*KEY_REST.choose(rng).unwrap_or(&b'X') as char));

    while taken.contains_key(&key) || is_reserved_key(category, &key) {
        key.push(*KEY_REST.choose(rng).unwrap_or(&b'X') as char);
    }
    key
}

/// Draws a value type allowed in `category`, FORMAT fields cannot be Flags.
pub fn draw_value_type<R: Rng + ?Sized>(
    category: Category,
    rng: &mut R,
) -> ValueType {
    let info = [ValueType::Integer, ValueType::Float, ValueType::Flag, ValueType::Character, ValueType::String];
    let format = [ValueType::Integer, ValueType::Float, ValueType::Character, ValueType::String];
    let choices: &[ValueType] = match category {
        Category::Info => &info,
        Category::Format => &format,
    };
    *choices.choose(rng).unwrap_or(&ValueType::Integer)
}

/// Draws a Number rule compatible with `category` and `value_type`.
///
/// Flags always get `Number=0`, other types never do. Number=G is only drawn
/// for FORMAT fields.
pub fn draw_number<R: Rng + ?Sized>(
    category: Category,
    value_type: ValueType,
    max_number: usize,
    rng: &mut R,
) -> Number {
    if value_type == ValueType::Flag {
        return Number::Count(0)
    }
    let n_rules = match category {
        Category::Info => 4,
        Category::Format => 5,
    };
    match rng.random_range(0..n_rules) {
        0 => Number::Count(rng.random_range(1..=max_number.max(1))),
        1 => Number::A,
        2 => Number::R,
        3 => Number::Unknown,
        _ => Number::G,
    }
}

/// Draws a complete declaration that does not collide with `taken`.
pub fn draw_field_spec<R: Rng + ?Sized>(
    category: Category,
    taken: &IndexMap<String, FieldSpec>,
    max_number: usize,
    rng: &mut R,
) -> FieldSpec {
    let key = draw_field_key(category, taken, rng);
    let value_type = draw_value_type(category, rng);
    let number = draw_number(category, value_type, max_number, rng);
    FieldSpec::new(category, &key, value_type, number)
}
