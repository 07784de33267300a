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

//! Reading VCF text back into [HeaderMetadata] and [ParsedRecord]s.
//!
//! [Parser] consumes the header when it is created and then returns one body
//! line at a time using next(). Body lines are only split into their
//! columns, the values are checked against the header by
//! [validate](validate::validate).
//!
//! ## Usage
//!
//! ```rust
//! use randvcf::parser::Parser;
//! use std::io::Cursor;
//!
//! let text = [
//!     "##fileformat=VCFv4.3",
//!     "##FILTER=<ID=PASS,Description=\"All filters passed\">",
//!     "##contig=<ID=1>",
//!     "##INFO=<ID=Jw,Number=1,Type=Float,Description=\"INFO,Type=Float,Number=1\">",
//!     "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO",
//!     "1\t100\t.\tA\tC,G,T\t50.0\tPASS\tJw=0.0",
//!     "",
//! ].join("\n");
//!
//! let mut input = Cursor::new(text.into_bytes());
//! let mut parser = Parser::new(&mut input).unwrap();
//! assert!(parser.metadata().info.contains_key("Jw"));
//!
//! let record = parser.next().unwrap().unwrap();
//! assert_eq!(record.alternates, vec!["C", "G", "T"]);
//! assert_eq!(record.info, vec![("Jw".to_string(), Some("0.0".to_string()))]);
//! assert!(parser.next().is_none());
//! ```
//!

pub mod validate;

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use indexmap::map::IndexMap;
use noodles::vcf;
use noodles::vcf::header::record::value::map::{format, info};

use crate::arity::Number;
use crate::headers::{Category, ContigSpec, FieldSpec, FilterSpec, HeaderMetadata, FILEFORMAT};
use crate::printer::header::COLUMNS;
use crate::values::ValueType;

/// Problems found while reading or checking a VCF document.
///
/// `line` is the 1-based line number in the input.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("input is empty")]
    Empty,

    #[error("line 1: expected ##fileformat={expected}, found '{found}'")]
    FileFormat { expected: &'static str, found: String },

    #[error("line {line}: malformed header line '{text}'")]
    MalformedHeader { line: usize, text: String },

    #[error("line {line}: ##{kind} line is out of order")]
    HeaderOrder { line: usize, kind: String },

    #[error("line {line}: {source}")]
    Header { line: usize, source: vcf::header::ParseError },

    #[error("{category} field '{key}' uses a Number that VCFv4.3 does not define")]
    UnsupportedNumber { category: Category, key: String },

    #[error("{category} field '{key}' has unknown Type '{value_type}'")]
    UnsupportedType { category: Category, key: String, value_type: String },

    #[error("the #CHROM line is missing")]
    MissingColumnHeader,

    #[error("line {line}: malformed #CHROM line")]
    ColumnHeader { line: usize },

    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount { line: usize, expected: String, found: usize },

    #[error("line {line}: invalid {column} '{value}'")]
    InvalidColumn { line: usize, column: &'static str, value: String },

    #[error("line {line}: ID '{id}' is used by an earlier record")]
    DuplicateId { line: usize, id: String },

    #[error("line {line}: contig '{id}' is not declared")]
    UndeclaredContig { line: usize, id: String },

    #[error("line {line}: FILTER '{id}' is not declared")]
    UndeclaredFilter { line: usize, id: String },

    #[error("line {line}: {category} key '{key}' is not declared")]
    UndeclaredKey { line: usize, category: Category, key: String },

    #[error("line {line}: {category} key '{key}' is used twice")]
    RepeatedKey { line: usize, category: Category, key: String },

    #[error("line {line}: ALT allele '{allele}' is repeated or equals REF")]
    DuplicateAllele { line: usize, allele: String },

    #[error("line {line}: {category} field '{key}' has {count} values, Number={number} does not allow that")]
    Arity { line: usize, category: Category, key: String, number: Number, count: usize },

    #[error("line {line}: {category} field '{key}' has invalid {value_type} value '{value}'")]
    InvalidValue { line: usize, category: Category, key: String, value_type: ValueType, value: String },

    #[error("line {line}: sample {sample} has {found} fields but FORMAT lists {expected}")]
    SampleFieldCount { line: usize, sample: usize, expected: usize, found: usize },
}

/// A body line split into its columns.
///
/// ALT, INFO, FORMAT and the sample columns are split into their parts. A
/// `.` in ALT, INFO or FORMAT is stored as an empty vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecord {
    pub line: usize,
    pub chrom: String,
    pub pos: String,
    pub id: String,
    pub reference: String,
    pub alternates: Vec<String>,
    pub quality: String,
    pub filters: String,
    /// `KEY=value` entries, or `(KEY, None)` for a Flag.
    pub info: Vec<(String, Option<String>)>,
    pub format: Vec<String>,
    /// `samples[i][j]` is the text of sample `i` for the key `format[j]`.
    pub samples: Vec<Vec<String>>,
}

fn info_number(number: info::Number) -> Number {
    match number {
        info::Number::Count(n) => Number::Count(n),
        info::Number::AlternateBases => Number::A,
        info::Number::ReferenceAlternateBases => Number::R,
        info::Number::Samples => Number::G,
        info::Number::Unknown => Number::Unknown,
    }
}

// Local allele, ploidy and base modification counts are newer than VCFv4.3.
fn format_number(number: format::Number) -> Option<Number> {
    match number {
        format::Number::Count(n) => Some(Number::Count(n)),
        format::Number::AlternateBases => Some(Number::A),
        format::Number::ReferenceAlternateBases => Some(Number::R),
        format::Number::Samples => Some(Number::G),
        format::Number::Unknown => Some(Number::Unknown),
        _ => None,
    }
}

fn declared_type(
    category: Category,
    key: &str,
    value_type: &str,
) -> Result<ValueType, ValidationError> {
    value_type.parse::<ValueType>().map_err(|_| ValidationError::UnsupportedType {
        category,
        key: key.to_string(),
        value_type: value_type.to_string(),
    })
}

/// Converts the declarations of a parsed `header` into [HeaderMetadata].
///
/// Declarations keep the order they have in the header.
pub fn metadata_from_header(
    header: &vcf::Header,
) -> Result<HeaderMetadata, ValidationError> {
    let filters: Vec<FilterSpec> = header.filters().iter().map(|(id, filter)| {
        FilterSpec { id: id.clone(), description: filter.description().to_string() }
    }).collect();
    let contigs: Vec<ContigSpec> = header.contigs().keys().map(|id| ContigSpec { id: id.clone() }).collect();

    let mut infos: IndexMap<String, FieldSpec> = IndexMap::with_capacity(header.infos().len());
    for (key, field) in header.infos() {
        let value_type = declared_type(Category::Info, key, field.ty().as_ref())?;
        infos.insert(key.clone(), FieldSpec {
            category: Category::Info,
            key: key.clone(),
            value_type,
            number: info_number(field.number()),
            description: field.description().to_string(),
        });
    }

    let mut formats: IndexMap<String, FieldSpec> = IndexMap::with_capacity(header.formats().len());
    for (key, field) in header.formats() {
        let value_type = declared_type(Category::Format, key, field.ty().as_ref())?;
        let number = format_number(field.number()).ok_or_else(|| {
            ValidationError::UnsupportedNumber { category: Category::Format, key: key.clone() }
        })?;
        formats.insert(key.clone(), FieldSpec {
            category: Category::Format,
            key: key.clone(),
            value_type,
            number,
            description: field.description().to_string(),
        });
    }

    Ok(HeaderMetadata {
        filters,
        contigs,
        info: infos,
        format: formats,
        samples: header.sample_names().iter().cloned().collect(),
    })
}

// Position of each known meta line in the generated header layout.
fn header_rank(kind: &str) -> Option<usize> {
    match kind {
        "fileformat" => Some(0),
        "FILTER" => Some(1),
        "source" => Some(2),
        "contig" => Some(3),
        "INFO" => Some(4),
        "FORMAT" => Some(5),
        _ => None,
    }
}

pub struct Parser<'a, R: Read> {
    reader: BufReader<&'a mut R>,
    meta: HeaderMetadata,
    source: Option<String>,

    line: usize,
}

impl<'a, R: Read> Parser<'a, R> {
    /// Reads the header from `conn`.
    ///
    /// The declarations are parsed with noodles. Meta lines must also appear
    /// in the order fileformat, FILTER, source, contig, INFO, FORMAT and a
    /// `FORMAT` column must be followed by at least one sample. Other
    /// `##key=value` lines are kept by noodles and otherwise ignored.
    pub fn new(
        conn: &'a mut R,
    ) -> Result<Self, ValidationError> {
        let mut reader = BufReader::new(conn);
        let mut header_parser = vcf::header::Parser::default();
        let mut source: Option<String> = None;
        let mut line: usize = 0;
        let mut rank: usize = 0;

        let mut buf = String::new();
        loop {
            buf.clear();
            if reader.read_line(&mut buf)? == 0 {
                return Err(if line == 0 { ValidationError::Empty } else { ValidationError::MissingColumnHeader })
            }
            line += 1;
            let text = buf.trim_end_matches(['\n', '\r']);

            if line == 1 {
                match text.strip_prefix("##fileformat=") {
                    Some(version) if version == FILEFORMAT => (),
                    _ => return Err(ValidationError::FileFormat { expected: FILEFORMAT, found: text.to_string() }),
                }
            } else if let Some(meta_line) = text.strip_prefix("##") {
                let (kind, value) = meta_line.split_once('=').ok_or_else(|| {
                    ValidationError::MalformedHeader { line, text: text.to_string() }
                })?;

                if let Some(kind_rank) = header_rank(kind) {
                    if kind_rank < rank || kind_rank == 0 {
                        return Err(ValidationError::HeaderOrder { line, kind: kind.to_string() })
                    }
                    rank = kind_rank;
                }

                if kind == "source" {
                    if source.is_some() {
                        return Err(ValidationError::HeaderOrder { line, kind: kind.to_string() })
                    }
                    source = Some(value.to_string());
                }
            } else if text.starts_with("#CHROM") {
                let columns: Vec<&str> = text.split('\t').collect();
                if columns.len() < COLUMNS.len() || columns[..COLUMNS.len()] != COLUMNS || columns.len() == COLUMNS.len() + 1 {
                    return Err(ValidationError::ColumnHeader { line })
                }
            } else {
                return Err(ValidationError::MissingColumnHeader)
            }

            header_parser.parse_partial(text.as_bytes()).map_err(|e| ValidationError::Header { line, source: e })?;

            if text.starts_with("#CHROM") {
                break
            }
        }

        let header = header_parser.finish().map_err(|e| ValidationError::Header { line, source: e })?;
        let meta = metadata_from_header(&header)?;

        log::debug!("Read a header of {} lines with {} samples", line, meta.samples.len());

        Ok(Parser { reader, meta, source, line })
    }
}

impl<R: Read> Parser<'_, R> {
    /// Declarations read from the header.
    pub fn metadata(&self) -> &HeaderMetadata {
        &self.meta
    }

    /// Contents of the `##source` line, if there was one.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn split_line(
        &self,
        text: &str,
    ) -> Result<ParsedRecord, ValidationError> {
        let line = self.line;
        let columns: Vec<&str> = text.split('\t').collect();

        let n_fixed = COLUMNS.len();
        let n_full = n_fixed + 1 + self.meta.samples.len();
        let shape_ok = columns.len() == n_fixed || (self.meta.has_samples() && columns.len() == n_full);
        if !shape_ok {
            let expected = if self.meta.has_samples() { format!("{} or {}", n_fixed, n_full) } else { n_fixed.to_string() };
            return Err(ValidationError::ColumnCount { line, expected, found: columns.len() })
        }

        let split_dot = |text: &str, separator: char| -> Vec<String> {
            if text == "." {
                Vec::new()
            } else {
                text.split(separator).map(|x| x.to_string()).collect()
            }
        };

        let info: Vec<(String, Option<String>)> = split_dot(columns[7], ';').into_iter().map(|entry| {
            match entry.split_once('=') {
                Some((key, value)) => (key.to_string(), Some(value.to_string())),
                None => (entry, None),
            }
        }).collect();

        let (format, samples) = if columns.len() == n_full {
            let format = split_dot(columns[8], ':');
            let samples = columns[9..].iter().map(|x| x.split(':').map(|y| y.to_string()).collect()).collect();
            (format, samples)
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(ParsedRecord {
            line,
            chrom: columns[0].to_string(),
            pos: columns[1].to_string(),
            id: columns[2].to_string(),
            reference: columns[3].to_string(),
            alternates: split_dot(columns[4], ','),
            quality: columns[5].to_string(),
            filters: columns[6].to_string(),
            info,
            format,
            samples,
        })
    }
}

impl<R: Read> Iterator for Parser<'_, R> {
    type Item = Result<ParsedRecord, ValidationError>;

    fn next(
        &mut self,
    ) -> Option<Result<ParsedRecord, ValidationError>> {
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line += 1;
                let text = buf.trim_end_matches(['\n', '\r']);
                Some(self.split_line(text))
            },
            Err(e) => Some(Err(e.into())),
        }
    }
}
