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
use std::collections::HashSet;
use std::io::Read;
use std::ops::RangeInclusive;

use crate::arity::count_matches;
use crate::headers::{Category, FieldSpec, HeaderMetadata};
use crate::parser::{ParsedRecord, Parser, ValidationError};
use crate::records::alleles::BASES;
use crate::values::genotype::parse_genotype;
use crate::values::{ValueType, INTEGER_MIN};

/// Counts gathered while checking a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub n_records: usize,
    pub n_samples: usize,
    pub n_contigs: usize,
    pub n_filters: usize,
    pub n_info: usize,
    pub n_format: usize,
}

/// Checks a single value against the declared type of its field.
pub fn is_valid_value(value_type: ValueType, text: &str) -> bool {
    if text == "." {
        return true
    }
    match value_type {
        ValueType::Integer => text.parse::<i32>().is_ok_and(|x| x >= INTEGER_MIN),
        ValueType::Float => text.parse::<f32>().is_ok(),
        ValueType::Character => text.chars().count() == 1,
        ValueType::String => !text.is_empty() && !text.chars().any(|c| c.is_whitespace() || ";:=,".contains(c)),
        ValueType::Flag => false,
    }
}

fn check_values(
    field: &FieldSpec,
    text: &str,
    allele_count: usize,
    ploidies: RangeInclusive<usize>,
    line: usize,
) -> Result<(), ValidationError> {
    let values: Vec<&str> = text.split(',').collect();
    for value in &values {
        if !is_valid_value(field.value_type, value) {
            return Err(ValidationError::InvalidValue {
                line, category: field.category, key: field.key.clone(), value_type: field.value_type, value: value.to_string(),
            })
        }
    }
    if !count_matches(&field.number, values.len(), allele_count, ploidies) {
        return Err(ValidationError::Arity {
            line, category: field.category, key: field.key.clone(), number: field.number, count: values.len(),
        })
    }
    Ok(())
}

// Mate contig of a breakend such as `G]chr2:321]`, None for other alleles.
fn breakend_mate(allele: &str) -> Option<&str> {
    let start = allele.find(['[', ']'])? + 1;
    let rest = &allele[start..];
    let colon = rest.rfind(':')?;
    Some(&rest[..colon])
}

fn check_alleles(
    record: &ParsedRecord,
    meta: &HeaderMetadata,
) -> Result<(), ValidationError> {
    let line = record.line;
    let ref_ok = !record.reference.is_empty()
        && record.reference.bytes().all(|c| BASES.contains(&c.to_ascii_uppercase()));
    if !ref_ok {
        return Err(ValidationError::InvalidColumn { line, column: "REF", value: record.reference.clone() })
    }

    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(&record.reference);
    for allele in &record.alternates {
        if allele.is_empty() || allele.contains(char::is_whitespace) {
            return Err(ValidationError::InvalidColumn { line, column: "ALT", value: allele.clone() })
        }
        if !seen.insert(allele) {
            return Err(ValidationError::DuplicateAllele { line, allele: allele.clone() })
        }
        if let Some(mate) = breakend_mate(allele) {
            if meta.contig_index(mate).is_none() {
                return Err(ValidationError::UndeclaredContig { line, id: mate.to_string() })
            }
        }
    }
    Ok(())
}

fn check_filters(
    record: &ParsedRecord,
    meta: &HeaderMetadata,
) -> Result<(), ValidationError> {
    if record.filters == "." {
        return Ok(())
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for id in record.filters.split(';') {
        if id != "PASS" && !meta.has_filter(id) {
            return Err(ValidationError::UndeclaredFilter { line: record.line, id: id.to_string() })
        }
        if !seen.insert(id) {
            return Err(ValidationError::InvalidColumn { line: record.line, column: "FILTER", value: record.filters.clone() })
        }
    }
    Ok(())
}

fn check_info(
    record: &ParsedRecord,
    meta: &HeaderMetadata,
    ploidies: RangeInclusive<usize>,
) -> Result<(), ValidationError> {
    let line = record.line;
    let allele_count = 1 + record.alternates.len();
    let mut seen: HashSet<&str> = HashSet::new();
    for (key, value) in &record.info {
        let field = meta.info.get(key).ok_or_else(|| ValidationError::UndeclaredKey { line, category: Category::Info, key: key.clone() })?;
        if !seen.insert(key) {
            return Err(ValidationError::RepeatedKey { line, category: Category::Info, key: key.clone() })
        }
        match value {
            None if field.value_type == ValueType::Flag => (),
            Some(text) if field.value_type != ValueType::Flag => check_values(field, text, allele_count, ploidies.clone(), line)?,
            _ => return Err(ValidationError::InvalidValue {
                line, category: Category::Info, key: key.clone(), value_type: field.value_type, value: value.clone().unwrap_or_default(),
            }),
        }
    }
    Ok(())
}

fn check_samples(
    record: &ParsedRecord,
    meta: &HeaderMetadata,
    ploidies: RangeInclusive<usize>,
) -> Result<(), ValidationError> {
    let line = record.line;
    let allele_count = 1 + record.alternates.len();

    if record.format.is_empty() {
        // `.` FORMAT column, every sample must be `.` too
        for (idx, sample) in record.samples.iter().enumerate() {
            if sample.len() != 1 || sample[0] != "." {
                return Err(ValidationError::SampleFieldCount { line, sample: idx, expected: 0, found: sample.len() })
            }
        }
        return Ok(())
    }

    let mut fields: Vec<&FieldSpec> = Vec::with_capacity(record.format.len());
    for key in &record.format {
        let field = meta.format.get(key).ok_or_else(|| ValidationError::UndeclaredKey { line, category: Category::Format, key: key.clone() })?;
        if fields.iter().any(|x| &x.key == key) {
            return Err(ValidationError::RepeatedKey { line, category: Category::Format, key: key.clone() })
        }
        if field.value_type == ValueType::Flag {
            return Err(ValidationError::InvalidValue { line, category: Category::Format, key: key.clone(), value_type: ValueType::Flag, value: String::new() })
        }
        fields.push(field);
    }

    for (idx, sample) in record.samples.iter().enumerate() {
        if sample.len() != fields.len() {
            return Err(ValidationError::SampleFieldCount { line, sample: idx, expected: fields.len(), found: sample.len() })
        }

        // GT fixes the ploidy of this sample
        let mut sample_ploidies = ploidies.clone();
        for (field, text) in fields.iter().zip(sample.iter()) {
            if !field.is_genotype() {
                continue
            }
            let gt = parse_genotype(text).filter(|gt| gt.alleles.iter().flatten().all(|x| *x < allele_count));
            match gt {
                Some(gt) => sample_ploidies = gt.ploidy()..=gt.ploidy(),
                None => return Err(ValidationError::InvalidValue {
                    line, category: Category::Format, key: field.key.clone(), value_type: field.value_type, value: text.clone(),
                }),
            }
        }

        for (field, text) in fields.iter().zip(sample.iter()) {
            if field.is_genotype() {
                continue
            }
            // a missing value list stands for zero values
            if text == "." && count_matches(&field.number, 0, allele_count, sample_ploidies.clone()) {
                continue
            }
            check_values(field, text, allele_count, sample_ploidies.clone(), line)?;
        }
    }
    Ok(())
}

/// Checks one parsed body line against the declarations in `meta`.
///
/// `ids` collects the IDs of earlier records, an ID may only be used once.
pub fn check_record(
    record: &ParsedRecord,
    meta: &HeaderMetadata,
    ploidies: RangeInclusive<usize>,
    ids: &mut HashSet<String>,
) -> Result<(), ValidationError> {
    let line = record.line;

    if meta.contig_index(&record.chrom).is_none() {
        return Err(ValidationError::UndeclaredContig { line, id: record.chrom.clone() })
    }
    if record.pos.parse::<u32>().is_err() {
        return Err(ValidationError::InvalidColumn { line, column: "POS", value: record.pos.clone() })
    }
    if record.id != "." {
        let id_ok = !record.id.is_empty() && !record.id.contains(|c: char| c.is_whitespace() || c == ';');
        if !id_ok {
            return Err(ValidationError::InvalidColumn { line, column: "ID", value: record.id.clone() })
        }
        if !ids.insert(record.id.clone()) {
            return Err(ValidationError::DuplicateId { line, id: record.id.clone() })
        }
    }
    check_alleles(record, meta)?;
    if record.quality != "." && !record.quality.parse::<f32>().is_ok_and(|x| x >= 0.0) {
        return Err(ValidationError::InvalidColumn { line, column: "QUAL", value: record.quality.clone() })
    }
    check_filters(record, meta)?;
    check_info(record, meta, ploidies.clone())?;
    check_samples(record, meta, ploidies)?;
    Ok(())
}

/// Reads a VCF document from `conn` and checks every line.
///
/// Checks the header layout, the column counts of body lines, that every
/// contig, filter and key used in the body is declared, that value counts
/// match the Number of their declaration, that ALT alleles are distinct and
/// that values parse as their declared type. Number=G accepts the genotype
/// count of any ploidy in `ploidies` unless the sample has a GT value, in
/// which case its ploidy is used.
///
/// Returns the first problem found.
pub fn validate<R: Read>(
    conn: &mut R,
    ploidies: RangeInclusive<usize>,
) -> Result<Summary, ValidationError> {
    let parser = Parser::new(conn)?;
    let meta = parser.metadata().clone();

    let mut summary = Summary {
        n_samples: meta.samples.len(),
        n_contigs: meta.contigs.len(),
        n_filters: meta.filters.len(),
        n_info: meta.info.len(),
        n_format: meta.format.len(),
        ..Default::default()
    };

    let mut ids: HashSet<String> = HashSet::new();
    for record in parser {
        check_record(&record?, &meta, ploidies.clone(), &mut ids)?;
        summary.n_records += 1;
    }

    log::info!("Checked {} records against {} samples", summary.n_records, summary.n_samples);
    Ok(summary)
}
