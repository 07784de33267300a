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

use crate::VcfConfig;
use crate::arity::{draw_count, resolve, Arity};
use crate::headers::HeaderMetadata;
use crate::values::{draw_flag, draw_values, Genotype, Value, ValueParams, ValueType};

/// Contents of one INFO entry.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    /// A set Flag, written as the bare key.
    Flag,
    Values(Vec<Value>),
}

/// Draws the INFO entries of a record.
///
/// Each declared field is present independently with `config.field_presence`.
/// Fields whose Number rule is undefined for this record, or that resolve to
/// zero values, are left out.
pub fn draw_info<R: Rng + ?Sized>(
    meta: &HeaderMetadata,
    allele_count: usize,
    ploidy: usize,
    config: &VcfConfig,
    params: &ValueParams,
    rng: &mut R,
) -> IndexMap<String, InfoValue> {
    let mut info: IndexMap<String, InfoValue> = IndexMap::new();
    for field in meta.info.values() {
        if !rng.random_bool(config.field_presence) {
            continue
        }
        if field.value_type == ValueType::Flag {
            if draw_flag(rng) {
                info.insert(field.key.clone(), InfoValue::Flag);
            }
            continue
        }

        let arity = resolve(&field.number, allele_count, ploidy);
        match draw_count(arity, config.max_number, rng) {
            Some(count) if count > 0 => {
                let values = draw_values(field.value_type, count, params, rng);
                info.insert(field.key.clone(), InfoValue::Values(values));
            },
            _ => (),
        }
    }
    info
}

/// FORMAT keys of a record and the values of every sample.
///
/// `samples[i][j]` holds the values of sample `i` for the field `keys[j]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleData {
    pub keys: Vec<String>,
    pub samples: Vec<Vec<Vec<Value>>>,
}

/// Draws the FORMAT column and the sample columns of a record.
///
/// The FORMAT keys are chosen once per record and apply to every sample. A
/// field with Number=. draws its value count separately for each sample.
/// Returns empty [SampleData] if the header has no samples or no FORMAT fields.
pub fn draw_samples<R: Rng + ?Sized>(
    meta: &HeaderMetadata,
    allele_count: usize,
    ploidy: usize,
    config: &VcfConfig,
    params: &ValueParams,
    rng: &mut R,
) -> SampleData {
    let mut data = SampleData::default();
    if !meta.has_sample_data() {
        return data
    }
    data.samples = vec![Vec::new(); meta.samples.len()];

    for field in meta.format.values() {
        if !rng.random_bool(config.field_presence) {
            continue
        }
        let arity = resolve(&field.number, allele_count, ploidy);
        if arity == Arity::Omitted {
            continue
        }

        data.keys.push(field.key.clone());
        for sample in data.samples.iter_mut() {
            let values = if field.is_genotype() {
                vec![Value::Genotype(Genotype::draw(allele_count, ploidy, params.missing_value_rate, rng))]
            } else {
                let count = draw_count(arity, config.max_number, rng).unwrap_or(0);
                draw_values(field.value_type, count, params, rng)
            };
            sample.push(values);
        }
    }

    if data.keys.is_empty() {
        data.samples.clear();
    }
    data
}
