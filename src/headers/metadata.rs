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

use crate::VcfConfig;
use crate::headers::fields::{draw_field_spec, Category, FieldSpec};
use crate::values::{draw_name, draw_string, Alphabet, ALPHANUMERIC};

/// Version written to the `##fileformat` line.
pub const FILEFORMAT: &str = "VCFv4.3";

const CONTIG_REST: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_.-";

/// A `##contig` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigSpec {
    pub id: String,
}

impl ContigSpec {
    pub fn header_line(&self) -> String {
        format!("##contig=<ID={}>", self.id)
    }
}

/// A `##FILTER` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub id: String,
    pub description: String,
}

impl FilterSpec {
    pub fn pass() -> Self {
        FilterSpec { id: "PASS".to_string(), description: "All filters passed".to_string() }
    }

    pub fn is_pass(&self) -> bool {
        self.id == "PASS"
    }

    pub fn header_line(&self) -> String {
        format!("##FILTER=<ID={},Description=\"{}\">", self.id, self.description)
    }
}

/// Everything declared in the header of one document.
///
/// Created once by [HeaderMetadata::generate] and then only read: every
/// record of the document is generated against the same metadata.
///
/// `filters` always starts with PASS. INFO and FORMAT declarations are keyed
/// by their ID and keep declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMetadata {
    pub filters: Vec<FilterSpec>,
    pub contigs: Vec<ContigSpec>,
    pub info: IndexMap<String, FieldSpec>,
    pub format: IndexMap<String, FieldSpec>,
    pub samples: Vec<String>,
}

impl Default for HeaderMetadata {
    fn default() -> Self {
        HeaderMetadata {
            filters: vec![FilterSpec::pass()],
            contigs: Vec::new(),
            info: IndexMap::new(),
            format: IndexMap::new(),
            samples: Vec::new(),
        }
    }
}

/// Appends random characters from `alphabet` to `name` until it is not in `taken`.
fn make_unique<R: Rng + ?Sized>(
    mut name: String,
    taken: &[String],
    alphabet: &[u8],
    rng: &mut R,
) -> String {
    while taken.contains(&name) {
        name.push(*alphabet.choose(rng).unwrap_or(&b'x') as char);
    }
    name
}

fn draw_contig_id<R: Rng + ?Sized>(max_len: usize, rng: &mut R) -> String {
    let first = *ALPHANUMERIC.choose(rng).unwrap_or(&b'1') as char;
    let len = rng.random_range(0..max_len.max(1));
    let rest = (0..len).map(|_| *CONTIG_REST.choose(rng).unwrap_or(&b'1') as char);
    std::iter::once(first).chain(rest).collect()
}

impl HeaderMetadata {
    /// Generates the header declarations for one document.
    ///
    /// Assumes that `config` has been validated.
    pub fn generate<R: Rng + ?Sized>(
        config: &VcfConfig,
        rng: &mut R,
    ) -> Self {
        let mut meta = HeaderMetadata::default();

        let n_contigs = rng.random_range(config.min_contigs..=config.max_contigs);
        let mut contig_ids: Vec<String> = Vec::with_capacity(n_contigs);
        for _ in 0..n_contigs {
            let id = make_unique(draw_contig_id(config.max_string_len, rng), &contig_ids, CONTIG_REST, rng);
            contig_ids.push(id);
        }
        meta.contigs = contig_ids.into_iter().map(|id| ContigSpec { id }).collect();

        let n_filters = rng.random_range(0..=config.max_filters);
        // "0" is not a valid filter id
        let mut filter_ids: Vec<String> = vec!["PASS".to_string(), "0".to_string()];
        for _ in 0..n_filters {
            let id = make_unique(draw_name(config.max_string_len, rng), &filter_ids, ALPHANUMERIC, rng);
            let description = draw_string(Alphabet::Alphanumeric, config.max_string_len, rng);
            filter_ids.push(id.clone());
            meta.filters.push(FilterSpec { id, description });
        }

        let n_info = rng.random_range(usize::from(config.force_info)..=config.max_info_fields);
        for _ in 0..n_info {
            let field = draw_field_spec(Category::Info, &meta.info, config.max_number, rng);
            meta.info.insert(field.key.clone(), field);
        }

        if config.genotypes {
            let gt = FieldSpec::genotype();
            meta.format.insert(gt.key.clone(), gt);
        }
        let n_format = rng.random_range(usize::from(config.force_format)..=config.max_format_fields);
        for _ in 0..n_format {
            let field = draw_field_spec(Category::Format, &meta.format, config.max_number, rng);
            meta.format.insert(field.key.clone(), field);
        }

        let n_samples = rng.random_range(config.sample_floor()..=config.max_samples);
        for _ in 0..n_samples {
            let name = make_unique(draw_name(config.max_string_len, rng), &meta.samples, ALPHANUMERIC, rng);
            meta.samples.push(name);
        }

        log::debug!(
            "Declared {} contigs, {} filters, {} INFO fields, {} FORMAT fields and {} samples",
            meta.contigs.len(), meta.filters.len(), meta.info.len(), meta.format.len(), meta.samples.len(),
        );

        meta
    }

    /// Filters other than PASS.
    pub fn failed_filters(&self) -> Vec<&FilterSpec> {
        self.filters.iter().filter(|x| !x.is_pass()).collect()
    }

    pub fn contig_index(&self, id: &str) -> Option<usize> {
        self.contigs.iter().position(|x| x.id == id)
    }

    pub fn has_filter(&self, id: &str) -> bool {
        self.filters.iter().any(|x| x.id == id)
    }

    pub fn has_samples(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Records carry FORMAT and sample columns only if this is true.
    pub fn has_sample_data(&self) -> bool {
        self.has_samples() && !self.format.is_empty()
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn pass_filter_line() {
        use super::FilterSpec;

        let expected = "##FILTER=<ID=PASS,Description=\"All filters passed\">";
        assert_eq!(FilterSpec::pass().header_line(), expected);
    }

    #[test]
    fn generated_metadata_respects_bounds() {
        use super::HeaderMetadata;
        use crate::VcfConfig;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let config = VcfConfig { min_contigs: 2, max_contigs: 4, max_filters: 3, min_samples: 1, max_samples: 3, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..200 {
            let meta = HeaderMetadata::generate(&config, &mut rng);
            assert!((2..=4).contains(&meta.contigs.len()));
            assert!((1..=4).contains(&meta.filters.len()));
            assert!(meta.filters[0].is_pass());
            assert_eq!(meta.filters.iter().filter(|x| x.is_pass()).count(), 1);
            assert!(meta.info.len() <= config.max_info_fields);
            assert!(meta.format.len() <= config.max_format_fields);
            assert!((1..=3).contains(&meta.samples.len()));
        }
    }

    #[test]
    fn generated_ids_are_unique() {
        use super::HeaderMetadata;
        use crate::VcfConfig;
        use rand::SeedableRng;
        use rand::rngs::StdRng;
        use std::collections::HashSet;

        let config = VcfConfig { min_contigs: 20, max_contigs: 20, max_filters: 20, min_samples: 20, max_samples: 20, max_string_len: 1, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(22);

        for _ in 0..50 {
            let meta = HeaderMetadata::generate(&config, &mut rng);
            let contigs: HashSet<&String> = meta.contigs.iter().map(|x| &x.id).collect();
            let filters: HashSet<&String> = meta.filters.iter().map(|x| &x.id).collect();
            let samples: HashSet<&String> = meta.samples.iter().collect();
            assert_eq!(contigs.len(), meta.contigs.len());
            assert_eq!(filters.len(), meta.filters.len());
            assert_eq!(samples.len(), meta.samples.len());
        }
    }

    #[test]
    fn forced_fields_are_declared() {
        use super::HeaderMetadata;
        use crate::VcfConfig;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let config = VcfConfig { force_info: true, force_format: true, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(23);

        for _ in 0..200 {
            let meta = HeaderMetadata::generate(&config, &mut rng);
            assert!(!meta.info.is_empty());
            assert!(!meta.format.is_empty());
            assert!(meta.has_sample_data());
        }
    }

    #[test]
    fn genotype_field_is_declared_first() {
        use super::HeaderMetadata;
        use crate::VcfConfig;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let config = VcfConfig { genotypes: true, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(24);

        for _ in 0..50 {
            let meta = HeaderMetadata::generate(&config, &mut rng);
            let (key, field) = meta.format.first().unwrap();
            assert_eq!(key, "GT");
            assert!(field.is_genotype());
        }
    }
}
