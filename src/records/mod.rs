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

//! Body records generated against a shared [HeaderMetadata].
//!
//! A [Record] is drawn one column at a time, in an order where every column
//! only depends on columns that are already known:
//!
//!   1. CHROM from the declared contigs.
//!   2. POS.
//!   3. ID, `.` or a name ending in the record index.
//!   4. REF.
//!   5. ALT, `.` or alleles that differ from REF and from each other.
//!   6. QUAL.
//!   7. FILTER, `.`, PASS or declared filters.
//!   8. The ploidy of the record.
//!   9. INFO, value counts resolved from the allele count.
//!  10. FORMAT and sample columns, value counts resolved from the allele
//!      count and the ploidy.
//!
//! Since the allele count and the ploidy are fixed before any field values
//! are drawn, every INFO and FORMAT field gets the right number of values
//! without retries.
//!
//! Use [Records] to iterate over the records of a document:
//!
//! ```rust
//! use randvcf::VcfConfig;
//! use randvcf::headers::HeaderMetadata;
//! use randvcf::records::Records;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let config = VcfConfig::default();
//! let mut rng = StdRng::seed_from_u64(1);
//! let meta = HeaderMetadata::generate(&config, &mut rng);
//!
//! let records: Vec<_> = Records::new(&meta, &config, 4, &mut rng).collect();
//! assert_eq!(records.len(), 4);
//! assert!(records.iter().all(|x| meta.contig_index(&x.chrom).is_some()));
//! ```
//!

pub mod alleles;
pub mod fields;

pub use alleles::Allele;
pub use fields::{InfoValue, SampleData};

use indexmap::map::IndexMap;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::VcfConfig;
use crate::headers::HeaderMetadata;
use crate::values::{draw_quality, Value, ValueParams, ALPHANUMERIC};

/// Contents of the FILTER column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filters {
    Missing,
    Pass,
    /// Declared filters that failed, in the order they are written.
    Failed(Vec<String>),
}

impl std::fmt::Display for Filters {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Filters::Missing => write!(f, "."),
            Filters::Pass => write!(f, "PASS"),
            Filters::Failed(ids) => write!(f, "{}", ids.join(";")),
        }
    }
}

/// One body row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub chrom: String,
    pub pos: u32,
    pub id: Option<String>,
    pub reference: String,
    /// Empty if the ALT column is `.`.
    pub alternates: Vec<Allele>,
    pub quality: Option<f32>,
    pub filters: Filters,
    pub info: IndexMap<String, InfoValue>,
    /// Ploidy used to size Number=G fields.
    pub ploidy: usize,
    pub sample_data: SampleData,
}

impl Record {
    /// Number of alleles including REF.
    pub fn allele_count(&self) -> usize {
        1 + self.alternates.len()
    }

    pub fn format_keys(&self) -> &[String] {
        &self.sample_data.keys
    }

    pub fn samples(&self) -> &[Vec<Vec<Value>>] {
        &self.sample_data.samples
    }
}

/// Draws an ID made of letters followed by `index`, or None for `.`.
///
/// The letters never contain digits, so IDs of different records always differ.
pub fn draw_record_id<R: Rng + ?Sized>(index: usize, max_len: usize, rng: &mut R) -> Option<String> {
    if rng.random_bool(0.2) {
        return None
    }
    let len = rng.random_range(1..=max_len.max(1));
    let letters: String = (0..len).map(|_| *ALPHANUMERIC[..52].choose(rng).unwrap_or(&b'r') as char).collect();
    Some(format!("{}{}", letters, index))
}

/// Draws the FILTER column from the filters declared in `meta`.
pub fn draw_filters<R: Rng + ?Sized>(meta: &HeaderMetadata, rng: &mut R) -> Filters {
    let failed = meta.failed_filters();
    match rng.random_range(0..3) {
        0 => Filters::Missing,
        2 if !failed.is_empty() => {
            let n = rng.random_range(1..=failed.len());
            Filters::Failed(failed.choose_multiple(rng, n).map(|x| x.id.clone()).collect())
        },
        _ => Filters::Pass,
    }
}

/// Draws the `index`th record of a document.
///
/// Assumes that `config` has been validated and that `meta` declares at
/// least one contig.
pub fn generate_record<R: Rng + ?Sized>(
    meta: &HeaderMetadata,
    config: &VcfConfig,
    params: &ValueParams,
    index: usize,
    rng: &mut R,
) -> Record {
    let chrom = meta.contigs.choose(rng).map(|x| x.id.clone()).unwrap_or_default();
    let pos = rng.random_range(config.min_pos..=config.max_pos);
    let id = draw_record_id(index, config.max_string_len, rng);
    let reference = alleles::draw_bases(config.max_allele_len, rng);
    let alternates = alleles::draw_alternates(&reference, meta, config, rng);
    let quality = if rng.random_bool(0.2) { None } else { Some(draw_quality(rng)) };
    let filters = draw_filters(meta, rng);

    let allele_count = 1 + alternates.len();
    let ploidy = rng.random_range(config.min_ploidy..=config.max_ploidy);

    let info = fields::draw_info(meta, allele_count, ploidy, config, params, rng);
    let sample_data = fields::draw_samples(meta, allele_count, ploidy, config, params, rng);

    Record { chrom, pos, id, reference, alternates, quality, filters, info, ploidy, sample_data }
}

/// Iterator that draws `n_records` records against one [HeaderMetadata].
pub struct Records<'a, R: Rng + ?Sized> {
    meta: &'a HeaderMetadata,
    config: &'a VcfConfig,
    params: ValueParams,
    rng: &'a mut R,

    index: usize,
    n_records: usize,
}

impl<'a, R: Rng + ?Sized> Records<'a, R> {
    pub fn new(
        meta: &'a HeaderMetadata,
        config: &'a VcfConfig,
        n_records: usize,
        rng: &'a mut R,
    ) -> Self {
        Records { meta, config, params: ValueParams::from(config), rng, index: 0, n_records }
    }
}

impl<R: Rng + ?Sized> Iterator for Records<'_, R> {
    type Item = Record;

    fn next(
        &mut self,
    ) -> Option<Record> {
        if self.index >= self.n_records {
            return None
        }
        let record = generate_record(self.meta, self.config, &self.params, self.index, self.rng);
        self.index += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n_records - self.index;
        (remaining, Some(remaining))
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_filters() {
        use super::Filters;

        assert_eq!(Filters::Missing.to_string(), ".");
        assert_eq!(Filters::Pass.to_string(), "PASS");
        assert_eq!(Filters::Failed(vec!["q10".to_string(), "s50".to_string()]).to_string(), "q10;s50");
    }

    #[test]
    fn record_ids_are_unique() {
        use super::draw_record_id;
        use rand::SeedableRng;
        use rand::rngs::StdRng;
        use std::collections::HashSet;

        let mut rng = StdRng::seed_from_u64(51);
        let ids: Vec<String> = (0..2000).filter_map(|idx| draw_record_id(idx, 2, &mut rng)).collect();
        let unique: HashSet<&String> = ids.iter().collect();

        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn filters_reference_declared_ids() {
        use super::{draw_filters, Filters};
        use crate::VcfConfig;
        use crate::headers::HeaderMetadata;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let config = VcfConfig { max_filters: 4, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(52);

        for _ in 0..200 {
            let meta = HeaderMetadata::generate(&config, &mut rng);
            if let Filters::Failed(ids) = draw_filters(&meta, &mut rng) {
                assert!(!ids.is_empty());
                assert!(ids.iter().all(|x| meta.has_filter(x) && x != "PASS"));
                let mut unique = ids.clone();
                unique.sort();
                unique.dedup();
                assert_eq!(unique.len(), ids.len());
            }
        }
    }

    #[test]
    fn records_use_declared_contigs_and_bounds() {
        use super::Records;
        use crate::VcfConfig;
        use crate::headers::HeaderMetadata;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let config = VcfConfig { min_pos: 10, max_pos: 20, min_ploidy: 1, max_ploidy: 3, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(53);
        let meta = HeaderMetadata::generate(&config, &mut rng);

        let records: Vec<_> = Records::new(&meta, &config, 300, &mut rng).collect();
        assert_eq!(records.len(), 300);
        for record in records {
            assert!(meta.contig_index(&record.chrom).is_some());
            assert!((10..=20).contains(&record.pos));
            assert!((1..=3).contains(&record.ploidy));
            assert!(!record.reference.is_empty());
            assert!(record.quality.map_or(true, |x| x >= 0.0));
            assert!(record.info.keys().all(|x| meta.info.contains_key(x)));
            assert!(record.format_keys().iter().all(|x| meta.format.contains_key(x)));
        }
    }

    #[test]
    fn records_size_hint() {
        use super::Records;
        use crate::VcfConfig;
        use crate::headers::HeaderMetadata;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let config = VcfConfig::default();
        let mut rng = StdRng::seed_from_u64(54);
        let meta = HeaderMetadata::generate(&config, &mut rng);

        let mut records = Records::new(&meta, &config, 2, &mut rng);
        assert_eq!(records.size_hint(), (2, Some(2)));
        records.next();
        assert_eq!(records.size_hint(), (1, Some(1)));
    }
}
