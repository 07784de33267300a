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

//! randvcf is a library and a command-line client for:
//!
//!   - Generating random VCFv4.3 documents that are syntactically valid.
//!   - Checking that a VCF document is internally consistent.
//!
//! The generated documents carry no biological meaning. They are meant to be
//! used as fuzzed input for software that reads or transforms VCF.
//!
//! ## Usage
//!
//! ### Command line
//!
//! The randvcf CLI supports the following subcommands:
//!   - `randvcf generate` write a random document to stdout or a file.
//!   - `randvcf check` check a plain or gzipped document for consistency.
//!
//! ### Rust API
//!
//! [generate_vcf] returns a complete document as a String:
//!
//! ```rust
//! use randvcf::{generate_vcf, VcfConfig};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let config = VcfConfig { min_records: 2, max_records: 2, ..Default::default() };
//! let mut rng = StdRng::seed_from_u64(11);
//!
//! let text = generate_vcf(&config, &mut rng).unwrap();
//! assert!(text.starts_with("##fileformat=VCFv4.3\n"));
//! assert_eq!(text.lines().filter(|x| !x.starts_with('#')).count(), 2);
//! ```
//!
//! For use cases requiring access to a single record at a time, the following
//! structs are provided:
//!
//!   - [HeaderMetadata](headers::HeaderMetadata): the declarations shared by every record.
//!   - [Records](records::Records): draws [Record]s against a HeaderMetadata.
//!   - [Printer](printer::Printer): takes an iterator over [Record]s and formats them into VCF text.
//!   - [Parser](parser::Parser): takes a [Read](std::io::Read) containing VCF text and splits it into records.
//!
//! ## Generation order
//!
//! A document is generated in two phases. The header declarations are drawn
//! once and never modified afterwards. Each record is then drawn against the
//! declarations, fixing its allele count and ploidy before any INFO or FORMAT
//! values. This lets every field get the right number of values without
//! rejection sampling, see [arity] for the rules.
//!

use std::io::Write;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub mod arity;
pub mod compression;
pub mod config;
pub mod headers;
pub mod parser;
pub mod printer;
pub mod records;
pub mod values;

pub use config::{ConfigError, VcfConfig};
pub use headers::HeaderMetadata;
pub use records::Record;

use printer::Printer;
use records::Records;

type E = Box<dyn std::error::Error>;

/// Draws `n_records` records and sorts them by contig declaration order and POS.
fn sorted_records<R: Rng + ?Sized>(
    meta: &HeaderMetadata,
    config: &VcfConfig,
    n_records: usize,
    rng: &mut R,
) -> Vec<Record> {
    let mut records: Vec<Record> = Records::new(meta, config, n_records, rng).collect();
    records.sort_by_key(|x| (meta.contig_index(&x.chrom), x.pos));
    records
}

fn write_lines<I: Iterator<Item=Record>, W: Write>(
    printer: &mut Printer<'_, I>,
    conn: &mut W,
) -> Result<usize, E> {
    for line in printer.by_ref() {
        conn.write_all(&line)?;
    }
    conn.flush()?;
    Ok(printer.n_printed())
}

/// Generate a complete VCF document
///
/// Draws the header declarations and a number of records between
/// `config.min_records` and `config.max_records` using `rng`, and returns the
/// formatted document.
///
/// ## Errors
///
/// Returns a [ConfigError] if `config` is inconsistent. The configuration is
/// checked before anything is drawn from `rng`.
///
/// ## Usage
///
/// ```rust
/// use randvcf::{generate_vcf, VcfConfig};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let config = VcfConfig { min_records: 0, max_records: 0, ..Default::default() };
/// let text = generate_vcf(&config, &mut StdRng::seed_from_u64(0)).unwrap();
///
/// // Only the header
/// assert!(text.lines().all(|x| x.starts_with('#')));
/// assert!(text.lines().last().unwrap().starts_with("#CHROM"));
/// ```
///
pub fn generate_vcf<R: Rng + ?Sized>(
    config: &VcfConfig,
    rng: &mut R,
) -> Result<String, ConfigError> {
    config.validate()?;

    let meta = HeaderMetadata::generate(config, rng);
    let n_records = rng.random_range(config.min_records..=config.max_records);

    let bytes: Vec<u8> = if config.sorted {
        let mut iter = sorted_records(&meta, config, n_records, rng).into_iter();
        Printer::new(&mut iter, &meta).with_placeholder_format(config.placeholder_format).flatten().collect()
    } else {
        let mut iter = Records::new(&meta, config, n_records, rng);
        Printer::new(&mut iter, &meta).with_placeholder_format(config.placeholder_format).flatten().collect()
    };

    log::info!("Generated a document with {} records", n_records);
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Generate a complete VCF document from a seed
///
/// Equivalent to calling [generate_vcf] with a [StdRng] seeded with `seed`.
/// The same `seed` and `config` always produce the same document.
pub fn generate_vcf_from_seed(
    config: &VcfConfig,
    seed: u64,
) -> Result<String, ConfigError> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_vcf(config, &mut rng)
}

/// Generate a VCF document and write it to `conn`
///
/// Records are formatted and written one at a time, unless `config.sorted`
/// is set, in which case they are drawn and sorted before writing. Produces
/// the same bytes as [generate_vcf] for the same `config` and `rng` state.
///
/// Returns the number of records written.
///
/// ## Usage
///
/// ```rust
/// use randvcf::{generate_vcf_to_write, VcfConfig};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let config = VcfConfig { min_records: 3, max_records: 3, ..Default::default() };
/// let mut output: Vec<u8> = Vec::new();
///
/// let n_records = generate_vcf_to_write(&config, &mut StdRng::seed_from_u64(5), &mut output).unwrap();
/// assert_eq!(n_records, 3);
/// ```
///
pub fn generate_vcf_to_write<R: Rng + ?Sized, W: Write>(
    config: &VcfConfig,
    rng: &mut R,
    conn: &mut W,
) -> Result<usize, E> {
    config.validate()?;

    let meta = HeaderMetadata::generate(config, rng);
    let n_records = rng.random_range(config.min_records..=config.max_records);

    let n_written = if config.sorted {
        let mut iter = sorted_records(&meta, config, n_records, rng).into_iter();
        let mut printer = Printer::new(&mut iter, &meta).with_placeholder_format(config.placeholder_format);
        write_lines(&mut printer, conn)?
    } else {
        let mut iter = Records::new(&meta, config, n_records, rng);
        let mut printer = Printer::new(&mut iter, &meta).with_placeholder_format(config.placeholder_format);
        write_lines(&mut printer, conn)?
    };

    log::info!("Wrote a document with {} records", n_written);
    Ok(n_written)
}

// Tests
#[cfg(test)]
mod tests {

    fn configs() -> Vec<crate::VcfConfig> {
        use crate::VcfConfig;
        use crate::values::Alphabet;

        vec![
            VcfConfig::default(),
            VcfConfig { max_records: 10, force_info: true, force_format: true, max_samples: 3, ..Default::default() },
            VcfConfig { max_records: 10, min_ploidy: 1, max_ploidy: 4, max_alt_alleles: 5, max_number: 5, min_samples: 1, ..Default::default() },
            VcfConfig { max_records: 8, genotypes: true, min_samples: 1, max_samples: 4, field_presence: 1.0, ..Default::default() },
            VcfConfig { max_records: 8, alphabet: Alphabet::Printable, missing_value_rate: 0.5, placeholder_format: true, max_samples: 3, ..Default::default() },
            VcfConfig { max_records: 8, symbolic_alleles: false, max_allele_len: 1, max_string_len: 1, sorted: true, ..Default::default() },
        ]
    }

    #[test]
    fn generated_documents_pass_validation() {
        use crate::generate_vcf_from_seed;
        use crate::parser::validate::validate;
        use std::io::Cursor;

        for config in configs() {
            for seed in 0..150 {
                let text = generate_vcf_from_seed(&config, seed).unwrap();
                let mut input = Cursor::new(text.as_bytes());
                let summary = validate(&mut input, config.min_ploidy..=config.max_ploidy);

                assert!(summary.is_ok(), "seed {}: {:?}\n{}", seed, summary.err(), text);
                let summary = summary.unwrap();
                assert!((config.min_records..=config.max_records).contains(&summary.n_records));
                assert!(summary.n_contigs >= config.min_contigs);
            }
        }
    }

    #[test]
    fn generated_documents_have_consistent_columns() {
        use crate::generate_vcf_from_seed;

        for config in configs() {
            for seed in 0..100 {
                let text = generate_vcf_from_seed(&config, seed).unwrap();
                let header = text.lines().find(|x| x.starts_with("#CHROM")).unwrap();
                let n_header_columns = header.split('\t').count();

                let mut header_done = false;
                for line in text.lines() {
                    if line.starts_with("#CHROM") {
                        header_done = true;
                        continue
                    }
                    if !header_done {
                        assert!(line.starts_with("##"));
                        continue
                    }
                    let n_columns = line.split('\t').count();
                    assert!(n_columns == 8 || n_columns == n_header_columns, "{}", line);
                }
                assert!(header_done);
            }
        }
    }

    #[test]
    fn zero_records_gives_only_a_header() {
        use crate::{generate_vcf_from_seed, VcfConfig};

        let config = VcfConfig { min_records: 0, max_records: 0, max_samples: 3, force_format: true, ..Default::default() };
        for seed in 0..100 {
            let text = generate_vcf_from_seed(&config, seed).unwrap();
            let lines: Vec<&str> = text.lines().collect();

            assert!(text.ends_with('\n'));
            assert_eq!(lines[0], "##fileformat=VCFv4.3");
            assert!(lines.iter().any(|x| x.starts_with("##source=randvcf-")));
            assert!(lines.iter().any(|x| x.starts_with("##contig=<ID=")));
            assert!(lines.iter().any(|x| x.starts_with("##FORMAT=<ID=")));
            assert!(lines.last().unwrap().starts_with("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t"));
            assert!(lines.iter().all(|x| x.starts_with('#')));
        }
    }

    #[test]
    fn sample_fields_match_format_keys() {
        use crate::{generate_vcf_from_seed, VcfConfig};

        let config = VcfConfig { max_records: 10, force_format: true, min_samples: 2, max_samples: 4, ..Default::default() };
        let mut n_checked = 0;
        for seed in 0..100 {
            let text = generate_vcf_from_seed(&config, seed).unwrap();
            for line in text.lines().filter(|x| !x.starts_with('#')) {
                let columns: Vec<&str> = line.split('\t').collect();
                if columns.len() == 8 {
                    continue
                }
                assert!(columns.len() >= 11);
                let n_keys = columns[8].split(':').count();
                for sample in &columns[9..] {
                    assert_eq!(sample.split(':').count(), n_keys, "{}", line);
                }
                n_checked += 1;
            }
        }
        assert!(n_checked > 0);
    }

    #[test]
    fn sorted_records_are_ordered() {
        use crate::{generate_vcf_from_seed, VcfConfig};

        let config = VcfConfig { min_records: 10, max_records: 10, max_contigs: 4, sorted: true, ..Default::default() };
        for seed in 0..50 {
            let text = generate_vcf_from_seed(&config, seed).unwrap();
            let contigs: Vec<String> = text.lines()
                .filter_map(|x| x.strip_prefix("##contig=<ID="))
                .map(|x| x.trim_end_matches('>').to_string())
                .collect();
            let keys: Vec<(usize, u32)> = text.lines().filter(|x| !x.starts_with('#')).map(|line| {
                let columns: Vec<&str> = line.split('\t').collect();
                let contig = contigs.iter().position(|x| x == columns[0]).unwrap();
                (contig, columns[1].parse::<u32>().unwrap())
            }).collect();

            let mut expected = keys.clone();
            expected.sort();
            assert_eq!(keys, expected);
        }
    }

    #[test]
    fn same_seed_same_document() {
        use crate::{generate_vcf, generate_vcf_from_seed, generate_vcf_to_write};
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        for config in configs() {
            let expected = generate_vcf_from_seed(&config, 42).unwrap();
            assert_eq!(generate_vcf_from_seed(&config, 42).unwrap(), expected);
            assert_eq!(generate_vcf(&config, &mut StdRng::seed_from_u64(42)).unwrap(), expected);

            let mut written: Vec<u8> = Vec::new();
            generate_vcf_to_write(&config, &mut StdRng::seed_from_u64(42), &mut written).unwrap();
            assert_eq!(String::from_utf8(written).unwrap(), expected);
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        use crate::{generate_vcf_from_seed, generate_vcf_to_write, ConfigError, VcfConfig};
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let config = VcfConfig { min_records: 5, max_records: 2, ..Default::default() };
        assert_eq!(generate_vcf_from_seed(&config, 0), Err(ConfigError::InvalidRange { name: "records", min: 5, max: 2 }));

        let mut written: Vec<u8> = Vec::new();
        assert!(generate_vcf_to_write(&config, &mut StdRng::seed_from_u64(0), &mut written).is_err());
        assert!(written.is_empty());
    }

    #[test]
    fn generated_documents_parse_with_noodles() {
        use crate::generate_vcf_from_seed;
        use noodles::vcf;
        use std::io::Cursor;

        let mut n_short_rows = 0;
        for config in configs() {
            for seed in 0..100 {
                let text = generate_vcf_from_seed(&config, seed).unwrap();
                let mut reader = vcf::io::Reader::new(Cursor::new(text.as_bytes()));
                let header = reader.read_header().unwrap();

                let declared: Vec<&str> = text.lines().filter(|x| x.starts_with("##contig=")).collect();
                assert_eq!(header.contigs().len(), declared.len());

                let mut n_records = 0;
                for result in reader.records() {
                    let record = result.unwrap();
                    let buf = vcf::variant::RecordBuf::try_from_variant_record(&header, &record);
                    assert!(buf.is_ok(), "seed {}: {:?}\n{}", seed, buf.err(), text);
                    n_records += 1;
                }
                assert_eq!(n_records, text.lines().filter(|x| !x.starts_with('#')).count());

                if !header.sample_names().is_empty() {
                    n_short_rows += text.lines().filter(|x| !x.starts_with('#') && x.split('\t').count() == 8).count();
                }
            }
        }
        // 8-column rows under a header with samples are read too
        assert!(n_short_rows > 0);
    }
}
