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
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use randvcf::VcfConfig;
use randvcf::values::Alphabet;

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // Generate a random VCF document
    Generate {
        #[command(flatten)]
        shape: ShapeArgs,

        // Seed for the random number generator
        #[arg(long = "seed", required = false)]
        seed: Option<u64>,

        // Output file path, defaults to stdout
        #[arg(short = 'o', long = "output", required = false)]
        out_file: Option<PathBuf>,

        // Compress the output with gzip
        #[arg(long = "gzip", default_value_t = false)]
        gzip: bool,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Check that a VCF document is consistent
    Check {
        // Input file, plain or gzipped
        #[arg(group = "input", required = true, help = "Input file")]
        input_file: PathBuf,

        // Ploidies accepted for Number=G fields in samples without GT
        #[arg(long = "min-ploidy", default_value_t = 1)]
        min_ploidy: usize,
        #[arg(long = "max-ploidy", default_value_t = 4)]
        max_ploidy: usize,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },
}

#[derive(Args)]
pub struct ShapeArgs {
    // Records
    #[arg(long = "min-records", default_value_t = 0)]
    pub min_records: usize,
    #[arg(long = "max-records", default_value_t = 5)]
    pub max_records: usize,

    // Contigs
    #[arg(long = "min-contigs", default_value_t = 1)]
    pub min_contigs: usize,
    #[arg(long = "max-contigs", default_value_t = 3)]
    pub max_contigs: usize,

    // Filters in addition to PASS
    #[arg(long = "max-filters", default_value_t = 2)]
    pub max_filters: usize,

    // Samples
    #[arg(long = "min-samples", default_value_t = 0)]
    pub min_samples: usize,
    #[arg(long = "max-samples", default_value_t = 2)]
    pub max_samples: usize,

    // INFO and FORMAT declarations
    #[arg(long = "max-info", default_value_t = 3)]
    pub max_info_fields: usize,
    #[arg(long = "max-format", default_value_t = 3)]
    pub max_format_fields: usize,
    #[arg(long = "force-info", default_value_t = false)]
    pub force_info: bool,
    #[arg(long = "force-format", default_value_t = false)]
    pub force_format: bool,
    #[arg(long = "max-number", default_value_t = 3)]
    pub max_number: usize,

    // Alleles
    #[arg(long = "max-alts", default_value_t = 3)]
    pub max_alt_alleles: usize,
    #[arg(long = "max-allele-len", default_value_t = 5)]
    pub max_allele_len: usize,
    #[arg(long = "no-symbolic", default_value_t = false)]
    pub no_symbolic: bool,

    // Positions
    #[arg(long = "min-pos", default_value_t = 1)]
    pub min_pos: u32,
    #[arg(long = "max-pos", default_value_t = randvcf::config::MAX_POS)]
    pub max_pos: u32,

    // Ploidy
    #[arg(long = "min-ploidy", default_value_t = 2)]
    pub min_ploidy: usize,
    #[arg(long = "max-ploidy", default_value_t = 2)]
    pub max_ploidy: usize,

    // Values
    #[arg(long = "field-presence", default_value_t = 0.75)]
    pub field_presence: f64,
    #[arg(long = "missing-rate", default_value_t = 0.1)]
    pub missing_value_rate: f64,
    #[arg(long = "alphabet", default_value = "alphanumeric", help = "alphanumeric or printable")]
    pub alphabet: String,
    #[arg(long = "max-string-len", default_value_t = 8)]
    pub max_string_len: usize,

    // Layout
    #[arg(long = "genotypes", default_value_t = false)]
    pub genotypes: bool,
    #[arg(long = "sorted", default_value_t = false)]
    pub sorted: bool,
    #[arg(long = "placeholder-format", default_value_t = false)]
    pub placeholder_format: bool,
}

impl ShapeArgs {
    /// Builds a validated [VcfConfig] from the command line.
    pub fn to_config(&self) -> Result<VcfConfig, String> {
        let alphabet = self.alphabet.parse::<Alphabet>()?;
        let config = VcfConfig {
            min_records: self.min_records,
            max_records: self.max_records,
            min_contigs: self.min_contigs,
            max_contigs: self.max_contigs,
            max_filters: self.max_filters,
            min_samples: self.min_samples,
            max_samples: self.max_samples,
            max_info_fields: self.max_info_fields,
            max_format_fields: self.max_format_fields,
            force_info: self.force_info,
            force_format: self.force_format,
            max_number: self.max_number,
            max_alt_alleles: self.max_alt_alleles,
            max_allele_len: self.max_allele_len,
            min_pos: self.min_pos,
            max_pos: self.max_pos,
            min_ploidy: self.min_ploidy,
            max_ploidy: self.max_ploidy,
            field_presence: self.field_presence,
            missing_value_rate: self.missing_value_rate,
            symbolic_alleles: !self.no_symbolic,
            alphabet,
            max_string_len: self.max_string_len,
            genotypes: self.genotypes,
            sorted: self.sorted,
            placeholder_format: self.placeholder_format,
        };
        config.validate().map_err(|e| format!("Invalid settings: {}", e))?;
        Ok(config)
    }
}
