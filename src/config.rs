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

//! Knobs that control the shape of generated documents.
//!
//! None of the settings in [VcfConfig] affect the validity of the output,
//! they only change how large or how varied the generated documents are.
//! Contradictory settings are rejected by [VcfConfig::validate] before any
//! random draws are made.

use crate::values::Alphabet;

/// Largest value allowed in the POS column.
pub const MAX_POS: u32 = (1 << 31) - 1;

/// Errors from inconsistent [VcfConfig] settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("min_{name} ({min}) is greater than max_{name} ({max})")]
    InvalidRange { name: &'static str, min: usize, max: usize },

    #[error("{name} must be at least 1")]
    Zero { name: &'static str },

    #[error("max_pos ({0}) exceeds the largest VCF position 2147483647")]
    PosOutOfRange(u32),

    #[error("{name} ({value}) is not a probability in [0, 1]")]
    Probability { name: &'static str, value: f64 },

    #[error("force_{name} is set but max_{name}_fields is 0")]
    ForcedButEmpty { name: &'static str },

    #[error("force_format is set but max_samples is 0")]
    ForcedFormatWithoutSamples,
}

/// Generation settings for a single document.
///
/// Use [VcfConfig::default] and override the fields that matter:
///
/// ```rust
/// use randvcf::VcfConfig;
///
/// let config = VcfConfig { min_records: 2, max_records: 2, force_info: true, ..Default::default() };
/// assert!(config.validate().is_ok());
/// ```
///
#[derive(Debug, Clone, PartialEq)]
pub struct VcfConfig {
    /// Bounds for the number of body records.
    pub min_records: usize,
    pub max_records: usize,

    /// Bounds for the number of declared contigs.
    pub min_contigs: usize,
    pub max_contigs: usize,

    /// Maximum number of declared filters in addition to PASS.
    pub max_filters: usize,

    /// Bounds for the number of samples.
    pub min_samples: usize,
    pub max_samples: usize,

    /// Maximum number of declared INFO and FORMAT fields.
    pub max_info_fields: usize,
    pub max_format_fields: usize,

    /// Declare at least one INFO field.
    pub force_info: bool,
    /// Declare at least one FORMAT field and at least one sample.
    pub force_format: bool,

    /// Largest fixed Number and largest value count for Number=.
    pub max_number: usize,

    /// Maximum number of ALT alleles in a record.
    pub max_alt_alleles: usize,
    /// Maximum length of REF and plain-base ALT alleles.
    pub max_allele_len: usize,

    /// Bounds for the POS column.
    pub min_pos: u32,
    pub max_pos: u32,

    /// Bounds for the per-record ploidy used to size Number=G fields.
    pub min_ploidy: usize,
    pub max_ploidy: usize,

    /// Probability that a declared INFO or FORMAT field appears in a record.
    pub field_presence: f64,
    /// Probability that a single value is written as missing (`.`).
    pub missing_value_rate: f64,

    /// Allow symbolic (`<DEL>`), overlapping deletion (`*`) and breakend ALTs.
    pub symbolic_alleles: bool,
    /// Characters used in String values.
    pub alphabet: Alphabet,
    /// Maximum length of String values, ids and sample names.
    pub max_string_len: usize,

    /// Declare the GT field and write genotypes.
    pub genotypes: bool,
    /// Sort records by contig declaration order and POS.
    pub sorted: bool,
    /// Write `.` for FORMAT and every sample column when a record has no
    /// FORMAT fields, instead of leaving the columns out.
    pub placeholder_format: bool,
}

impl Default for VcfConfig {
    fn default() -> Self {
        VcfConfig {
            min_records: 0,
            max_records: 5,
            min_contigs: 1,
            max_contigs: 3,
            max_filters: 2,
            min_samples: 0,
            max_samples: 2,
            max_info_fields: 3,
            max_format_fields: 3,
            force_info: false,
            force_format: false,
            max_number: 3,
            max_alt_alleles: 3,
            max_allele_len: 5,
            min_pos: 1,
            max_pos: MAX_POS,
            min_ploidy: 2,
            max_ploidy: 2,
            field_presence: 0.75,
            missing_value_rate: 0.1,
            symbolic_alleles: true,
            alphabet: Alphabet::Alphanumeric,
            max_string_len: 8,
            genotypes: false,
            sorted: false,
            placeholder_format: false,
        }
    }
}

fn check_range(name: &'static str, min: usize, max: usize) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidRange { name, min, max })
    }
    Ok(())
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Probability { name, value })
    }
    Ok(())
}

impl VcfConfig {
    /// Checks that the settings are consistent.
    ///
    /// ## Usage
    ///
    /// ```rust
    /// use randvcf::{ConfigError, VcfConfig};
    ///
    /// let config = VcfConfig { min_records: 3, max_records: 1, ..Default::default() };
    /// assert_eq!(config.validate(), Err(ConfigError::InvalidRange { name: "records", min: 3, max: 1 }));
    /// ```
    ///
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("records", self.min_records, self.max_records)?;
        check_range("contigs", self.min_contigs, self.max_contigs)?;
        check_range("samples", self.min_samples, self.max_samples)?;
        check_range("ploidy", self.min_ploidy, self.max_ploidy)?;
        check_range("pos", self.min_pos as usize, self.max_pos as usize)?;

        if self.min_contigs == 0 {
            return Err(ConfigError::Zero { name: "min_contigs" })
        }
        if self.max_number == 0 {
            return Err(ConfigError::Zero { name: "max_number" })
        }
        if self.min_pos == 0 {
            return Err(ConfigError::Zero { name: "min_pos" })
        }
        if self.min_ploidy == 0 {
            return Err(ConfigError::Zero { name: "min_ploidy" })
        }
        if self.max_allele_len == 0 {
            return Err(ConfigError::Zero { name: "max_allele_len" })
        }
        if self.max_string_len == 0 {
            return Err(ConfigError::Zero { name: "max_string_len" })
        }
        if self.max_pos > MAX_POS {
            return Err(ConfigError::PosOutOfRange(self.max_pos))
        }

        check_probability("field_presence", self.field_presence)?;
        check_probability("missing_value_rate", self.missing_value_rate)?;

        if self.force_info && self.max_info_fields == 0 {
            return Err(ConfigError::ForcedButEmpty { name: "info" })
        }
        if self.force_format && self.max_format_fields == 0 {
            return Err(ConfigError::ForcedButEmpty { name: "format" })
        }
        if self.force_format && self.max_samples == 0 {
            return Err(ConfigError::ForcedFormatWithoutSamples)
        }

        Ok(())
    }

    /// Smallest number of samples that satisfies `force_format`.
    pub(crate) fn sample_floor(&self) -> usize {
        if self.force_format { self.min_samples.max(1) } else { self.min_samples }
    }
}
