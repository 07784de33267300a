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
use std::io::Write;

use indexmap::map::IndexMap;

use crate::headers::HeaderMetadata;
use crate::records::{InfoValue, Record};
use crate::values::{format_float, join_values};

type E = Box<dyn std::error::Error>;

/// Formats the INFO column, `.` if there are no entries.
pub fn format_info(info: &IndexMap<String, InfoValue>) -> String {
    if info.is_empty() {
        return ".".to_string()
    }
    info.iter().map(|(key, value)| {
        match value {
            InfoValue::Flag => key.clone(),
            InfoValue::Values(values) => format!("{}={}", key, join_values(values)),
        }
    }).collect::<Vec<String>>().join(";")
}

/// Format a single record as a VCF body line
///
/// Writes the tab-separated columns of `record` followed by a newline to
/// `conn`. The FORMAT and sample columns are written if `meta` declares
/// samples and the record has FORMAT keys. If `meta` declares samples but the
/// record has no FORMAT keys, the columns are dropped unless
/// `placeholder_format` is set, in which case they are written as `.`.
///
pub fn format_vcf_line<W: Write>(
    record: &Record,
    meta: &HeaderMetadata,
    placeholder_format: bool,
    conn: &mut W,
) -> Result<(), E> {
    let separator: char = '\t';
    let mut formatted: String = String::new();

    formatted += &record.chrom;
    formatted.push(separator);
    formatted += &record.pos.to_string();
    formatted.push(separator);
    formatted += record.id.as_deref().unwrap_or(".");
    formatted.push(separator);
    formatted += &record.reference;
    formatted.push(separator);
    if record.alternates.is_empty() {
        formatted += ".";
    } else {
        formatted += &record.alternates.iter().map(|x| x.to_string()).collect::<Vec<String>>().join(",");
    }
    formatted.push(separator);
    formatted += &record.quality.map_or(".".to_string(), format_float);
    formatted.push(separator);
    formatted += &record.filters.to_string();
    formatted.push(separator);
    formatted += &format_info(&record.info);

    if meta.has_samples() {
        if !record.format_keys().is_empty() {
            formatted.push(separator);
            formatted += &record.format_keys().join(":");
            record.samples().iter().for_each(|sample| {
                formatted.push(separator);
                formatted += &sample.iter().map(|values| join_values(values)).collect::<Vec<String>>().join(":");
            });
        } else if placeholder_format {
            formatted.push(separator);
            formatted += ".";
            meta.samples.iter().for_each(|_| {
                formatted.push(separator);
                formatted += ".";
            });
        }
    }
    formatted += "\n";

    conn.write_all(formatted.as_bytes())?;
    Ok(())
}
