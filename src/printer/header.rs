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

use crate::headers::{HeaderMetadata, FILEFORMAT};

type E = Box<dyn std::error::Error>;

/// Fixed columns of the `#CHROM` line.
pub const COLUMNS: [&str; 8] = ["#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO"];

/// Default value of the `##source` line.
pub fn default_source() -> String {
    format!("randvcf-{}", env!("CARGO_PKG_VERSION"))
}

/// Formats the `#CHROM` line without a newline.
///
/// The FORMAT column and the sample names are only included if `samples` is
/// not empty.
pub fn column_header_line(samples: &[String]) -> String {
    let mut line = COLUMNS.join("\t");
    if !samples.is_empty() {
        line += "\tFORMAT";
        samples.iter().for_each(|name| {
            line += "\t";
            line += name;
        });
    }
    line
}

/// Format the header of a document
///
/// Writes the meta-information lines and the `#CHROM` line for `meta` to
/// `conn` in this order:
///
///   1. `##fileformat=VCFv4.3`
///   2. `##FILTER` lines, PASS first.
///   3. `##source=<source>`
///   4. `##contig` lines.
///   5. `##INFO` lines.
///   6. `##FORMAT` lines.
///   7. `#CHROM ... INFO[ FORMAT sample1 sample2 ...]`
///
pub fn format_vcf_header<W: Write>(
    meta: &HeaderMetadata,
    source: &str,
    conn: &mut W,
) -> Result<(), E> {
    let mut formatted: String = String::new();

    formatted += &format!("##fileformat={}\n", FILEFORMAT);
    for filter in &meta.filters {
        formatted += &filter.header_line();
        formatted += "\n";
    }
    formatted += &format!("##source={}\n", source);
    for contig in &meta.contigs {
        formatted += &contig.header_line();
        formatted += "\n";
    }
    for field in meta.info.values().chain(meta.format.values()) {
        formatted += &field.header_line();
        formatted += "\n";
    }
    formatted += &column_header_line(&meta.samples);
    formatted += "\n";

    conn.write_all(formatted.as_bytes())?;
    Ok(())
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_vcf_header_with_samples() {
        use super::format_vcf_header;
        use crate::arity::Number;
        use crate::headers::{Category, ContigSpec, FieldSpec, FilterSpec, HeaderMetadata};
        use crate::values::ValueType;

        let mut meta = HeaderMetadata::default();
        meta.filters.push(FilterSpec { id: "q10".to_string(), description: "Low quality".to_string() });
        meta.contigs.push(ContigSpec { id: "chr1".to_string() });
        meta.info.insert("Jw".to_string(), FieldSpec::new(Category::Info, "Jw", ValueType::Float, Number::Count(1)));
        meta.format.insert("X".to_string(), FieldSpec::new(Category::Format, "X", ValueType::Integer, Number::Count(3)));
        meta.samples = vec!["s1".to_string(), "s2".to_string()];

        let expected = vec![
            "##fileformat=VCFv4.3",
            "##FILTER=<ID=PASS,Description=\"All filters passed\">",
            "##FILTER=<ID=q10,Description=\"Low quality\">",
            "##source=test",
            "##contig=<ID=chr1>",
            "##INFO=<ID=Jw,Number=1,Type=Float,Description=\"INFO,Type=Float,Number=1\">",
            "##FORMAT=<ID=X,Number=3,Type=Integer,Description=\"FORMAT,Type=Integer,Number=3\">",
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\ts1\ts2",
            "",
        ].join("\n");

        let mut got: Vec<u8> = Vec::new();
        format_vcf_header(&meta, "test", &mut got).unwrap();

        assert_eq!(String::from_utf8(got).unwrap(), expected);
    }

    #[test]
    fn format_vcf_header_without_samples() {
        use super::format_vcf_header;
        use crate::headers::{ContigSpec, HeaderMetadata};

        let meta = HeaderMetadata { contigs: vec![ContigSpec { id: "1".to_string() }], ..Default::default() };
        let expected = b"##fileformat=VCFv4.3\n##FILTER=<ID=PASS,Description=\"All filters passed\">\n##source=randvcf-test\n##contig=<ID=1>\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n".to_vec();

        let mut got: Vec<u8> = Vec::new();
        format_vcf_header(&meta, "randvcf-test", &mut got).unwrap();

        assert_eq!(got, expected);
    }

    #[test]
    fn default_source_names_the_crate() {
        use super::default_source;

        assert!(default_source().starts_with("randvcf-"));
    }
}
