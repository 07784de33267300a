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

//! Printer for outputting [Record]s as VCF text.
//!
//! Can be used to convert any iterator over [Record] data to their plain
//! text representation.
//!
//! Returns 1 line at a time using next(). The header is prepended to the
//! first line, or returned alone if there are no records.
//!
//! The header can also be formatted separately by using
//! [print_header](Printer::print_header).
//!
//! ## Usage
//!
//! ```rust
//! use randvcf::VcfConfig;
//! use randvcf::headers::HeaderMetadata;
//! use randvcf::printer::Printer;
//! use randvcf::records::Records;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use std::io::{Cursor, Write};
//!
//! let config = VcfConfig::default();
//! let mut rng = StdRng::seed_from_u64(7);
//! let meta = HeaderMetadata::generate(&config, &mut rng);
//!
//! let mut records = Records::new(&meta, &config, 3, &mut rng);
//! let mut printer = Printer::new(&mut records, &meta);
//!
//! let mut output: Cursor<Vec<u8>> = Cursor::new(Vec::new());
//! for line in printer.by_ref() {
//!     output.write_all(&line).unwrap()
//! }
//!
//! let text = String::from_utf8(output.into_inner()).unwrap();
//! assert!(text.starts_with("##fileformat=VCFv4.3\n"));
//! assert_eq!(text.lines().filter(|x| !x.starts_with('#')).count(), 3);
//! ```
//!

pub mod header;
pub mod record;

use crate::headers::HeaderMetadata;
use crate::records::Record;

use header::default_source;
use header::format_vcf_header;
use record::format_vcf_line;

type E = Box<dyn std::error::Error>;

pub struct Printer<'a, I: Iterator> where I: Iterator<Item=Record> {
    // Inputs
    records: &'a mut I,
    meta: &'a HeaderMetadata,

    source: String,
    placeholder_format: bool,

    index: usize,
    header_printed: bool,
}

impl<'a, I: Iterator> Printer<'a, I> where I: Iterator<Item=Record> {
    pub fn new(
        records: &'a mut I,
        meta: &'a HeaderMetadata,
    ) -> Self {
        Printer {
            records, meta,
            source: default_source(),
            placeholder_format: false,
            index: 0,
            header_printed: false,
        }
    }

    /// Sets the value of the `##source` line.
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    /// Write `.` FORMAT and sample columns for records without FORMAT keys.
    pub fn with_placeholder_format(mut self, placeholder_format: bool) -> Self {
        self.placeholder_format = placeholder_format;
        self
    }

    /// Number of records printed so far.
    pub fn n_printed(&self) -> usize {
        self.index
    }
}

impl<'a, I: Iterator> Printer<'a, I> where I: Iterator<Item=Record> {
    pub fn print_header(
        &mut self,
    ) -> Result<Vec<u8>, E> {
        let mut out: Vec<u8> = Vec::new();
        format_vcf_header(self.meta, &self.source, &mut out)?;
        self.header_printed = true;
        Ok(out)
    }
}

impl<'a, I: Iterator> Iterator for Printer<'a, I> where I: Iterator<Item=Record> {
    type Item = Vec<u8>;

    fn next(
        &mut self,
    ) -> Option<Vec<u8>> {
        let mut out: Vec<u8> = Vec::new();
        if !self.header_printed {
            match self.print_header() {
                Ok(mut header) => out.append(&mut header),
                Err(e) => {
                    log::error!("Failed to format the header: {}", e);
                    return None
                },
            }
        }

        if let Some(record) = self.records.next() {
            if let Err(e) = format_vcf_line(&record, self.meta, self.placeholder_format, &mut out) {
                log::error!("Failed to format record {}: {}", self.index, e);
                return None
            }
            self.index += 1;
            Some(out)
        } else if !out.is_empty() {
            Some(out)
        } else {
            None
        }
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn print_header_only_without_records() {
        use super::Printer;
        use crate::headers::{ContigSpec, HeaderMetadata};
        use crate::records::Record;

        let meta = HeaderMetadata { contigs: vec![ContigSpec { id: "chr1".to_string() }], ..Default::default() };
        let data: Vec<Record> = Vec::new();
        let mut iter = data.into_iter();

        let mut printer = Printer::new(&mut iter, &meta).with_source("test");
        let expected = b"##fileformat=VCFv4.3\n##FILTER=<ID=PASS,Description=\"All filters passed\">\n##source=test\n##contig=<ID=chr1>\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n".to_vec();

        assert_eq!(printer.next(), Some(expected));
        assert_eq!(printer.next(), None);
        assert_eq!(printer.n_printed(), 0);
    }

    #[test]
    fn print_header_is_prepended_to_first_record() {
        use super::Printer;
        use crate::headers::{ContigSpec, HeaderMetadata};
        use crate::records::{Filters, Record, SampleData};
        use indexmap::map::IndexMap;
        use std::io::{Cursor, Write};

        let meta = HeaderMetadata { contigs: vec![ContigSpec { id: "2".to_string() }], ..Default::default() };
        let record = Record {
            chrom: "2".to_string(), pos: 5, id: None, reference: "G".to_string(),
            alternates: Vec::new(), quality: None, filters: Filters::Missing,
            info: IndexMap::new(), ploidy: 2, sample_data: SampleData::default(),
        };
        let data = vec![record.clone(), record];
        let mut iter = data.into_iter();

        let mut printer = Printer::new(&mut iter, &meta).with_source("test");
        let first = printer.next().unwrap();
        assert!(first.starts_with(b"##fileformat=VCFv4.3\n"));
        assert!(first.ends_with(b"#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n2\t5\t.\tG\t.\t.\t.\t.\n"));

        let mut cursor: Cursor<Vec<u8>> = Cursor::new(Vec::new());
        for bytes in printer.by_ref() {
            cursor.write_all(&bytes).unwrap();
        }
        assert_eq!(cursor.get_ref(), &b"2\t5\t.\tG\t.\t.\t.\t.\n".to_vec());
        assert_eq!(printer.n_printed(), 2);
    }
}
