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

//! Opening plain or gzip-compressed VCF files.
//!
//! Output is compressed with [GzEncoder] when requested. Input is checked for
//! the gzip magic bytes and inflated with [MultiGzDecoder] so that both
//! `.vcf` and `.vcf.gz` files can be read with the same call.
//!

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

type E = Box<dyn std::error::Error>;

/// First two bytes of a gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compresses `bytes` into a single gzip member.
pub fn deflate_bytes(
    bytes: &[u8],
) -> Result<Vec<u8>, E> {
    let mut deflated: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut encoder = GzEncoder::new(&mut deflated, Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()?;
    Ok(deflated)
}

/// Returns true if `bytes` start with [GZIP_MAGIC].
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0..2] == GZIP_MAGIC
}

/// Opens `path` for writing, or stdout if `path` is None.
///
/// The returned writer gzip-compresses everything written to it if `gzip` is
/// true. The gzip trailer is written when the writer is dropped.
pub fn open_output(
    path: Option<&Path>,
    gzip: bool,
) -> Result<Box<dyn Write>, E> {
    let conn: Box<dyn Write> = match path {
        Some(file) => Box::new(BufWriter::new(File::create(file)?)),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };
    if gzip {
        Ok(Box::new(GzEncoder::new(conn, Compression::default())))
    } else {
        Ok(conn)
    }
}

/// Wraps `conn` in a buffered reader that inflates gzip input.
pub fn wrap_input<R: Read + 'static>(
    conn: R,
) -> Result<Box<dyn BufRead>, E> {
    let mut reader = BufReader::new(conn);
    let compressed = is_gzip(reader.fill_buf()?);
    if compressed {
        log::debug!("Input is gzip-compressed");
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Opens `path` for reading, inflating it if it is gzip-compressed.
pub fn open_input(
    path: &Path,
) -> Result<Box<dyn BufRead>, E> {
    let f = File::open(path)?;
    wrap_input(f)
}
