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

//! Header declarations shared by every record in a document.
//!
//! Consists of the [HeaderMetadata](metadata::HeaderMetadata) aggregate and
//! the declarations it holds:
//!
//! - [ContigSpec](metadata::ContigSpec): `##contig=<ID=...>`.
//! - [FilterSpec](metadata::FilterSpec): `##FILTER=<ID=...,Description="...">`.
//! - [FieldSpec](fields::FieldSpec): `##INFO=<...>` and `##FORMAT=<...>`.
//!
//! ## Field declarations
//!
//! A FieldSpec has a key, a [ValueType](crate::values::ValueType), a
//! [Number](crate::arity::Number) rule and a description. Generated
//! declarations follow these rules:
//!
//! - INFO fields may have any type. Flags always have `Number=0` and
//!   non-Flags never do. INFO fields never use `Number=G`.
//! - FORMAT fields are never Flags and may use any Number rule except 0.
//! - Keys match `[A-Za-z_][0-9A-Za-z_.]*`, avoid the reserved keys of VCFv4.3
//!   and are unique within their own section. The same key may be declared
//!   once in INFO and once in FORMAT.
//! - Descriptions state the section, type and number, eg.
//!   `Description="INFO,Type=Float,Number=1"`.
//!
//! When genotypes are requested the standard `GT` declaration is always the
//! first FORMAT field.
//!
//! ## Filters and contigs
//!
//! PASS is always declared, and always first. Generated filter IDs, contig
//! IDs and sample names are unique.
//!

pub mod fields;
pub mod metadata;

pub use fields::{Category, FieldSpec};
pub use metadata::{ContigSpec, FilterSpec, HeaderMetadata, FILEFORMAT};
