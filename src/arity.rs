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

//! Number rules and the value counts they require.
//!
//! Each INFO and FORMAT declaration carries a Number rule that ties the
//! number of values in a record to the record's alleles and ploidy:
//!
//!   - `N` exactly N values.
//!   - `A` one value per ALT allele.
//!   - `R` one value per allele, REF included.
//!   - `G` one value per unordered genotype of the record's ploidy.
//!   - `.` any number of values.
//!
//! [resolve] is a pure function of the rule, the allele count (REF + ALT) and
//! the ploidy. A record whose ALT column is `.` has an allele count of 1 and
//! the allele-dependent rules `A`, `R` and `G` resolve to [Arity::Omitted]: such
//! fields are left out of the record.
//!
//! ## Usage
//!
//! ```rust
//! use randvcf::arity::{resolve, Arity, Number};
//!
//! // REF + 3 ALT alleles, diploid
//! assert_eq!(resolve(&Number::Count(1), 4, 2), Arity::Exactly(1));
//! assert_eq!(resolve(&Number::A, 4, 2), Arity::Exactly(3));
//! assert_eq!(resolve(&Number::R, 4, 2), Arity::Exactly(4));
//! assert_eq!(resolve(&Number::G, 4, 2), Arity::Exactly(10));
//! assert_eq!(resolve(&Number::Unknown, 4, 2), Arity::Unbounded);
//!
//! // ALT is `.`
//! assert_eq!(resolve(&Number::A, 1, 2), Arity::Omitted);
//! ```
//!

use rand::Rng;

/// The Number attribute of an INFO or FORMAT declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Number {
    Count(usize),
    A,
    R,
    G,
    Unknown,
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Number::Count(n) => write!(f, "{}", n),
            Number::A => write!(f, "A"),
            Number::R => write!(f, "R"),
            Number::G => write!(f, "G"),
            Number::Unknown => write!(f, "."),
        }
    }
}

impl std::str::FromStr for Number {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Number::A),
            "R" => Ok(Number::R),
            "G" => Ok(Number::G),
            "." => Ok(Number::Unknown),
            _ => s.parse::<usize>()
                .map(Number::Count)
                .map_err(|_| format!("'{}' is not a valid Number", s)),
        }
    }
}

/// How many values a field instance must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    /// Any count, chosen per field instance.
    Unbounded,
    /// The rule is undefined for this record and the field is left out.
    Omitted,
}

/// Number of unordered genotypes: C(allele_count + ploidy - 1, ploidy).
pub fn n_genotypes(allele_count: usize, ploidy: usize) -> usize {
    if allele_count == 0 {
        return 0
    }
    // C(n + k - 1, k) = prod_{i=1..k} (n - 1 + i) / i, exact at each step
    let mut res: usize = 1;
    for i in 1..=ploidy {
        res = res * (allele_count - 1 + i) / i;
    }
    res
}

/// Resolves `number` for a record with `allele_count` alleles (REF + ALT).
pub fn resolve(number: &Number, allele_count: usize, ploidy: usize) -> Arity {
    let allele_dependent = matches!(number, Number::A | Number::R | Number::G);
    if allele_dependent && allele_count <= 1 {
        return Arity::Omitted
    }

    match number {
        Number::Count(n) => Arity::Exactly(*n),
        Number::A => Arity::Exactly(allele_count - 1),
        Number::R => Arity::Exactly(allele_count),
        Number::G => Arity::Exactly(n_genotypes(allele_count, ploidy)),
        Number::Unknown => Arity::Unbounded,
    }
}

/// Picks the value count for one field instance.
///
/// [Arity::Unbounded] draws from `0..=max_number`, [Arity::Omitted] returns None.
pub fn draw_count<R: Rng + ?Sized>(arity: Arity, max_number: usize, rng: &mut R) -> Option<usize> {
    match arity {
        Arity::Exactly(n) => Some(n),
        Arity::Unbounded => Some(rng.random_range(0..=max_number)),
        Arity::Omitted => None,
    }
}

/// Checks an observed value count against `number`.
///
/// Number=G is accepted if it matches any ploidy in `ploidies`.
pub fn count_matches(
    number: &Number,
    count: usize,
    allele_count: usize,
    ploidies: std::ops::RangeInclusive<usize>,
) -> bool {
    match number {
        Number::G if allele_count > 1 => ploidies.into_iter().any(|p| n_genotypes(allele_count, p) == count),
        _ => match resolve(number, allele_count, 1) {
            Arity::Exactly(n) => n == count,
            Arity::Unbounded => true,
            Arity::Omitted => false,
        },
    }
}
