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
use rand::Rng;

/// A GT value: one allele index (or missing) per chromosome copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype {
    pub alleles: Vec<Option<usize>>,
    pub phased: bool,
}

impl Genotype {
    /// Draws a genotype with `ploidy` entries indexing into `allele_count` alleles.
    pub fn draw<R: Rng + ?Sized>(
        allele_count: usize,
        ploidy: usize,
        missing_rate: f64,
        rng: &mut R,
    ) -> Self {
        let alleles = (0..ploidy).map(|_| {
            if rng.random_bool(missing_rate) {
                None
            } else {
                Some(rng.random_range(0..allele_count.max(1)))
            }
        }).collect();
        Genotype { alleles, phased: rng.random_bool(0.5) }
    }

    pub fn ploidy(&self) -> usize {
        self.alleles.len()
    }
}

impl std::fmt::Display for Genotype {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let separator = if self.phased { "|" } else { "/" };
        let formatted = self.alleles.iter()
            .map(|x| x.map_or(".".to_string(), |idx| idx.to_string()))
            .collect::<Vec<String>>()
            .join(separator);
        write!(f, "{}", formatted)
    }
}

/// Parses GT text back into a [Genotype].
///
/// Returns None if an entry is not `.` or a non-negative integer.
pub fn parse_genotype(text: &str) -> Option<Genotype> {
    let phased = text.contains('|');
    let alleles = text.split(['/', '|']).map(|x| {
        if x == "." {
            Some(None)
        } else {
            x.parse::<usize>().ok().map(Some)
        }
    }).collect::<Option<Vec<Option<usize>>>>()?;
    Some(Genotype { alleles, phased })
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_genotype() {
        use super::Genotype;

        let gt = Genotype { alleles: vec![Some(0), Some(2)], phased: false };
        assert_eq!(gt.to_string(), "0/2");

        let gt = Genotype { alleles: vec![None, Some(1), Some(1)], phased: true };
        assert_eq!(gt.to_string(), ".|1|1");
    }

    #[test]
    fn parse_genotype_text() {
        use super::{Genotype, parse_genotype};

        assert_eq!(parse_genotype("1|0"), Some(Genotype { alleles: vec![Some(1), Some(0)], phased: true }));
        assert_eq!(parse_genotype("."), Some(Genotype { alleles: vec![None], phased: false }));
        assert_eq!(parse_genotype("0/x"), None);
    }

    #[test]
    fn drawn_genotype_indexes_known_alleles() {
        use super::Genotype;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let gt = Genotype::draw(3, 2, 0.1, &mut rng);
            assert_eq!(gt.ploidy(), 2);
            assert!(gt.alleles.iter().flatten().all(|idx| *idx < 3));
        }
    }
}
