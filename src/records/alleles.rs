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
use rand::seq::IndexedRandom;

use crate::VcfConfig;
use crate::headers::HeaderMetadata;

pub const BASES: &[u8] = b"ACGTN";

/// Structural variant IDs that VCFv4.3 reserves for symbolic alleles.
pub const SYMBOLIC_IDS: &[&str] = &[
    "DEL", "INS", "DUP", "INV", "CNV", "DUP:TANDEM", "DEL:ME", "INS:ME", "*",
];

/// One allele in the ALT column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allele {
    /// Sequence over `ACGTN`.
    Bases(String),
    /// `<ID>`, eg. `<DEL>` or `<*>`.
    Symbolic(String),
    /// `*`, an allele missing due to an overlapping deletion.
    Overlapping,
    /// Breakend replacement string, eg. `G]chr2:321]` or `.A`.
    Breakend(String),
}

impl std::fmt::Display for Allele {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Allele::Bases(seq) => write!(f, "{}", seq),
            Allele::Symbolic(id) => write!(f, "<{}>", id),
            Allele::Overlapping => write!(f, "*"),
            Allele::Breakend(text) => write!(f, "{}", text),
        }
    }
}

/// Draws a non-empty sequence over `ACGTN` of at most `max_len` bases.
pub fn draw_bases<R: Rng + ?Sized>(max_len: usize, rng: &mut R) -> String {
    let len = rng.random_range(1..=max_len.max(1));
    (0..len).map(|_| *BASES.choose(rng).unwrap_or(&b'N') as char).collect()
}

fn draw_base_allele<R: Rng + ?Sized>(
    seen: &[String],
    max_len: usize,
    rng: &mut R,
) -> Allele {
    let mut seq = draw_bases(max_len, rng);
    while seen.contains(&seq) {
        seq.push(*BASES.choose(rng).unwrap_or(&b'N') as char);
    }
    Allele::Bases(seq)
}

fn breakend_text(
    form: usize,
    reference: &str,
    mate: &str,
    pos: u64,
) -> String {
    match form % 4 {
        0 => format!("{}[{}:{}[", reference, mate, pos),
        1 => format!("{}]{}:{}]", reference, mate, pos),
        2 => format!("]{}:{}]{}", mate, pos, reference),
        _ => format!("[{}:{}[{}", mate, pos, reference),
    }
}

/// Draws a breakend that is not in `seen`.
///
/// Paired breakends move the mate position forward, then switch to the next
/// form and mate contig. Only `seen.len() + 1` positions are tried per form
/// and mate, and a base allele is drawn if every candidate is taken.
fn draw_breakend<R: Rng + ?Sized>(
    reference: &str,
    seen: &[String],
    meta: &HeaderMetadata,
    config: &VcfConfig,
    rng: &mut R,
) -> Allele {
    let form = rng.random_range(0..6);
    if form >= 4 {
        // single breakends
        let text = if form == 4 { format!("{}.", reference) } else { format!(".{}", reference) };
        if !seen.contains(&text) {
            return Allele::Breakend(text)
        }
    }

    let mates: Vec<&str> = if meta.contigs.is_empty() {
        vec!["1"]
    } else {
        meta.contigs.iter().map(|x| x.id.as_str()).collect()
    };
    let first_mate = rng.random_range(0..mates.len());
    let min_pos = u64::from(config.min_pos);
    let span = u64::from(config.max_pos.saturating_sub(config.min_pos)) + 1;
    let offset = rng.random_range(0..span);
    let n_tries = span.min(seen.len() as u64 + 1);

    for shift in 0..4 {
        for mate_idx in 0..mates.len() {
            let mate = mates[(first_mate + mate_idx) % mates.len()];
            for step in 0..n_tries {
                let pos = min_pos + (offset + step) % span;
                let text = breakend_text(form + shift, reference, mate, pos);
                if !seen.contains(&text) {
                    return Allele::Breakend(text)
                }
            }
        }
    }

    draw_base_allele(seen, config.max_allele_len, rng)
}

/// Draws the ALT alleles of a record with reference allele `reference`.
///
/// Returns an empty vector when the ALT column should be `.`. The alleles
/// are pairwise distinct and all differ from `reference`: a colliding
/// sequence is extended and a colliding breakend is redrawn until it is new.
pub fn draw_alternates<R: Rng + ?Sized>(
    reference: &str,
    meta: &HeaderMetadata,
    config: &VcfConfig,
    rng: &mut R,
) -> Vec<Allele> {
    let n_alts = rng.random_range(0..=config.max_alt_alleles);
    let mut seen: Vec<String> = vec![reference.to_string()];
    let mut alts: Vec<Allele> = Vec::with_capacity(n_alts);

    for _ in 0..n_alts {
        let allele = if config.symbolic_alleles && rng.random_bool(0.3) {
            match rng.random_range(0..3) {
                0 => {
                    let free: Vec<&&str> = SYMBOLIC_IDS.iter().filter(|id| !seen.contains(&format!("<{}>", id))).collect();
                    match free.choose(rng) {
                        Some(id) => Allele::Symbolic(id.to_string()),
                        None => draw_base_allele(&seen, config.max_allele_len, rng),
                    }
                },
                1 if !seen.iter().any(|x| x == "*") => Allele::Overlapping,
                1 => draw_base_allele(&seen, config.max_allele_len, rng),
                _ => draw_breakend(reference, &seen, meta, config, rng),
            }
        } else {
            draw_base_allele(&seen, config.max_allele_len, rng)
        };
        seen.push(allele.to_string());
        alts.push(allele);
    }

    debug_assert!({
        let mut unique = seen.clone();
        unique.sort();
        unique.dedup();
        unique.len() == seen.len()
    });

    alts
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_alleles() {
        use super::Allele;

        assert_eq!(Allele::Bases("ACG".to_string()).to_string(), "ACG");
        assert_eq!(Allele::Symbolic("DEL:ME".to_string()).to_string(), "<DEL:ME>");
        assert_eq!(Allele::Symbolic("*".to_string()).to_string(), "<*>");
        assert_eq!(Allele::Overlapping.to_string(), "*");
        assert_eq!(Allele::Breakend("G]c1:5]".to_string()).to_string(), "G]c1:5]");
    }

    #[test]
    fn drawn_alternates_are_distinct() {
        use super::draw_alternates;
        use crate::VcfConfig;
        use crate::headers::HeaderMetadata;
        use rand::SeedableRng;
        use rand::rngs::StdRng;
        use std::collections::HashSet;

        // single-base alleles make collisions frequent
        let config = VcfConfig { max_alt_alleles: 8, max_allele_len: 1, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(31);
        let meta = HeaderMetadata::generate(&config, &mut rng);

        for _ in 0..1000 {
            let alts = draw_alternates("A", &meta, &config, &mut rng);
            assert!(alts.len() <= 8);
            let mut rendered: HashSet<String> = alts.iter().map(|x| x.to_string()).collect();
            assert_eq!(rendered.len(), alts.len());
            assert!(rendered.insert("A".to_string()));
        }
    }

    #[test]
    fn breakend_mates_are_declared_contigs() {
        use super::{draw_alternates, Allele};
        use crate::VcfConfig;
        use crate::headers::HeaderMetadata;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let config = VcfConfig { max_alt_alleles: 4, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(32);
        let meta = HeaderMetadata::generate(&config, &mut rng);

        for _ in 0..1000 {
            for allele in draw_alternates("C", &meta, &config, &mut rng) {
                if let Allele::Breakend(text) = allele {
                    if let Some(colon) = text.find(':') {
                        let mate_start = text[..colon].rfind(['[', ']']).unwrap() + 1;
                        assert!(meta.contig_index(&text[mate_start..colon]).is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn breakends_with_a_single_position() {
        use super::{draw_alternates, Allele};
        use crate::VcfConfig;
        use crate::headers::HeaderMetadata;
        use rand::SeedableRng;
        use rand::rngs::StdRng;
        use std::collections::HashSet;

        // one contig and one position leave six distinct breakends
        let config = VcfConfig { min_contigs: 1, max_contigs: 1, min_pos: 1, max_pos: 1, max_alt_alleles: 8, ..Default::default() };
        assert_eq!(config.validate(), Ok(()));
        let mut rng = StdRng::seed_from_u64(34);
        let meta = HeaderMetadata::generate(&config, &mut rng);

        let mut n_breakends = 0;
        for _ in 0..2000 {
            let alts = draw_alternates("A", &meta, &config, &mut rng);
            let rendered: HashSet<String> = alts.iter().map(|x| x.to_string()).collect();
            assert_eq!(rendered.len(), alts.len());
            assert!(!rendered.contains("A"));

            let breakends = alts.iter().filter(|x| matches!(x, Allele::Breakend(_))).count();
            assert!(breakends <= 6);
            n_breakends += breakends;
        }
        assert!(n_breakends > 0);
    }

    #[test]
    fn plain_alternates_without_symbolic() {
        use super::{draw_alternates, Allele};
        use crate::VcfConfig;
        use crate::headers::HeaderMetadata;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let config = VcfConfig { symbolic_alleles: false, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(33);
        let meta = HeaderMetadata::generate(&config, &mut rng);

        for _ in 0..500 {
            let alts = draw_alternates("ACGT", &meta, &config, &mut rng);
            assert!(alts.iter().all(|x| matches!(x, Allele::Bases(_))));
        }
    }
}
