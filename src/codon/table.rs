use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::error::{CodonforgeError, Result};

/// The standard genetic code (NCBI table 1) minus its stop codons. Variant
/// tables are expressed as overrides on top of this list.
const BASE_CODONS: [(&str, char); 61] = [
    ("TTT", 'F'), ("TTC", 'F'), ("TTA", 'L'), ("TTG", 'L'),
    ("CTT", 'L'), ("CTC", 'L'), ("CTA", 'L'), ("CTG", 'L'),
    ("ATT", 'I'), ("ATC", 'I'), ("ATA", 'I'), ("ATG", 'M'),
    ("GTT", 'V'), ("GTC", 'V'), ("GTA", 'V'), ("GTG", 'V'),
    ("TCT", 'S'), ("TCC", 'S'), ("TCA", 'S'), ("TCG", 'S'),
    ("CCT", 'P'), ("CCC", 'P'), ("CCA", 'P'), ("CCG", 'P'),
    ("ACT", 'T'), ("ACC", 'T'), ("ACA", 'T'), ("ACG", 'T'),
    ("GCT", 'A'), ("GCC", 'A'), ("GCA", 'A'), ("GCG", 'A'),
    ("TAT", 'Y'), ("TAC", 'Y'),
    ("CAT", 'H'), ("CAC", 'H'), ("CAA", 'Q'), ("CAG", 'Q'),
    ("AAT", 'N'), ("AAC", 'N'), ("AAA", 'K'), ("AAG", 'K'),
    ("GAT", 'D'), ("GAC", 'D'), ("GAA", 'E'), ("GAG", 'E'),
    ("TGT", 'C'), ("TGC", 'C'), ("TGG", 'W'),
    ("CGT", 'R'), ("CGC", 'R'), ("CGA", 'R'), ("CGG", 'R'),
    ("AGT", 'S'), ("AGC", 'S'), ("AGA", 'R'), ("AGG", 'R'),
    ("GGT", 'G'), ("GGC", 'G'), ("GGA", 'G'), ("GGG", 'G'),
];

const BASE_STOPS: [&str; 3] = ["TAA", "TAG", "TGA"];

/// (id, name, codons reassigned to a new amino acid, codons turned into stops)
type TableSpec = (
    u8,
    &'static str,
    &'static [(&'static str, char)],
    &'static [&'static str],
);

const TABLES: [TableSpec; 5] = [
    (1, "Standard", &[], &[]),
    (
        2,
        "Vertebrate Mitochondrial",
        &[("ATA", 'M'), ("TGA", 'W')],
        &["AGA", "AGG"],
    ),
    (
        4,
        "Mold, Protozoan, and Coelenterate Mitochondrial",
        &[("TGA", 'W')],
        &[],
    ),
    (
        5,
        "Invertebrate Mitochondrial",
        &[("ATA", 'M'), ("TGA", 'W'), ("AGA", 'S'), ("AGG", 'S')],
        &[],
    ),
    (11, "Bacterial, Archaeal and Plant Plastid", &[], &[]),
];

/// One NCBI translation table with the derived lookups the genetic
/// operators need: amino acid -> codons, codon -> synonyms, and the set of
/// codons whose amino acid has no alternative encoding.
pub struct GeneticCode {
    pub id: u8,
    pub name: &'static str,
    codon_to_aa: HashMap<&'static str, char>,
    codons_for_aa: HashMap<char, Vec<&'static str>>,
    synonymous: HashMap<&'static str, Vec<&'static str>>,
    no_synonyms: HashSet<&'static str>,
    stops: HashSet<&'static str>,
}

impl GeneticCode {
    fn new(
        id: u8,
        name: &'static str,
        reassigned: &[(&'static str, char)],
        new_stops: &[&'static str],
    ) -> Self {
        let mut codon_to_aa: HashMap<&'static str, char> = BASE_CODONS.iter().copied().collect();
        let mut stops: HashSet<&'static str> = BASE_STOPS.iter().copied().collect();

        for &(codon, aa) in reassigned {
            stops.remove(codon);
            codon_to_aa.insert(codon, aa);
        }
        for &codon in new_stops {
            codon_to_aa.remove(codon);
            stops.insert(codon);
        }

        // Walk codons in the canonical order so the per-amino-acid lists are
        // deterministic across processes.
        let mut codons_for_aa: HashMap<char, Vec<&'static str>> = HashMap::new();
        for codon in BASE_CODONS
            .iter()
            .map(|&(codon, _)| codon)
            .chain(BASE_STOPS.iter().copied())
        {
            if let Some(&aa) = codon_to_aa.get(codon) {
                codons_for_aa.entry(aa).or_default().push(codon);
            }
        }

        let mut synonymous: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        let mut no_synonyms: HashSet<&'static str> = HashSet::new();
        for codons in codons_for_aa.values() {
            for &codon in codons {
                synonymous.insert(codon, codons.clone());
                if codons.len() == 1 {
                    no_synonyms.insert(codon);
                }
            }
        }

        Self {
            id,
            name,
            codon_to_aa,
            codons_for_aa,
            synonymous,
            no_synonyms,
            stops,
        }
    }

    /// Codons encoding `aa`, in canonical order.
    pub fn codons_for(&self, aa: char) -> Option<&[&'static str]> {
        self.codons_for_aa.get(&aa).map(Vec::as_slice)
    }

    /// All codons sharing `codon`'s amino acid, including `codon` itself.
    pub fn synonyms(&self, codon: &str) -> Option<&[&'static str]> {
        self.synonymous.get(codon).map(Vec::as_slice)
    }

    /// Whether `codon` can be swapped for a different codon without changing
    /// the encoded amino acid.
    pub fn has_synonyms(&self, codon: &str) -> bool {
        self.synonyms(codon).map_or(false, |s| s.len() > 1)
    }

    pub fn codons_without_synonyms(&self) -> &HashSet<&'static str> {
        &self.no_synonyms
    }

    pub fn amino_acid(&self, codon: &str) -> Option<char> {
        self.codon_to_aa.get(codon).copied()
    }

    pub fn is_stop(&self, codon: &str) -> bool {
        self.stops.contains(codon)
    }

    /// Translates a codon-aligned DNA sequence into amino acids. Stop codons
    /// are skipped with a warning rather than terminating translation.
    pub fn translate(&self, dna: &str) -> Result<String> {
        for base in dna.chars() {
            if !matches!(base, 'A' | 'T' | 'G' | 'C') {
                return Err(CodonforgeError::InvalidArgument(format!(
                    "Invalid character in sequence: {}",
                    base
                )));
            }
        }
        if dna.len() % 3 != 0 {
            return Err(CodonforgeError::InvalidArgument(
                "Sequence length is not divisible by 3.".to_string(),
            ));
        }

        let mut aa_seq = String::with_capacity(dna.len() / 3);
        for i in (0..dna.len()).step_by(3) {
            let codon = &dna[i..i + 3];
            if let Some(aa) = self.amino_acid(codon) {
                aa_seq.push(aa);
            } else if self.is_stop(codon) {
                log::warn!("Stop codon {} in sequence, ignoring", codon);
            } else {
                return Err(CodonforgeError::InvalidArgument(format!(
                    "Unknown codon {} under genetic code {}",
                    codon, self.id
                )));
            }
        }
        Ok(aa_seq)
    }
}

static REGISTRY: OnceLock<HashMap<u8, GeneticCode>> = OnceLock::new();

/// Looks up a genetic code by NCBI translation table id. Tables are built
/// once on first use and shared read-only for the life of the process.
pub fn genetic_code(id: u8) -> Result<&'static GeneticCode> {
    let registry = REGISTRY.get_or_init(|| {
        TABLES
            .iter()
            .map(|&(id, name, reassigned, stops)| (id, GeneticCode::new(id, name, reassigned, stops)))
            .collect()
    });
    registry.get(&id).ok_or(CodonforgeError::UnknownGeneticCode(id))
}
