//! Keyword-based subject detection.
//!
//! Used to steer prompts when extraction produced little usable text. The
//! taxonomy is a plain table; detection order follows table order.

use lectern_core::DomainHint;
use tracing::debug;

/// Domain label and the keywords that signal it.
pub const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "biomedical imaging",
        &["biomedical imaging", "medical imaging", "radiology", "mri", "ct scan", "ultrasound", "x-ray"],
    ),
    ("anatomy", &["anatomy", "anatomical", "dissection", "cadaver"]),
    ("physiology", &["physiology", "physiological", "homeostasis", "system function"]),
    ("biochemistry", &["biochemistry", "biochemical", "metabolism", "enzyme"]),
    ("neuroscience", &["neuroscience", "neuron", "brain", "neural", "nervous system"]),
    ("pharmacology", &["pharmacology", "drug", "medication", "therapeutic", "dosage"]),
    ("microbiology", &["microbiology", "bacteria", "virus", "pathogen", "microbe"]),
    ("pathology", &["pathology", "disease", "disorder", "condition", "syndrome"]),
    ("genetics", &["genetics", "gene", "dna", "chromosome", "mutation"]),
    ("immunology", &["immunology", "immune", "antibody", "antibodies", "antigen", "lymphocyte"]),
    ("histology", &["histology", "tissue", "microscopic", "cell structure"]),
    ("embryology", &["embryology", "embryo", "fetus", "development", "congenital"]),
    ("psychology", &["psychology", "behavior", "mental", "cognitive", "disorder"]),
    ("chemistry", &["chemistry", "chemical", "compound", "reaction", "molecular"]),
    ("physics", &["physics", "force", "energy", "motion", "quantum"]),
    ("biology", &["biology", "biological", "organism", "evolution", "ecology"]),
    ("computer science", &["computer science", "algorithm", "programming", "data structure", "software"]),
    ("history", &["history", "historical", "century", "empire", "revolution"]),
];

/// Guess the academic subject(s) of a document from its text and filename.
pub fn classify(text: &str, filename: &str) -> DomainHint {
    let haystack = format!("{}\n{}", text, filename).to_lowercase();

    let labels: Vec<String> = DOMAIN_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| contains_word(&haystack, k)))
        .map(|(label, _)| label.to_string())
        .collect();

    debug!(filename, domains = ?labels, "Classified document domain");
    DomainHint::new(labels)
}

/// Word endings accepted after a keyword ("neurons", "viruses").
const INFLECTIONS: &[&str] = &["", "s", "es"];

/// True when `needle` starts a word in `haystack` and the rest of that word
/// is a plural ending, so "genes" matches `gene` but "general" does not.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let end = start + matched.len();
        let starts_word = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let tail_len = haystack[end..]
            .find(|c: char| !c.is_alphanumeric())
            .unwrap_or(haystack.len() - end);
        starts_word && INFLECTIONS.contains(&&haystack[end..end + tail_len])
    })
}
