//! Ordered regular-expression tables used by phenotype normalization.
//!
//! Order matters in every table: later rules assume the earlier ones have
//! already run.

use std::sync::LazyLock;

use regex::Regex;

/// A pattern and its replacement text (`${n}` refers to capture groups).
pub struct Rewrite {
    pub pattern: Regex,
    pub replacement: &'static str,
}

fn rewrite(pattern: &str, replacement: &'static str) -> Rewrite {
    Rewrite {
        pattern: Regex::new(pattern).expect("Invalid pre-split regex"),
        replacement,
    }
}

/// Fixes applied to the whole phenotype field before splitting on `;`.
pub static BEFORE_SPLIT: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    vec![
        // Malformed records whose semicolons would split a single phenotype.
        rewrite(r"\(HP:0006574;\);", "(HP:0006574);"),
        rewrite(
            r"Deafness, autosomal recessive; 12",
            "Deafness, autosomal recessive, 12",
        ),
        rewrite(
            r"Waardenburg syndrome, type; 3",
            "Waardenburg syndrome, type 3",
        ),
        rewrite(
            r"Ectrodactyly, ectodermal dysplasia, and cleft lip/palate syndrome; 3",
            "Ectrodactyly, ectodermal dysplasia, and cleft lip/palate syndrome, 3",
        ),
        // Braces sometimes separate name and code: "{Bladder cancer, somatic}, 109800".
        rewrite(r"[{}]", ""),
        // Phenotypes glued together after an OMIM code: "..., 305400Mental retardation".
        rewrite(r"(\d{6})([A-Za-z])", "${1};${2}"),
        rewrite(r"[\t ]+", " "),
    ]
});

/// Citation and boilerplate noise removed from each fragment after splitting.
pub static AFTER_SPLIT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r" \(no OMIM number\)",
        r" \(NO phenotype number in OMIM\)",
        r"(No|no) OMIM (phenotype|number|entry)",
        r"[( ]*(from )?PMID:? *\d+[ ).]*",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid post-split regex"))
    .collect()
});

/// Orphanet, HPO and MONDO identifiers. Group 1 is the prefix, group 2 the accession.
///
/// The prefix must start a word, so gene symbols such as `SHP2` are left alone.
pub static OTHER_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ ,-]*\b(OrphaNet: ORPHA|Orphanet|ORPHA|HP|MONDO)[:_ #]*(\d+)[:.]*")
        .expect("Invalid ontology id regex")
});

/// OMIM codes with an optional `OMIM`/`MIM` prefix. Group 2 is the accession.
pub static OMIM_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ ,-]*(OMIM|MIM)?[:_ #]*(\d{6})[:.]*").expect("Invalid OMIM regex")
});

/// `()` or `[]` with nothing but whitespace inside.
pub static EMPTY_BRACKETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*\)|\[\s*\]").expect("Invalid brackets regex")
});
