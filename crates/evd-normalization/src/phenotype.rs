//! Phenotype field normalization.
//!
//! A raw field such as
//! `"{Bladder cancer, somatic}, 109800; Aarskog-Scott syndrome, 305400"`
//! becomes an ordered list of [`Phenotype`] values, each with a cleaned label
//! and the structured identifier found in its text.
//!
//! Stages, in order:
//! 1. **Fix**: known malformed records, braces, glued phenotypes, whitespace
//! 2. **Split**: on `;`, keeping the first occurrence of each fragment
//! 3. **Clean**: citation and "no OMIM number" boilerplate
//! 4. **Extract**: Orphanet/HPO/MONDO id, then OMIM id (OMIM wins)
//! 5. **Finish**: unpaired, empty and enclosing brackets, whitespace, dangling
//!    separators; a label without letters or digits is dropped
//! 6. **Filter**: empty fragments and `?`-prefixed (uncertain) labels

use std::borrow::Cow;
use std::collections::HashSet;

use tracing::debug;

use evd_model::{Namespace, NormalizerOptions, Phenotype, RawPhenotypeEntry, SourceId};

use crate::rules::{AFTER_SPLIT, BEFORE_SPLIT, EMPTY_BRACKETS, OMIM_ID, OTHER_ID};

/// Normalizes phenotype fields with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct PhenotypeNormalizer {
    options: NormalizerOptions,
}

impl PhenotypeNormalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Splits a raw phenotype field into cleaned, de-duplicated phenotypes.
    ///
    /// An empty result means the field has no usable phenotype and the
    /// caller should drop the row.
    pub fn normalize(&self, raw: &str) -> Vec<Phenotype> {
        let fixed = apply_fixes(raw);
        let mut seen = HashSet::new();
        let mut phenotypes = Vec::new();
        for fragment in distinct_fragments(&fixed) {
            let Some(phenotype) = self.normalize_fragment(fragment) else {
                continue;
            };
            if seen.insert(phenotype.clone()) {
                phenotypes.push(phenotype);
            }
        }
        phenotypes
    }

    /// Normalizes an input row, falling back to the cohort context when the
    /// phenotype field is missing, blank or a placeholder.
    pub fn normalize_entry(&self, entry: &RawPhenotypeEntry) -> Vec<Phenotype> {
        match entry
            .source_string
            .as_deref()
            .filter(|value| !self.options.is_placeholder(value))
        {
            Some(raw) => self.normalize(raw),
            None => self.normalize_cohort(&entry.cohort_context),
        }
    }

    fn normalize_cohort(&self, cohort_context: &str) -> Vec<Phenotype> {
        let phenotypes = self.normalize(cohort_context);
        if !phenotypes.is_empty() {
            return phenotypes;
        }
        debug!(cohort = %cohort_context, "cohort label kept verbatim");
        Phenotype::new(Some(collapse_whitespace(cohort_context)), None)
            .into_iter()
            .collect()
    }

    fn normalize_fragment(&self, fragment: &str) -> Option<Phenotype> {
        let cleaned = remove_noise(fragment);
        let (remainder, source_id) = extract_identifier(&cleaned);
        let label = finish_label(&remainder);

        if self.options.drop_uncertain && label.starts_with('?') {
            debug!(fragment = %fragment, "dropping uncertain phenotype");
            return None;
        }
        let phenotype = Phenotype::new(Some(label), source_id);
        if phenotype.is_none() {
            debug!(fragment = %fragment, "dropping empty phenotype fragment");
        }
        phenotype
    }
}

/// Normalizes with default options. See [`PhenotypeNormalizer::normalize`].
pub fn normalize(raw: &str) -> Vec<Phenotype> {
    PhenotypeNormalizer::default().normalize(raw)
}

/// Returns the label a single fragment would get, without its identifier.
///
/// Cleanup is repeated while it keeps shortening the text, so applying it
/// twice gives the same result as applying it once.
pub fn normalize_label(fragment: &str) -> String {
    let mut label = clean_label_once(fragment);
    loop {
        let next = clean_label_once(&label);
        if next.len() >= label.len() {
            return label;
        }
        label = next;
    }
}

fn clean_label_once(fragment: &str) -> String {
    let fixed = apply_fixes(fragment);
    let joined = fixed
        .split(';')
        .map(|part| {
            let (remainder, _) = extract_identifier(&remove_noise(part));
            finish_label(&remainder)
        })
        .filter(|label| !label.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&joined)
}

/// Returns the trimmed, distinct, non-empty fragments of a phenotype field
/// after the pre-split fixes.
pub fn split_fragments(raw: &str) -> Vec<String> {
    let fixed = apply_fixes(raw);
    let mut seen = HashSet::new();
    distinct_fragments(&fixed)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .filter(|fragment| seen.insert(*fragment))
        .map(str::to_string)
        .collect()
}

fn apply_fixes(raw: &str) -> String {
    let mut text = raw.to_string();
    for rule in BEFORE_SPLIT.iter() {
        if let Cow::Owned(replaced) = rule.pattern.replace_all(&text, rule.replacement) {
            text = replaced;
        }
    }
    text
}

fn distinct_fragments(fixed: &str) -> impl Iterator<Item = &str> {
    let mut seen = HashSet::new();
    fixed.split(';').filter(move |fragment| seen.insert(*fragment))
}

fn remove_noise(fragment: &str) -> String {
    let mut text = fragment.to_string();
    for pattern in AFTER_SPLIT.iter() {
        if let Cow::Owned(replaced) = pattern.replace_all(&text, "") {
            text = replaced;
        }
    }
    text
}

/// Extracts the first identifier and removes every identifier match from
/// the text. The non-OMIM pattern runs first so that a 6-digit Orphanet
/// accession is never read as an OMIM code.
fn extract_identifier(fragment: &str) -> (String, Option<SourceId>) {
    let other = OTHER_ID.captures(fragment).and_then(|caps| {
        let namespace = Namespace::from_prefix(&caps[1])?;
        SourceId::new(namespace, &caps[2]).ok()
    });
    let without_other = OTHER_ID.replace_all(fragment, "");

    let omim = OMIM_ID
        .captures(&without_other)
        .and_then(|caps| SourceId::omim(&caps[2]).ok());
    let remainder = OMIM_ID.replace_all(&without_other, "").into_owned();

    (remainder, omim.or(other))
}

fn finish_label(text: &str) -> String {
    let mut label = remove_unpaired_brackets(text);
    while EMPTY_BRACKETS.is_match(&label) {
        label = EMPTY_BRACKETS.replace_all(&label, "").into_owned();
    }
    let mut label = trim_separators(&collapse_whitespace(&label));
    while let Some(inner) = enclosed(&label) {
        label = trim_separators(inner);
    }
    if label.chars().any(char::is_alphanumeric) {
        label
    } else {
        String::new()
    }
}

fn trim_separators(text: &str) -> String {
    text.trim_matches(|ch: char| ch.is_whitespace() || matches!(ch, ',' | ';' | ':'))
        .to_string()
}

/// Drops every `(`, `)`, `[` and `]` that has no partner of the same kind.
fn remove_unpaired_brackets(text: &str) -> String {
    let mut open: Vec<(usize, char)> = Vec::new();
    let mut unpaired = HashSet::new();
    for (index, ch) in text.char_indices() {
        match ch {
            '(' | '[' => open.push((index, ch)),
            ')' | ']' => {
                let partner = if ch == ')' { '(' } else { '[' };
                if open.last().is_some_and(|(_, top)| *top == partner) {
                    open.pop();
                } else {
                    unpaired.insert(index);
                }
            }
            _ => {}
        }
    }
    unpaired.extend(open.into_iter().map(|(index, _)| index));
    if unpaired.is_empty() {
        return text.to_string();
    }
    text.char_indices()
        .filter(|(index, _)| !unpaired.contains(index))
        .map(|(_, ch)| ch)
        .collect()
}

/// The inside of a label wrapped whole in one bracket pair, e.g. `(Rett syndrome)`.
/// Expects balanced brackets.
fn enclosed(label: &str) -> Option<&str> {
    let close = match label.chars().next()? {
        '(' => ')',
        '[' => ']',
        _ => return None,
    };
    if label.len() < 2 || !label.ends_with(close) {
        return None;
    }
    let mut depth = 0usize;
    for (index, ch) in label.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && index + ch.len_utf8() < label.len() {
                    return None;
                }
            }
            _ => {}
        }
    }
    Some(&label[1..label.len() - 1])
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
