use evd_model::Phenotype;
use evd_normalization::{normalize, normalize_label, split_fragments};
use proptest::prelude::*;

/// Disease-like words: letters only, so no identifier or citation patterns.
fn word() -> impl Strategy<Value = String> {
    "[a-z]{3,10}".prop_map(|word| {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => word,
        }
    })
}

fn clean_fragment() -> impl Strategy<Value = String> {
    proptest::collection::vec(word(), 1..4).prop_map(|words| words.join(" "))
}

fn noisy_fragment() -> impl Strategy<Value = String> {
    (
        clean_fragment(),
        proptest::option::of("[1-9][0-9]{5}"),
        proptest::bool::ANY,
        proptest::bool::ANY,
    )
        .prop_map(|(label, omim, braces, citation)| {
            let mut text = if braces { format!("{{{label}}}") } else { label };
            if let Some(code) = omim {
                text.push_str(&format!(", {code}"));
            }
            if citation {
                text.push_str(" (PMID: 12345)");
            }
            text
        })
}

proptest! {
    #[test]
    fn clean_fragments_are_preserved_in_order(
        fragments in proptest::collection::vec(clean_fragment(), 1..6)
    ) {
        let mut distinct: Vec<String> = Vec::new();
        for fragment in &fragments {
            if !distinct.contains(fragment) {
                distinct.push(fragment.clone());
            }
        }
        let phenotypes = normalize(&fragments.join(";"));
        let labels: Vec<String> = phenotypes.iter().map(Phenotype::display_name).collect();
        prop_assert_eq!(labels, distinct);
        prop_assert!(phenotypes.iter().all(|p| p.source_id.is_none()));
    }

    #[test]
    fn label_cleanup_is_a_fixed_point(fragment in noisy_fragment()) {
        let once = normalize_label(&fragment);
        let twice = normalize_label(&once);
        prop_assert_eq!(&once, &twice);

        let again = normalize(&once);
        prop_assert_eq!(again.len(), 1);
        prop_assert_eq!(again[0].label(), Some(once.as_str()));
    }

    #[test]
    fn uncertain_fragments_are_dropped(fragment in clean_fragment()) {
        let phenotypes = normalize(&format!("?{fragment}"));
        prop_assert!(phenotypes.is_empty());
    }

    #[test]
    fn omim_code_is_extracted_from_noisy_fragment(
        label in clean_fragment(),
        code in "[1-9][0-9]{5}",
    ) {
        let phenotypes = normalize(&format!("{{{label}}}, {code} (PMID: 98765)"));
        prop_assert_eq!(phenotypes.len(), 1);
        prop_assert_eq!(phenotypes[0].label(), Some(label.as_str()));
        let expected = format!("OMIM:{code}");
        prop_assert_eq!(
            phenotypes[0].source_id().map(ToString::to_string),
            Some(expected)
        );
    }
}

#[test]
fn boilerplate_only_fragment_with_question_mark_is_dropped() {
    assert!(normalize("?Disease-causing germline mutation(s) in").is_empty());
}

#[test]
fn orphanet_alias_is_normalized() {
    let phenotypes = normalize("Cardiomyopathy, OrphaNet: ORPHA217607");
    assert_eq!(phenotypes.len(), 1);
    assert_eq!(phenotypes[0].label(), Some("Cardiomyopathy"));
    assert_eq!(
        phenotypes[0].source_id().map(ToString::to_string).as_deref(),
        Some("ORPHA:217607")
    );
}

#[test]
fn mim_prefix_with_hash() {
    let phenotypes = normalize("Noonan syndrome 1, MIM #163950");
    assert_eq!(phenotypes[0].label(), Some("Noonan syndrome 1"));
    assert_eq!(
        phenotypes[0].source_id().map(ToString::to_string).as_deref(),
        Some("OMIM:163950")
    );
}

#[test]
fn cohort_fragments_keep_original_text() {
    assert_eq!(
        split_fragments("Aarskog-Scott syndrome, 305400Mental retardation, X-linked syndromic 16, 305400"),
        vec![
            "Aarskog-Scott syndrome, 305400",
            "Mental retardation, X-linked syndromic 16, 305400"
        ]
    );
}

#[test]
fn bracketed_identifier_leaves_no_brackets() {
    let phenotypes = normalize("Noonan syndrome [MIM:163950]");
    assert_eq!(phenotypes.len(), 1);
    assert_eq!(phenotypes[0].label(), Some("Noonan syndrome"));
    assert_eq!(
        phenotypes[0].source_id().map(ToString::to_string).as_deref(),
        Some("OMIM:163950")
    );
}

#[test]
fn split_inside_parentheses_keeps_identifier_only_fragment() {
    let phenotypes = normalize("Leigh syndrome (OMIM 256000; ORPHA:506)");
    assert_eq!(phenotypes.len(), 2);
    assert_eq!(phenotypes[0].label(), Some("Leigh syndrome"));
    assert_eq!(
        phenotypes[0].source_id().map(ToString::to_string).as_deref(),
        Some("OMIM:256000")
    );
    assert_eq!(phenotypes[1].label(), None);
    assert_eq!(
        phenotypes[1].source_id().map(ToString::to_string).as_deref(),
        Some("ORPHA:506")
    );
}

#[test]
fn enclosing_brackets_are_stripped() {
    let phenotypes = normalize("(Bladder cancer), 109800");
    assert_eq!(phenotypes[0].label(), Some("Bladder cancer"));
    assert_eq!(
        phenotypes[0].source_id().map(ToString::to_string).as_deref(),
        Some("OMIM:109800")
    );

    let phenotypes = normalize("[Rett syndrome]");
    assert_eq!(phenotypes[0].label(), Some("Rett syndrome"));
}

#[test]
fn punctuation_only_fragment_is_dropped() {
    assert!(normalize(")").is_empty());
    assert_eq!(normalize("Rett syndrome; ( )").len(), 1);
}

#[test]
fn gene_symbol_is_not_read_as_hpo_id() {
    let phenotypes = normalize("SHP2 deficiency");
    assert_eq!(phenotypes.len(), 1);
    assert_eq!(phenotypes[0].label(), Some("SHP2 deficiency"));
    assert!(phenotypes[0].source_id().is_none());
}
