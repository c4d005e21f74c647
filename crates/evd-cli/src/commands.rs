use anyhow::Result;
use comfy_table::Table;
use tracing::info_span;

use evd_cli::config::{LookupBackend, RunConfig};
use evd_cli::types::{ClinGenRunResult, RunResult};
use evd_cli::{clingen, pipeline};
use evd_map::RetryPolicy;
use evd_model::{MappingPolicy, NormalizerOptions};
use evd_normalization::PhenotypeNormalizer;

use crate::cli::{ClinGenArgs, LookupArgs, NormalizeArgs, PanelAppArgs};
use crate::summary::apply_table_style;

pub fn run_panelapp(args: &PanelAppArgs) -> Result<RunResult> {
    let policy = if args.keep_fuzzy {
        MappingPolicy::KeepFuzzy
    } else {
        MappingPolicy::MatchOnly
    };
    let mut config = RunConfig::new(&args.input_file, &args.output_file)
        .with_lookup(lookup_backend(&args.lookup))
        .with_policy(policy)
        .with_retry(RetryPolicy::default().with_max_attempts(args.max_attempts))
        .with_normalizer(normalizer_options(args))
        .with_mappings_dict(args.mappings_dict.clone())
        .with_save_mappings(args.save_mappings.clone())
        .with_literature(!args.skip_literature);
    if let Some(url) = &args.panelapp_url {
        config = config.with_panelapp_url(url.as_str());
    }
    pipeline::run(&config)
}

pub fn run_clingen(args: &ClinGenArgs) -> Result<ClinGenRunResult> {
    let config = RunConfig::new(&args.input_file, &args.output_file)
        .with_lookup(lookup_backend(&args.lookup))
        .with_retry(RetryPolicy::default().with_max_attempts(args.max_attempts))
        .with_mappings_dict(args.mappings_dict.clone())
        .with_save_mappings(args.save_mappings.clone())
        .with_literature(false);
    clingen::run(&config)
}

fn normalizer_options(args: &PanelAppArgs) -> NormalizerOptions {
    args.placeholders.iter().fold(
        NormalizerOptions::default().with_drop_uncertain(!args.keep_uncertain),
        |options, placeholder| options.with_placeholder(placeholder.as_str()),
    )
}

fn lookup_backend(args: &LookupArgs) -> LookupBackend {
    if args.skip_mapping {
        LookupBackend::Skip
    } else if let Some(path) = &args.lookup_table {
        LookupBackend::Table(path.clone())
    } else if let Some(url) = &args.ols_url {
        LookupBackend::Ols(url.clone())
    } else {
        LookupBackend::default()
    }
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    let span = info_span!("normalize", texts = args.texts.len());
    let _guard = span.enter();
    let normalizer = PhenotypeNormalizer::new(
        NormalizerOptions::default().with_drop_uncertain(!args.keep_uncertain),
    );
    let mut table = Table::new();
    table.set_header(vec!["Input", "Label", "Source ID"]);
    apply_table_style(&mut table);
    for text in &args.texts {
        let phenotypes = normalizer.normalize(text);
        if phenotypes.is_empty() {
            table.add_row(vec![text.as_str(), "-", "-"]);
            continue;
        }
        for phenotype in phenotypes {
            let source_id = phenotype
                .source_id()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            table.add_row(vec![
                text.clone(),
                phenotype.label().unwrap_or("-").to_string(),
                source_id,
            ]);
        }
    }
    println!("{table}");
    Ok(())
}
