use figment::providers::{Format, Toml};
use figment::Figment;

use regrag_core::config::{expand_path, Config};
use regrag_core::types::{DocStatus, MetadataFilter};

#[test]
fn retrieval_defaults_when_section_absent() {
    let config = Config::from_figment(Figment::new()).expect("load");
    let retrieval = config.retrieval().expect("retrieval");
    assert_eq!(retrieval.variant_count, 3);
    assert_eq!(retrieval.per_query_k, 5);
    assert_eq!(retrieval.rrf_k, 60);
    assert_eq!(retrieval.fused_top_m, 5);
}

#[test]
fn retrieval_section_overrides_defaults() {
    let figment = Figment::new().merge(Toml::string(
        r#"
        [retrieval]
        variant_count = 4
        rrf_k = 10
        "#,
    ));
    let config = Config::from_figment(figment).expect("load");
    let retrieval = config.retrieval().expect("retrieval");
    assert_eq!(retrieval.variant_count, 4);
    assert_eq!(retrieval.rrf_k, 10);
    // untouched fields keep their defaults
    assert_eq!(retrieval.per_query_k, 5);
}

#[test]
fn zero_variant_count_is_rejected() {
    let figment = Figment::new().merge(Toml::string("[retrieval]\nvariant_count = 0\n"));
    assert!(Config::from_figment(figment).is_err());
}

#[test]
fn model_defaults_point_at_local_endpoint() {
    let config = Config::from_figment(Figment::new()).expect("load");
    let model = config.model().expect("model");
    assert!(model.base_url.starts_with("http://localhost"));
    assert!(model.generate_timeout_secs > model.grade_timeout_secs);
}

#[test]
fn expand_path_handles_env_vars() {
    std::env::set_var("REGRAG_TEST_DIR", "/tmp/regrag");
    let p = expand_path("${REGRAG_TEST_DIR}/chunks.json");
    assert_eq!(p, std::path::PathBuf::from("/tmp/regrag/chunks.json"));
}

#[test]
fn empty_metadata_filter_reports_empty() {
    assert!(MetadataFilter::default().is_empty());
    let f = MetadataFilter {
        audience: Some("Research Analysts".into()),
        ..Default::default()
    };
    assert!(!f.is_empty());
}

#[test]
fn doc_status_serializes_uppercase() {
    assert_eq!(DocStatus::Active.as_str(), "ACTIVE");
    assert_eq!(DocStatus::Superseded.as_str(), "SUPERSEDED");
}
