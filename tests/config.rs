//! 설정 파일 로드/저장 테스트.
use interceptor_material_toolbox::config::{self, Application, Config, ConfigError};
use interceptor_material_toolbox::quantity::PropertyFamily;

#[test]
fn default_config_is_written_when_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let cfg = config::load_or_default(&path).expect("load");
    assert!(path.exists());
    assert_eq!(cfg, Config::default());

    let reloaded = config::load_or_default(&path).expect("reload");
    assert_eq!(reloaded, cfg);
}

#[test]
fn yaml_documents_are_supported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        r#"
applications: [anchors]
required_properties: [tensile_strength]
penalty_per_trait: 0.25
properties:
  tensile_strength:
    family: stress
reference_values:
  tensile_strength: 300 MPa
weights:
  anchors:
    tensile_strength: 0.4
thresholds:
  anchors:
    tensile_strength_min: 200 MPa
"#,
    )
    .expect("write");
    let cfg = Config::load(&path).expect("yaml");
    assert_eq!(cfg.applications, vec![Application::Anchors]);
    assert_eq!(cfg.family_of("tensile_strength"), Some(PropertyFamily::Stress));
    assert_eq!(cfg.family_of("undeclared"), None);
    assert!((cfg.reference_value("tensile_strength").expect("ref") - 300.0).abs() < 1e-9);
    assert!((cfg.conflict_tolerance - 0.05).abs() < 1e-12);
}

#[test]
fn yaml_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yml");
    Config::default().save(&path).expect("save");
    assert_eq!(Config::load(&path).expect("load"), Config::default());
}

#[test]
fn negative_penalty_is_rejected() {
    let err = Config::from_toml_str("penalty_per_trait = -1.0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn reference_values_must_be_positive() {
    let cfg = Config::from_toml_str("[reference_values]\ndensity = 0\n").expect("config");
    assert!(cfg.reference_value("density").is_err());
}

#[test]
fn bad_alloy_pattern_is_a_config_error() {
    let cfg = Config::from_toml_str("alloy_pattern = \"(SS\"").expect("config");
    assert!(matches!(cfg.alloy_pattern(), Err(ConfigError::Pattern(_))));
}

#[test]
fn application_names_parse() {
    assert_eq!("Pontoons".parse::<Application>().unwrap(), Application::Pontoons);
    assert_eq!("anchor".parse::<Application>().unwrap(), Application::Anchors);
    assert!("bridge".parse::<Application>().is_err());
}
