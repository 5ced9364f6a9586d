//! 입력 로드부터 순위 보고서까지 전체 흐름 테스트.
use interceptor_material_toolbox::config::{Application, Config};
use interceptor_material_toolbox::input::{collection_from_str, InputError};
use interceptor_material_toolbox::pipeline;
use interceptor_material_toolbox::report;

const CONFIG: &str = r#"
applications = ["pontoons", "frame"]
required_properties = ["yield_strength", "density"]
penalty_per_trait = 0.5

[properties.yield_strength]
family = "stress"

[properties.density]
family = "density"

[reference_values]
yield_strength = "100 MPa"
density = "1 g/cm3"

[weights.pontoons]
yield_strength = 0.2
density = -0.3

[thresholds.pontoons]
yield_strength_min = "150 MPa"
"#;

const TEXT: &str = r#"{
    "SS.166": {"yield_strength": "160 MPa", "density": null},
    "WA.042": {"yield_strength": {"value": 140, "unit": "MPa"}},
    "LA.304": {"yield_strength": "210 MPa"}
}"#;

const GRAPH: &str = r#"{
    "SS.166": {"density": "900 kg/m3", "yield_strength": "158 MPa"},
    "WA.042": {"density": "1.0 g/cm3"},
    "LA.777": "unreadable"
}"#;

fn run() -> pipeline::PipelineReport {
    let cfg = Config::from_toml_str(CONFIG).expect("config");
    let text = collection_from_str(TEXT).expect("text");
    let graph = collection_from_str(GRAPH).expect("graph");
    pipeline::run(&cfg, &text, &graph, &cfg.applications).expect("pipeline")
}

#[test]
fn top_level_must_be_a_mapping() {
    assert!(matches!(
        collection_from_str("[1, 2]"),
        Err(InputError::NotAMapping("array"))
    ));
    assert!(matches!(collection_from_str("{"), Err(InputError::Json(_))));
}

#[test]
fn malformed_entries_become_validation_failures() {
    let report = run();
    assert!(report.unified.records["LA.777"].is_empty());
    let issue = report.validation.issue("LA.777").expect("LA.777 reported");
    assert!(issue.excluded);
    // LA.304는 밀도가 없어 제외된다.
    assert!(report.validation.issue("LA.304").expect("LA.304").excluded);
}

#[test]
fn pipeline_ranks_the_example_scenario() {
    let report = run();
    let outcome = report.outcome(Application::Pontoons).expect("pontoons");
    assert!(outcome.check.passed("SS.166"));
    assert!(!outcome.check.passed("WA.042"));

    let codes: Vec<&str> = outcome.ranking.entries.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["SS.166", "WA.042"]);
    assert_eq!(report.best_material(Application::Pontoons, true), Some("SS.166"));
}

#[test]
fn close_values_are_not_reported_as_conflicts() {
    // 160 vs 158 MPa 는 5% 이내
    let report = run();
    assert!(report.validation.discrepancies.is_empty());
}

#[test]
fn missing_sections_skip_only_that_application() {
    let report = run();
    assert!(report.outcome(Application::Frame).is_none());
    let reason = &report.failed_applications[&Application::Frame];
    assert!(reason.contains("frame"), "{reason}");
    assert!(report.outcome(Application::Pontoons).is_some());
}

#[test]
fn runs_are_deterministic() {
    assert_eq!(run(), run());
}

#[test]
fn report_exports() {
    let report = run();
    let json = report::to_json(&report).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse back");
    let entries = &value["applications"]["pontoons"]["ranking"]["entries"];
    assert_eq!(entries[0]["code"], "SS.166");
    assert_eq!(entries[0]["passed"], true);
    assert!(value["failed_applications"]["frame"].is_string());

    let csv = report::unified_to_csv(&report.unified);
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Alloy Name,density,yield_strength"));
    assert_eq!(lines.next(), Some("LA.304,missing data,210 MPa"));
    assert!(csv.contains("LA.777,missing data,missing data"));

    let ranking = report::ranking_to_csv(&report.outcome(Application::Pontoons).unwrap().ranking);
    assert!(ranking.starts_with("rank,code,application,score,status,missing\n1,SS.166,pontoons,"));

    let summary = report::render_summary(&report);
    assert!(summary.contains("== pontoons =="));
    assert!(summary.contains("frame == skipped"));
}

#[test]
fn undeclared_properties_take_the_family_of_their_unit() {
    let cfg = Config::from_toml_str(
        r#"
        applications = ["pontoons"]
        required_properties = ["yield_strength", "density"]
        penalty_per_trait = 0.5

        [reference_values]
        yield_strength = "100 MPa"
        density = "1000 kg/m3"

        [weights.pontoons]
        yield_strength = 0.2
        density = -0.3

        [thresholds.pontoons]
        yield_strength_min = "150 MPa"
        "#,
    )
    .expect("config");
    assert!(cfg.properties.is_empty());

    let text = collection_from_str(
        r#"{
            "SS.166": {"yield_strength": "160 MPa", "density": "900 kg/m3"},
            "WA.042": {"yield_strength": "140 MPa", "density": "1 g/cm3"}
        }"#,
    )
    .expect("text");
    let graph = collection_from_str(r#"{"SS.166": {"yield_strength": "0.161 GPa"}}"#).expect("graph");
    let report = pipeline::run(&cfg, &text, &graph, &cfg.applications).expect("pipeline");

    assert!(report.validation.is_clean(), "{:?}", report.validation);
    assert_eq!(report.valid_records.len(), 2);
    let wa = &report.valid_records[1];
    assert_eq!(wa.value("density"), Some(1000.0));
    assert!(report.failed_applications.is_empty());

    let outcome = report.outcome(Application::Pontoons).expect("pontoons");
    assert!(outcome.check.passed("SS.166"));
    assert!(!outcome.check.passed("WA.042"));
    assert_eq!(report.best_material(Application::Pontoons, true), Some("SS.166"));
    assert_eq!(outcome.ranking.entries[1].code, "WA.042");
}
