//! 필수 물성/값 타당성 검증 테스트.
use std::collections::BTreeMap;

use interceptor_material_toolbox::config::PropertySpec;
use interceptor_material_toolbox::material::{AlloyPattern, PropertyMap, RawValue, DEFAULT_ALLOY_PATTERN};
use interceptor_material_toolbox::quantity::PropertyFamily;
use interceptor_material_toolbox::unifier::{Discrepancy, UnifiedRecords};
use interceptor_material_toolbox::validator::{validate, ValidationSchema};

fn schema() -> ValidationSchema {
    let mut properties = BTreeMap::new();
    properties.insert("yield_strength".to_string(), PropertySpec::new(PropertyFamily::Stress));
    properties.insert("density".to_string(), PropertySpec::new(PropertyFamily::Density));
    properties.insert("elongation".to_string(), PropertySpec::new(PropertyFamily::Ratio));
    properties.insert(
        "corrosion_resistance".to_string(),
        PropertySpec {
            family: PropertyFamily::Index,
            min: Some(1.0),
            max: Some(10.0),
        },
    );
    ValidationSchema {
        required_properties: vec!["yield_strength".to_string(), "density".to_string()],
        properties,
        alloy_pattern: AlloyPattern::new(DEFAULT_ALLOY_PATTERN).expect("pattern"),
    }
}

fn record(entries: &[(&str, Option<&str>)]) -> PropertyMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(RawValue::from)))
        .collect()
}

fn unified() -> UnifiedRecords {
    let mut records = BTreeMap::new();
    records.insert(
        "SS.166".to_string(),
        record(&[("yield_strength", Some("160 MPa")), ("density", Some("900 kg/m3"))]),
    );
    records.insert(
        "WA.042".to_string(),
        record(&[("yield_strength", Some("140 MPa")), ("density", None)]),
    );
    records.insert(
        "LA.304".to_string(),
        record(&[("yield_strength", Some("-5 MPa")), ("density", Some("0 kg/m3"))]),
    );
    records.insert(
        "LA.305".to_string(),
        record(&[("yield_strength", Some("150 kg/m3")), ("density", Some("2700"))]),
    );
    records.insert(
        "SS.200".to_string(),
        record(&[
            ("yield_strength", Some("210 MPa")),
            ("density", Some("2.7 g/cm3")),
            ("elongation", Some("abc")),
            ("corrosion_resistance", Some("12")),
        ]),
    );
    records.insert(
        "Alloy-X".to_string(),
        record(&[("yield_strength", Some("190")), ("density", Some("2800"))]),
    );
    records.insert("SS.999".to_string(), PropertyMap::new());
    UnifiedRecords {
        records,
        discrepancies: vec![Discrepancy {
            code: "SS.166".to_string(),
            property: "yield_strength".to_string(),
            text_value: "160 MPa".to_string(),
            graph_value: "175 MPa".to_string(),
        }],
    }
}

#[test]
fn complete_records_are_valid_and_normalized() {
    let (valid, report) = validate(&unified(), &schema());
    let ss = valid.iter().find(|r| r.code() == "SS.166").expect("SS.166 valid");
    assert_eq!(ss.value("yield_strength"), Some(160.0));
    assert_eq!(ss.value("density"), Some(900.0));
    assert!(report.issue("SS.166").is_none());
    assert_eq!(report.discrepancies.len(), 1);
}

#[test]
fn records_missing_required_properties_are_excluded() {
    let (valid, report) = validate(&unified(), &schema());
    assert!(valid.iter().all(|r| r.code() != "WA.042"));
    let issue = report.issue("WA.042").expect("WA.042 reported");
    assert!(issue.excluded);
    assert_eq!(issue.missing, vec!["density".to_string()]);

    let empty = report.issue("SS.999").expect("SS.999 reported");
    assert_eq!(
        empty.missing,
        vec!["yield_strength".to_string(), "density".to_string()]
    );
}

#[test]
fn negative_strength_and_zero_density_are_invalid() {
    let (valid, report) = validate(&unified(), &schema());
    assert!(valid.iter().all(|r| r.code() != "LA.304"));
    let issue = report.issue("LA.304").expect("LA.304 reported");
    assert!(issue.excluded);
    assert!(issue.missing.is_empty());
    let fields: Vec<&str> = issue.invalid.iter().map(|f| f.property.as_str()).collect();
    assert_eq!(fields, vec!["density", "yield_strength"]);
}

#[test]
fn unit_mismatch_fails_the_property() {
    let (valid, report) = validate(&unified(), &schema());
    assert!(valid.iter().all(|r| r.code() != "LA.305"));
    let issue = report.issue("LA.305").expect("LA.305 reported");
    assert_eq!(issue.invalid.len(), 1);
    assert_eq!(issue.invalid[0].property, "yield_strength");
    assert_eq!(issue.invalid[0].value, "150 kg/m3");
}

#[test]
fn invalid_optional_properties_are_dropped_but_record_kept() {
    let (valid, report) = validate(&unified(), &schema());
    let ss = valid.iter().find(|r| r.code() == "SS.200").expect("SS.200 valid");
    assert_eq!(ss.value("density"), Some(2700.0));
    assert_eq!(ss.value("elongation"), None);
    assert_eq!(ss.value("corrosion_resistance"), None);

    let issue = report.issue("SS.200").expect("SS.200 reported");
    assert!(!issue.excluded);
    let fields: Vec<&str> = issue.invalid.iter().map(|f| f.property.as_str()).collect();
    assert_eq!(fields, vec!["corrosion_resistance", "elongation"]);
}

#[test]
fn unrecognized_code_is_kept_when_complete() {
    let (valid, report) = validate(&unified(), &schema());
    assert!(valid.iter().any(|r| r.code() == "Alloy-X"));
    let issue = report.issue("Alloy-X").expect("Alloy-X reported");
    assert!(issue.unrecognized_code);
    assert!(!issue.excluded);
}

#[test]
fn excluded_codes_lists_every_rejected_record() {
    let (_, report) = validate(&unified(), &schema());
    let excluded: Vec<&str> = report.excluded_codes().collect();
    assert_eq!(excluded, vec!["LA.304", "LA.305", "SS.999", "WA.042"]);
}

#[test]
fn undeclared_properties_are_normalized_by_their_unit() {
    let schema = ValidationSchema {
        required_properties: vec!["yield_strength".to_string()],
        properties: BTreeMap::new(),
        alloy_pattern: AlloyPattern::new(DEFAULT_ALLOY_PATTERN).expect("pattern"),
    };
    let mut records = BTreeMap::new();
    records.insert(
        "SS.166".to_string(),
        record(&[
            ("yield_strength", Some("23.2 ksi")),
            ("density", Some("0.9 g/cm3")),
            ("cost", Some("3")),
            ("hardness", Some("40 furlongs")),
        ]),
    );
    let unified = UnifiedRecords {
        records,
        discrepancies: Vec::new(),
    };
    let (valid, report) = validate(&unified, &schema);
    let ss = &valid[0];
    assert!((ss.value("yield_strength").expect("yield") - 159.958).abs() < 1e-2);
    assert!((ss.value("density").expect("density") - 900.0).abs() < 1e-9);
    assert_eq!(ss.value("cost"), Some(3.0));
    let issue = report.issue("SS.166").expect("unknown unit reported");
    assert!(!issue.excluded);
    assert_eq!(issue.invalid[0].property, "hardness");
}
