//! 단위 분리/환산 회귀 테스트.
use interceptor_material_toolbox::conversion::{
    convert, is_missing_marker, normalize, split_measurement, unit_family, ConversionError,
};
use interceptor_material_toolbox::material::RawValue;
use interceptor_material_toolbox::quantity::PropertyFamily;

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "{label} expected {expected:.6} got {actual:.6} (tol {tol})"
    );
}

fn base(family: PropertyFamily, raw: RawValue) -> f64 {
    normalize(family, &raw)
        .expect("normalize")
        .expect("value present")
        .value_base
}

#[test]
fn split_value_and_unit() {
    assert_eq!(split_measurement("184 MPa").unwrap(), (184.0, Some("MPa")));
    assert_eq!(split_measurement("7.9g/cm3").unwrap(), (7.9, Some("g/cm3")));
    assert_eq!(split_measurement(" 250 ").unwrap(), (250.0, None));
    assert_eq!(split_measurement("-5 MPa").unwrap(), (-5.0, Some("MPa")));
    assert!(matches!(
        split_measurement("strong"),
        Err(ConversionError::Unparseable(_))
    ));
}

#[test]
fn stress_units_normalize_to_mpa() {
    assert_close("ksi", base(PropertyFamily::Stress, "23.2 ksi".into()), 159.958, 1e-2);
    assert_close("GPa", base(PropertyFamily::Stress, "70 GPa".into()), 70_000.0, 1e-9);
    assert_close("N/mm2", base(PropertyFamily::Stress, "184 N/mm²".into()), 184.0, 1e-9);
    assert_close("bare", base(PropertyFamily::Stress, RawValue::Number(160.0)), 160.0, 1e-9);
    let measured = RawValue::Measured {
        value: 160_000.0,
        unit: "kPa".to_string(),
    };
    assert_close("measured", base(PropertyFamily::Stress, measured), 160.0, 1e-9);
}

#[test]
fn density_units_normalize_to_kg_per_m3() {
    assert_close("g/cm3", base(PropertyFamily::Density, "0.9 g/cm3".into()), 900.0, 1e-9);
    assert_close("g/cm³", base(PropertyFamily::Density, "2.7 g/cm³".into()), 2700.0, 1e-9);
    assert_close("lb/ft3", base(PropertyFamily::Density, "168.5 lb/ft3".into()), 2699.1, 0.1);
}

#[test]
fn ratio_accepts_percent_and_fraction() {
    assert_close("percent", base(PropertyFamily::Ratio, "45%".into()), 45.0, 1e-9);
    assert_close("fraction", base(PropertyFamily::Ratio, "0.12 fraction".into()), 12.0, 1e-9);
}

#[test]
fn unit_of_other_family_is_a_mismatch() {
    let err = normalize(PropertyFamily::Density, &"150 MPa".into()).unwrap_err();
    assert_eq!(
        err,
        ConversionError::UnitMismatch {
            family: PropertyFamily::Density,
            unit: "MPa".to_string()
        }
    );
    let err = normalize(PropertyFamily::Index, &"8 psi".into()).unwrap_err();
    assert!(matches!(err, ConversionError::UnitMismatch { .. }));
}

#[test]
fn unknown_unit_is_reported() {
    let err = normalize(PropertyFamily::Stress, &"10 furlongs".into()).unwrap_err();
    assert_eq!(err, ConversionError::UnknownUnit("furlongs".to_string()));
    assert_eq!(unit_family("furlongs"), None);
    assert_eq!(unit_family("ksi"), Some(PropertyFamily::Stress));
}

#[test]
fn missing_markers_are_not_values() {
    for marker in ["N/A", "", " - ", "missing data"] {
        assert!(is_missing_marker(marker), "{marker:?}");
        assert_eq!(normalize(PropertyFamily::Stress, &marker.into()), Ok(None));
    }
}

#[test]
fn convert_between_units_of_one_family() {
    let psi = convert(PropertyFamily::Stress, 1.0, "MPa", "psi").expect("convert");
    assert_close("psi", psi, 145.038, 1e-3);
    let back = convert(PropertyFamily::Stress, psi, "psi", "MPa").expect("convert");
    assert_close("MPa", back, 1.0, 1e-9);
}
