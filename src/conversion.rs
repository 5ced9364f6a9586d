use thiserror::Error;

use crate::material::RawValue;
use crate::quantity::{PropertyFamily, Quantity};
use crate::units::*;

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// 알 수 없는 단위 문자열
    #[error("알 수 없는 단위: {0}")]
    UnknownUnit(String),
    /// 다른 물리량 계열의 단위
    #[error("{family} 물성에 사용할 수 없는 단위: {unit}")]
    UnitMismatch {
        family: PropertyFamily,
        unit: String,
    },
    /// 숫자로 해석할 수 없는 값
    #[error("숫자로 해석할 수 없는 값: {0}")]
    Unparseable(String),
}

/// OCR/그래프 추출기가 결측으로 표기하는 문자열.
const MISSING_MARKERS: &[&str] = &["", "n/a", "na", "-", "none", "null", "missing data"];

/// 문자열이 결측 표기인지 확인한다.
pub fn is_missing_marker(text: &str) -> bool {
    let t = text.trim().to_lowercase();
    MISSING_MARKERS.contains(&t.as_str())
}

/// `"184 MPa"`, `"7.9g/cm3"`, `"250"` 형태의 문자열을 숫자와 단위로 분리한다.
pub fn split_measurement(text: &str) -> Result<(f64, Option<&str>), ConversionError> {
    let t = text.trim();
    if let Ok(v) = t.parse::<f64>() {
        return Ok((v, None));
    }
    let (num, unit) = match t.split_once(char::is_whitespace) {
        Some((n, u)) => (n, u.trim()),
        None => {
            let idx = t
                .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
                .unwrap_or(t.len());
            (&t[..idx], t[idx..].trim())
        }
    };
    let value = num
        .parse::<f64>()
        .map_err(|_| ConversionError::Unparseable(text.to_string()))?;
    if unit.is_empty() {
        Ok((value, None))
    } else {
        Ok((value, Some(unit)))
    }
}

/// 원시 값을 계열 기준 단위로 환산한다. 결측 표기는 `Ok(None)`을 반환한다.
pub fn normalize(family: PropertyFamily, raw: &RawValue) -> Result<Option<Quantity>, ConversionError> {
    let (value, unit) = match raw {
        RawValue::Number(v) => (*v, None),
        RawValue::Measured { value, unit } => (*value, Some(unit.as_str())),
        RawValue::Text(text) => {
            if is_missing_marker(text) {
                return Ok(None);
            }
            split_measurement(text)?
        }
    };
    if !value.is_finite() {
        return Err(ConversionError::Unparseable(raw.to_string()));
    }
    let base = to_base(family, value, unit)?;
    Ok(Some(Quantity::new(family, base)))
}

/// 값을 계열의 기준 단위로 환산한다. 단위가 없으면 이미 기준 단위로 간주한다.
pub fn to_base(family: PropertyFamily, value: f64, unit: Option<&str>) -> Result<f64, ConversionError> {
    match unit {
        None => Ok(value),
        Some(u) if u.trim().is_empty() => Ok(value),
        Some(u) => convert(family, value, u, family.base_unit()),
    }
}

/// 문자열로 전달된 단위명을 enum으로 변환한 뒤 지정된 단위로 환산한다.
///
/// 단위 문자열 예시는 `MPa`, `ksi`, `N/mm2`, `kg/m3`, `g/cm³`, `%` 등을 사용할 수 있다.
pub fn convert(
    family: PropertyFamily,
    value: f64,
    from_unit_str: &str,
    to_unit_str: &str,
) -> Result<f64, ConversionError> {
    match family {
        PropertyFamily::Stress => {
            let from = parse_in_family(family, from_unit_str, parse_stress_unit)?;
            let to = parse_in_family(family, to_unit_str, parse_stress_unit)?;
            Ok(convert_stress(value, from, to))
        }
        PropertyFamily::Density => {
            let from = parse_in_family(family, from_unit_str, parse_density_unit)?;
            let to = parse_in_family(family, to_unit_str, parse_density_unit)?;
            Ok(convert_density(value, from, to))
        }
        PropertyFamily::Ratio => {
            let from = parse_in_family(family, from_unit_str, parse_ratio_unit)?;
            let to = parse_in_family(family, to_unit_str, parse_ratio_unit)?;
            Ok(convert_ratio(value, from, to))
        }
        PropertyFamily::Index => {
            parse_in_family(family, from_unit_str, parse_index_unit)?;
            parse_in_family(family, to_unit_str, parse_index_unit)?;
            Ok(value)
        }
    }
}

/// 단위 문자열이 어느 계열에 속하는지 찾는다.
pub fn unit_family(s: &str) -> Option<PropertyFamily> {
    if parse_stress_unit(s).is_some() {
        Some(PropertyFamily::Stress)
    } else if parse_density_unit(s).is_some() {
        Some(PropertyFamily::Density)
    } else if parse_ratio_unit(s).is_some() {
        Some(PropertyFamily::Ratio)
    } else if parse_index_unit(s).is_some() {
        Some(PropertyFamily::Index)
    } else {
        None
    }
}

/// 값에 붙은 단위로 물성 계열을 추정한다. 단위가 없거나 모르는 단위이면 지수로 본다.
pub fn infer_family(raw: &RawValue) -> PropertyFamily {
    let unit = match raw {
        RawValue::Number(_) => None,
        RawValue::Measured { unit, .. } => Some(unit.as_str()),
        RawValue::Text(text) => split_measurement(text).ok().and_then(|(_, unit)| unit),
    };
    unit.and_then(unit_family).unwrap_or_default()
}

fn parse_in_family<U>(
    family: PropertyFamily,
    s: &str,
    parse: fn(&str) -> Option<U>,
) -> Result<U, ConversionError> {
    match parse(s) {
        Some(unit) => Ok(unit),
        None => match unit_family(s) {
            Some(_) => Err(ConversionError::UnitMismatch {
                family,
                unit: s.to_string(),
            }),
            None => Err(ConversionError::UnknownUnit(s.to_string())),
        },
    }
}

fn canonical(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace('³', "3")
        .replace('²', "2")
        .replace("^", "")
        .replace(' ', "")
}

fn parse_stress_unit(s: &str) -> Option<StressUnit> {
    match canonical(s).as_str() {
        "pa" | "pascal" => Some(StressUnit::Pascal),
        "kpa" | "kilopascal" => Some(StressUnit::KiloPascal),
        "mpa" | "megapascal" => Some(StressUnit::MegaPascal),
        "gpa" | "gigapascal" => Some(StressUnit::GigaPascal),
        "n/mm2" => Some(StressUnit::NewtonPerSquareMillimeter),
        "kgf/mm2" | "kg/mm2" => Some(StressUnit::KgfPerSquareMillimeter),
        "bar" => Some(StressUnit::Bar),
        "psi" => Some(StressUnit::Psi),
        "ksi" => Some(StressUnit::Ksi),
        _ => None,
    }
}

fn parse_density_unit(s: &str) -> Option<DensityUnit> {
    match canonical(s).as_str() {
        "kg/m3" => Some(DensityUnit::KgPerCubicMeter),
        "g/cm3" | "g/cc" => Some(DensityUnit::GramPerCubicCentimeter),
        "kg/l" | "kg/dm3" => Some(DensityUnit::KgPerLiter),
        "lb/ft3" | "lbm/ft3" => Some(DensityUnit::PoundPerCubicFoot),
        "lb/in3" | "lbm/in3" => Some(DensityUnit::PoundPerCubicInch),
        _ => None,
    }
}

fn parse_ratio_unit(s: &str) -> Option<RatioUnit> {
    match canonical(s).as_str() {
        "%" | "percent" | "pct" => Some(RatioUnit::Percent),
        "fraction" | "frac" => Some(RatioUnit::Fraction),
        _ => None,
    }
}

// 지수 계열은 단위가 없으므로 빈 문자열과 표기용 이름만 허용한다.
fn parse_index_unit(s: &str) -> Option<()> {
    match canonical(s).as_str() {
        "" | "index" | "-" => Some(()),
        _ => None,
    }
}
