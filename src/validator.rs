//! 통합 레코드의 필수 물성과 값 타당성을 검사한다.
//!
//! 레코드 하나의 실패는 보고서에만 기록되고 전체 실행을 멈추지 않는다.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Config, ConfigError, PropertySpec};
use crate::conversion;
use crate::material::{AlloyPattern, MaterialRecord, RawValue};
use crate::quantity::Quantity;
use crate::unifier::{Discrepancy, UnifiedRecords};

/// 검증 기준.
#[derive(Debug, Clone)]
pub struct ValidationSchema {
    pub required_properties: Vec<String>,
    pub properties: BTreeMap<String, PropertySpec>,
    pub alloy_pattern: AlloyPattern,
}

impl ValidationSchema {
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            required_properties: cfg.required_properties.clone(),
            properties: cfg.properties.clone(),
            alloy_pattern: cfg.alloy_pattern()?,
        })
    }

    /// 선언되지 않은 물성은 값의 단위로 계열을 정하고 범위 제한은 두지 않는다.
    fn spec(&self, property: &str, raw: Option<&RawValue>) -> PropertySpec {
        self.properties.get(property).cloned().unwrap_or_else(|| {
            PropertySpec::new(raw.map(conversion::infer_family).unwrap_or_default())
        })
    }

    fn is_required(&self, property: &str) -> bool {
        self.required_properties.iter().any(|p| p == property)
    }
}

/// 무효 물성과 그 사유.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidField {
    pub property: String,
    pub value: String,
    pub reason: String,
}

/// 재료 하나에 대한 검증 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub code: String,
    /// 결측된 필수 물성
    pub missing: Vec<String>,
    pub invalid: Vec<InvalidField>,
    /// 합금 코드 형식이 패턴과 맞지 않음
    pub unrecognized_code: bool,
    /// 이후 단계에서 제외되었는지 여부
    pub excluded: bool,
}

/// 검증 보고서. 문제가 있는 재료만 담는다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    /// 통합 단계에서 발견된 텍스트/그래프 불일치
    pub discrepancies: Vec<Discrepancy>,
}

impl ValidationReport {
    pub fn issue(&self, code: &str) -> Option<&ValidationIssue> {
        self.issues.iter().find(|i| i.code == code)
    }

    pub fn excluded_codes(&self) -> impl Iterator<Item = &str> {
        self.issues
            .iter()
            .filter(|i| i.excluded)
            .map(|i| i.code.as_str())
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.discrepancies.is_empty()
    }
}

/// 값 하나를 검사하여 기준 단위 값으로 환산한다.
/// `Ok(None)`은 결측, `Err`은 무효 사유이다.
fn check_value(spec: &PropertySpec, raw: Option<&RawValue>) -> Result<Option<Quantity>, String> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let quantity = match conversion::normalize(spec.family, raw) {
        Ok(Some(q)) => q,
        Ok(None) => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };
    if !spec.family.is_sane(quantity.value_base) {
        return Err(format!(
            "{} 계열에서 허용되지 않는 값: {quantity}",
            spec.family
        ));
    }
    if let Some(min) = spec.min {
        if quantity.value_base < min {
            return Err(format!("허용 범위 미만 (최소 {min})"));
        }
    }
    if let Some(max) = spec.max {
        if quantity.value_base > max {
            return Err(format!("허용 범위 초과 (최대 {max})"));
        }
    }
    Ok(Some(quantity))
}

/// 통합 레코드를 검증한다.
///
/// 필수 물성이 결측이거나 무효인 레코드는 결과에서 제외하고 보고서에 남긴다.
/// 필수가 아닌 물성의 무효 값은 레코드에서 빼고 보고만 한다.
pub fn validate(
    unified: &UnifiedRecords,
    schema: &ValidationSchema,
) -> (Vec<MaterialRecord>, ValidationReport) {
    let mut valid = Vec::with_capacity(unified.records.len());
    let mut report = ValidationReport {
        issues: Vec::new(),
        discrepancies: unified.discrepancies.clone(),
    };

    for (code, props) in &unified.records {
        let mut values = BTreeMap::new();
        let mut invalid = Vec::new();
        let mut missing = Vec::new();

        for (name, raw) in props {
            let spec = schema.spec(name, raw.as_ref());
            match check_value(&spec, raw.as_ref()) {
                Ok(Some(q)) => {
                    values.insert(name.clone(), q);
                }
                Ok(None) => {}
                Err(reason) => invalid.push(InvalidField {
                    property: name.clone(),
                    value: raw.as_ref().map(ToString::to_string).unwrap_or_default(),
                    reason,
                }),
            }
        }

        for required in &schema.required_properties {
            let is_invalid = invalid.iter().any(|f| &f.property == required);
            if !values.contains_key(required) && !is_invalid {
                missing.push(required.clone());
            }
        }

        let required_invalid = invalid.iter().any(|f| schema.is_required(&f.property));
        let unrecognized_code = !schema.alloy_pattern.matches(code);
        let excluded = !missing.is_empty() || required_invalid;

        if unrecognized_code {
            warn!(code = %code, pattern = schema.alloy_pattern.as_str(), "합금 코드 형식 불일치");
        }
        if excluded {
            warn!(code = %code, missing = ?missing, invalid = invalid.len(), "필수 물성 문제로 레코드 제외");
        }

        if excluded || unrecognized_code || !invalid.is_empty() {
            report.issues.push(ValidationIssue {
                code: code.clone(),
                missing,
                invalid,
                unrecognized_code,
                excluded,
            });
        }
        if !excluded {
            valid.push(MaterialRecord::new(code.clone(), values));
        }
    }

    info!(
        total = unified.records.len(),
        valid = valid.len(),
        issues = report.issues.len(),
        "데이터 검증 완료"
    );
    (valid, report)
}
