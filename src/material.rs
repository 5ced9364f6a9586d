//! 물성 레코드 자료형. 모든 단계가 주고받는 공통 데이터이다.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;

/// 합금 코드 기본 패턴. 접두사 SS/WA/LA + "." + 숫자 3자리.
pub const DEFAULT_ALLOY_PATTERN: &str = r"^(SS|WA|LA)\.\d{3}$";

/// 추출기가 보고한 가공 전 물성 값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// 단위 없는 숫자. 계열 기준 단위로 간주한다.
    Number(f64),
    /// 값과 단위가 분리되어 전달된 경우
    Measured { value: f64, unit: String },
    /// `"184 MPa"` 같은 문자열
    Text(String),
}

impl RawValue {
    /// JSON 값을 원시 값으로 변환한다. `null`은 값 없음으로 처리한다.
    ///
    /// 숫자/문자열/`{value, unit}` 이외의 형태는 문자열로 보존하여
    /// 검증 단계에서 해당 물성만 무효 처리되도록 한다.
    pub fn from_json(value: &serde_json::Value) -> Option<RawValue> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => Some(RawValue::Number(v)),
                None => Some(RawValue::Text(n.to_string())),
            },
            serde_json::Value::String(s) => Some(RawValue::Text(s.clone())),
            serde_json::Value::Object(map) => {
                let v = map.get("value").and_then(serde_json::Value::as_f64);
                let unit = map.get("unit").and_then(serde_json::Value::as_str);
                match (v, unit) {
                    (Some(value), Some(unit)) => Some(RawValue::Measured {
                        value,
                        unit: unit.to_string(),
                    }),
                    (Some(value), None) => Some(RawValue::Number(value)),
                    _ => Some(RawValue::Text(value.to_string())),
                }
            }
            other => Some(RawValue::Text(other.to_string())),
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Number(v) => write!(f, "{v}"),
            RawValue::Measured { value, unit } => write!(f, "{value} {unit}"),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// 물성명 → 원시 값. `None`은 추출기가 명시적으로 결측을 보고한 경우이다.
pub type PropertyMap = BTreeMap<String, Option<RawValue>>;

/// 재료 코드 → 부분 물성 맵. 텍스트 경로와 그래프 경로가 각각 하나씩 만든다.
pub type SourceCollection = BTreeMap<String, PropertyMap>;

/// 합금 코드 형식 검사기.
#[derive(Debug, Clone)]
pub struct AlloyPattern {
    regex: Regex,
}

impl AlloyPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn matches(&self, code: &str) -> bool {
        self.regex.is_match(code)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// 검증을 통과한 재료 레코드. 생성 후에는 변경하지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRecord {
    code: String,
    properties: BTreeMap<String, Quantity>,
}

impl MaterialRecord {
    pub fn new(code: impl Into<String>, properties: BTreeMap<String, Quantity>) -> Self {
        Self {
            code: code.into(),
            properties,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// 기준 단위로 환산된 물성 값.
    pub fn value(&self, property: &str) -> Option<f64> {
        self.properties.get(property).map(|q| q.value_base)
    }

    pub fn properties(&self) -> &BTreeMap<String, Quantity> {
        &self.properties
    }
}
