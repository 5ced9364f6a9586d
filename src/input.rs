//! 텍스트/그래프 추출기 출력(JSON)을 원천 컬렉션으로 읽어들인다.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::material::{PropertyMap, RawValue, SourceCollection};

/// 입력 문서 로드 오류. 문서 전체를 쓸 수 없을 때만 발생한다.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("입력 파일 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 파싱 오류: {0}")]
    Json(#[from] serde_json::Error),
    /// 최상위 값이 재료 코드 맵이 아님
    #[error("입력 최상위 값은 재료 코드를 키로 하는 객체여야 합니다 (받은 값: {0})")]
    NotAMapping(&'static str),
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// JSON 값에서 원천 컬렉션을 만든다.
///
/// 객체가 아닌 재료 항목은 빈 레코드로 남겨 검증 단계에서 보고되게 한다.
pub fn collection_from_json(value: &serde_json::Value) -> Result<SourceCollection, InputError> {
    let materials = value
        .as_object()
        .ok_or_else(|| InputError::NotAMapping(json_kind(value)))?;

    let mut collection = SourceCollection::new();
    for (code, entry) in materials {
        let properties: PropertyMap = match entry.as_object() {
            Some(props) => props
                .iter()
                .map(|(name, v)| (name.clone(), RawValue::from_json(v)))
                .collect(),
            None => {
                warn!(code = %code, kind = json_kind(entry), "물성 맵이 아닌 재료 항목");
                PropertyMap::new()
            }
        };
        collection.insert(code.clone(), properties);
    }
    Ok(collection)
}

pub fn collection_from_str(s: &str) -> Result<SourceCollection, InputError> {
    let value: serde_json::Value = serde_json::from_str(s)?;
    collection_from_json(&value)
}

pub fn load_collection(path: impl AsRef<Path>) -> Result<SourceCollection, InputError> {
    let content = fs::read_to_string(path)?;
    collection_from_str(&content)
}
