//! 텍스트 경로와 그래프 경로에서 얻은 물성 컬렉션을 재료별 하나의 레코드로 합친다.
//!
//! 두 원천에 같은 물성이 있으면 문서(텍스트) 값을 우선하고, 허용오차를 넘는
//! 차이는 불일치로 기록해 검증 보고서에 노출한다.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::conversion;
use crate::material::{PropertyMap, RawValue, SourceCollection};
use crate::quantity::PropertyFamily;

/// 통합 단계 옵션.
#[derive(Debug, Clone, Default)]
pub struct UnifyOptions {
    /// 상대 허용오차 (0.05 = 5%)
    pub conflict_tolerance: f64,
    /// 물성별 계열. 없는 물성은 값의 단위로 추정한다.
    pub families: BTreeMap<String, PropertyFamily>,
}

impl UnifyOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            conflict_tolerance: cfg.conflict_tolerance,
            families: cfg
                .properties
                .iter()
                .map(|(name, spec)| (name.clone(), spec.family))
                .collect(),
        }
    }

    /// 선언된 계열이 없으면 두 값 중 단위가 붙은 쪽에서 추정한다.
    fn family_of(&self, property: &str, values: [Option<&RawValue>; 2]) -> PropertyFamily {
        if let Some(family) = self.families.get(property) {
            return *family;
        }
        values
            .into_iter()
            .flatten()
            .map(conversion::infer_family)
            .find(|family| *family != PropertyFamily::Index)
            .unwrap_or_default()
    }
}

/// 텍스트 값과 그래프 값이 허용오차를 넘게 다른 경우의 기록.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
    pub code: String,
    pub property: String,
    pub text_value: String,
    pub graph_value: String,
}

/// 통합 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnifiedRecords {
    pub records: BTreeMap<String, PropertyMap>,
    pub discrepancies: Vec<Discrepancy>,
}

impl UnifiedRecords {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 모든 레코드에 등장하는 물성명 (정렬됨).
    pub fn property_names(&self) -> BTreeSet<&str> {
        self.records
            .values()
            .flat_map(|props| props.keys().map(String::as_str))
            .collect()
    }
}

fn present(value: Option<&RawValue>) -> Option<&RawValue> {
    value.filter(|v| !matches!(v, RawValue::Text(t) if conversion::is_missing_marker(t)))
}

/// 두 값이 허용오차를 넘어 다른지 판단한다.
/// 둘 다 숫자로 환산되면 상대오차로, 아니면 문자열 표기로 비교한다.
pub fn values_conflict(
    family: PropertyFamily,
    text: &RawValue,
    graph: &RawValue,
    tolerance: f64,
) -> bool {
    match (
        conversion::normalize(family, text),
        conversion::normalize(family, graph),
    ) {
        (Ok(Some(a)), Ok(Some(b))) => {
            let (a, b) = (a.value_base, b.value_base);
            let scale = a.abs().max(b.abs());
            (a - b).abs() > tolerance * scale
        }
        _ => text.to_string().trim() != graph.to_string().trim(),
    }
}

/// 텍스트/그래프 값 선택 규칙.
///
/// 한쪽에만 값이 있으면 그 값을, 둘 다 있으면 텍스트 값을 고른다.
/// 반환값의 두 번째 항목은 두 값이 허용오차를 넘게 달랐는지 여부이다.
pub fn merge_values(
    family: PropertyFamily,
    text: Option<&RawValue>,
    graph: Option<&RawValue>,
    tolerance: f64,
) -> (Option<RawValue>, bool) {
    match (present(text), present(graph)) {
        (Some(t), Some(g)) => (Some(t.clone()), values_conflict(family, t, g, tolerance)),
        (Some(t), None) => (Some(t.clone()), false),
        (None, Some(g)) => (Some(g.clone()), false),
        // 둘 다 결측이면 원래 표기를 유지해 검증 단계에서 결측으로 보고되게 한다.
        (None, None) => (text.or(graph).cloned(), false),
    }
}

/// 두 원천 컬렉션을 재료 코드별 하나의 레코드로 합친다. 입력은 변경하지 않는다.
pub fn unify(
    text_records: &SourceCollection,
    graph_records: &SourceCollection,
    options: &UnifyOptions,
) -> UnifiedRecords {
    let codes: BTreeSet<&String> = text_records.keys().chain(graph_records.keys()).collect();
    let mut unified = UnifiedRecords::default();

    for code in codes {
        let merged = match (text_records.get(code), graph_records.get(code)) {
            (Some(text), Some(graph)) => merge_record(code, text, graph, options, &mut unified.discrepancies),
            (Some(only), None) | (None, Some(only)) => only.clone(),
            (None, None) => continue,
        };
        unified.records.insert(code.clone(), merged);
    }

    info!(
        text = text_records.len(),
        graph = graph_records.len(),
        unified = unified.records.len(),
        conflicts = unified.discrepancies.len(),
        "원천 데이터 통합 완료"
    );
    unified
}

fn merge_record(
    code: &str,
    text: &PropertyMap,
    graph: &PropertyMap,
    options: &UnifyOptions,
    discrepancies: &mut Vec<Discrepancy>,
) -> PropertyMap {
    let names: BTreeSet<&String> = text.keys().chain(graph.keys()).collect();
    let mut merged = PropertyMap::new();
    for name in names {
        let t = text.get(name).and_then(Option::as_ref);
        let g = graph.get(name).and_then(Option::as_ref);
        let family = options.family_of(name, [t, g]);
        let (chosen, conflict) = merge_values(family, t, g, options.conflict_tolerance);
        if conflict {
            if let (Some(t), Some(g)) = (t, g) {
                warn!(code, property = %name, text = %t, graph = %g, "텍스트/그래프 값 불일치, 텍스트 값 사용");
                discrepancies.push(Discrepancy {
                    code: code.to_string(),
                    property: name.clone(),
                    text_value: t.to_string(),
                    graph_value: g.to_string(),
                });
            }
        }
        debug!(code, property = %name, value = ?chosen, "물성 병합");
        merged.insert(name.clone(), chosen);
    }
    merged
}
