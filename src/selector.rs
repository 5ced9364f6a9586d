//! 가중치 기반 재료 순위 계산.
//!
//! 각 평가 항목은 물성 값을 기준값 대비 비율로 정규화한 뒤 방향에 따라 점수로 바꾼다.
//! - 클수록 좋음: `(값 / 기준값) × 가중치`
//! - 작을수록 좋음: `2 × 가중치 / (1 + 값 / 기준값)` (기준값에서 가중치와 같고 값이 0이면 최대)
//!
//! 레코드에 없는 항목은 기여도 0에 `penalty_per_trait`만큼 감점한다.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::checker::ApplicationReport;
use crate::config::{Application, Config, ConfigError};
use crate::material::MaterialRecord;

/// 평가 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// 평가 항목 하나. 가중치는 항상 양수이고 방향은 `direction`이 나타낸다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Criterion {
    pub property: String,
    pub direction: Direction,
    pub weight: f64,
    /// 정규화 기준값 (기준 단위, > 0)
    pub reference: f64,
}

impl Criterion {
    pub fn new(property: impl Into<String>, direction: Direction, weight: f64, reference: f64) -> Self {
        Self {
            property: property.into(),
            direction,
            weight: weight.abs(),
            reference,
        }
    }

    /// 부호 있는 가중치에서 항목을 만든다. 가중치 0은 평가 항목이 아니다.
    pub fn from_signed(property: impl Into<String>, signed_weight: f64, reference: f64) -> Option<Self> {
        let direction = match signed_weight.partial_cmp(&0.0)? {
            Ordering::Greater => Direction::HigherIsBetter,
            Ordering::Less => Direction::LowerIsBetter,
            Ordering::Equal => return None,
        };
        Some(Self::new(property, direction, signed_weight, reference))
    }

    pub fn normalize(&self, value: f64) -> f64 {
        value / self.reference
    }

    /// 값의 점수 기여도. 작을수록 좋은 항목에서 음수 값은 점수를 매길 수 없다.
    pub fn contribution(&self, value: f64) -> Option<f64> {
        let normalized = self.normalize(value);
        if !normalized.is_finite() {
            return None;
        }
        match self.direction {
            Direction::HigherIsBetter => Some(normalized * self.weight),
            Direction::LowerIsBetter if normalized >= 0.0 => {
                Some(2.0 * self.weight / (1.0 + normalized))
            }
            Direction::LowerIsBetter => None,
        }
    }
}

/// 한 용도의 평가 항목 묶음.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CriterionSet {
    pub criteria: Vec<Criterion>,
}

impl CriterionSet {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    /// 설정의 `[weights.<용도>]`와 `[reference_values]`로 평가 항목을 만든다.
    ///
    /// 가중치 섹션이 없거나 가중치가 있는 물성의 기준값이 없으면 오류이다.
    pub fn from_config(cfg: &Config, application: Application) -> Result<Self, ConfigError> {
        let weights = cfg.weights_for(application)?;
        let mut criteria = Vec::with_capacity(weights.len());
        for (property, &weight) in weights {
            if !weight.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "가중치가 유한하지 않습니다: {application}.{property}"
                )));
            }
            if weight == 0.0 {
                continue;
            }
            let reference = cfg.reference_value(property)?;
            criteria.extend(Criterion::from_signed(property.as_str(), weight, reference));
        }
        Ok(Self { criteria })
    }
}

/// 순위 항목.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub code: String,
    pub application: Application,
    pub score: f64,
    /// 2차 검사 합격 여부
    pub passed: bool,
    /// 결측(또는 점수 계산 불가) 항목
    pub missing: Vec<String>,
    pub contributions: BTreeMap<String, f64>,
}

/// 한 용도의 순위. 점수 내림차순, 동점이면 재료 코드 오름차순.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub application: Application,
    pub entries: Vec<RankingEntry>,
}

impl Ranking {
    /// 최상위 재료. `passing_only`이면 2차 검사 합격 재료 중에서 고른다.
    pub fn best(&self, passing_only: bool) -> Option<&RankingEntry> {
        self.entries.iter().find(|e| !passing_only || e.passed)
    }
}

/// 레코드 하나의 종합 점수를 계산한다.
pub fn score_record(
    record: &MaterialRecord,
    criteria: &CriterionSet,
    penalty_per_trait: f64,
) -> (f64, Vec<String>, BTreeMap<String, f64>) {
    let mut score = 0.0;
    let mut missing = Vec::new();
    let mut contributions = BTreeMap::new();
    for criterion in &criteria.criteria {
        match record
            .value(&criterion.property)
            .and_then(|v| criterion.contribution(v))
        {
            Some(c) => {
                score += c;
                contributions.insert(criterion.property.clone(), c);
            }
            None => {
                score -= penalty_per_trait;
                missing.push(criterion.property.clone());
            }
        }
    }
    (score, missing, contributions)
}

/// 검증된 레코드의 순위를 계산한다. 입력은 변경하지 않는다.
pub fn rank(
    valid_records: &[MaterialRecord],
    application: Application,
    criteria: &CriterionSet,
    penalty_per_trait: f64,
    checks: &ApplicationReport,
) -> Ranking {
    let mut entries: Vec<RankingEntry> = valid_records
        .iter()
        .map(|record| {
            let (score, missing, contributions) = score_record(record, criteria, penalty_per_trait);
            debug!(%application, code = record.code(), score, missing = ?missing, "점수 계산");
            RankingEntry {
                code: record.code().to_string(),
                application,
                score,
                passed: checks.passed(record.code()),
                missing,
                contributions,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.code.cmp(&b.code)));

    if let Some(top) = entries.first() {
        info!(%application, materials = entries.len(), best = %top.code, score = top.score, "순위 계산 완료");
    }
    Ranking {
        application,
        entries,
    }
}
