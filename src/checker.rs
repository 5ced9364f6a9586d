//! 용도별 최소/최대 임계값 합격 판정.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Application, Config, ConfigError};
use crate::material::MaterialRecord;

/// 임계값 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Min,
    Max,
}

/// 임계값 하나. `limit`은 물성 계열의 기준 단위 값이다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Threshold {
    /// 설정 키 (예: `yield_strength_min`)
    pub key: String,
    pub property: String,
    pub bound: Bound,
    pub limit: f64,
}

impl Threshold {
    pub fn min(property: impl Into<String>, limit: f64) -> Self {
        let property = property.into();
        Self {
            key: format!("{property}_min"),
            property,
            bound: Bound::Min,
            limit,
        }
    }

    pub fn max(property: impl Into<String>, limit: f64) -> Self {
        let property = property.into();
        Self {
            key: format!("{property}_max"),
            property,
            bound: Bound::Max,
            limit,
        }
    }

    /// `value >= min`, `value <= max`이면 만족한다.
    pub fn is_satisfied(&self, value: f64) -> bool {
        match self.bound {
            Bound::Min => value >= self.limit,
            Bound::Max => value <= self.limit,
        }
    }
}

/// 한 용도의 임계값 묶음.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThresholdSet {
    pub thresholds: Vec<Threshold>,
}

impl ThresholdSet {
    pub fn new(thresholds: Vec<Threshold>) -> Self {
        Self { thresholds }
    }

    /// 설정의 `[thresholds.<용도>]` 섹션을 읽는다.
    ///
    /// 섹션이 없거나 키 접미사가 `_min`/`_max`가 아니면 해당 용도 전체가 실패한다.
    pub fn from_config(cfg: &Config, application: Application) -> Result<Self, ConfigError> {
        let section = cfg.thresholds_for(application)?;
        let mut thresholds = Vec::with_capacity(section.len());
        for (key, raw) in section {
            let (property, bound) = if let Some(p) = key.strip_suffix("_min") {
                (p, Bound::Min)
            } else if let Some(p) = key.strip_suffix("_max") {
                (p, Bound::Max)
            } else {
                return Err(ConfigError::Invalid(format!(
                    "임계값 키는 _min 또는 _max로 끝나야 합니다: {application}.{key}"
                )));
            };
            let limit = cfg.normalize_value(key, property, raw)?;
            thresholds.push(Threshold {
                key: key.clone(),
                property: property.to_string(),
                bound,
                limit,
            });
        }
        Ok(Self { thresholds })
    }
}

/// 불합격 항목. `actual`이 없으면 물성이 결측이다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedCriterion {
    pub criterion: String,
    pub property: String,
    pub bound: Bound,
    pub limit: f64,
    pub actual: Option<f64>,
}

impl std::fmt::Display for FailedCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.actual, self.bound) {
            (None, _) => write!(f, "{} missing", self.property),
            (Some(v), Bound::Min) => write!(f, "{} {v} below {}", self.property, self.limit),
            (Some(v), Bound::Max) => write!(f, "{} {v} above {}", self.property, self.limit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckStatus {
    Pass,
    Fail,
}

/// 재료 하나의 판정 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub code: String,
    pub status: CheckStatus,
    pub failed: Vec<FailedCriterion>,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

/// 한 용도에 대한 2차 검사 보고서.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationReport {
    pub application: Application,
    pub results: Vec<CheckResult>,
}

impl ApplicationReport {
    pub fn result(&self, code: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.code == code)
    }

    /// 보고서에 없는 재료는 불합격으로 본다.
    pub fn passed(&self, code: &str) -> bool {
        self.result(code).is_some_and(CheckResult::passed)
    }

    pub fn passing_codes(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| r.passed())
            .map(|r| r.code.as_str())
    }
}

/// 검증된 레코드를 용도별 임계값으로 판정한다.
pub fn check(
    valid_records: &[MaterialRecord],
    application: Application,
    threshold_set: &ThresholdSet,
) -> ApplicationReport {
    let results: Vec<CheckResult> = valid_records
        .iter()
        .map(|record| {
            let failed: Vec<FailedCriterion> = threshold_set
                .thresholds
                .iter()
                .filter_map(|t| {
                    let actual = record.value(&t.property);
                    match actual {
                        Some(v) if t.is_satisfied(v) => None,
                        _ => Some(FailedCriterion {
                            criterion: t.key.clone(),
                            property: t.property.clone(),
                            bound: t.bound,
                            limit: t.limit,
                            actual,
                        }),
                    }
                })
                .collect();
            let status = if failed.is_empty() {
                CheckStatus::Pass
            } else {
                CheckStatus::Fail
            };
            debug!(%application, code = record.code(), ?status, failed = failed.len(), "2차 검사");
            CheckResult {
                code: record.code().to_string(),
                status,
                failed,
            }
        })
        .collect();

    let passed = results.iter().filter(|r| r.passed()).count();
    info!(%application, total = results.len(), passed, "2차 검사 완료");
    ApplicationReport {
        application,
        results,
    }
}
