//! 통합 → 검증 → (용도별) 2차 검사 → 순위 계산 전체 흐름.
//!
//! 용도별 검사/순위 계산은 읽기 전용 입력만 공유하므로 병렬로 실행한다.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info};

use crate::checker::{self, ApplicationReport, ThresholdSet};
use crate::config::{Application, Config, ConfigError};
use crate::material::{MaterialRecord, SourceCollection};
use crate::selector::{self, CriterionSet, Ranking};
use crate::unifier::{self, UnifiedRecords, UnifyOptions};
use crate::validator::{self, ValidationReport, ValidationSchema};

/// 한 용도의 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationOutcome {
    pub check: ApplicationReport,
    pub ranking: Ranking,
}

/// 파이프라인 전체 결과. 쓸 수 없었던 데이터와 실패한 용도를 함께 담는다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub unified: UnifiedRecords,
    pub validation: ValidationReport,
    pub valid_records: Vec<MaterialRecord>,
    pub applications: BTreeMap<Application, ApplicationOutcome>,
    /// 설정 누락 등으로 실행하지 못한 용도와 사유
    pub failed_applications: BTreeMap<Application, String>,
}

impl PipelineReport {
    pub fn outcome(&self, application: Application) -> Option<&ApplicationOutcome> {
        self.applications.get(&application)
    }

    pub fn best_material(&self, application: Application, passing_only: bool) -> Option<&str> {
        self.outcome(application)
            .and_then(|o| o.ranking.best(passing_only))
            .map(|e| e.code.as_str())
    }
}

/// 한 용도의 2차 검사와 순위 계산. 가중치/임계값 섹션이 없으면 오류이다.
pub fn run_application(
    cfg: &Config,
    valid_records: &[MaterialRecord],
    application: Application,
) -> Result<ApplicationOutcome, ConfigError> {
    let thresholds = ThresholdSet::from_config(cfg, application)?;
    let criteria = CriterionSet::from_config(cfg, application)?;
    let check = checker::check(valid_records, application, &thresholds);
    let ranking = selector::rank(
        valid_records,
        application,
        &criteria,
        cfg.penalty_per_trait,
        &check,
    );
    Ok(ApplicationOutcome { check, ranking })
}

/// 전체 파이프라인을 실행한다.
///
/// 검증 스키마(합금 코드 패턴)가 잘못된 경우에만 실패하며,
/// 용도별 설정 오류는 해당 용도만 건너뛰고 보고서에 남긴다.
pub fn run(
    cfg: &Config,
    text_records: &SourceCollection,
    graph_records: &SourceCollection,
    applications: &[Application],
) -> Result<PipelineReport, ConfigError> {
    let schema = ValidationSchema::from_config(cfg)?;
    let unified = unifier::unify(text_records, graph_records, &UnifyOptions::from_config(cfg));
    let (valid_records, validation) = validator::validate(&unified, &schema);

    let results: Vec<(Application, Result<ApplicationOutcome, ConfigError>)> = applications
        .par_iter()
        .map(|&app| (app, run_application(cfg, &valid_records, app)))
        .collect();

    let mut outcomes = BTreeMap::new();
    let mut failed = BTreeMap::new();
    for (app, result) in results {
        match result {
            Ok(outcome) => {
                outcomes.insert(app, outcome);
            }
            Err(e) => {
                error!(application = %app, error = %e, "용도 평가 실패");
                failed.insert(app, e.to_string());
            }
        }
    }

    info!(
        materials = unified.len(),
        valid = valid_records.len(),
        applications = outcomes.len(),
        failed = failed.len(),
        "파이프라인 완료"
    );
    Ok(PipelineReport {
        unified,
        validation,
        valid_records,
        applications: outcomes,
        failed_applications: failed,
    })
}
