use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{self, Application, Config, ConfigError};
use crate::input::{self, InputError};
use crate::pipeline;
use crate::report;
use crate::unifier::{self, UnifyOptions};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 입력 문서 오류
    #[error("입력 데이터 오류: {0}")]
    Input(#[from] InputError),
    /// 덮어쓰기를 허용하지 않은 기존 설정 파일
    #[error("설정 파일이 이미 있습니다: {} (--force로 덮어쓰기)", .0.display())]
    ConfigExists(PathBuf),
}

#[derive(Debug, Parser)]
#[command(name = "interceptor_material_toolbox", version, about = "부유물 차단 구조물 재료 선정 도구")]
pub struct Cli {
    /// 설정 파일 (TOML 또는 YAML). 없으면 기본 설정을 생성한다.
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 통합, 검증, 2차 검사, 순위 계산을 모두 실행한다.
    Run {
        /// 문서(OCR) 추출 결과 JSON
        #[arg(long)]
        text: PathBuf,
        /// 그래프 추출 결과 JSON
        #[arg(long)]
        graph: PathBuf,
        /// 평가할 용도. 생략하면 설정의 applications를 사용한다.
        #[arg(long = "application", value_parser = parse_application)]
        applications: Vec<Application>,
        /// 전체 보고서 JSON 저장 경로
        #[arg(long)]
        output: Option<PathBuf>,
        /// 순위 CSV 저장 경로
        #[arg(long)]
        ranking_csv: Option<PathBuf>,
    },
    /// 통합 데이터를 CSV로 내보낸다.
    ExportUnified {
        #[arg(long)]
        text: PathBuf,
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// 기본 설정 파일을 쓴다.
    InitConfig {
        /// 기존 파일을 덮어쓴다.
        #[arg(long)]
        force: bool,
    },
}

fn parse_application(s: &str) -> Result<Application, String> {
    s.parse::<Application>().map_err(|e| e.to_string())
}

/// CLI 명령을 실행한다.
pub fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::InitConfig { force } => {
            if cli.config.exists() {
                if !force {
                    return Err(AppError::ConfigExists(cli.config));
                }
                warn!(path = %cli.config.display(), "기존 설정 파일을 덮어씁니다");
            }
            Config::default().save(&cli.config)?;
            println!("기본 설정을 저장했습니다: {}", cli.config.display());
        }
        Command::ExportUnified {
            text,
            graph,
            output,
        } => {
            let cfg = config::load_or_default(&cli.config)?;
            let text_records = input::load_collection(&text)?;
            let graph_records = input::load_collection(&graph)?;
            let unified = unifier::unify(&text_records, &graph_records, &UnifyOptions::from_config(&cfg));
            report::write_unified_csv(&unified, &output)?;
            info!(path = %output.display(), materials = unified.len(), "통합 데이터 CSV 저장");
        }
        Command::Run {
            text,
            graph,
            applications,
            output,
            ranking_csv,
        } => {
            let cfg = config::load_or_default(&cli.config)?;
            let text_records = input::load_collection(&text)?;
            let graph_records = input::load_collection(&graph)?;
            let applications = if applications.is_empty() {
                cfg.applications.clone()
            } else {
                applications
            };
            let result = pipeline::run(&cfg, &text_records, &graph_records, &applications)?;

            print!("{}", report::render_summary(&result));
            for app in &applications {
                if let Some(best) = result.best_material(*app, true) {
                    println!("Best material for {app}: {best}");
                }
            }
            if let Some(path) = output {
                report::write_json(&result, &path)?;
                info!(path = %path.display(), "보고서 JSON 저장");
            }
            if let Some(path) = ranking_csv {
                report::write_rankings_csv(&result, &path)?;
                info!(path = %path.display(), "순위 CSV 저장");
            }
        }
    }
    Ok(())
}
