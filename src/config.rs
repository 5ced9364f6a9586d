use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversion::{self, ConversionError};
use crate::material::{AlloyPattern, RawValue, DEFAULT_ALLOY_PATTERN};
use crate::quantity::PropertyFamily;

/// 설정 파일 기본 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 재료를 평가하는 구조 용도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Application {
    Pontoons,
    Frame,
    Anchors,
}

impl Application {
    pub const ALL: [Application; 3] = [
        Application::Pontoons,
        Application::Frame,
        Application::Anchors,
    ];

    /// 설정 섹션 키로 쓰이는 이름.
    pub fn as_str(self) -> &'static str {
        match self {
            Application::Pontoons => "pontoons",
            Application::Frame => "frame",
            Application::Anchors => "anchors",
        }
    }
}

impl std::fmt::Display for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Application {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pontoons" | "pontoon" => Ok(Application::Pontoons),
            "frame" => Ok(Application::Frame),
            "anchors" | "anchor" => Ok(Application::Anchors),
            other => Err(ConfigError::Invalid(format!("알 수 없는 용도: {other}"))),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Toml(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// YAML 오류
    #[error("YAML 설정 오류: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// 합금 코드 정규식 오류
    #[error("합금 코드 패턴 오류: {0}")]
    Pattern(#[from] regex::Error),
    /// 용도별 가중치/임계값 섹션 누락
    #[error("'{application}' 용도의 [{section}] 섹션이 없습니다")]
    MissingSection {
        section: &'static str,
        application: Application,
    },
    /// 설정 값의 단위 오류
    #[error("'{key}' 값 오류: {source}")]
    Value {
        key: String,
        #[source]
        source: ConversionError,
    },
    /// 그 밖의 잘못된 설정
    #[error("잘못된 설정: {0}")]
    Invalid(String),
}

/// 물성별 계열과 허용 범위(기준 단위).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    pub family: PropertyFamily,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl PropertySpec {
    pub fn new(family: PropertyFamily) -> Self {
        Self {
            family,
            min: None,
            max: None,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 파이프라인이 평가할 용도 목록
    #[serde(default = "default_applications")]
    pub applications: Vec<Application>,
    /// 모든 레코드가 갖춰야 하는 물성
    #[serde(default)]
    pub required_properties: Vec<String>,
    /// 평가 항목 하나가 빠질 때마다 빼는 점수
    #[serde(default)]
    pub penalty_per_trait: f64,
    /// 텍스트/그래프 값 불일치 판단용 상대 허용오차
    #[serde(default = "default_conflict_tolerance")]
    pub conflict_tolerance: f64,
    #[serde(default = "default_alloy_pattern")]
    pub alloy_pattern: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,
    /// 정규화 기준값 (물성명 → 값, 단위 포함 가능)
    #[serde(default)]
    pub reference_values: BTreeMap<String, RawValue>,
    /// 용도 → 물성 → 부호 있는 가중치 (양수: 클수록 좋음, 음수: 작을수록 좋음)
    #[serde(default)]
    pub weights: BTreeMap<String, BTreeMap<String, f64>>,
    /// 용도 → `<물성>_min` / `<물성>_max` → 한계값
    #[serde(default)]
    pub thresholds: BTreeMap<String, BTreeMap<String, RawValue>>,
}

fn default_applications() -> Vec<Application> {
    Application::ALL.to_vec()
}

fn default_conflict_tolerance() -> f64 {
    0.05
}

fn default_alloy_pattern() -> String {
    DEFAULT_ALLOY_PATTERN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        let properties = [
            ("yield_strength", PropertyFamily::Stress),
            ("tensile_strength", PropertyFamily::Stress),
            ("elastic_modulus", PropertyFamily::Stress),
            ("density", PropertyFamily::Density),
            ("elongation", PropertyFamily::Ratio),
            ("corrosion_resistance", PropertyFamily::Index),
            ("cost", PropertyFamily::Index),
        ]
        .into_iter()
        .map(|(name, family)| (name.to_string(), PropertySpec::new(family)))
        .collect();

        let reference_values = [
            ("yield_strength", "250 MPa"),
            ("tensile_strength", "300 MPa"),
            ("elastic_modulus", "70 GPa"),
            ("density", "2700 kg/m3"),
            ("elongation", "10 %"),
            ("corrosion_resistance", "5"),
            ("cost", "5"),
        ]
        .into_iter()
        .map(|(name, v)| (name.to_string(), RawValue::from(v)))
        .collect();

        let weights = [
            (
                Application::Pontoons,
                vec![
                    ("density", -0.4),
                    ("corrosion_resistance", 0.3),
                    ("yield_strength", 0.2),
                    ("cost", -0.1),
                ],
            ),
            (
                Application::Frame,
                vec![
                    ("yield_strength", 0.35),
                    ("tensile_strength", 0.25),
                    ("elastic_modulus", 0.2),
                    ("corrosion_resistance", 0.1),
                    ("cost", -0.1),
                ],
            ),
            (
                Application::Anchors,
                vec![
                    ("density", 0.3),
                    ("tensile_strength", 0.3),
                    ("corrosion_resistance", 0.3),
                    ("cost", -0.1),
                ],
            ),
        ]
        .into_iter()
        .map(|(app, ws)| {
            let set = ws.into_iter().map(|(p, w)| (p.to_string(), w)).collect();
            (app.as_str().to_string(), set)
        })
        .collect();

        let thresholds = [
            (
                Application::Pontoons,
                vec![
                    ("yield_strength_min", "150 MPa"),
                    ("density_max", "3000 kg/m3"),
                    ("corrosion_resistance_min", "6"),
                ],
            ),
            (
                Application::Frame,
                vec![
                    ("yield_strength_min", "200 MPa"),
                    ("tensile_strength_min", "250 MPa"),
                ],
            ),
            (
                Application::Anchors,
                vec![
                    ("density_min", "2500 kg/m3"),
                    ("tensile_strength_min", "200 MPa"),
                ],
            ),
        ]
        .into_iter()
        .map(|(app, ts)| {
            let set = ts
                .into_iter()
                .map(|(k, v)| (k.to_string(), RawValue::from(v)))
                .collect();
            (app.as_str().to_string(), set)
        })
        .collect();

        Self {
            applications: default_applications(),
            required_properties: vec![
                "yield_strength".to_string(),
                "tensile_strength".to_string(),
                "density".to_string(),
                "corrosion_resistance".to_string(),
            ],
            penalty_per_trait: 0.5,
            conflict_tolerance: default_conflict_tolerance(),
            alloy_pattern: default_alloy_pattern(),
            properties,
            reference_values,
            weights,
            thresholds,
        }
    }
}

impl Config {
    /// 확장자에 따라 TOML 또는 YAML 설정 파일을 읽는다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(s)?;
        cfg.check()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_yaml::from_str(s)?;
        cfg.check()?;
        Ok(cfg)
    }

    /// 설정을 파일에 저장한다. YAML 확장자면 YAML로, 그 외에는 TOML로 쓴다.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// 용도와 무관한 전역 값의 기본 검사.
    fn check(&self) -> Result<(), ConfigError> {
        if !(self.penalty_per_trait.is_finite() && self.penalty_per_trait >= 0.0) {
            return Err(ConfigError::Invalid(
                "penalty_per_trait는 0 이상이어야 합니다.".to_string(),
            ));
        }
        if !(self.conflict_tolerance.is_finite() && self.conflict_tolerance >= 0.0) {
            return Err(ConfigError::Invalid(
                "conflict_tolerance는 0 이상이어야 합니다.".to_string(),
            ));
        }
        Ok(())
    }

    /// `[properties]`에 선언된 물성의 계열.
    pub fn family_of(&self, property: &str) -> Option<PropertyFamily> {
        self.properties.get(property).map(|spec| spec.family)
    }

    pub fn alloy_pattern(&self) -> Result<AlloyPattern, ConfigError> {
        Ok(AlloyPattern::new(&self.alloy_pattern)?)
    }

    /// 용도별 가중치 섹션. 섹션이 없으면 해당 용도의 순위 계산은 정의되지 않는다.
    pub fn weights_for(&self, application: Application) -> Result<&BTreeMap<String, f64>, ConfigError> {
        self.weights
            .get(application.as_str())
            .ok_or(ConfigError::MissingSection {
                section: "weights",
                application,
            })
    }

    /// 용도별 임계값 섹션.
    pub fn thresholds_for(
        &self,
        application: Application,
    ) -> Result<&BTreeMap<String, RawValue>, ConfigError> {
        self.thresholds
            .get(application.as_str())
            .ok_or(ConfigError::MissingSection {
                section: "thresholds",
                application,
            })
    }

    /// 정규화 기준값을 기준 단위로 반환한다. 0 이하의 기준값은 허용하지 않는다.
    pub fn reference_value(&self, property: &str) -> Result<f64, ConfigError> {
        let raw = self.reference_values.get(property).ok_or_else(|| {
            ConfigError::Invalid(format!("'{property}'의 기준값(reference_values)이 없습니다."))
        })?;
        let value = self.normalize_value(property, property, raw)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(ConfigError::Invalid(format!(
                "'{property}'의 기준값은 0보다 커야 합니다."
            )))
        }
    }

    /// 설정에 적힌 값을 물성 계열의 기준 단위로 환산한다.
    /// 선언되지 않은 물성은 값의 단위로 계열을 정한다.
    pub fn normalize_value(&self, key: &str, property: &str, raw: &RawValue) -> Result<f64, ConfigError> {
        let family = self
            .family_of(property)
            .unwrap_or_else(|| conversion::infer_family(raw));
        match conversion::normalize(family, raw) {
            Ok(Some(q)) => Ok(q.value_base),
            Ok(None) => Err(ConfigError::Value {
                key: key.to_string(),
                source: ConversionError::Unparseable(raw.to_string()),
            }),
            Err(source) => Err(ConfigError::Value {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        Config::load(path)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        Ok(cfg)
    }
}
