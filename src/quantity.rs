use serde::{Deserialize, Serialize};

/// 물성이 속하는 물리량 계열. 같은 계열 안에서만 값 비교가 가능하다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyFamily {
    /// 강도/탄성계수 (기준 MPa)
    Stress,
    /// 밀도 (기준 kg/m³)
    Density,
    /// 연신율 등 비율 (기준 %)
    Ratio,
    /// 내식성 지수, 비용 지수처럼 단위 없는 값
    #[default]
    Index,
}

impl PropertyFamily {
    /// 내부 기준 단위 표기.
    pub fn base_unit(self) -> &'static str {
        match self {
            PropertyFamily::Stress => "MPa",
            PropertyFamily::Density => "kg/m3",
            PropertyFamily::Ratio => "%",
            PropertyFamily::Index => "",
        }
    }

    /// 계열별 물리적으로 타당한 값인지 확인한다.
    /// 음의 강도, 0 이하의 밀도, 0~100%를 벗어난 비율은 허용하지 않는다.
    pub fn is_sane(self, value_base: f64) -> bool {
        if !value_base.is_finite() {
            return false;
        }
        match self {
            PropertyFamily::Stress => value_base >= 0.0,
            PropertyFamily::Density => value_base > 0.0,
            PropertyFamily::Ratio => (0.0..=100.0).contains(&value_base),
            PropertyFamily::Index => value_base >= 0.0,
        }
    }
}

impl std::fmt::Display for PropertyFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PropertyFamily::Stress => "stress",
            PropertyFamily::Density => "density",
            PropertyFamily::Ratio => "ratio",
            PropertyFamily::Index => "index",
        };
        f.write_str(name)
    }
}

/// 내부 기준 단위로 환산된 값을 담는 컨테이너.
///
/// `value_base`는 계열의 기준 단위(강도=MPa, 밀도=kg/m³, 비율=%)로 저장한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub family: PropertyFamily,
    pub value_base: f64,
}

impl Quantity {
    pub fn new(family: PropertyFamily, value_base: f64) -> Self {
        Self { family, value_base }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = self.family.base_unit();
        if unit.is_empty() {
            write!(f, "{}", self.value_base)
        } else {
            write!(f, "{} {unit}", self.value_base)
        }
    }
}
