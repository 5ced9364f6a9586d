use serde::{Deserialize, Serialize};

/// 연신율 같은 비율 단위. 내부 기준은 퍼센트(%)이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioUnit {
    Percent,
    Fraction,
}

fn to_percent(value: f64, unit: RatioUnit) -> f64 {
    match unit {
        RatioUnit::Percent => value,
        RatioUnit::Fraction => value * 100.0,
    }
}

fn from_percent(value: f64, unit: RatioUnit) -> f64 {
    match unit {
        RatioUnit::Percent => value,
        RatioUnit::Fraction => value / 100.0,
    }
}

/// 비율을 변환한다.
pub fn convert_ratio(value: f64, from: RatioUnit, to: RatioUnit) -> f64 {
    let percent = to_percent(value, from);
    from_percent(percent, to)
}
