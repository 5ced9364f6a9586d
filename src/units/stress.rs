use serde::{Deserialize, Serialize};

/// 응력/강도 단위. 내부 기준은 항상 MPa이다.
/// 항복강도, 인장강도, 탄성계수처럼 압력 차원을 갖는 물성에 공통으로 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressUnit {
    Pascal,
    KiloPascal,
    MegaPascal,
    GigaPascal,
    NewtonPerSquareMillimeter,
    KgfPerSquareMillimeter,
    Bar,
    Psi,
    Ksi,
}

const PA_PER_MPA: f64 = 1_000_000.0;
const MPA_PER_PSI: f64 = 0.006_894_757;
const MPA_PER_KGF_MM2: f64 = 9.806_65;

/// 주어진 응력을 MPa 로 변환한다.
pub fn to_mpa(value: f64, unit: StressUnit) -> f64 {
    match unit {
        StressUnit::Pascal => value / PA_PER_MPA,
        StressUnit::KiloPascal => value / 1000.0,
        StressUnit::MegaPascal | StressUnit::NewtonPerSquareMillimeter => value,
        StressUnit::GigaPascal => value * 1000.0,
        StressUnit::KgfPerSquareMillimeter => value * MPA_PER_KGF_MM2,
        StressUnit::Bar => value / 10.0,
        StressUnit::Psi => value * MPA_PER_PSI,
        StressUnit::Ksi => value * MPA_PER_PSI * 1000.0,
    }
}

/// MPa 값을 원하는 단위로 변환한다.
pub fn from_mpa(value_mpa: f64, unit: StressUnit) -> f64 {
    match unit {
        StressUnit::Pascal => value_mpa * PA_PER_MPA,
        StressUnit::KiloPascal => value_mpa * 1000.0,
        StressUnit::MegaPascal | StressUnit::NewtonPerSquareMillimeter => value_mpa,
        StressUnit::GigaPascal => value_mpa / 1000.0,
        StressUnit::KgfPerSquareMillimeter => value_mpa / MPA_PER_KGF_MM2,
        StressUnit::Bar => value_mpa * 10.0,
        StressUnit::Psi => value_mpa / MPA_PER_PSI,
        StressUnit::Ksi => value_mpa / (MPA_PER_PSI * 1000.0),
    }
}

/// 응력을 원하는 단위로 변환한다.
pub fn convert_stress(value: f64, from: StressUnit, to: StressUnit) -> f64 {
    let mpa = to_mpa(value, from);
    from_mpa(mpa, to)
}
