//! 단위 정의 및 변환 모듈 모음.

pub mod density;
pub mod ratio;
pub mod stress;

pub use density::{convert_density, DensityUnit};
pub use ratio::{convert_ratio, RatioUnit};
pub use stress::{convert_stress, StressUnit};
