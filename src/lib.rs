//! 재료 물성 통합/검증/순위 계산 로직을 라이브러리로 분리하여 CLI 외의 도구에서도 쓸 수 있게 한다.

pub mod app;
pub mod checker;
pub mod config;
pub mod conversion;
pub mod input;
pub mod material;
pub mod pipeline;
pub mod quantity;
pub mod report;
pub mod selector;
pub mod unifier;
pub mod units;
pub mod validator;
