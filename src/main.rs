use clap::Parser;
use interceptor_material_toolbox::app::{self, Cli};
use tracing_subscriber::EnvFilter;

/// 프로그램의 엔트리 포인트. 로깅을 초기화한 뒤 CLI 명령을 실행한다.
fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("interceptor_material_toolbox=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = app::run(Cli::parse()) {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}
