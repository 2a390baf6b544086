use vleet::{logger, orchestrator};

#[tokio::main]
async fn main() {
    // 初始化日志
    logger::init();

    let code = orchestrator::run(std::env::args_os()).await;
    std::process::exit(code);
}
