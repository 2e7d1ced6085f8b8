use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = promsaint_cli::run(std::env::args().collect()).await;
    log::logger().flush();
    process::exit(code);
}
