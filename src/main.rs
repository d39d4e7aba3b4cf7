#[tokio::main]
async fn main() {
    if let Err(err) = forge_schedule::run().await {
        eprintln!("forge-schedule failed to start: {err}");
        std::process::exit(1);
    }
}
