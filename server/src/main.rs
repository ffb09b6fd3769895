#[tokio::main]
async fn main() {
    cravings::start_server().await;
}
