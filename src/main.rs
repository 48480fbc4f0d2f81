#[tokio::main]
async fn main() {
    campus_events::run().await;
}
