#[tokio::main]
async fn main() {
    scheduling_backend::run().await;
}
