#[tokio::main]
async fn main() -> anyhow::Result<()> {
    devconnector::run().await
}
