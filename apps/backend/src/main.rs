#[tokio::main]
async fn main() -> anyhow::Result<()> {
    prepoflex_backend::run().await
}
