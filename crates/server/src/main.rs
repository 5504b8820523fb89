use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    reliefline_server::run().await
}
