#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    paperless_mcp::run().await
}
