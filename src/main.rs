#[actix_rt::main]
async fn main() -> anyhow::Result<()> {
    orgpress::run().await
}
