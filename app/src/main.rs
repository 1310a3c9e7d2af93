#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dex_sim_lib::run().await
}
