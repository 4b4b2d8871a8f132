use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    votebridge::gateway::cli::run_cli().await
}
