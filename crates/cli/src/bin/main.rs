use crx_diagnostics::Result;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() -> Result<()> {
    crx_cli::run_cli().await
}
