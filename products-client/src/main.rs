use products_client::{install_panic_hook, log, ui, ClientConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::load()?;
    log::setup_logger(&config.log_dir)?;
    install_panic_hook();

    tracing::info!(base_url = %config.base_url, "starting products");
    ui::run(config).await
}
