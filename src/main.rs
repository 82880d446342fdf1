use anyhow::Result;

use cityweather_ui::{AppServices, RefreshOutcome};

fn main() -> Result<()> {
    // Initialize core
    cityweather_core::init()?;

    // Create and initialize application
    let mut app = cityweather_core::App::new()?;
    app.initialize()?;

    tracing::info!("CityWeather application started");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("cityweather-tokio")
        .build()?;

    let services = AppServices::from_config(app.shared_config())?;
    let symbol = services.temperature_unit().symbol();

    println!("CityWeather");
    println!("  Config directory: {}", app.config().config_dir.display());
    println!("  Saved cities:     {}", app.config().storage_path().display());

    runtime.block_on(async {
        let model = services.favorites_model();
        match model.refresh().await {
            RefreshOutcome::Completed { total: 0, .. } => {
                println!("\nNo saved cities yet.");
            }
            RefreshOutcome::Completed { total, resolved } => {
                println!("\nSaved cities ({} of {} updated):", resolved, total);
                for city in model.cities() {
                    println!("  {:<24} {}", city.city_name, city.temperature_label(symbol));
                }
            }
            RefreshOutcome::Skipped | RefreshOutcome::Cancelled => {}
        }
    });

    // Graceful shutdown
    services.shutdown();
    app.shutdown()?;

    Ok(())
}
