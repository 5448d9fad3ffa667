#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

fn main() -> eframe::Result<()> {
    use clap::Parser;
    let args = quota_admin::cli::Cli::parse();

    let configuration = match quota_admin::configuration::get_configuration(args.config_dir.clone())
    {
        Ok(configuration) => configuration,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:?}");
            std::process::exit(1);
        }
    };

    if let Err(e) = quota_admin::tracing::init(&args, &configuration.logging.default_filter) {
        eprintln!("Failed to start tracing: {e}");
    }

    let rt = quota_admin::background_worker::create_runtime();
    let _enter = rt.enter(); // This Guard must be held to call `tokio::spawn` anywhere in the program
    quota_admin::background_worker::start_background_worker(rt); // This is also needed to prevent the runtime from stopping

    let client = quota_client_core::Client::new(
        configuration.store.server_address(),
        configuration.store.api_key.clone(),
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 500.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Quota Admin",
        native_options,
        Box::new(|cc| Ok(Box::new(quota_admin::QuotaAdminApp::new(cc, client)))),
    )
}
