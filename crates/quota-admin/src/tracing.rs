use anyhow::bail;
use quota_shared::telemetry;

/// Starts tracing to a file under `traces/` or to stdout if requested (or if
/// the file could not be created)
pub fn init(cli: &super::cli::Cli, default_filter: &str) -> anyhow::Result<()> {
    fn init_to_file(default_filter: &str) -> anyhow::Result<()> {
        let (file, filename) = telemetry::create_trace_file("quota_admin")?;
        let subscriber = telemetry::get_subscriber("quota_admin".into(), default_filter, file);

        // Start logging to file
        match telemetry::init_subscriber(subscriber) {
            Ok(_) => {
                println!("Tracing started to file {filename:?}");
                Ok(())
            }
            Err(e) => {
                bail!("Failed to start tracing to file. Error: {e}");
            }
        }
    }

    if !cli.is_to_std_out {
        match init_to_file(default_filter) {
            Ok(_) => return Ok(()),
            Err(e) => {
                // Print error and fall though to logging to stdout
                eprintln!("Failed to start logging to file: {e}");
            }
        }
    }

    match tracing_subscriber::fmt().try_init() {
        Ok(_) => Ok(()),
        Err(e) => {
            bail!("Failed to start tracing. Error: {e}");
        }
    }
}
