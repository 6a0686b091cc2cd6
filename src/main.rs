use std::path::{Path, PathBuf};

use clap::Parser;
use plant_health::analysis::provider::{FixedIndexSelector, ProviderInstrumentation};
use plant_health::app::SessionView;
use plant_health::session::StatsObserver;
use plant_health::{
    AnalysisController, AppError, Configuration, ImagePayload, MockInferenceProvider, SessionState,
};
use tracing::{error, info, Level};

#[derive(Parser, Debug)]
#[command(name = "plant-health", about = "Assess plant health from leaf photos")]
struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Always return this catalog entry (0 healthy, 1 early blight, 2 late blight)
    #[arg(long)]
    pick: Option<usize>,

    /// Images to analyse, one after another
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(path: &Path, state: &SessionState) -> Result<(), AppError> {
    let report = serde_json::json!({
        "image": path.display().to_string(),
        "state": state.state_name(),
        "display": state.display_reference().map(|r| r.url().to_string()),
        "result": state.result(),
        "error": state.error().map(|e| e.message().to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let configuration = Configuration::load(cli.config.as_deref())?;
    init_logging(configuration.level()?);

    let mut provider =
        MockInferenceProvider::new().with_latency(configuration.simulated_latency());
    if let Some(index) = cli.pick {
        provider = provider.with_selector(FixedIndexSelector(index));
    }

    let stats = StatsObserver::new();
    let controller = AnalysisController::builder(configuration)
        .provider(provider.instrumented())
        .add_observer(Box::new(stats.clone()))
        .build()?;
    let mut view = SessionView::new();

    for path in &cli.images {
        let payload = match ImagePayload::from_path(path) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        info!("Submitting {} ({})", path.display(), payload.content_type());
        controller.submit_image(payload)?;
        let state = controller.settled().await;

        if cli.json {
            print_json(path, &state)?;
        } else {
            println!("{}", view.render(&state));
        }
    }

    controller.clear_image();
    let stats = stats.snapshot();
    info!(
        "Finished: {} completed, {} failed",
        stats.total_completed(),
        stats.failed
    );
    Ok(())
}
