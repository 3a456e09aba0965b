use clap::Parser;
use fresco::{Cli, GeminiOracle, Pipeline};
use fresco_error::{PipelineError, PipelineErrorKind};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let text: String = tokio::fs::read_to_string(&cli.text_file)
        .await
        .map_err(|e| {
            PipelineError::new(PipelineErrorKind::InputRead(format!(
                "{}: {}",
                cli.text_file.display(),
                e
            )))
        })?;
    info!(
        file = %cli.text_file.display(),
        chars = text.len(),
        "Loaded text file"
    );

    let oracle = GeminiOracle::from_env()?;
    let pipeline = Pipeline::new(&oracle);
    let report = pipeline
        .run(&text, &cli.style_prompt, &cli.output_dir)
        .await?;

    info!(
        scenes = report.scene_count(),
        characters = report.character_count(),
        locations = report.location_count(),
        "Job complete, check the output directory"
    );

    Ok(())
}
