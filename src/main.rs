//! `notebook-podcast`: turn a PDF into an audio overview.
//!
//! Creates a temporary notebook, uploads the PDF, generates the audio
//! overview, downloads it and deletes the notebook. Progress goes to
//! stdout, logs and errors to stderr.
//!
//! Exit status is `0` on success and `1` on any failure.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notebook_podcast::config::{load_env_file, StartupConfig, DEFAULT_ENV_FILE};
use notebook_podcast::services::notebook::{AudioFormat, AudioLength, AudioOptions, HttpSessionFactory};
use notebook_podcast::PodcastGenerator;

#[derive(Debug, Parser)]
#[command(name = "notebook-podcast", version, about = "Generate a podcast-style audio overview from a PDF.")]
struct Cli {
    /// Path to the source PDF file
    pdf: PathBuf,

    /// Path where the output audio should be saved
    output: PathBuf,

    /// Environment file loaded before anything else
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Free-form guidance for the hosts
    #[arg(long)]
    instructions: Option<String>,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    #[arg(long, value_enum)]
    length: Option<LengthArg>,

    /// Output language code, e.g. `en`
    #[arg(long)]
    language: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    DeepDive,
    Brief,
    Critique,
    Debate,
}

impl From<FormatArg> for AudioFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::DeepDive => AudioFormat::DeepDive,
            FormatArg::Brief => AudioFormat::Brief,
            FormatArg::Critique => AudioFormat::Critique,
            FormatArg::Debate => AudioFormat::Debate,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LengthArg {
    Short,
    Default,
    Long,
}

impl From<LengthArg> for AudioLength {
    fn from(arg: LengthArg) -> Self {
        match arg {
            LengthArg::Short => AudioLength::Short,
            LengthArg::Default => AudioLength::Default,
            LengthArg::Long => AudioLength::Long,
        }
    }
}

impl Cli {
    fn audio_options(&self) -> AudioOptions {
        AudioOptions {
            instructions: self.instructions.clone(),
            format: self.format.map(Into::into),
            length: self.length.map(Into::into),
            language: self.language.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Before logging, so the env file can set RUST_LOG.
    let env_file = match load_env_file(&cli.env_file) {
        Ok(env_file) => env_file,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Logs go to stderr; stdout is reserved for progress lines.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notebook_podcast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let startup = StartupConfig::from_env_file(env_file);

    tracing::debug!(
        api_url = %startup.client.api_url,
        storage = %startup.client.storage_path.display(),
        "Configuration loaded"
    );

    let factory = HttpSessionFactory::new(startup.client);
    let mut generator = PodcastGenerator::new(factory).with_options(cli.audio_options());
    tracing::debug!(options = ?generator.options(), "Audio options");

    match generator.generate(&cli.pdf, &cli.output).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
