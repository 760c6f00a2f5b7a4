use std::sync::Arc;

use clap::{Parser, Subcommand};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use tannoy_agent::Announcer;
use tannoy_core::config::Config;
use tannoy_core::types::{AnnouncementRequest, Language};
use tannoy_media::PcmFormat;

mod logging;
mod speaker;

use speaker::Speaker;

#[derive(Parser)]
#[command(
    name = "tannoy",
    about = "Type an announcement, optionally translate it, and hear it read aloud",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Speak a single announcement
    Speak {
        /// Announcement text
        text: String,

        /// Language to speak in (id, en, zh)
        #[arg(short, long, default_value = "id")]
        lang: Language,
    },

    /// Prompt for announcements until you type "quit"
    Interactive,

    /// Start the HTTP gateway
    Gateway {
        /// Port to listen on (default: 8787)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List supported languages
    Languages,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show resolved settings and config problems
    Status,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config
    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(Config::config_path);

    let config = Config::load(&config_path)?;

    logging::init(config.logging.as_ref(), cli.verbose);

    // Commands that call the models must not start with a format they cannot decode.
    if matches!(
        cli.command,
        Commands::Speak { .. } | Commands::Interactive | Commands::Gateway { .. }
    ) {
        let (warnings, errors) = config.validate();
        for w in &warnings {
            tracing::warn!("{w}");
        }
        if !errors.is_empty() {
            anyhow::bail!("Invalid config {}: {}", config_path.display(), errors.join("; "));
        }
    }

    match cli.command {
        Commands::Speak { text, lang } => {
            let announcer = Announcer::from_config(&config);
            let mut speaker = Speaker::new();
            let request = AnnouncementRequest::new(text, lang);
            let buffer = announcer
                .announce_decoded(&request, PcmFormat::from_config(&config))
                .await?;
            speaker.play(&buffer)?;
        }
        Commands::Interactive => {
            run_interactive(&config).await?;
        }
        Commands::Gateway { port } => {
            let port = port.unwrap_or_else(|| config.gateway_port());
            tracing::info!("Starting Tannoy gateway on port {port}");
            let state = Arc::new(tannoy_gateway::GatewayState::from_config(Arc::new(config))?);
            tannoy_gateway::start_gateway(state, port).await?;
        }
        Commands::Languages => {
            for lang in Language::ALL {
                let marker = if lang.is_source() { " (source)" } else { "" };
                println!("{:<4}{}{marker}", lang.code(), lang.display_name());
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let json = serde_json::to_string_pretty(&config)?;
                println!("{json}");
            }
        },
        Commands::Status => {
            println!("Tannoy v{}", env!("CARGO_PKG_VERSION"));
            println!("Config: {}", config_path.display());
            println!("API base: {}", config.gemini_base_url());
            println!(
                "API key: {}",
                if config.api_key().is_some() { "configured" } else { "missing" }
            );
            println!("Translation model: {}", config.translation_model());
            println!("Speech model: {} (voice {})", config.speech_model(), config.voice());
            println!(
                "Audio: {} Hz, {} channel(s), 16-bit PCM",
                config.sample_rate(),
                config.channels()
            );
            println!("Gateway: {}:{}", config.gateway_bind(), config.gateway_port());

            let (warnings, errors) = config.validate();
            for w in &warnings {
                println!("warning: {w}");
            }
            for e in &errors {
                println!("error: {e}");
            }
        }
    }

    Ok(())
}

/// One announcement at a time: prompt, wait for the audio, play it, repeat.
async fn run_interactive(config: &Config) -> anyhow::Result<()> {
    let announcer = Announcer::from_config(config);
    let format = PcmFormat::from_config(config);
    let mut speaker = Speaker::new();
    let theme = ColorfulTheme::default();
    let names: Vec<&str> = Language::ALL.iter().map(|l| l.display_name()).collect();

    loop {
        let text: String = Input::with_theme(&theme)
            .with_prompt("Announcement (\"quit\" to exit)")
            .allow_empty(true)
            .interact_text()?;
        if matches!(text.trim(), "quit" | "exit") {
            break;
        }

        let choice = Select::with_theme(&theme)
            .with_prompt("Language")
            .items(&names)
            .default(0)
            .interact()?;

        let request = AnnouncementRequest::new(text, Language::ALL[choice]);
        match announcer.announce_decoded(&request, format).await {
            Ok(buffer) => speaker.play(&buffer)?,
            Err(e) => eprintln!("{e}"),
        }
    }

    Ok(())
}
