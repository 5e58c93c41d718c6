//! Logo Studio command line client.
//!
//! ```bash
//! logo-studio generate "Blue Fox Cafe" --style playful --filter neon
//! logo-studio preview Acme --description "Coffee roaster"
//! logo-studio improve Acme --description "fox" --accept --download 1024
//! logo-studio history
//! ```

use chrono::{TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use logo_studio::{
    logger, models, storage, ApiClient, Config, DownloadOutcome, DownloadSize,
    GenerationOrchestrator, GenerationState, HistoryStore, LogoApi, LogoError, LogoFilter,
    LogoForm, LogoResolution, LogoSize, LogoStyle,
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "logo-studio")]
#[command(version)]
#[command(about = "Generate logos with an AI logo service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate logo variations
    Generate(FormArgs),

    /// Quick low-cost preview
    Preview(FormArgs),

    /// Improve the description, then accept or decline it
    Improve {
        #[command(flatten)]
        form: FormArgs,

        /// Use the improved prompt without asking
        #[arg(long, conflicts_with = "decline")]
        accept: bool,

        /// Discard the improved prompt without asking
        #[arg(long)]
        decline: bool,
    },

    /// List recent logos
    History,

    /// Delete the logo history
    ClearHistory {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// List style presets
    Styles,

    /// Check that the service is reachable
    Health,
}

#[derive(Args, Debug)]
struct FormArgs {
    /// Business name
    #[arg(required = true)]
    name: Vec<String>,

    /// minimalist, modern, classic, playful, professional or vintage
    #[arg(long, value_parser = LogoStyle::from_str)]
    style: Option<LogoStyle>,

    /// What the business does
    #[arg(long)]
    description: Option<String>,

    /// 1024x1024, 1792x1024 or 1024x1792
    #[arg(long, value_parser = LogoSize::from_str)]
    size: Option<LogoSize>,

    /// standard, high or hd
    #[arg(long, value_parser = LogoResolution::from_str)]
    resolution: Option<LogoResolution>,

    /// Style filter, repeatable
    #[arg(long = "filter", value_parser = LogoFilter::from_str)]
    filters: Vec<LogoFilter>,

    /// Ask for a transparent background
    #[arg(long)]
    transparent: bool,

    /// Variation to download, starting at 1
    #[arg(long, value_parser = parse_variation)]
    variation: Option<usize>,

    /// Download at 256, 512 or 1024 pixels
    #[arg(long, value_parser = DownloadSize::from_str)]
    download: Option<DownloadSize>,

    /// Keep the background when downloading
    #[arg(long, requires = "download")]
    opaque: bool,

    /// Where downloads are written
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

impl FormArgs {
    fn to_form(&self, preview: bool) -> LogoForm {
        let mut form = LogoForm::new(self.name.join(" "))
            .with_style(self.style.unwrap_or_default())
            .with_description(self.description.clone().unwrap_or_default())
            .preview(preview);
        if let Some(size) = self.size {
            form = form.with_size(size);
        }
        if let Some(resolution) = self.resolution {
            form = form.with_resolution(resolution);
        }
        for filter in &self.filters {
            form = form.with_filter(*filter);
        }
        if self.transparent {
            form = form.with_transparency(true);
        }
        form
    }

    /// Zero-based index of the chosen variation.
    fn variation_index(&self) -> Option<usize> {
        self.variation.map(|n| n - 1)
    }
}

fn parse_variation(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("variation must be a number from 1, got {}", value)),
    }
}

fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_state(state: &GenerationState) {
    match state {
        GenerationState::Result {
            urls,
            generation_id,
            preview,
            selected,
        } => {
            let kind = if *preview { "Preview" } else { "Logo" };
            println!("{} ready (generation {})", kind, generation_id);
            for (i, url) in urls.iter().enumerate() {
                let marker = if i == *selected { "*" } else { " " };
                println!(" {} [{}] {}", marker, i + 1, url);
            }
        }
        GenerationState::PromptProposed(improved) => {
            println!("Improved prompt:\n  {}", improved.text);
            if let Some(preview) = &improved.preview_url {
                println!("Preview: {}", preview);
            }
        }
        GenerationState::Error(message) => eprintln!("Error: {}", message),
        GenerationState::Idle => println!("Nothing generated."),
        GenerationState::Loading(kind) => println!("Still loading ({:?})", kind),
    }
}

fn exit_on_error(state: &GenerationState) {
    if let GenerationState::Error(message) = state {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

async fn finish_result(orch: &mut GenerationOrchestrator, args: &FormArgs) -> Result<(), LogoError> {
    if !matches!(orch.state(), GenerationState::Result { .. }) {
        return Ok(());
    }
    if let Some(index) = args.variation_index() {
        orch.select_variation(index)?;
    }
    print_state(orch.state());

    let Some(size) = args.download else {
        return Ok(());
    };
    match orch.download_selected(size, !args.opaque).await? {
        DownloadOutcome::Saved { bytes, file_name } => {
            fs::create_dir_all(&args.out)?;
            let path = args.out.join(file_name);
            fs::write(&path, bytes)?;
            log::info!("💾 Logo saved to {}", path.display());
        }
        DownloadOutcome::OpenDirect(url) => {
            log::warn!("⚠️  Download failed; open the logo directly instead");
            println!("Open in your browser: {}", url);
        }
    }
    Ok(())
}

fn print_history(history: &HistoryStore) {
    if history.is_empty() {
        println!("No logo history yet. Generate your first logo!");
    }
    for entry in history.entries() {
        let when = Utc
            .timestamp_millis_opt(entry.timestamp)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{}  {:<24} {:<13} {}", when, entry.business_name, entry.style, entry.url);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let dotenv_loaded = dotenv::dotenv().is_ok();
    logger::init_with_config(logger::LoggerConfig::from_env())?;
    if dotenv_loaded {
        log::debug!(".env file loaded");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    let mut history = HistoryStore::open(storage::backend_from_config(&config.history));
    if let Some(fault) = history.last_fault() {
        log::warn!("⚠️  Started with an empty history: {}", fault);
    }

    // Local commands never touch the service.
    match &cli.command {
        Command::History => {
            print_history(&history);
            return Ok(());
        }
        Command::ClearHistory { yes } => {
            if history.is_empty() {
                println!("History is already empty.");
            } else if *yes || confirm("Clear all logo history?") {
                history.clear()?;
                println!("History cleared.");
            }
            return Ok(());
        }
        _ => {}
    }

    let api = Arc::new(ApiClient::new(&config.api)?);

    match &cli.command {
        Command::Health => {
            if api.check_health().await {
                println!("✅ {} is reachable", api.base_url());
            } else {
                println!("❌ {} is not reachable", api.base_url());
                std::process::exit(1);
            }
            return Ok(());
        }
        Command::Styles => {
            let styles = match api.list_styles().await {
                Ok(styles) => styles,
                Err(e) => {
                    log::warn!("⚠️  Could not fetch styles ({}), showing built-in presets", e);
                    models::builtin_styles()
                }
            };
            for style in styles {
                println!("{:<14} {}", style.id, style.description);
            }
            return Ok(());
        }
        _ => {}
    }

    if !api.check_health().await {
        log::warn!("⚠️  Service at {} did not answer the health check", api.base_url());
    }

    let mut orch = GenerationOrchestrator::new(api, history);

    match cli.command {
        Command::Generate(args) => {
            orch.submit(&args.to_form(false)).await?;
            exit_on_error(orch.state());
            finish_result(&mut orch, &args).await?;
        }
        Command::Preview(args) => {
            orch.submit(&args.to_form(true)).await?;
            exit_on_error(orch.state());
            finish_result(&mut orch, &args).await?;
        }
        Command::Improve {
            form,
            accept,
            decline,
        } => {
            orch.improve(&form.to_form(false)).await?;
            print_state(orch.state());
            if !matches!(orch.state(), GenerationState::PromptProposed(_)) {
                std::process::exit(1);
            }

            let accepted = if accept {
                true
            } else if decline {
                false
            } else {
                confirm("Use this prompt?")
            };
            if accepted {
                orch.accept().await?;
                exit_on_error(orch.state());
                finish_result(&mut orch, &form).await?;
            } else {
                orch.decline()?;
                println!("Improved prompt discarded.");
            }
        }
        Command::History | Command::ClearHistory { .. } | Command::Health | Command::Styles => {}
    }

    Ok(())
}
