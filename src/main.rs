// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::path::Path;
use std::sync::Arc;
use std::io::Write;
use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use url::Url;

use crate::app_config::{AssistantProvider, Config};
use crate::app_controller::{AppController, FilePageLoader, HttpPageLoader, PageLoader};
use crate::speech::{SpeechEvent, SpeechPlatform, UtteranceEvent, UtteranceHandle, Voice};

mod app_config;
mod app_controller;
mod assistant;
mod content_extractor;
mod errors;
mod language_utils;
mod providers;
mod speech;

/// CLI Wrapper for AssistantProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliAssistantProvider {
    Gemini,
    Ollama,
}

impl From<CliAssistantProvider> for AssistantProvider {
    fn from(cli_provider: CliAssistantProvider) -> Self {
        match cli_provider {
            CliAssistantProvider::Gemini => AssistantProvider::Gemini,
            CliAssistantProvider::Ollama => AssistantProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a page and read it aloud (default command)
    #[command(alias = "read")]
    Read(ReadArgs),

    /// Generate shell completions for pagevoice
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ReadArgs {
    /// Page to read: an http(s) URL or a local HTML file
    #[arg(value_name = "PAGE")]
    page: String,

    /// Translate the summary into this language code (e.g. 'ja', 'fr')
    #[arg(short, long)]
    translate: Option<String>,

    /// Assistant provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliAssistantProvider>,

    /// Model name to use for summarization and translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the assistant provider
    #[arg(short, long)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Print the extracted page text without summarizing
    #[arg(short, long)]
    extract_only: bool,

    /// Skip reading the result aloud
    #[arg(short, long)]
    quiet: bool,
}

/// PageVoice - Read any web page aloud, in your language
///
/// Extracts the readable text from a web page, summarizes it with an AI
/// assistant, optionally translates the summary, and reads the result aloud.
#[derive(Parser, Debug)]
#[command(name = "pagevoice")]
#[command(author = "PageVoice Team")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered page summarization and read-aloud tool")]
#[command(long_about = "PageVoice extracts the readable text from a web page, summarizes it with an AI assistant, optionally translates the summary, and reads the result aloud.

EXAMPLES:
    pagevoice https://example.com/article       # Summarize and read aloud
    pagevoice -t ja https://example.com/article # Translate the summary into Japanese
    pagevoice -e page.html                      # Print extracted text only
    pagevoice -q https://example.com/article    # Summarize without reading aloud
    pagevoice -p ollama -m llama3.2:3b page.html # Use a local model
    pagevoice completions bash > pagevoice.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

SUPPORTED PROVIDERS:
    gemini - Google Gemini API (requires API key)
    ollama - Local Ollama server (default: llama3.2:3b)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Page to read: an http(s) URL or a local HTML file
    #[arg(value_name = "PAGE")]
    page: Option<String>,

    /// Translate the summary into this language code (e.g. 'ja', 'fr')
    #[arg(short, long)]
    translate: Option<String>,

    /// Assistant provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliAssistantProvider>,

    /// Model name to use for summarization and translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the assistant provider
    #[arg(short, long)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Print the extracted page text without summarizing
    #[arg(short, long)]
    extract_only: bool,

    /// Skip reading the result aloud
    #[arg(short, long)]
    quiet: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Speech platform for the terminal: "speaking" prints the text, so the
/// pipeline is fully exercisable without an audio device. Swap in a host
/// platform adapter for actual audio output.
#[derive(Debug)]
struct ConsoleSpeechPlatform {
    muted: bool,
}

impl ConsoleSpeechPlatform {
    fn new(muted: bool) -> Self {
        Self { muted }
    }
}

impl SpeechPlatform for ConsoleSpeechPlatform {
    fn voices(&self) -> Vec<Voice> {
        vec![
            Voice::new("console-en", "Console English", "en-US"),
            Voice::new("console-ja", "Console Japanese", "ja-JP"),
            Voice::new("console-es", "Console Spanish", "es-ES"),
            Voice::new("console-fr", "Console French", "fr-FR"),
            Voice::new("console-de", "Console German", "de-DE"),
            Voice::new("console-zh", "Console Chinese", "zh-CN"),
            Voice::new("console-ko", "Console Korean", "ko-KR"),
            Voice::new("console-ar", "Console Arabic", "ar-SA"),
            Voice::new("console-ru", "Console Russian", "ru-RU"),
            Voice::new("console-pt", "Console Portuguese", "pt-BR"),
        ]
    }

    fn speak(&self, text: &str, voice: &Voice) -> Result<UtteranceHandle, crate::errors::SpeechError> {
        if !self.muted {
            println!("\n🔊 [{}]\n{}\n", voice.language, text);
        }
        let (sender, events) = tokio::sync::mpsc::unbounded_channel();
        let _ = sender.send(UtteranceEvent::Started);
        let _ = sender.send(UtteranceEvent::Ended);
        Ok(UtteranceHandle { id: 0, events })
    }

    fn cancel(&self, _utterance_id: u64) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "pagevoice", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Read(args)) => run_read(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let page = cli.page.ok_or_else(|| {
                anyhow!("PAGE is required when no subcommand is specified")
            })?;

            let read_args = ReadArgs {
                page,
                translate: cli.translate,
                provider: cli.provider,
                model: cli.model,
                api_key: cli.api_key,
                config_path: cli.config_path,
                log_level: cli.log_level,
                extract_only: cli.extract_only,
                quiet: cli.quiet,
            };
            run_read(read_args).await
        }
    }
}

async fn run_read(options: ReadArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.assistant.provider = provider.clone().into();
    }

    let provider_str = config.assistant.provider.to_lowercase_string();
    if let Some(provider_config) = config.assistant.available_providers.iter_mut()
        .find(|p| p.provider_type == provider_str)
    {
        if let Some(model) = &options.model {
            provider_config.model = model.clone();
        }
        if let Some(api_key) = &options.api_key {
            provider_config.api_key = api_key.clone();
        }
    }

    if let Some(target_lang) = &options.translate {
        config.target_language = target_lang.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Extraction-only mode needs no assistant, so the API key requirement
    // does not apply
    if !options.extract_only {
        config.validate().context("Configuration validation failed")?;
    }

    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    // Build a page loader for the given target, honoring the configured
    // fetch timeout
    let page_timeout_secs = config.extraction.page_timeout_secs;
    let loader: Arc<dyn PageLoader> = match Url::parse(&options.page) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            Arc::new(HttpPageLoader::new(options.page.clone(), page_timeout_secs)?)
        }
        _ => {
            let path = Path::new(&options.page);
            if !path.exists() {
                return Err(anyhow!("Page does not exist: {:?}", path));
            }
            Arc::new(FilePageLoader::new(path))
        }
    };

    // Create controller
    let platform = Arc::new(ConsoleSpeechPlatform::new(options.quiet));
    let controller = AppController::new(config, platform);

    // Load and extract
    let content = controller.load_page(loader).await?;
    info!("Page: {}", content.title);

    if options.extract_only {
        println!("{}", content.body);
        return Ok(());
    }

    // Summarize, optionally translate, and read aloud
    let spinner = create_spinner("Summarizing...");
    let result = controller.summarize_and_read().await;
    spinner.finish_and_clear();
    let summary = result?;

    println!("## {}\n\n{}", content.title, summary);

    if let Some(target_lang) = &options.translate {
        let language_name = language_utils::language_display_name(target_lang)
            .map_err(|_| anyhow!(
                "Unsupported language code: {}. Supported: {}",
                target_lang,
                language_utils::SUPPORTED_LANGUAGES.iter()
                    .map(|l| l.code)
                    .collect::<Vec<_>>()
                    .join(", "),
            ))?;

        let spinner = create_spinner(&format!("Translating into {}...", language_name));
        let result = controller.translate_and_read(target_lang).await;
        spinner.finish_and_clear();
        let translation = result?;

        println!("\n## {} ({})\n\n{}", content.title, language_name, translation.text);
    }

    // Let the active utterance finish before exiting
    let mut events = controller.speech_events();
    while controller.is_speaking() {
        match events.recv().await {
            Ok(SpeechEvent::Ended) | Ok(SpeechEvent::Error(_)) | Err(_) => break,
            Ok(SpeechEvent::Started) => {}
        }
    }

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}
