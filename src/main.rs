use anyhow::Result;
use clap::{CommandFactory, Parser};
use dubsh::cli::{Cli, Commands, ConfigAction};
use dubsh::config::{Config, split_list};
use dubsh::mapping::{MappingEditor, PresetSurface, PromptSurface, VoiceMapping};
use dubsh::output::{TerminalPresenter, format_speaker};
use dubsh::stream::{Outcome, ResponseMode};
use dubsh::submit::{HttpBackend, ProcessOptions, SubmissionController, Upload, save_artifact};
use dubsh::transcript::{extract_speakers, parse_segments, speaker_turns};
use dubsh::voices::{CatalogSource, VoiceCatalog};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", format!("Error: {e}").red());
            std::process::exit(1);
        }
    }
}

/// Route `log` output to stderr; `-v` enables debug diagnostics.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("DUBSH_LOG")
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Speakers { file } => {
            handle_speakers(&file)?;
        }
        Commands::Voices { list } => {
            let config = load_config(cli.config.as_deref())?;
            let catalog = match list {
                Some(list) => VoiceCatalog::parse_list(&list),
                None => config.voices.catalog(),
            };
            print_catalog(&catalog);
        }
        Commands::Submit {
            file,
            voices,
            interactive,
            server,
            catalog,
            mode,
            save_to,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(server) = server {
                config.server.url = server;
            }
            if let Some(catalog) = catalog {
                config.voices.catalog = Some(split_list(&catalog));
            }
            if let Some(mode) = mode {
                config.server.response_mode = mode;
            }
            config.validate()?;

            let outcome = handle_submit(
                &config,
                file.as_deref(),
                &voices,
                interactive,
                save_to.as_deref(),
                cli.quiet,
            )
            .await?;
            return Ok(exit_code(outcome));
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "dubsh", &mut std::io::stdout());
        }
    }
    Ok(0)
}

fn exit_code(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Succeeded => 0,
        Outcome::Failed => 1,
        Outcome::Incomplete => 2,
    }
}

fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else {
        // Try default path, fall back to defaults
        Config::load_or_default(&Config::default_path())?
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

fn handle_speakers(file: &Path) -> Result<()> {
    let upload = Upload::read(file)?;
    let text = upload.text()?;
    let speakers = extract_speakers(text);
    if speakers.is_empty() {
        eprintln!("{}", dubsh::defaults::NO_SPEAKERS_MESSAGE.dimmed());
        return Ok(());
    }

    let turns = speaker_turns(&parse_segments(text));
    for (index, speaker) in speakers.iter().enumerate() {
        let count = turns
            .iter()
            .find(|(name, _)| name == speaker)
            .map(|(_, n)| *n);
        println!("{}", format_speaker(index, speaker, count));
    }
    Ok(())
}

fn print_catalog(catalog: &VoiceCatalog) {
    let source = match catalog.source() {
        CatalogSource::Builtin => "built-in",
        CatalogSource::User => "user",
    };
    if catalog.is_empty() {
        println!(
            "Voice catalog ({source}) is empty: voices are entered as free text"
        );
        return;
    }
    println!("Voice catalog ({source}, {} voices):", catalog.len());
    for voice in catalog.voices() {
        println!("  {} {}", "●".green(), voice);
    }
}

/// Build the voice mapping for `speakers` from presets or an interactive prompt.
fn build_mapping(
    config: &Config,
    speakers: &[String],
    presets: &[(String, String)],
    interactive: bool,
) -> Result<VoiceMapping> {
    let catalog = config.voices.catalog();
    if interactive {
        let stdin = std::io::stdin();
        let surface = PromptSurface::new(stdin.lock(), std::io::stderr());
        let mut editor = MappingEditor::new(surface, config.voices.auto_choice);
        editor.render_mapping(speakers, &catalog)?;
        return Ok(editor.read_mapping());
    }

    let mut editor = MappingEditor::new(PresetSurface::new(), config.voices.auto_choice);
    editor.render_mapping(speakers, &catalog)?;
    editor.surface_mut().apply(presets)?;
    Ok(editor.read_mapping())
}

async fn handle_submit(
    config: &Config,
    file: Option<&Path>,
    presets: &[(String, String)],
    interactive: bool,
    save_to: Option<&Path>,
    quiet: bool,
) -> Result<Outcome> {
    let upload = file.map(Upload::read).transpose()?;
    let speakers = match &upload {
        Some(upload) => extract_speakers(upload.text()?),
        None => Vec::new(),
    };
    let mapping = if upload.is_some() {
        build_mapping(config, &speakers, presets, interactive)?
    } else {
        VoiceMapping::new()
    };

    let backend = HttpBackend::new(&config.server)?;
    let mut controller = SubmissionController::new(backend, TerminalPresenter::new(quiet))
        .with_mode(config.server.response_mode)
        .with_base_url(config.server.base_url()?);
    if config.server.response_mode != ResponseMode::Auto {
        log::debug!("Response mode forced to {}", config.server.response_mode);
    }

    let options = ProcessOptions::from(&config.process);
    let outcome = controller.submit(upload, &options, || mapping).await;

    if let Some(dir) = save_to
        && outcome == Outcome::Succeeded
    {
        let saved = save_downloads(&controller, dir, quiet).await?;
        for path in saved {
            println!("{} {}", "Saved".green(), path.display());
        }
    }
    Ok(outcome)
}

async fn save_downloads(
    controller: &SubmissionController<HttpBackend, TerminalPresenter>,
    dir: &Path,
    quiet: bool,
) -> Result<Vec<PathBuf>> {
    let client = controller.backend().client();
    let mut saved = Vec::new();
    for link in controller.downloads() {
        let Some(url) = &link.url else {
            log::warn!("Skipping {}: cannot resolve {}", link.label, link.href);
            continue;
        };
        saved.push(save_artifact(client, url, dir, !quiet).await?);
    }
    Ok(saved)
}

fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Dump => {
            let config = load_config(custom_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            let path = custom_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::default_path);
            println!("{}", path.display());
        }
    }
    Ok(())
}
