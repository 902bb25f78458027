use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lattes_core::TextSource;
use lattes_core::config_file::{self, ConfigFile};
use lattes_parsing::{CurriculumExtractor, ParsingConfig, ParsingConfigBuilder, SectionHeader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod output;

use output::ColorMode;

/// Lattes curriculum parser - Turn a Lattes CV text dump into a structured, rated profile
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log pipeline details (debug level) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a curriculum and report articles, tech products and sections
    Parse {
        /// Path to the curriculum text (.txt, form-feed separated pages) or pages (.json)
        file_path: PathBuf,

        /// Journal registry JSON file
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Print the profile as JSON instead of a report
        #[arg(long)]
        json: bool,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Only accept section headers that match a known title exactly
        #[arg(long)]
        strict_headers: bool,
    },

    /// Dry run: print the tracked items per section without parsing them
    Sections {
        /// Path to the curriculum text or pages file
        file_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Only accept section headers that match a known title exactly
        #[arg(long)]
        strict_headers: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file_config = config_file::load_config();

    match cli.command {
        Command::Parse {
            file_path,
            registry,
            json,
            output,
            no_color,
            strict_headers,
        } => parse(
            &file_path,
            registry,
            json,
            output,
            no_color,
            strict_headers,
            &file_config,
        ),
        Command::Sections {
            file_path,
            no_color,
            strict_headers,
        } => sections(&file_path, no_color, strict_headers, &file_config),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "lattes_core=debug,lattes_parsing=debug,lattes_text=debug,lattes=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Build the parsing config from the config file and CLI flags.
fn parsing_config(file_config: &ConfigFile, strict_headers: bool) -> anyhow::Result<ParsingConfig> {
    let parsing = file_config.parsing.clone().unwrap_or_default();
    let mut builder = ParsingConfigBuilder::new();

    let exact = match parsing.header_match.as_deref() {
        None | Some("prefix") => strict_headers,
        Some("exact") => true,
        Some(other) => {
            tracing::warn!(value = other, "unknown header_match in config, using prefix matching");
            strict_headers
        }
    };
    if exact {
        builder = builder.exact_headers();
    }
    for title in parsing.extra_headers.unwrap_or_default() {
        if title.trim().is_empty() {
            tracing::warn!("ignoring blank entry in extra_headers");
            continue;
        }
        builder = builder.add_header(SectionHeader::generic(title));
    }
    for phrase in parsing.footer_phrases.unwrap_or_default() {
        builder = builder.add_footer_phrase(phrase);
    }
    if let Some(n) = parsing.min_generic_item_len {
        builder = builder.min_generic_item_len(n);
    }

    Ok(builder.build()?)
}

/// Resolve the registry path: CLI flag > env var > config file.
fn registry_path(flag: Option<PathBuf>, file_config: &ConfigFile) -> Option<PathBuf> {
    flag.or_else(|| std::env::var("LATTES_REGISTRY").ok().map(PathBuf::from))
        .or_else(|| {
            file_config
                .registry
                .as_ref()
                .and_then(|r| r.path.as_ref())
                .map(PathBuf::from)
        })
}

/// Output written to a file is never colored.
fn color_mode(file_config: &ConfigFile, no_color: bool, to_file: bool) -> ColorMode {
    let display_color = file_config
        .display
        .as_ref()
        .and_then(|d| d.color)
        .unwrap_or(true);
    ColorMode(display_color && !no_color && !to_file)
}

fn display_name(file_path: &Path) -> String {
    file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string())
}

fn parse(
    file_path: &Path,
    registry: Option<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
    no_color: bool,
    strict_headers: bool,
    file_config: &ConfigFile,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let config = parsing_config(file_config, strict_headers)?;

    let registry = match registry_path(registry, file_config) {
        Some(path) => lattes_core::load_registry(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load registry {}: {}", path.display(), e))?,
        None => {
            tracing::warn!("no journal registry configured, every article gets the lowest rating");
            Vec::new()
        }
    };

    let backend = lattes_text::backend_for_path(file_path);
    let profile = CurriculumExtractor::with_config(config)
        .with_registry(&registry)
        .extract_via_backend(file_path, backend.as_ref())?;

    let color = color_mode(file_config, no_color, output.is_some());

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    if json {
        serde_json::to_writer_pretty(&mut writer, &profile)?;
        writeln!(writer)?;
    } else {
        output::print_profile(&mut writer, &profile, color)?;
    }

    if let Some(ref output_path) = output {
        eprintln!("Profile of {} written to {}", display_name(file_path), output_path.display());
    }

    Ok(())
}

fn sections(
    file_path: &Path,
    no_color: bool,
    strict_headers: bool,
    file_config: &ConfigFile,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let config = parsing_config(file_config, strict_headers)?;
    let extractor = CurriculumExtractor::with_config(config);

    let backend = lattes_text::backend_for_path(file_path);
    let pages = backend.extract_pages(file_path)?;
    let lines = extractor.normalize(&pages);
    if lines.is_empty() {
        return Err(lattes_parsing::ParsingError::EmptyDocument.into());
    }
    let items = extractor.track(&lines);

    let color = color_mode(file_config, no_color, false);

    let mut stdout = std::io::stdout();
    output::print_tracked_items(&mut stdout, &display_name(file_path), &items, color)?;

    Ok(())
}
