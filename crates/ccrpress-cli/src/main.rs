use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ccrpress_core::{AppConfig, PublicationRecord};
use ccrpress_publish::{ManuscriptHints, OjsClient, PublicationService};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "ccrpress",
    about = "Derive DOIs, page numbers and JATS metadata for CCR submissions",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format.
    /// Also enabled by setting CCRPRESS_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive and show the publication record of a submission.
    Record {
        id: u64,
        /// LaTeX source whose header macros pre-fill the record.
        #[arg(long)]
        latex: Option<PathBuf>,
    },

    /// Render the JATS citation document of a submission.
    Jats {
        id: u64,
        #[arg(long)]
        latex: Option<PathBuf>,
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Build the upload archive (`{local id}.zip`) of a submission.
    Pack {
        id: u64,
        /// Typeset manuscript PDF to include.
        #[arg(long)]
        manuscript: Option<PathBuf>,
        #[arg(long)]
        latex: Option<PathBuf>,
        /// Directory the archive is written to.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Check that the API token is accepted.
    Verify,

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information.
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration.
    Show,
    /// Print the config file location.
    Path,
    /// Write a default config file.
    Init {
        #[arg(long)]
        force: bool,
    },
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();
    let cli = Cli::parse();
    let json_output = cli.json || std::env::var("CCRPRESS_JSON").as_deref() == Ok("1");

    let config = AppConfig::load()?;

    match cli.command {
        // ── Record ─────────────────────────────────────────────────────────

        Commands::Record { id, latex } => {
            let hints = read_hints(latex.as_deref())?;
            let service = connect(&config)?;
            let record = service.derive(id, &hints).await?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":record,"meta":{"duration_ms":dur}}))?;
            } else {
                print_record(&record);
            }
        }

        // ── JATS ───────────────────────────────────────────────────────────

        Commands::Jats { id, latex, output } => {
            let hints = read_hints(latex.as_deref())?;
            let service = connect(&config)?;
            let (record, document) = service.citation(id, &hints).await?;
            let dur = start.elapsed().as_millis();

            match output {
                Some(path) => {
                    std::fs::write(&path, &document)
                        .with_context(|| format!("writing {}", path.display()))?;
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":{"doi":record.doi,"path":path},"meta":{"duration_ms":dur}}))?;
                    } else {
                        println!("Wrote {} ({})", path.display(), record.doi);
                    }
                }
                None if json_output => {
                    let xml = String::from_utf8(document)?;
                    print_json(&serde_json::json!({"status":"ok","data":{"doi":record.doi,"xml":xml},"meta":{"duration_ms":dur}}))?;
                }
                None => print!("{}", String::from_utf8(document)?),
            }
        }

        // ── Pack ───────────────────────────────────────────────────────────

        Commands::Pack { id, manuscript, latex, output_dir } => {
            let hints = read_hints(latex.as_deref())?;
            let pdf = manuscript
                .as_deref()
                .map(|path| {
                    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
                })
                .transpose()?;

            let service = connect(&config)?;
            let archive = service.package(id, &hints, pdf.as_deref()).await?;

            std::fs::create_dir_all(&output_dir)?;
            let path = output_dir.join(archive.file_name());
            std::fs::write(&path, &archive.bytes)
                .with_context(|| format!("writing {}", path.display()))?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status":"ok",
                    "data":{"path":path,"local_id":archive.local_id,"bytes":archive.bytes.len(),"manuscript":pdf.is_some()},
                    "meta":{"duration_ms":dur}
                }))?;
            } else {
                println!("Packed {} ({} bytes)", path.display(), archive.bytes.len());
                if pdf.is_none() {
                    println!("  note: no manuscript included");
                }
            }
        }

        // ── Verify ─────────────────────────────────────────────────────────

        Commands::Verify => {
            let client = client(&config)?;
            let result = client.verify().await;
            let dur = start.elapsed().as_millis();

            match result {
                Ok(()) => {
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":{"base_url":config.upstream.base_url},"meta":{"duration_ms":dur}}))?;
                    } else {
                        println!("✓ Token accepted by {}", config.upstream.base_url);
                    }
                }
                Err(e) => {
                    if json_output {
                        print_json(&serde_json::json!({"status":"error","error":"verify_failed","message":e.to_string(),"meta":{"duration_ms":dur}}))?;
                    } else {
                        eprintln!("✗ {e}");
                    }
                    std::process::exit(1);
                }
            }
        }

        // ── Config ─────────────────────────────────────────────────────────

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":config}))?;
                } else {
                    print!("{}", toml::to_string_pretty(&config)?);
                }
            }
            ConfigAction::Path => {
                let path = AppConfig::config_path();
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":path,"exists":path.exists()}}))?;
                } else {
                    println!("{}", path.display());
                }
            }
            ConfigAction::Init { force } => {
                let path = AppConfig::config_path();
                if path.exists() && !force {
                    bail!("{} already exists (use --force to overwrite)", path.display());
                }
                AppConfig::default().save_to(&path)?;
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":path}}))?;
                } else {
                    println!("Wrote default config to {}", path.display());
                }
            }
        },

        // ── Version ────────────────────────────────────────────────────────

        Commands::Version => {
            let version = env!("CARGO_PKG_VERSION");
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"version":version}}))?;
            } else {
                println!("ccrpress v{version}");
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn client(config: &AppConfig) -> Result<OjsClient> {
    let token = config
        .api_token()
        .with_context(|| format!("no API token: set {}", config.upstream.token_env))?;
    Ok(OjsClient::new(&config.upstream, token)?)
}

fn connect(config: &AppConfig) -> Result<PublicationService<OjsClient>> {
    Ok(PublicationService::new(client(config)?, Arc::new(config.clone())))
}

fn read_hints(latex: Option<&Path>) -> Result<ManuscriptHints> {
    let Some(path) = latex else {
        return Ok(ManuscriptHints::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(ManuscriptHints::from_latex(&source))
}

fn print_record(record: &PublicationRecord) {
    println!("DOI:        {}{}", record.doi, if record.doi_was_preexisting { " (registered)" } else { "" });
    println!("Title:      {}", record.title);
    for author in &record.authors {
        if author.affiliation.is_empty() {
            println!("Author:     {}", author.display_name());
        } else {
            println!("Author:     {} ({})", author.display_name(), author.affiliation);
        }
    }
    match &record.placement {
        Some(p) => println!("Issue:      {} vol. {} no. {} (#{})", p.year, p.volume, p.number, record.sequence_number),
        None => println!("Issue:      not assigned"),
    }
    println!("First page: {}", record.first_page);
    println!("Keywords:   {}", record.keywords.join("; "));
    println!("Abstract:");
    for paragraph in &record.abstract_paragraphs {
        println!();
        println!("{paragraph}");
    }
}
