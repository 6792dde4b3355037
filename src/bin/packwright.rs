//! packwright CLI
//!
//! Compiles a package description into generated source artifacts, inspects
//! a resolved version chain, and verifies emitted artifacts against a fresh
//! generation run.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use packwright::emit::{write_artifacts, GenerationManifest};
use packwright::gencode::generate;
use packwright::model::Package;
use packwright::resolve::Provenance;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "packwright")]
#[command(about = "Compile versioned package schemas into source artifacts")]
struct Cli {
    /// Path to the package description (JSON)
    #[arg(short, long)]
    package: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the version chain and write all artifacts
    Generate {
        /// Output directory (defaults to the package's declared output)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the resolved chain without writing anything
    Inspect {
        /// Show every version instead of just the latest
        #[arg(long)]
        all: bool,
    },

    /// Regenerate and compare against a previously written manifest
    Verify {
        /// Directory holding the artifacts and manifest.json
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let text = fs::read_to_string(&cli.package)?;
    let package: Package = serde_json::from_str(&text)?;

    match cli.command {
        Commands::Generate { out } => {
            let out = out.unwrap_or_else(|| PathBuf::from(&package.output));
            let output = generate(&package)?;
            write_artifacts(&out, &output.manifest, &output.artifacts)?;
            println!(
                "✅ Generated {} artifacts for {} into {}",
                output.artifacts.len(),
                package.name,
                out.display()
            );
            for entry in &output.manifest.artifacts {
                println!("  {} ({} lines, {})", entry.name, entry.lines, entry.checksum);
            }
        }

        Commands::Inspect { all } => {
            let output = generate(&package)?;
            let versions: Vec<_> = if all {
                output.chain.versions.iter().collect()
            } else {
                vec![output.chain.latest()]
            };
            for version in versions {
                println!("📦 {} @ {}", output.chain.package, version.name);
                for entry in &version.entries {
                    let def = &entry.definition.definition;
                    let provenance = match &entry.provenance {
                        Provenance::New => "new".to_string(),
                        Provenance::Identical => "identical".to_string(),
                        Provenance::Modified { plan } => {
                            format!("modified ({} fields)", plan.fields.len())
                        }
                    };
                    println!(
                        "  {} {} - {} variables [{}]",
                        def.kind.as_str(),
                        def.name,
                        def.variables.len(),
                        provenance
                    );
                }
            }
        }

        Commands::Verify { out } => {
            let out = out.unwrap_or_else(|| PathBuf::from(&package.output));
            let text = fs::read_to_string(out.join("manifest.json"))?;
            let written: GenerationManifest = serde_json::from_str(&text)?;
            let fresh = generate(&package)?;

            let mut clean = true;
            for entry in &fresh.manifest.artifacts {
                match written.artifacts.iter().find(|w| w.name == entry.name) {
                    Some(w) if w == entry => println!("  ✅ {} - up to date", entry.name),
                    Some(_) => {
                        println!("  ❌ {} - STALE", entry.name);
                        clean = false;
                    }
                    None => {
                        println!("  ❌ {} - missing from manifest", entry.name);
                        clean = false;
                    }
                }
            }
            if !clean {
                anyhow::bail!("artifacts are stale; re-run generate");
            }
            println!("✅ All artifacts match");
        }
    }

    Ok(())
}
