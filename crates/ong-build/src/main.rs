//! ONG Build - command line entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ong_build::{format_bytes, Builder, ImageOptimizer, JsMinifier};

#[derive(Parser, Debug)]
#[command(name = "ong-build", version, about = "Build tooling for the ONG Connect site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Minify the site into the output directory
    Build {
        /// Site sources
        #[arg(long, default_value = "src")]
        src: PathBuf,

        /// Output directory, recreated on every build
        #[arg(long, default_value = "dist")]
        dist: PathBuf,

        /// Remove console calls from JavaScript
        #[arg(long)]
        drop_console: bool,
    },

    /// Re-encode JPEG and PNG images
    #[command(name = "optimize-images")]
    OptimizeImages {
        #[arg(long, default_value = "src/img")]
        src: PathBuf,

        #[arg(long, default_value = "dist/img")]
        dist: PathBuf,

        /// JPEG quality
        #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Build {
            src,
            dist,
            drop_console,
        } => {
            let builder = Builder::new(&src, &dist)
                .with_js_minifier(JsMinifier::new().with_drop_console(drop_console));
            let report = builder
                .run()
                .with_context(|| format!("build of {} failed", src.display()))?;
            tracing::info!(
                "{} HTML, {} CSS, {} JS, {} image file(s) written to {}",
                report.html.len(),
                report.css.len(),
                report.js.len(),
                report.images,
                dist.display()
            );
        }
        Commands::OptimizeImages { src, dist, quality } => {
            let report = ImageOptimizer::new(&src, &dist)
                .with_jpeg_quality(quality)
                .optimize()
                .with_context(|| format!("image optimization in {} failed", src.display()))?;
            tracing::info!(
                "{} image(s) optimized, {} saved",
                report.images.len(),
                format_bytes(report.total_savings())
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("❌ {:#}", err);
            ExitCode::FAILURE
        }
    }
}
