pub mod builder;
pub mod config;
pub mod error;
pub mod link;
pub mod query;
pub mod share;

pub use error::{LinkError, ShareError};
pub use share::convert_xray_json_to_share_links;

use anyhow::{Context, Result};
use base64::prelude::*;
use clap::Parser;
use log::info;
use std::io::{Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xray-share-links")]
#[command(about = "Generate share links from the outbounds of an Xray JSON config", long_about = None)]
struct Args {
    /// Path to the Xray config file ("-" reads stdin)
    #[arg(short, long, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// URL to fetch the Xray config from
    #[arg(short, long)]
    url: Option<String>,

    /// Write links to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit the link list as a single base64 subscription blob
    #[arg(long)]
    base64: bool,
}

#[allow(dead_code)]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match (&args.url, &args.input) {
        (Some(url), _) => fetch_url_content(url)?,
        (None, Some(path)) if path.as_os_str() != "-" => std::fs::read(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?,
        (None, _) => read_stdin()?,
    };
    info!("Read {} bytes of config", config.len());

    let links = convert_xray_json_to_share_links(&config)?;
    let text = if args.base64 {
        BASE64_STANDARD.encode(links.as_bytes())
    } else {
        links
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", text))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote share links to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", text)?;
        }
    }

    Ok(())
}

#[allow(dead_code)]
fn fetch_url_content(url: &str) -> Result<Vec<u8>> {
    info!("Fetching config from {}", url);
    let response = reqwest::blocking::get(url)?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to fetch URL: HTTP {}", response.status());
    }

    Ok(response.bytes()?.to_vec())
}

#[allow(dead_code)]
fn read_stdin() -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .context("Failed to read config from stdin")?;
    Ok(buf)
}
