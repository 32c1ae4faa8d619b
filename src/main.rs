//! # pichunt-loader
//!
//! Fetches a Pichunt image descriptor and applies it to an in-memory page,
//! then reports the resulting page state.

use anyhow::Result;
use clap::Parser;
use pichunt_loader::config::LoaderConfig;
use pichunt_loader::dom::Element;
use pichunt_loader::model::{Difficulty, ImageEndpoint};
use pichunt_loader::runtime::native::{ImageProbe, MemoryDocument, MemoryElement};
use pichunt_loader::source::HttpSource;
use pichunt_loader::{ImageLoader, LoadOptions, logging};
use std::str::FromStr;

const TARGET_SELECTOR: &str = "#game-image";
const DIFFICULTY_DISPLAY_ID: &str = "difficulty-stars";
const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "pichunt-loader: loads a Pichunt image descriptor from a JSON endpoint.\n\
                  Applies it to an in-memory page and prints the resulting markers, source and rating."
)]
struct Args {
    /// Full descriptor endpoint URL (overrides --api-base, --daily and --difficulty)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Base URL of the Pichunt API (falls back to PICHUNT_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Request the daily image instead of a random one
    #[arg(long)]
    daily: bool,

    /// Difficulty tier for a random image (easy, medium, hard)
    #[arg(short, long, default_value = "easy")]
    difficulty: String,

    /// Descriptor field holding the image URL
    #[arg(short, long, default_value = "url")]
    field: String,

    /// Mark the image hidden when it cannot be shown
    #[arg(long)]
    hide_on_error: bool,

    /// Render the difficulty star rating
    #[arg(long)]
    show_difficulty: bool,

    /// Do not request the image itself; leave its load pending
    #[arg(long)]
    no_probe: bool,
}

impl Args {
    fn endpoint_url(&self) -> Result<String> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.clone());
        }

        let api_base = self
            .api_base
            .clone()
            .or_else(|| std::env::var("PICHUNT_API_BASE").ok())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let endpoint = if self.daily {
            ImageEndpoint::Daily
        } else {
            let difficulty = Difficulty::from_str(&self.difficulty).map_err(anyhow::Error::msg)?;
            ImageEndpoint::NewImage(difficulty)
        };
        Ok(endpoint.url(&api_base))
    }

    fn load_options(&self) -> LoadOptions {
        let options = LoadOptions::default()
            .with_url_field(self.field.clone())
            .hide_on_error(self.hide_on_error);
        if self.show_difficulty {
            options.with_difficulty_display(DIFFICULTY_DISPLAY_ID)
        } else {
            options
        }
    }
}

/// The game page skeleton the loader targets.
struct Page {
    container: MemoryElement,
    image: MemoryElement,
    stars: MemoryElement,
}

impl Page {
    fn build(doc: &MemoryDocument, config: &LoaderConfig) -> Self {
        let container_spec = if config.container_selector.starts_with(['.', '#']) {
            format!("div{}", config.container_selector)
        } else {
            config.container_selector.clone()
        };
        let container = doc.append(None, &container_spec);
        let image = doc.append(Some(&container), &format!("img{}", TARGET_SELECTOR));
        let stars = doc.append(None, &format!("span#{}", DIFFICULTY_DISPLAY_ID));
        Self {
            container,
            image,
            stars,
        }
    }

    fn print(&self, config: &LoaderConfig) {
        let state = if self.container.has_class(&config.loaded_class) {
            "loaded"
        } else if self.container.has_class(&config.error_class) {
            "error"
        } else if self.image.image_pending() {
            "pending"
        } else {
            "idle"
        };

        println!("Image:");
        println!("  State:   {}", state);
        println!(
            "  Source:  {}",
            self.image.source().as_deref().unwrap_or("(none)")
        );
        println!("  Hidden:  {}", self.image.has_class(&config.hidden_class));
        println!("  Classes: {}", self.container.classes().join(" "));
        let stars = self.stars.text();
        if !stars.is_empty() {
            println!("  Rating: {}", stars);
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init("info");
    let args = Args::parse();
    let endpoint = args.endpoint_url()?;
    let options = args.load_options();
    let config = LoaderConfig::from_env();

    let doc = MemoryDocument::new();
    let page = Page::build(&doc, &config);

    let loader = ImageLoader::new(doc, HttpSource::new()?).with_config(config.clone());
    loader.load_image(&endpoint, TARGET_SELECTOR, &options).await;

    if !args.no_probe {
        let probe = ImageProbe::new()?;
        probe.settle(&endpoint, &page.image).await;
    }

    page.print(&config);
    Ok(())
}
