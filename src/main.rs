//! Tubeload - Video & Audio Downloader
//!
//! A desktop front-end for yt-dlp: paste a URL, pick a container format and
//! quality from cascading selectors, choose an output folder, download.

use anyhow::Result;
use clap::Parser;
use iced::Application;
use tubeload::catalog::{build_catalog, ContentKind};
use tubeload::extractor::{self, MediaExtractor};
use tubeload::gui::TubeloadApp;

#[derive(Parser)]
struct Args {
    /// Probe a URL and print its selectable formats without downloading
    #[arg(long)]
    probe: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    check_ytdlp_installed();

    if let Some(url) = args.probe {
        // Run headless inside a temporary Tokio runtime
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async move {
            probe_cli(url).await;
        });
        return Ok(());
    }

    // Start the GUI application (synchronous entrypoint)
    TubeloadApp::run(iced::Settings {
        window: iced::window::Settings {
            size: iced::Size::new(720.0, 640.0),
            min_size: Some(iced::Size::new(600.0, 500.0)),
            ..Default::default()
        },
        ..Default::default()
    })?;

    Ok(())
}

fn check_ytdlp_installed() {
    if extractor::find_ytdlp().is_some() {
        return;
    }

    // Not found - warn but don't exit, the app can still launch.
    // The user will see the error when they fetch a URL.
    eprintln!("WARNING: yt-dlp not found in common locations");
    eprintln!("The app will run, but fetching and downloading will fail.");
    eprintln!("Please install yt-dlp:");
    eprintln!("  pip install yt-dlp");
    eprintln!("  or: brew install yt-dlp");
    eprintln!("  or visit: https://github.com/yt-dlp/yt-dlp");
}

async fn probe_cli(url: String) {
    println!("Probing: {}", url);

    let extractor = match MediaExtractor::new() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Failed to initialize extractor: {}", e);
            return;
        }
    };

    let info = match extractor.probe(&url).await {
        Ok(info) => info,
        Err(e) => {
            eprintln!("Failed to fetch media info: {}", e);
            return;
        }
    };

    println!("Title: {}", info.title);

    let catalog = build_catalog(&info.formats);
    for kind in ContentKind::ALL {
        println!("{}:", kind);
        let subtree = catalog.for_kind(kind);
        if subtree.is_empty() {
            println!("  (none)");
        }
        for (format, qualities) in subtree {
            println!("  {}: {}", format, qualities.join(", "));
        }
    }
}
