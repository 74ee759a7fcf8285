//! Main GUI application
//!
//! All catalog, selection, and log state is mutated here, on the update
//! loop, in direct response to user messages or backend events arriving
//! through the subscription channel. Worker code never touches this state.

use crate::backend::{BackendActor, BackendCommand, BackendEvent};
use crate::catalog::{ContentKind, SelectionState};
use crate::downloader::DownloadRequest;
use crate::gui::view;
use crate::utils::AppSettings;
use chrono::Local;
use iced::widget::scrollable;
use iced::{executor, subscription, Application, Command, Element, Subscription, Theme};
use std::convert::Infallible;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Main application state
pub struct TubeloadApp {
    // Command channel into the backend actor, present once the
    // subscription has started it
    pub(crate) backend: Option<mpsc::Sender<BackendCommand>>,

    // Form state
    pub(crate) selection: SelectionState,
    pub(crate) url_input: String,
    pub(crate) output_dir: String,

    // Log view
    pub(crate) log_lines: Vec<String>,
    pub(crate) status_message: String,

    // Flags
    pub(crate) is_fetching: bool,
    pub(crate) is_downloading: bool,
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Input events
    UrlInputChanged(String),
    FetchPressed,
    PasteFromClipboard,
    ClearUrlInput,

    // Cascading selectors
    ContentKindSelected(ContentKind),
    ContainerFormatSelected(String),
    QualitySelected(String),

    // Output folder
    OutputDirChanged(String),
    BrowseOutputDir,
    OutputDirPicked(Option<PathBuf>),

    // Download trigger
    DownloadPressed,

    // Backend subscription
    Backend(BackendRelay),
}

/// What the backend subscription surfaces to the update loop
#[derive(Debug, Clone)]
pub enum BackendRelay {
    Ready(mpsc::Sender<BackendCommand>),
    Event(BackendEvent),
    Failed(String),
}

impl Application for TubeloadApp {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: Self::Flags) -> (Self, Command<Message>) {
        let settings = AppSettings::default();

        let app = Self {
            backend: None,
            selection: SelectionState::new(),
            url_input: String::new(),
            output_dir: settings.download_location.to_string_lossy().to_string(),
            log_lines: Vec::new(),
            status_message: "Starting backend...".to_string(),
            is_fetching: false,
            is_downloading: false,
        };

        (app, Command::none())
    }

    fn title(&self) -> String {
        String::from("Tubeload - Video & Audio Downloader")
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::UrlInputChanged(url) => {
                self.url_input = url;
                Command::none()
            }

            Message::FetchPressed => {
                let url = self.url_input.trim().to_string();
                if url.is_empty() {
                    // Valid terminal sub-state: both dependent selectors go
                    // empty, nothing is reported
                    self.selection.clear();
                    return Command::none();
                }

                self.send(BackendCommand::FetchInfo { url });
                Command::none()
            }

            Message::PasteFromClipboard => {
                match paste_from_clipboard() {
                    Ok(content) => {
                        self.url_input = content.trim().to_string();
                        self.status_message = "URL pasted from clipboard".to_string();
                    }
                    Err(e) => {
                        self.status_message = e;
                    }
                }
                Command::none()
            }

            Message::ClearUrlInput => {
                self.url_input.clear();
                Command::none()
            }

            Message::ContentKindSelected(kind) => {
                self.selection.set_content_kind(kind);
                Command::none()
            }

            Message::ContainerFormatSelected(format) => {
                self.selection.set_container_format(format);
                Command::none()
            }

            Message::QualitySelected(label) => {
                self.selection.set_quality_label(label);
                Command::none()
            }

            Message::OutputDirChanged(dir) => {
                self.output_dir = dir;
                Command::none()
            }

            Message::BrowseOutputDir => Command::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .pick_folder()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::OutputDirPicked,
            ),

            Message::OutputDirPicked(Some(path)) => {
                self.output_dir = path.display().to_string();
                Command::none()
            }

            Message::OutputDirPicked(None) => Command::none(),

            Message::DownloadPressed => {
                let request = DownloadRequest {
                    url: self.url_input.trim().to_string(),
                    kind: self.selection.content_kind(),
                    container_format: self
                        .selection
                        .container_format()
                        .unwrap_or_default()
                        .to_string(),
                    quality_label: self
                        .selection
                        .quality_label()
                        .unwrap_or_default()
                        .to_string(),
                    output_dir: PathBuf::from(self.output_dir.trim()),
                };

                self.send(BackendCommand::StartDownload { request });
                Command::none()
            }

            Message::Backend(BackendRelay::Ready(sender)) => {
                self.backend = Some(sender);
                self.status_message = "Ready".to_string();
                Command::none()
            }

            Message::Backend(BackendRelay::Failed(reason)) => {
                self.status_message = reason.clone();
                self.push_log(&reason)
            }

            Message::Backend(BackendRelay::Event(event)) => self.handle_backend_event(event),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::root(self)
    }

    fn subscription(&self) -> Subscription<Message> {
        backend_worker().map(Message::Backend)
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }
}

impl TubeloadApp {
    fn handle_backend_event(&mut self, event: BackendEvent) -> Command<Message> {
        match event {
            BackendEvent::FetchStarted => {
                self.is_fetching = true;
                self.push_log("Fetching media information...")
            }

            BackendEvent::FetchCompleted(Ok(info)) => {
                self.is_fetching = false;
                self.selection.replace_catalog(info.catalog);
                self.status_message = info.title;
                self.push_log("Media information fetched.")
            }

            BackendEvent::FetchCompleted(Err(reason)) => {
                self.is_fetching = false;
                self.selection.clear();
                self.status_message = "Ready".to_string();
                self.push_log(&format!("Error fetching media information: {}", reason))
            }

            BackendEvent::DownloadStarted => {
                self.is_downloading = true;
                let quality = self.selection.quality_label().unwrap_or("best").to_string();
                let line = format!("Starting download for {} at {}...", self.url_input, quality);
                self.push_log(&line)
            }

            BackendEvent::DownloadProgress(line) => self.push_log(&line),

            BackendEvent::DownloadCompleted => {
                self.is_downloading = false;
                self.status_message = "Download complete".to_string();
                self.push_log("Download complete!")
            }

            BackendEvent::DownloadFailed(reason) => {
                self.is_downloading = false;
                self.status_message = "Download failed".to_string();
                self.push_log(&format!("Download failed: {}", reason))
            }

            BackendEvent::ValidationFailed(reason) => {
                self.status_message = reason.clone();
                self.push_log(&reason)
            }

            BackendEvent::DownloadRejected => {
                self.push_log("A download is already running; wait for it to finish.")
            }
        }
    }

    /// Hand a command to the actor without blocking the update loop
    fn send(&mut self, command: BackendCommand) {
        if let Some(backend) = &self.backend {
            if backend.try_send(command).is_err() {
                self.status_message = "Backend is not responding".to_string();
            }
        }
    }

    /// Append one timestamped line and keep the log pinned to its tail
    fn push_log(&mut self, line: &str) -> Command<Message> {
        self.log_lines
            .push(format!("[{}] {}", Local::now().format("%H:%M:%S"), line));
        scrollable::snap_to(view::log_scroll_id(), scrollable::RelativeOffset::END)
    }
}

/// Long-lived subscription hosting the backend actor
///
/// The first relay message hands the command sender to the app; everything
/// after forwards actor events in the order they were emitted.
fn backend_worker() -> Subscription<BackendRelay> {
    struct Worker;

    subscription::channel(
        std::any::TypeId::of::<Worker>(),
        100,
        |mut output| async move {
            use futures::SinkExt;

            let (cmd_tx, cmd_rx) = mpsc::channel(32);
            let (evt_tx, mut evt_rx) = mpsc::channel(100);

            match BackendActor::new(cmd_rx, evt_tx) {
                Ok(actor) => {
                    tokio::spawn(actor.run());
                    let _ = output.send(BackendRelay::Ready(cmd_tx)).await;

                    while let Some(event) = evt_rx.recv().await {
                        let _ = output.send(BackendRelay::Event(event)).await;
                    }
                }
                Err(e) => {
                    let _ = output.send(BackendRelay::Failed(e.to_string())).await;
                }
            }

            // The actor is gone; park the subscription instead of restarting
            futures::future::pending::<Infallible>().await
        },
    )
}

/// Read the clipboard for the paste button
fn paste_from_clipboard() -> Result<String, String> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;

    clipboard
        .get_text()
        .map_err(|e| format!("Failed to read clipboard: {}", e))
}
