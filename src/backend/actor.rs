//! Backend actor owning the extractor and the single active download job
//!
//! The GUI talks to the actor exclusively over channels: commands in,
//! events out. Progress lines of a job pass through one sender, so they
//! reach the GUI in the order the engine emitted them.

use super::messages::{BackendCommand, BackendEvent, FetchedInfo};
use crate::catalog::build_catalog;
use crate::downloader::{progress, run_download, DownloadRequest};
use crate::extractor::MediaExtractor;
use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub struct BackendActor {
    receiver: mpsc::Receiver<BackendCommand>,
    sender: mpsc::Sender<BackendEvent>,

    extractor: MediaExtractor,
    // Held only to answer "is a job in flight"; never awaited or aborted
    active_job: Option<JoinHandle<()>>,
}

impl BackendActor {
    pub fn new(
        receiver: mpsc::Receiver<BackendCommand>,
        sender: mpsc::Sender<BackendEvent>,
    ) -> Result<Self> {
        let extractor = MediaExtractor::new()?;

        Ok(Self {
            receiver,
            sender,
            extractor,
            active_job: None,
        })
    }

    pub async fn run(mut self) {
        info!("BackendActor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                BackendCommand::FetchInfo { url } => {
                    self.handle_fetch_info(url).await;
                }
                BackendCommand::StartDownload { request } => {
                    self.handle_start_download(request).await;
                }
                BackendCommand::Shutdown => {
                    info!("BackendActor shutting down");
                    break;
                }
            }
        }
    }

    async fn handle_fetch_info(&self, url: String) {
        let _ = self.sender.send(BackendEvent::FetchStarted).await;

        match self.extractor.probe(&url).await {
            Ok(info) => {
                let catalog = build_catalog(&info.formats);
                let _ = self
                    .sender
                    .send(BackendEvent::FetchCompleted(Ok(FetchedInfo {
                        title: info.title,
                        catalog,
                    })))
                    .await;
            }
            Err(e) => {
                warn!("Metadata fetch failed: {}", e);
                let _ = self
                    .sender
                    .send(BackendEvent::FetchCompleted(Err(e.to_string())))
                    .await;
            }
        }
    }

    async fn handle_start_download(&mut self, request: DownloadRequest) {
        if self
            .active_job
            .as_ref()
            .map_or(false, |job| !job.is_finished())
        {
            warn!("Download rejected: a job is already in flight");
            let _ = self.sender.send(BackendEvent::DownloadRejected).await;
            return;
        }

        if let Err(e) = request.validate() {
            let _ = self
                .sender
                .send(BackendEvent::ValidationFailed(e.to_string()))
                .await;
            return;
        }

        let _ = self.sender.send(BackendEvent::DownloadStarted).await;

        let ytdlp = self.extractor.engine_path().to_path_buf();
        let sender = self.sender.clone();

        let job = tokio::spawn(async move {
            let (progress_tx, mut progress_rx) = mpsc::channel(64);

            let relay_sender = sender.clone();
            let relay = tokio::spawn(async move {
                while let Some(event) = progress_rx.recv().await {
                    let _ = relay_sender
                        .send(BackendEvent::DownloadProgress(progress::render(&event)))
                        .await;
                }
            });

            let result = run_download(&ytdlp, &request, progress_tx).await;
            // All progress lines precede the completion event
            let _ = relay.await;

            match result {
                Ok(()) => {
                    let _ = sender.send(BackendEvent::DownloadCompleted).await;
                }
                Err(e) => {
                    error!("Download failed: {}", e);
                    let _ = sender.send(BackendEvent::DownloadFailed(e.to_string())).await;
                }
            }
        });

        self.active_job = Some(job);
    }
}
