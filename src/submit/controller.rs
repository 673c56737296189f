//! Submission controller.
//!
//! Owns the log buffer and the download links of the active submission and
//! translates each [`StreamEvent`] into display changes on a [`Presenter`].

use crate::defaults::{NO_FILE_MESSAGE, STARTING_MESSAGE};
use crate::error::Result;
use crate::mapping::VoiceMapping;
use crate::protocol::StreamEvent;
use crate::stream::{Outcome, ResponseMode, consume};
use crate::submit::backend::Backend;
use crate::submit::request::{ProcessOptions, SubmitRequest, Upload};
use reqwest::Url;

/// How a replaced log should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Progress notice, e.g. "Starting processing...".
    Status,
    /// Terminal failure.
    Failure,
    /// Final logs of a successful run.
    Final,
}

/// One rendered download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub label: String,
    /// Location as sent by the backend.
    pub href: String,
    /// `href` resolved against the server, when a server URL is known.
    pub url: Option<Url>,
}

impl DownloadLink {
    /// Link number `index` (0-based) of a result.
    pub fn new(index: usize, href: &str, base: Option<&Url>) -> Self {
        let url = match base {
            Some(base) => base.join(href).ok(),
            None => Url::parse(href).ok(),
        };
        Self {
            label: format!("Download audio {}", index + 1),
            href: href.to_string(),
            url,
        }
    }
}

/// Display surface for the log area and the download links.
pub trait Presenter {
    /// `line` was appended; `log` is the whole buffer after the append.
    fn log_appended(&mut self, line: &str, log: &str);

    /// The log area now reads exactly `log`.
    fn log_replaced(&mut self, log: &str, tone: Tone);

    /// The download area now holds exactly `links`.
    fn downloads_replaced(&mut self, links: &[DownloadLink]);
}

/// In-memory presenter that keeps the current display state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollectingPresenter {
    pub log: String,
    pub tone: Option<Tone>,
    pub links: Vec<DownloadLink>,
    /// Every log state shown, in order.
    pub history: Vec<String>,
}

impl CollectingPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for CollectingPresenter {
    fn log_appended(&mut self, _line: &str, log: &str) {
        self.log = log.to_string();
        self.tone = None;
        self.history.push(self.log.clone());
    }

    fn log_replaced(&mut self, log: &str, tone: Tone) {
        self.log = log.to_string();
        self.tone = Some(tone);
        self.history.push(self.log.clone());
    }

    fn downloads_replaced(&mut self, links: &[DownloadLink]) {
        self.links = links.to_vec();
    }
}

/// Runs submissions one at a time against a [`Backend`].
pub struct SubmissionController<B, P> {
    backend: B,
    presenter: P,
    mode: ResponseMode,
    base_url: Option<Url>,
    log: Vec<String>,
    downloads: Vec<DownloadLink>,
}

impl<B: Backend, P: Presenter> SubmissionController<B, P> {
    pub fn new(backend: B, presenter: P) -> Self {
        Self {
            backend,
            presenter,
            mode: ResponseMode::Auto,
            base_url: None,
            log: Vec::new(),
            downloads: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: ResponseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Server URL that relative download links are resolved against.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Log messages received so far in the current submission.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn downloads(&self) -> &[DownloadLink] {
        &self.downloads
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Submit `upload` with the mapping read from `mapping` at submission time.
    ///
    /// Without an upload nothing is sent. Transport and request failures are
    /// displayed as `Error: <description>` and end the submission.
    pub async fn submit<M>(
        &mut self,
        upload: Option<Upload>,
        options: &ProcessOptions,
        mapping: M,
    ) -> Outcome
    where
        M: FnOnce() -> VoiceMapping,
    {
        self.log.clear();
        self.presenter.log_replaced(STARTING_MESSAGE, Tone::Status);
        self.replace_downloads(Vec::new());

        let Some(upload) = upload else {
            self.presenter.log_replaced(NO_FILE_MESSAGE, Tone::Failure);
            return Outcome::Failed;
        };

        let request = SubmitRequest::new(upload, mapping(), options.clone());
        log::debug!(
            "Submitting {} ({} bytes, {} speakers)",
            request.upload.file_name,
            request.upload.bytes.len(),
            request.mapping.len()
        );

        match self.exchange(request).await {
            Ok(outcome) => {
                if outcome == Outcome::Incomplete {
                    log::warn!("Response ended without a result");
                }
                outcome
            }
            Err(e) => {
                self.presenter
                    .log_replaced(&format!("Error: {e}"), Tone::Failure);
                self.replace_downloads(Vec::new());
                Outcome::Failed
            }
        }
    }

    async fn exchange(&mut self, request: SubmitRequest) -> Result<Outcome> {
        let reply = self.backend.send(request).await?;
        let mode = self.mode;
        consume(reply, mode, |event| self.handle_event(event)).await
    }

    fn handle_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Log { message } => {
                self.log.push(message);
                let joined = self.log.join("\n");
                if let Some(line) = self.log.last() {
                    self.presenter.log_appended(line, &joined);
                }
            }
            StreamEvent::Error { message } => {
                self.presenter.log_replaced(&message, Tone::Failure);
                self.replace_downloads(Vec::new());
            }
            StreamEvent::Result { logs, downloads } => {
                self.presenter.log_replaced(&logs.join("\n"), Tone::Final);
                let links = downloads
                    .iter()
                    .enumerate()
                    .map(|(i, href)| DownloadLink::new(i, href, self.base_url.as_ref()))
                    .collect();
                self.replace_downloads(links);
            }
        }
    }

    fn replace_downloads(&mut self, links: Vec<DownloadLink>) {
        self.downloads = links;
        self.presenter.downloads_replaced(&self.downloads);
    }
}
