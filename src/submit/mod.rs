//! Submission: request building, backend transport, the controller that turns
//! stream events into display changes, and artifact downloads.

pub mod backend;
pub mod controller;
pub mod download;
pub mod request;

pub use backend::{Backend, HttpBackend, user_agent};
pub use controller::{CollectingPresenter, DownloadLink, Presenter, SubmissionController, Tone};
pub use download::{artifact_file_name, save_artifact};
pub use request::{ProcessOptions, SubmitRequest, Upload};
