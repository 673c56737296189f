//! Terminal rendering for a submission.
//!
//! The log area goes to stderr, download links to stdout so they can be
//! piped.

use crate::submit::{DownloadLink, Presenter, Tone};

const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Presenter that writes to the terminal.
///
/// A terminal cannot redraw the log area in place, so a replaced log is
/// printed only where it differs from what is already on screen.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    quiet: bool,
    shown: Vec<String>,
}

impl TerminalPresenter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            shown: Vec::new(),
        }
    }
}

impl Presenter for TerminalPresenter {
    fn log_appended(&mut self, line: &str, _log: &str) {
        if self.quiet {
            return;
        }
        self.shown.push(line.to_string());
        eprintln!("{}", format_log_line(line));
    }

    fn log_replaced(&mut self, log: &str, tone: Tone) {
        match tone {
            Tone::Status => {
                self.shown.clear();
                if !self.quiet {
                    eprintln!("{DIM}{log}{RESET}");
                }
            }
            Tone::Failure => {
                self.shown.clear();
                eprintln!("{RED}{log}{RESET}");
            }
            Tone::Final => {
                let lines: Vec<&str> = if log.is_empty() {
                    Vec::new()
                } else {
                    log.split('\n').collect()
                };
                for line in unseen_lines(&self.shown, &lines) {
                    eprintln!("{}", format_log_line(line));
                }
                self.shown = lines.iter().map(|l| l.to_string()).collect();
            }
        }
    }

    fn downloads_replaced(&mut self, links: &[DownloadLink]) {
        for link in links {
            println!("{}", format_link(link));
        }
    }
}

/// Lines of `next` still to print when `shown` is already on screen.
///
/// When `next` continues `shown`, only the tail is new. Otherwise the whole
/// of `next` is printed.
pub fn unseen_lines<'a>(shown: &[String], next: &[&'a str]) -> Vec<&'a str> {
    let continues = shown.len() <= next.len() && shown.iter().zip(next).all(|(a, b)| a == b);
    let skip = if continues { shown.len() } else { 0 };
    next[skip..].to_vec()
}

pub fn format_log_line(line: &str) -> String {
    format!("{DIM}[log]{RESET} {line}")
}

pub fn format_link(link: &DownloadLink) -> String {
    let target = link
        .url
        .as_ref()
        .map(|u| u.to_string())
        .unwrap_or_else(|| link.href.clone());
    format!("{GREEN}{}{RESET}: {target}", link.label)
}

/// One line per speaker, with turn counts when known.
pub fn format_speaker(index: usize, speaker: &str, turns: Option<usize>) -> String {
    match turns {
        Some(1) => format!("{:>3}. {speaker} {DIM}(1 turn){RESET}", index + 1),
        Some(n) => format!("{:>3}. {speaker} {DIM}({n} turns){RESET}", index + 1),
        None => format!("{:>3}. {speaker}", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_unseen_lines_prints_tail_of_continuation() {
        let shown = owned(&["a", "b"]);
        assert_eq!(unseen_lines(&shown, &["a", "b", "done"]), vec!["done"]);
    }

    #[test]
    fn test_unseen_lines_identical_prints_nothing() {
        let shown = owned(&["a", "b"]);
        assert!(unseen_lines(&shown, &["a", "b"]).is_empty());
    }

    #[test]
    fn test_unseen_lines_divergent_prints_everything() {
        let shown = owned(&["a", "b"]);
        assert_eq!(unseen_lines(&shown, &["summary"]), vec!["summary"]);
        assert_eq!(unseen_lines(&shown, &["a", "x", "y"]), vec!["a", "x", "y"]);
    }

    #[test]
    fn test_unseen_lines_nothing_shown() {
        assert_eq!(unseen_lines(&[], &["a"]), vec!["a"]);
    }

    #[test]
    fn test_format_log_line() {
        assert_eq!(format_log_line("Parsing"), "\x1b[2m[log]\x1b[0m Parsing");
    }

    #[test]
    fn test_format_link_prefers_resolved_url() {
        let base = Url::parse("http://dub.local:8000/").unwrap();
        let link = DownloadLink::new(0, "/download?path=a.wav", Some(&base));
        assert_eq!(
            format_link(&link),
            "\x1b[32mDownload audio 1\x1b[0m: http://dub.local:8000/download?path=a.wav"
        );

        let link = DownloadLink::new(1, "/download?path=b.wav", None);
        assert!(format_link(&link).ends_with(": /download?path=b.wav"));
    }

    #[test]
    fn test_format_speaker() {
        assert_eq!(format_speaker(0, "Alice", None), "  1. Alice");
        assert!(format_speaker(1, "Bob", Some(1)).contains("(1 turn)"));
        assert!(format_speaker(1, "Bob", Some(4)).contains("(4 turns)"));
    }

    #[test]
    fn test_terminal_presenter_tracks_shown_lines() {
        let mut presenter = TerminalPresenter::new(false);
        presenter.log_replaced("Starting processing...", Tone::Status);
        presenter.log_appended("a", "a");
        presenter.log_appended("b", "a\nb");
        assert_eq!(presenter.shown, owned(&["a", "b"]));

        presenter.log_replaced("a\nb\ndone", Tone::Final);
        assert_eq!(presenter.shown, owned(&["a", "b", "done"]));

        presenter.log_replaced("boom", Tone::Failure);
        assert!(presenter.shown.is_empty());
    }

    #[test]
    fn test_quiet_presenter_skips_incremental_lines() {
        let mut presenter = TerminalPresenter::new(true);
        presenter.log_appended("a", "a");
        assert!(presenter.shown.is_empty());

        presenter.log_replaced("a\ndone", Tone::Final);
        assert_eq!(presenter.shown, owned(&["a", "done"]));
    }
}
