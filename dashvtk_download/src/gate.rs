use log::debug;

use crate::error::DownloadError;
use crate::payload::{Download, DownloadPayload};

/// Decides whether a button click should produce a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickGate {
    /// Skip the call made when the page first loads (no clicks yet).
    pub prevent_initial_call: bool,
}

impl Default for ClickGate {
    fn default() -> Self {
        Self {
            prevent_initial_call: true,
        }
    }
}

impl ClickGate {
    pub fn should_fire(&self, n_clicks: Option<u64>) -> bool {
        !(self.prevent_initial_call && n_clicks.unwrap_or(0) == 0)
    }

    /// Runs `callback` with the click count when the gate is open.
    /// `Ok(None)` means no update for the download component.
    pub fn on_click<F>(&self, n_clicks: Option<u64>, callback: F) -> Result<Option<DownloadPayload>, DownloadError>
    where
        F: FnOnce(u64) -> Result<Download, DownloadError>,
    {
        if !self.should_fire(n_clicks) {
            debug!("download skipped: no clicks yet");
            return Ok(None);
        }
        let download = callback(n_clicks.unwrap_or(0))?;
        download.into_payload().map(Some)
    }
}
