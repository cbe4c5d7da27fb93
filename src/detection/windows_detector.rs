// src/detection/windows_detector.rs
#![cfg(target_os = "windows")]

use super::FocusProbe;
use crate::types::{FocusSample, ProbeOutcome};
use crate::windows_api;
use log::debug;

pub struct WindowsDetector;

impl WindowsDetector {
    pub fn new() -> Self {
        Self
    }
}

impl FocusProbe for WindowsDetector {
    fn probe(&self) -> ProbeOutcome {
        let result = windows_api::get_foreground_window_info()
            .map(|(app_name, title)| FocusSample::new(app_name, title));
        if let Err(e) = &result {
            debug!("[WindowsDetector] {}", e);
        }
        result.into()
    }
}
