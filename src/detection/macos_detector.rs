// src/detection/macos_detector.rs
#![cfg(target_os = "macos")]

use super::script::run_with_timeout;
use super::FocusProbe;
use crate::errors::ProbeError;
use crate::types::{FocusSample, ProbeOutcome};
use core_foundation::base::{CFType, TCFType};
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef};
use core_foundation::string::CFString;
use core_graphics::window::{self, kCGNullWindowID};
use log::debug;
use objc2_app_kit::NSWorkspace;
use std::process::Command;
use std::time::Duration;

/// Browsers whose front tab URL can be read over AppleScript:
/// (application name, label prefix, script).
const KNOWN_BROWSERS: &[(&str, &str, &str)] = &[
    (
        "Google Chrome",
        "Chrome",
        r#"tell application "Google Chrome" to return URL of active tab of front window"#,
    ),
    (
        "Brave Browser",
        "Brave",
        r#"tell application "Brave Browser" to return URL of active tab of front window"#,
    ),
    (
        "Microsoft Edge",
        "Edge",
        r#"tell application "Microsoft Edge" to return URL of active tab of front window"#,
    ),
    (
        "Arc",
        "Arc",
        r#"tell application "Arc" to return URL of active tab of front window"#,
    ),
    (
        "Safari",
        "Safari",
        r#"tell application "Safari" to return URL of current tab of front window"#,
    ),
];

pub struct MacosDetector {
    browser_timeout: Duration,
}

impl MacosDetector {
    pub fn new(browser_timeout: Duration) -> Self {
        Self { browser_timeout }
    }

    fn frontmost_app_name(&self) -> Result<String, ProbeError> {
        unsafe {
            let workspace = NSWorkspace::sharedWorkspace();
            let app = workspace
                .frontmostApplication()
                .ok_or_else(|| ProbeError::Unavailable("no frontmost application".to_string()))?;
            let name = app.localizedName().ok_or_else(|| {
                ProbeError::Unavailable("frontmost application has no name".to_string())
            })?;
            Ok(name.to_string())
        }
    }

    /// Active tab URL for a known browser. Needs Automation permission; any
    /// failure (including the timeout) falls back to the window title.
    fn browser_label(&self, app_name: &str) -> Option<String> {
        let (_, prefix, script) = KNOWN_BROWSERS.iter().find(|(name, _, _)| *name == app_name)?;

        let mut cmd = Command::new("osascript");
        cmd.arg("-e").arg(script);
        match run_with_timeout(cmd, self.browser_timeout) {
            Ok(url) => Some(format!("{prefix} - {url}")),
            Err(e) => {
                debug!("[MacosDetector] Browser tab lookup for '{}' failed: {}", app_name, e);
                None
            }
        }
    }

    /// First on-screen window owned by `app_name` that has a title.
    fn window_title(&self, app_name: &str) -> Option<String> {
        let options =
            window::kCGWindowListOptionOnScreenOnly | window::kCGWindowListExcludeDesktopElements;
        let windows = window::copy_window_info(options, kCGNullWindowID)?;

        let key_owner = unsafe { CFString::wrap_under_get_rule(window::kCGWindowOwnerName) };
        let key_name = unsafe { CFString::wrap_under_get_rule(window::kCGWindowName) };

        windows.iter().find_map(|item| {
            let dict_ref = *item as CFDictionaryRef;
            if dict_ref.is_null() {
                return None;
            }
            let dict: CFDictionary<CFString, CFType> =
                unsafe { CFDictionary::wrap_under_get_rule(dict_ref) };

            let owner = dict_string(&dict, &key_owner)?;
            if owner != app_name {
                return None;
            }
            dict_string(&dict, &key_name).filter(|name| !name.is_empty())
        })
    }
}

fn dict_string(dict: &CFDictionary<CFString, CFType>, key: &CFString) -> Option<String> {
    dict.find(key)
        .and_then(|value| value.downcast::<CFString>())
        .map(|value| value.to_string())
}

impl FocusProbe for MacosDetector {
    fn probe(&self) -> ProbeOutcome {
        let app_name = match self.frontmost_app_name() {
            Ok(name) => name,
            Err(e) => {
                debug!("[MacosDetector] {}", e);
                return ProbeOutcome::Unavailable(e);
            }
        };

        if let Some(label) = self.browser_label(&app_name) {
            return ProbeOutcome::Known(FocusSample::new(app_name, label));
        }

        let label = match self.window_title(&app_name) {
            Some(title) => format!("{app_name} - {title}"),
            None => app_name.clone(),
        };
        ProbeOutcome::Known(FocusSample::new(app_name, label))
    }
}
