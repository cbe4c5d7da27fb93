// src/detection/mod.rs
use crate::config::AppConfig;
use crate::errors::ProbeError;
use crate::types::ProbeOutcome;

mod script;

#[cfg(target_os = "windows")]
mod windows_detector;
#[cfg(target_os = "macos")]
mod macos_detector;
#[cfg(all(unix, not(target_os = "macos")))]
mod x11_detector;

/// Reports the currently focused application and window.
///
/// Implementations must stay within a short bounded time and must not fail
/// past this call: anything that goes wrong becomes
/// `ProbeOutcome::Unavailable`.
pub trait FocusProbe: Send + Sync {
    fn probe(&self) -> ProbeOutcome;
}

/// Picks the probe for the platform this binary was built for.
pub fn create_probe(config: &AppConfig) -> Box<dyn FocusProbe> {
    cfg_if::cfg_if! {
        if #[cfg(target_os = "windows")] {
            let _ = config;
            Box::new(windows_detector::WindowsDetector::new())
        } else if #[cfg(target_os = "macos")] {
            Box::new(macos_detector::MacosDetector::new(config.probe_timeout))
        } else if #[cfg(unix)] {
            let _ = config;
            Box::new(x11_detector::X11Detector::new())
        } else {
            let _ = config;
            Box::new(UnsupportedProbe)
        }
    }
}

/// Used where no focus API exists; every tick is a no-op wait.
#[allow(dead_code, reason = "only constructed on platforms without a backend")]
pub struct UnsupportedProbe;

impl FocusProbe for UnsupportedProbe {
    fn probe(&self) -> ProbeOutcome {
        ProbeOutcome::Unavailable(ProbeError::Unavailable(
            "focus detection is not supported on this platform".to_string(),
        ))
    }
}
