// src/detection/x11_detector.rs
#![cfg(all(unix, not(target_os = "macos")))]

use super::FocusProbe;
use crate::errors::ProbeError;
use crate::types::{FocusSample, ProbeOutcome};
use log::debug;
use std::fmt::Display;
use std::sync::{Mutex, PoisonError};
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

// Focus can sit on a child widget; the class lives on a top-level ancestor.
const MAX_TREE_DEPTH: usize = 8;
const POINTER_ROOT: Window = 1;
const UNTITLED: &str = "Untitled";

struct X11Session {
    conn: RustConnection,
    net_wm_name: Atom,
}

/// Reads the input-focus window over the X11 protocol. The connection is
/// opened lazily and dropped after any protocol error, then retried on the
/// next probe.
pub struct X11Detector {
    session: Mutex<Option<X11Session>>,
}

fn unavailable<E: Display>(context: &'static str) -> impl FnOnce(E) -> ProbeError {
    move |e| ProbeError::Unavailable(format!("{context}: {e}"))
}

impl X11Detector {
    pub fn new() -> Self {
        Self {
            session: Mutex::new(None),
        }
    }

    fn connect() -> Result<X11Session, ProbeError> {
        let (conn, _screen) =
            x11rb::connect(None).map_err(unavailable("cannot connect to X server"))?;
        let net_wm_name = conn
            .intern_atom(false, b"_NET_WM_NAME")
            .map_err(unavailable("intern_atom"))?
            .reply()
            .map_err(unavailable("intern_atom"))?
            .atom;
        Ok(X11Session { conn, net_wm_name })
    }

    /// `Err` means the connection is unusable; `Ok(None)` means nothing has focus.
    fn query(session: &X11Session) -> Result<Option<FocusSample>, ProbeError> {
        let conn = &session.conn;
        let focus = conn
            .get_input_focus()
            .map_err(unavailable("get_input_focus"))?
            .reply()
            .map_err(unavailable("get_input_focus"))?
            .focus;
        if focus == x11rb::NONE || focus == POINTER_ROOT {
            return Ok(None);
        }

        let mut window = focus;
        for _ in 0..MAX_TREE_DEPTH {
            let class_bytes = read_property(conn, window, AtomEnum::WM_CLASS.into())?;
            if let Some(class) = class_bytes.as_deref().and_then(parse_wm_class) {
                let name_bytes = match read_property(conn, window, session.net_wm_name)? {
                    Some(bytes) => Some(bytes),
                    None => read_property(conn, window, AtomEnum::WM_NAME.into())?,
                };
                let name = name_bytes.map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
                return Ok(Some(compose_sample(class, name)));
            }

            let tree = conn
                .query_tree(window)
                .map_err(unavailable("query_tree"))?
                .reply()
                .map_err(unavailable("query_tree"))?;
            if tree.parent == x11rb::NONE || window == tree.root {
                break;
            }
            window = tree.parent;
        }
        Ok(None)
    }
}

fn read_property(
    conn: &RustConnection,
    window: Window,
    property: Atom,
) -> Result<Option<Vec<u8>>, ProbeError> {
    let reply = conn
        .get_property(false, window, property, AtomEnum::ANY, 0, 1024)
        .map_err(unavailable("get_property"))?
        .reply()
        .map_err(unavailable("get_property"))?;
    Ok(Some(reply.value).filter(|value| !value.is_empty()))
}

/// `WM_CLASS` is `instance\0class\0`; the class is the application name.
fn parse_wm_class(raw: &[u8]) -> Option<String> {
    let mut parts = raw
        .split(|b| *b == 0)
        .filter(|part| !part.is_empty())
        .map(|part| String::from_utf8_lossy(part).into_owned());
    let instance = parts.next()?;
    Some(parts.next().unwrap_or(instance))
}

fn compose_sample(class: String, name: Option<String>) -> FocusSample {
    let name = name.filter(|n| !n.is_empty()).unwrap_or_else(|| UNTITLED.to_string());
    let label = format!("{class} - {name}");
    FocusSample::new(class, label)
}

impl FocusProbe for X11Detector {
    fn probe(&self) -> ProbeOutcome {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);

        if guard.is_none() {
            match Self::connect() {
                Ok(session) => *guard = Some(session),
                Err(e) => {
                    debug!("[X11Detector] {}", e);
                    return ProbeOutcome::Unavailable(e);
                }
            }
        }

        let result = match guard.as_ref() {
            Some(session) => Self::query(session),
            None => {
                return ProbeOutcome::Unavailable(ProbeError::Unavailable(
                    "no X11 session".to_string(),
                ));
            }
        };

        match result {
            Ok(Some(sample)) => ProbeOutcome::Known(sample),
            Ok(None) => {
                ProbeOutcome::Unavailable(ProbeError::Unavailable("no focused window".to_string()))
            }
            Err(e) => {
                debug!("[X11Detector] {}; dropping connection", e);
                *guard = None;
                ProbeOutcome::Unavailable(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wm_class_prefers_class_over_instance() {
        assert_eq!(parse_wm_class(b"code\0Code\0"), Some("Code".to_string()));
        assert_eq!(parse_wm_class(b"xterm\0"), Some("xterm".to_string()));
        assert_eq!(parse_wm_class(b"\0\0"), None);
    }

    #[test]
    fn label_falls_back_to_untitled() {
        let sample = compose_sample("Code".to_string(), Some("main.rs - crate".to_string()));
        assert_eq!(sample, FocusSample::new("Code", "Code - main.rs - crate"));

        let sample = compose_sample("Code".to_string(), Some(String::new()));
        assert_eq!(sample.window_label, "Code - Untitled");
    }

    #[test]
    #[ignore] // Requires an X11 display
    fn probes_live_display() {
        let detector = X11Detector::new();
        match detector.probe() {
            ProbeOutcome::Known(sample) => {
                assert!(!sample.app_name.is_empty());
                assert!(sample.window_label.starts_with(&sample.app_name));
            }
            ProbeOutcome::Unavailable(ProbeError::Unavailable(reason)) => {
                assert!(!reason.is_empty())
            }
            ProbeOutcome::Unavailable(other) => panic!("unexpected outcome {other:?}"),
        }
    }
}
