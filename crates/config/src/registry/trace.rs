//! Construction traces recorded when a cache entry is installed.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::panic::Location;

/// Capture the caller location followed by the current call stack.
///
/// Each element describes one frame; source locations reported by the
/// backtrace are folded into the frame they belong to. Only the first element
/// is reliable in stripped builds, where backtrace frames render as `<unknown>`.
pub(crate) fn capture(caller: &Location<'_>) -> Vec<String> {
    let mut frames = vec![format!(
        "{}:{}:{}",
        caller.file(),
        caller.line(),
        caller.column()
    )];

    let backtrace = Backtrace::force_capture();
    if backtrace.status() == BacktraceStatus::Captured {
        frames.extend(fold_frames(&backtrace.to_string()));
    }

    frames
}

/// Turns the multi-line backtrace rendering into one string per frame.
fn fold_frames(rendered: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();
    for line in rendered.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match (line.strip_prefix("at "), frames.last_mut()) {
            (Some(location), Some(frame)) => {
                frame.push_str(" (");
                frame.push_str(location);
                frame.push(')');
            }
            _ => frames.push(line.to_string()),
        }
    }
    frames
}
