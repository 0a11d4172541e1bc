//! Turns camera-frame detections into the observer's vision signal.
//!
//! Object detection itself happens outside this crate; callers pass the class
//! labels found in a frame and store the resulting text with
//! `SessionState::set_vision_context`.

use std::collections::HashSet;

pub const CAMERA_UNAVAILABLE: &str = "Camera feed unavailable.";
pub const ALL_CLEAR: &str = "Candidate is present. No suspicious objects detected.";

const PHONE_ALERT: &str = "ALERT: Candidate is holding a phone!";
const ABSENT_ALERT: &str = "ALERT: Candidate is NOT visible.";
const MATERIALS_NOTE: &str = "Note: Books/Laptop visible nearby.";

/// Summarizes the labels detected in one frame. `None` means no frame.
pub fn describe_detections<S: AsRef<str>>(labels: Option<&[S]>) -> String {
    let Some(labels) = labels else {
        return CAMERA_UNAVAILABLE.to_string();
    };
    let seen: HashSet<&str> = labels.iter().map(|label| label.as_ref().trim()).collect();

    let mut notes = Vec::new();
    if seen.contains("cell phone") {
        notes.push(PHONE_ALERT);
    }
    if !seen.contains("person") {
        notes.push(ABSENT_ALERT);
    }
    if seen.contains("book") || seen.contains("laptop") {
        notes.push(MATERIALS_NOTE);
    }

    if notes.is_empty() {
        ALL_CLEAR.to_string()
    } else {
        notes.join(" | ")
    }
}

/// True when the signal carries an alert worth surfacing to a proctor.
pub fn is_alert(vision_context: &str) -> bool {
    vision_context.contains("ALERT")
}
