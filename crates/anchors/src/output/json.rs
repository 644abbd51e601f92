//! JSON serialization for anchors.

use anchors_core::AnchorCandidate;

/// Serialize an anchor to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails. Non-finite floats serialize as
/// `null` rather than failing, so this should not happen.
pub fn to_json(anchor: &AnchorCandidate) -> Result<String, serde_json::Error> {
    serde_json::to_string(anchor)
}

/// Serialize an anchor to a pretty-printed JSON string.
///
/// # Errors
///
/// Same as [`to_json`].
pub fn to_json_pretty(anchor: &AnchorCandidate) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(anchor)
}
