//! Moderation gate responses
//!
//! The media endpoint answers either with a short `{"error": ...}` body or,
//! for deployments that expose the detector directly, with a raw detection
//! report. Both shapes are turned into an [`UploadVerdict`] here.

use crate::types::UploadVerdict;
use serde::Deserialize;

/// Reason given when hidden data is found in an image
pub const STEGANOGRAPHY_REASON: &str = "Image contains hidden steganography data.";

/// Reason given when an image is classified as AI-generated
pub const AI_GENERATED_REASON: &str = "AI-generated images are not allowed.";

/// Reason used when the gate rejects without explaining why
pub const UNSPECIFIED_REASON: &str = "Image was rejected by moderation.";

/// Steganography section of a detection report
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SteganographyCheck {
    /// Whether an embedded signature was found
    #[serde(default)]
    pub signature_detected: bool,
}

/// AI-detection section of a detection report
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiDetectionCheck {
    /// Whether the image was classified as generated
    #[serde(default)]
    pub is_ai_generated: bool,
}

/// Raw report from the detection service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionReport {
    /// Steganography check, if it ran
    #[serde(default)]
    pub steganography: Option<SteganographyCheck>,
    /// AI-generation check, if it ran
    #[serde(default)]
    pub ai_detection: Option<AiDetectionCheck>,
}

impl DetectionReport {
    /// Whether the body looked like a detection report at all
    pub const fn is_report(&self) -> bool {
        self.steganography.is_some() || self.ai_detection.is_some()
    }

    /// Turn the report into a verdict
    ///
    /// Hidden data takes priority over AI generation.
    pub fn verdict(&self) -> UploadVerdict {
        if self
            .steganography
            .as_ref()
            .is_some_and(|s| s.signature_detected)
        {
            return UploadVerdict::rejected(STEGANOGRAPHY_REASON);
        }
        if self.ai_detection.as_ref().is_some_and(|a| a.is_ai_generated) {
            return UploadVerdict::rejected(AI_GENERATED_REASON);
        }
        UploadVerdict::accepted()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Interpret the body of a successful upload response
///
/// Anything that is not a detection report counts as accepted.
pub fn verdict_from_success_body(body: &str) -> UploadVerdict {
    match serde_json::from_str::<DetectionReport>(body) {
        Ok(report) if report.is_report() => report.verdict(),
        _ => UploadVerdict::accepted(),
    }
}

/// Extract the rejection reason from a `400 Bad Request` body
///
/// Returns `None` when the body carries no `error` field, in which case the
/// response is treated as a transport failure rather than a verdict.
pub fn rejection_reason(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error.trim().to_string())
}

/// Normalise a rejection reason so it is never blank
pub fn reason_or_default(reason: Option<&str>) -> String {
    match reason.map(str::trim) {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => UNSPECIFIED_REASON.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steganography_beats_ai_detection() {
        let body = r#"{"steganography":{"signature_detected":true},"ai_detection":{"is_ai_generated":true}}"#;
        assert_eq!(
            verdict_from_success_body(body),
            UploadVerdict::rejected(STEGANOGRAPHY_REASON)
        );
    }

    #[test]
    fn test_ai_generated_rejected() {
        let body = r#"{"steganography":{"signature_detected":false},"ai_detection":{"is_ai_generated":true}}"#;
        assert_eq!(
            verdict_from_success_body(body),
            UploadVerdict::rejected(AI_GENERATED_REASON)
        );
    }

    #[test]
    fn test_clean_report_accepted() {
        let body = r#"{"steganography":{},"ai_detection":{"is_ai_generated":false}}"#;
        assert!(verdict_from_success_body(body).accepted);
    }

    #[test]
    fn test_image_response_accepted() {
        let body = r#"{"name":"cat.png","type":"image/png"}"#;
        assert!(verdict_from_success_body(body).accepted);
        assert!(verdict_from_success_body("").accepted);
    }

    #[test]
    fn test_rejection_reason() {
        assert_eq!(
            rejection_reason(r#"{"error":"Detected AI-generated content"}"#).as_deref(),
            Some("Detected AI-generated content")
        );
        assert_eq!(rejection_reason("Bad Request"), None);
    }

    #[test]
    fn test_reason_or_default() {
        assert_eq!(reason_or_default(Some("  ")), UNSPECIFIED_REASON);
        assert_eq!(reason_or_default(None), UNSPECIFIED_REASON);
        assert_eq!(reason_or_default(Some("nope")), "nope");
    }
}
