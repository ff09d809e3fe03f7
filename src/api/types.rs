//! Wire types for the pet-behavior backend.
//!
//! Every response carries a `success` flag; failures ride in `error` rather
//! than (only) HTTP status codes, so the client checks both. Upload replies
//! additionally echo the server-assigned filename and size, which the client
//! needs for later playback.

use serde::{Deserialize, Serialize};

/// JSON body for `POST /chat`.
#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// JSON body of a `POST /chat` response.
#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// JSON body of a `POST /upload` response.
#[derive(Deserialize, Debug)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A video the server has stored and can serve back for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct ServedVideo {
    pub filename: String,
    pub size_bytes: u64,
}

/// A successful reply from either send endpoint, normalized for the
/// conversation log. `video` is populated only for uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub text: String,
    pub video: Option<ServedVideo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Contract test: the chat request serializes to exactly what the
    /// backend's `/chat` handler reads.
    #[test]
    fn chat_request_serialization() {
        let req = ChatRequest { message: "hello" };
        let serialized = serde_json::to_string(&req).unwrap();
        assert_eq!(serialized, r#"{"message":"hello"}"#);
    }

    #[test]
    fn chat_response_success_parses() {
        let json = r#"{"success":true,"response":"Your dog looks happy."}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.response.as_deref(), Some("Your dog looks happy."));
        assert!(parsed.error.is_none());
    }

    #[test]
    fn chat_response_failure_parses_without_response_field() {
        let json = r#"{"success":false,"error":"model unavailable"}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.error.as_deref(), Some("model unavailable"));
    }

    #[test]
    fn upload_response_echoes_stored_file() {
        let json = r#"{"success":true,"response":"Analyzed.","filename":"20260806_clip.mp4","filesize":52428800}"#;
        let parsed: UploadResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.filename.as_deref(), Some("20260806_clip.mp4"));
        assert_eq!(parsed.filesize, Some(52_428_800));
    }

    #[test]
    fn sparse_upload_response_parses() {
        // A failure reply omits everything but the flag and the error.
        let json = r#"{"success":false,"error":"file type not allowed"}"#;
        let parsed: UploadResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.success);
        assert!(parsed.filename.is_none());
        assert!(parsed.filesize.is_none());
    }
}
