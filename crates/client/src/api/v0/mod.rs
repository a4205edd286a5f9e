//! Request/response types for every backend endpoint the client uses

use reqwest::multipart::Part;
use serde::{Deserialize, Serialize};
use url::Url;

use super::client::ApiError;

pub mod auth;
pub mod chats;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod settings;
pub mod social;
pub mod stories;

/// Generic acknowledgement for endpoints that return no entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Endpoint URL under `base` with every segment percent-encoded, so an id
/// containing `/`, `?` or `#` stays a single path segment.
///
/// Empty, `.` and `..` segments are refused since they would be dropped
/// from the path and change the route.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    if let Some(segment) = segments
        .iter()
        .find(|s| s.is_empty() || **s == "." || **s == "..")
    {
        return Err(ApiError::Other(format!(
            "invalid path segment {segment:?}"
        )));
    }

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::Other(format!("{base} cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Multipart file part with a MIME type guessed from the file name
pub(crate) fn file_part(file_name: String, content: Vec<u8>) -> Result<Part, ApiError> {
    let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
    Ok(Part::bytes(content)
        .file_name(file_name)
        .mime_str(mime.essence_str())?)
}

#[cfg(test)]
mod tests {
    use common::models::{ChatId, PostId};
    use reqwest::{Client, Method};

    use super::chats::MarkChatReadRequest;
    use super::posts::{CreatePostRequest, LikePostRequest};
    use super::*;
    use crate::api::client::ApiRequest;

    fn base() -> Url {
        Url::parse("http://api.example/").unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let base = Url::parse("https://pulse.example/v2/").unwrap();
        let url = endpoint(&base, &["api", "chats", "c1", "read"]).unwrap();
        assert_eq!(url.as_str(), "https://pulse.example/v2/api/chats/c1/read");
    }

    #[test]
    fn test_crafted_post_id_stays_one_segment() {
        let request = LikePostRequest {
            post_id: PostId::new("x/../../users/me?"),
            like: false,
        }
        .build_request(&base(), &Client::new())
        .unwrap()
        .build()
        .unwrap();

        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(
            request.url().as_str(),
            "http://api.example/api/posts/x%2F..%2F..%2Fusers%2Fme%3F/like"
        );
        assert!(request.url().query().is_none());
    }

    #[test]
    fn test_dot_segment_ids_are_refused() {
        for id in ["..", ".", ""] {
            let result = MarkChatReadRequest {
                chat_id: ChatId::new(id),
            }
            .build_request(&base(), &Client::new());
            assert!(matches!(result, Err(ApiError::Other(_))), "{id:?}");
        }
    }

    #[test]
    fn test_post_upload_is_multipart() {
        let request = CreatePostRequest {
            caption: Some("sunset".to_string()),
            file_name: "beach.png".to_string(),
            content: vec![0x89, b'P', b'N', b'G'],
        }
        .build_request(&base(), &Client::new())
        .unwrap()
        .build()
        .unwrap();

        let content_type = request
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }
}
