use serde::Deserialize;

use super::repo_types::NewSuggestion;

/// Body of `POST /api/suggestions`. Missing fields decode as empty strings,
/// anything else in the body (`id`, `date`, `aiReply`, ...) is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSuggestionRequest {
    pub name: String,
    pub email: String,
    pub category: String,
    pub message: String,
}

impl CreateSuggestionRequest {
    /// Decodes a request body regardless of its declared content type.
    /// A JSON `null` body is treated like `{}`.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(serde_json::from_slice::<Option<Self>>(body)?.unwrap_or_default())
    }
}

impl From<CreateSuggestionRequest> for NewSuggestion {
    fn from(r: CreateSuggestionRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            category: r.category,
            message: r.message,
        }
    }
}
