use blogdesk_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebError {
    /// Failure reported by the API or the transport.
    #[error("{0}")]
    Client(#[from] ClientError),

    #[error("{0} is missing its data-id")]
    MissingId(&'static str),

    #[error("invalid category id: {0:?}")]
    InvalidCategory(String),

    /// DOM or other JavaScript interop failure.
    #[error("JavaScript error: {0}")]
    JavaScript(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        WebError::JavaScript(message)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<WebError> for wasm_bindgen::JsValue {
    fn from(err: WebError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_display_bare_message() {
        let err = WebError::from(ClientError::request("Post not found"));
        assert_eq!(err.to_string(), "Post not found");
    }

    #[test]
    fn test_missing_id_names_the_action() {
        let err = WebError::MissingId("admin-delete-post");
        assert_eq!(err.to_string(), "admin-delete-post is missing its data-id");
    }
}
