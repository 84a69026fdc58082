use crate::error::{ClientError, Result};
use crate::traits::Network;
use crate::types::{ApiResponse, WireRequest};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, RequestMode, Response};

/// Browser `fetch` transport.
#[derive(Debug, Default)]
pub struct WasmNetwork;

impl WasmNetwork {
    pub fn new() -> Self {
        WasmNetwork
    }
}

fn js_error(value: JsValue) -> ClientError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    ClientError::Request(message)
}

#[async_trait(?Send)]
impl Network for WasmNetwork {
    async fn fetch(&self, request: WireRequest) -> Result<ApiResponse> {
        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        init.set_mode(RequestMode::Cors);
        if request.with_credentials {
            init.set_credentials(RequestCredentials::Include);
        }
        if let Some(body) = request.body_str() {
            init.set_body(&JsValue::from_str(body));
        }

        let js_request = Request::new_with_str_and_init(&request.url, &init).map_err(js_error)?;
        for (k, v) in &request.headers {
            js_request.headers().set(k, v).map_err(js_error)?;
        }

        let window = web_sys::window()
            .ok_or_else(|| ClientError::Request("no global window".to_string()))?;
        let value = JsFuture::from(window.fetch_with_request(&js_request))
            .await
            .map_err(js_error)?;
        let response: Response = value.dyn_into().map_err(js_error)?;

        let mut headers = BTreeMap::new();
        if let Ok(Some(content_type)) = response.headers().get("content-type") {
            headers.insert("content-type".to_string(), content_type);
        }

        // An unreadable body is reported as empty, not as a failure.
        let body = match response.text() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default(),
            Err(_) => String::new(),
        };

        Ok(ApiResponse {
            status: response.status(),
            status_text: response.status_text(),
            headers,
            body: Bytes::from(body),
        })
    }
}
