use crate::error::{ApiError, ApiResult};
use admin_console_shared::HttpMethod;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::rc::Rc;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json_body<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let text = serde_json::to_string(body)
            .map_err(|e| ApiError::invalid_input(format!("unserializable body: {}", e)))?;
        self.body = Some(text);
        Ok(self.with_header("Content-Type", "application/json"))
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
///
/// 响应头的键统一为小写。
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers
            .insert(key.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(ApiError::from)
    }
}

/// HTTP 客户端特性 (Trait)
/// 使用 async_trait 以支持异步调用，(?Send) 是因为浏览器环境下 fetch 相关类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    /// 只有请求无法完成时才返回错误，非 2xx 响应照常返回由调用方分类
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

#[async_trait::async_trait(?Send)]
impl<T: HttpClient + ?Sized> HttpClient for Rc<T> {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试替身 (Mock Client)
// =========================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;

    type Handler = Box<dyn Fn(&HttpRequest) -> Option<HttpResponse>>;

    /// 按 URL (含查询串) 返回预设响应，并记录收到的请求
    #[derive(Default)]
    pub struct MockHttpClient {
        responses: RefCell<HashMap<String, HttpResponse>>,
        handler: RefCell<Option<Handler>>,
        pub requests: RefCell<Vec<HttpRequest>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_response(&self, url: &str, response: HttpResponse) {
            self.responses
                .borrow_mut()
                .insert(url.to_string(), response);
        }

        /// 未命中预设 URL 时调用的兜底处理函数
        pub fn set_handler(&self, f: impl Fn(&HttpRequest) -> Option<HttpResponse> + 'static) {
            *self.handler.borrow_mut() = Some(Box::new(f));
        }

        pub fn last_request(&self) -> Option<HttpRequest> {
            self.requests.borrow().last().cloned()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
            self.requests.borrow_mut().push(req.clone());

            if let Some(resp) = self.responses.borrow().get(&req.url) {
                return Ok(resp.clone());
            }
            if let Some(handler) = self.handler.borrow().as_ref() {
                if let Some(resp) = handler(&req) {
                    return Ok(resp);
                }
            }
            Err(ApiError::Transport(format!("no mock response for {}", req.url)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_headers_are_case_insensitive() {
        let resp = HttpResponse::new(200, "[]").with_header("X-Total-Count", "45");
        assert_eq!(resp.header("x-total-count"), Some("45"));
        assert_eq!(resp.header("X-TOTAL-COUNT"), Some("45"));
        assert!(resp.is_success());
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let req = HttpRequest::new("http://api/x", HttpMethod::Put)
            .with_json_body(&serde_json::json!({"exchangeRate": 57.5}))
            .unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"exchangeRate":57.5}"#));
    }

    #[test]
    fn test_decode_failure_is_classified() {
        let resp = HttpResponse::new(200, "<html>");
        let err = resp.json::<Vec<u32>>().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Decode);
    }
}
