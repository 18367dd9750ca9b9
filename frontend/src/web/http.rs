//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 `HttpClient`，替代 `gloo-net`。

use admin_console::{ApiError, ApiResult, HttpClient, HttpRequest, HttpResponse};
use admin_console_shared::HEADER_TOTAL_COUNT;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// 需要读取的响应头 (跨域时服务端须通过 Access-Control-Expose-Headers 暴露)
const READ_HEADERS: [&str; 1] = [HEADER_TOTAL_COUNT];

fn js_error(context: &str, e: JsValue) -> ApiError {
    ApiError::Transport(format!("{}: {:?}", context, e))
}

/// 浏览器 fetch 客户端
#[derive(Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    fn build(req: &HttpRequest) -> ApiResult<Request> {
        let headers = Headers::new().map_err(|e| js_error("创建 Headers 失败", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_error("设置 Header 失败", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts).map_err(|e| js_error("请求构建失败", e))
    }

    async fn text(response: &Response) -> ApiResult<String> {
        let promise = response
            .text()
            .map_err(|e| ApiError::Decode(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| ApiError::Decode(format!("{:?}", e)))?;
        text.as_string()
            .ok_or_else(|| ApiError::Decode("响应体无法转换为字符串".to_string()))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let request = Self::build(&req)?;

        let window = web_sys::window()
            .ok_or_else(|| ApiError::Transport("无法获取 window 对象".to_string()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("网络错误", e))?;
        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| js_error("Response 类型转换失败", e))?;

        let mut result = HttpResponse::new(response.status(), Self::text(&response).await?);
        for name in READ_HEADERS {
            if let Ok(Some(value)) = response.headers().get(name) {
                result = result.with_header(name, &value);
            }
        }
        Ok(result)
    }
}
