//! 类型化 API 客户端
//!
//! 所有请求都在发出时读取会话中的 token，因此登录、注销或别处写入的凭据立即生效。

use crate::config::ConsoleConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse};
use crate::session::{CredentialStore, Session};
use admin_console_shared::protocol::{ApiRequest, GetRateRequest, activation_path};
use admin_console_shared::{
    ApiBase, CollectionQuery, CollectionResult, Entity, HEADER_AUTHORIZATION, HEADER_TOTAL_COUNT,
    HttpMethod, LoginRequest, Profile, RootAccount, UpdateRateRequest, User,
};
use serde::Deserialize;
use std::rc::Rc;

const LOGIN_FAILED: &str = "Login failed";

/// 列表接口的响应体
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Enveloped {
        data: Vec<T>,
        #[serde(default)]
        total: Option<u64>,
    },
    Bare(Vec<T>),
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// 错误响应中常见的 `{ "message": ... }`
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct ConsoleApi<C: HttpClient, S: CredentialStore> {
    client: Rc<C>,
    session: Session<S>,
    config: Rc<ConsoleConfig>,
}

impl<C: HttpClient, S: CredentialStore> Clone for ConsoleApi<C, S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            session: self.session.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: HttpClient, S: CredentialStore> ConsoleApi<C, S> {
    pub fn new(client: C, session: Session<S>, config: ConsoleConfig) -> Self {
        Self {
            client: Rc::new(client),
            session,
            config: Rc::new(config),
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    fn url(&self, base: ApiBase, path: &str) -> String {
        format!("{}{}", self.config.base_url(base), path)
    }

    /// 附加 Bearer token；未登录时不发出请求
    fn authorize(&self, req: HttpRequest) -> ApiResult<HttpRequest> {
        match self.session.token() {
            Some(token) => {
                Ok(req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token)))
            }
            None => {
                log::warn!("[Api] No session token for {}", req.url);
                Err(ApiError::Unauthorized {
                    status: 0,
                    message: "not signed in".to_string(),
                })
            }
        }
    }

    /// 发送请求，非 2xx 响应转换为分类后的错误
    async fn dispatch(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let method = req.method;
        let url = req.url.clone();
        log::debug!("[Api] {} {}", method.as_str(), url);

        let resp = self.client.send(req).await?;
        if resp.is_success() {
            return Ok(resp);
        }

        let err = ApiError::from_status(resp.status, error_message(&resp));
        log::warn!("[Api] {} {} failed: {}", method.as_str(), url, err);
        Err(err)
    }

    /// 发送一个声明式请求 (见 `ApiRequest`)
    pub async fn send<T: ApiRequest>(&self, body: &T) -> ApiResult<T::Response> {
        let mut req = HttpRequest::new(&self.url(T::BASE, T::PATH), T::METHOD);
        if T::METHOD != HttpMethod::Get {
            req = req.with_json_body(body)?;
        }
        if T::AUTHENTICATED {
            req = self.authorize(req)?;
        }
        self.dispatch(req).await?.json()
    }

    // ===== 会话 =====

    /// 管理员登录，成功后写入凭据并返回资料
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Profile> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.send(&request).await.map_err(|e| match e {
            ApiError::Unauthorized { status, message } if message.is_empty() => {
                ApiError::Unauthorized {
                    status,
                    message: LOGIN_FAILED.to_string(),
                }
            }
            ApiError::Validation { status, message } if message.is_empty() => {
                ApiError::Validation {
                    status,
                    message: LOGIN_FAILED.to_string(),
                }
            }
            other => other,
        })?;

        if response.token.is_empty() {
            return Err(ApiError::Decode("login response carried no token".to_string()));
        }
        if !self.session.establish(&response) {
            return Err(ApiError::Transport("failed to persist credentials".to_string()));
        }
        Ok(response.admin)
    }

    /// 仅清除本地凭据
    pub fn logout(&self) {
        self.session.clear();
    }

    // ===== 实体 =====

    /// 查询一页实体
    ///
    /// `scope` 为附加的过滤参数，例如子用户列表的 `rootUserId`。
    pub async fn list<E: Entity>(
        &self,
        query: &CollectionQuery,
        scope: &[(String, String)],
    ) -> ApiResult<CollectionResult<E>> {
        let params = query.to_params().with_default_sort(E::DEFAULT_SORT_FIELD);
        let mut qs = serde_urlencoded::to_string(&params)
            .map_err(|e| ApiError::invalid_input(e.to_string()))?;
        if !scope.is_empty() {
            let extra = serde_urlencoded::to_string(scope)
                .map_err(|e| ApiError::invalid_input(e.to_string()))?;
            qs.push('&');
            qs.push_str(&extra);
        }

        let url = format!("{}?{}", self.url(E::BASE, E::LIST_PATH), qs);
        let req = self.authorize(HttpRequest::new(&url, HttpMethod::Get))?;
        let resp = self.dispatch(req).await?;

        let header_total = resp
            .header(HEADER_TOTAL_COUNT)
            .and_then(|v| v.trim().parse::<u64>().ok());
        let (items, body_total) = match resp.json::<ListBody<E>>()? {
            ListBody::Enveloped { data, total } => (data, total),
            ListBody::Bare(items) => (items, None),
        };

        match header_total.or(body_total) {
            Some(total) => Ok(CollectionResult::new(items, total)),
            None => {
                log::debug!("[Api] {} list has no total, using page length", E::NAME);
                Ok(CollectionResult::without_total(items))
            }
        }
    }

    /// 按 ID 查询单个实体
    pub async fn get<E: Entity>(&self, id: &str) -> ApiResult<E> {
        let url = self.url(E::BASE, &format!("{}/{}", E::DETAIL_PATH, id));
        let req = self.authorize(HttpRequest::new(&url, HttpMethod::Get))?;
        let resp = self.dispatch(req).await.map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::NotFound(format!("{} {}", E::NAME, id)),
            other => other,
        })?;

        if E::DETAIL_ENVELOPED {
            Ok(resp.json::<DataEnvelope<E>>()?.data)
        } else {
            resp.json()
        }
    }

    async fn set_active(&self, prefix: &str, id: &str, active: bool) -> ApiResult<()> {
        let url = self.url(ApiBase::Main, &activation_path(prefix, id, active));
        let req = self.authorize(HttpRequest::new(&url, HttpMethod::Put))?;
        self.dispatch(req).await?;
        log::info!(
            "[Api] {} {} is now {}",
            prefix,
            id,
            if active { "active" } else { "inactive" }
        );
        Ok(())
    }

    pub async fn set_user_active(&self, id: &str, active: bool) -> ApiResult<()> {
        self.set_active(User::DETAIL_PATH, id, active).await
    }

    pub async fn set_root_account_active(&self, id: &str, active: bool) -> ApiResult<()> {
        self.set_active(RootAccount::DETAIL_PATH, id, active).await
    }

    // ===== 汇率 =====

    pub async fn exchange_rate(&self) -> ApiResult<f64> {
        let records = self.send(&GetRateRequest).await?;
        records
            .first()
            .and_then(|r| r.value.as_f64())
            .ok_or_else(|| ApiError::Decode("no exchange rate on record".to_string()))
    }

    /// 校验输入后更新汇率，返回服务端确认后的值
    pub async fn update_exchange_rate(&self, input: &str) -> ApiResult<f64> {
        let rate = parse_rate(input)?;
        let response = self.send(&UpdateRateRequest { exchange_rate: rate }).await?;
        response
            .exchange_rate
            .value
            .as_f64()
            .ok_or_else(|| ApiError::Decode("unreadable exchange rate".to_string()))
    }
}

/// 汇率必须是有限的正数
pub fn parse_rate(input: &str) -> ApiResult<f64> {
    match input.trim().parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
        _ => Err(ApiError::invalid_input(format!(
            "exchange rate must be a positive number, got {:?}",
            input
        ))),
    }
}

fn error_message(resp: &HttpResponse) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<ErrorBody>(&resp.body)
    {
        return message;
    }
    resp.body.trim().to_string()
}

#[cfg(test)]
mod tests;
