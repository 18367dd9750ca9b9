use crate::{
    Company, LoginRequest, LoginResponse, Order, RateRecord, RootAccount, Subscription,
    Transaction, UpdateRateRequest, UpdateRateResponse, User,
};
use serde::{Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// 后端服务分为两个主机：管理 API (`/auth/...`) 与订单 worker API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiBase {
    Main,
    Worker,
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    const BASE: ApiBase = ApiBase::Main;
    /// 是否需要携带 Bearer token
    const AUTHENTICATED: bool = true;
}

// =========================================================
// Request Definitions
// =========================================================

/// Admin login
impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/auth/admin-login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;
}

/// Read the current exchange rate (the server answers with a list, first entry wins)
#[derive(Debug, Serialize)]
pub struct GetRateRequest;

impl ApiRequest for GetRateRequest {
    type Response = Vec<RateRecord>;
    const PATH: &'static str = "/auth/get-rate";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Replace the exchange rate
impl ApiRequest for UpdateRateRequest {
    type Response = UpdateRateResponse;
    const PATH: &'static str = "/auth/update-rate";
    const METHOD: HttpMethod = HttpMethod::Put;
}

// =========================================================
// Entity Endpoints
// =========================================================

/// 可分页列出、可按 ID 查询的实体
pub trait Entity: Serialize + DeserializeOwned + Clone + 'static {
    /// 用于日志与错误信息的名称
    const NAME: &'static str;
    const BASE: ApiBase = ApiBase::Main;
    /// 列表接口路径
    const LIST_PATH: &'static str;
    /// 详情接口路径前缀，后接 `/{id}`
    const DETAIL_PATH: &'static str;
    /// 未指定排序时使用的排序列
    const DEFAULT_SORT_FIELD: Option<&'static str> = Some("id");
    /// 详情响应是否包裹在 `data` 字段中
    const DETAIL_ENVELOPED: bool = false;

    fn id(&self) -> &str;
}

impl Entity for RootAccount {
    const NAME: &'static str = "root account";
    const LIST_PATH: &'static str = "/auth/get-root-accounts";
    const DETAIL_PATH: &'static str = "/auth/root";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for User {
    const NAME: &'static str = "user";
    const LIST_PATH: &'static str = "/auth/get-users";
    const DETAIL_PATH: &'static str = "/auth/user";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Company {
    const NAME: &'static str = "company";
    const LIST_PATH: &'static str = "/auth/get-companies";
    const DETAIL_PATH: &'static str = "/auth/company";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Subscription {
    const NAME: &'static str = "subscription";
    const LIST_PATH: &'static str = "/auth/get-subscriptions";
    const DETAIL_PATH: &'static str = "/auth/subscription";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Transaction {
    const NAME: &'static str = "transaction";
    const LIST_PATH: &'static str = "/auth/get-transactions";
    const DETAIL_PATH: &'static str = "/auth/transaction";
    // 交易列表没有默认排序列，由服务端决定
    const DEFAULT_SORT_FIELD: Option<&'static str> = None;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Order {
    const NAME: &'static str = "order";
    const BASE: ApiBase = ApiBase::Worker;
    const LIST_PATH: &'static str = "/order";
    const DETAIL_PATH: &'static str = "/order";
    const DETAIL_ENVELOPED: bool = true;

    fn id(&self) -> &str {
        &self.id
    }
}

/// 账户激活状态切换的接口路径
///
/// `prefix` 为实体的详情前缀，例如 `/auth/user` -> `/auth/user/activate/{id}`
pub fn activation_path(prefix: &str, id: &str, active: bool) -> String {
    let action = if active { "activate" } else { "deactivate" };
    format!("{}/{}/{}", prefix, action, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_path() {
        assert_eq!(
            activation_path(User::DETAIL_PATH, "u1", true),
            "/auth/user/activate/u1"
        );
        assert_eq!(
            activation_path(RootAccount::DETAIL_PATH, "r1", false),
            "/auth/root/deactivate/r1"
        );
    }

    #[test]
    fn test_orders_live_on_worker_api() {
        assert_eq!(Order::BASE, ApiBase::Worker);
        assert!(Order::DETAIL_ENVELOPED);
        assert_eq!(Company::BASE, ApiBase::Main);
        assert_eq!(Transaction::DEFAULT_SORT_FIELD, None);
    }
}
