//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 根账户列表
    Customers,
    CustomerDetail(String),
    /// 某个根账户下的子用户列表，参数为根账户 ID
    Users(String),
    UserDetail(String),
    Companies,
    CompanyDetail(String),
    Subscriptions,
    SubscriptionDetail(String),
    Orders,
    OrderDetail(String),
    Transactions,
    TransactionDetail(String),
    ExchangeRate,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 多余的斜杠会被忽略：`//customers/` 等同于 `/customers`。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["login"] => Self::Login,
            ["customers"] => Self::Customers,
            ["customer", cid] => Self::CustomerDetail(cid.to_string()),
            ["users", root] => Self::Users(root.to_string()),
            ["user", uid] => Self::UserDetail(uid.to_string()),
            ["companies"] => Self::Companies,
            ["companies", cid] => Self::CompanyDetail(cid.to_string()),
            ["subscriptions"] => Self::Subscriptions,
            ["subscriptions", sid] => Self::SubscriptionDetail(sid.to_string()),
            ["orders"] => Self::Orders,
            ["orders", oid] => Self::OrderDetail(oid.to_string()),
            ["transactions"] => Self::Transactions,
            ["transactions", tid] => Self::TransactionDetail(tid.to_string()),
            ["exchange-rate"] => Self::ExchangeRate,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/".to_string(),
            Self::Customers => "/customers".to_string(),
            Self::CustomerDetail(id) => format!("/customer/{}", id),
            Self::Users(root) => format!("/users/{}", root),
            Self::UserDetail(id) => format!("/user/{}", id),
            Self::Companies => "/companies".to_string(),
            Self::CompanyDetail(id) => format!("/companies/{}", id),
            Self::Subscriptions => "/subscriptions".to_string(),
            Self::SubscriptionDetail(id) => format!("/subscriptions/{}", id),
            Self::Orders => "/orders".to_string(),
            Self::OrderDetail(id) => format!("/orders/{}", id),
            Self::Transactions => "/transactions".to_string(),
            Self::TransactionDetail(id) => format!("/transactions/{}", id),
            Self::ExchangeRate => "/exchange-rate".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    ///
    /// 除登录页与 404 外，所有页面都需要认证。
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Customers
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        let routes = [
            AppRoute::Login,
            AppRoute::Customers,
            AppRoute::CustomerDetail("r1".into()),
            AppRoute::Users("r1".into()),
            AppRoute::UserDetail("u1".into()),
            AppRoute::Companies,
            AppRoute::CompanyDetail("c1".into()),
            AppRoute::Subscriptions,
            AppRoute::SubscriptionDetail("s1".into()),
            AppRoute::Orders,
            AppRoute::OrderDetail("o1".into()),
            AppRoute::Transactions,
            AppRoute::TransactionDetail("t1".into()),
            AppRoute::ExchangeRate,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn test_detail_paths() {
        let cases = [
            (AppRoute::CustomerDetail("r1".into()), "/customer/r1"),
            (AppRoute::UserDetail("u1".into()), "/user/u1"),
            (AppRoute::CompanyDetail("c1".into()), "/companies/c1"),
            (AppRoute::SubscriptionDetail("s1".into()), "/subscriptions/s1"),
            (AppRoute::OrderDetail("o1".into()), "/orders/o1"),
            (AppRoute::TransactionDetail("t1".into()), "/transactions/t1"),
        ];
        for (route, path) in cases {
            assert_eq!(route.to_path(), path);
            assert_eq!(AppRoute::from_path(path), route);
        }
        assert_eq!(AppRoute::from_path("/order/o1"), AppRoute::NotFound);
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(AppRoute::from_path(""), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("//customers/"), AppRoute::Customers);
        assert_eq!(
            AppRoute::from_path("/orders/o-7?tab=vm"),
            AppRoute::OrderDetail("o-7".into())
        );
        assert_eq!(AppRoute::from_path("/customer"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::NotFound);
    }

    #[test]
    fn test_auth_requirements() {
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::NotFound.requires_auth());
        assert!(AppRoute::Customers.requires_auth());
        assert!(AppRoute::ExchangeRate.requires_auth());
        assert!(AppRoute::Login.should_redirect_when_authenticated());
        assert!(!AppRoute::Orders.should_redirect_when_authenticated());
    }
}
