//! 会话守卫
//!
//! 只检查凭据是否存在，不校验有效期；这只是前端的便利跳转，真正的鉴权在服务端。

use crate::route::AppRoute;
use crate::session::{CredentialStore, Session};

/// 守卫的判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// 渲染目标页面
    Render(AppRoute),
    /// 替换为另一个路由 (原目标被丢弃)
    Redirect(AppRoute),
}

impl Navigation {
    /// 最终要显示的路由
    pub fn route(&self) -> &AppRoute {
        match self {
            Navigation::Render(r) | Navigation::Redirect(r) => r,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Navigation::Redirect(_))
    }
}

pub struct SessionGuard;

impl SessionGuard {
    /// 根据认证状态决定目标路由是否可以渲染
    pub fn evaluate(target: AppRoute, is_authenticated: bool) -> Navigation {
        if target.requires_auth() && !is_authenticated {
            log::info!("[Router] Access Denied to {}. Redirecting to Login.", target);
            return Navigation::Redirect(AppRoute::auth_failure_redirect());
        }

        if target.should_redirect_when_authenticated() && is_authenticated {
            log::debug!("[Router] Already authenticated. Leaving {}.", target);
            return Navigation::Redirect(AppRoute::auth_success_redirect());
        }

        Navigation::Render(target)
    }

    /// 直接读取会话存储进行判定
    pub fn check<S: CredentialStore>(target: AppRoute, session: &Session<S>) -> Navigation {
        Self::evaluate(target, session.is_authenticated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;
    use admin_console_shared::STORAGE_TOKEN_KEY;

    #[test]
    fn test_token_present_renders() {
        let store = MemoryStore::new();
        store.set(STORAGE_TOKEN_KEY, "abc123");
        let session = Session::new(store);

        let nav = SessionGuard::check(AppRoute::Customers, &session);
        assert_eq!(nav, Navigation::Render(AppRoute::Customers));
    }

    #[test]
    fn test_no_token_redirects_to_login() {
        let session = Session::new(MemoryStore::new());

        let nav = SessionGuard::check(AppRoute::OrderDetail("o1".into()), &session);
        assert_eq!(nav, Navigation::Redirect(AppRoute::Login));
        assert!(nav.is_redirect());
    }

    #[test]
    fn test_login_page_when_authenticated() {
        assert_eq!(
            SessionGuard::evaluate(AppRoute::Login, true),
            Navigation::Redirect(AppRoute::Customers)
        );
        assert_eq!(
            SessionGuard::evaluate(AppRoute::Login, false),
            Navigation::Render(AppRoute::Login)
        );
    }

    #[test]
    fn test_not_found_is_public() {
        assert_eq!(
            SessionGuard::evaluate(AppRoute::NotFound, false).route(),
            &AppRoute::NotFound
        );
    }
}
