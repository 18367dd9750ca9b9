//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态。

use crate::api::Api;
use admin_console::ApiError;
use admin_console_shared::Profile;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;

/// 认证状态
#[derive(Clone, Default, PartialEq)]
pub struct AuthState {
    /// 是否已认证
    pub is_authenticated: bool,
    /// 登录管理员资料（用于导航栏显示）
    pub profile: Option<Profile>,
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
    api: StoredValue<Api, LocalStorage>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new(api: Api) -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self {
            state,
            set_state,
            api: StoredValue::new_local(api),
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated)
    }

    /// API 客户端 (内部共享同一个会话)
    pub fn api(&self) -> Api {
        self.api.get_value()
    }

    /// 请求失败时的统一处理：401/403 视为会话失效
    pub fn handle_error(&self, err: &ApiError) {
        if err.is_unauthorized() {
            log::warn!("[Auth] Session rejected by server, signing out.");
            logout(self);
        }
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 从 LocalStorage 中已有的凭据恢复登录状态。
pub fn init_auth(ctx: &AuthContext) {
    let api = ctx.api();
    let session = api.session();
    ctx.set_state.set(AuthState {
        is_authenticated: session.is_authenticated(),
        profile: session.profile(),
    });
}

/// 登录并保存状态
///
/// 成功后凭据写入 LocalStorage，路由服务监听到认证状态变化后自动跳转。
pub async fn login(ctx: &AuthContext, email: String, password: String) -> Result<(), ApiError> {
    let profile = ctx.api().login(&email, &password).await?;
    ctx.set_state.set(AuthState {
        is_authenticated: true,
        profile: Some(profile),
    });
    Ok(())
}

/// 注销并清除状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    ctx.api().logout();
    ctx.set_state.set(AuthState::default());
}
