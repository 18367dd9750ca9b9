//! 计费管理控制台前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `admin_console::route` / `guard`: 路由定义与会话守卫（核心库）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod collection;
    pub mod detail;
    pub mod exchange_rate;
    mod icons;
    pub mod layout;
    pub mod lists;
    pub mod login;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::detail::{
    CompanyDetailPage, CustomerDetailPage, OrderDetailPage, SubscriptionDetailPage,
    TransactionDetailPage, UserDetailPage,
};
use crate::components::exchange_rate::ExchangeRatePage;
use crate::components::lists::{
    CompaniesPage, CustomersPage, OrdersPage, SubscriptionsPage, TransactionsPage, UsersPage,
};
use crate::components::login::LoginPage;

use admin_console::AppRoute;
use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod console;
    mod http;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::FetchClient;
    pub use storage::LocalStorage;
    pub use timer::Timeout;
}

use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Customers => view! { <CustomersPage /> }.into_any(),
        AppRoute::CustomerDetail(id) => view! { <CustomerDetailPage id=id /> }.into_any(),
        AppRoute::Users(root_user_id) => view! { <UsersPage root_user_id=root_user_id /> }.into_any(),
        AppRoute::UserDetail(id) => view! { <UserDetailPage id=id /> }.into_any(),
        AppRoute::Companies => view! { <CompaniesPage /> }.into_any(),
        AppRoute::CompanyDetail(id) => view! { <CompanyDetailPage id=id /> }.into_any(),
        AppRoute::Subscriptions => view! { <SubscriptionsPage /> }.into_any(),
        AppRoute::SubscriptionDetail(id) => view! { <SubscriptionDetailPage id=id /> }.into_any(),
        AppRoute::Orders => view! { <OrdersPage /> }.into_any(),
        AppRoute::OrderDetail(id) => view! { <OrderDetailPage id=id /> }.into_any(),
        AppRoute::Transactions => view! { <TransactionsPage /> }.into_any(),
        AppRoute::TransactionDetail(id) => view! { <TransactionDetailPage id=id /> }.into_any(),
        AppRoute::ExchangeRate => view! { <ExchangeRatePage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取构建期配置并初始化日志
    let config = api::build_config();
    web::console::init(config.log_level);

    // 2. 创建认证上下文
    let auth_ctx = AuthContext::new(api::build_api(config));
    provide_context(auth_ctx);

    // 3. 初始化认证状态（从 LocalStorage 恢复会话）
    init_auth(&auth_ctx);

    // 4. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 5. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
