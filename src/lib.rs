//! 计费管理控制台核心
//!
//! 与 UI 框架无关的部分：集合控制器、会话与路由守卫、类型化 API 客户端。
//! 浏览器相关的实现 (fetch、LocalStorage、历史路由) 在 `frontend` crate 中。

pub mod api;
pub mod collection;
pub mod config;
pub mod error;
pub mod guard;
pub mod request;
pub mod route;
pub mod session;
pub mod source;

pub use admin_console_shared as shared;

pub use api::ConsoleApi;
pub use collection::{
    CollectionController, CollectionSnapshot, FetchState, FetchTicket, QueryError,
    RemoteCollection, Resolution,
};
pub use config::ConsoleConfig;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use guard::{Navigation, SessionGuard};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use route::AppRoute;
pub use session::{CredentialStore, MemoryStore, Session, SessionState};
pub use source::{CollectionSource, EntityList, FnSource};
