use crate::web::{FetchClient, LocalStorage};
use admin_console::config::{KEY_API_URL, KEY_LOG_LEVEL, KEY_PAGE_SIZE, KEY_WORKER_API_URL};
use admin_console::{ConsoleApi, ConsoleConfig, Session};

/// 浏览器环境下的 API 客户端
pub type Api = ConsoleApi<FetchClient, LocalStorage>;

/// 构建期注入的配置 (trunk build 时的环境变量)
pub fn build_config() -> ConsoleConfig {
    ConsoleConfig::from_lookup(|key| {
        let value = match key {
            KEY_API_URL => option_env!("CONSOLE_API_URL"),
            KEY_WORKER_API_URL => option_env!("CONSOLE_WORKER_API_URL"),
            KEY_PAGE_SIZE => option_env!("CONSOLE_PAGE_SIZE"),
            KEY_LOG_LEVEL => option_env!("CONSOLE_LOG_LEVEL"),
            _ => None,
        };
        value.map(str::to_string)
    })
}

pub fn build_api(config: ConsoleConfig) -> Api {
    ConsoleApi::new(FetchClient, Session::new(LocalStorage), config)
}
