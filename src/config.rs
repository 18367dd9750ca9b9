use admin_console_shared::{ApiBase, DEFAULT_PAGE_SIZE, query::is_supported_page_size};
use log::LevelFilter;

// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 这些是默认值，如果构建环境中没有定义对应的变量，则使用这些值
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_WORKER_API_URL: &str = "http://localhost:5001";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

pub const KEY_API_URL: &str = "CONSOLE_API_URL";
pub const KEY_WORKER_API_URL: &str = "CONSOLE_WORKER_API_URL";
pub const KEY_PAGE_SIZE: &str = "CONSOLE_PAGE_SIZE";
pub const KEY_LOG_LEVEL: &str = "CONSOLE_LOG_LEVEL";

/// 控制台配置
/// 负责从键值来源读取配置，读不到或无效时回退到默认值
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub worker_api_url: String,
    pub default_page_size: u32,
    pub log_level: LevelFilter,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            worker_api_url: DEFAULT_WORKER_API_URL.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl ConsoleConfig {
    /// 通过 `lookup` 读取各配置键
    ///
    /// 前端传入 `option_env!` 的结果，测试传入 HashMap。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_page_size = match non_empty(KEY_PAGE_SIZE) {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if is_supported_page_size(size) => size,
                _ => {
                    log::warn!(
                        "[Config] Ignoring {}={:?}, falling back to {}",
                        KEY_PAGE_SIZE,
                        raw,
                        DEFAULT_PAGE_SIZE
                    );
                    DEFAULT_PAGE_SIZE
                }
            },
        };

        let log_level = match non_empty(KEY_LOG_LEVEL) {
            None => DEFAULT_LOG_LEVEL,
            Some(raw) => raw.trim().parse::<LevelFilter>().unwrap_or_else(|_| {
                log::warn!("[Config] Unknown log level {:?}", raw);
                DEFAULT_LOG_LEVEL
            }),
        };

        Self {
            api_url: non_empty(KEY_API_URL)
                .map(|v| trim_base(&v))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            worker_api_url: non_empty(KEY_WORKER_API_URL)
                .map(|v| trim_base(&v))
                .unwrap_or_else(|| DEFAULT_WORKER_API_URL.to_string()),
            default_page_size,
            log_level,
        }
    }

    pub fn base_url(&self, base: ApiBase) -> &str {
        match base {
            ApiBase::Main => &self.api_url,
            ApiBase::Worker => &self.worker_api_url,
        }
    }
}

/// 去掉结尾的 `/`，拼接路径时统一由路径提供前导斜杠
fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ConsoleConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConsoleConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_missing() {
        assert_eq!(config_from(&[]), ConsoleConfig::default());
    }

    #[test]
    fn test_reads_values() {
        let config = config_from(&[
            (KEY_API_URL, "https://api.example.com/"),
            (KEY_WORKER_API_URL, "https://worker.example.com"),
            (KEY_PAGE_SIZE, "50"),
            (KEY_LOG_LEVEL, "debug"),
        ]);
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.base_url(ApiBase::Worker), "https://worker.example.com");
        assert_eq!(config.default_page_size, 50);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            (KEY_API_URL, "   "),
            (KEY_PAGE_SIZE, "25"),
            (KEY_LOG_LEVEL, "chatty"),
        ]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);

        assert_eq!(config_from(&[(KEY_PAGE_SIZE, "abc")]).default_page_size, 20);
    }
}
