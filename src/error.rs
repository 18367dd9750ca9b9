use thiserror::Error;

// =========================================================
// 错误类别
// =========================================================

/// 错误类别
///
/// 渲染层据此决定展示方式：`Unauthorized` 应回到登录页，而不是提供重试。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 请求未能完成 (网络中断、CORS、DNS 等)
    Transport,
    /// 401/403: token 缺失、无效或已过期
    Unauthorized,
    /// 404: 资源不存在
    NotFound,
    /// 400/422: 请求被拒绝，或本地输入校验失败
    Validation,
    /// 其他非 2xx 响应
    Http,
    /// 响应体无法解析
    Decode,
}

impl ErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "NETWORK_ERROR",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::NotFound => "RESOURCE_NOT_FOUND",
            ErrorKind::Validation => "INVALID_INPUT",
            ErrorKind::Http => "UPSTREAM_ERROR",
            ErrorKind::Decode => "JSON_PARSE_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 与远端 API 交互时的错误
///
/// 保留原始状态码与消息，分类交给上层；需要 `Clone` 以便存放在集合的 Fetch State 中。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rejected ({status}): {message}")]
    Validation { status: u16, message: String },

    #[error("http {status}: {message}")]
    Http { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// 根据 HTTP 状态码分类
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ApiError::Unauthorized { status, message },
            404 => ApiError::NotFound(message),
            400 | 422 => ApiError::Validation { status, message },
            _ => ApiError::Http { status, message },
        }
    }

    /// 本地输入校验失败 (未发出请求)
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::Validation {
            status: 0,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Http { .. } => ErrorKind::Http,
            ApiError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// 原始 HTTP 状态码 (本地错误没有状态码)
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. }
            | ApiError::Validation { status, .. }
            | ApiError::Http { status, .. } => (*status != 0).then_some(*status),
            ApiError::NotFound(_) => Some(404),
            ApiError::Transport(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.kind().error_code()
    }

    /// 原始消息，不带分类前缀
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport(m) | ApiError::NotFound(m) | ApiError::Decode(m) => m,
            ApiError::Unauthorized { message, .. }
            | ApiError::Validation { message, .. }
            | ApiError::Http { message, .. } => message,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            ApiError::from_status(401, "jwt expired").kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(ApiError::from_status(403, "").kind(), ErrorKind::Unauthorized);
        assert_eq!(ApiError::from_status(404, "").kind(), ErrorKind::NotFound);
        assert_eq!(ApiError::from_status(422, "").kind(), ErrorKind::Validation);
        assert_eq!(ApiError::from_status(502, "").kind(), ErrorKind::Http);
    }

    #[test]
    fn test_raw_detail_is_preserved() {
        let err = ApiError::from_status(503, "maintenance window");
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.message(), "maintenance window");
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
        assert_eq!(err.to_string(), "http 503: maintenance window");
    }

    #[test]
    fn test_local_validation_has_no_status() {
        let err = ApiError::invalid_input("rate must be positive");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status(), None);
    }
}
