//! 会话模块
//!
//! 认证凭据 (token + 管理员资料) 的读写。凭据保存在一个可替换的键值存储中：
//! 浏览器里是 LocalStorage，测试里是内存表。

use admin_console_shared::{LoginResponse, Profile, STORAGE_PROFILE_KEY, STORAGE_TOKEN_KEY};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// 凭据存储
///
/// 与 LocalStorage 的语义一致：读失败等同于不存在，写失败返回 `false`。
pub trait CredentialStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

/// 内存存储，用于测试与非浏览器环境
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// 会话句柄
///
/// 不缓存 token：每次读取都直接查询存储，因此在别处写入或清除的凭据立即生效。
pub struct Session<S: CredentialStore> {
    store: Rc<S>,
}

impl<S: CredentialStore> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: CredentialStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Rc::new(store),
        }
    }

    /// 非空 token；空字符串视为未登录
    pub fn token(&self) -> Option<String> {
        self.store
            .get(STORAGE_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    /// 持久化的管理员资料，损坏的 JSON 视为缺失
    pub fn profile(&self) -> Option<Profile> {
        let raw = self.store.get(STORAGE_PROFILE_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                log::warn!("[Session] Stored profile is unreadable: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    /// 登录成功后写入凭据
    pub fn establish(&self, login: &LoginResponse) -> bool {
        let profile = serde_json::to_string(&login.admin).unwrap_or_else(|_| "{}".to_string());
        if !self.store.set(STORAGE_TOKEN_KEY, &login.token) {
            log::error!("[Session] Failed to persist token");
            return false;
        }
        if !self.store.set(STORAGE_PROFILE_KEY, &profile) {
            // 不能留下只有 token 没有资料的半登录状态
            log::error!("[Session] Failed to persist profile, discarding token");
            self.store.delete(STORAGE_TOKEN_KEY);
            return false;
        }
        log::info!("[Session] Signed in as {}", login.admin.display_name());
        true
    }

    /// 注销：删除 token 与资料
    pub fn clear(&self) {
        self.store.delete(STORAGE_TOKEN_KEY);
        self.store.delete(STORAGE_PROFILE_KEY);
        log::info!("[Session] Signed out");
    }
}

/// 测试用：按键拒绝写入的存储
#[cfg(test)]
pub(crate) mod mock {
    use super::{CredentialStore, MemoryStore};

    #[derive(Debug, Clone, Default)]
    pub struct RejectingStore {
        pub inner: MemoryStore,
        /// 为 `None` 时拒绝所有写入
        reject_key: Option<&'static str>,
    }

    impl RejectingStore {
        pub fn all() -> Self {
            Self::default()
        }

        pub fn key(key: &'static str) -> Self {
            Self {
                inner: MemoryStore::new(),
                reject_key: Some(key),
            }
        }
    }

    impl CredentialStore for RejectingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> bool {
            match self.reject_key {
                Some(rejected) if rejected != key => self.inner.set(key, value),
                _ => false,
            }
        }

        fn delete(&self, key: &str) -> bool {
            self.inner.delete(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::RejectingStore;
    use super::*;

    fn login_response(token: &str) -> LoginResponse {
        serde_json::from_value(serde_json::json!({
            "token": token,
            "admin": {"firstName": "Sara", "lastName": "Tesfaye", "email": "s@example.com"}
        }))
        .unwrap()
    }

    #[test]
    fn test_initial_state_from_store() {
        let store = MemoryStore::new();
        store.set(STORAGE_TOKEN_KEY, "abc123");
        let session = Session::new(store);
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(session.token().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        let store = MemoryStore::new();
        store.set(STORAGE_TOKEN_KEY, "");
        let session = Session::new(store);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_establish_and_clear() {
        let store = MemoryStore::new();
        let session = Session::new(store.clone());

        assert!(session.establish(&login_response("t-1")));
        assert!(session.is_authenticated());
        let profile = session.profile().unwrap();
        assert_eq!(profile.display_name(), "Sara Tesfaye");
        assert_eq!(profile.extra.get("email"), Some(&serde_json::json!("s@example.com")));

        session.clear();
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(store.get(STORAGE_TOKEN_KEY).is_none());
        assert!(store.get(STORAGE_PROFILE_KEY).is_none());
    }

    #[test]
    fn test_establish_rolls_back_token_when_profile_write_fails() {
        let store = RejectingStore::key(STORAGE_PROFILE_KEY);
        let session = Session::new(store.clone());

        assert!(!session.establish(&login_response("t-1")));
        assert!(session.token().is_none());
        assert!(store.inner.get(STORAGE_TOKEN_KEY).is_none());
        assert_eq!(session.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_establish_fails_when_store_rejects_writes() {
        let session = Session::new(RejectingStore::all());
        assert!(!session.establish(&login_response("t-1")));
        assert!(!session.is_authenticated());
        assert!(session.profile().is_none());
    }

    #[test]
    fn test_external_writes_are_visible() {
        let store = MemoryStore::new();
        let session = Session::new(store.clone());
        assert!(!session.is_authenticated());

        store.set(STORAGE_TOKEN_KEY, "written-elsewhere");
        assert_eq!(session.token().as_deref(), Some("written-elsewhere"));
    }

    #[test]
    fn test_corrupt_profile_is_ignored() {
        let store = MemoryStore::new();
        store.set(STORAGE_PROFILE_KEY, "{not json");
        assert!(Session::new(store).profile().is_none());
    }
}
