//! 令牌存储
//!
//! `SessionStore` 是对浏览器 LocalStorage 这类 key-value 存储的抽象，
//! `TokenStore` 在其上提供三个会话键的类型化读写。

use crate::config::StorageKeys;
use qrdesk_shared::{RefreshedToken, Timestamp, TokenPair};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// 持久化 key-value 存储
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;

    /// 返回是否写入成功
    fn set(&self, key: &str, value: &str) -> bool;

    /// 返回是否删除成功
    fn remove(&self, key: &str) -> bool;
}

/// 进程内存储，用于测试和 LocalStorage 不可用的环境
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}

/// 会话快照
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub access_expiry: Option<Timestamp>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.access_expiry.is_none()
    }
}

#[derive(Clone)]
pub struct TokenStore {
    store: Rc<dyn SessionStore>,
    keys: StorageKeys,
}

impl TokenStore {
    pub fn new(store: Rc<dyn SessionStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(&self.keys.access).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(&self.keys.refresh).filter(|t| !t.is_empty())
    }

    /// 无法解析的值视为缺失
    pub fn access_expiry(&self) -> Option<Timestamp> {
        self.store
            .get(&self.keys.expiry)
            .and_then(|raw| raw.parse().ok())
    }

    pub fn session(&self) -> Session {
        Session {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
            access_expiry: self.access_expiry(),
        }
    }

    /// 登录成功后保存完整的令牌对
    pub fn save_pair(&self, pair: &TokenPair, now: Timestamp) {
        self.write(&self.keys.access, &pair.access_token);
        self.write(&self.keys.refresh, &pair.refresh_token);
        self.save_expiry(now, pair.expires_in);
    }

    /// 刷新成功后保存新的访问令牌；refresh token 仅在后端轮换时更新
    pub fn save_refreshed(&self, token: &RefreshedToken, now: Timestamp) {
        self.write(&self.keys.access, &token.access_token);
        if let Some(refresh) = &token.refresh_token {
            self.write(&self.keys.refresh, refresh);
        }
        self.save_expiry(now, token.expires_in);
    }

    pub fn clear(&self) {
        for key in [&self.keys.access, &self.keys.refresh, &self.keys.expiry] {
            if !self.store.remove(key) {
                log_warn!("[Session] Failed to remove {}", key);
            }
        }
    }

    /// 访问令牌是否会在 `margin` 内过期（或已过期、或没有记录过期时间）
    pub fn expires_within(&self, now: Timestamp, margin: Duration) -> bool {
        match self.access_expiry() {
            Some(expiry) => now > expiry.saturating_sub(margin),
            None => true,
        }
    }

    fn save_expiry(&self, now: Timestamp, expires_in_secs: u64) {
        let expiry = now + Duration::from_secs(expires_in_secs);
        self.write(&self.keys.expiry, &expiry.to_string());
    }

    fn write(&self, key: &str, value: &str) {
        if !self.store.set(key, value) {
            log_warn!("[Session] Failed to persist {}", key);
        }
    }
}
