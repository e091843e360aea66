//! LocalStorage 会话存储
//!
//! 值以原始字符串保存（不做 JSON 编码），与后端无关的调试工具可直接读取。

use gloo_storage::{LocalStorage, Storage};
use qrdesk::SessionStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl SessionStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        LocalStorage::raw().set_item(key, value).is_ok()
    }

    fn remove(&self, key: &str) -> bool {
        LocalStorage::raw().remove_item(key).is_ok()
    }
}
