//! `location.hash` 与任务调度

use futures::future::LocalBoxFuture;
use qrdesk::{HashLocation, Spawner};

/// 读写 `window.location.hash`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLocation;

impl HashLocation for BrowserLocation {
    fn hash(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default()
    }

    fn set_hash(&self, hash: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_hash(hash);
        }
    }
}

/// 在浏览器事件循环上运行后台任务
#[derive(Debug, Clone, Copy, Default)]
pub struct LeptosSpawner;

impl Spawner for LeptosSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        leptos::task::spawn_local(task);
    }
}
