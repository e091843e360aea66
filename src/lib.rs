//! QR Desk 客户端核心
//!
//! 与平台无关的数据层与交互逻辑，浏览器相关能力全部通过 trait 注入：
//! - `request::HttpClient`: HTTP 传输
//! - `session::SessionStore`: 令牌持久化
//! - `clock::Clock`: 当前时间
//! - `router::HashLocation`: `location.hash` 读写
//! - `ui::UiSurface`: 视图更新与弹窗
//! - `app::Spawner`: 后台任务调度
//!
//! `frontend` crate 提供以上 trait 的浏览器实现与 Leptos 视图。

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub mod api;
pub mod app;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod qr;
pub mod render;
pub mod request;
pub mod route;
pub mod router;
pub mod session;
pub mod ui;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, RequestOptions};
pub use app::{Desk, Platform, Spawner};
pub use auth::AuthClient;
pub use clock::{Clock, SystemClock};
pub use config::ClientConfig;
pub use error::{ApiError, AuthError, ClientError, ClientResult, ConfigError, ValidationError};
pub use events::{AuthEvent, AuthEvents};
pub use qr::QrClient;
pub use request::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
pub use route::AppRoute;
pub use router::{HashLocation, Router};
pub use session::{MemoryStore, Session, SessionStore, TokenStore};
pub use ui::{EditSession, QrDraft, UiBindings, UiSurface};

pub use qrdesk_shared::{QrCode, Timestamp, TokenPair};
