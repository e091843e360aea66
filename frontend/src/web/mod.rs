//! 浏览器适配层
//!
//! 核心库各个 trait 的浏览器实现，所有对 `window` 的访问都集中在此。

mod http;
mod location;
mod storage;
mod surface;

pub use http::BrowserHttpClient;
pub use location::{BrowserLocation, LeptosSpawner};
pub use storage::BrowserStore;
pub use surface::{BrowserSurface, ViewState};
