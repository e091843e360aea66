//! QR Desk 前端应用
//!
//! 业务逻辑全部在 `qrdesk` 核心库中，本 crate 只负责：
//! - `web`: 核心库各个 trait 的浏览器实现
//! - `components`: 按当前路由渲染的 Leptos 页面
//!
//! `Desk` 持有 `Rc`，不能放进 Leptos Context，因此保存在线程局部变量中，
//! 事件处理函数通过 `desk()` 取用。

mod components {
    pub mod auth_page;
    pub mod dashboard;
    pub mod edit_form;
}
pub(crate) mod web;

use crate::components::auth_page::{AuthMode, AuthPage};
use crate::components::dashboard::DashboardPage;
use crate::components::edit_form::EditForm;
use crate::web::{BrowserHttpClient, BrowserLocation, BrowserStore, BrowserSurface, LeptosSpawner, ViewState};

use gloo_storage::{LocalStorage, Storage};
use leptos::prelude::*;
use qrdesk::{AppRoute, ClientConfig, Desk, Platform, SystemClock};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

thread_local! {
    static DESK: RefCell<Option<Rc<Desk>>> = const { RefCell::new(None) };
}

pub(crate) fn desk() -> Option<Rc<Desk>> {
    DESK.with(|d| d.borrow().clone())
}

/// 配置来源：LocalStorage 中的同名键优先，其次是编译期环境变量
fn lookup(key: &str) -> Option<String> {
    if let Ok(Some(value)) = LocalStorage::raw().get_item(key) {
        return Some(value);
    }
    let compiled = match key {
        qrdesk::config::ENV_API_BASE => option_env!("QRDESK_API_BASE"),
        qrdesk::config::ENV_REFRESH_MARGIN_SECS => option_env!("QRDESK_REFRESH_MARGIN_SECS"),
        qrdesk::config::ENV_ACCESS_KEY => option_env!("QRDESK_ACCESS_KEY"),
        qrdesk::config::ENV_REFRESH_KEY => option_env!("QRDESK_REFRESH_KEY"),
        qrdesk::config::ENV_EXPIRY_KEY => option_env!("QRDESK_EXPIRY_KEY"),
        _ => None,
    };
    compiled.map(str::to_string)
}

fn load_config() -> ClientConfig {
    ClientConfig::from_lookup(lookup).unwrap_or_else(|e| {
        web_sys::console::error_1(&format!("[Config] {}, using defaults", e).into());
        ClientConfig::default()
    })
}

/// 监听 `hashchange`
fn listen_hash_change() {
    let closure = Closure::<dyn Fn()>::new(move || {
        if let Some(desk) = desk() {
            desk.handle_hash_change();
        }
    });

    if let Some(window) = web_sys::window() {
        let _ = window
            .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
    }

    // 泄漏闭包以保持监听器存活
    closure.forget();
}

/// 路由匹配函数
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <AuthPage mode=AuthMode::Login /> }.into_any(),
        AppRoute::Register => view! { <AuthPage mode=AuthMode::Register /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Edit { .. } => view! { <EditForm /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 视图状态，核心库通过 BrowserSurface 写入
    let state = ViewState::new();
    provide_context(state);
    let route = RwSignal::new(AppRoute::Login);

    // 2. 组装核心库
    let desk = Desk::new(
        load_config(),
        Platform {
            http: Rc::new(BrowserHttpClient),
            store: Rc::new(BrowserStore),
            clock: Rc::new(SystemClock),
            location: Rc::new(BrowserLocation),
            surface: Rc::new(BrowserSurface::new(state)),
            spawner: Rc::new(LeptosSpawner),
        },
    );
    desk.router().on_route(move |r| route.set(r.clone()));
    DESK.with(|d| *d.borrow_mut() = Some(desk.clone()));

    // 3. 解析初始 hash 并开始监听
    listen_hash_change();
    desk.start();

    view! {
        <main id=move || route.get().view_id()>
            {move || route_matcher(route.get())}
        </main>
    }
}
