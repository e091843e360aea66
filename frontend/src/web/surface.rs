//! 视图输出端
//!
//! 核心库产出的 HTML 片段与表单值写入 signal，由 Leptos 组件渲染。

use crate::components::edit_form::FormState;
use leptos::prelude::*;
use qrdesk::UiSurface;

/// 各页面共享的视图状态，通过 Context 提供
#[derive(Clone, Copy)]
pub struct ViewState {
    /// 列表 `<tbody>` 的内容
    pub list: RwSignal<String>,
    pub preview: RwSignal<String>,
    pub form: FormState,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            list: RwSignal::new(String::new()),
            preview: RwSignal::new(String::new()),
            form: FormState::new(),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BrowserSurface {
    state: ViewState,
}

impl BrowserSurface {
    pub fn new(state: ViewState) -> Self {
        Self { state }
    }
}

impl UiSurface for BrowserSurface {
    fn render_list(&self, markup: &str) {
        self.state.list.set(markup.to_string());
    }

    fn render_preview(&self, markup: &str) {
        self.state.preview.set(markup.to_string());
    }

    fn fill_edit_form(&self, name: &str, link: &str) {
        self.state.form.fill(name, link);
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
