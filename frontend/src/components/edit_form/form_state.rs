//! 编辑表单状态
//!
//! 两个输入框的 signal 合并为 `FormState`，由核心库通过 `UiSurface::fill_edit_form` 写入，
//! 提交时整体读出。

use leptos::prelude::*;

/// 使用 `RwSignal` 因为它实现了 `Copy`，可以直接放进 Context 与闭包
#[derive(Clone, Copy)]
pub struct FormState {
    pub name: RwSignal<String>,
    pub link: RwSignal<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            link: RwSignal::new(String::new()),
        }
    }

    pub fn fill(&self, name: &str, link: &str) {
        self.name.set(name.to_string());
        self.link.set(link.to_string());
    }

    /// 不建立响应式依赖
    pub fn values(&self) -> (String, String) {
        (self.name.get_untracked(), self.link.get_untracked())
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
