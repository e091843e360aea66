use crate::desk;
use crate::web::ViewState;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// 从事件目标向上查找带 `attr` 的元素，返回属性值
fn closest_attr(ev: &leptos::web_sys::MouseEvent, attr: &str) -> Option<String> {
    let target = ev.target()?.dyn_into::<leptos::web_sys::Element>().ok()?;
    let element = target.closest(&format!("[{}]", attr)).ok()??;
    element.get_attribute(attr)
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = use_context::<ViewState>().unwrap_or_default();

    // 行内编辑按钮，事件委托到 tbody
    let on_list_click = move |ev: leptos::web_sys::MouseEvent| {
        let (Some(id), Some(desk)) = (closest_attr(&ev, "data-edit"), desk()) else {
            return;
        };
        desk.ui().open_edit(Some(&id));
    };

    let on_list_hover = move |ev: leptos::web_sys::MouseEvent| {
        let (Some(id), Some(desk)) = (closest_attr(&ev, "data-id"), desk()) else {
            return;
        };
        desk.ui().preview(&id);
    };

    let on_new = move |_| {
        if let Some(desk) = desk() {
            desk.ui().open_edit(None);
        }
    };

    let on_reload = move |_| {
        if let Some(desk) = desk() {
            desk.spawn(|ui| async move { ui.reload_list().await });
        }
    };

    let on_logout = move |_| {
        if let Some(desk) = desk() {
            desk.ui().logout();
        }
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <a class="btn btn-ghost text-xl">"QR Desk"</a>
                    </div>
                    <div class="flex-none gap-2">
                        <button id="btn-new" on:click=on_new class="btn btn-primary">
                            "+ New QR"
                        </button>
                        <button id="btn-logout" on:click=on_logout class="btn btn-outline btn-error">
                            "Logout"
                        </button>
                    </div>
                </div>

                <div class="grid gap-8 md:grid-cols-3">
                    <div class="card bg-base-100 shadow-xl md:col-span-2">
                        <div class="card-body p-0">
                            <div class="flex items-center justify-between p-6 pb-2">
                                <h3 class="card-title">"My QR codes"</h3>
                                <button on:click=on_reload class="btn btn-ghost btn-sm">
                                    "Reload"
                                </button>
                            </div>
                            <div class="overflow-x-auto w-full">
                                <table class="table table-zebra w-full">
                                    <thead>
                                        <tr>
                                            <th>"Name"</th>
                                            <th>"Link"</th>
                                            <th>"QR"</th>
                                            <th></th>
                                        </tr>
                                    </thead>
                                    <tbody
                                        id="list"
                                        on:click=on_list_click
                                        on:mouseover=on_list_hover
                                        inner_html=move || state.list.get()
                                    ></tbody>
                                </table>
                            </div>
                        </div>
                    </div>

                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body items-center">
                            <h3 class="card-title">"Preview"</h3>
                            <div id="preview" inner_html=move || state.preview.get()></div>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
