mod form_state;

pub use form_state::FormState;

use crate::desk;
use crate::web::ViewState;
use leptos::prelude::*;

/// 新建与编辑共用的表单，是否为编辑由核心库的编辑会话决定
#[component]
pub fn EditForm() -> impl IntoView {
    let form = use_context::<ViewState>().unwrap_or_default().form;
    let is_submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(desk) = desk() else {
            return;
        };

        let (name, link) = form.values();
        is_submitting.set(true);
        desk.spawn(move |ui| async move {
            ui.submit_edit(&name, &link).await;
            is_submitting.set(false);
        });
    };

    // 进入编辑页之前编辑会话已经确定
    let title = match desk().and_then(|desk| desk.ui().edit_session().get()) {
        Some(_) => "Edit QR code",
        None => "New QR code",
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <h1 class="text-3xl font-bold">{title}</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form id="editForm" class="card-body" on:submit=on_submit>
                        <div class="form-control">
                            <label class="label" for="edit-name">
                                <span class="label-text">"Name"</span>
                            </label>
                            <input
                                id="edit-name"
                                type="text"
                                on:input=move |ev| form.name.set(event_target_value(&ev))
                                prop:value=form.name
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="edit-link">
                                <span class="label-text">"Link"</span>
                            </label>
                            <input
                                id="edit-link"
                                type="url"
                                placeholder="https://"
                                on:input=move |ev| form.link.set(event_target_value(&ev))
                                prop:value=form.link
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6 flex-row gap-2">
                            <a class="btn btn-ghost" href="#dash">"Cancel"</a>
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                "Save"
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
