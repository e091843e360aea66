use crate::desk;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Sign in",
            AuthMode::Register => "Create account",
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    /// 切换到另一种模式的链接
    fn switch_link(self) -> (&'static str, &'static str) {
        match self {
            AuthMode::Login => ("#reg", "No account? Register"),
            AuthMode::Register => ("#login", "Already registered? Login"),
        }
    }
}

/// 登录 / 注册页，成功后的跳转由认证事件驱动
#[component]
pub fn AuthPage(mode: AuthMode) -> impl IntoView {
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(desk) = desk() else {
            return;
        };

        let user = username.get_untracked();
        let pass = password.get_untracked();
        is_submitting.set(true);
        desk.spawn(move |ui| async move {
            match mode {
                AuthMode::Login => ui.submit_login(&user, &pass).await,
                AuthMode::Register => ui.submit_register(&user, &pass).await,
            }
            is_submitting.set(false);
        });
    };

    let (switch_href, switch_text) = mode.switch_link();
    let form_id = match mode {
        AuthMode::Login => "loginForm",
        AuthMode::Register => "regForm",
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">{mode.title()}</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form id=form_id class="card-body" on:submit=on_submit>
                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                name="username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                name="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> }.into_any()
                                } else {
                                    mode.submit_label().into_any()
                                }}
                            </button>
                        </div>
                        <a class="link link-hover text-sm" href=switch_href>{switch_text}</a>
                    </form>
                </div>
            </div>
        </div>
    }
}
