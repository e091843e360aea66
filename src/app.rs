//! 应用装配
//!
//! `Desk` 把各个客户端、路由与 UI 绑定组装在一起，并完成事件订阅：
//! - 登录/登出事件驱动路由跳转（见 `Router::follow_auth_events`）
//! - 进入面板时重新加载列表
//! - 进入编辑页时同步编辑会话
//! - 令牌刷新后，若停留在面板且没有正在进行的加载，则重新加载列表

use crate::api::ApiClient;
use crate::auth::AuthClient;
use crate::clock::Clock;
use crate::config::ClientConfig;
use crate::events::AuthEvent;
use crate::qr::QrClient;
use crate::request::HttpClient;
use crate::route::AppRoute;
use crate::router::{HashLocation, Router};
use crate::session::SessionStore;
use crate::ui::{UiBindings, UiSurface};
use futures::future::LocalBoxFuture;
use std::rc::{Rc, Weak};


/// 后台任务调度，浏览器中为 `spawn_local`
pub trait Spawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// 平台相关能力
pub struct Platform {
    pub http: Rc<dyn HttpClient>,
    pub store: Rc<dyn SessionStore>,
    pub clock: Rc<dyn Clock>,
    pub location: Rc<dyn HashLocation>,
    pub surface: Rc<dyn UiSurface>,
    pub spawner: Rc<dyn Spawner>,
}

pub struct Desk {
    config: Rc<ClientConfig>,
    auth: AuthClient,
    router: Rc<Router>,
    ui: Rc<UiBindings>,
    spawner: Rc<dyn Spawner>,
}

impl Desk {
    pub fn new(config: ClientConfig, platform: Platform) -> Rc<Self> {
        let config = Rc::new(config);
        let auth = AuthClient::new(
            config.clone(),
            platform.http,
            platform.store,
            platform.clock,
        );
        let qr = QrClient::new(ApiClient::new(auth.clone()));

        let session = auth.clone();
        let router = Rc::new(Router::new(
            platform.location,
            Rc::new(move || session.is_logged_in()),
        ));
        let ui = Rc::new(UiBindings::new(
            auth.clone(),
            qr,
            router.clone(),
            platform.surface,
        ));

        let desk = Rc::new(Self {
            config,
            auth,
            router,
            ui,
            spawner: platform.spawner,
        });
        desk.wire();
        desk
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn router(&self) -> &Rc<Router> {
        &self.router
    }

    pub fn ui(&self) -> &Rc<UiBindings> {
        &self.ui
    }

    /// 页面加载完成后调用一次
    pub fn start(&self) {
        log_info!("[Desk] Starting against {}", self.config.api_base);
        self.router.start();
    }

    pub fn handle_hash_change(&self) {
        self.router.handle_hash_change();
    }

    /// 在调度器上运行一个 UI 操作
    pub fn spawn<F, Fut>(&self, action: F)
    where
        F: FnOnce(Rc<UiBindings>) -> Fut,
        Fut: std::future::Future<Output = ()> + 'static,
    {
        self.spawner.spawn(Box::pin(action(self.ui.clone())));
    }

    fn wire(&self) {
        self.router.follow_auth_events(self.auth.events());

        let ui: Weak<UiBindings> = Rc::downgrade(&self.ui);
        let spawner = self.spawner.clone();
        self.router.on_route(move |route| {
            let Some(ui) = ui.upgrade() else {
                return;
            };
            match route {
                AppRoute::Dashboard => {
                    spawner.spawn(Box::pin(async move { ui.reload_list().await }));
                }
                AppRoute::Edit { id } => {
                    if !ui.sync_edit_route(id.as_deref()) {
                        return;
                    }
                    if let Some(id) = id.clone() {
                        spawner.spawn(Box::pin(async move { ui.open_deep_link(&id).await }));
                    }
                }
                AppRoute::Login | AppRoute::Register => {}
            }
        });

        let ui: Weak<UiBindings> = Rc::downgrade(&self.ui);
        let router: Weak<Router> = Rc::downgrade(&self.router);
        let spawner = self.spawner.clone();
        self.auth.events().subscribe(move |event| {
            if event != AuthEvent::Refresh {
                return;
            }
            let (Some(ui), Some(router)) = (ui.upgrade(), router.upgrade()) else {
                return;
            };
            if router.current() == AppRoute::Dashboard && !ui.is_loading() {
                spawner.spawn(Box::pin(async move { ui.reload_list().await }));
            }
        });
    }
}
