//! UI 绑定
//!
//! 表单提交、列表渲染、行编辑与预览的交互逻辑。视图更新通过 `UiSurface` 注入，
//! 本模块不接触 DOM。

use crate::auth::AuthClient;
use crate::error::{ClientError, ValidationError};
use crate::qr::QrClient;
use crate::render;
use crate::route::AppRoute;
use crate::router::Router;
use qrdesk_shared::QrCode;
use std::cell::{Cell, RefCell};
use std::rc::Rc;


/// 视图输出端
pub trait UiSurface {
    /// 替换列表 `<tbody>` 的内容
    fn render_list(&self, markup: &str);

    fn render_preview(&self, markup: &str);

    fn fill_edit_form(&self, name: &str, link: &str);

    /// 阻塞式提示
    fn alert(&self, message: &str);
}

/// 当前编辑的二维码 id，`None` 表示新建
#[derive(Debug, Default)]
pub struct EditSession(RefCell<Option<String>>);

impl EditSession {
    pub fn get(&self) -> Option<String> {
        self.0.borrow().clone()
    }

    pub fn set(&self, id: Option<&str>) {
        *self.0.borrow_mut() = id.map(str::to_string);
    }

    pub fn is(&self, id: Option<&str>) -> bool {
        self.0.borrow().as_deref() == id
    }
}

/// 编辑表单的输入，构造时去除首尾空白
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrDraft {
    pub name: String,
    pub link: String,
}

impl QrDraft {
    pub fn new(name: &str, link: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            link: link.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError { field: "name" });
        }
        if self.link.is_empty() {
            return Err(ValidationError { field: "link" });
        }
        Ok(())
    }
}

pub struct UiBindings {
    auth: AuthClient,
    qr: QrClient,
    router: Rc<Router>,
    surface: Rc<dyn UiSurface>,
    edit: EditSession,
    /// 最近一次渲染的行，用于预填编辑表单
    rows: RefCell<Vec<QrCode>>,
    loads_in_flight: Cell<usize>,
}

impl UiBindings {
    pub fn new(
        auth: AuthClient,
        qr: QrClient,
        router: Rc<Router>,
        surface: Rc<dyn UiSurface>,
    ) -> Self {
        Self {
            auth,
            qr,
            router,
            surface,
            edit: EditSession::default(),
            rows: RefCell::new(Vec::new()),
            loads_in_flight: Cell::new(0),
        }
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    pub fn rendered_rows(&self) -> Vec<QrCode> {
        self.rows.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loads_in_flight.get() > 0
    }

    // =========================================================
    // 登录 / 注册 / 登出
    // =========================================================

    /// 成功后的跳转由 `login` 事件驱动
    pub async fn submit_login(&self, username: &str, password: &str) {
        if let Err(e) = self.auth.login(username.trim(), password.trim()).await {
            self.report(&e);
        }
    }

    pub async fn submit_register(&self, username: &str, password: &str) {
        if let Err(e) = self.auth.register(username.trim(), password.trim()).await {
            self.report(&e);
        }
    }

    pub fn logout(&self) {
        self.auth.logout();
    }

    // =========================================================
    // 列表
    // =========================================================

    /// 重新拉取并渲染列表，失败时渲染错误行
    pub async fn reload_list(&self) {
        self.loads_in_flight.set(self.loads_in_flight.get() + 1);
        self.surface.render_list(&render::loading_row());

        match self.qr.list_all().await {
            Ok(codes) if codes.is_empty() => {
                self.surface.render_list(&render::empty_row());
                self.rows.borrow_mut().clear();
            }
            Ok(codes) => {
                let markup = render::qr_rows(&codes, |id| self.qr.image_url(id));
                self.surface.render_list(&markup);
                *self.rows.borrow_mut() = codes;
            }
            Err(e) => {
                log_error!("[Qr] Failed to load list: {}", e);
                self.surface.render_list(&render::error_row(&e.user_message()));
            }
        }

        self.loads_in_flight
            .set(self.loads_in_flight.get().saturating_sub(1));
    }

    pub fn preview(&self, id: &str) {
        self.surface
            .render_preview(&render::preview(&self.qr.image_url(id)));
    }

    // =========================================================
    // 编辑
    // =========================================================

    /// 编辑按钮或"新建"按钮：按已渲染的行预填表单，然后进入编辑页
    pub fn open_edit(&self, id: Option<&str>) {
        self.edit.set(id);
        let (name, link) = id
            .and_then(|id| self.cached(id))
            .map(|code| (code.name, code.link))
            .unwrap_or_default();
        self.surface.fill_edit_form(&name, &link);
        self.router.navigate(AppRoute::Edit {
            id: id.map(str::to_string),
        });
    }

    /// 路由进入编辑页时调用
    ///
    /// 由 `open_edit` 打开的会话保持不变；地址栏直接打开的编辑页会重置会话。
    /// 返回 `true` 表示表单需要通过 `open_deep_link` 异步填充。
    pub fn sync_edit_route(&self, id: Option<&str>) -> bool {
        if self.edit.is(id) {
            return false;
        }
        self.edit.set(id);

        match id {
            None => {
                self.surface.fill_edit_form("", "");
                false
            }
            Some(id) => match self.cached(id) {
                Some(code) => {
                    self.surface.fill_edit_form(&code.name, &code.link);
                    false
                }
                None => true,
            },
        }
    }

    /// 拉取单条记录填充表单
    pub async fn open_deep_link(&self, id: &str) {
        match self.qr.find(id).await {
            Ok(Some(code)) => {
                if self.edit.is(Some(id)) {
                    self.surface.fill_edit_form(&code.name, &code.link);
                }
            }
            Ok(None) => {
                log_warn!("[Qr] {} not found", id);
                self.surface.alert("QR code not found");
            }
            Err(e) => self.report(&e),
        }
    }

    /// 提交编辑表单：按编辑会话决定新建或更新，成功后回到面板
    pub async fn submit_edit(&self, name: &str, link: &str) {
        let draft = QrDraft::new(name, link);
        if let Err(e) = draft.validate() {
            self.report(&e.into());
            return;
        }

        let result = match self.edit.get() {
            Some(id) => self.qr.update(&id, &draft.name, &draft.link).await,
            None => self.qr.create(&draft.name, &draft.link).await,
        };

        match result {
            Ok(_) => self.router.navigate(AppRoute::Dashboard),
            Err(e) => self.report(&e),
        }
    }

    fn cached(&self, id: &str) -> Option<QrCode> {
        self.rows.borrow().iter().find(|c| c.id == id).cloned()
    }

    fn report(&self, err: &ClientError) {
        log_error!("[Ui] {}", err);
        self.surface.alert(&err.user_message());
    }
}
