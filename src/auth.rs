//! 认证模块
//!
//! 负责登录、注册、令牌刷新与登出，并为外发请求附加有效的 Bearer 令牌。
//! 状态变化通过 `AuthEvents` 广播，Router 与列表视图各自订阅。

use crate::clock::Clock;
use crate::config::ClientConfig;
use crate::error::{AuthError, ClientResult};
use crate::events::{AuthEvent, AuthEvents};
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse, encode_pairs};
use crate::session::{SessionStore, TokenStore};
use qrdesk_shared::{
    CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, Credentials, ErrorBody, HEADER_CONTENT_TYPE,
    PATH_LOGIN, PATH_REFRESH, PATH_REGISTER, RefreshedToken, TokenPair,
};
use std::rc::Rc;


#[derive(Clone)]
pub struct AuthClient {
    config: Rc<ClientConfig>,
    http: Rc<dyn HttpClient>,
    tokens: TokenStore,
    clock: Rc<dyn Clock>,
    events: AuthEvents,
}

impl AuthClient {
    pub fn new(
        config: Rc<ClientConfig>,
        http: Rc<dyn HttpClient>,
        store: Rc<dyn SessionStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let tokens = TokenStore::new(store, config.keys.clone());
        Self {
            config,
            http,
            tokens,
            clock,
            events: AuthEvents::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// 仅检查访问令牌是否存在，不校验有效期
    pub fn is_logged_in(&self) -> bool {
        self.tokens.access_token().is_some()
    }

    /// 表单方式提交凭据，成功后保存令牌并广播 `login`
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<TokenPair> {
        let req = HttpRequest::new(&self.config.url(PATH_LOGIN), HttpMethod::Post)
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_FORM)
            .with_body(encode_pairs(&[("username", username), ("password", password)]));

        let resp = self.http.send(req).await?;
        if !resp.ok() {
            log_warn!("[Auth] Login rejected with status {}", resp.status);
            return Err(rejected(&resp).into());
        }

        let pair: TokenPair = resp.json()?;
        self.tokens.save_pair(&pair, self.clock.now());
        log_info!("[Auth] Logged in as {}", username);
        self.events.emit(AuthEvent::Login);
        Ok(pair)
    }

    /// JSON 方式注册，成功后用同一组凭据自动登录
    pub async fn register(&self, username: &str, password: &str) -> ClientResult<TokenPair> {
        let body = serde_json::to_string(&Credentials::new(username, password))?;
        let req = HttpRequest::new(&self.config.url(PATH_REGISTER), HttpMethod::Post)
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .with_body(body);

        let resp = self.http.send(req).await?;
        if !resp.ok() {
            log_warn!("[Auth] Registration rejected with status {}", resp.status);
            return Err(rejected(&resp).into());
        }

        log_info!("[Auth] Registered {}, logging in", username);
        self.login(username, password).await
    }

    /// 用 refresh token 换取新的访问令牌
    ///
    /// 后端拒绝时 refresh token 视为永久失效：清空会话并广播 `logout`。
    /// 网络错误直接向上传递，不清空会话。
    pub async fn refresh(&self) -> ClientResult<String> {
        let Some(refresh_token) = self.tokens.refresh_token() else {
            return Err(AuthError::NotAuthenticated.into());
        };

        let req = HttpRequest::new(&self.config.url(PATH_REFRESH), HttpMethod::Post)
            .with_bearer(&refresh_token);

        let resp = self.http.send(req).await?;
        if !resp.ok() {
            log_warn!(
                "[Auth] Refresh rejected with status {}, clearing session",
                resp.status
            );
            let err = rejected(&resp);
            self.logout();
            return Err(err.into());
        }

        let token: RefreshedToken = resp.json()?;
        self.tokens.save_refreshed(&token, self.clock.now());
        log_info!("[Auth] Access token refreshed");
        self.events.emit(AuthEvent::Refresh);
        Ok(token.access_token)
    }

    /// 同步清空会话并广播 `logout`，不发起网络请求
    pub fn logout(&self) {
        self.tokens.clear();
        log_info!("[Auth] Logged out");
        self.events.emit(AuthEvent::Logout);
    }

    /// 附带 Bearer 令牌发送请求
    ///
    /// 1. 令牌临近过期时先尝试一次主动刷新，失败则忽略并继续使用旧令牌
    /// 2. 响应 401 时强制刷新一次并重试一次，刷新失败直接返回错误
    /// 3. 响应原样返回，不解析响应体
    pub async fn authenticated_request(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let token = self.ensure_access().await?;
        let resp = self
            .http
            .send(request.clone().with_bearer(&token))
            .await?;

        if !resp.is_unauthorized() {
            return Ok(resp);
        }

        log_info!("[Auth] 401 from {}, forcing refresh", request.url);
        let token = self.refresh().await?;
        Ok(self.http.send(request.with_bearer(&token)).await?)
    }

    async fn ensure_access(&self) -> ClientResult<String> {
        let Some(token) = self.tokens.access_token() else {
            return Err(AuthError::NotAuthenticated.into());
        };

        if self
            .tokens
            .expires_within(self.clock.now(), self.config.refresh_margin)
        {
            match self.refresh().await {
                Ok(fresh) => return Ok(fresh),
                Err(e) => log_warn!("[Auth] Early refresh failed, using current token: {}", e),
            }
        }

        Ok(token)
    }
}

fn rejected(resp: &HttpResponse) -> AuthError {
    AuthError::Rejected {
        status: resp.status,
        body: ErrorBody::parse(&resp.body),
    }
}
