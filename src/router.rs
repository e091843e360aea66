//! 路由服务 - 核心引擎
//!
//! 实现"监听 -> 验证 -> 处理 -> 通知"的导航流程。
//! 对 `location.hash` 的读写通过 `HashLocation` 注入，守卫只检查令牌是否存在。

use crate::events::{AuthEvent, AuthEvents};
use crate::route::AppRoute;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

/// `window.location.hash` 的抽象
pub trait HashLocation {
    /// 含前导 `#`，为空时返回空串
    fn hash(&self) -> String;

    fn set_hash(&self, hash: &str);
}

type RouteListener = Rc<dyn Fn(&AppRoute)>;

pub struct Router {
    location: Rc<dyn HashLocation>,
    is_authenticated: Rc<dyn Fn() -> bool>,
    current: RefCell<AppRoute>,
    /// 路由器自己写入、尚未收到 hashchange 回声的 hash，按写入顺序排列
    echoes: RefCell<VecDeque<String>>,
    listeners: RefCell<Vec<RouteListener>>,
}

impl Router {
    pub fn new(location: Rc<dyn HashLocation>, is_authenticated: Rc<dyn Fn() -> bool>) -> Self {
        Self {
            location,
            is_authenticated,
            current: RefCell::new(AppRoute::Login),
            echoes: RefCell::new(VecDeque::new()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn current(&self) -> AppRoute {
        self.current.borrow().clone()
    }

    /// 每次解析出路由（包括守卫重定向后的路由）都会通知
    pub fn on_route<F>(&self, listener: F)
    where
        F: Fn(&AppRoute) + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// 页面加载时调用
    pub fn start(&self) {
        let hash = self.location.hash();
        if (self.is_authenticated)() && AppRoute::from_hash(&hash) == AppRoute::Login {
            let entry = hash.trim_start_matches('#');
            if entry.is_empty() || entry == "login" {
                log_info!("[Router] Session found, skipping login");
                self.navigate(AppRoute::auth_success_redirect());
                return;
            }
        }
        self.resolve(&hash);
    }

    /// `hashchange` 回调
    ///
    /// 同一轮事件循环内的多次写入各自产生一个 hashchange，触发时读到的都是最后一次写入的值。
    /// 只要当前 hash 等于最后一次写入，就消耗一个回声；不相等说明地址已被外部修改，丢弃所有回声。
    pub fn handle_hash_change(&self) {
        let hash = self.location.hash();
        {
            let mut echoes = self.echoes.borrow_mut();
            if echoes.back().is_some_and(|last| *last == hash) {
                echoes.pop_front();
                return;
            }
            echoes.clear();
        }
        self.resolve(&hash);
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, route: AppRoute) {
        self.write_hash(&route.to_hash());
        self.apply(route);
    }

    /// 按路由表解析 hash 并执行守卫
    pub fn resolve(&self, hash: &str) {
        self.apply(AppRoute::from_hash(hash));
    }

    /// 登录后进入面板，登出后回到登录页
    pub fn follow_auth_events(self: &Rc<Self>, events: &AuthEvents) {
        let router: Weak<Router> = Rc::downgrade(self);
        events.subscribe(move |event| {
            let Some(router) = router.upgrade() else {
                return;
            };
            match event {
                AuthEvent::Login => {
                    log_info!("[Router] Logged in, redirecting to dashboard");
                    router.navigate(AppRoute::auth_success_redirect());
                }
                AuthEvent::Logout => {
                    log_info!("[Router] Logged out, redirecting to login");
                    router.navigate(AppRoute::auth_failure_redirect());
                }
                AuthEvent::Refresh => {}
            }
        });
    }

    fn apply(&self, route: AppRoute) {
        let route = if route.requires_auth() && !(self.is_authenticated)() {
            log_info!("[Router] {} requires a session, redirecting to login", route);
            let redirect = AppRoute::auth_failure_redirect();
            self.write_hash(&redirect.to_hash());
            redirect
        } else {
            route
        };

        *self.current.borrow_mut() = route.clone();

        let listeners: Vec<RouteListener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&route);
        }
    }

    fn write_hash(&self, hash: &str) {
        if self.location.hash() == hash {
            return;
        }
        self.echoes.borrow_mut().push_back(hash.to_string());
        self.location.set_hash(hash);
    }
}
