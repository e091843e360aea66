//! 认证事件广播
//!
//! 替代全局事件总线：Router 与列表视图通过订阅感知登录、登出与刷新。

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    Login,
    Logout,
    Refresh,
}

impl AuthEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::Login => "login",
            AuthEvent::Logout => "logout",
            AuthEvent::Refresh => "refresh",
        }
    }
}

impl fmt::Display for AuthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Listener = Rc<dyn Fn(AuthEvent)>;

/// 订阅中心，Clone 后共享同一组监听者
///
/// 监听者与应用同生命周期，不提供退订；需要随对象释放的监听者持有 `Weak`。
#[derive(Clone, Default)]
pub struct AuthEvents {
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl AuthEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(AuthEvent) + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// 按订阅顺序同步通知
    ///
    /// 先复制监听者列表再调用，监听者内部可以再次订阅或触发事件。
    pub fn emit(&self, event: AuthEvent) {
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn delivers_in_subscription_order() {
        let events = AuthEvents::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = log.clone();
        events.subscribe(move |e| l1.borrow_mut().push(format!("a:{}", e)));
        let l2 = log.clone();
        events.subscribe(move |e| l2.borrow_mut().push(format!("b:{}", e)));

        events.emit(AuthEvent::Login);
        events.emit(AuthEvent::Logout);

        assert_eq!(
            *log.borrow(),
            vec!["a:login", "b:login", "a:logout", "b:logout"]
        );
    }

    #[test]
    fn clones_share_listeners() {
        let events = AuthEvents::new();
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        events.clone().subscribe(move |_| *h.borrow_mut() += 1);

        events.emit(AuthEvent::Refresh);
        events.clone().emit(AuthEvent::Login);

        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn listener_may_emit_reentrantly() {
        let events = AuthEvents::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner = events.clone();
        let l = log.clone();
        events.subscribe(move |e| {
            l.borrow_mut().push(e);
            if e == AuthEvent::Refresh {
                inner.emit(AuthEvent::Logout);
            }
        });

        events.emit(AuthEvent::Refresh);
        assert_eq!(*log.borrow(), vec![AuthEvent::Refresh, AuthEvent::Logout]);
    }
}
