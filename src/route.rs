use std::fmt;

/// 视图路由表
///
/// 由 `location.hash` 解析得到，`?` 之后只识别 `id` 参数（仅编辑页使用）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Login,
    Register,
    Dashboard,
    Edit { id: Option<String> },
}

impl AppRoute {
    /// 未识别的 hash 一律回落到登录页
    pub fn from_hash(hash: &str) -> Self {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        let (name, query) = match hash.split_once('?') {
            Some((name, query)) => (name, Some(query)),
            None => (hash, None),
        };

        match name {
            "" | "login" => AppRoute::Login,
            "reg" => AppRoute::Register,
            "dash" => AppRoute::Dashboard,
            "edit" => AppRoute::Edit {
                id: query.and_then(id_param),
            },
            _ => AppRoute::Login,
        }
    }

    pub fn to_hash(&self) -> String {
        match self {
            AppRoute::Login => "#login".to_string(),
            AppRoute::Register => "#reg".to_string(),
            AppRoute::Dashboard => "#dash".to_string(),
            AppRoute::Edit { id: None } => "#edit".to_string(),
            AppRoute::Edit { id: Some(id) } => {
                format!("#edit?id={}", urlencoding::encode(id))
            }
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, AppRoute::Dashboard | AppRoute::Edit { .. })
    }

    /// 未登录访问受保护页面时的去向
    pub fn auth_failure_redirect() -> Self {
        AppRoute::Login
    }

    /// 已登录时打开登录页的去向
    pub fn auth_success_redirect() -> Self {
        AppRoute::Dashboard
    }

    /// 对应页面容器的 DOM id
    pub fn view_id(&self) -> &'static str {
        match self {
            AppRoute::Login => "view-login",
            AppRoute::Register => "view-reg",
            AppRoute::Dashboard => "view-dash",
            AppRoute::Edit { .. } => "view-edit",
        }
    }

    pub fn edit_id(&self) -> Option<&str> {
        match self {
            AppRoute::Edit { id } => id.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hash())
    }
}

fn id_param(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "id")
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|value| !value.is_empty())
}
