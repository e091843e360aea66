use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub mod date;
pub mod protocol;

pub use date::Timestamp;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const PATH_LOGIN: &str = "/auth/login";
pub const PATH_REFRESH: &str = "/auth/refresh";
pub const PATH_REGISTER: &str = "/user/register";
pub const PATH_QR_CODES: &str = "/qr_code/";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// 单个二维码资源路径: `/qr_code/{id}`
pub fn qr_code_path(id: &str) -> String {
    format!("{}{}", PATH_QR_CODES, id)
}

/// 二维码图片路径: `/qr_code/{id}/image`
pub fn qr_image_path(id: &str) -> String {
    format!("{}{}/image", PATH_QR_CODES, id)
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCode {
    pub id: String,
    pub name: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// `/auth/login` 的成功响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 访问令牌有效期（秒）
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// `/auth/refresh` 的成功响应
///
/// 后端一般不轮换 refresh token；若返回了新的则一并保存。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshedToken {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

// =========================================================
// 后端错误体 (Error Body)
// =========================================================

/// 后端非 2xx 响应携带的错误体
///
/// FastAPI 通常返回 `{"detail": "..."}`，校验失败时 `detail` 是数组，
/// 应用自定义错误则是 `{"error_message": "...", "error_code": "..."}`。
/// 无法解析为 JSON 时保留原始文本。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBody(Value);

impl ErrorBody {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// 从响应文本解析
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => Self(value),
            Err(_) => Self(Value::String(text.to_string())),
        }
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// 面向用户的错误描述
    pub fn detail(&self) -> String {
        if let Some(detail) = self.0.get("detail") {
            match detail {
                Value::String(s) => return s.clone(),
                Value::Array(items) => {
                    let msgs: Vec<&str> = items
                        .iter()
                        .filter_map(|item| item.get("msg").and_then(Value::as_str))
                        .collect();
                    if !msgs.is_empty() {
                        return msgs.join("; ");
                    }
                }
                _ => {}
            }
        }

        if let Some(msg) = self.0.get("error_message").and_then(Value::as_str) {
            return msg.to_string();
        }

        match &self.0 {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail())
    }
}
