use crate::request::HttpError;
use qrdesk_shared::ErrorBody;
use thiserror::Error;

// =========================================================
// 错误类型
// =========================================================

/// 认证相关失败：缺少令牌、凭据错误、刷新被拒绝
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated")]
    NotAuthenticated,
    /// 后端返回非 2xx，携带解析后的错误体
    #[error("authentication rejected ({status}): {body}")]
    Rejected { status: u16, body: ErrorBody },
}

/// 资源接口的非 2xx 响应
#[derive(Debug, Error)]
#[error("api error ({status}): {body}")]
pub struct ApiError {
    pub status: u16,
    pub body: ErrorBody,
}

/// 表单必填项为空，仅在客户端处理，不会发往后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Both fields required ({field} is empty)")]
pub struct ValidationError {
    pub field: &'static str,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL: {0:?}")]
    InvalidBaseUrl(String),
    #[error("invalid number for {key}: {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// 客户端统一错误
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl ClientError {
    /// 弹窗中展示的文本：优先使用后端给出的 detail
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Auth(AuthError::Rejected { body, .. }) => body.detail(),
            ClientError::Api(e) => e.body.detail(),
            other => other.to_string(),
        }
    }

    /// 后端返回的 HTTP 状态码（如果有）
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Auth(AuthError::Rejected { status, .. }) => Some(*status),
            ClientError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, ClientError::Auth(AuthError::NotAuthenticated))
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_message_uses_backend_detail() {
        let err: ClientError = ApiError {
            status: 404,
            body: ErrorBody::new(json!({"detail": "QR code not found"})),
        }
        .into();
        assert_eq!(err.user_message(), "QR code not found");
        assert_eq!(err.status(), Some(404));

        let err: ClientError = AuthError::Rejected {
            status: 401,
            body: ErrorBody::new(json!({"error_message": "Invalid login or password"})),
        }
        .into();
        assert_eq!(err.user_message(), "Invalid login or password");
    }

    #[test]
    fn user_message_for_local_failures() {
        let err: ClientError = AuthError::NotAuthenticated.into();
        assert!(err.is_not_authenticated());
        assert_eq!(err.user_message(), "not authenticated");

        let err: ClientError = ValidationError { field: "link" }.into();
        assert_eq!(err.user_message(), "Both fields required (link is empty)");
        assert_eq!(err.status(), None);
    }
}
