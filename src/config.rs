//! 客户端配置
//!
//! 所有字段都有默认值，可从任意 key → value 来源覆盖
//! （浏览器构建中为编译期环境变量与 LocalStorage，测试中为 HashMap）。

use crate::error::ConfigError;
use std::time::Duration;

/// 这些是默认值，如果配置来源中没有定义，则使用这些值
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REFRESH_MARGIN_SECS: u64 = 30;
const DEFAULT_ACCESS_KEY: &str = "access";
const DEFAULT_REFRESH_KEY: &str = "refresh";
const DEFAULT_EXPIRY_KEY: &str = "exp";

pub const ENV_API_BASE: &str = "QRDESK_API_BASE";
pub const ENV_REFRESH_MARGIN_SECS: &str = "QRDESK_REFRESH_MARGIN_SECS";
pub const ENV_ACCESS_KEY: &str = "QRDESK_ACCESS_KEY";
pub const ENV_REFRESH_KEY: &str = "QRDESK_REFRESH_KEY";
pub const ENV_EXPIRY_KEY: &str = "QRDESK_EXPIRY_KEY";

/// 会话在存储中使用的三个键
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub access: String,
    pub refresh: String,
    /// 访问令牌的绝对过期时间（毫秒时间戳）
    pub expiry: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            access: DEFAULT_ACCESS_KEY.to_string(),
            refresh: DEFAULT_REFRESH_KEY.to_string(),
            expiry: DEFAULT_EXPIRY_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 后端地址，不带结尾的 `/`
    pub api_base: String,
    /// 访问令牌在过期前多久主动刷新
    pub refresh_margin: Duration,
    pub keys: StorageKeys,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            refresh_margin: Duration::from_secs(DEFAULT_REFRESH_MARGIN_SECS),
            keys: StorageKeys::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: normalize_base(api_base)?,
            ..Self::default()
        })
    }

    /// 从配置来源读取，缺失的项使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = match lookup(ENV_API_BASE) {
            Some(base) => normalize_base(&base)?,
            None => DEFAULT_API_BASE.to_string(),
        };

        let refresh_margin = match lookup(ENV_REFRESH_MARGIN_SECS) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidNumber {
                        key: ENV_REFRESH_MARGIN_SECS,
                        value: raw.clone(),
                    })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REFRESH_MARGIN_SECS),
        };

        let keys = StorageKeys {
            access: lookup(ENV_ACCESS_KEY).unwrap_or_else(|| DEFAULT_ACCESS_KEY.to_string()),
            refresh: lookup(ENV_REFRESH_KEY).unwrap_or_else(|| DEFAULT_REFRESH_KEY.to_string()),
            expiry: lookup(ENV_EXPIRY_KEY).unwrap_or_else(|| DEFAULT_EXPIRY_KEY.to_string()),
        };

        Ok(Self {
            api_base,
            refresh_margin,
            keys,
        })
    }

    /// 拼接完整 URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base, path)
        } else {
            format!("{}/{}", self.api_base, path)
        }
    }
}

fn normalize_base(raw: &str) -> Result<String, ConfigError> {
    let base = raw.trim().trim_end_matches('/');
    if base.is_empty() || !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_lookup_is_empty() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.refresh_margin, Duration::from_secs(30));
        assert_eq!(config.keys.access, "access");
        assert_eq!(config.keys.refresh, "refresh");
        assert_eq!(config.keys.expiry, "exp");
    }

    #[test]
    fn overrides_and_trims_base() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_API_BASE, "https://qr.example.com/api/ "),
            (ENV_REFRESH_MARGIN_SECS, "45"),
            (ENV_ACCESS_KEY, "qr_access"),
        ]))
        .unwrap();

        assert_eq!(config.api_base, "https://qr.example.com/api");
        assert_eq!(config.refresh_margin, Duration::from_secs(45));
        assert_eq!(config.keys.access, "qr_access");
        assert_eq!(config.keys.refresh, "refresh");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            ClientConfig::new(""),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ClientConfig::new("ftp://example.com"),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup_from(&[(ENV_REFRESH_MARGIN_SECS, "soon")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn url_joins_paths() {
        let config = ClientConfig::new("http://api.test/").unwrap();
        assert_eq!(config.url("/qr_code/"), "http://api.test/qr_code/");
        assert_eq!(config.url("auth/login"), "http://api.test/auth/login");
    }
}
