use crate::auth::AuthClient;
use crate::error::{ApiError, ClientResult};
use crate::request::{HttpMethod, HttpRequest, HttpResponse, encode_pairs};
use qrdesk_shared::protocol::ApiRequest;
use qrdesk_shared::{CONTENT_TYPE_JSON, ErrorBody, HEADER_CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;

// =========================================================
// 请求参数
// =========================================================

/// 单次请求的方法、查询参数、附加头与请求体
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(HttpMethod::Get)
    }
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// 序列化为 JSON 请求体并设置 `Content-Type: application/json`
    pub fn with_json<B: Serialize + ?Sized>(self, body: &B) -> serde_json::Result<Self> {
        let body = serde_json::to_string(body)?;
        let mut options = self.with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        options.body = Some(body);
        Ok(options)
    }
}

// =========================================================
// 通用请求管线
// =========================================================

/// 所有资源接口共用的请求管线
///
/// 负责拼接 URL、经 `AuthClient` 附加令牌、把非 2xx 统一转换为 `ApiError`，
/// 以及 JSON 解码。
#[derive(Clone)]
pub struct ApiClient {
    auth: AuthClient,
}

impl ApiClient {
    pub fn new(auth: AuthClient) -> Self {
        Self { auth }
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// `base + path`，查询参数非空时追加 `?` 与编码后的参数
    pub fn build_url(&self, path: &str, query: &[(String, String)]) -> String {
        let url = self.auth.config().url(path);
        if query.is_empty() {
            url
        } else {
            format!("{}?{}", url, encode_pairs(query))
        }
    }

    /// 发送请求并返回原始响应；非 2xx 转换为 `ApiError`
    pub async fn send(&self, path: &str, options: RequestOptions) -> ClientResult<HttpResponse> {
        let url = self.build_url(path, &options.query);
        let mut req = HttpRequest::new(&url, options.method);
        for (key, value) in &options.headers {
            req = req.with_header(key, value);
        }
        if let Some(body) = options.body {
            req = req.with_body(body);
        }

        let resp = self.auth.authenticated_request(req).await?;
        if !resp.ok() {
            log_warn!(
                "[Api] {} {} failed with status {}",
                options.method.as_str(),
                path,
                resp.status
            );
            return Err(ApiError {
                status: resp.status,
                body: ErrorBody::parse(&resp.body),
            }
            .into());
        }
        Ok(resp)
    }

    /// 204 返回 `None`，其余解码为 `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ClientResult<Option<T>> {
        let resp = self.send(path, options).await?;
        if resp.is_no_content() {
            return Ok(None);
        }
        Ok(Some(resp.json()?))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        self.request(path, RequestOptions::new(HttpMethod::Get)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::new(HttpMethod::Post).with_json(body)?;
        self.request(path, options).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::new(HttpMethod::Put).with_json(body)?;
        self.request(path, options).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        self.request(path, RequestOptions::new(HttpMethod::Delete))
            .await
    }

    /// 执行一个类型化的接口定义
    ///
    /// 无内容响应按 JSON `null` 解码，`R::Response` 为 `()` 或 `Option<_>` 时可正常处理。
    pub async fn call<R: ApiRequest>(&self, request: &R) -> ClientResult<R::Response> {
        let mut options = RequestOptions::new(R::METHOD);
        for (key, value) in request.query() {
            options = options.with_query(key, value);
        }
        if let Some(body) = request.body() {
            options = options.with_json(&body)?;
        }

        let resp = self.send(&request.path(), options).await?;
        if resp.is_no_content() || resp.body.trim().is_empty() {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(resp.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::{AuthHarness, url};
    use qrdesk_shared::QrCode;
    use qrdesk_shared::protocol::ListQrCodes;
    use serde_json::json;
    use std::time::Duration;

    fn api() -> (AuthHarness, ApiClient) {
        let h = AuthHarness::new();
        h.seed_session("A1", "R1", Duration::from_secs(3600));
        let api = ApiClient::new(h.auth.clone());
        (h, api)
    }

    #[test]
    fn builds_url_with_encoded_query() {
        let (_, api) = api();
        assert_eq!(api.build_url("/qr_code/", &[]), url("/qr_code/"));

        let query = vec![
            ("name".to_string(), "a b".to_string()),
            ("link".to_string(), "http://x/?q=1".to_string()),
        ];
        assert_eq!(
            api.build_url("/qr_code/", &query),
            format!("{}?name=a%20b&link=http%3A%2F%2Fx%2F%3Fq%3D1", url("/qr_code/"))
        );
    }

    #[tokio::test]
    async fn get_decodes_json() {
        let (h, api) = api();
        h.http.mock_response(
            HttpMethod::Get,
            &url("/qr_code/"),
            200,
            json!([{"id": "1", "name": "n", "link": "http://x"}]),
        );

        let codes: Option<Vec<QrCode>> = api.get("/qr_code/").await.unwrap();
        assert_eq!(codes.unwrap()[0].id, "1");
        assert_eq!(
            h.http.last_request().unwrap().header("Authorization"),
            Some("Bearer A1")
        );
    }

    #[tokio::test]
    async fn no_content_yields_none() {
        let (h, api) = api();
        h.http
            .mock_text(HttpMethod::Delete, &url("/qr_code/1"), 204, "");

        let resp: Option<serde_json::Value> = api.delete("/qr_code/1").await.unwrap();
        assert_eq!(resp, None);
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let (h, api) = api();
        h.http
            .mock_response(HttpMethod::Post, &url("/things"), 201, json!({"ok": true}));

        let resp: Option<serde_json::Value> =
            api.post("/things", &json!({"a": 1})).await.unwrap();
        assert_eq!(resp, Some(json!({"ok": true})));

        let req = h.http.last_request().unwrap();
        assert_eq!(req.header("content-type"), Some(CONTENT_TYPE_JSON));
        assert_eq!(req.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[tokio::test]
    async fn non_success_becomes_api_error() {
        let (h, api) = api();
        h.http.mock_response(
            HttpMethod::Put,
            &url("/qr_code/9"),
            404,
            json!({"detail": "QR code not found"}),
        );

        let err = api
            .send("/qr_code/9", RequestOptions::new(HttpMethod::Put))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api(ApiError { status: 404, .. })));
        assert_eq!(err.user_message(), "QR code not found");
    }

    #[tokio::test]
    async fn raw_error_payload_is_kept() {
        let (h, api) = api();
        h.http
            .mock_text(HttpMethod::Get, &url("/qr_code/"), 500, "Internal Server Error");

        let err = api.call(&ListQrCodes).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_message(), "Internal Server Error");
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let (h, api) = api();
        h.http
            .mock_text(HttpMethod::Get, &url("/qr_code/"), 200, "not json");

        let err = api.call(&ListQrCodes).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn unauthenticated_call_sends_nothing() {
        let h = AuthHarness::new();
        let api = ApiClient::new(h.auth.clone());

        let err = api.call(&ListQrCodes).await.unwrap_err();
        assert!(err.is_not_authenticated());
        assert!(h.http.requests.borrow().is_empty());
    }
}
