//! HTTP 传输
//!
//! 基于 `gloo-net` 的 fetch 封装，实现核心库的 `HttpClient`。

use gloo_net::http::{Request, RequestBuilder};
use qrdesk::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHttpClient;

fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for BrowserHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = builder(req.method, &req.url);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;

        let resp = request
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| HttpError::ResponseRead(e.to_string()))?;

        Ok(HttpResponse::new(status, body))
    }
}
