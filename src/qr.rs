//! 二维码资源
//!
//! 所有调用都经 `ApiClient::call` 走同一条请求管线。

use crate::api::ApiClient;
use crate::error::ClientResult;
use qrdesk_shared::protocol::{CreateQrCode, ListQrCodes, UpdateQrCode};
use qrdesk_shared::{QrCode, qr_image_path};


#[derive(Clone)]
pub struct QrClient {
    api: ApiClient,
}

impl QrClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// 按后端返回的顺序，不做排序
    pub async fn list_all(&self) -> ClientResult<Vec<QrCode>> {
        self.api.call(&ListQrCodes).await
    }

    pub async fn create(&self, name: &str, link: &str) -> ClientResult<QrCode> {
        let code = self
            .api
            .call(&CreateQrCode {
                name: name.to_string(),
                link: link.to_string(),
            })
            .await?;
        log_info!("[Qr] Created {}", code.id);
        Ok(code)
    }

    pub async fn update(&self, id: &str, name: &str, link: &str) -> ClientResult<QrCode> {
        let code = self
            .api
            .call(&UpdateQrCode {
                id: id.to_string(),
                name: name.to_string(),
                link: link.to_string(),
            })
            .await?;
        log_info!("[Qr] Updated {}", code.id);
        Ok(code)
    }

    /// 后端没有单条查询接口，重新拉取列表后按 id 查找
    pub async fn find(&self, id: &str) -> ClientResult<Option<QrCode>> {
        Ok(self.list_all().await?.into_iter().find(|c| c.id == id))
    }

    /// 图片地址，由浏览器 `<img>` 直接加载
    pub fn image_url(&self, id: &str) -> String {
        self.api.auth().config().url(&qr_image_path(id))
    }
}
