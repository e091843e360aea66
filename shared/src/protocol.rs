use crate::{PATH_QR_CODES, QrCode, qr_code_path};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Paths may embed resource ids, so they are computed per request rather than
/// fixed as associated constants.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The URL path relative to the API base.
    fn path(&self) -> String;

    /// Query string parameters, in order.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Optional JSON body.
    fn body(&self) -> Option<serde_json::Value> {
        None
    }
}

// =========================================================
// Request Definitions
// =========================================================

/// List all QR codes owned by the current user
#[derive(Debug, Clone, Default)]
pub struct ListQrCodes;

impl ApiRequest for ListQrCodes {
    type Response = Vec<QrCode>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        PATH_QR_CODES.to_string()
    }
}

/// Create a QR code. The backend reads `name` and `link` from the query string.
#[derive(Debug, Clone)]
pub struct CreateQrCode {
    pub name: String,
    pub link: String,
}

impl ApiRequest for CreateQrCode {
    type Response = QrCode;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        PATH_QR_CODES.to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone()), ("link", self.link.clone())]
    }
}

/// Update an existing QR code, same query-string convention as create.
#[derive(Debug, Clone)]
pub struct UpdateQrCode {
    pub id: String,
    pub name: String,
    pub link: String,
}

impl ApiRequest for UpdateQrCode {
    type Response = QrCode;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        qr_code_path(&self.id)
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone()), ("link", self.link.clone())]
    }
}
