// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// Endpoints proxy del servidor de la tienda (/api/...). Sin lógica de arranque.
// ============================================================================

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use crate::models::auth::{DevLoginRequest, WechatAuthUrlRequest, WechatAuthUrlResponse};
use crate::models::{AuthCheckResponse, SessionCredential, StoreContext, StoreInfo};
use crate::utils::url::encode_path_segment;

/// Endpoints de backend que consume el arranque
#[async_trait(?Send)]
pub trait BackendApi {
    /// `POST /auth/dev-login {openId, storeContext}`
    async fn dev_login(&self, open_id: &str, context: &StoreContext) -> Result<SessionCredential, String>;

    /// `POST /auth/wechat-auth-url {finalRedirectUri, storeContext}` → authUrl
    async fn wechat_auth_url(&self, final_redirect_uri: &str, context: &StoreContext) -> Result<String, String>;

    /// `GET /auth/check`
    async fn check_auth(&self) -> Result<AuthCheckResponse, String>;

    /// `GET /store/{storeCode}/info`
    async fn fetch_store_info(&self, store_code: &str) -> Result<StoreInfo, String>;
}

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// El código va codificado: un `/` o `?` no puede cambiar la ruta
    fn store_info_url(&self, store_code: &str) -> String {
        format!("{}/store/{}/info", self.base_url, encode_path_segment(store_code))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
        if !response.ok() {
            let status = response.status();
            let error_text = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("HTTP error {}: {}", status, error_text));
        }
        response.json::<T>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }
}

#[async_trait(?Send)]
impl BackendApi for ApiClient {
    async fn dev_login(&self, open_id: &str, context: &StoreContext) -> Result<SessionCredential, String> {
        let url = format!("{}/auth/dev-login", self.base_url);
        let request = DevLoginRequest {
            open_id,
            store_context: context,
        };

        log::info!("🔐 [API] dev-login openId={} tienda={}", open_id, context.store_code);

        let response = Request::post(&url)
            .json(&request)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        Self::read_json::<SessionCredential>(response).await
    }

    async fn wechat_auth_url(&self, final_redirect_uri: &str, context: &StoreContext) -> Result<String, String> {
        let url = format!("{}/auth/wechat-auth-url", self.base_url);
        let request = WechatAuthUrlRequest {
            final_redirect_uri,
            store_context: context,
        };

        log::info!("🔗 [API] Pidiendo URL de autorización WeChat (callback: {})", final_redirect_uri);

        let response = Request::post(&url)
            .json(&request)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        let body = Self::read_json::<WechatAuthUrlResponse>(response).await?;
        if body.auth_url.is_empty() {
            return Err("Empty authUrl in response".to_string());
        }
        Ok(body.auth_url)
    }

    async fn check_auth(&self) -> Result<AuthCheckResponse, String> {
        let url = format!("{}/auth/check", self.base_url);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        Self::read_json::<AuthCheckResponse>(response).await
    }

    async fn fetch_store_info(&self, store_code: &str) -> Result<StoreInfo, String> {
        let url = self.store_info_url(store_code);

        log::info!("🏪 [API] Obteniendo info de tienda: {}", store_code);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Request error: {}", e))?;

        let info = Self::read_json::<StoreInfo>(response).await?;
        log::info!("✅ [API] Tienda obtenida: {} ({})", info.name, info.store_code);
        Ok(info)
    }
}
