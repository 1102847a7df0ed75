use serde::{Deserialize, Serialize};

fn default_role() -> String {
    "user".to_string()
}

/// Credencial de sesión obtenida tras un login correcto
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionCredential {
    pub token: String,
    pub user_id: i64,
    pub open_id: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl SessionCredential {
    /// Una credencial sin token no cuenta como sesión
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Resultado de un intento de login (exactamente una variante por intento)
#[derive(Clone, PartialEq, Debug)]
pub enum LoginOutcome {
    Success { credential: SessionCredential },
    RedirectRequired { url: String },
    Failure { reason: String },
}

impl LoginOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        LoginOutcome::Failure {
            reason: reason.into(),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DevLoginRequest<'a> {
    pub open_id: &'a str,
    pub store_context: &'a crate::models::StoreContext,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WechatAuthUrlRequest<'a> {
    pub final_redirect_uri: &'a str,
    pub store_context: &'a crate::models::StoreContext,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WechatAuthUrlResponse {
    pub auth_url: String,
}

/// Respuesta del endpoint GET de comprobación de sesión
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct AuthCheckResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_defaults_role_when_missing() {
        let credential: SessionCredential =
            serde_json::from_str(r#"{"token":"t1","userId":1,"openId":"o1"}"#).unwrap();

        assert_eq!(credential.role, "user");
        assert_eq!(credential.name, None);
        assert!(credential.is_valid());
    }

    #[test]
    fn empty_token_is_not_a_session() {
        let credential = SessionCredential {
            token: String::new(),
            user_id: 1,
            open_id: "o1".to_string(),
            role: "user".to_string(),
            name: None,
            avatar_url: None,
        };
        assert!(!credential.is_valid());
    }

    #[test]
    fn check_response_parses_rfc3339_timestamp() {
        let response: AuthCheckResponse = serde_json::from_str(
            r#"{"success":true,"message":"Auth check passed","timestamp":"2025-05-15T10:00:00.000Z"}"#,
        )
        .unwrap();
        assert!(response.success);
        assert!(response.timestamp.is_some());
    }
}
