use std::sync::Arc;

use async_trait::async_trait;
use pc_core::ports::{AuthorizationConnectorPort, ConnectorError};
use pc_core::TenantId;
use serde::Serialize;
use tracing::info;

use super::http::{EdgeFunctionClient, RedirectResponse};

const FUNCTION: &str = "fortnox-auth";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizationBody<'a> {
    tenant_id: &'a str,
}

pub struct HttpAuthorizationConnector {
    client: Arc<EdgeFunctionClient>,
}

impl HttpAuthorizationConnector {
    pub fn new(client: Arc<EdgeFunctionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthorizationConnectorPort for HttpAuthorizationConnector {
    async fn begin_authorization(&self, tenant_id: &TenantId) -> Result<String, ConnectorError> {
        let response: RedirectResponse = self
            .client
            .post_json(
                FUNCTION,
                &AuthorizationBody {
                    tenant_id: tenant_id.inner(),
                },
            )
            .await?;
        let url = response.into_redirect_url()?;
        info!(tenant_id = %tenant_id, "authorization url issued");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::http::tests::client_for;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn posts_tenant_and_returns_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/functions/v1/fortnox-auth")
            .match_body(Matcher::Json(serde_json::json!({ "tenantId": "t-42" })))
            .with_status(200)
            .with_body(r#"{"url":"https://apps.fortnox.se/oauth-v1/auth?state=abc"}"#)
            .create_async()
            .await;

        let connector = HttpAuthorizationConnector::new(Arc::new(client_for(&server, "")));
        let url = connector
            .begin_authorization(&TenantId::from("t-42"))
            .await
            .unwrap();

        assert_eq!(url, "https://apps.fortnox.se/oauth-v1/auth?state=abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/functions/v1/fortnox-auth")
            .with_status(500)
            .with_body(r#"{"error":"upstream failed"}"#)
            .create_async()
            .await;

        let connector = HttpAuthorizationConnector::new(Arc::new(client_for(&server, "")));
        let err = connector
            .begin_authorization(&TenantId::from("t-42"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectorError::Unavailable(ref msg) if msg.contains("upstream failed")));
    }

    #[tokio::test]
    async fn missing_url_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/functions/v1/fortnox-auth")
            .with_status(200)
            .with_body(r#"{}"#)
            .create_async()
            .await;

        let connector = HttpAuthorizationConnector::new(Arc::new(client_for(&server, "")));
        let err = connector
            .begin_authorization(&TenantId::from("t-42"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectorError::Rejected(_)));
    }
}
