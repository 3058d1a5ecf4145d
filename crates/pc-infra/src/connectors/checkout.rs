use std::sync::Arc;

use async_trait::async_trait;
use pc_core::ports::{CheckoutConnectorPort, CheckoutRequest, ConnectorError};
use serde::Serialize;
use tracing::info;

use super::http::{EdgeFunctionClient, RedirectResponse};

const FUNCTION: &str = "create-checkout-session";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutBody<'a> {
    email: &'a str,
    organization_name: &'a str,
    registration_number: &'a str,
    price_id: &'a str,
    success_url: &'a str,
    cancel_url: &'a str,
}

impl<'a> From<&'a CheckoutRequest> for CheckoutBody<'a> {
    fn from(request: &'a CheckoutRequest) -> Self {
        Self {
            email: &request.signup.email,
            organization_name: &request.signup.organization_name,
            registration_number: &request.signup.registration_number,
            price_id: &request.plan_id,
            success_url: &request.success_url,
            cancel_url: &request.cancel_url,
        }
    }
}

pub struct HttpCheckoutConnector {
    client: Arc<EdgeFunctionClient>,
}

impl HttpCheckoutConnector {
    pub fn new(client: Arc<EdgeFunctionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CheckoutConnectorPort for HttpCheckoutConnector {
    async fn begin_checkout(&self, request: &CheckoutRequest) -> Result<String, ConnectorError> {
        let response: RedirectResponse = self
            .client
            .post_json(FUNCTION, &CheckoutBody::from(request))
            .await?;
        let url = response.into_redirect_url()?;
        info!(price_id = %request.plan_id, "checkout session created");
        Ok(url)
    }
}
