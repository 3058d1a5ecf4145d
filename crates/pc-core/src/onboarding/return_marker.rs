//! Return-URL decoding.
//!
//! The only place where untyped query parameters are read. Everything after
//! this point works on `ReturnMarker`.

use std::collections::HashMap;

use url::form_urlencoded;

use crate::onboarding::step::{ConnectorKind, OnboardingStep};

pub const PAYMENT_PARAM: &str = "payment";
pub const PAYMENT_SESSION_PARAM: &str = "session_id";
pub const AUTHORIZATION_PARAM: &str = "fortnox";
pub const TENANT_REFERENCE_PARAM: &str = "tenant";
pub const ERROR_PARAM: &str = "error";
pub const ERROR_DESCRIPTION_PARAM: &str = "error_description";

pub const PAYMENT_CANCELLED_CODE: &str = "payment_cancelled";
pub const MISSING_TENANT_REFERENCE_CODE: &str = "missing_tenant_reference";
pub const UNSPECIFIED_ERROR_CODE: &str = "unspecified";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnPayload {
    Payment { session_id: Option<String> },
    Authorization { account_ref: String },
}

/// Closed set of things a return URL can tell the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnMarker {
    None,
    Success {
        step: OnboardingStep,
        payload: ReturnPayload,
    },
    Error {
        step: OnboardingStep,
        connector: ConnectorKind,
        code: String,
        description: Option<String>,
    },
}

impl ReturnMarker {
    /// Decode a full URL (`https://app/onboarding?payment=success`) or a bare
    /// query string (`?payment=success`, `payment=success`).
    pub fn from_return_url(return_url: &str) -> Self {
        let without_fragment = return_url.split('#').next().unwrap_or_default();
        let query = match without_fragment.split_once('?') {
            Some((_, query)) => query,
            None if without_fragment.contains('=') => without_fragment,
            None => "",
        };
        Self::from_query_pairs(form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    pub fn from_query_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        // First occurrence wins for repeated keys.
        let mut params: HashMap<String, String> = HashMap::new();
        for (key, value) in pairs {
            params.entry(key).or_insert(value);
        }
        let get = |key: &str| {
            params
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        if let Some(payment) = get(PAYMENT_PARAM) {
            match payment.as_str() {
                "success" => {
                    return Self::Success {
                        step: OnboardingStep::Plan,
                        payload: ReturnPayload::Payment {
                            session_id: get(PAYMENT_SESSION_PARAM),
                        },
                    }
                }
                "cancelled" | "canceled" => {
                    return Self::Error {
                        step: OnboardingStep::Plan,
                        connector: ConnectorKind::Checkout,
                        code: PAYMENT_CANCELLED_CODE.to_string(),
                        description: None,
                    }
                }
                _ => {}
            }
        }

        let authorization_error = |code: Option<String>| Self::Error {
            step: OnboardingStep::Fortnox,
            connector: ConnectorKind::Authorization,
            code: code.unwrap_or_else(|| UNSPECIFIED_ERROR_CODE.to_string()),
            description: get(ERROR_DESCRIPTION_PARAM),
        };

        match get(AUTHORIZATION_PARAM).as_deref() {
            Some("success") => match get(TENANT_REFERENCE_PARAM) {
                Some(account_ref) => Self::Success {
                    step: OnboardingStep::Fortnox,
                    payload: ReturnPayload::Authorization { account_ref },
                },
                None => authorization_error(Some(MISSING_TENANT_REFERENCE_CODE.to_string())),
            },
            Some("error") => authorization_error(get(ERROR_PARAM)),
            _ => match get(ERROR_PARAM) {
                Some(code) => authorization_error(Some(code)),
                None => Self::None,
            },
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Step whose connector produced this marker.
    pub fn step(&self) -> Option<OnboardingStep> {
        match self {
            Self::None => None,
            Self::Success { step, .. } | Self::Error { step, .. } => Some(*step),
        }
    }
}
