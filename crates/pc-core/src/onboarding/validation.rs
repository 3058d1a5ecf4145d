//! Local signup form validation.
//!
//! Remote checks (e.g. an already registered organization number) happen at
//! provisioning time and come back as `ProvisioningError::Validation`.

use crate::onboarding::error::OnboardingError;
use crate::onboarding::progress::SignupData;
use crate::security::SecretString;

pub const MIN_CREDENTIAL_LEN: usize = 8;
const REGISTRATION_DIGITS: usize = 10;

/// Raw signup form input as submitted by the welcome step.
#[derive(Debug)]
pub struct SignupForm {
    pub organization_name: String,
    pub registration_number: String,
    pub email: String,
    pub credential: Option<SecretString>,
}

/// Validated signup: the persistable record plus the in-memory credential.
#[derive(Debug)]
pub struct ValidatedSignup {
    pub data: SignupData,
    pub credential: Option<SecretString>,
}

impl SignupForm {
    pub fn validate(self) -> Result<ValidatedSignup, OnboardingError> {
        let organization_name = self.organization_name.trim().to_string();
        if organization_name.is_empty() {
            return Err(OnboardingError::validation(
                "organizationName",
                "organization name is required",
            ));
        }

        let registration_number = normalize_registration_number(&self.registration_number)
            .ok_or_else(|| {
                OnboardingError::validation(
                    "registrationNumber",
                    "registration number must be ten digits (NNNNNN-NNNN)",
                )
            })?;

        let email = normalize_email(&self.email)
            .ok_or_else(|| OnboardingError::validation("email", "email address is invalid"))?;

        let credential = match self.credential {
            Some(secret) if secret.is_empty() => None,
            Some(secret) if secret.len() < MIN_CREDENTIAL_LEN => {
                return Err(OnboardingError::validation(
                    "credential",
                    format!("password must be at least {MIN_CREDENTIAL_LEN} characters"),
                ));
            }
            other => other,
        };

        Ok(ValidatedSignup {
            data: SignupData {
                organization_name,
                registration_number,
                email,
            },
            credential,
        })
    }
}

/// Accepts `NNNNNNNNNN` or `NNNNNN-NNNN` and returns the hyphenated form.
fn normalize_registration_number(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(|c| *c != '-').collect();
    let hyphens = trimmed.chars().filter(|c| *c == '-').count();

    if digits.len() != REGISTRATION_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if hyphens > 1 || (hyphens == 1 && trimmed.find('-') != Some(6)) {
        return None;
    }

    Some(format!("{}-{}", &digits[..6], &digits[6..]))
}

fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_ascii_lowercase();
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return None;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return None;
    }
    Some(email)
}
