//! Per-session form tokens guarding the generate and download forms.
//!
//! A new token is minted every time a design is stored, so download buttons
//! rendered for an earlier design are refused instead of silently exporting
//! the newer one.

use std::fmt::{Display, Formatter};

use rand::distr::{Alphanumeric, Distribution};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::warn;

use crate::error::HomeDesignError;

const FORM_TOKEN_KEY: &str = "form_token";
const FORM_TOKEN_LENGTH: usize = 32;

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub(crate) struct FormToken(String);

impl FormToken {
    fn generate() -> Self {
        Self(
            Alphanumeric
                .sample_iter(rand::rng())
                .take(FORM_TOKEN_LENGTH)
                .map(char::from)
                .collect(),
        )
    }

    /// Compares without bailing out at the first differing byte.
    fn matches(&self, submitted: &str) -> bool {
        let expected = self.0.as_bytes();
        let submitted = submitted.as_bytes();
        expected.len() == submitted.len()
            && expected
                .iter()
                .zip(submitted)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl Display for FormToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the session's token, minting one on first visit.
pub(crate) async fn form_token(session: &Session) -> Result<FormToken, HomeDesignError> {
    if let Some(existing) = session.get::<FormToken>(FORM_TOKEN_KEY).await? {
        return Ok(existing);
    }
    rotate_form_token(session).await
}

/// Replaces the session's token; forms rendered before this call are refused.
pub(crate) async fn rotate_form_token(session: &Session) -> Result<FormToken, HomeDesignError> {
    let token = FormToken::generate();
    session.insert(FORM_TOKEN_KEY, token.clone()).await?;
    Ok(token)
}

pub(crate) async fn check_form_token(
    session: &Session,
    submitted: &str,
) -> Result<(), HomeDesignError> {
    match session.get::<FormToken>(FORM_TOKEN_KEY).await? {
        Some(expected) if expected.matches(submitted) => Ok(()),
        Some(_) => {
            warn!("Form submitted with a stale or unknown token");
            Err(HomeDesignError::Unauthorized)
        }
        None => {
            warn!("Form submitted without a session");
            Err(HomeDesignError::Unauthorized)
        }
    }
}
