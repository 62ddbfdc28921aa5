use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Credentials attached to every backend request.
///
/// The token is never logged; the resulting header value is marked
/// sensitive so `reqwest` redacts it in debug output.
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    /// `Authorization: Bearer <token>`.
    Bearer(SecretString),
    /// No credentials. The backend will usually answer 401.
    #[default]
    Anonymous,
}

impl Credentials {
    /// Build credentials from an optional token.
    pub fn from_token(token: Option<SecretString>) -> Self {
        token.map_or(Self::Anonymous, Self::Bearer)
    }

    /// The `Authorization` header value, if any.
    pub fn header_value(&self) -> Result<Option<HeaderValue>, Error> {
        match self {
            Self::Bearer(token) => {
                let raw = format!("Bearer {}", token.expose_secret());
                let mut value = HeaderValue::from_str(&raw)
                    .map_err(|e| Error::InvalidCredentials(format!("invalid token: {e}")))?;
                value.set_sensitive(true);
                Ok(Some(value))
            }
            Self::Anonymous => Ok(None),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_is_sensitive() {
        let creds = Credentials::Bearer(SecretString::from("abc".to_string()));
        let value = creds.header_value().unwrap().unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
    }

    #[test]
    fn anonymous_has_no_header() {
        assert!(Credentials::from_token(None).header_value().unwrap().is_none());
    }

    #[test]
    fn newline_in_token_is_rejected() {
        let creds = Credentials::Bearer(SecretString::from("bad\ntoken".to_string()));
        assert!(matches!(
            creds.header_value(),
            Err(Error::InvalidCredentials(_))
        ));
    }
}
