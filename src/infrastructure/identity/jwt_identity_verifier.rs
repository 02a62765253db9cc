use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::application::ports::{AuthError, IdentityVerifier};
use crate::domain::SubjectId;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Verifies bearer JWTs signed with a shared HMAC secret or an RSA public key.
pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    pub fn from_secret(secret: &str) -> Self {
        Self::with_key(DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
    }

    pub fn from_rsa_pem(pem: &str) -> Result<Self, AuthError> {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| AuthError::InvalidCredential(format!("public key: {}", e)))?;
        Ok(Self::with_key(key, Algorithm::RS256))
    }

    fn with_key(decoding_key: DecodingKey, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            decoding_key,
            validation,
        }
    }

    pub fn with_issuer(mut self, issuer: Option<&str>) -> Self {
        if let Some(issuer) = issuer.filter(|i| !i.is_empty()) {
            self.validation.set_issuer(&[issuer]);
        }
        self
    }

    pub fn with_audience(mut self, audience: Option<&str>) -> Self {
        if let Some(audience) = audience.filter(|a| !a.is_empty()) {
            self.validation.set_audience(&[audience]);
            self.validation.validate_aud = true;
        }
        self
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<SubjectId, AuthError> {
        let data = decode::<Claims>(credential, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidCredential(e.to_string()),
            },
        )?;

        let subject = data.claims.sub.trim();
        if subject.is_empty() {
            return Err(AuthError::InvalidCredential("empty subject".to_string()));
        }

        Ok(SubjectId::new(subject))
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    use super::*;

    const SECRET: &str = "test-secret-key-32-bytes-long!!!";

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        exp: i64,
        iss: &'a str,
    }

    fn token(sub: &str, exp_offset_secs: i64, iss: &str) -> String {
        let claims = TestClaims {
            sub,
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
            iss,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn valid_token_yields_subject() {
        let verifier = JwtIdentityVerifier::from_secret(SECRET);

        let subject = verifier.verify(&token("user-1", 3600, "x")).await.unwrap();

        assert_eq!(subject.as_str(), "user-1");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let verifier = JwtIdentityVerifier::from_secret(SECRET);

        let result = verifier.verify(&token("user-1", -3600, "x")).await;

        assert!(matches!(result, Err(AuthError::Expired)));
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let verifier = JwtIdentityVerifier::from_secret("another-secret-entirely-000000000");

        let result = verifier.verify(&token("user-1", 3600, "x")).await;

        assert!(matches!(result, Err(AuthError::InvalidCredential(_))));
    }

    #[tokio::test]
    async fn issuer_mismatch_is_rejected() {
        let verifier = JwtIdentityVerifier::from_secret(SECRET).with_issuer(Some("expected"));

        let result = verifier.verify(&token("user-1", 3600, "someone-else")).await;

        assert!(matches!(result, Err(AuthError::InvalidCredential(_))));
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        let verifier = JwtIdentityVerifier::from_secret(SECRET);

        let result = verifier.verify("not-a-jwt").await;

        assert!(matches!(result, Err(AuthError::InvalidCredential(_))));
    }
}
