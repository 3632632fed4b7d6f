//! Authenticated caller identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_helpers::{AppError, JwtClaims};

/// The user a request acts for, taken from the verified token.
///
/// Handlers pass it explicitly into every forwarded command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: String,
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<JwtClaims>()
            .map(|claims| Caller {
                id: claims.sub.clone(),
            })
            .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn claims(sub: &str) -> JwtClaims {
        JwtClaims {
            sub: sub.to_string(),
            email: "u1@example.com".to_string(),
            name: "U1".to_string(),
            roles: vec![],
            permissions: vec![],
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        }
    }

    #[tokio::test]
    async fn test_caller_from_claims() {
        let (mut parts, _) = Request::new(()).into_parts();
        parts.extensions.insert(claims("u1"));

        let caller = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(caller.id, "u1");
    }

    #[tokio::test]
    async fn test_missing_claims_is_unauthorized() {
        let (mut parts, _) = Request::new(()).into_parts();
        let err = Caller::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
