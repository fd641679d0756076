//! Verification of identity provider tokens against its published key set.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use gymhub_core::config::IdentityConfig;
use gymhub_core::error::{AppError, ErrorKind};
use gymhub_entity::user::Principal;

use super::{AccessClaims, TokenVerifier, map_jwt_error};

/// Upper bound on cached signing keys.
const MAX_CACHED_KEYS: u64 = 64;

/// RS256 verifier backed by the tenant's JWKS endpoint.
///
/// Keys are fetched on first use and cached by `kid` without expiry. A token
/// whose `kid` is unknown triggers one refresh of the key set before it is
/// rejected, at most once per `jwks_min_refresh_seconds`.
#[derive(Clone)]
pub struct JwksTokenVerifier {
    http: reqwest::Client,
    jwks_url: String,
    validation: Validation,
    keys: Cache<String, DecodingKey>,
    min_refresh_interval: Duration,
    last_refresh: Arc<Mutex<Option<Instant>>>,
}

impl std::fmt::Debug for JwksTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksTokenVerifier")
            .field("jwks_url", &self.jwks_url)
            .field("cached_keys", &self.keys.entry_count())
            .finish()
    }
}

impl JwksTokenVerifier {
    /// Create a verifier for the configured tenant.
    pub fn new(config: &IdentityConfig) -> Result<Self, AppError> {
        Self::with_jwks_url(config, config.jwks_url())
    }

    /// Create a verifier that fetches keys from an explicit URL.
    pub fn with_jwks_url(
        config: &IdentityConfig,
        jwks_url: impl Into<String>,
    ) -> Result<Self, AppError> {
        if config.client_id.is_empty() {
            return Err(AppError::configuration(
                "identity.client_id must be set to verify provider tokens",
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[config.client_id.as_str()]);
        validation.set_issuer(&[config.issuer()]);
        validation.validate_exp = true;
        validation.leeway = 5;

        Ok(Self {
            http,
            jwks_url: jwks_url.into(),
            validation,
            keys: Cache::builder().max_capacity(MAX_CACHED_KEYS).build(),
            min_refresh_interval: Duration::from_secs(config.jwks_min_refresh_seconds),
            last_refresh: Arc::new(Mutex::new(None)),
        })
    }

    /// Look up a signing key, refreshing the key set on a miss unless it was
    /// refreshed within the minimum interval.
    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AppError> {
        if let Some(key) = self.keys.get(kid).await {
            return Ok(key);
        }

        {
            let mut last = self.last_refresh.lock().await;
            // A concurrent miss may have refreshed while we waited.
            if let Some(key) = self.keys.get(kid).await {
                return Ok(key);
            }

            if last.is_none_or(|at| at.elapsed() >= self.min_refresh_interval) {
                debug!(kid = %kid, "Signing key not cached, refreshing key set");
                *last = Some(Instant::now());
                self.refresh().await?;
            } else {
                debug!(kid = %kid, "Key set refreshed recently, skipping fetch");
            }
        }

        self.keys.get(kid).await.ok_or_else(|| {
            warn!(kid = %kid, "Token signed with unknown key");
            AppError::authentication("Unable to verify credentials")
        })
    }

    /// Fetch the key set and cache every usable key.
    async fn refresh(&self) -> Result<(), AppError> {
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Failed to fetch signing keys",
                    e,
                )
            })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Signing key endpoint returned {}",
                response.status()
            )));
        }

        let set: JwkSet = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Malformed signing key set", e)
        })?;

        let mut loaded = 0usize;
        for jwk in &set.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    self.keys.insert(kid, key).await;
                    loaded += 1;
                }
                Err(e) => warn!(kid = %kid, error = %e, "Skipping unusable signing key"),
            }
        }

        info!(keys = loaded, "Signing key set refreshed");
        Ok(())
    }
}

#[async_trait]
impl TokenVerifier for JwksTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, AppError> {
        let header = decode_header(token).map_err(map_jwt_error)?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::authentication("Unable to verify credentials"))?;

        let key = self.key_for(&kid).await?;
        let data = decode::<AccessClaims>(token, &key, &self.validation).map_err(map_jwt_error)?;
        data.claims.into_principal(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::routing::get;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SIGNING_KEY: &str = include_str!("../../testdata/jwks_signing_key.pem");
    const KEY_SET: &str = include_str!("../../testdata/jwks.json");
    const KID: &str = "gymhub-test-key";

    fn identity() -> IdentityConfig {
        IdentityConfig {
            tenant_subdomain: "gymhubtest".to_string(),
            tenant_id: "tenant-guid".to_string(),
            client_id: "client-guid".to_string(),
            ..IdentityConfig::default()
        }
    }

    /// Serve `body` as the key set and count fetches.
    async fn serve_keys(body: &'static str) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/keys",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    ([("content-type", "application/json")], body)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/keys"), hits)
    }

    fn sign(kid: Option<&str>, audience: &str, issuer: &str) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = kid.map(String::from);
        let claims = serde_json::json!({
            "oid": "0195a0b2-7c1e-7000-8000-0000000000aa",
            "email": "member@example.com",
            "name": "Member",
            "roles": ["trainer"],
            "aud": audience,
            "iss": issuer,
            "exp": Utc::now().timestamp() + 600,
        });
        let key = EncodingKey::from_rsa_pem(SIGNING_KEY.as_bytes()).unwrap();
        encode(&header, &claims, &key).unwrap()
    }

    #[tokio::test]
    async fn test_verifies_and_caches_keys() {
        let config = identity();
        let (url, hits) = serve_keys(KEY_SET).await;
        let verifier = JwksTokenVerifier::with_jwks_url(&config, url).unwrap();
        let token = sign(Some(KID), "client-guid", &config.issuer());

        let principal = verifier.verify(&token).await.unwrap();
        assert_eq!(principal.role, gymhub_entity::user::UserRole::Trainer);
        assert_eq!(principal.email, "member@example.com");

        verifier.verify(&token).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_kid_refreshes_once_then_rejects() {
        let config = identity();
        let (url, hits) = serve_keys(KEY_SET).await;
        let verifier = JwksTokenVerifier::with_jwks_url(&config, url).unwrap();
        let token = sign(Some("rotated-away"), "client-guid", &config.issuer());

        let err = verifier.verify(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Unable to verify credentials");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_kid_refresh_is_throttled() {
        let config = identity();
        let (url, hits) = serve_keys(KEY_SET).await;
        let verifier = JwksTokenVerifier::with_jwks_url(&config, url).unwrap();
        let token = sign(Some("rotated-away"), "client-guid", &config.issuer());

        for _ in 0..5 {
            assert!(verifier.verify(&token).await.is_err());
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Known keys are still served from the cache.
        let good = sign(Some(KID), "client-guid", &config.issuer());
        verifier.verify(&good).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_kid_refreshes_again_after_interval() {
        let config = IdentityConfig {
            jwks_min_refresh_seconds: 0,
            ..identity()
        };
        let (url, hits) = serve_keys(KEY_SET).await;
        let verifier = JwksTokenVerifier::with_jwks_url(&config, url).unwrap();
        let token = sign(Some("rotated-away"), "client-guid", &config.issuer());

        assert!(verifier.verify(&token).await.is_err());
        assert!(verifier.verify(&token).await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_wrong_audience_rejected() {
        let config = identity();
        let (url, _) = serve_keys(KEY_SET).await;
        let verifier = JwksTokenVerifier::with_jwks_url(&config, url).unwrap();
        let token = sign(Some(KID), "someone-else", &config.issuer());

        let err = verifier.verify(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_missing_kid_rejected_without_fetch() {
        let config = identity();
        let (url, hits) = serve_keys(KEY_SET).await;
        let verifier = JwksTokenVerifier::with_jwks_url(&config, url).unwrap();
        let token = sign(None, "client-guid", &config.issuer());

        assert!(verifier.verify(&token).await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_requires_client_id() {
        let err = JwksTokenVerifier::new(&IdentityConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
