//! The token service: issues envelopes and checks them.

use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};
use subtle::ConstantTimeEq;

use sf_token_core::envelope::{end_of_life_display, js_type_name};
use sf_token_core::{
    is_past, is_truthy, token_digest, validate_unverified, Envelope, HashAlgorithm, Result,
    TokenError, UnverifiedToken,
};

use crate::clock::{Clock, SystemClock};
use crate::id::IdGenerator;
use crate::settings::{setting_name, CollaboratorRegistry, TokenSettings};

/// The shared secret. Never printed.
#[derive(Clone)]
struct Secret(String);

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Issues and checks signed, time-limited tokens.
///
/// Configuration is fixed at construction. Every operation is synchronous and
/// the service holds no mutable state, so one instance can be shared across
/// threads as long as its id generator and clock can.
#[derive(Clone)]
pub struct TokenService {
    secret: Secret,
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    algorithm: HashAlgorithm,
}

impl TokenService {
    /// Start configuring a service.
    pub fn builder() -> TokenServiceBuilder {
        TokenServiceBuilder::default()
    }

    /// Build a service from settings, resolving collaborators through the
    /// default registry.
    pub fn from_settings(settings: &TokenSettings) -> Result<Self> {
        Self::from_settings_with(settings, &CollaboratorRegistry::default())
    }

    /// Build a service from settings, resolving collaborators through `registry`.
    pub fn from_settings_with(
        settings: &TokenSettings,
        registry: &CollaboratorRegistry,
    ) -> Result<Self> {
        let secret = match &settings.secret {
            Some(Value::String(secret)) => secret.clone(),
            other => {
                return Err(TokenError::BadSecret {
                    found: js_type_name(other.as_ref()),
                })
            }
        };

        let id_generator = match &settings.unique_id {
            Some(value) if is_truthy(value) => match value {
                Value::String(name) => registry
                    .id_generator(name)
                    .ok_or_else(|| TokenError::BadIdGenerator { name: name.clone() })?,
                other => {
                    return Err(TokenError::BadIdGenerator {
                        name: setting_name(other),
                    })
                }
            },
            _ => return Err(TokenError::NoIdGenerator),
        };

        let mut builder = Self::builder()
            .secret(secret)
            .shared_id_generator(id_generator);

        if let Some(value) = settings.time.as_ref().filter(|v| is_truthy(v)) {
            let clock = match value {
                Value::String(name) => registry.clock(name),
                _ => None,
            }
            .ok_or_else(|| TokenError::BadTime {
                name: setting_name(value),
            })?;
            builder = builder.shared_clock(clock);
        }

        if let Some(value) = settings.algorithm.as_ref().filter(|v| is_truthy(v)) {
            builder = builder.algorithm(setting_name(value));
        }

        builder.build()
    }

    /// The configured hash algorithm.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Current time according to the configured clock.
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Create a new token.
    ///
    /// `contents` is required but may be any JSON value, `null` and `false`
    /// included. Fails with `PastEndOfLife` if the clock is already past
    /// `end_of_life`.
    ///
    /// `end_of_life` is whole milliseconds. Tokens with a fractional end of
    /// life can be checked by [`check_token`](Self::check_token), which takes
    /// any JSON number off the wire, but cannot be issued here.
    pub fn create_token(&self, contents: Option<Value>, end_of_life: Option<i64>) -> Result<Envelope> {
        let id = self.id_generator.generate();
        let now = self.clock.now_millis();

        let contents = contents.ok_or(TokenError::NoContent)?;
        let end_of_life = end_of_life.ok_or(TokenError::NoEndOfLife { found: "undefined" })?;
        let eol = Number::from(end_of_life);

        let hash = self.digest(&id, &eol, &contents);
        if is_past(now, &eol) {
            tracing::debug!(id = %id, end_of_life, now, "refusing to issue expired token");
            return Err(TokenError::PastEndOfLife {
                end_of_life: end_of_life_display(&eol),
                now,
            });
        }

        tracing::debug!(id = %id, end_of_life, algorithm = %self.algorithm, "issued token");

        Ok(Envelope {
            id,
            end_of_life,
            contents,
            hash,
        })
    }

    /// Start an issuance request.
    pub fn request(&self) -> TokenRequest<'_> {
        TokenRequest {
            service: self,
            contents: None,
            end_of_life: None,
        }
    }

    /// Check a presented token against a presented hash.
    ///
    /// Returns `Ok(())` when the hash matches and the token has not expired.
    pub fn check_token(&self, token: &UnverifiedToken, hash: Option<&str>) -> Result<()> {
        let now = self.clock.now_millis();

        let fields = validate_unverified(token, hash).map_err(|e| rejected(e, None))?;
        let computed = self.digest(fields.id, fields.end_of_life, fields.contents);

        if !hashes_match(fields.hash, &computed) {
            return Err(rejected(
                TokenError::BadHash {
                    given: fields.hash.to_string(),
                },
                Some(fields.id),
            ));
        }

        if is_past(now, fields.end_of_life) {
            return Err(rejected(
                TokenError::PastEndOfLife {
                    end_of_life: end_of_life_display(fields.end_of_life),
                    now,
                },
                Some(fields.id),
            ));
        }

        tracing::debug!(id = %fields.id, "token check passed");
        Ok(())
    }

    /// Check an issued envelope against its own hash.
    pub fn verify(&self, envelope: &Envelope) -> Result<()> {
        self.check_token(&envelope.to_unverified(), Some(&envelope.hash))
    }

    /// Compute the hash a token with these fields carries.
    pub fn compute_hash(&self, id: &str, end_of_life: i64, contents: &Value) -> String {
        self.digest(id, &Number::from(end_of_life), contents)
    }

    fn digest(&self, id: &str, end_of_life: &Number, contents: &Value) -> String {
        token_digest(self.algorithm, id, end_of_life, contents, &self.secret.0)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &self.secret)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

fn hashes_match(given: &str, computed: &str) -> bool {
    given.as_bytes().ct_eq(computed.as_bytes()).into()
}

fn rejected(err: TokenError, id: Option<&str>) -> TokenError {
    tracing::warn!(code = err.code(), id = id.unwrap_or_default(), "token check rejected");
    err
}

/// Configures a [`TokenService`].
///
/// Nothing is validated until [`build`](Self::build), which either returns a
/// fully valid service or an error.
#[derive(Default)]
pub struct TokenServiceBuilder {
    secret: Option<String>,
    id_generator: Option<Arc<dyn IdGenerator>>,
    clock: Option<Arc<dyn Clock>>,
    algorithm: Option<String>,
}

impl TokenServiceBuilder {
    /// Set the shared secret.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Set the id generator.
    pub fn id_generator(self, generator: impl IdGenerator + 'static) -> Self {
        self.shared_id_generator(Arc::new(generator))
    }

    pub fn shared_id_generator(mut self, generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = Some(generator);
        self
    }

    /// Set the clock. Defaults to [`SystemClock`].
    pub fn clock(self, clock: impl Clock + 'static) -> Self {
        self.shared_clock(Arc::new(clock))
    }

    pub fn shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the hash algorithm by name. Defaults to `sha256`.
    pub fn algorithm(mut self, name: impl Into<String>) -> Self {
        self.algorithm = Some(name.into());
        self
    }

    /// Set the hash algorithm.
    pub fn hash_algorithm(self, algorithm: HashAlgorithm) -> Self {
        self.algorithm(algorithm.name())
    }

    /// Validate the configuration and build the service.
    pub fn build(self) -> Result<TokenService> {
        let secret = self
            .secret
            .ok_or(TokenError::BadSecret { found: "undefined" })?;
        let id_generator = self.id_generator.ok_or(TokenError::NoIdGenerator)?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let algorithm = match self.algorithm {
            Some(name) => HashAlgorithm::from_name(&name)?,
            None => HashAlgorithm::default(),
        };

        Ok(TokenService {
            secret: Secret(secret),
            id_generator,
            clock,
            algorithm,
        })
    }
}

impl fmt::Debug for TokenServiceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenServiceBuilder")
            .field("secret", &self.secret.as_ref().map(|_| ".."))
            .field("id_generator", &self.id_generator.is_some())
            .field("clock", &self.clock.is_some())
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// An issuance request built up step by step.
///
/// ```rust
/// use serde_json::json;
/// use sf_token::TokenService;
///
/// let service = TokenService::builder()
///     .secret("mysecret")
///     .id_generator(|| "abbacacaabbacacaabbacaca".to_string())
///     .clock(|| 1267833600000i64)
///     .build()
///     .unwrap();
///
/// let envelope = service
///     .request()
///     .contents(json!({ "uri": "/plop" }))
///     .expires_in(3_600_000)
///     .create()
///     .unwrap();
///
/// assert_eq!(envelope.end_of_life, 1267837200000);
/// service.verify(&envelope).unwrap();
/// ```
#[derive(Debug)]
pub struct TokenRequest<'a> {
    service: &'a TokenService,
    contents: Option<Value>,
    end_of_life: Option<i64>,
}

impl<'a> TokenRequest<'a> {
    pub fn contents(mut self, contents: impl Into<Value>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Expire at an absolute time.
    pub fn expires_at(mut self, end_of_life: i64) -> Self {
        self.end_of_life = Some(end_of_life);
        self
    }

    /// Expire `ttl` after the service clock's current time.
    pub fn expires_in(mut self, ttl: i64) -> Self {
        self.end_of_life = Some(self.service.now().saturating_add(ttl));
        self
    }

    pub fn create(self) -> Result<Envelope> {
        self.service.create_token(self.contents, self.end_of_life)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NOW: i64 = 1267833600000;

    fn counter_ids() -> impl IdGenerator {
        let next = AtomicUsize::new(0);
        move || format!("{:024x}", next.fetch_add(1, Ordering::Relaxed))
    }

    fn service() -> TokenService {
        TokenService::builder()
            .secret("guestwhat")
            .id_generator(counter_ids())
            .clock(|| NOW)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_with_required_options_only() {
        let service = TokenService::builder()
            .secret("mysecret")
            .id_generator(counter_ids())
            .build()
            .unwrap();
        assert_eq!(service.algorithm(), HashAlgorithm::Sha256);
    }

    #[test]
    fn test_build_with_all_options() {
        let service = TokenService::builder()
            .secret("mysecret")
            .id_generator(counter_ids())
            .clock(|| NOW)
            .algorithm("md5")
            .build()
            .unwrap();
        assert_eq!(service.algorithm(), HashAlgorithm::Md5);
        assert_eq!(service.now(), NOW);
    }

    #[test]
    fn test_build_failures() {
        let err = TokenService::builder()
            .id_generator(counter_ids())
            .build()
            .unwrap_err();
        assert!(matches!(err, TokenError::BadSecret { .. }));

        let err = TokenService::builder().secret("mysecret").build().unwrap_err();
        assert_eq!(err, TokenError::NoIdGenerator);

        let err = TokenService::builder()
            .secret("mysecret")
            .id_generator(counter_ids())
            .algorithm("banana")
            .build()
            .unwrap_err();
        assert_eq!(err.code(), "E_BAD_ALGORITHM");
    }

    #[test]
    fn test_create_token() {
        let service = service();
        let contents = json!({ "method": "DELETE", "uri": "/plop" });
        let envelope = service
            .create_token(Some(contents.clone()), Some(NOW + 3_600_000))
            .unwrap();

        assert_eq!(envelope.id, format!("{:024x}", 0));
        assert_eq!(envelope.end_of_life, NOW + 3_600_000);
        assert_eq!(envelope.contents, contents);
        assert_eq!(
            envelope.hash,
            service.compute_hash(&envelope.id, envelope.end_of_life, &contents)
        );
        assert_eq!(envelope.hash.len(), 64);
    }

    #[test]
    fn test_create_token_accepts_falsy_contents() {
        let service = service();
        for contents in [json!(null), json!(false), json!(0), json!("")] {
            assert!(service.create_token(Some(contents), Some(NOW)).is_ok());
        }
    }

    #[test]
    fn test_create_token_failures() {
        let service = service();
        assert_eq!(service.create_token(None, None).unwrap_err(), TokenError::NoContent);
        assert!(matches!(
            service.create_token(Some(json!({})), None),
            Err(TokenError::NoEndOfLife { .. })
        ));
        assert!(matches!(
            service.create_token(Some(json!({})), Some(NOW - 1)),
            Err(TokenError::PastEndOfLife { now: NOW, .. })
        ));
    }

    #[test]
    fn test_end_of_life_equal_to_now_is_valid() {
        let service = service();
        let envelope = service.create_token(Some(json!({})), Some(NOW)).unwrap();
        service.verify(&envelope).unwrap();
    }

    #[test]
    fn test_check_round_trip() {
        let service = service();
        let envelope = service
            .request()
            .contents(json!({ "uri": "/plop" }))
            .expires_in(1000)
            .create()
            .unwrap();
        service
            .check_token(&envelope.to_unverified(), Some(&envelope.hash))
            .unwrap();
    }

    #[test]
    fn test_check_bad_hash() {
        let service = service();
        let token = UnverifiedToken::new("id", NOW + 1, json!({}));
        let err = service.check_token(&token, Some("hash")).unwrap_err();
        assert_eq!(err, TokenError::BadHash { given: "hash".into() });
    }

    #[test]
    fn test_check_past_end_of_life_with_valid_hash() {
        let service = service();
        let hash = service.compute_hash("id", NOW - 1, &json!({}));
        let token = UnverifiedToken::new("id", NOW - 1, json!({}));
        assert!(matches!(
            service.check_token(&token, Some(&hash)),
            Err(TokenError::PastEndOfLife { .. })
        ));
    }

    #[test]
    fn test_falsy_contents_issue_but_never_check() {
        let service = service();
        let envelope = service.create_token(Some(json!(0)), Some(NOW + 1)).unwrap();
        assert_eq!(service.verify(&envelope).unwrap_err(), TokenError::NoContent);
    }

    #[test]
    fn test_wrong_secret_is_bad_hash() {
        let issuer = service();
        let other = TokenService::builder()
            .secret("other")
            .id_generator(counter_ids())
            .clock(|| NOW)
            .build()
            .unwrap();
        let envelope = issuer.create_token(Some(json!({})), Some(NOW + 1)).unwrap();
        assert!(matches!(other.verify(&envelope), Err(TokenError::BadHash { .. })));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", service());
        assert!(!debug.contains("guestwhat"));
        let debug = format!("{:?}", TokenService::builder().secret("guestwhat"));
        assert!(!debug.contains("guestwhat"));
    }

    #[test]
    fn test_service_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TokenService>();
    }

    #[test]
    fn test_from_settings() {
        let settings = TokenSettings {
            secret: Some(json!("mysecret")),
            unique_id: Some(json!("object-id")),
            time: Some(json!("system")),
            algorithm: Some(json!("md5")),
        };
        let service = TokenService::from_settings(&settings).unwrap();
        assert_eq!(service.algorithm(), HashAlgorithm::Md5);
    }

    #[test]
    fn test_from_settings_failures() {
        let base = TokenSettings {
            secret: Some(json!("mysecret")),
            unique_id: Some(json!("object-id")),
            ..Default::default()
        };

        let cases = [
            (TokenSettings { secret: None, ..base.clone() }, "E_BAD_SECRET"),
            (TokenSettings { secret: Some(json!(1664)), ..base.clone() }, "E_BAD_SECRET"),
            (TokenSettings { unique_id: None, ..base.clone() }, "E_NO_ID_GENERATOR"),
            (TokenSettings { unique_id: Some(json!("id")), ..base.clone() }, "E_BAD_ID_GENERATOR"),
            (TokenSettings { unique_id: Some(json!(12)), ..base.clone() }, "E_BAD_ID_GENERATOR"),
            (TokenSettings { time: Some(json!("time")), ..base.clone() }, "E_BAD_TIME"),
            (TokenSettings { time: Some(json!(true)), ..base.clone() }, "E_BAD_TIME"),
            (TokenSettings { algorithm: Some(json!("banana")), ..base.clone() }, "E_BAD_ALGORITHM"),
        ];

        for (settings, code) in cases {
            let err = TokenService::from_settings(&settings).unwrap_err();
            assert_eq!(err.code(), code, "{settings:?}");
        }
    }

    #[test]
    fn test_from_settings_falsy_optionals_use_defaults() {
        let settings = TokenSettings {
            secret: Some(json!("mysecret")),
            unique_id: Some(json!("random")),
            time: Some(json!(null)),
            algorithm: Some(json!("")),
        };
        let service = TokenService::from_settings(&settings).unwrap();
        assert_eq!(service.algorithm(), HashAlgorithm::Sha256);
    }
}
