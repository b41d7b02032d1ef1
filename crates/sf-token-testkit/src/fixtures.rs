//! Test collaborators and fixtures.
//!
//! [`MockClock`] and [`IdStub`] replace the wall clock and random ids so that
//! issued tokens are fully deterministic.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use sf_token::{Clock, CollaboratorRegistry, HashAlgorithm, IdGenerator, TokenService};

/// The time every fixture starts at: 2010-03-06T00:00:00Z.
pub const FIXTURE_NOW: i64 = 1267833600000;

/// The secret fixtures are built with.
pub const FIXTURE_SECRET: &str = "guestwhat";

/// The first id an [`IdStub`] hands out.
pub const FIRST_STUB_ID: &str = "abbacacaabbacacaabbacaca";

const STUB_BASE: u128 = 0xabbacacaabbacacaabbacaca;

/// A settable clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<AtomicI64>,
}

impl MockClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now)),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(FIXTURE_NOW)
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> i64 {
        self.now()
    }
}

/// A deterministic id generator. Clones share the same sequence.
///
/// Ids are 24 hex characters counting up from [`FIRST_STUB_ID`].
#[derive(Debug, Clone, Default)]
pub struct IdStub {
    issued: Arc<AtomicU64>,
}

impl IdStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next call to `generate` will return, without consuming it.
    pub fn peek(&self) -> String {
        Self::nth(self.issued.load(Ordering::SeqCst))
    }

    /// Restart the sequence from the first id.
    pub fn reset(&self) {
        self.issued.store(0, Ordering::SeqCst);
    }

    /// The `n`th id of the sequence, counting from zero.
    pub fn nth(n: u64) -> String {
        format!("{:024x}", STUB_BASE + u128::from(n))
    }
}

impl IdGenerator for IdStub {
    fn generate(&self) -> String {
        Self::nth(self.issued.fetch_add(1, Ordering::SeqCst))
    }
}

/// A token service wired to a mock clock and an id stub.
#[derive(Debug, Clone)]
pub struct TestFixture {
    pub clock: MockClock,
    pub ids: IdStub,
    pub service: TokenService,
}

impl TestFixture {
    /// A sha256 fixture with the default secret, at [`FIXTURE_NOW`].
    pub fn new() -> Self {
        Self::with_algorithm(HashAlgorithm::Sha256)
    }

    pub fn with_algorithm(algorithm: HashAlgorithm) -> Self {
        Self::with_secret(FIXTURE_SECRET, algorithm)
    }

    pub fn with_secret(secret: &str, algorithm: HashAlgorithm) -> Self {
        let clock = MockClock::default();
        let ids = IdStub::new();
        let service = TokenService::builder()
            .secret(secret)
            .id_generator(ids.clone())
            .clock(clock.clone())
            .hash_algorithm(algorithm)
            .build()
            .expect("fixture configuration is valid");
        Self {
            clock,
            ids,
            service,
        }
    }

    /// A registry exposing this fixture's collaborators as `stub` and `mock`.
    pub fn registry(&self) -> CollaboratorRegistry {
        let mut registry = CollaboratorRegistry::default();
        registry
            .register_id_generator("stub", self.ids.clone())
            .register_clock("mock", self.clock.clone());
        registry
    }

    /// End of life `millis` after the fixture's current time.
    pub fn in_millis(&self, millis: i64) -> i64 {
        self.clock.now() + millis
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sf_token::TokenSettings;

    #[test]
    fn test_id_stub_sequence() {
        let ids = IdStub::new();
        assert_eq!(ids.peek(), FIRST_STUB_ID);
        assert_eq!(ids.generate(), FIRST_STUB_ID);
        assert_eq!(ids.generate(), "abbacacaabbacacaabbacacb");
        assert_eq!(ids.peek(), "abbacacaabbacacaabbacacc");

        ids.reset();
        assert_eq!(ids.generate(), FIRST_STUB_ID);
    }

    #[test]
    fn test_mock_clock_shared_between_clones() {
        let clock = MockClock::default();
        let other = clock.clone();
        other.advance(1000);
        assert_eq!(clock.now_millis(), FIXTURE_NOW + 1000);
        clock.set(5);
        assert_eq!(other.now(), 5);
    }

    #[test]
    fn test_fixture_issues_stub_ids() {
        let fixture = TestFixture::new();
        let expected = fixture.ids.peek();
        let envelope = fixture
            .service
            .create_token(Some(json!({})), Some(fixture.in_millis(1)))
            .unwrap();
        assert_eq!(envelope.id, expected);
    }

    #[test]
    fn test_fixture_registry() {
        let fixture = TestFixture::new();
        let settings = TokenSettings {
            secret: Some(json!(FIXTURE_SECRET)),
            unique_id: Some(json!("stub")),
            time: Some(json!("mock")),
            algorithm: None,
        };
        let service = TokenService::from_settings_with(&settings, &fixture.registry()).unwrap();
        assert_eq!(service.now(), FIXTURE_NOW);

        let envelope = service
            .create_token(Some(json!({})), Some(FIXTURE_NOW))
            .unwrap();
        assert_eq!(envelope.id, FIRST_STUB_ID);
        fixture.service.verify(&envelope).unwrap();
    }
}
