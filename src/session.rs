//! Session context for authenticated API calls.
//!
//! A [`Session`] binds the shop and access token for the duration of one
//! pipeline run. The pipelines refuse to enumerate or mutate anything until
//! [`Session::is_active`] holds, which is what makes a bad credential a
//! fatal setup error rather than a per-order one.

use crate::config::{AppConfig, ShopDomain};

/// An authenticated session bound to a single shop.
///
/// Sessions are immutable after creation and hold no connection state of
/// their own; the HTTP clients borrow them for the shop domain and token.
///
/// # Example
///
/// ```rust
/// use order_tagger::{AccessToken, AppConfig, Session, ShopDomain};
///
/// let config = AppConfig::new(
///     ShopDomain::new("my-store").unwrap(),
///     AccessToken::new("shpat_example").unwrap(),
/// );
/// let session = Session::new(&config);
/// assert!(session.is_active());
/// ```
#[derive(Clone, Debug)]
pub struct Session {
    /// The shop this session is for.
    pub shop: ShopDomain,
    /// The access token for API authentication.
    pub access_token: String,
}

impl Session {
    /// Creates a session from resolved configuration.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            shop: config.shop().clone(),
            access_token: config.access_token().as_ref().to_string(),
        }
    }

    /// Creates a session from raw parts.
    ///
    /// Exists for tests that need a deliberately broken session; production
    /// code goes through [`Session::new`].
    #[must_use]
    pub const fn from_parts(shop: ShopDomain, access_token: String) -> Self {
        Self { shop, access_token }
    }

    /// Returns `true` if this session can authenticate requests.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.access_token.is_empty()
    }
}

// Verify Session is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Session>();
};
