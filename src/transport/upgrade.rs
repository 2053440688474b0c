//! Upgrade admission
//!
//! Decides, from the handshake request alone, whether an upgrade may proceed
//! and which topic it subscribes to. Accepted requests look like
//!
//! ```text
//! GET /ws/posts/{post_id}/comments?token=<jwt>
//! ```
//!
//! The token travels as a query parameter because browsers cannot set
//! headers on a WebSocket handshake. Checks run in order: route shape (404),
//! token (401), post id (400). Nothing here touches the hub.

use tungstenite::http::Uri;

use crate::auth::{Subscriber, TokenVerifier};
use crate::hub::topic::{PostId, Topic};
use crate::utils::error::{AuthError, ServerError, UpgradeRejection};

const ROUTE_PREFIX: &str = "/ws/posts/";
const ROUTE_SUFFIX: &str = "/comments";

/// An upgrade request that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub post: PostId,
    pub topic: Topic,
    pub subscriber: Subscriber,
}

/// Path of the upgrade endpoint for `post`.
pub fn comments_path(post: PostId) -> String {
    format!("{ROUTE_PREFIX}{post}{ROUTE_SUFFIX}")
}

/// Full subscription URL for `post` on the server at `base`. Post ids start
/// at 1; zero is refused here rather than by the server.
pub fn comments_url(base: &str, post: u64, token: &str) -> Result<String, ServerError> {
    let post = PostId::new(post).ok_or(ServerError::InvalidPostId(post))?;
    Ok(format!(
        "{}{}?token={}",
        base.trim_end_matches('/'),
        comments_path(post),
        token
    ))
}

pub fn admit(uri: &Uri, verifier: &dyn TokenVerifier) -> Result<Admission, UpgradeRejection> {
    let raw_post = raw_post_id(uri.path())?;
    let token = token_from_query(uri.query()).ok_or(AuthError::MissingToken)?;
    let subscriber = verifier.verify(&token)?;
    let post: PostId = raw_post.parse()?;

    Ok(Admission {
        post,
        topic: Topic::for_post(post),
        subscriber,
    })
}

/// The segment between `/ws/posts/` and `/comments`, unparsed.
fn raw_post_id(path: &str) -> Result<&str, UpgradeRejection> {
    path.strip_prefix(ROUTE_PREFIX)
        .and_then(|rest| rest.strip_suffix(ROUTE_SUFFIX))
        .filter(|raw| !raw.contains('/'))
        .ok_or_else(|| UpgradeRejection::UnknownRoute(path.to_string()))
}

pub(crate) fn token_from_query(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

