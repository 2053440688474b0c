use chrono::Duration;
use tungstenite::http::Uri;

use super::upgrade::{admit, comments_path, comments_url, token_from_query};
use crate::auth::JwtVerifier;
use crate::hub::{PostId, Topic};
use crate::utils::error::{AuthError, ServerError, UpgradeRejection};

fn uri(s: &str) -> Uri {
    s.parse().unwrap()
}

fn verifier_and_token() -> (JwtVerifier, String) {
    let verifier = JwtVerifier::new("transport-secret");
    let token = verifier.issue("user-1", Duration::hours(1)).unwrap();
    (verifier, token)
}

#[test]
fn test_comments_path() {
    assert_eq!(comments_path(PostId::new(42).unwrap()), "/ws/posts/42/comments");
}

#[test]
fn test_comments_url() {
    assert_eq!(
        comments_url("ws://127.0.0.1:8080/", 42, "abc").unwrap(),
        "ws://127.0.0.1:8080/ws/posts/42/comments?token=abc"
    );
}

#[test]
fn test_comments_url_refuses_post_zero() {
    let err = comments_url("ws://127.0.0.1:8080", 0, "abc").unwrap_err();
    assert!(matches!(err, ServerError::InvalidPostId(0)));
    assert_eq!(err.to_string(), "post id must be positive, got 0");
}

#[test]
fn test_admit_valid_request() {
    let (verifier, token) = verifier_and_token();
    let admission = admit(
        &uri(&format!("/ws/posts/42/comments?token={token}")),
        &verifier,
    )
    .unwrap();
    assert_eq!(admission.post.get(), 42);
    assert_eq!(admission.topic, Topic::new("post:42"));
    assert_eq!(admission.subscriber.id, "user-1");
}

#[test]
fn test_token_is_found_among_other_params() {
    assert_eq!(
        token_from_query(Some("a=1&token=abc%2Edef&b=2")).as_deref(),
        Some("abc.def")
    );
    assert_eq!(token_from_query(Some("token=")), None);
    assert_eq!(token_from_query(Some("tok=abc")), None);
    assert_eq!(token_from_query(None), None);
}

#[test]
fn test_unknown_routes_are_not_found() {
    let (verifier, token) = verifier_and_token();
    for path in [
        "/",
        "/ws/posts/42",
        "/ws/posts/42/likes",
        "/ws/posts/4/2/comments",
        "/ws/posts/42/comments/",
    ] {
        let result = admit(&uri(&format!("{path}?token={token}")), &verifier);
        assert_eq!(
            result,
            Err(UpgradeRejection::UnknownRoute(path.to_string())),
            "{path}"
        );
    }
}

#[test]
fn test_missing_token_is_unauthorized() {
    let (verifier, _) = verifier_and_token();
    assert_eq!(
        admit(&uri("/ws/posts/42/comments"), &verifier),
        Err(UpgradeRejection::Unauthorized(AuthError::MissingToken))
    );
}

#[test]
fn test_bad_token_is_unauthorized() {
    let (verifier, _) = verifier_and_token();
    let result = admit(&uri("/ws/posts/42/comments?token=forged"), &verifier);
    assert!(matches!(
        result,
        Err(UpgradeRejection::Unauthorized(AuthError::InvalidToken(_)))
    ));
}

#[test]
fn test_malformed_post_id_is_bad_request() {
    let (verifier, token) = verifier_and_token();
    for raw in ["abc", "0", "-1", ""] {
        let result = admit(
            &uri(&format!("/ws/posts/{raw}/comments?token={token}")),
            &verifier,
        );
        assert_eq!(
            result,
            Err(UpgradeRejection::MalformedPostId(raw.to_string())),
            "{raw:?}"
        );
    }
}

#[test]
fn test_auth_is_checked_before_post_id() {
    let (verifier, _) = verifier_and_token();
    let result = admit(&uri("/ws/posts/abc/comments"), &verifier);
    assert_eq!(
        result,
        Err(UpgradeRejection::Unauthorized(AuthError::MissingToken))
    );
}
