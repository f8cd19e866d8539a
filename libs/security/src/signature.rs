use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// How a platform proves a webhook came from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// `sha1=<hex hmac-sha1(body)>`, e.g. Messenger's `X-Hub-Signature`.
    HubSha1,
    /// `sha256=<hex hmac-sha256(body)>`, e.g. `X-Hub-Signature-256`.
    HubSha256,
    /// The configured secret itself is echoed in a header, e.g. Telegram's
    /// `X-Telegram-Bot-Api-Secret-Token`.
    SharedToken,
}

impl SignatureScheme {
    pub fn prefix(&self) -> &'static str {
        match self {
            SignatureScheme::HubSha1 => "sha1=",
            SignatureScheme::HubSha256 => "sha256=",
            SignatureScheme::SharedToken => "",
        }
    }
}

/// Renders the signature a platform would send for `body`.
///
/// ```
/// use security::{SignatureScheme, sign};
///
/// let sig = sign(SignatureScheme::HubSha1, "s", b"b").unwrap();
/// assert_eq!(sig, "sha1=ea42966bd7b9730ce27f7aaf896dc7ef5ac7fa17");
/// ```
pub fn sign(scheme: SignatureScheme, secret: &str, body: &[u8]) -> Option<String> {
    let digest = match scheme {
        SignatureScheme::HubSha1 => {
            let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).ok()?;
            mac.update(body);
            hex::encode(mac.finalize().into_bytes())
        }
        SignatureScheme::HubSha256 => {
            let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
            mac.update(body);
            hex::encode(mac.finalize().into_bytes())
        }
        SignatureScheme::SharedToken => return Some(secret.to_string()),
    };
    Some(format!("{}{}", scheme.prefix(), digest))
}

/// Checks `provided` against the signature expected for `body`.
///
/// Without a configured secret the check passes: signature validation is opt-in
/// per deployment. A mismatch returns `false` and never panics or errors, so the
/// caller can treat it as "not for this driver".
///
/// ```
/// use security::{SignatureScheme, sign, validate};
///
/// let body = br#"{"entry":[]}"#;
/// let sig = sign(SignatureScheme::HubSha1, "app-secret", body).unwrap();
/// assert!(validate(SignatureScheme::HubSha1, Some("app-secret"), body, &sig));
/// assert!(!validate(SignatureScheme::HubSha1, Some("app-secret"), body, "sha1=00"));
/// assert!(validate(SignatureScheme::HubSha1, None, body, ""));
/// ```
pub fn validate(
    scheme: SignatureScheme,
    secret: Option<&str>,
    body: &[u8],
    provided: &str,
) -> bool {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return true;
    };
    let Some(expected) = sign(scheme, secret, body) else {
        return false;
    };
    let ok: bool = expected.as_bytes().ct_eq(provided.as_bytes()).into();
    if !ok {
        tracing::debug!(?scheme, "webhook signature mismatch");
    }
    ok
}
