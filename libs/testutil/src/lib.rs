use anyhow::{Context, Result};
use security::SignatureScheme;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub fn workspace_root() -> PathBuf {
    // workspace root is two levels up from this crate's manifest (libs/testutil)
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .ancestors()
        .nth(2)
        .unwrap_or(manifest)
        .to_path_buf()
}

/// Reads a fixture relative to the workspace root.
pub fn fixture_bytes(relative: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = workspace_root().join(relative.as_ref());
    fs::read(&path).with_context(|| format!("failed to read fixture {}", path.display()))
}

pub fn load_fixture(relative: impl AsRef<Path>) -> Result<Value> {
    let relative = relative.as_ref();
    let bytes = fixture_bytes(relative)?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("fixture {} is not valid json", relative.display()))
}

/// `X-Hub-Signature` header value for `body`.
pub fn hub_signature(secret: &str, body: &[u8]) -> String {
    security::sign(SignatureScheme::HubSha1, secret, body).unwrap_or_default()
}
