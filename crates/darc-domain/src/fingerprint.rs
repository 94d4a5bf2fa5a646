use crate::model::RegisteredPlugin;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a plugin snapshot.
///
/// Identity fields (canonical JSON, in registration order):
/// - plugin id
/// - hook, return type, level, voting rule
/// - the full condition tree
/// - notes
pub fn snapshot_fingerprint(plugins: &[RegisteredPlugin]) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_vec(plugins)?;

    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let digest = hasher.finalize();
    Ok(hex::encode(digest))
}
