//! Dev tenant seeding from a JSON file.
//!
//! The seed file is a JSON array of tenant records. Seeding only runs
//! outside production and is best-effort at the call site: a missing or
//! malformed file is logged, not fatal.

use std::path::Path;

use anyhow::Context;

use warelay_types::tenant::TenantRecord;

/// Read and parse a seed file into tenant records.
pub async fn load_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<TenantRecord>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let tenants: Vec<TenantRecord> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse seed file {}", path.display()))?;
    Ok(tenants)
}
