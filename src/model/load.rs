use anyhow::Context;
use std::path::Path;

use super::types::ApiDescription;

/// Load a serialized API model from a `.yaml`, `.yml` or `.json` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not deserialize into
/// an [`ApiDescription`].
pub fn load_api(path: &Path) -> anyhow::Result<ApiDescription> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read API model: {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let api: ApiDescription = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML API model: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON API model: {}", path.display()))?
    };
    Ok(api)
}
