use std::fs;
use std::path::Path;

use crate::core::LendingPolicy;
use crate::error::AppError;

/// Loads the lending policy. Without a path the canonical defaults apply;
/// a JSON file only needs the values it overrides.
pub fn load_policy(path: Option<&Path>) -> Result<LendingPolicy, AppError> {
    let policy = match path {
        None => LendingPolicy::default(),
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|source| AppError::PolicyFile {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str::<LendingPolicy>(&raw)?
        }
    };
    policy.validate()?;
    Ok(policy)
}
