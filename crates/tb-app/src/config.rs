//! Reduction policy files.

use std::path::Path;
use tb_analysis::ReductionPolicy;

use crate::error::{AppError, AppResult};

/// Load a policy from YAML. Missing fields keep their defaults.
pub fn load_policy(path: &Path) -> AppResult<ReductionPolicy> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let policy: ReductionPolicy = serde_yaml::from_str(&content)?;
    policy.validate()?;
    tracing::debug!(path = %path.display(), ?policy, "loaded reduction policy");
    Ok(policy)
}

pub fn save_policy(path: &Path, policy: &ReductionPolicy) -> AppResult<()> {
    policy.validate()?;
    let content = serde_yaml::to_string(policy)?;
    std::fs::write(path, content).map_err(|e| AppError::ConfigWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
