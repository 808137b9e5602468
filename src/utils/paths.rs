use crate::utils::error::{NimbusError, Result};
use std::path::{Path, PathBuf};

pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| NimbusError::ConfigError {
        message: "Could not determine the user's home directory".to_string(),
    })
}

/// Expand `~` prefix to user home directory.
///
/// Returns the path unchanged if no tilde prefix is present.
pub fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return home_dir();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(home_dir()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

pub fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_tilde("~").unwrap(), home);
        assert_eq!(expand_tilde("~/data").unwrap(), home.join("data"));
        assert_eq!(expand_tilde("/abs/path").unwrap(), PathBuf::from("/abs/path"));
    }
}
