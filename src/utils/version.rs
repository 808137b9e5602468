use crate::utils::error::{NimbusError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // static regex
static BUILD_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#-]+\d+").expect("static regex should not panic"));

/// `MAJOR.MINOR.REVISION` 版本號
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// 從 `major[.minor[.revision]]` 字串解析，缺少的部分視為 0
    pub fn from_string(version_string: &str) -> Result<Self> {
        let trimmed = version_string.trim();
        let mut parts = [0u32; 3];
        for (i, piece) in trimmed.split('.').take(3).enumerate() {
            parts[i] = piece
                .parse()
                .map_err(|_| NimbusError::InvalidConfigValueError {
                    field: "version".to_string(),
                    value: version_string.to_string(),
                    reason: "Expected 'major[.minor[.revision]]' with numeric parts".to_string(),
                })?;
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }

    /// 從 CI pipeline label 解析 (會移除 `#12`、`-3` 之類的建置計數)
    pub fn from_pipe_label(label: &str) -> Result<Self> {
        let version_label = BUILD_COUNTER.replace_all(label, "");
        Self::from_string(version_label.trim())
    }

    /// Increments MINOR, zeroing REVISION.
    pub fn increment_minor(&self, increment: u32) -> Self {
        Self::new(self.major, self.minor + increment, 0)
    }

    pub fn increment_revision(&self, increment: u32) -> Self {
        Self::new(self.major, self.minor, self.revision + increment)
    }

    pub fn as_tuple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.revision)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.revision > 0 {
            write!(f, ".{}", self.revision)?;
        }
        Ok(())
    }
}
