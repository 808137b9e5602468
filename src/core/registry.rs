use crate::domain::ports::CommandGroup;
use crate::utils::error::{NimbusError, Result};

/// 指令群組的註冊資訊，由各指令模組以 `inventory::submit!` 提交
pub struct CommandRegistration {
    pub factory: fn() -> Box<dyn CommandGroup>,
}

impl CommandRegistration {
    pub const fn new(factory: fn() -> Box<dyn CommandGroup>) -> Self {
        Self { factory }
    }
}

inventory::collect!(CommandRegistration);

/// 所有已註冊的指令群組，依名稱排序
pub fn registered_groups() -> Result<Vec<Box<dyn CommandGroup>>> {
    let mut groups: Vec<Box<dyn CommandGroup>> = inventory::iter::<CommandRegistration>
        .into_iter()
        .map(|registration| (registration.factory)())
        .collect();
    groups.sort_by_key(|group| group.name());

    if let Some(pair) = groups.windows(2).find(|pair| pair[0].name() == pair[1].name()) {
        return Err(NimbusError::ConfigError {
            message: format!("Command group '{}' is registered more than once", pair[0].name()),
        });
    }

    tracing::debug!("📋 {} command groups registered", groups.len());
    Ok(groups)
}

pub fn find_group<'a>(groups: &'a [Box<dyn CommandGroup>], name: &str) -> Option<&'a dyn CommandGroup> {
    groups.iter().find(|group| group.name() == name).map(|group| group.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_are_registered_and_sorted() {
        let groups = registered_groups().unwrap();
        let names: Vec<_> = groups.iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["backup", "cache", "factorio", "monitor"]);
    }

    #[test]
    fn test_group_command_matches_name() {
        let groups = registered_groups().unwrap();
        for group in &groups {
            assert_eq!(group.command().get_name(), group.name());
        }
        assert!(find_group(&groups, "cache").is_some());
        assert!(find_group(&groups, "gui").is_none());
    }
}
