pub mod context;
pub mod dispatcher;
pub mod registry;

pub use context::CommandContext;
pub use registry::{registered_groups, CommandRegistration};
