pub mod color;
pub mod compare;
pub mod error;
pub mod logger;
pub mod output;
pub mod paths;
pub mod validation;
pub mod version;
