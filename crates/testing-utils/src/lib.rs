pub mod bin;
pub mod fs;
pub mod logs;
pub mod registry;
