pub mod platforms;
pub mod settings;

pub use platforms::{ParamSpec, PlatformSpec, platform_registry, resolve_params};
pub use settings::Config;
