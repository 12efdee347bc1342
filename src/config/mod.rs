mod loader;

pub use loader::{load_config, LoadedConfig, OutputFormat, TfvarConfig, CONFIG_FILE_NAME};
