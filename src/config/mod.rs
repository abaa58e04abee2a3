/// Configuration system
///
/// - `macros`: `config_struct!` for single-declaration structs with defaults
/// - `schemas`: every configuration section
/// - `utils`: loading from TOML and validation
pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{
    Config, KeypairWalletConfig, LoggingConfig, MetadataConfig, RemoteSignerConfig, RpcConfig,
    SwapConfig, SwapRouter,
};
pub use utils::{load_config_from_path, parse_config, validate_config};
