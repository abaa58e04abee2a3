pub mod arguments;
pub mod config;
pub mod constants;
pub mod errors; // Structured error handling
pub mod events; // Presentation bridge
pub mod logger;
pub mod rpc;
pub mod swaps;
pub mod tokens;
pub mod transactions;
pub mod utils;
pub mod wallets;

#[cfg(test)]
pub mod testing;
