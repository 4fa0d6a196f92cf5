pub mod codegen;
pub mod config;
pub mod error;
pub mod parse;
pub mod registry;
pub mod signature;
