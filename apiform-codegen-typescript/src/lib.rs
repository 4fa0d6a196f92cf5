mod actions;
mod client;
mod emit;
mod hooks;
mod naming;
mod pipeline;
mod queries;
mod runtime;
mod types;


pub use actions::*;
pub use client::*;
pub use hooks::*;
pub use pipeline::*;
pub use queries::*;
pub use runtime::*;
pub use types::*;
