pub mod client;
pub mod parse;
pub mod prompts;
pub mod template;

pub use client::*;
pub use parse::*;
pub use prompts::*;
pub use template::*;
