//! Interactive chat for Urna.
//!
//! Implements the chat loop: login prompts driven by the session gate,
//! overlapping turns with a pending counter, slash commands and markdown
//! rendering of answers. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
