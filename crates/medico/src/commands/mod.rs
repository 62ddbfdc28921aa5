//! Command handlers: bridge CLI args -> core state machines -> output.

pub mod clinicas;
pub mod config_cmd;
pub mod medicos;
pub mod util;
