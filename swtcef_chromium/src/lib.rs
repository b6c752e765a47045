mod app;
mod cef_ref;
mod cef_string;
mod command_line;
mod context;
mod engine;
mod main_args;
mod settings;
#[cfg(unix)]
mod signals;

pub use chromium_sys;

pub mod cef {
    pub use crate::app::*;
    pub use crate::command_line::*;
    pub use crate::context::*;
    pub use crate::engine::*;
    pub use crate::main_args::*;
    pub use crate::settings::*;
}
