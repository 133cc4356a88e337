//! MultiDrag Application
//!
//! The application shell: owns the interaction state, renders it to SVG and,
//! in the browser, wires DOM pointer events into it.

mod app;

pub use app::{App, AppConfig, AppError};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{MountedApp, mount, mount_with_config, run_wasm, unmount};
