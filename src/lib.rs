#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod components;
pub mod config;
pub mod document;
pub mod error;
pub mod file_handler;
pub mod generation;
pub mod image;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod state;
pub mod stroke;
pub mod surface;
pub mod texture_manager;

pub use app::PaintApp;
pub use command::{Command, SnapshotHistory};
pub use config::AppConfig;
pub use document::Document;
pub use input::{CanvasMapping, InputEvent};
pub use renderer::StrokeRenderer;
pub use stroke::{StrokeStyle, Tool};
pub use surface::Surface;
