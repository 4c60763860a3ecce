//! The components module contains all shared components for our app.

mod app;
mod audio_manager;
mod icons;
mod loading_screen;
mod music_toggle;
mod sections;

pub use app::*;
pub use audio_manager::*;
pub use icons::*;
pub use loading_screen::*;
pub use music_toggle::*;
pub use sections::*;
