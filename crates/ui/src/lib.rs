mod app;
mod surface;
mod theme;

pub use app::DemoApp;
pub use surface::EguiSurface;
pub use theme::{resolve, ThemeMode};
