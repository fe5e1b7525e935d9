//! Platform backends for [`crate::app::App`].

pub mod headless;
pub use headless::HeadlessPlatform;

#[cfg(feature = "sdl")]
pub mod desktop;
#[cfg(feature = "sdl")]
pub use desktop::DesktopPlatform;
