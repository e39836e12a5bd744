//! Configuration section definitions.

mod build;
mod optimize;
mod sprite;
mod watch;

pub use build::BuildConfig;
pub use optimize::OptimizeConfig;
pub use sprite::SpriteConfig;
pub use watch::WatchConfig;
