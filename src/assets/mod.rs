//! # Asset Discovery
//!
//! Finds the images and soundtrack a gallery is built from, and reads the
//! optional per-image title file.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use video_gallery::assets::{AssetLoader, TitleMap};
//!
//! # fn main() -> anyhow::Result<()> {
//! let images = AssetLoader::list_images("images")?;
//! let soundtrack = AssetLoader::list_audio("sound")?;
//! let titles = TitleMap::load("titles.txt")?;
//!
//! println!("{} images, soundtrack: {:?}", images.len(), soundtrack);
//! println!("{} titles", titles.len());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod titles;
pub mod types;

pub use loader::AssetLoader;
pub use titles::TitleMap;
pub use types::ImageAsset;
