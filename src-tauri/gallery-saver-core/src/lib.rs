//! Gallery Saver 共享核心：把本地图片导入系统共享图库。
//!
//! 由 tauri-plugin-gallery-saver（Android / 桌面）与 gallery-saver CLI 共同使用。

pub mod app_paths;
pub mod channel;
pub mod config;
pub mod error;
pub mod importer;
pub mod local_store;
pub mod logging;
pub mod media_store;
pub mod platform;

pub use channel::{handle_method_call, MethodCall, MethodResponse};
pub use config::GallerySaverConfig;
pub use error::{Error, Result};
pub use importer::{GalleryImporter, ImportOutcome};
pub use local_store::LocalMediaStore;
pub use media_store::{MediaHandle, MediaRecord, MediaStore, NewMediaRecord, Visibility};
pub use platform::{select_strategy, FixedPlatform, HostPlatform, ImportStrategy};
