use serde::de::DeserializeOwned;
use std::sync::Arc;
use tauri::{plugin::PluginApi, AppHandle, Runtime};

use gallery_saver_core::{FixedPlatform, GallerySaverConfig, GalleryImporter, LocalMediaStore};

use crate::GallerySaver;

/// 非 Android 平台使用本地媒体库（默认 `~/Pictures`）。
pub fn init<R: Runtime, C: DeserializeOwned>(
  _app: &AppHandle<R>,
  _api: PluginApi<R, C>,
  config: GallerySaverConfig,
) -> crate::Result<GallerySaver> {
  let root = config.resolve_media_root();
  let store = LocalMediaStore::open_with_index(&root, config.resolve_index_dir())?;
  tracing::info!(
    root = %root.display(),
    index_dir = %store.index_dir().display(),
    "gallery saver using local media store"
  );
  Ok(GallerySaver::new(GalleryImporter::new(
    Arc::new(store),
    Arc::new(FixedPlatform::default()),
    config,
  )))
}
