//! 将本地图片文件导入系统共享图库。
//!
//! 按宿主 API level 选择策略：
//! - Scoped（API >= 29）：插入 Pending 记录 -> 写入内容 -> 公开；任何 IO 失败都删除记录回滚
//! - Legacy：复制到 `Pictures/<appDirName>/` -> 登记到媒体索引；默认失败不清理

use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use crate::app_paths::{display_name_of, ensure_app_pictures_dir};
use crate::config::GallerySaverConfig;
use crate::media_store::{MediaHandle, MediaStore, NewMediaRecord, Visibility};
use crate::platform::{select_strategy, HostPlatform, ImportStrategy};
use crate::{Error, Result};

/// 一次成功导入的结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub strategy: ImportStrategy,
    pub handle: MediaHandle,
    pub display_name: String,
    pub bytes: u64,
}

/// 图库导入器。本身不持有可变状态，clone 后可在多个线程并发使用。
#[derive(Clone)]
pub struct GalleryImporter {
    store: Arc<dyn MediaStore>,
    platform: Arc<dyn HostPlatform>,
    config: Arc<GallerySaverConfig>,
}

impl GalleryImporter {
    pub fn new(
        store: Arc<dyn MediaStore>,
        platform: Arc<dyn HostPlatform>,
        config: GallerySaverConfig,
    ) -> Self {
        Self {
            store,
            platform,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &Arc<dyn MediaStore> {
        &self.store
    }

    pub fn config(&self) -> &GallerySaverConfig {
        &self.config
    }

    /// 当前调用应使用的策略；每次都重新询问平台。
    pub fn strategy(&self) -> ImportStrategy {
        let level = self.config.api_level.unwrap_or_else(|| self.platform.api_level());
        select_strategy(level)
    }

    /// 导入图片，所有 IO / 媒体库错误折叠为 `false`。
    pub fn import_image(&self, source_path: &str) -> bool {
        match self.try_import(Path::new(source_path)) {
            Ok(outcome) => {
                tracing::info!(
                    source = source_path,
                    handle = %outcome.handle,
                    strategy = ?outcome.strategy,
                    bytes = outcome.bytes,
                    "image saved to gallery"
                );
                true
            }
            Err(e) => {
                tracing::warn!(source = source_path, error = %e, "failed to save image to gallery");
                false
            }
        }
    }

    pub fn try_import(&self, source: &Path) -> Result<ImportOutcome> {
        match self.strategy() {
            ImportStrategy::Scoped => self.import_scoped(source),
            ImportStrategy::Legacy => self.import_legacy(source),
        }
    }

    fn import_scoped(&self, source: &Path) -> Result<ImportOutcome> {
        let display_name = require_file_name(source)?;
        let handle = self
            .store
            .insert(&NewMediaRecord::pending(&display_name, &self.config.mime_type))?
            .ok_or(Error::StorageInsertFailed)?;
        tracing::debug!(%handle, name = %display_name, "pending media record created");

        match self.write_and_publish(&handle, source) {
            Ok(bytes) => Ok(ImportOutcome {
                strategy: ImportStrategy::Scoped,
                handle,
                display_name,
                bytes,
            }),
            Err(e) => {
                self.rollback(&handle);
                Err(e)
            }
        }
    }

    /// 写入并公开记录。两个流都在块结束时关闭（包括 `?` 提前返回）。
    fn write_and_publish(&self, handle: &MediaHandle, source: &Path) -> Result<u64> {
        let bytes = {
            let mut output = self.store.open_write(handle)?;
            let mut input = File::open(source)?;
            let n = io::copy(&mut input, &mut output)?;
            output.flush()?;
            n
        };
        self.store.set_visibility(handle, Visibility::Visible)?;
        Ok(bytes)
    }

    fn rollback(&self, handle: &MediaHandle) {
        match self.store.delete(handle) {
            Ok(()) => tracing::debug!(%handle, "pending media record rolled back"),
            Err(e) => tracing::error!(%handle, error = %e, "failed to roll back pending media record"),
        }
    }

    fn import_legacy(&self, source: &Path) -> Result<ImportOutcome> {
        let file_name = require_file_name(source)?;
        let pictures = self.store.pictures_dir()?;
        let app_dir = ensure_app_pictures_dir(&pictures, &self.config.app_dir_name)?;
        let dest = app_dir.join(&file_name);

        let bytes = if is_same_file(source, &dest) {
            // 源文件已在图库目录中，只需重新登记
            std::fs::metadata(&dest)?.len()
        } else {
            let mut input = File::open(source)?;
            let mut output = self.store.open_legacy_write(&dest)?;
            let copied = io::copy(&mut input, &mut output).and_then(|n| output.flush().map(|()| n));
            drop(output);
            match copied {
                Ok(n) => n,
                Err(e) => {
                    self.cleanup_legacy(&dest);
                    return Err(e.into());
                }
            }
        };

        let inserted = self
            .store
            .insert(&NewMediaRecord::existing_file(&dest, &self.config.mime_type));
        let handle = match inserted {
            Ok(Some(handle)) => handle,
            Ok(None) => {
                self.cleanup_legacy(&dest);
                return Err(Error::StorageInsertFailed);
            }
            Err(e) => {
                self.cleanup_legacy(&dest);
                return Err(e);
            }
        };

        Ok(ImportOutcome {
            strategy: ImportStrategy::Legacy,
            handle,
            display_name: file_name,
            bytes,
        })
    }

    /// 旧版路径没有 Pending 阶段；只有开启 `legacyCleanupOnFailure` 才删除目标文件。
    fn cleanup_legacy(&self, dest: &Path) {
        if !self.config.legacy_cleanup_on_failure {
            tracing::warn!(dest = %dest.display(), "legacy import failed; destination left in place");
            return;
        }
        match std::fs::remove_file(dest) {
            Ok(()) => tracing::debug!(dest = %dest.display(), "legacy destination removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::error!(dest = %dest.display(), error = %e, "failed to remove legacy destination"),
        }
    }
}

fn require_file_name(source: &Path) -> Result<String> {
    display_name_of(source).ok_or_else(|| {
        Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Source path has no file name: {}", source.display()),
        ))
    })
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::LocalMediaStore;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct SwitchablePlatform(AtomicU32);

    impl HostPlatform for SwitchablePlatform {
        fn api_level(&self) -> u32 {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn strategy_is_evaluated_per_call() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalMediaStore::open(tmp.path()).unwrap());
        let platform = Arc::new(SwitchablePlatform(AtomicU32::new(33)));
        let importer = GalleryImporter::new(store, platform.clone(), GallerySaverConfig::default());

        assert_eq!(importer.strategy(), ImportStrategy::Scoped);
        platform.0.store(28, Ordering::SeqCst);
        assert_eq!(importer.strategy(), ImportStrategy::Legacy);
    }

    #[test]
    fn config_api_level_overrides_platform() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalMediaStore::open(tmp.path()).unwrap());
        let platform = Arc::new(SwitchablePlatform(AtomicU32::new(33)));
        let config = GallerySaverConfig {
            api_level: Some(21),
            ..Default::default()
        };
        let importer = GalleryImporter::new(store, platform, config);
        assert_eq!(importer.strategy(), ImportStrategy::Legacy);
    }

    #[test]
    fn path_without_file_name_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalMediaStore::open(tmp.path()).unwrap());
        let importer = GalleryImporter::new(
            store.clone(),
            Arc::new(SwitchablePlatform(AtomicU32::new(33))),
            GallerySaverConfig::default(),
        );
        assert!(matches!(importer.try_import(Path::new("/")), Err(Error::Io(_))));
        assert!(!importer.import_image(""));
        assert!(store.list_images().unwrap().is_empty());
    }

    #[test]
    fn legacy_reimport_of_gallery_file_keeps_content() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalMediaStore::open(tmp.path()).unwrap());
        let importer = GalleryImporter::new(
            store.clone(),
            Arc::new(SwitchablePlatform(AtomicU32::new(28))),
            GallerySaverConfig::default(),
        );
        let dir = ensure_app_pictures_dir(&store.pictures_dir().unwrap(), "GallerySaver").unwrap();
        let in_gallery = dir.join("same.png");
        std::fs::write(&in_gallery, b"keep me").unwrap();

        assert!(importer.import_image(in_gallery.to_str().unwrap()));
        assert_eq!(std::fs::read(&in_gallery).unwrap(), b"keep me");
    }
}
