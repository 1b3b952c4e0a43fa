//! 插件配置（`tauri.conf.json` 的 `plugins.gallery-saver`，或 CLI 的 `--config` 文件）。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// 旧版路径的默认子目录名。原 Android 应用写入 `Pictures/NotesApp`，
/// 需要保持该位置的应用应配置 `appDirName: "NotesApp"`。
pub const DEFAULT_APP_DIR_NAME: &str = "GallerySaver";
pub const DEFAULT_MIME_TYPE: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GallerySaverConfig {
    /// 旧版路径下 Pictures 中的子目录名，默认 [`DEFAULT_APP_DIR_NAME`]（不是原应用的 `NotesApp`）。
    pub app_dir_name: String,
    /// 写入媒体库时登记的 MIME 类型。
    pub mime_type: String,
    /// 旧版路径复制/登记失败时是否删除目标文件（默认保持不清理）。
    pub legacy_cleanup_on_failure: bool,
    /// 覆盖宿主上报的 API level（桌面、调试用）。
    pub api_level: Option<u32>,
    /// 本地媒体库根目录（仅桌面）。配置后索引文件也放在这里。
    pub media_root: Option<PathBuf>,
}

impl Default for GallerySaverConfig {
    fn default() -> Self {
        Self {
            app_dir_name: DEFAULT_APP_DIR_NAME.to_string(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            legacy_cleanup_on_failure: false,
            api_level: None,
            media_root: None,
        }
    }
}

impl GallerySaverConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| Error::InvalidArgument(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载配置；缺省字段使用默认值。
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.app_dir_name.trim();
        if name.is_empty() || name.contains(|c| c == '/' || c == '\\') || name == "." || name == ".." {
            return Err(Error::InvalidArgument(format!(
                "appDirName must be a single directory name, got {:?}",
                self.app_dir_name
            )));
        }
        if !self.mime_type.starts_with("image/") {
            return Err(Error::InvalidArgument(format!(
                "mimeType must be an image type, got {:?}",
                self.mime_type
            )));
        }
        Ok(())
    }

    /// 本地媒体库根目录：优先配置，其次用户主目录。
    pub fn resolve_media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(crate::app_paths::default_media_root)
    }

    /// 本地媒体索引所在目录：配置了 `mediaRoot` 时与之相同，否则在本地数据目录下。
    pub fn resolve_index_dir(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(crate::app_paths::default_index_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = GallerySaverConfig::from_json_str("{}").unwrap();
        assert_eq!(config, GallerySaverConfig::default());
        assert_eq!(config.mime_type, "image/png");
    }

    #[test]
    fn camel_case_fields() {
        let config = GallerySaverConfig::from_json_str(
            r#"{"appDirName":"NotesApp","legacyCleanupOnFailure":true,"apiLevel":28}"#,
        )
        .unwrap();
        assert_eq!(config.app_dir_name, "NotesApp");
        assert!(config.legacy_cleanup_on_failure);
        assert_eq!(config.api_level, Some(28));
    }

    #[test]
    fn default_app_dir_is_gallery_saver() {
        assert_eq!(GallerySaverConfig::default().app_dir_name, "GallerySaver");
        let legacy = GallerySaverConfig::from_json_str(r#"{"appDirName":"NotesApp"}"#).unwrap();
        assert_eq!(legacy.app_dir_name, "NotesApp");
    }

    #[test]
    fn index_dir_follows_configured_media_root() {
        let config = GallerySaverConfig {
            media_root: Some(PathBuf::from("/tmp/media")),
            ..Default::default()
        };
        assert_eq!(config.resolve_index_dir(), PathBuf::from("/tmp/media"));
        assert_eq!(
            GallerySaverConfig::default().resolve_index_dir(),
            crate::app_paths::default_index_dir()
        );
    }

    #[test]
    fn rejects_nested_app_dir() {
        let err = GallerySaverConfig::from_json_str(r#"{"appDirName":"a/b"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_non_image_mime() {
        let err = GallerySaverConfig::from_json_str(r#"{"mimeType":"text/plain"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
