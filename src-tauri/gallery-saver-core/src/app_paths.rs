use std::path::{Path, PathBuf};

/// 本地媒体库下的公共图片目录名。
pub const PICTURES_DIR_NAME: &str = "Pictures";

/// 本地媒体库默认根目录：用户主目录（图片目录即 `~/Pictures`）。
///
/// 拿不到主目录时回退到本地数据目录下的 `GallerySaver/`。
pub fn default_media_root() -> PathBuf {
    dirs::home_dir()
        .or_else(|| dirs::data_local_dir().map(|d| d.join("GallerySaver")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// 默认媒体库的索引目录：本地数据目录下的 `GallerySaver/`，不写进用户主目录。
pub fn default_index_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("GallerySaver"))
        .unwrap_or_else(default_media_root)
}

/// 旧版路径的目标目录：`<pictures>/<app_dir_name>`，不存在则创建。
pub fn ensure_app_pictures_dir(pictures: &Path, app_dir_name: &str) -> std::io::Result<PathBuf> {
    let dir = pictures.join(app_dir_name);
    if !dir.is_dir() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// 取路径最后一段作为显示名；没有文件名（如 `/`、`..`）时返回 None。
pub fn display_name_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
