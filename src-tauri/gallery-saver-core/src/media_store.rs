//! 平台媒体库抽象。
//!
//! Android 上由 tauri-plugin-gallery-saver 通过 PluginHandle 调用 Kotlin 的 MediaStore /
//! ContentResolver 实现；桌面、CLI 与测试使用 [`crate::local_store::LocalMediaStore`]。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::Result;

/// 媒体记录的可见状态。Pending 期间其它应用看不到该记录。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    Pending,
    Visible,
}

/// 媒体记录的不透明定位标识（Android 上是 `content://media/...` URI）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaHandle(String);

impl MediaHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 创建媒体记录时提交的字段（对应 ContentValues）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaRecord {
    pub display_name: Option<String>,
    pub mime_type: String,
    pub visibility: Visibility,
    /// 旧版路径直接指定文件的绝对位置；新版由媒体库自行分配。
    pub data_path: Option<PathBuf>,
}

impl NewMediaRecord {
    /// 新版（scoped storage）写入：先以 Pending 状态占位，写完再公开。
    pub fn pending(display_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            mime_type: mime_type.into(),
            visibility: Visibility::Pending,
            data_path: None,
        }
    }

    /// 旧版写入：文件已落盘，直接登记为可见。
    pub fn existing_file(data_path: &Path, mime_type: impl Into<String>) -> Self {
        Self {
            display_name: data_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            mime_type: mime_type.into(),
            visibility: Visibility::Visible,
            data_path: Some(data_path.to_path_buf()),
        }
    }
}

/// 媒体库中的一条图片记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub handle: MediaHandle,
    pub display_name: String,
    pub mime_type: String,
    pub visibility: Visibility,
    pub data_path: Option<PathBuf>,
}

impl MediaRecord {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }
}

/// 带缓冲的文件写入流，`flush` 时同时 `sync_all`。
pub struct DurableFileWriter {
    inner: BufWriter<File>,
}

impl DurableFileWriter {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            inner: BufWriter::new(File::create(path)?),
        })
    }
}

impl Write for DurableFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()?;
        self.inner.get_ref().sync_all()
    }
}

/// 共享媒体库（图片集合）的操作集合。
///
/// 实现需要是线程安全的：同一个 store 会被多个并发导入共享。
pub trait MediaStore: Send + Sync {
    /// 在图片集合中创建记录；媒体库拒绝时返回 `Ok(None)`。
    fn insert(&self, record: &NewMediaRecord) -> Result<Option<MediaHandle>>;

    /// 打开记录内容的写入流。流在 drop 时关闭，调用方需在 drop 前 `flush`；
    /// `flush` 返回 Ok 即表示内容已落盘。
    fn open_write<'a>(&'a self, handle: &MediaHandle) -> io::Result<Box<dyn Write + 'a>>;

    /// 旧版路径：在公共图片目录下创建（覆盖）目标文件并返回写入流，语义同 [`MediaStore::open_write`]。
    fn open_legacy_write<'a>(&'a self, dest: &Path) -> io::Result<Box<dyn Write + 'a>> {
        Ok(Box::new(DurableFileWriter::create(dest)?))
    }

    fn set_visibility(&self, handle: &MediaHandle, visibility: Visibility) -> Result<()>;

    /// 删除记录及其内容。
    fn delete(&self, handle: &MediaHandle) -> Result<()>;

    /// 公共图片目录（Android 的 `Environment.DIRECTORY_PICTURES`），旧版路径使用。
    fn pictures_dir(&self) -> io::Result<PathBuf>;

    /// 列出图片集合中的所有记录（含 Pending）。
    fn list_images(&self) -> Result<Vec<MediaRecord>>;
}

impl<S: MediaStore + ?Sized> MediaStore for std::sync::Arc<S> {
    fn insert(&self, record: &NewMediaRecord) -> Result<Option<MediaHandle>> {
        (**self).insert(record)
    }

    fn open_write<'a>(&'a self, handle: &MediaHandle) -> io::Result<Box<dyn Write + 'a>> {
        (**self).open_write(handle)
    }

    fn open_legacy_write<'a>(&'a self, dest: &Path) -> io::Result<Box<dyn Write + 'a>> {
        (**self).open_legacy_write(dest)
    }

    fn set_visibility(&self, handle: &MediaHandle, visibility: Visibility) -> Result<()> {
        (**self).set_visibility(handle, visibility)
    }

    fn delete(&self, handle: &MediaHandle) -> Result<()> {
        (**self).delete(handle)
    }

    fn pictures_dir(&self) -> io::Result<PathBuf> {
        (**self).pictures_dir()
    }

    fn list_images(&self) -> Result<Vec<MediaRecord>> {
        (**self).list_images()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_file_uses_file_name_and_visible_state() {
        let record = NewMediaRecord::existing_file(Path::new("/sdcard/Pictures/App/a.png"), "image/png");
        assert_eq!(record.display_name.as_deref(), Some("a.png"));
        assert_eq!(record.visibility, Visibility::Visible);
        assert_eq!(record.data_path.as_deref(), Some(Path::new("/sdcard/Pictures/App/a.png")));
    }

    #[test]
    fn durable_writer_flush_persists_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.png");
        let mut w = DurableFileWriter::create(&path).unwrap();
        w.write_all(b"abc").unwrap();
        w.flush().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
    }

    #[test]
    fn handle_serializes_as_plain_string() {
        let handle = MediaHandle::new("content://media/external/images/media/7");
        let json = serde_json::to_string(&handle).unwrap();
        assert_eq!(json, "\"content://media/external/images/media/7\"");
    }
}
