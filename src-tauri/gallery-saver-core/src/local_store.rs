//! 基于本地文件系统的媒体库实现（桌面 / CLI / 测试）。
//!
//! 目录结构：
//! - `<root>/Pictures/`：公共图片目录，新版写入的文件也落在这里
//! - `<index_dir>/.media_index.json`：媒体索引（记录列表 + 自增 id），默认 `index_dir == root`
//!
//! 打开时会清掉上次崩溃残留的 Pending 记录及其文件。

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::app_paths::PICTURES_DIR_NAME;
use crate::media_store::{DurableFileWriter, MediaHandle, MediaRecord, MediaStore, NewMediaRecord, Visibility};
use crate::{Error, Result};

const INDEX_FILE_NAME: &str = ".media_index.json";
const HANDLE_PREFIX: &str = "local-media://images/";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaIndex {
    next_id: u64,
    records: Vec<MediaRecord>,
}

impl MediaIndex {
    fn position(&self, handle: &MediaHandle) -> Option<usize> {
        self.records.iter().position(|r| &r.handle == handle)
    }

    fn is_taken(&self, path: &Path) -> bool {
        path.exists()
            || self
                .records
                .iter()
                .any(|r| r.data_path.as_deref() == Some(path))
    }
}

pub struct LocalMediaStore {
    root: PathBuf,
    index_dir: PathBuf,
    index: Mutex<MediaIndex>,
}

impl LocalMediaStore {
    /// 打开（或初始化）`root` 下的媒体库，索引也放在 `root`。
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let index_dir = root.clone();
        Self::open_with_index(root, index_dir)
    }

    /// 图片放在 `root/Pictures`，索引放在 `index_dir`。
    pub fn open_with_index(root: impl Into<PathBuf>, index_dir: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let index_dir = index_dir.into();
        fs::create_dir_all(root.join(PICTURES_DIR_NAME))?;
        fs::create_dir_all(&index_dir)?;

        let index_path = index_dir.join(INDEX_FILE_NAME);
        let index = if index_path.is_file() {
            let bytes = fs::read(&index_path)?;
            serde_json::from_slice::<MediaIndex>(&bytes).map_err(|e| {
                Error::Index(format!("Failed to parse {}: {}", index_path.display(), e))
            })?
        } else {
            MediaIndex::default()
        };

        let store = Self {
            root,
            index_dir,
            index: Mutex::new(index),
        };
        store.purge_stale_pending()?;

        let records = store.lock()?.records.len();
        tracing::debug!(
            root = %store.root.display(),
            index_dir = %store.index_dir.display(),
            records,
            "local media store opened"
        );
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    /// 进程在写入中途退出时会留下 Pending 记录，下次打开时删除。
    fn purge_stale_pending(&self) -> Result<()> {
        let mut index = self.lock()?;
        let (stale, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut index.records)
            .into_iter()
            .partition(|r| r.visibility == Visibility::Pending);
        index.records = kept;
        if stale.is_empty() {
            return Ok(());
        }

        for record in &stale {
            tracing::warn!(handle = %record.handle, name = %record.display_name, "dropping stale pending record");
            if let Some(path) = &record.data_path {
                match fs::remove_file(path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to remove stale pending file"),
                }
            }
        }
        self.persist(&index)
    }

    pub fn get(&self, handle: &MediaHandle) -> Result<Option<MediaRecord>> {
        let index = self.lock()?;
        Ok(index.position(handle).map(|i| index.records[i].clone()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, MediaIndex>> {
        self.index
            .lock()
            .map_err(|e| Error::Index(format!("Lock error: {}", e)))
    }

    fn pictures_path(&self) -> PathBuf {
        self.root.join(PICTURES_DIR_NAME)
    }

    /// 先写临时文件再 rename，避免中途崩溃留下半个索引。
    fn persist(&self, index: &MediaIndex) -> Result<()> {
        let path = self.index_dir.join(INDEX_FILE_NAME);
        let tmp = self.index_dir.join(format!("{}.tmp", INDEX_FILE_NAME));
        let bytes = serde_json::to_vec_pretty(index)?;
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// 显示名冲突时按 `name (1).ext`、`name (2).ext` 依次追加序号。
    fn unique_destination(index: &MediaIndex, dir: &Path, display_name: &str) -> (String, PathBuf) {
        let candidate = dir.join(display_name);
        if !index.is_taken(&candidate) {
            return (display_name.to_string(), candidate);
        }

        let as_path = Path::new(display_name);
        let stem = as_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| display_name.to_string());
        let ext = as_path.extension().map(|e| e.to_string_lossy().to_string());

        let mut n = 1u32;
        loop {
            let name = match &ext {
                Some(ext) => format!("{} ({}).{}", stem, n, ext),
                None => format!("{} ({})", stem, n),
            };
            let candidate = dir.join(&name);
            if !index.is_taken(&candidate) {
                return (name, candidate);
            }
            n += 1;
        }
    }

    fn push_record(&self, index: &mut MediaIndex, record: MediaRecord) -> Result<MediaHandle> {
        let handle = record.handle.clone();
        index.records.push(record);
        index.next_id += 1;
        if let Err(e) = self.persist(index) {
            index.records.pop();
            index.next_id -= 1;
            return Err(e);
        }
        Ok(handle)
    }
}

impl MediaStore for LocalMediaStore {
    fn insert(&self, new: &NewMediaRecord) -> Result<Option<MediaHandle>> {
        let mut index = self.lock()?;
        let handle = MediaHandle::new(format!("{}{}", HANDLE_PREFIX, index.next_id + 1));

        if let Some(data_path) = &new.data_path {
            if !data_path.is_file() {
                tracing::warn!(path = %data_path.display(), "refusing to index a missing file");
                return Ok(None);
            }
            // 同一文件重复登记时更新原记录
            if let Some(i) = index
                .records
                .iter()
                .position(|r| r.data_path.as_deref() == Some(data_path.as_path()))
            {
                let existing = &mut index.records[i];
                existing.mime_type = new.mime_type.clone();
                existing.visibility = new.visibility;
                let handle = existing.handle.clone();
                self.persist(&index)?;
                return Ok(Some(handle));
            }

            let display_name = new
                .display_name
                .clone()
                .or_else(|| crate::app_paths::display_name_of(data_path))
                .unwrap_or_default();
            let record = MediaRecord {
                handle,
                display_name,
                mime_type: new.mime_type.clone(),
                visibility: new.visibility,
                data_path: Some(data_path.clone()),
            };
            return self.push_record(&mut index, record).map(Some);
        }

        let Some(display_name) = new.display_name.as_deref().filter(|n| !n.is_empty()) else {
            tracing::warn!("refusing to insert a record without display name");
            return Ok(None);
        };

        let (display_name, data_path) =
            Self::unique_destination(&index, &self.pictures_path(), display_name);
        // 占位空文件，保留文件名
        fs::File::create(&data_path)?;

        let record = MediaRecord {
            handle,
            display_name,
            mime_type: new.mime_type.clone(),
            visibility: new.visibility,
            data_path: Some(data_path.clone()),
        };
        match self.push_record(&mut index, record) {
            Ok(handle) => Ok(Some(handle)),
            Err(e) => {
                let _ = fs::remove_file(&data_path);
                Err(e)
            }
        }
    }

    fn open_write<'a>(&'a self, handle: &MediaHandle) -> io::Result<Box<dyn Write + 'a>> {
        let data_path = {
            let index = self
                .index
                .lock()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Lock error: {}", e)))?;
            index
                .position(handle)
                .and_then(|i| index.records[i].data_path.clone())
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, format!("No media record: {}", handle))
                })?
        };
        Ok(Box::new(DurableFileWriter::create(&data_path)?))
    }

    fn set_visibility(&self, handle: &MediaHandle, visibility: Visibility) -> Result<()> {
        let mut index = self.lock()?;
        let i = index
            .position(handle)
            .ok_or_else(|| Error::Index(format!("No media record: {}", handle)))?;
        let previous = index.records[i].visibility;
        index.records[i].visibility = visibility;
        if let Err(e) = self.persist(&index) {
            index.records[i].visibility = previous;
            return Err(e);
        }
        Ok(())
    }

    fn delete(&self, handle: &MediaHandle) -> Result<()> {
        let mut index = self.lock()?;
        let Some(i) = index.position(handle) else {
            tracing::debug!(%handle, "delete: record already gone");
            return Ok(());
        };
        let record = index.records.remove(i);
        if let Err(e) = self.persist(&index) {
            index.records.insert(i, record);
            return Err(e);
        }
        if let Some(path) = &record.data_path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn pictures_dir(&self) -> io::Result<PathBuf> {
        let dir = self.pictures_path();
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn list_images(&self) -> Result<Vec<MediaRecord>> {
        Ok(self.lock()?.records.clone())
    }
}
