//! Android：通过 PluginHandle 调用 Kotlin 侧的 MediaStore / ContentResolver 原语，
//! 导入流程本身（策略选择、Pending、回滚）仍在 Rust 的 GalleryImporter 中。

use base64::Engine;
use serde::de::DeserializeOwned;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tauri::{
  plugin::{PluginApi, PluginHandle},
  AppHandle, Runtime,
};

use gallery_saver_core::{
  platform::SCOPED_STORAGE_MIN_API_LEVEL, GallerySaverConfig, GalleryImporter, HostPlatform, MediaHandle,
  MediaRecord, MediaStore, NewMediaRecord, Visibility,
};

use crate::models::*;
use crate::GallerySaver;

/// 单次 appendImageBytes 的最大数据量，超过即先行发送。
const CHUNK_SIZE: usize = 512 * 1024;

// initializes the Kotlin plugin class
pub fn init<R: Runtime, C: DeserializeOwned>(
  _app: &AppHandle<R>,
  api: PluginApi<R, C>,
  config: GallerySaverConfig,
) -> crate::Result<GallerySaver> {
  let handle = api.register_android_plugin("app.gallerysaver.plugin", "GallerySaverPlugin")?;
  let store = MobileMediaStore {
    handle: handle.clone(),
  };
  let platform = MobilePlatform { handle };
  Ok(GallerySaver::new(GalleryImporter::new(
    Arc::new(store),
    Arc::new(platform),
    config,
  )))
}

fn invoke_error(e: impl std::fmt::Display) -> io::Error {
  io::Error::new(io::ErrorKind::Other, e.to_string())
}

fn core_error(e: impl std::fmt::Display) -> gallery_saver_core::Error {
  gallery_saver_core::Error::Io(invoke_error(e))
}

/// 基于 PluginHandle 的 MediaStore。
pub struct MobileMediaStore<R: Runtime> {
  handle: PluginHandle<R>,
}

impl<R: Runtime> MediaStore for MobileMediaStore<R> {
  fn insert(&self, record: &NewMediaRecord) -> gallery_saver_core::Result<Option<MediaHandle>> {
    let args = InsertImageArgs {
      display_name: record.display_name.clone(),
      mime_type: record.mime_type.clone(),
      pending: record.visibility == Visibility::Pending,
      data_path: record
        .data_path
        .as_ref()
        .map(|p| p.to_string_lossy().to_string()),
    };
    let resp: InsertImageResponse = self
      .handle
      .run_mobile_plugin("insertImage", args)
      .map_err(core_error)?;
    Ok(resp.uri.map(MediaHandle::new))
  }

  fn open_write<'a>(&'a self, handle: &MediaHandle) -> io::Result<Box<dyn Write + 'a>> {
    Ok(Box::new(MobileWriter {
      handle: &self.handle,
      uri: handle.as_str().to_string(),
      buffer: Vec::with_capacity(CHUNK_SIZE),
    }))
  }

  fn set_visibility(&self, handle: &MediaHandle, visibility: Visibility) -> gallery_saver_core::Result<()> {
    self
      .handle
      .run_mobile_plugin::<()>(
        "setImagePending",
        SetImagePendingArgs {
          uri: handle.as_str().to_string(),
          pending: visibility == Visibility::Pending,
        },
      )
      .map_err(core_error)
  }

  fn delete(&self, handle: &MediaHandle) -> gallery_saver_core::Result<()> {
    self
      .handle
      .run_mobile_plugin::<()>(
        "deleteImage",
        DeleteImageArgs {
          uri: handle.as_str().to_string(),
        },
      )
      .map_err(core_error)
  }

  fn pictures_dir(&self) -> io::Result<PathBuf> {
    let resp: PicturesDirResponse = self
      .handle
      .run_mobile_plugin("getPicturesDir", ())
      .map_err(invoke_error)?;
    Ok(PathBuf::from(resp.path))
  }

  fn list_images(&self) -> gallery_saver_core::Result<Vec<MediaRecord>> {
    let resp: ListImagesResponse = self
      .handle
      .run_mobile_plugin("listImages", ())
      .map_err(core_error)?;
    Ok(resp
      .images
      .into_iter()
      .map(|e| MediaRecord {
        handle: MediaHandle::new(e.uri),
        display_name: e.display_name,
        mime_type: e.mime_type,
        visibility: if e.pending {
          Visibility::Pending
        } else {
          Visibility::Visible
        },
        data_path: e.data_path.map(PathBuf::from),
      })
      .collect())
  }
}

/// ContentResolver 输出流的桥接：数据按块 base64 后追加到记录。
struct MobileWriter<'a, R: Runtime> {
  handle: &'a PluginHandle<R>,
  uri: String,
  buffer: Vec<u8>,
}

impl<R: Runtime> MobileWriter<'_, R> {
  fn send_buffer(&mut self) -> io::Result<()> {
    if self.buffer.is_empty() {
      return Ok(());
    }
    let data = base64::engine::general_purpose::STANDARD.encode(&self.buffer);
    self
      .handle
      .run_mobile_plugin::<()>(
        "appendImageBytes",
        AppendImageBytesArgs {
          uri: self.uri.clone(),
          data,
        },
      )
      .map_err(invoke_error)?;
    self.buffer.clear();
    Ok(())
  }
}

impl<R: Runtime> Write for MobileWriter<'_, R> {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.buffer.extend_from_slice(buf);
    if self.buffer.len() >= CHUNK_SIZE {
      self.send_buffer()?;
    }
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    self.send_buffer()
  }
}

impl<R: Runtime> Drop for MobileWriter<'_, R> {
  fn drop(&mut self) {
    if !self.buffer.is_empty() {
      if let Err(e) = self.send_buffer() {
        tracing::error!(uri = %self.uri, error = %e, "failed to send remaining image bytes");
      }
    }
  }
}

/// 每次调用都向 Kotlin 查询 `Build.VERSION.SDK_INT`。
pub struct MobilePlatform<R: Runtime> {
  handle: PluginHandle<R>,
}

impl<R: Runtime> HostPlatform for MobilePlatform<R> {
  fn api_level(&self) -> u32 {
    match self.handle.run_mobile_plugin::<ApiLevelResponse>("getApiLevel", ()) {
      Ok(resp) => resp.api_level,
      Err(e) => {
        tracing::warn!(error = %e, "getApiLevel failed, assuming scoped storage");
        SCOPED_STORAGE_MIN_API_LEVEL
      }
    }
  }
}
