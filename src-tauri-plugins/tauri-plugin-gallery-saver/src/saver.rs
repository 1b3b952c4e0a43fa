use gallery_saver_core::{
  channel::{FILE_PATH_ARG, SAVE_IMAGE_TO_GALLERY},
  handle_method_call, GalleryImporter, MethodCall, MethodResponse,
};

use crate::{Error, Result};

/// Access to the gallery saver APIs.
pub struct GallerySaver {
  importer: GalleryImporter,
}

impl GallerySaver {
  pub(crate) fn new(importer: GalleryImporter) -> Self {
    Self { importer }
  }

  pub fn importer(&self) -> &GalleryImporter {
    &self.importer
  }

  /// 保存图片到共享图库。导入在阻塞线程上执行，完成后回到调用方。
  pub async fn save_image_to_gallery(&self, file_path: Option<String>) -> Result<bool> {
    let mut call = MethodCall::new(SAVE_IMAGE_TO_GALLERY);
    if let Some(path) = file_path {
      call = call.with_argument(FILE_PATH_ARG, path);
    }
    let importer = self.importer.clone();
    let resp = tauri::async_runtime::spawn_blocking(move || handle_method_call(&importer, &call)).await?;
    response_to_result(resp)
  }
}

fn response_to_result(resp: MethodResponse) -> Result<bool> {
  match resp {
    MethodResponse::Success { result } => Ok(result.as_bool().unwrap_or(false)),
    MethodResponse::Error { code, message, .. } => Err(Error::Method { code, message }),
    MethodResponse::NotImplemented => Err(Error::NotImplemented(SAVE_IMAGE_TO_GALLERY.to_string())),
  }
}
