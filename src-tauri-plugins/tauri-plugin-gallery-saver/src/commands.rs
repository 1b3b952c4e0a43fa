use tauri::{command, AppHandle, Runtime};

use crate::GallerySaverExt;

/// 前端：`invoke('plugin:gallery-saver|save_image_to_gallery', { filePath })`
#[command]
pub(crate) async fn save_image_to_gallery<R: Runtime>(
  app: AppHandle<R>,
  file_path: Option<String>,
) -> crate::Result<bool> {
  app.gallery_saver().save_image_to_gallery(file_path).await
}
