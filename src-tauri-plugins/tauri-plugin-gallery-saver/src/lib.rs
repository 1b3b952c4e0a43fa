use tauri::{
  plugin::{Builder, TauriPlugin},
  Manager, Runtime,
};

pub use gallery_saver_core::GallerySaverConfig as Config;

#[cfg(not(target_os = "android"))]
mod desktop;
#[cfg(target_os = "android")]
mod mobile;
#[cfg(target_os = "android")]
mod models;

mod commands;
mod error;
mod saver;

pub use error::{Error, Result};
pub use saver::GallerySaver;

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the gallery saver APIs.
pub trait GallerySaverExt<R: Runtime> {
  fn gallery_saver(&self) -> &GallerySaver;
}

impl<R: Runtime, T: Manager<R>> crate::GallerySaverExt<R> for T {
  fn gallery_saver(&self) -> &GallerySaver {
    self.state::<GallerySaver>().inner()
  }
}

/// Initializes the plugin. 配置取自 `tauri.conf.json` 的 `plugins.gallery-saver`，可省略。
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
  Builder::<R, Option<Config>>::new("gallery-saver")
    .invoke_handler(tauri::generate_handler![commands::save_image_to_gallery])
    .setup(|app, api| {
      let config = api.config().clone().unwrap_or_default();
      config.validate()?;

      #[cfg(target_os = "android")]
      let saver = mobile::init(app, api, config)?;
      #[cfg(not(target_os = "android"))]
      let saver = desktop::init(app, api, config)?;

      app.manage(saver);
      Ok(())
    })
    .build()
}
