const COMMANDS: &[&str] = &["save_image_to_gallery"];

fn main() {
  tauri_plugin::Builder::new(COMMANDS)
    .android_path("android")
    .build();
}
