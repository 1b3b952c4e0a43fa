use gallery_saver_core::channel::SAVE_IMAGE_TO_GALLERY;
use gallery_saver_core::{
    handle_method_call, FixedPlatform, GallerySaverConfig, GalleryImporter, LocalMediaStore, MediaStore,
    MethodCall, MethodResponse,
};
use std::sync::Arc;

#[test]
fn save_image_to_gallery_round_trip() {
    let media = tempfile::tempdir().unwrap();
    let src = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalMediaStore::open(media.path()).unwrap());
    let importer = GalleryImporter::new(store.clone(), Arc::new(FixedPlatform(30)), GallerySaverConfig::default());

    let source = src.path().join("photo.png");
    let bytes: Vec<u8> = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];
    std::fs::write(&source, &bytes).unwrap();

    let call: MethodCall = serde_json::from_value(serde_json::json!({
        "method": SAVE_IMAGE_TO_GALLERY,
        "arguments": { "filePath": source.to_string_lossy() }
    }))
    .unwrap();
    assert_eq!(handle_method_call(&importer, &call), MethodResponse::success(true));

    let records = store.list_images().unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_visible());
    assert_eq!(records[0].display_name, "photo.png");
    assert_eq!(std::fs::read(records[0].data_path.as_ref().unwrap()).unwrap(), bytes);
}

#[test]
fn call_without_arguments_deserializes() {
    let call: MethodCall = serde_json::from_str(r#"{"method":"saveImageToGallery"}"#).unwrap();
    assert!(call.arguments.is_empty());
}
