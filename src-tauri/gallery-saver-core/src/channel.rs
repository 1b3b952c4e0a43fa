//! Method channel 边界：按方法名分发宿主框架的调用。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::importer::GalleryImporter;

pub const CHANNEL_NAME: &str = "gallery_saver";
pub const SAVE_IMAGE_TO_GALLERY: &str = "saveImageToGallery";
pub const FILE_PATH_ARG: &str = "filePath";

pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const PATH_MUST_NOT_BE_NULL: &str = "Path must not be null";

/// 一次方法调用：方法名 + 参数 map。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// 读取字符串参数：缺失或为 null 时返回 `Ok(None)`，类型不对时返回 `Err(())`。
    fn string_argument(&self, key: &str) -> Result<Option<&str>, ()> {
        match self.arguments.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(()),
        }
    }
}

/// 方法调用的响应。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResponse {
    Success {
        result: Value,
    },
    Error {
        code: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn success(result: impl Into<Value>) -> Self {
        MethodResponse::Success {
            result: result.into(),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        MethodResponse::Error {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// 处理一次方法调用。只认 `saveImageToGallery`，其它方法返回 NotImplemented。
pub fn handle_method_call(importer: &GalleryImporter, call: &MethodCall) -> MethodResponse {
    match call.method.as_str() {
        SAVE_IMAGE_TO_GALLERY => match call.string_argument(FILE_PATH_ARG) {
            Ok(Some(path)) => MethodResponse::success(importer.import_image(path)),
            Ok(None) => MethodResponse::error(INVALID_ARGUMENT, PATH_MUST_NOT_BE_NULL),
            Err(()) => MethodResponse::error(INVALID_ARGUMENT, "Path must be a string"),
        },
        other => {
            tracing::debug!(method = other, "method not implemented");
            MethodResponse::NotImplemented
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GallerySaverConfig;
    use crate::local_store::LocalMediaStore;
    use crate::platform::FixedPlatform;
    use std::sync::Arc;

    fn importer(root: &std::path::Path) -> GalleryImporter {
        GalleryImporter::new(
            Arc::new(LocalMediaStore::open(root).unwrap()),
            Arc::new(FixedPlatform(33)),
            GallerySaverConfig::default(),
        )
    }

    #[test]
    fn missing_path_is_invalid_argument() {
        let tmp = tempfile::tempdir().unwrap();
        let importer = importer(tmp.path());

        let resp = handle_method_call(&importer, &MethodCall::new(SAVE_IMAGE_TO_GALLERY));
        assert_eq!(resp, MethodResponse::error(INVALID_ARGUMENT, PATH_MUST_NOT_BE_NULL));

        let resp = handle_method_call(
            &importer,
            &MethodCall::new(SAVE_IMAGE_TO_GALLERY).with_argument(FILE_PATH_ARG, Value::Null),
        );
        assert_eq!(resp, MethodResponse::error(INVALID_ARGUMENT, PATH_MUST_NOT_BE_NULL));
    }

    #[test]
    fn non_string_path_is_invalid_argument() {
        let tmp = tempfile::tempdir().unwrap();
        let resp = handle_method_call(
            &importer(tmp.path()),
            &MethodCall::new(SAVE_IMAGE_TO_GALLERY).with_argument(FILE_PATH_ARG, 42),
        );
        assert!(matches!(resp, MethodResponse::Error { ref code, .. } if code == INVALID_ARGUMENT));
    }

    #[test]
    fn unknown_method_is_not_implemented() {
        let tmp = tempfile::tempdir().unwrap();
        let resp = handle_method_call(&importer(tmp.path()), &MethodCall::new("deleteImage"));
        assert_eq!(resp, MethodResponse::NotImplemented);
    }

    #[test]
    fn missing_file_is_false_not_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.png");
        let resp = handle_method_call(
            &importer(tmp.path()),
            &MethodCall::new(SAVE_IMAGE_TO_GALLERY)
                .with_argument(FILE_PATH_ARG, missing.to_string_lossy().to_string()),
        );
        assert_eq!(resp, MethodResponse::success(false));
    }

    #[test]
    fn response_wire_shape() {
        let json = serde_json::to_value(MethodResponse::error(INVALID_ARGUMENT, PATH_MUST_NOT_BE_NULL)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "code": "INVALID_ARGUMENT", "message": "Path must not be null"})
        );
        let json = serde_json::to_value(MethodResponse::success(true)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "success", "result": true}));
    }
}
