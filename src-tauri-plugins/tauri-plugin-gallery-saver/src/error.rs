use serde::{ser::Serializer, Serialize};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// method channel 返回的错误（如 `INVALID_ARGUMENT`）。
  #[error("{code}: {message}")]
  Method { code: String, message: String },
  #[error("method not implemented: {0}")]
  NotImplemented(String),
  #[error(transparent)]
  Core(#[from] gallery_saver_core::Error),
  #[error(transparent)]
  Tauri(#[from] tauri::Error),
  #[cfg(target_os = "android")]
  #[error(transparent)]
  PluginInvoke(#[from] tauri::plugin::mobile::PluginInvokeError),
}

impl Error {
  pub fn code(&self) -> &str {
    match self {
      Error::Method { code, .. } => code,
      Error::NotImplemented(_) => "NOT_IMPLEMENTED",
      _ => "INTERNAL_ERROR",
    }
  }
}

/// 前端收到 `{ code, message }`。
#[derive(Serialize)]
struct ErrorPayload<'a> {
  code: &'a str,
  message: String,
}

impl Serialize for Error {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let message = match self {
      Error::Method { message, .. } => message.clone(),
      other => other.to_string(),
    };
    ErrorPayload {
      code: self.code(),
      message,
    }
    .serialize(serializer)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn method_error_serializes_code_and_message() {
    let err = Error::Method {
      code: "INVALID_ARGUMENT".into(),
      message: "Path must not be null".into(),
    };
    assert_eq!(
      serde_json::to_value(&err).unwrap(),
      serde_json::json!({"code": "INVALID_ARGUMENT", "message": "Path must not be null"})
    );
  }

  #[test]
  fn not_implemented_code() {
    let err = Error::NotImplemented("foo".into());
    assert_eq!(err.code(), "NOT_IMPLEMENTED");
  }
}
