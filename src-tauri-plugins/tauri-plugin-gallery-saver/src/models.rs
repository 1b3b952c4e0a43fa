use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertImageArgs {
  pub display_name: Option<String>,
  pub mime_type: String,
  pub pending: bool,
  /// 旧版写入：直接登记已落盘文件的绝对路径（MediaStore.Images.Media.DATA）。
  pub data_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertImageResponse {
  pub uri: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendImageBytesArgs {
  pub uri: String,
  /// base64 编码的数据块
  pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetImagePendingArgs {
  pub uri: String,
  pub pending: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImageArgs {
  pub uri: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
  pub uri: String,
  pub display_name: String,
  pub mime_type: String,
  pub pending: bool,
  pub data_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListImagesResponse {
  pub images: Vec<ImageEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PicturesDirResponse {
  pub path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLevelResponse {
  pub api_level: u32,
}
