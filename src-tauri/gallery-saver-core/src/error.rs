use std::io;

/// 图库导入过程中的错误。
///
/// 只有 [`Error::InvalidArgument`] 会穿过插件边界；其余错误在
/// [`crate::importer::GalleryImporter::import_image`] 中折叠为 `false`。
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// 媒体库拒绝创建记录（insert 未返回 handle）。
    #[error("media store refused to create an entry")]
    StorageInsertFailed,
    #[error(transparent)]
    Io(#[from] io::Error),
    /// 本地媒体索引文件读写失败。
    #[error("media index error: {0}")]
    Index(String),
}

impl Error {
    /// 是否属于需要在边界上单独上报的错误（而不是折叠为 `false`）。
    pub fn is_boundary_error(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Index(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
