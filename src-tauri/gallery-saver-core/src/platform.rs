//! 宿主系统版本与导入策略选择。

use serde::{Deserialize, Serialize};

/// Android 10（API 29, Q）起提供 scoped storage 与 `IS_PENDING`。
pub const SCOPED_STORAGE_MIN_API_LEVEL: u32 = 29;

/// 导入策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportStrategy {
    /// 通过媒体库插入 Pending 记录并写入内容，写完后公开；失败时回滚。
    Scoped,
    /// 复制到公共 Pictures/<App> 目录后再登记到媒体索引。
    Legacy,
}

/// 根据 API level 选择导入策略（纯函数）。
pub fn select_strategy(api_level: u32) -> ImportStrategy {
    if api_level >= SCOPED_STORAGE_MIN_API_LEVEL {
        ImportStrategy::Scoped
    } else {
        ImportStrategy::Legacy
    }
}

/// 宿主平台信息。每次导入都会重新查询，不做缓存。
pub trait HostPlatform: Send + Sync {
    fn api_level(&self) -> u32;
}

/// 固定版本号的平台（桌面、CLI、测试）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPlatform(pub u32);

impl Default for FixedPlatform {
    fn default() -> Self {
        FixedPlatform(SCOPED_STORAGE_MIN_API_LEVEL)
    }
}

impl HostPlatform for FixedPlatform {
    fn api_level(&self) -> u32 {
        self.0
    }
}
