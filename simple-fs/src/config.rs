//! 格式化参数

/// 默认每 10 个块划出 1 个作为 inode 表块
pub const INODE_BLOCK_RATIO: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// 总块数与 inode 表块数之比，inode 表至少占 1 块
    pub inode_ratio: u32,
    /// 设备上已有文件系统时仍然格式化（销毁全部数据）
    pub force: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            inode_ratio: INODE_BLOCK_RATIO,
            force: false,
        }
    }
}

impl FormatOptions {
    #[inline]
    pub fn force() -> Self {
        Self {
            force: true,
            ..Default::default()
        }
    }

    /// 根据总块数划定 inode 表块数，取值范围为 `1..total_blocks`
    pub fn inode_blocks(&self, total_blocks: u32) -> u32 {
        (total_blocks / self.inode_ratio.max(1)).clamp(1, total_blocks.saturating_sub(1).max(1))
    }
}
