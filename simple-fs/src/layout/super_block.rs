use binrw::binrw;

use crate::MAX_BLOCKS;

/// 超级块：
/// - 提供文件系统合法性校验（魔数由编解码器检查）；
/// - 描述 inode 表的位置与大小；
/// - 保存整盘的块占用位图
#[binrw]
#[brw(little, magic = 0xf0f0_3410_u32)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperBlock {
    /// 文件系统占据块数
    pub total_blocks: u32,
    /// inode 表占据块数，紧随超级块之后
    pub inode_blocks: u32,
    /// 已创建的 inode 个数
    pub inodes: u32,
    /// 每块一个字节，非零表示占用；长度固定为 MAX_BLOCKS
    #[br(map = |raw: [u8; MAX_BLOCKS]| raw.map(|used| used != 0))]
    #[bw(map = |bitmap: &[bool; MAX_BLOCKS]| bitmap.map(u8::from))]
    pub bitmap: [bool; MAX_BLOCKS],
}

impl SuperBlock {
    pub fn new(total_blocks: u32, inode_blocks: u32, bitmap: [bool; MAX_BLOCKS]) -> Self {
        Self {
            total_blocks,
            inode_blocks,
            inodes: 0,
            bitmap,
        }
    }

    /// 首个数据块
    #[inline]
    pub fn data_start(&self) -> u32 {
        self.inode_blocks + 1
    }

    /// 布局是否能放进 `device_blocks` 块的设备
    pub fn fits(&self, device_blocks: usize) -> bool {
        let total = self.total_blocks as usize;
        (2..=MAX_BLOCKS.min(device_blocks)).contains(&total)
            && (1..self.total_blocks).contains(&self.inode_blocks)
    }
}
