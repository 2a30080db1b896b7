//! # 空闲空间管理层
//!
//! 超级块中的位图在挂载时被复制到内存中，分配与回收都先作用于内存，
//! 再由文件系统层随超级块一并写回磁盘。

use core::ops::Range;

use crate::{BlockId, SuperBlock, MAX_BLOCKS};

/// 块占用位图，每块一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    used: [bool; MAX_BLOCKS],
    /// 可分配的数据区
    data_area: Range<u32>,
}

impl Bitmap {
    /// 刚格式化的位图：超级块与 inode 表永久占用
    pub fn new(total_blocks: u32, inode_blocks: u32) -> Self {
        let mut used = [false; MAX_BLOCKS];
        used.iter_mut()
            .take(inode_blocks as usize + 1)
            .for_each(|slot| *slot = true);

        Self {
            used,
            data_area: inode_blocks + 1..total_blocks,
        }
    }

    /// 复制超级块中持久化的位图
    pub fn from_super_block(super_block: &SuperBlock) -> Self {
        Self {
            used: super_block.bitmap,
            data_area: super_block.data_start()..super_block.total_blocks,
        }
    }

    /// 按块号升序扫描数据区，返回第一个空闲块
    pub fn find_free(&self) -> Option<BlockId> {
        self.data_area
            .clone()
            .map(BlockId::new)
            .find(|&id| !self.is_used(id))
    }

    /// 分配一个空闲块并立即标记为占用。
    /// 若数据区已满，则返回空。
    pub fn alloc(&mut self) -> Option<BlockId> {
        let id = self.find_free()?;
        self.set(id, true);
        log::trace!("alloc block {id}");
        Some(id)
    }

    /// 记录块的占用情况，超出位图的块号被忽略
    #[inline]
    pub fn set(&mut self, id: BlockId, used: bool) {
        if let Some(slot) = self.used.get_mut(id.index()) {
            *slot = used;
        }
    }

    #[inline]
    pub fn is_used(&self, id: BlockId) -> bool {
        self.used.get(id.index()).copied().unwrap_or(false)
    }

    /// 全部被占用的块，升序
    pub fn used_blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.used
            .iter()
            .enumerate()
            .filter(|(_, &used)| used)
            .map(|(id, _)| BlockId::new(id as u32))
    }

    /// 数据区内空闲块的个数
    pub fn free_blocks(&self) -> usize {
        self.data_area
            .clone()
            .filter(|&id| !self.is_used(BlockId::new(id)))
            .count()
    }

    /// 写回超级块时使用的原始位图
    #[inline]
    pub fn as_array(&self) -> &[bool; MAX_BLOCKS] {
        &self.used
    }
}
