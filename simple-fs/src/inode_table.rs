//! # 索引节点管理层
//!
//! inode 表紧随超级块之后，每块容纳 [`INODES_PER_BLOCK`] 个 inode。
//! 一个块里有许多 inode，保存单个 inode 时必须先读出整块再写回。

use alloc::vec::Vec;

use block_dev::BlockDevice;

use crate::layout::{self, InodeBlock};
use crate::{BlockId, Error, Inode, Result, INODES_PER_BLOCK};

#[derive(Debug, Clone, Copy)]
pub struct InodeTable {
    /// inode 表占据块数
    blocks: u32,
}

impl InodeTable {
    #[inline]
    pub fn new(blocks: u32) -> Self {
        Self { blocks }
    }

    /// inode 总数
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.blocks * INODES_PER_BLOCK as u32
    }

    /// 通过编号获取 inode 在磁盘上的位置：**块ID**以及**块内槽位**
    pub fn position(&self, inumber: u32) -> Result<(BlockId, usize)> {
        if inumber >= self.capacity() {
            return Err(Error::InvalidInode(inumber));
        }

        let per_block = INODES_PER_BLOCK as u32;
        Ok((
            BlockId::new(inumber / per_block + 1),
            (inumber % per_block) as usize,
        ))
    }

    /// 读出 inode，不论其是否有效
    pub fn load(&self, dev: &dyn BlockDevice, inumber: u32) -> Result<Inode> {
        let (block_id, slot) = self.position(inumber)?;
        let block: InodeBlock = layout::load(dev, block_id)?;
        Ok(block.inodes[slot])
    }

    pub fn save(&self, dev: &dyn BlockDevice, inumber: u32, inode: &Inode) -> Result<()> {
        let (block_id, slot) = self.position(inumber)?;
        let mut block: InodeBlock = layout::load(dev, block_id)?;
        block.inodes[slot] = *inode;
        layout::store(dev, block_id, &block)
    }

    /// 按编号升序寻找第一个未使用的 inode
    pub fn find_free(&self, dev: &dyn BlockDevice) -> Result<Option<u32>> {
        for (index, block_id) in self.block_ids().enumerate() {
            let block: InodeBlock = layout::load(dev, block_id)?;
            if let Some(slot) = block.inodes.iter().position(|inode| !inode.valid) {
                return Ok(Some((index * INODES_PER_BLOCK + slot) as u32));
            }
        }

        Ok(None)
    }

    /// 全部有效的 inode 及其编号
    pub fn valid_inodes(&self, dev: &dyn BlockDevice) -> Result<Vec<(u32, Inode)>> {
        let mut inodes = Vec::new();
        for (index, block_id) in self.block_ids().enumerate() {
            let block: InodeBlock = layout::load(dev, block_id)?;
            inodes.extend(
                block
                    .inodes
                    .iter()
                    .enumerate()
                    .filter(|(_, inode)| inode.valid)
                    .map(|(slot, inode)| ((index * INODES_PER_BLOCK + slot) as u32, *inode)),
            );
        }

        Ok(inodes)
    }

    #[inline]
    fn block_ids(&self) -> impl Iterator<Item = BlockId> {
        (1..=self.blocks).map(BlockId::new)
    }
}
