//! # 已挂载的文件系统
//!
//! 文件的数据块按逻辑顺序串成一条索引链：先填直接索引，
//! 用尽后再经由间接索引块继续。链上的块号必须落在数据区内，
//! 落在 inode 表内的视为未分配，超出设备的视为损坏，绝不解引用。

use alloc::vec::Vec;

use block_dev::BlockDevice;

use crate::inode_table::InodeTable;
use crate::layout::{self, PointerBlock};
use crate::{Bitmap, BlockId, Error, Inode, Result, SuperBlock};
use crate::{BLOCK_SIZE, DIRECT_COUNT, MAX_FILE_BLOCKS};

#[derive(Debug)]
pub struct Volume {
    pub super_block: SuperBlock,
    pub bitmap: Bitmap,
    pub inode_table: InodeTable,
}

impl Volume {
    pub fn new(super_block: SuperBlock) -> Self {
        Self {
            bitmap: Bitmap::from_super_block(&super_block),
            inode_table: InodeTable::new(super_block.inode_blocks),
            super_block,
        }
    }

    /// 位图随超级块一并写回
    pub fn sync_super_block(&mut self, dev: &dyn BlockDevice) -> Result<()> {
        self.super_block.bitmap = *self.bitmap.as_array();
        layout::store(dev, BlockId::SUPER, &self.super_block)
    }

    /// 读出已创建的 inode
    pub fn valid_inode(&self, dev: &dyn BlockDevice, inumber: u32) -> Result<Inode> {
        let inode = self.inode_table.load(dev, inumber)?;
        if inode.valid {
            Ok(inode)
        } else {
            Err(Error::NoSuchInode(inumber))
        }
    }

    /// 校验磁盘上记录的块号
    pub fn resolve(&self, ptr: Option<BlockId>) -> Result<Option<BlockId>> {
        match ptr {
            Some(id) if id.index() >= self.super_block.total_blocks as usize => {
                log::warn!("block pointer {id} exceeds {} blocks", self.super_block.total_blocks);
                Err(Error::CorruptPointer(id))
            }
            Some(id) if u32::from(id) < self.super_block.data_start() => Ok(None),
            ptr => Ok(ptr),
        }
    }

    pub fn create(&mut self, dev: &dyn BlockDevice) -> Result<u32> {
        let Some(inumber) = self.inode_table.find_free(dev)? else {
            log::warn!("no free inode");
            return Err(Error::NoSpace);
        };

        self.inode_table.save(dev, inumber, &Inode::new_file())?;
        self.super_block.inodes += 1;
        self.sync_super_block(dev)?;
        log::debug!("created inode {inumber}");

        Ok(inumber)
    }

    pub fn delete(&mut self, dev: &dyn BlockDevice, inumber: u32) -> Result<()> {
        let inode = self.valid_inode(dev, inumber)?;

        // 先校验全部块号，确认无误后才开始回收
        let mut doomed = Vec::new();
        if let Some(indirect) = self.resolve(inode.indirect)? {
            let table: PointerBlock = layout::load(dev, indirect)?;
            for ptr in table.pointers {
                doomed.extend(self.resolve(ptr)?);
            }
            doomed.push(indirect);
        }
        for ptr in inode.direct {
            doomed.extend(self.resolve(ptr)?);
        }

        for &id in &doomed {
            layout::zero(dev, id);
            self.bitmap.set(id, false);
        }

        self.inode_table.save(dev, inumber, &Inode::default())?;
        self.super_block.inodes = self.super_block.inodes.saturating_sub(1);
        self.sync_super_block(dev)?;
        log::debug!("deleted inode {inumber}, freed {} blocks", doomed.len());

        Ok(())
    }

    /// 逻辑上 inode 指向一系列数据块，此处传入的是这些数据块的索引（逻辑索引），
    /// 返回实际的块ID
    pub fn data_block(
        &self,
        dev: &dyn BlockDevice,
        inode: &Inode,
        block_index: usize,
    ) -> Result<Option<BlockId>> {
        if block_index < DIRECT_COUNT {
            return self.resolve(inode.direct[block_index]);
        }
        if block_index >= MAX_FILE_BLOCKS {
            return Ok(None);
        }

        match self.resolve(inode.indirect)? {
            Some(indirect) => {
                let table: PointerBlock = layout::load(dev, indirect)?;
                self.resolve(table.pointers[block_index - DIRECT_COUNT])
            }
            None => Ok(None),
        }
    }

    /// 字节偏移所在的数据块，越过文件末尾则为空
    pub fn block_for_offset(
        &self,
        dev: &dyn BlockDevice,
        inode: &Inode,
        offset: usize,
    ) -> Result<Option<BlockId>> {
        if offset >= inode.size as usize {
            return Ok(None);
        }
        self.data_block(dev, inode, offset / BLOCK_SIZE)
    }

    /// 索引链的长度
    pub fn chain_len(&self, dev: &dyn BlockDevice, inode: &Inode) -> Result<usize> {
        let direct = inode.direct_len();
        if direct < DIRECT_COUNT {
            return Ok(direct);
        }

        match self.resolve(inode.indirect)? {
            Some(indirect) => {
                let table: PointerBlock = layout::load(dev, indirect)?;
                Ok(DIRECT_COUNT + table.filled())
            }
            None => Ok(DIRECT_COUNT),
        }
    }

    /// 分配一个数据块并挂到索引链的 `block_index` 处。
    /// 磁盘已满或索引用尽时返回空，此时不留下任何分配。
    fn link_block(
        &mut self,
        dev: &dyn BlockDevice,
        inode: &mut Inode,
        block_index: usize,
    ) -> Result<Option<BlockId>> {
        if block_index >= MAX_FILE_BLOCKS {
            log::warn!("no free pointers (direct or indirect) for inode");
            return Ok(None);
        }
        let Some(block) = self.bitmap.alloc() else {
            log::warn!("no free data blocks");
            return Ok(None);
        };

        if block_index < DIRECT_COUNT {
            inode.direct[block_index] = Some(block);
            return Ok(Some(block));
        }

        let indirect = match self.resolve(inode.indirect)? {
            Some(indirect) => indirect,
            None => {
                // 数据块已标记占用，间接索引块不会与之重合
                let Some(indirect) = self.bitmap.alloc() else {
                    log::warn!("need two free blocks, one for the indirect block one for data");
                    self.bitmap.set(block, false);
                    return Ok(None);
                };
                layout::store(dev, indirect, &PointerBlock::empty())?;
                inode.indirect = Some(indirect);
                indirect
            }
        };

        let mut table: PointerBlock = layout::load(dev, indirect)?;
        table.pointers[block_index - DIRECT_COUNT] = Some(block);
        layout::store(dev, indirect, &table)?;

        Ok(Some(block))
    }

    /// 从指定位置(字节偏移)读出数据填充`buf`，返回实际读取的字节数
    pub fn read_at(
        &self,
        dev: &dyn BlockDevice,
        inumber: u32,
        offset: usize,
        buf: &mut [u8],
    ) -> Result<usize> {
        let inode = self.valid_inode(dev, inumber)?;
        let end = offset.saturating_add(buf.len()).min(inode.size as usize);

        let mut start = offset;
        let mut read_size = 0;
        while start < end {
            let Some(block) = self.block_for_offset(dev, &inode, start)? else {
                break;
            };
            let current_block_end = ((start / BLOCK_SIZE + 1) * BLOCK_SIZE).min(end);
            let block_read_size = current_block_end - start;

            let data = layout::read_raw(dev, block);
            let src = &data[start % BLOCK_SIZE..start % BLOCK_SIZE + block_read_size];
            buf[read_size..read_size + block_read_size].copy_from_slice(src);

            read_size += block_read_size;
            start = current_block_end;
        }

        Ok(read_size)
    }

    /// 从指定位置写入`buf`，返回实际写入的字节数。
    /// 空间耗尽时提前结束，已写入的数据保留。
    pub fn write_at(
        &mut self,
        dev: &dyn BlockDevice,
        inumber: u32,
        offset: usize,
        buf: &[u8],
    ) -> Result<usize> {
        let mut inode = self.valid_inode(dev, inumber)?;
        if buf.is_empty() {
            return Ok(0);
        }

        let first = offset / BLOCK_SIZE;
        if first >= MAX_FILE_BLOCKS {
            log::warn!("offset {offset} is beyond the largest file");
            return Ok(0);
        }
        let end = offset.saturating_add(buf.len());
        let last = (end - 1) / BLOCK_SIZE;

        let mut chain_len = self.chain_len(dev, &inode)?;
        if first > chain_len {
            // 空洞块、首个目标块，以及可能需要的间接索引块必须一次备齐
            let indirect = first >= DIRECT_COUNT && self.resolve(inode.indirect)?.is_none();
            let needed = first - chain_len + 1 + usize::from(indirect);
            let free = self.bitmap.free_blocks();
            if free < needed {
                log::warn!("offset {offset} needs {needed} blocks, only {free} free");
                return Ok(0);
            }
        }
        let mut written_size = 0;
        // 偏移越过链尾时，中间的空洞也要分配
        for block_index in first.min(chain_len)..=last {
            let (block, fresh) = if block_index < chain_len {
                match self.data_block(dev, &inode, block_index)? {
                    Some(block) => (block, false),
                    None => break,
                }
            } else {
                match self.link_block(dev, &mut inode, block_index)? {
                    Some(block) => {
                        chain_len += 1;
                        (block, true)
                    }
                    None => break,
                }
            };

            let block_start = block_index * BLOCK_SIZE;
            let start = offset.max(block_start);
            let current_block_end = end.min(block_start + BLOCK_SIZE);

            let mut data = if fresh {
                [0; BLOCK_SIZE]
            } else {
                layout::read_raw(dev, block)
            };
            if start < current_block_end {
                let block_write_size = current_block_end - start;
                data[start - block_start..current_block_end - block_start]
                    .copy_from_slice(&buf[start - offset..start - offset + block_write_size]);
                written_size += block_write_size;
                inode.size = inode.size.max(current_block_end as u32);
            }
            layout::write_raw(dev, block, &data);

            if fresh {
                self.inode_table.save(dev, inumber, &inode)?;
                self.sync_super_block(dev)?;
            }
        }

        self.inode_table.save(dev, inumber, &inode)?;
        log::debug!("wrote {written_size} bytes to inode {inumber} at {offset}");

        Ok(written_size)
    }
}
