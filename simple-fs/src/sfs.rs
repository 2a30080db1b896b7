//! # 文件系统层
//!
//! 未挂载 → 已挂载，经由 [`SimpleFileSystem::mount`]；
//! 格式化与卸载回到未挂载状态。除格式化、挂载、卸载外的操作都要求已挂载。

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use block_dev::BlockDevice;
use spin::Mutex;

use crate::layout::{self, SuperBlock};
use crate::volume::Volume;
use crate::{Bitmap, BlockId, Dump, Error, FormatOptions, Result, MAX_BLOCKS};

/// 跨线程共享时，整个文件系统由一把锁保护，每个操作都是一个临界区
pub type SharedFileSystem = Arc<Mutex<SimpleFileSystem>>;

#[derive(Debug)]
pub struct SimpleFileSystem {
    block_device: Arc<dyn BlockDevice>,
    /// 挂载后才存在
    volume: Option<Volume>,
}

impl SimpleFileSystem {
    /// 接入块设备，处于未挂载状态
    pub fn new(block_device: Arc<dyn BlockDevice>) -> Self {
        Self {
            block_device,
            volume: None,
        }
    }

    #[inline]
    pub fn into_shared(self) -> SharedFileSystem {
        Arc::new(Mutex::new(self))
    }

    /// 0 号块上是否有合法的超级块
    pub fn is_formatted(&self) -> bool {
        self.block_device.num_blocks() > 0
            && layout::load::<SuperBlock>(self.block_device.as_ref(), BlockId::SUPER).is_ok()
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.volume.is_some()
    }

    /// 在设备上建立全新的文件系统，清零整个设备。
    /// 设备上已有文件系统时，除非 `options.force`，否则拒绝执行。
    pub fn format(&mut self, options: &FormatOptions) -> Result<()> {
        let dev = self.block_device.as_ref();
        let device_blocks = dev.num_blocks();
        if device_blocks < 2 {
            return Err(Error::DeviceTooSmall(device_blocks));
        }
        if self.is_formatted() {
            if !options.force {
                return Err(Error::AlreadyFormatted);
            }
            log::warn!("device already carries a filesystem, erasing all previous data");
        }

        if device_blocks > MAX_BLOCKS {
            log::warn!("only the first {MAX_BLOCKS} of {device_blocks} blocks are used");
        }
        let total_blocks = device_blocks.min(MAX_BLOCKS) as u32;
        let inode_blocks = options.inode_blocks(total_blocks);

        self.volume = None;
        for id in 0..device_blocks {
            layout::zero(dev, BlockId::new(id as u32));
        }

        let bitmap = Bitmap::new(total_blocks, inode_blocks);
        let super_block = SuperBlock::new(total_blocks, inode_blocks, *bitmap.as_array());
        layout::store(dev, BlockId::SUPER, &super_block)?;
        log::info!("formatted {total_blocks} blocks with {inode_blocks} inode blocks");

        Ok(())
    }

    /// 读取超级块，据此重建内存中的位图。重复挂载得到相同的状态。
    pub fn mount(&mut self) -> Result<()> {
        let dev = self.block_device.as_ref();
        if dev.num_blocks() == 0 {
            return Err(Error::NotFormatted);
        }

        let super_block: SuperBlock = layout::load(dev, BlockId::SUPER)?;
        if !super_block.fits(dev.num_blocks()) {
            log::warn!(
                "superblock claims {} blocks with {} inode blocks on a {}-block device",
                super_block.total_blocks,
                super_block.inode_blocks,
                dev.num_blocks()
            );
            return Err(Error::InvalidSuperBlock);
        }

        log::info!(
            "mounted {} blocks, {} inode blocks, {} inodes",
            super_block.total_blocks,
            super_block.inode_blocks,
            super_block.inodes
        );
        self.volume = Some(Volume::new(super_block));

        Ok(())
    }

    #[inline]
    pub fn unmount(&mut self) {
        self.volume = None;
    }

    /// 创建空文件，返回其 inode 编号
    pub fn create(&mut self) -> Result<u32> {
        let (dev, volume) = self.split()?;
        volume.create(dev)
    }

    /// 删除文件并回收其全部数据块
    pub fn delete(&mut self, inumber: u32) -> Result<()> {
        let (dev, volume) = self.split()?;
        volume.delete(dev, inumber)
    }

    /// 文件大小（字节）
    pub fn size(&self, inumber: u32) -> Result<u32> {
        let volume = self.volume()?;
        Ok(volume.valid_inode(self.block_device.as_ref(), inumber)?.size)
    }

    /// 从`offset`处读出数据填充`buf`，返回实际读取的字节数
    pub fn read_at(&self, inumber: u32, offset: usize, buf: &mut [u8]) -> Result<usize> {
        self.volume()?
            .read_at(self.block_device.as_ref(), inumber, offset, buf)
    }

    /// 从`offset`处读出至多`len`字节
    pub fn read(&self, inumber: u32, offset: usize, len: usize) -> Result<Vec<u8>> {
        let size = self.size(inumber)? as usize;
        let mut buf = vec![0; len.min(size.saturating_sub(offset))];
        let read_size = self.read_at(inumber, offset, &mut buf)?;
        buf.truncate(read_size);
        Ok(buf)
    }

    /// 从`offset`处写入`buf`，返回实际写入的字节数；
    /// 空间耗尽时只写入前一部分，调用者需比对返回值
    pub fn write_at(&mut self, inumber: u32, offset: usize, buf: &[u8]) -> Result<usize> {
        let (dev, volume) = self.split()?;
        volume.write_at(dev, inumber, offset, buf)
    }

    pub fn debug(&self) -> Result<Dump> {
        self.volume()?.dump(self.block_device.as_ref())
    }

    #[inline]
    pub fn super_block(&self) -> Result<&SuperBlock> {
        Ok(&self.volume()?.super_block)
    }

    /// 内存中的块占用位图
    #[inline]
    pub fn bitmap(&self) -> Result<&Bitmap> {
        Ok(&self.volume()?.bitmap)
    }
}

impl SimpleFileSystem {
    #[inline]
    fn volume(&self) -> Result<&Volume> {
        self.volume.as_ref().ok_or(Error::NotMounted)
    }

    #[inline]
    fn split(&mut self) -> Result<(&dyn BlockDevice, &mut Volume)> {
        let volume = self.volume.as_mut().ok_or(Error::NotMounted)?;
        Ok((self.block_device.as_ref(), volume))
    }
}
