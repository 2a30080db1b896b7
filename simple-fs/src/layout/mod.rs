//! # 磁盘数据结构层
//!
//! simplefs 的磁盘布局：
//! 超级块(含位图) | inode 表 | 数据块与间接索引块
//!
//! 同一个块按用途解释为以下之一：
//! [`SuperBlock`]、[`InodeBlock`]、[`PointerBlock`] 或原始数据。
//! 每种解释都经由显式的编解码得到，内存中不会同时存在同一块的两种视图。
//! 磁盘上的整数一律为小端 32 位。

mod inode;
mod pointer;
mod super_block;

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite, Endian};
use block_dev::BlockDevice;
use derive_more::{Display, From, Into};

pub use self::{
    inode::{Inode, InodeBlock},
    pointer::PointerBlock,
    super_block::SuperBlock,
};
use crate::{DataBlock, Result, BLOCK_SIZE};

/// 块编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display)]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    /// 超级块固定在 0 号块
    pub const SUPER: Self = Self(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// 磁盘上的块编号 `<= 0` 表示空槽；0 号块是超级块，不可能是数据块
#[inline]
fn decode_ptr(raw: i32) -> Option<BlockId> {
    (raw > 0).then_some(BlockId(raw as u32))
}

#[inline]
fn encode_ptr(ptr: Option<BlockId>) -> i32 {
    ptr.map_or(0, |id| id.0 as i32)
}

/// 把块内容解释为 `T`
pub fn decode<T>(block: &DataBlock) -> Result<T>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    let value = T::read_options(&mut Cursor::new(&block[..]), Endian::Little, ())?;
    Ok(value)
}

/// 把 `T` 编码为完整的块，未覆盖的部分为零
pub fn encode<T>(value: &T) -> Result<DataBlock>
where
    T: for<'a> BinWrite<Args<'a> = ()>,
{
    let mut block = [0; BLOCK_SIZE];
    value.write_options(&mut Cursor::new(&mut block[..]), Endian::Little, ())?;
    Ok(block)
}

#[inline]
pub fn read_raw(dev: &dyn BlockDevice, id: BlockId) -> DataBlock {
    let mut block = [0; BLOCK_SIZE];
    dev.read_block(id.index(), &mut block);
    block
}

#[inline]
pub fn write_raw(dev: &dyn BlockDevice, id: BlockId, block: &DataBlock) {
    dev.write_block(id.index(), block);
}

#[inline]
pub fn zero(dev: &dyn BlockDevice, id: BlockId) {
    write_raw(dev, id, &[0; BLOCK_SIZE]);
}

/// 读出块并解码
pub fn load<T>(dev: &dyn BlockDevice, id: BlockId) -> Result<T>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    decode(&read_raw(dev, id))
}

/// 编码后整块写回
pub fn store<T>(dev: &dyn BlockDevice, id: BlockId, value: &T) -> Result<()>
where
    T: for<'a> BinWrite<Args<'a> = ()>,
{
    write_raw(dev, id, &encode(value)?);
    Ok(())
}
