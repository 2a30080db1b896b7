#![no_std]

extern crate alloc;

/* simplefs 的整体架构，自上而下 */

// 文件系统层：格式化、挂载以及按 inode 编号读写文件
mod sfs;
mod volume;
mod dump;

// 索引节点管理层：inode 编号到磁盘位置的换算与存取
mod inode_table;

// 空闲空间管理层：内存中的块占用位图
mod bitmap;

// 磁盘数据结构层：块内容与磁盘数据结构之间的编解码
pub mod layout;

mod config;
mod error;

pub use self::{
    bitmap::Bitmap,
    config::{FormatOptions, INODE_BLOCK_RATIO},
    dump::{Dump, InodeDump},
    error::{Error, Result},
    layout::{BlockId, Inode, SuperBlock},
    sfs::{SharedFileSystem, SimpleFileSystem},
};
pub use block_dev::{BlockDevice, BLOCK_SIZE};

pub const MAGIC: u32 = 0xf0f0_3410;
/// 每个 inode 表块容纳的 inode 个数
pub const INODES_PER_BLOCK: usize = 128;
/// 每个 inode 的直接索引个数
pub const DIRECT_COUNT: usize = 5;
/// 间接索引块容纳的块编号个数
pub const POINTERS_PER_BLOCK: usize = BLOCK_SIZE / 4;
/// 位图覆盖的最大块数，超出部分的设备空间不被使用
pub const MAX_BLOCKS: usize = 1024;
/// 单个文件最多占用的数据块数
pub const MAX_FILE_BLOCKS: usize = DIRECT_COUNT + POINTERS_PER_BLOCK;

/// 一个块的原始内容
pub type DataBlock = [u8; BLOCK_SIZE];
