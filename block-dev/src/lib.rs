//! # 块设备接口层
//!
//! 块设备是以**块**为单位存储数据的设备，例如磁盘、光盘、U盘等；
//! [`BlockDevice`] 就是对读写块设备的抽象，
//! 实现了此特质的类型称为**块设备驱动**。
//!
//! 文件系统只通过块设备驱动按块号顺序读写块设备，从不持有设备本身。

#![no_std]

extern crate alloc;

mod ram_disk;

use core::fmt::Debug;

pub use self::ram_disk::RamDisk;

/// 块大小（字节），设备与文件系统共用
pub const BLOCK_SIZE: usize = 4096;

/// 块设备驱动特质
///
/// 读写的缓冲区长度必须恰好为 [`BLOCK_SIZE`]。
/// 设备 I/O 总被认为能够完成，驱动自身负责处理底层故障。
pub trait BlockDevice: Send + Sync + Debug {
    fn read_block(&self, block_id: usize, buf: &mut [u8]);
    fn write_block(&self, block_id: usize, buf: &[u8]);
    /// 设备的总块数
    fn num_blocks(&self) -> usize;
}
