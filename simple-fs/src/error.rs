use derive_more::Display;

use crate::BlockId;

/// 文件系统操作的错误，均可恢复
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// 设备的 0 号块上没有文件系统的魔数
    #[display(fmt = "device is not formatted")]
    NotFormatted,
    /// 设备上已有文件系统，拒绝非强制的格式化
    #[display(fmt = "device already carries a filesystem")]
    AlreadyFormatted,
    #[display(fmt = "filesystem is not mounted")]
    NotMounted,
    #[display(fmt = "device of {} blocks is too small", _0)]
    DeviceTooSmall(usize),
    /// 超级块描述的布局与设备不符
    #[display(fmt = "superblock describes an impossible layout")]
    InvalidSuperBlock,
    /// inode 编号超出 inode 表
    #[display(fmt = "inode {} is out of range", _0)]
    InvalidInode(u32),
    /// inode 编号合法，但对应的 inode 未被创建
    #[display(fmt = "no such inode {}", _0)]
    NoSuchInode(u32),
    #[display(fmt = "no free inode")]
    NoSpace,
    /// 磁盘上记录的块编号超出了设备
    #[display(fmt = "block pointer {} exceeds the device", _0)]
    CorruptPointer(BlockId),
    /// 块内容无法解码
    #[display(fmt = "malformed block")]
    Malformed,
}

impl core::error::Error for Error {}

impl From<binrw::Error> for Error {
    fn from(err: binrw::Error) -> Self {
        match err {
            binrw::Error::BadMagic { .. } => Self::NotFormatted,
            _ => Self::Malformed,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
