use binrw::binrw;

use super::{decode_ptr, encode_ptr, BlockId};
use crate::{DIRECT_COUNT, INODES_PER_BLOCK};

/// 磁盘上的 inode，32 字节：
/// 有效标志 | 文件大小 | 5 个直接索引 | 1 个间接索引
#[binrw]
#[brw(little)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Inode {
    #[br(map = |raw: i32| raw != 0)]
    #[bw(map = |valid: &bool| i32::from(*valid))]
    pub valid: bool,
    /// 文件大小（字节）
    pub size: u32,
    /// 直接索引，按逻辑顺序依次填充
    #[br(map = |raw: [i32; DIRECT_COUNT]| raw.map(decode_ptr))]
    #[bw(map = |direct: &[Option<BlockId>; DIRECT_COUNT]| direct.map(encode_ptr))]
    pub direct: [Option<BlockId>; DIRECT_COUNT],
    /// 间接索引块，直接索引用尽后才分配
    #[br(map = |raw: i32| decode_ptr(raw))]
    #[bw(map = |indirect: &Option<BlockId>| encode_ptr(*indirect))]
    pub indirect: Option<BlockId>,
}

impl Inode {
    /// 新建的空文件
    #[inline]
    pub fn new_file() -> Self {
        Self {
            valid: true,
            ..Default::default()
        }
    }

    /// 已填充的直接索引个数
    #[inline]
    pub fn direct_len(&self) -> usize {
        self.direct.iter().take_while(|ptr| ptr.is_some()).count()
    }
}

/// inode 表块
#[binrw]
#[brw(little)]
#[derive(Debug, Clone)]
pub struct InodeBlock {
    pub inodes: [Inode; INODES_PER_BLOCK],
}
