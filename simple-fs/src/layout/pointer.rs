use binrw::binrw;

use super::{decode_ptr, encode_ptr, BlockId};
use crate::POINTERS_PER_BLOCK;

/// 间接索引块：整个块连续存储**块编号**，每个编号都指向一个**数据块**
#[binrw]
#[brw(little)]
#[derive(Debug, Clone)]
pub struct PointerBlock {
    #[br(map = |raw: [i32; POINTERS_PER_BLOCK]| raw.map(decode_ptr))]
    #[bw(map = |pointers: &[Option<BlockId>; POINTERS_PER_BLOCK]| pointers.map(encode_ptr))]
    pub pointers: [Option<BlockId>; POINTERS_PER_BLOCK],
}

impl PointerBlock {
    #[inline]
    pub fn empty() -> Self {
        Self {
            pointers: [None; POINTERS_PER_BLOCK],
        }
    }

    /// 已填充的编号个数
    #[inline]
    pub fn filled(&self) -> usize {
        self.pointers.iter().take_while(|ptr| ptr.is_some()).count()
    }
}
