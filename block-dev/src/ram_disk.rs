use alloc::vec;
use alloc::vec::Vec;

use spin::Mutex;

use crate::{BlockDevice, BLOCK_SIZE};

/// 内存盘：以一段连续内存模拟块设备
#[derive(Debug)]
pub struct RamDisk {
    data: Mutex<Vec<u8>>,
    num_blocks: usize,
}

impl RamDisk {
    /// 创建全零的内存盘
    pub fn new(num_blocks: usize) -> Self {
        Self {
            data: Mutex::new(vec![0; num_blocks * BLOCK_SIZE]),
            num_blocks,
        }
    }

    /// 导出整个盘的内容，便于比对
    pub fn snapshot(&self) -> Vec<u8> {
        self.data.lock().clone()
    }

    #[inline]
    fn range(&self, block_id: usize, len: usize) -> core::ops::Range<usize> {
        assert!(block_id < self.num_blocks, "block {block_id} out of device");
        assert_eq!(len, BLOCK_SIZE, "not a complete block!");
        let start = block_id * BLOCK_SIZE;
        start..start + BLOCK_SIZE
    }
}

impl BlockDevice for RamDisk {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) {
        let range = self.range(block_id, buf.len());
        buf.copy_from_slice(&self.data.lock()[range]);
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) {
        let range = self.range(block_id, buf.len());
        self.data.lock()[range].copy_from_slice(buf);
    }

    #[inline]
    fn num_blocks(&self) -> usize {
        self.num_blocks
    }
}
