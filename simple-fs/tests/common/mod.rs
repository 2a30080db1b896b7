#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use block_dev::RamDisk;
use simple_fs::{BlockId, FormatOptions, SimpleFileSystem};

/// 格式化并挂载一块内存盘
pub fn mounted(blocks: usize) -> (Arc<RamDisk>, SimpleFileSystem) {
    let disk = Arc::new(RamDisk::new(blocks));
    let mut fs = SimpleFileSystem::new(disk.clone());
    fs.format(&FormatOptions::default()).unwrap();
    fs.mount().unwrap();
    (disk, fs)
}

pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i % 251) as u8 ^ seed)
        .collect()
}

/// 超级块、inode 表以及全部有效 inode 能够到达的块
pub fn reachable(fs: &SimpleFileSystem) -> BTreeSet<BlockId> {
    let dump = fs.debug().unwrap();
    let mut blocks: BTreeSet<_> = (0..=dump.inode_blocks).map(BlockId::new).collect();
    for file in dump.files {
        blocks.extend(file.direct);
        blocks.extend(file.indirect);
        blocks.extend(file.indirect_data);
    }
    blocks
}

pub fn occupied(fs: &SimpleFileSystem) -> BTreeSet<BlockId> {
    fs.bitmap().unwrap().used_blocks().collect()
}
