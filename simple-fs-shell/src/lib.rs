
use std::fs::File;
use std::io;
use std::io::{Read, Write};
use std::io::{Seek, SeekFrom};
use std::sync::Mutex;

use block_dev::{BlockDevice, BLOCK_SIZE};
use simple_fs::SimpleFileSystem;

/// 以宿主机上的文件充当块设备
#[derive(Debug)]
pub struct BlockFile {
    file: Mutex<File>,
    num_blocks: usize,
}

impl BlockFile {
    /// 文件末尾不足一块的部分不被使用
    pub fn new(fd: File) -> io::Result<Self> {
        let num_blocks = (fd.metadata()?.len() / BLOCK_SIZE as u64) as usize;
        Ok(Self {
            file: Mutex::new(fd),
            num_blocks,
        })
    }
}

impl BlockDevice for BlockFile {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) {
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start((block_id * BLOCK_SIZE) as u64))
            .expect("seeking error");
        file.read_exact(buf).expect("not a complete block!");
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) {
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start((block_id * BLOCK_SIZE) as u64))
            .expect("seeking error");
        file.write_all(buf).expect("not a complete block!");
    }

    #[inline]
    fn num_blocks(&self) -> usize {
        self.num_blocks
    }
}

/// 把宿主机文件的内容写入一个空文件，返回实际写入的字节数。
/// 写入不会截断文件，因此拒绝覆盖已有内容的 inode。
pub fn copy_in(fs: &mut SimpleFileSystem, inumber: u32, data: &[u8]) -> io::Result<usize> {
    let size = fs.size(inumber).map_err(io::Error::other)?;
    if size != 0 {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("inode {inumber} already holds {size} bytes"),
        ));
    }

    let written = fs.write_at(inumber, 0, data).map_err(io::Error::other)?;
    if written < data.len() {
        log::warn!("disk full: only {written} of {} bytes copied", data.len());
    }

    Ok(written)
}
