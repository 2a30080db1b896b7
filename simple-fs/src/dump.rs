//! 只读的诊断输出

use alloc::vec::Vec;
use core::fmt;

use block_dev::BlockDevice;

use crate::layout::{self, PointerBlock};
use crate::volume::Volume;
use crate::{BlockId, Result};

/// 超级块的各字段以及每个有效 inode 的索引情况
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump {
    pub total_blocks: u32,
    pub inode_blocks: u32,
    pub inodes: u32,
    pub files: Vec<InodeDump>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InodeDump {
    pub inumber: u32,
    pub size: u32,
    pub direct: Vec<BlockId>,
    pub indirect: Option<BlockId>,
    /// 间接索引块中记录的数据块
    pub indirect_data: Vec<BlockId>,
}

impl Volume {
    pub fn dump(&self, dev: &dyn BlockDevice) -> Result<Dump> {
        let files = self
            .inode_table
            .valid_inodes(dev)?
            .into_iter()
            .map(|(inumber, inode)| -> Result<InodeDump> {
                // 损坏的间接索引只报告，不读取
                let indirect = self.resolve(inode.indirect).ok().flatten();
                let indirect_data = match indirect {
                    Some(id) => layout::load::<PointerBlock>(dev, id)?
                        .pointers
                        .into_iter()
                        .flatten()
                        .collect(),
                    None => Vec::new(),
                };

                Ok(InodeDump {
                    inumber,
                    size: inode.size,
                    direct: inode.direct.into_iter().flatten().collect(),
                    indirect,
                    indirect_data,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Dump {
            total_blocks: self.super_block.total_blocks,
            inode_blocks: self.super_block.inode_blocks,
            inodes: self.super_block.inodes,
            files,
        })
    }
}

impl fmt::Display for Dump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "superblock:")?;
        writeln!(f, "    {} blocks", self.total_blocks)?;
        writeln!(f, "    {} inode blocks", self.inode_blocks)?;
        writeln!(f, "    {} inodes", self.inodes)?;

        for file in &self.files {
            writeln!(f, "inode {}:", file.inumber)?;
            writeln!(f, "    size: {} bytes", file.size)?;
            write!(f, "    direct blocks:")?;
            for id in &file.direct {
                write!(f, " {id}")?;
            }
            writeln!(f)?;

            if let Some(indirect) = file.indirect {
                writeln!(f, "    indirect block: {indirect}")?;
                write!(f, "    indirect data blocks:")?;
                for id in &file.indirect_data {
                    write!(f, " {id}")?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}
