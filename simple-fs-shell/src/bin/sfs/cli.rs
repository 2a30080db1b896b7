use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simple_fs::INODE_BLOCK_RATIO;

/// Inspect and edit simple-fs disk images
#[derive(Parser)]
#[command(version)]
pub struct Cli {
    /// Disk image file, created when missing
    pub image: PathBuf,

    /// Resize the image to this many blocks before running the command
    #[arg(long, short)]
    pub blocks: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a fresh filesystem on the image
    Format {
        /// Erase an existing filesystem
        #[arg(long, short)]
        force: bool,

        /// One inode block per this many blocks
        #[arg(long, default_value_t = INODE_BLOCK_RATIO)]
        inode_ratio: u32,
    },
    /// Print the superblock and every valid inode
    Debug,
    /// Create an empty file and print its inode number
    Create,
    /// Delete a file and free its blocks
    Delete { inumber: u32 },
    /// Print the size of a file in bytes
    Getsize { inumber: u32 },
    /// Write the contents of a file to stdout
    Cat { inumber: u32 },
    /// Copy a host file into an existing, empty inode
    Copyin { file: PathBuf, inumber: u32 },
    /// Copy an inode out to a host file
    Copyout { inumber: u32, file: PathBuf },
}
