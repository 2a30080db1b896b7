mod cli;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::sync::Arc;

use block_dev::{BlockDevice, BLOCK_SIZE};
use clap::Parser;
use cli::{Cli, Command};
use simple_fs::{FormatOptions, SimpleFileSystem};
use simple_fs_shell::{copy_in, BlockFile};

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let fd = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&cli.image)?;
    if let Some(blocks) = cli.blocks {
        fd.set_len(blocks * BLOCK_SIZE as u64)?;
    }
    let block_file = BlockFile::new(fd)?;
    log::info!("image={:?} blocks={}", cli.image, block_file.num_blocks());

    let mut fs = SimpleFileSystem::new(Arc::new(block_file));

    if let Command::Format { force, inode_ratio } = cli.command {
        fs.format(&FormatOptions { inode_ratio, force })
            .map_err(io::Error::other)?;
        println!("disk formatted.");
        return Ok(());
    }

    fs.mount().map_err(io::Error::other)?;
    run(&mut fs, cli.command).map_err(io::Error::other)
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn run(fs: &mut SimpleFileSystem, command: Command) -> Result<(), BoxError> {
    match command {
        Command::Format { .. } => unreachable!("handled before mounting"),
        Command::Debug => print!("{}", fs.debug()?),
        Command::Create => println!("created inode {}", fs.create()?),
        Command::Delete { inumber } => {
            fs.delete(inumber)?;
            println!("inode {inumber} deleted.");
        }
        Command::Getsize { inumber } => {
            println!("inode {inumber} has size {}", fs.size(inumber)?);
        }
        Command::Cat { inumber } => {
            let data = fs.read(inumber, 0, fs.size(inumber)? as usize)?;
            io::stdout().write_all(&data)?;
        }
        Command::Copyin { file, inumber } => {
            let data = fs::read(&file)?;
            let written = copy_in(fs, inumber, &data)?;
            println!("{written} bytes copied");
        }
        Command::Copyout { inumber, file } => {
            let data = fs.read(inumber, 0, fs.size(inumber)? as usize)?;
            fs::write(&file, &data)?;
            println!("{} bytes copied", data.len());
        }
    }

    Ok(())
}
