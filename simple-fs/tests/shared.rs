mod common;

use std::thread;

use common::{mounted, occupied, pattern, reachable};
use simple_fs::BLOCK_SIZE;

#[test]
fn concurrent_writers() {
    let (_, fs) = mounted(256);
    let fs = fs.into_shared();

    let handles: Vec<_> = (0..8u8)
        .map(|seed| {
            let fs = fs.clone();
            thread::spawn(move || {
                let inumber = fs.lock().create().unwrap();
                let data = pattern(3 * BLOCK_SIZE + seed as usize * 700, seed);
                // 分段写入，让各线程的块交错分配
                for (i, chunk) in data.chunks(1500).enumerate() {
                    let written = fs.lock().write_at(inumber, i * 1500, chunk).unwrap();
                    assert_eq!(chunk.len(), written);
                }
                (inumber, data)
            })
        })
        .collect();

    let files: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let fs = fs.lock();
    assert_eq!(files.len() as u32, fs.super_block().unwrap().inodes);
    for (inumber, data) in &files {
        assert_eq!(data.len() as u32, fs.size(*inumber).unwrap());
        assert_eq!(*data, fs.read(*inumber, 0, data.len()).unwrap());
    }
    assert_eq!(reachable(&fs), occupied(&fs));
}

#[test]
fn shared_delete() {
    let (_, fs) = mounted(64);
    let fs = fs.into_shared();
    let inumber = {
        let mut fs = fs.lock();
        let inumber = fs.create().unwrap();
        fs.write_at(inumber, 0, &pattern(2 * BLOCK_SIZE, 3)).unwrap();
        inumber
    };

    let deleter = {
        let fs = fs.clone();
        thread::spawn(move || fs.lock().delete(inumber))
    };
    deleter.join().unwrap().unwrap();

    let fs = fs.lock();
    assert!(fs.size(inumber).is_err());
    assert_eq!(0, fs.super_block().unwrap().inodes);
    assert_eq!(reachable(&fs), occupied(&fs));
}
