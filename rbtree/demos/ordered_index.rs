//! A small ordered index over file names, ordered case-insensitively, that logs every
//! payload the tree releases.
//!
//! Run with `cargo run --example ordered_index`.

use std::cmp::Ordering;

use log::{LevelFilter, info, warn};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use rbtree::{TreeBuilder, TreeError};

#[derive(Debug)]
struct FileEntry {
    size: u64,
}

fn case_insensitive(a: &String, b: &String) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn main() -> Result<(), TreeError> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap();

    let mut index = TreeBuilder::new()
        .compare(case_insensitive)
        .destroy(|entry: FileEntry| info!("released entry of {} bytes", entry.size))
        .capacity(8)
        .build::<String, FileEntry>();

    for (name, size) in [
        ("README.md", 2_048),
        ("build.rs", 512),
        ("Cargo.toml", 768),
        ("src", 4_096),
        ("LICENSE", 11_357),
    ] {
        index.insert(name.to_string(), FileEntry { size })?;
    }

    if let Err(e) = index.insert("src".to_string(), FileEntry { size: 0 }) {
        warn!("second insert of src rejected: {e}");
    }

    let mut cursor = index.minimum().map(|(k, _)| k.clone());
    while let Ok(name) = cursor {
        let size = index.search(&name)?.size;
        info!("{name:>12} {size:>8}");
        cursor = index.successor(&name).map(|(k, _)| k.clone());
    }

    let last = index.maximum()?.0.clone();
    let before_last = index.predecessor(&last)?.0;
    info!("last entry is {last}, preceded by {before_last}");

    index.delete(&"build.rs".to_string())?;
    info!("{} entries remain", index.size());

    index.deinit();
    Ok(())
}
