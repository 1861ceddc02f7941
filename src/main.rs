use std::{env, fs};

use anyhow::Context;
use sfnt::FontFile;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = env::args().nth(1).context("usage: sfnt <font-file>")?;
    let buffer = fs::read(&path).with_context(|| format!("failed to read {}", path))?;

    let font = FontFile::new(&buffer)?;

    println!("{:?} font, {} tables", font.kind(), font.records().len());
    for record in font.records() {
        println!(
            "  {}  checksum=0x{:08X}  offset={}  length={}",
            record.tag,
            record.checksum,
            record
                .offset
                .map_or_else(|| "absent".to_owned(), |offset| offset.to_string()),
            record.length,
        );
    }

    if let Some(head) = font.head()? {
        println!("revision {}, {} units per em", head.font_revision, head.units_per_em);
    }

    if let Some(maxp) = font.maxp()? {
        println!("{} glyphs", maxp.num_glyphs);
    }

    if let Some(name) = font.name()? {
        if let Some(family) = name.family_name() {
            println!("family: {}", family);
        }
        if let Some(postscript_name) = name.postscript_name() {
            println!("postscript name: {}", postscript_name);
        }
    }

    if let Some(cmap) = font.cmap()? {
        println!("{} cmap subtable(s)", cmap.mappings().len());
        for subtable in cmap.mappings() {
            println!(
                "  platform {} encoding {} language {}",
                subtable.platform_id, subtable.encoding_id, subtable.language
            );
        }
    }

    if let Some(post) = font.post()? {
        println!(
            "post version {}, italic angle {}",
            post.version, post.italic_angle
        );
    }

    if let Err(err) = font.verify_checksums() {
        log::warn!("{}", err);
    }

    Ok(())
}
