use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::Result;
use crate::format;
use crate::stats::BuildStats;

/// записать таблицы свойства (вместе с побочной таблицей)
pub fn write_tables(filename: impl AsRef<Path>, entry: &CatalogEntry) -> Result<()>
{
    let mut file = BufWriter::new(File::create(filename.as_ref())?);

    format::write_entry(&mut file, entry)?;
    file.flush()?;

    Ok(())
}

/// записать каталог целиком
pub fn write_catalog(filename: impl AsRef<Path>, catalog: &Catalog) -> Result<()>
{
    let mut file = BufWriter::new(File::create(filename.as_ref())?);

    format::write_catalog(&mut file, catalog)?;
    file.flush()?;

    Ok(())
}

/// записать статистику построения
pub fn write_stats(filename: impl AsRef<Path>, name: &str, stats: &BuildStats) -> Result<()>
{
    let mut file = BufWriter::new(File::create(filename.as_ref())?);

    format_stats(&mut file, name, stats)?;
    file.flush()?;

    Ok(())
}

/// статистика в читаемом виде
pub fn format_stats<W: Write>(w: &mut W, name: &str, stats: &BuildStats) -> Result<()>
{
    writeln!(w, "{} ({} b)", name, stats.total_bytes())?;
    writeln!(w)?;

    for level in stats.levels.iter() {
        writeln!(
            w,
            "{}. {} bits: {} -> {} blocks ({:.1}%), {} b x {}, {} b",
            level.level,
            level.bits,
            level.logical_blocks,
            level.physical_blocks,
            level.ratio() * 100.0,
            level.cell_width,
            level.bytes / level.cell_width.max(1),
            level.bytes
        )?;
    }

    Ok(())
}
