//! двоичный формат запечённых таблиц.
//!
//! все числа - little endian.
//!
//! таблицы трая:
//!
//! ```text
//! "CPTR"  версия: u16  домен: u8  уровней (n): u8  ширины уровней: n x u8
//! ширина значения: u8  упаковка: u8  значение по умолчанию: u32
//! n - 1 уровней ссылок:  ячеек: u32  ширина ячейки (1, 2, 4): u8  ячейки
//! листья:                ячеек: u32  ячейки (байты при упаковке, иначе по ширине значения)
//! ```
//!
//! каталог:
//!
//! ```text
//! "CPCT"  версия: u16  свойств: u32
//! свойство:  длина имени: u16  имя (utf-8)  форма: u8  таблицы трая
//!            есть побочная таблица: u8  [длина записи: u8  ячеек: u32  ячейки: u32 ...]
//! ```

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::catalog::{Catalog, CatalogEntry, PropertyKind};
use crate::common::{domain_size, MAX_TOTAL_BITS};
use crate::descriptor::{TrieDescriptor, ValueWidth};
use crate::error::{Result, TrieError};
use crate::side_table::SideTable;
use crate::stats::BuildStats;
use crate::tables::{BlockTable, LeafCells, PageRef, StageLevel, TrieTables};

#[cfg(test)]
mod tests;

pub const TABLES_MAGIC: &[u8; 4] = b"CPTR";
pub const CATALOG_MAGIC: &[u8; 4] = b"CPCT";

/// текущая версия формата
pub const FORMAT_VERSION: u16 = 1;

/// записать таблицы трая
pub fn write_tables<W: Write>(w: &mut W, tables: &TrieTables) -> Result<()>
{
    let descriptor = tables.descriptor();

    w.write_all(TABLES_MAGIC)?;
    w.write_u16::<LittleEndian>(FORMAT_VERSION)?;
    w.write_u8(descriptor.domain_bits())?;
    w.write_u8(descriptor.level_count() as u8)?;
    w.write_all(descriptor.levels())?;
    w.write_u8(descriptor.value_width().bits())?;
    w.write_u8(descriptor.is_packed() as u8)?;
    w.write_u32::<LittleEndian>(tables.default_value())?;

    for stage in tables.stages() {
        let width = stage.cell_width();

        w.write_u32::<LittleEndian>(stage.pages().len() as u32)?;
        w.write_u8(width as u8)?;

        for &page in stage.pages() {
            write_cell(w, page.block(), width)?;
        }
    }

    match tables.leaf().cells() {
        LeafCells::Packed(bytes) => {
            w.write_u32::<LittleEndian>(bytes.len() as u32)?;
            w.write_all(bytes)?;
        }
        LeafCells::Plain(values) => {
            let width = descriptor.value_width().cell_bytes();

            w.write_u32::<LittleEndian>(values.len() as u32)?;

            for &value in values {
                write_cell(w, value, width)?;
            }
        }
    }

    Ok(())
}

/// прочитать таблицы трая; структура проверяется целиком
pub fn read_tables<R: Read>(r: &mut R) -> Result<TrieTables>
{
    read_magic(r, TABLES_MAGIC)?;

    let domain_bits = r.read_u8().map_err(truncated)?;
    let level_count = r.read_u8().map_err(truncated)? as usize;

    let mut levels = vec![0; level_count];
    r.read_exact(&mut levels).map_err(truncated)?;

    let value_width = ValueWidth::from_bits(r.read_u8().map_err(truncated)?).map_err(invalid)?;
    let packed = match r.read_u8().map_err(truncated)? {
        0 => false,
        1 => true,
        flag => return Err(TrieError::format(format!("bad packing flag {}", flag))),
    };
    let default = r.read_u32::<LittleEndian>().map_err(truncated)?;

    let descriptor =
        TrieDescriptor::with_domain(domain_bits, &levels, value_width, packed).map_err(invalid)?;

    let mut stages = Vec::with_capacity(descriptor.leaf_level());

    for level in 0 .. descriptor.leaf_level() {
        let cells = read_cell_count(r)?;
        let width = r.read_u8().map_err(truncated)? as usize;

        let pages = (0 .. cells)
            .map(|_| read_cell(r, width).map(PageRef::new))
            .collect::<Result<Vec<_>>>()?;

        stages.push(StageLevel::new(descriptor.bits_at(level), pages));
    }

    let cells = read_cell_count(r)?;

    let leaf_cells = match packed {
        true => {
            let mut bytes = vec![0; cells];
            r.read_exact(&mut bytes).map_err(truncated)?;
            LeafCells::Packed(bytes)
        }
        false => {
            let width = value_width.cell_bytes();

            LeafCells::Plain(
                (0 .. cells)
                    .map(|_| read_cell(r, width))
                    .collect::<Result<Vec<_>>>()?,
            )
        }
    };

    let leaf = BlockTable::new(descriptor.leaf_bits(), value_width, leaf_cells);

    TrieTables::from_parts(descriptor, stages, leaf, default)
}

/// записать побочную таблицу (или её отсутствие)
pub fn write_side_table<W: Write>(w: &mut W, table: Option<&SideTable>) -> Result<()>
{
    let table = match table {
        Some(table) => table,
        None => return Ok(w.write_u8(0)?),
    };

    w.write_u8(1)?;
    w.write_u8(table.record_len() as u8)?;
    w.write_u32::<LittleEndian>(table.raw().len() as u32)?;

    for &cell in table.raw() {
        w.write_u32::<LittleEndian>(cell)?;
    }

    Ok(())
}

pub fn read_side_table<R: Read>(r: &mut R) -> Result<Option<SideTable>>
{
    match r.read_u8().map_err(truncated)? {
        0 => return Ok(None),
        1 => (),
        flag => return Err(TrieError::format(format!("bad side table flag {}", flag))),
    }

    let record_len = r.read_u8().map_err(truncated)? as usize;
    let cells = read_cell_count(r)?;

    let rows = (0 .. cells)
        .map(|_| r.read_u32::<LittleEndian>().map_err(truncated))
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(SideTable::from_rows(record_len, rows).map_err(invalid)?))
}

/// записать свойство каталога
pub fn write_entry<W: Write>(w: &mut W, entry: &CatalogEntry) -> Result<()>
{
    let name = entry.name().as_bytes();

    if name.len() > u16::MAX as usize {
        return Err(TrieError::format(format!("property name of {} bytes", name.len())));
    }

    w.write_u16::<LittleEndian>(name.len() as u16)?;
    w.write_all(name)?;
    w.write_u8(entry.kind().tag())?;

    write_tables(w, entry.tables())?;
    write_side_table(w, entry.side_table())
}

pub fn read_entry<R: Read>(r: &mut R) -> Result<CatalogEntry>
{
    let len = r.read_u16::<LittleEndian>().map_err(truncated)? as usize;

    let mut name = vec![0; len];
    r.read_exact(&mut name).map_err(truncated)?;

    let name = String::from_utf8(name).map_err(|_| TrieError::format("property name is not utf-8"))?;
    let kind = PropertyKind::from_tag(r.read_u8().map_err(truncated)?)?;

    let tables = read_tables(r)?;
    let side_table = read_side_table(r)?;

    // статистика построения не сохраняется
    CatalogEntry::new(name, kind, tables, side_table, BuildStats::new()).map_err(invalid)
}

pub fn write_catalog<W: Write>(w: &mut W, catalog: &Catalog) -> Result<()>
{
    w.write_all(CATALOG_MAGIC)?;
    w.write_u16::<LittleEndian>(FORMAT_VERSION)?;
    w.write_u32::<LittleEndian>(catalog.len() as u32)?;

    for entry in catalog.entries() {
        write_entry(w, entry)?;
    }

    Ok(())
}

pub fn read_catalog<R: Read>(r: &mut R) -> Result<Catalog>
{
    read_magic(r, CATALOG_MAGIC)?;

    let count = r.read_u32::<LittleEndian>().map_err(truncated)?;
    let mut catalog = Catalog::new();

    for _ in 0 .. count {
        catalog.insert(read_entry(r)?).map_err(invalid)?;
    }

    Ok(catalog)
}

/// каталог в байтах
pub fn to_bytes(catalog: &Catalog) -> Result<Vec<u8>>
{
    let mut bytes = vec![];
    write_catalog(&mut bytes, catalog)?;

    Ok(bytes)
}

/// каталог из байтов; данные после каталога - ошибка
pub fn from_bytes(bytes: &[u8]) -> Result<Catalog>
{
    let mut cursor = io::Cursor::new(bytes);
    let catalog = read_catalog(&mut cursor)?;

    if cursor.position() as usize != bytes.len() {
        return Err(TrieError::format(format!(
            "{} trailing bytes after catalog",
            bytes.len() - cursor.position() as usize
        )));
    }

    Ok(catalog)
}

fn read_magic<R: Read>(r: &mut R, magic: &[u8; 4]) -> Result<()>
{
    let mut found = [0; 4];
    r.read_exact(&mut found).map_err(truncated)?;

    if &found != magic {
        return Err(TrieError::format(format!("bad magic {:?}", found)));
    }

    let version = r.read_u16::<LittleEndian>().map_err(truncated)?;

    if version != FORMAT_VERSION {
        return Err(TrieError::format(format!(
            "unsupported format version {} (expected {})",
            version, FORMAT_VERSION
        )));
    }

    Ok(())
}

fn read_cell_count<R: Read>(r: &mut R) -> Result<usize>
{
    let cells = r.read_u32::<LittleEndian>().map_err(truncated)?;

    if cells as u64 > domain_size(MAX_TOTAL_BITS) {
        return Err(TrieError::format(format!("level of {} cells", cells)));
    }

    Ok(cells as usize)
}

fn write_cell<W: Write>(w: &mut W, value: u32, width: usize) -> Result<()>
{
    match width {
        1 => w.write_u8(value as u8)?,
        2 => w.write_u16::<LittleEndian>(value as u16)?,
        _ => w.write_u32::<LittleEndian>(value)?,
    }

    Ok(())
}

fn read_cell<R: Read>(r: &mut R, width: usize) -> Result<u32>
{
    Ok(match width {
        1 => r.read_u8().map_err(truncated)? as u32,
        2 => r.read_u16::<LittleEndian>().map_err(truncated)? as u32,
        4 => r.read_u32::<LittleEndian>().map_err(truncated)?,
        _ => return Err(TrieError::format(format!("bad cell width {}", width))),
    })
}

/// конец данных посреди записи - повреждённые данные, а не ошибка ввода-вывода
fn truncated(e: io::Error) -> TrieError
{
    match e.kind() {
        io::ErrorKind::UnexpectedEof => TrieError::format("unexpected end of data"),
        _ => TrieError::Io(e),
    }
}

/// ошибки проверки загруженных данных - ошибки формата
fn invalid(e: TrieError) -> TrieError
{
    match e {
        TrieError::Config(msg) => TrieError::Format(msg),
        TrieError::Property { name, source } => TrieError::format(format!("property `{}`: {}", name, source)),
        other => other,
    }
}
