use std::collections::HashMap;

use crate::common::format_codepoint;
use crate::config_checks;
use crate::error::{Result, TrieError};
use crate::tables::TrieTables;

/// наибольшее количество кодпоинтов в записи
pub const MAX_EXPANSION: usize = 4;

/// последовательность кодпоинтов из записи побочной таблицы (1..=MAX_EXPANSION штук)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Expansion
{
    len: u8,
    codes: [u32; MAX_EXPANSION],
}

impl Expansion
{
    /// кодпоинт без изменений
    pub fn single(code: u32) -> Self
    {
        let mut codes = [0; MAX_EXPANSION];
        codes[0] = code;

        Self { len: 1, codes }
    }

    pub fn from_slice(codes: &[u32]) -> Option<Self>
    {
        if codes.is_empty() || codes.len() > MAX_EXPANSION {
            return None;
        }

        let mut expansion = Self {
            len: codes.len() as u8,
            codes: [0; MAX_EXPANSION],
        };

        expansion.codes[.. codes.len()].copy_from_slice(codes);

        Some(expansion)
    }

    pub fn as_slice(&self) -> &[u32]
    {
        &self.codes[.. self.len as usize]
    }
}

impl core::ops::Deref for Expansion
{
    type Target = [u32];

    fn deref(&self) -> &[u32]
    {
        self.as_slice()
    }
}

impl core::fmt::Debug for Expansion
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_list()
            .entries(self.as_slice().iter().map(|&c| format_codepoint(c)))
            .finish()
    }
}

/// побочная таблица: плоский массив записей фиксированной длины.
///
/// запись - `record_len + 1` ячеек: количество кодпоинтов, затем сами кодпоинты, дополненные нулями.
/// запись 0 пустая: значение трая 0 означает "кодпоинт не меняется"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideTable
{
    record_len: usize,
    rows: Vec<u32>,
}

impl SideTable
{
    /// таблица с единственной пустой записью
    pub fn new(record_len: usize) -> Result<Self>
    {
        config_checks!(
            record_len == 0 || record_len > MAX_EXPANSION
                => "side table records hold 1..={} codepoints, not {}", MAX_EXPANSION, record_len
        );

        Ok(Self {
            record_len,
            rows: vec![0; record_len + 1],
        })
    }

    /// таблица из сериализованных записей
    pub fn from_rows(record_len: usize, rows: Vec<u32>) -> Result<Self>
    {
        let mut table = Self::new(record_len)?;
        let stride = record_len + 1;

        if rows.is_empty() || rows.len() % stride != 0 {
            return Err(TrieError::format(format!(
                "{} side table cells do not form records of {}",
                rows.len(),
                stride
            )));
        }

        for (index, row) in rows.chunks(stride).enumerate() {
            let len = row[0] as usize;

            let valid = match index {
                0 => row.iter().all(|&c| c == 0),
                _ => (1 ..= record_len).contains(&len) && row[len + 1 ..].iter().all(|&c| c == 0),
            };

            if !valid {
                return Err(TrieError::format(format!("malformed side table record {}", index)));
            }
        }

        table.rows = rows;

        Ok(table)
    }

    pub fn record_len(&self) -> usize
    {
        self.record_len
    }

    pub fn row_count(&self) -> usize
    {
        self.rows.len() / (self.record_len + 1)
    }

    /// ячейки всех записей подряд
    pub fn raw(&self) -> &[u32]
    {
        &self.rows
    }

    /// кодпоинты записи index; запись 0 (и несуществующие записи) - сам кодпоинт
    pub fn resolve(&self, index: u32, code: u32) -> Expansion
    {
        let stride = self.record_len + 1;
        let start = index as usize * stride;

        match self.rows.get(start .. start + stride) {
            Some(row) if index != 0 => row
                .get(1 ..= row[0] as usize)
                .and_then(Expansion::from_slice)
                .unwrap_or(Expansion::single(code)),
            _ => Expansion::single(code),
        }
    }

    /// каждое значение, которое может вернуть трай, указывает на существующую запись
    pub fn check_indices(&self, tables: &TrieTables) -> Result<()>
    {
        let max = tables.max_value() as usize;

        config_checks!(
            max >= self.row_count()
                => "trie value {} points past the {} side table records", max, self.row_count()
        );

        Ok(())
    }

    fn push(&mut self, payload: &[u32]) -> u32
    {
        let index = self.row_count() as u32;

        self.rows.push(payload.len() as u32);
        self.rows.extend_from_slice(payload);
        self.rows
            .extend(core::iter::repeat(0).take(self.record_len - payload.len()));

        index
    }
}

/// сборка побочной таблицы: одинаковые последовательности получают одну запись
pub struct SideTableBuilder
{
    table: SideTable,
    index: HashMap<Vec<u32>, u32>,
}

impl SideTableBuilder
{
    pub fn new(record_len: usize) -> Result<Self>
    {
        Ok(Self {
            table: SideTable::new(record_len)?,
            index: HashMap::new(),
        })
    }

    /// номер записи для последовательности кодпоинтов (добавляется, если её ещё нет)
    pub fn intern(&mut self, payload: &[u32]) -> Result<u32>
    {
        config_checks!(
            payload.is_empty() || payload.len() > self.table.record_len
                => "side table payload of {} codepoints, records hold 1..={}",
                   payload.len(), self.table.record_len
        );

        if let Some(&index) = self.index.get(payload) {
            return Ok(index);
        }

        let index = self.table.push(payload);
        self.index.insert(payload.to_vec(), index);

        Ok(index)
    }

    pub fn finish(self) -> SideTable
    {
        self.table
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::descriptor::{TrieDescriptor, ValueWidth};
    use crate::encode::{build, RangeMapping};

    #[test]
    fn expansion_resolves_in_order()
    {
        let mut builder = SideTableBuilder::new(3).unwrap();

        let sharp_s = builder.intern(&[0x73, 0x73]).unwrap();
        let iota = builder.intern(&[0x3B9, 0x308, 0x301]).unwrap();

        assert_eq!(builder.intern(&[0x73, 0x73]).unwrap(), sharp_s);

        let table = builder.finish();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.resolve(sharp_s, 0xDF).as_slice(), &[0x73, 0x73]);
        assert_eq!(&*table.resolve(iota, 0x390), &[0x3B9, 0x308, 0x301]);
        // без расширения - сам кодпоинт
        assert_eq!(table.resolve(0, 0x41).as_slice(), &[0x41]);
        assert_eq!(table.resolve(99, 0x41).as_slice(), &[0x41]);
    }

    #[test]
    fn rejects_bad_payloads()
    {
        assert!(SideTable::new(0).is_err());
        assert!(SideTable::new(MAX_EXPANSION + 1).is_err());

        let mut builder = SideTableBuilder::new(2).unwrap();

        assert!(matches!(builder.intern(&[]), Err(TrieError::Config(_))));
        assert!(matches!(builder.intern(&[1, 2, 3]), Err(TrieError::Config(_))));
    }

    #[test]
    fn row_validation()
    {
        assert!(SideTable::from_rows(2, vec![0, 0, 0, 2, 0x66, 0x66]).is_ok());
        // запись 0 не пустая
        assert!(SideTable::from_rows(2, vec![1, 5, 0]).is_err());
        // длина больше записи
        assert!(SideTable::from_rows(2, vec![0, 0, 0, 3, 1, 1]).is_err());
        // неполная запись
        assert!(SideTable::from_rows(2, vec![0, 0, 0, 1]).is_err());
    }

    #[test]
    fn indices_checked_against_trie()
    {
        let mut builder = SideTableBuilder::new(2).unwrap();
        let index = builder.intern(&[0x66, 0x66]).unwrap();
        let table = builder.finish();

        let descriptor = TrieDescriptor::with_domain(8, &[4, 4], ValueWidth::Bits8, false).unwrap();

        let good = RangeMapping::from_tuples(&[(0x10, 0x10, index)], 0).unwrap();
        let tables = build(&descriptor, &good).unwrap().tables;
        assert!(table.check_indices(&tables).is_ok());

        let bad = RangeMapping::from_tuples(&[(0x10, 0x10, index + 1)], 0).unwrap();
        let tables = build(&descriptor, &bad).unwrap().tables;
        assert!(matches!(table.check_indices(&tables), Err(TrieError::Config(_))));
    }

    #[test]
    fn expansion_debug_lists_codepoints()
    {
        let expansion = Expansion::from_slice(&[0x66, 0x1F600]).unwrap();

        assert_eq!(format!("{:?}", expansion), r#"["U+0066", "U+1F600"]"#);
    }
}
