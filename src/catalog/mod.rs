use std::collections::HashMap;

use log::{info, warn};
use rayon::prelude::*;

use crate::common::{low_mask, DOMAIN_BITS};
use crate::config_checks;
use crate::descriptor::{TrieDescriptor, ValueWidth};
use crate::encode::{self, RangeMapping, SplitSearch, ValueRange};
use crate::error::{Result, TrieError};
use crate::side_table::{Expansion, SideTable, SideTableBuilder};
use crate::stats::BuildStats;
use crate::tables::TrieTables;

pub mod builtin;


/// форма значения свойства
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind
{
    /// да / нет
    Boolean,
    /// порядковый номер значения перечисления
    Enumeration,
    /// знаковое смещение кодпоинта
    SignedDelta,
    /// последовательность кодпоинтов из побочной таблицы
    CodepointList,
}

impl PropertyKind
{
    pub fn tag(self) -> u8
    {
        match self {
            PropertyKind::Boolean => 0,
            PropertyKind::Enumeration => 1,
            PropertyKind::SignedDelta => 2,
            PropertyKind::CodepointList => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self>
    {
        Ok(match tag {
            0 => PropertyKind::Boolean,
            1 => PropertyKind::Enumeration,
            2 => PropertyKind::SignedDelta,
            3 => PropertyKind::CodepointList,
            _ => return Err(TrieError::format(format!("unknown property kind {}", tag))),
        })
    }
}

/// значение свойства кодпоинта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue
{
    Boolean(bool),
    Enumeration(u32),
    SignedDelta(i32),
    Codepoints(Expansion),
}

impl PropertyValue
{
    pub fn as_bool(&self) -> Option<bool>
    {
        match self {
            PropertyValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<u32>
    {
        match self {
            PropertyValue::Enumeration(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_delta(&self) -> Option<i32>
    {
        match self {
            PropertyValue::SignedDelta(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_codepoints(&self) -> Option<&[u32]>
    {
        match self {
            PropertyValue::Codepoints(value) => Some(value.as_slice()),
            _ => None,
        }
    }
}

/// записать знаковое смещение в bits бит (дополнительный код)
pub fn encode_delta(delta: i32, width: ValueWidth) -> Result<u32>
{
    let bits = width.bits();
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;

    match (min ..= max).contains(&(delta as i64)) {
        true => Ok(delta as u32 & low_mask(bits)),
        false => Err(TrieError::ValueOverflow {
            value: delta as u32,
            bits,
        }),
    }
}

/// прочитать знаковое смещение из bits бит
#[inline(always)]
pub fn decode_delta(value: u32, width: ValueWidth) -> i32
{
    let shift = 32 - width.bits() as u32;
    ((value << shift) as i32) >> shift
}

/// как выбирается разбиение ключа по уровням
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitChoice
{
    /// ширины уровней заданы явно (от верхнего к листовому)
    Fixed(Vec<u8>),
    /// подбираются перебором
    Search(SplitSearch),
}

/// исходные данные одного свойства каталога
#[derive(Debug, Clone)]
pub struct PropertySpec
{
    pub name: String,
    pub kind: PropertyKind,
    pub value_width: ValueWidth,
    pub packed: bool,
    pub domain_bits: u8,
    pub split: SplitChoice,
    pub mapping: RangeMapping,
    pub side_table: Option<SideTable>,
}

impl PropertySpec
{
    /// свойство стандартного домена, разбиение подбирается перебором
    pub fn new(
        name: impl Into<String>,
        kind: PropertyKind,
        value_width: ValueWidth,
        mapping: RangeMapping,
    ) -> Self
    {
        Self {
            name: name.into(),
            kind,
            value_width,
            packed: false,
            domain_bits: DOMAIN_BITS,
            split: SplitChoice::Search(SplitSearch::default()),
            mapping,
            side_table: None,
        }
    }

    /// булево свойство: единицы в диапазонах, ноль вне их; листья упакованы по 8 в байт
    pub fn flags(name: impl Into<String>, ranges: &[(u32, u32)]) -> Result<Self>
    {
        let ranges = ranges.iter().map(|&(first, last)| ValueRange::new(first, last, 1)).collect();
        let mapping = RangeMapping::new(ranges, 0)?;

        Ok(Self::new(name, PropertyKind::Boolean, ValueWidth::Bits1, mapping).packed(true))
    }

    /// свойство-смещение: (first, last, delta), вне диапазонов - 0
    pub fn deltas(
        name: impl Into<String>,
        width: ValueWidth,
        ranges: &[(u32, u32, i32)],
    ) -> Result<Self>
    {
        let ranges = ranges
            .iter()
            .map(|&(first, last, delta)| Ok(ValueRange::new(first, last, encode_delta(delta, width)?)))
            .collect::<Result<Vec<_>>>()?;

        let mapping = RangeMapping::new(ranges, 0)?;

        Ok(Self::new(name, PropertyKind::SignedDelta, width, mapping))
    }

    /// свойство-последовательность: кодпоинт -> кодпоинты записи побочной таблицы.
    /// кодпоинты должны идти по возрастанию
    pub fn codepoint_lists(
        name: impl Into<String>,
        record_len: usize,
        entries: Vec<(u32, Vec<u32>)>,
    ) -> Result<Self>
    {
        let mut side = SideTableBuilder::new(record_len)?;
        let mut ranges = Vec::with_capacity(entries.len());

        for (code, payload) in entries.iter() {
            ranges.push(ValueRange::new(*code, *code, side.intern(payload)?));
        }

        let side = side.finish();
        let rows = side.row_count();
        let width = if rows <= 0x100 {
            ValueWidth::Bits8
        } else if rows <= 0x1_0000 {
            ValueWidth::Bits16
        } else {
            ValueWidth::Bits32
        };

        let mapping = RangeMapping::new(ranges, 0)?;

        Ok(Self::new(name, PropertyKind::CodepointList, width, mapping).side_table(side))
    }

    pub fn packed(mut self, packed: bool) -> Self
    {
        self.packed = packed;
        self
    }

    pub fn split(mut self, levels: &[u8]) -> Self
    {
        self.split = SplitChoice::Fixed(levels.to_vec());
        self
    }

    pub fn search(mut self, bounds: SplitSearch) -> Self
    {
        self.split = SplitChoice::Search(bounds);
        self
    }

    pub fn domain(mut self, domain_bits: u8) -> Self
    {
        self.domain_bits = domain_bits;
        self
    }

    pub fn side_table(mut self, table: SideTable) -> Self
    {
        self.side_table = Some(table);
        self
    }

    /// построить запись каталога; ошибка помечается именем свойства
    pub fn build(&self) -> Result<CatalogEntry>
    {
        self.build_entry().map_err(|e| e.in_property(self.name.as_str()))
    }

    fn build_entry(&self) -> Result<CatalogEntry>
    {
        let baked = match &self.split {
            SplitChoice::Fixed(levels) => {
                let descriptor = TrieDescriptor::with_domain(
                    self.domain_bits,
                    levels,
                    self.value_width,
                    self.packed,
                )?;

                encode::build(&descriptor, &self.mapping)?
            }
            SplitChoice::Search(bounds) => encode::build_with_search(
                &self.mapping,
                self.value_width,
                self.packed,
                self.domain_bits,
                bounds,
            )?,
        };

        info!(
            "{}: levels {:?}, {} b",
            self.name,
            baked.tables.descriptor().levels(),
            baked.tables.size()
        );

        CatalogEntry::new(
            self.name.clone(),
            self.kind,
            baked.tables,
            self.side_table.clone(),
            baked.stats,
        )
    }
}

/// запись каталога: построенный трай свойства, побочная таблица, статистика построения
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry
{
    name: String,
    kind: PropertyKind,
    tables: TrieTables,
    side_table: Option<SideTable>,
    stats: BuildStats,
}

impl CatalogEntry
{
    pub fn new(
        name: String,
        kind: PropertyKind,
        tables: TrieTables,
        side_table: Option<SideTable>,
        stats: BuildStats,
    ) -> Result<Self>
    {
        #[rustfmt::skip]
        config_checks!(
            name.is_empty()                                                 => "property name is empty";
            kind == PropertyKind::CodepointList && side_table.is_none()     => "codepoint list property `{}` has no side table", name;
            kind != PropertyKind::CodepointList && side_table.is_some()     => "property `{}` of kind {:?} has a side table", name, kind;
        );

        if let Some(side_table) = &side_table {
            side_table.check_indices(&tables)?;
        }

        Ok(Self {
            name,
            kind,
            tables,
            side_table,
            stats,
        })
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn kind(&self) -> PropertyKind
    {
        self.kind
    }

    pub fn tables(&self) -> &TrieTables
    {
        &self.tables
    }

    pub fn side_table(&self) -> Option<&SideTable>
    {
        self.side_table.as_ref()
    }

    pub fn stats(&self) -> &BuildStats
    {
        &self.stats
    }

    /// значение в трае без интерпретации
    #[inline(always)]
    pub fn raw(&self, code: u32) -> u32
    {
        self.tables.get(code)
    }

    pub fn get(&self, code: u32) -> PropertyValue
    {
        let raw = self.raw(code);

        match self.kind {
            PropertyKind::Boolean => PropertyValue::Boolean(raw != 0),
            PropertyKind::Enumeration => PropertyValue::Enumeration(raw),
            PropertyKind::SignedDelta => {
                PropertyValue::SignedDelta(decode_delta(raw, self.tables.descriptor().value_width()))
            }
            PropertyKind::CodepointList => PropertyValue::Codepoints(match &self.side_table {
                Some(table) => table.resolve(raw, code),
                None => Expansion::single(code),
            }),
        }
    }

    /// размер таблиц вместе с побочной
    pub fn size(&self) -> usize
    {
        self.tables.size() + self.side_table.as_ref().map_or(0, |t| t.raw().len() * 4)
    }
}

/// опрос одного свойства, привязанный к его записи
#[derive(Debug, Clone, Copy)]
pub struct PropertyQuery<'a>
{
    entry: &'a CatalogEntry,
}

impl<'a> PropertyQuery<'a>
{
    pub fn name(&self) -> &'a str
    {
        self.entry.name()
    }

    pub fn entry(&self) -> &'a CatalogEntry
    {
        self.entry
    }

    #[inline(always)]
    pub fn get(&self, code: u32) -> PropertyValue
    {
        self.entry.get(code)
    }
}

/// каталог свойств по именам. после построения не меняется
#[derive(Debug, Clone, Default)]
pub struct Catalog
{
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

/// результат построения каталога: свойства строятся независимо,
/// ошибка одного не мешает остальным
#[derive(Debug)]
pub struct CatalogBuild
{
    pub catalog: Catalog,
    pub failures: Vec<TrieError>,
}

impl CatalogBuild
{
    /// каталог, если все свойства построены; иначе первая ошибка
    pub fn into_result(self) -> Result<Catalog>
    {
        match self.failures.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.catalog),
        }
    }
}

impl Catalog
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// построить свойства параллельно, порядок записей - порядок specs
    pub fn build(specs: Vec<PropertySpec>) -> CatalogBuild
    {
        let built: Vec<Result<CatalogEntry>> = specs.par_iter().map(|spec| spec.build()).collect();

        let mut catalog = Catalog::new();
        let mut failures = vec![];

        for result in built {
            match result.and_then(|entry| catalog.insert(entry)) {
                Ok(()) => (),
                Err(error) => {
                    warn!("{}", error);
                    failures.push(error);
                }
            }
        }

        CatalogBuild { catalog, failures }
    }

    /// добавить запись; имена уникальны
    pub fn insert(&mut self, entry: CatalogEntry) -> Result<()>
    {
        if self.index.contains_key(entry.name()) {
            return Err(TrieError::config("duplicate property name").in_property(entry.name()));
        }

        self.index.insert(entry.name().to_string(), self.entries.len());
        self.entries.push(entry);

        Ok(())
    }

    pub fn entry(&self, name: &str) -> Result<&CatalogEntry>
    {
        match self.index.get(name) {
            Some(&index) => Ok(&self.entries[index]),
            None => Err(TrieError::UnknownProperty(name.to_string())),
        }
    }

    /// значение свойства name для кодпоинта
    pub fn get_property(&self, name: &str, code: u32) -> Result<PropertyValue>
    {
        Ok(self.entry(name)?.get(code))
    }

    pub fn query(&self, name: &str) -> Result<PropertyQuery<'_>>
    {
        Ok(PropertyQuery {
            entry: self.entry(name)?,
        })
    }

    /// по одному опросу на свойство, в порядке добавления
    pub fn dispatch_table(&self) -> Vec<PropertyQuery<'_>>
    {
        self.entries
            .iter()
            .map(|entry| PropertyQuery { entry })
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str>
    {
        self.entries.iter().map(|e| e.name())
    }

    pub fn entries(&self) -> &[CatalogEntry]
    {
        &self.entries
    }

    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }

    /// суммарный размер таблиц
    pub fn size(&self) -> usize
    {
        self.entries.iter().map(|e| e.size()).sum()
    }
}
