use crate::common::{cell_width_for, domain_size, fan_out};
use crate::descriptor::{TrieDescriptor, ValueWidth};
use crate::encode::ValueRange;
use crate::error::{Result, TrieError};
use crate::lookup;

pub use packed::{pack_values, packed_get, PackedByte};
pub use page::PageRef;

pub mod packed;
pub mod page;

/// промежуточный уровень трая: блоки ссылок на блоки следующего уровня
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageLevel
{
    bits: u8,
    pages: Vec<PageRef>,
}

impl StageLevel
{
    pub fn new(bits: u8, pages: Vec<PageRef>) -> Self
    {
        Self { bits, pages }
    }

    /// бит ключа, потребляемых уровнем (размер блока - 2^bits)
    pub fn bits(&self) -> u8
    {
        self.bits
    }

    pub fn pages(&self) -> &[PageRef]
    {
        &self.pages
    }

    pub fn block_count(&self) -> usize
    {
        self.pages.len() >> self.bits
    }

    #[inline(always)]
    pub fn page_at(&self, index: usize) -> PageRef
    {
        self.pages[index]
    }

    /// ширина ячейки при хранении: минимальная, вмещающая наибольшую ссылку
    pub fn cell_width(&self) -> usize
    {
        let max_page = self.pages.iter().max().copied().unwrap_or_default();
        cell_width_for(max_page.block())
    }

    pub fn size(&self) -> usize
    {
        self.pages.len() * self.cell_width()
    }
}

/// ячейки листового уровня
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafCells
{
    /// одно значение в ячейке
    Plain(Vec<u32>),
    /// несколько узких значений в байте
    Packed(Vec<u8>),
}

/// листовой уровень: блоки значений
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTable
{
    bits: u8,
    value_width: ValueWidth,
    cells: LeafCells,
}

impl BlockTable
{
    pub fn new(bits: u8, value_width: ValueWidth, cells: LeafCells) -> Self
    {
        Self {
            bits,
            value_width,
            cells,
        }
    }

    pub fn bits(&self) -> u8
    {
        self.bits
    }

    pub fn cells(&self) -> &LeafCells
    {
        &self.cells
    }

    pub fn is_packed(&self) -> bool
    {
        matches!(self.cells, LeafCells::Packed(_))
    }

    /// количество хранимых значений (с учётом упаковки)
    pub fn value_count(&self) -> usize
    {
        match &self.cells {
            LeafCells::Plain(values) => values.len(),
            LeafCells::Packed(bytes) => bytes.len() * PackedByte::capacity(self.value_width.bits()),
        }
    }

    pub fn block_count(&self) -> usize
    {
        self.value_count() >> self.bits
    }

    #[inline(always)]
    pub fn value_at(&self, index: usize) -> u32
    {
        match &self.cells {
            LeafCells::Plain(values) => values[index],
            LeafCells::Packed(bytes) => packed_get(bytes, index, self.value_width.bits()),
        }
    }

    /// все значения по порядку
    pub fn values(&self) -> Vec<u32>
    {
        (0 .. self.value_count()).map(|i| self.value_at(i)).collect()
    }

    /// размер в байтах
    pub fn size(&self) -> usize
    {
        match &self.cells {
            LeafCells::Plain(values) => values.len() * self.value_width.cell_bytes(),
            LeafCells::Packed(bytes) => bytes.len(),
        }
    }
}

/// запечённый трай одного свойства: описание, уровни ссылок, листья, значение по умолчанию
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieTables
{
    descriptor: TrieDescriptor,
    stages: Vec<StageLevel>,
    leaf: BlockTable,
    default: u32,
}

impl TrieTables
{
    /// собрать таблицы из уровней с проверкой структуры
    pub fn from_parts(
        descriptor: TrieDescriptor,
        stages: Vec<StageLevel>,
        leaf: BlockTable,
        default: u32,
    ) -> Result<Self>
    {
        let tables = Self {
            descriptor,
            stages,
            leaf,
            default,
        };

        tables.validate()?;

        Ok(tables)
    }

    pub fn descriptor(&self) -> &TrieDescriptor
    {
        &self.descriptor
    }

    pub fn stages(&self) -> &[StageLevel]
    {
        &self.stages
    }

    pub fn leaf(&self) -> &BlockTable
    {
        &self.leaf
    }

    /// значение для ключей за пределами таблиц
    pub fn default_value(&self) -> u32
    {
        self.default
    }

    /// значение свойства кодпоинта
    #[inline(always)]
    pub fn get(&self, code: u32) -> u32
    {
        lookup::lookup(self, code)
    }

    /// размер данных в байтах. тип ячеек уровней ссылок при запекании не задаётся,
    /// поэтому предполагается исходя из максимального значения
    pub fn size(&self) -> usize
    {
        self.stages.iter().map(|s| s.size()).sum::<usize>() + self.leaf.size()
    }

    /// размер плотного массива значений, покрывающего тот же ключ
    pub fn dense_size(&self) -> usize
    {
        let values = domain_size(self.descriptor.total_bits()) as usize;

        match self.descriptor.is_packed() {
            true => values / self.descriptor.values_per_cell(),
            false => values * self.descriptor.value_width().cell_bytes(),
        }
    }

    /// наибольшее значение, которое может вернуть поиск
    pub fn max_value(&self) -> u32
    {
        // все блоки листьев достижимы (см. validate), так что достаточно просмотреть их
        (0 .. self.leaf.value_count())
            .map(|i| self.leaf.value_at(i))
            .fold(self.default, u32::max)
    }

    /// восстановить диапазоны (first, last, value) по всему домену, соседние с равным значением - объединены
    pub fn ranges(&self) -> Vec<ValueRange>
    {
        let last = (domain_size(self.descriptor.domain_bits()) - 1) as u32;
        let mut ranges = vec![];

        self.walk(0, 0, 0, last, &mut ranges);

        ranges
    }

    fn walk(&self, level: usize, offset: usize, base: u32, last: u32, ranges: &mut Vec<ValueRange>)
    {
        let bits = self.descriptor.bits_at(level);
        let shift = self.descriptor.shift_at(level);

        for i in 0 .. fan_out(bits) {
            let first = base + ((i as u32) << shift);

            if first > last {
                return;
            }

            if level == self.descriptor.leaf_level() {
                let value = self.leaf.value_at(offset + i);

                match ranges.last_mut() {
                    Some(range) if range.value == value && range.last + 1 == first => {
                        range.last = first
                    }
                    _ => ranges.push(ValueRange::new(first, first, value)),
                }

                continue;
            }

            let page = self.stages[level].page_at(offset + i);
            let next_offset = page.offset(self.descriptor.bits_at(level + 1));

            self.walk(level + 1, next_offset, first, last, ranges);
        }
    }

    /// проверка структуры: длины уровней, ссылки в пределах следующего уровня, отсутствие
    /// блоков без ссылок, значения в пределах ширины
    pub fn validate(&self) -> Result<()>
    {
        let descriptor = &self.descriptor;
        let leaf_level = descriptor.leaf_level();
        let width = descriptor.value_width();

        if self.stages.len() != leaf_level {
            return Err(TrieError::format(format!(
                "{} reference levels for a {}-level trie",
                self.stages.len(),
                descriptor.level_count()
            )));
        }

        if !width.fits(self.default) {
            return Err(TrieError::ValueOverflow {
                value: self.default,
                bits: width.bits(),
            });
        }

        if self.leaf.bits != descriptor.leaf_bits()
            || self.leaf.value_width != width
            || self.leaf.is_packed() != descriptor.is_packed()
        {
            return Err(TrieError::format("leaf level does not match the descriptor"));
        }

        // количество ячеек каждого уровня кратно размеру его блока, верхний уровень - ровно один блок
        let mut block_counts = Vec::with_capacity(descriptor.level_count());

        for level in 0 ..= leaf_level {
            let bits = descriptor.bits_at(level);

            let (cells, block_bits) = match level == leaf_level {
                true => (self.leaf.value_count(), self.leaf.bits),
                false => (self.stages[level].pages.len(), self.stages[level].bits),
            };

            if block_bits != bits || cells % fan_out(bits) != 0 || cells == 0 {
                return Err(TrieError::format(format!(
                    "level {} holds {} cells, not whole blocks of {}",
                    level,
                    cells,
                    fan_out(bits)
                )));
            }

            if level == 0 && cells != fan_out(bits) {
                return Err(TrieError::format(format!(
                    "top level holds {} cells, expected {}",
                    cells,
                    fan_out(bits)
                )));
            }

            block_counts.push(cells >> bits);
        }

        for (level, stage) in self.stages.iter().enumerate() {
            let next_blocks = block_counts[level + 1];
            let mut referenced = vec![false; next_blocks];

            for page in stage.pages.iter() {
                match referenced.get_mut(page.block() as usize) {
                    Some(flag) => *flag = true,
                    None => {
                        return Err(TrieError::format(format!(
                            "level {} references block {} of {}",
                            level,
                            page.block(),
                            next_blocks
                        )))
                    }
                }
            }

            if let Some(block) = referenced.iter().position(|&r| !r) {
                return Err(TrieError::format(format!(
                    "block {} of level {} is never referenced",
                    block,
                    level + 1
                )));
            }
        }

        if let LeafCells::Plain(values) = &self.leaf.cells {
            if let Some(&value) = values.iter().find(|&&v| !width.fits(v)) {
                return Err(TrieError::ValueOverflow {
                    value,
                    bits: width.bits(),
                });
            }
        }

        Ok(())
    }
}

impl core::fmt::Display for TrieTables
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        writeln!(f, "{{")?;

        writeln!(
            f,
            "  levels: {:?}, value: {} bits{}",
            self.descriptor.levels(),
            self.descriptor.value_width().bits(),
            match self.descriptor.is_packed() {
                true => " (packed)",
                false => "",
            }
        )?;

        for (level, stage) in self.stages.iter().enumerate() {
            writeln!(
                f,
                "  level {}: {} blocks x {}, {} b",
                level,
                stage.block_count(),
                fan_out(stage.bits),
                stage.size()
            )?;
        }

        writeln!(
            f,
            "  leaf: {} blocks x {}, {} b",
            self.leaf.block_count(),
            fan_out(self.leaf.bits),
            self.leaf.size()
        )?;

        writeln!(f, "}}")?;

        Ok(())
    }
}
