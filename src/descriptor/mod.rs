use crate::common::{low_mask, DOMAIN_BITS, MAX_TOTAL_BITS};
use crate::config_checks;
use crate::error::{Result, TrieError};

/// ширина значения свойства
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueWidth
{
    Bits1,
    Bits2,
    Bits4,
    Bits8,
    Bits16,
    Bits32,
}

impl ValueWidth
{
    /// количество бит значения
    pub fn bits(self) -> u8
    {
        match self {
            ValueWidth::Bits1 => 1,
            ValueWidth::Bits2 => 2,
            ValueWidth::Bits4 => 4,
            ValueWidth::Bits8 => 8,
            ValueWidth::Bits16 => 16,
            ValueWidth::Bits32 => 32,
        }
    }

    pub fn from_bits(bits: u8) -> Result<Self>
    {
        Ok(match bits {
            1 => ValueWidth::Bits1,
            2 => ValueWidth::Bits2,
            4 => ValueWidth::Bits4,
            8 => ValueWidth::Bits8,
            16 => ValueWidth::Bits16,
            32 => ValueWidth::Bits32,
            _ => return Err(TrieError::config(format!("unsupported value width: {} bits", bits))),
        })
    }

    /// размер неупакованной ячейки листа в байтах
    pub fn cell_bytes(self) -> usize
    {
        match self {
            ValueWidth::Bits16 => 2,
            ValueWidth::Bits32 => 4,
            _ => 1,
        }
    }

    /// наибольшее значение, которое можно записать
    pub fn max_value(self) -> u32
    {
        low_mask(self.bits())
    }

    #[inline(always)]
    pub fn fits(self, value: u32) -> bool
    {
        value <= self.max_value()
    }

    /// можно ли упаковать несколько значений в байт
    pub fn is_packable(self) -> bool
    {
        self.bits() < 8
    }
}

/// описание трая одного свойства:
/// ширины уровней (от старшего к листовому), ширина значения, упаковка листьев
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrieDescriptor
{
    domain_bits: u8,
    levels: Vec<u8>,
    value_width: ValueWidth,
    packed: bool,
}

impl TrieDescriptor
{
    /// описание для стандартного 21-битного домена кодпоинтов
    pub fn new(levels: &[u8], value_width: ValueWidth, packed: bool) -> Result<Self>
    {
        Self::with_domain(DOMAIN_BITS, levels, value_width, packed)
    }

    /// описание для произвольного домена [0, 2^domain_bits)
    pub fn with_domain(
        domain_bits: u8,
        levels: &[u8],
        value_width: ValueWidth,
        packed: bool,
    ) -> Result<Self>
    {
        let total: u32 = levels.iter().map(|&b| b as u32).sum();

        #[rustfmt::skip]
        config_checks!(
            domain_bits == 0 || domain_bits > MAX_TOTAL_BITS    => "domain width {} is outside 1..={}", domain_bits, MAX_TOTAL_BITS;
            levels.is_empty()                                   => "no levels declared";
            levels.iter().any(|&b| b == 0)                      => "level widths must be non-zero: {:?}", levels;
            total < domain_bits as u32                          => "levels {:?} cover {} bits, domain needs {}", levels, total, domain_bits;
            total > MAX_TOTAL_BITS as u32                       => "levels {:?} cover {} bits, at most {} allowed", levels, total, MAX_TOTAL_BITS;
            packed && !value_width.is_packable()                => "{}-bit values cannot be packed into bytes", value_width.bits();
        );

        let descriptor = Self {
            domain_bits,
            levels: levels.to_vec(),
            value_width,
            packed,
        };

        // упакованный блок листьев должен занимать целое число байт
        config_checks!(
            packed && descriptor.leaf_block_len() < descriptor.values_per_cell()
                => "leaf level of {} bits is narrower than one packed byte ({} values)",
                   descriptor.leaf_bits(), descriptor.values_per_cell()
        );

        Ok(descriptor)
    }

    pub fn domain_bits(&self) -> u8
    {
        self.domain_bits
    }

    pub fn levels(&self) -> &[u8]
    {
        &self.levels
    }

    pub fn level_count(&self) -> usize
    {
        self.levels.len()
    }

    /// бит ключа, потребляемых уровнем
    #[inline(always)]
    pub fn bits_at(&self, level: usize) -> u8
    {
        self.levels[level]
    }

    /// суммарная ширина ключа
    pub fn total_bits(&self) -> u8
    {
        self.levels.iter().sum()
    }

    /// количество бит ключа, лежащих ниже уровня
    pub fn shift_at(&self, level: usize) -> u8
    {
        self.levels[level + 1 ..].iter().sum()
    }

    pub fn leaf_level(&self) -> usize
    {
        self.levels.len() - 1
    }

    pub fn leaf_bits(&self) -> u8
    {
        self.levels[self.leaf_level()]
    }

    /// количество значений в блоке листьев
    pub fn leaf_block_len(&self) -> usize
    {
        1 << self.leaf_bits()
    }

    pub fn value_width(&self) -> ValueWidth
    {
        self.value_width
    }

    pub fn is_packed(&self) -> bool
    {
        self.packed
    }

    /// значений в одной ячейке хранения листьев
    pub fn values_per_cell(&self) -> usize
    {
        match self.packed {
            true => (8 / self.value_width.bits()) as usize,
            false => 1,
        }
    }
}
