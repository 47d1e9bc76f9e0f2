use crate::common::{domain_size, format_codepoint};
use crate::descriptor::ValueWidth;
use crate::error::{Result, TrieError};

/// диапазон кодпоинтов [first, last] с одним значением
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRange
{
    pub first: u32,
    pub last: u32,
    pub value: u32,
}

impl ValueRange
{
    pub fn new(first: u32, last: u32, value: u32) -> Self
    {
        Self { first, last, value }
    }

    pub fn contains(&self, code: u32) -> bool
    {
        (self.first ..= self.last).contains(&code)
    }
}

impl From<(u32, u32, u32)> for ValueRange
{
    fn from((first, last, value): (u32, u32, u32)) -> Self
    {
        Self::new(first, last, value)
    }
}

impl core::fmt::Display for ValueRange
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        write!(
            f,
            "{}..{} = {:#X}",
            format_codepoint(self.first),
            format_codepoint(self.last),
            self.value
        )
    }
}

/// исходные данные свойства: строго возрастающие непересекающиеся диапазоны;
/// пропуски между ними получают значение по умолчанию
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeMapping
{
    ranges: Vec<ValueRange>,
    default: u32,
}

impl RangeMapping
{
    pub fn new(ranges: Vec<ValueRange>, default: u32) -> Result<Self>
    {
        if let Some(range) = ranges.iter().find(|r| r.first > r.last) {
            return Err(TrieError::range_order(format!("inverted range {}", range)));
        }

        if let Some(pair) = ranges.windows(2).find(|w| w[1].first <= w[0].last) {
            return Err(TrieError::range_order(format!(
                "range {} does not follow {}",
                pair[1], pair[0]
            )));
        }

        Ok(Self { ranges, default })
    }

    pub fn from_tuples(ranges: &[(u32, u32, u32)], default: u32) -> Result<Self>
    {
        Self::new(ranges.iter().map(|&r| r.into()).collect(), default)
    }

    pub fn ranges(&self) -> &[ValueRange]
    {
        &self.ranges
    }

    pub fn default_value(&self) -> u32
    {
        self.default
    }

    /// значение для кодпоинта по исходным диапазонам
    pub fn value_of(&self, code: u32) -> u32
    {
        match self.ranges.binary_search_by(|r| match r {
            r if r.last < code => core::cmp::Ordering::Less,
            r if r.first > code => core::cmp::Ordering::Greater,
            _ => core::cmp::Ordering::Equal,
        }) {
            Ok(index) => self.ranges[index].value,
            Err(_) => self.default,
        }
    }

    /// все диапазоны лежат в домене [0, 2^domain_bits)
    pub fn check_domain(&self, domain_bits: u8) -> Result<()>
    {
        let size = domain_size(domain_bits);

        match self.ranges.last() {
            Some(range) if range.last as u64 >= size => Err(TrieError::config(format!(
                "range {} lies outside the {}-bit domain",
                range, domain_bits
            ))),
            _ => Ok(()),
        }
    }

    /// все значения (и значение по умолчанию) помещаются в ширину
    pub fn check_width(&self, width: ValueWidth) -> Result<()>
    {
        let overflow = self
            .ranges
            .iter()
            .map(|r| r.value)
            .chain(core::iter::once(self.default))
            .find(|&v| !width.fits(v));

        match overflow {
            Some(value) => Err(TrieError::ValueOverflow {
                value,
                bits: width.bits(),
            }),
            None => Ok(()),
        }
    }

    /// плотный массив значений для ключей [0, 2^total_bits)
    pub fn expand(&self, total_bits: u8) -> Vec<u32>
    {
        let size = domain_size(total_bits) as usize;
        let mut values = vec![self.default; size];

        for range in self.ranges.iter() {
            let first = range.first as usize;
            let last = (range.last as usize).min(size - 1);

            if first < size {
                values[first ..= last].fill(range.value);
            }
        }

        values
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn rejects_unordered_ranges()
    {
        let overlapping = RangeMapping::from_tuples(&[(0, 10, 1), (10, 20, 2)], 0);
        assert!(matches!(overlapping, Err(TrieError::RangeOrder(_))));

        let decreasing = RangeMapping::from_tuples(&[(30, 40, 1), (0, 10, 2)], 0);
        assert!(matches!(decreasing, Err(TrieError::RangeOrder(_))));

        let inverted = RangeMapping::from_tuples(&[(5, 4, 1)], 0);
        assert!(matches!(inverted, Err(TrieError::RangeOrder(_))));

        // смежные диапазоны - допустимы
        assert!(RangeMapping::from_tuples(&[(0, 9, 1), (10, 20, 2)], 0).is_ok());
    }

    #[test]
    fn values_and_expansion()
    {
        let mapping = RangeMapping::from_tuples(&[(2, 3, 7), (8, 8, 9)], 1).unwrap();

        assert_eq!(mapping.value_of(0), 1);
        assert_eq!(mapping.value_of(3), 7);
        assert_eq!(mapping.value_of(4), 1);
        assert_eq!(mapping.value_of(8), 9);
        assert_eq!(mapping.value_of(0x10FFFF), 1);

        assert_eq!(mapping.expand(4), vec![1, 1, 7, 7, 1, 1, 1, 1, 9, 1, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn domain_and_width_checks()
    {
        let mapping = RangeMapping::from_tuples(&[(0, 16, 1)], 0).unwrap();
        assert!(matches!(mapping.check_domain(4), Err(TrieError::Config(_))));
        assert!(mapping.check_domain(5).is_ok());

        let mapping = RangeMapping::from_tuples(&[(0, 1, 2)], 0).unwrap();
        assert!(matches!(
            mapping.check_width(ValueWidth::Bits1),
            Err(TrieError::ValueOverflow { value: 2, bits: 1 })
        ));
        assert!(mapping.check_width(ValueWidth::Bits2).is_ok());
    }
}
