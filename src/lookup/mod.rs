use crate::common::low_mask;
use crate::tables::TrieTables;

/// значение свойства для ключа.
///
/// на каждом уровне от остатка ключа отрезаются старшие bits_at(level) бит; вместе со смещением
/// текущей страницы они адресуют ячейку. ячейка промежуточного уровня - ссылка на страницу следующего,
/// ячейка листового - значение. ключи за пределами таблиц получают значение по умолчанию
#[inline]
pub fn lookup(tables: &TrieTables, code: u32) -> u32
{
    let descriptor = tables.descriptor();
    let total_bits = descriptor.total_bits();

    if (code as u64) >> total_bits != 0 {
        return tables.default_value();
    }

    let mut residual = code;
    let mut remaining = total_bits;
    let mut offset = 0;

    for (level, stage) in tables.stages().iter().enumerate() {
        remaining -= stage.bits();

        let field = (residual >> remaining) as usize;
        residual &= low_mask(remaining);

        let page = stage.page_at(offset + field);
        offset = page.offset(descriptor.bits_at(level + 1));
    }

    tables.leaf().value_at(offset + residual as usize)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::descriptor::{TrieDescriptor, ValueWidth};
    use crate::encode::{build, RangeMapping};

    #[test]
    fn walks_every_level()
    {
        let descriptor = TrieDescriptor::with_domain(6, &[2, 2, 2], ValueWidth::Bits8, false).unwrap();
        let mapping = RangeMapping::from_tuples(&[(5, 5, 1), (17, 40, 2), (63, 63, 3)], 0).unwrap();
        let tables = build(&descriptor, &mapping).unwrap().tables;

        for code in 0 .. 64 {
            assert_eq!(lookup(&tables, code), mapping.value_of(code), "{}", code);
        }
    }

    #[test]
    fn large_inputs_get_default()
    {
        let descriptor = TrieDescriptor::new(&[9, 6, 6], ValueWidth::Bits8, false).unwrap();
        let mapping = RangeMapping::from_tuples(&[(0x10FFFF, 0x10FFFF, 7)], 2).unwrap();
        let tables = build(&descriptor, &mapping).unwrap().tables;

        assert_eq!(lookup(&tables, 0x10FFFF), 7);
        // за пределами назначенного диапазона, но внутри домена - дополнение значениями по умолчанию
        assert_eq!(lookup(&tables, 0x110000), 2);
        assert_eq!(lookup(&tables, 0x1FFFFF), 2);
        // за пределами домена
        assert_eq!(lookup(&tables, 0x200000), 2);
        assert_eq!(lookup(&tables, u32::MAX), 2);
    }
}
