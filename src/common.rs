/// количество бит кодпоинта в стандартном домене
pub const DOMAIN_BITS: u8 = 21;

/// последний кодпоинт Unicode
pub const LAST_CODEPOINT: u32 = 0x10FFFF;

/// максимальная суммарная ширина уровней: плотный массив листьев материализуется при построении
pub const MAX_TOTAL_BITS: u8 = 24;

/// количество ячеек в блоке уровня, потребляющего bits бит
#[inline(always)]
pub fn fan_out(bits: u8) -> usize
{
    1 << bits
}

/// маска младших bits бит
#[inline(always)]
pub fn low_mask(bits: u8) -> u32
{
    match bits {
        32 => u32::MAX,
        _ => (1 << bits) - 1,
    }
}

/// размер домена (кол-во ключей) для заданной ширины
#[inline(always)]
pub fn domain_size(bits: u8) -> u64
{
    1u64 << bits
}

/// кодпоинт в привычной записи
pub fn format_codepoint(code: u32) -> String
{
    format!("U+{:04X}", code)
}

/// минимальная ширина (в байтах) беззнакового числа, вмещающего value
pub fn cell_width_for(value: u32) -> usize
{
    match value {
        0 ..= 0xFF => 1,
        0x100 ..= 0xFFFF => 2,
        _ => 4,
    }
}
