//! небольшой встроенный каталог-образец: по одному свойству каждой формы.
//! данные иллюстративные, это не полные свойства Unicode

use crate::descriptor::ValueWidth;
use crate::error::{Result, TrieError};
use crate::side_table::Expansion;

use super::{Catalog, PropertySpec, PropertyValue};

pub const WHITE_SPACE: &str = "white_space";
pub const HEX_DIGIT: &str = "hex_digit";
pub const ASCII_CLASS: &str = "ascii_class";
pub const SIMPLE_LOWERCASE: &str = "simple_lowercase_delta";
pub const FULL_CASE_FOLDING: &str = "full_case_folding";
pub const CASE_VARIANTS: &str = "case_variants";

lazy_static! {
    /// встроенный каталог: строится при первом обращении, дальше только читается.
    /// каталог собирается целиком или не собирается вовсе
    static ref BUILTIN: Result<Catalog> =
        builtin_specs().and_then(|specs| Catalog::build(specs).into_result());
}

/// встроенный каталог или ошибка его построения
pub fn catalog() -> Result<&'static Catalog>
{
    match &*BUILTIN {
        Ok(catalog) => Ok(catalog),
        Err(e) => Err(TrieError::config(format!("builtin catalog is unavailable: {}", e))),
    }
}

/// класс ASCII-символа
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsciiClass
{
    /// не ASCII
    Other = 0,
    Control = 1,
    Space = 2,
    Digit = 3,
    Upper = 4,
    Lower = 5,
    Punctuation = 6,
}

impl AsciiClass
{
    pub fn from_ordinal(ordinal: u32) -> Self
    {
        match ordinal {
            1 => AsciiClass::Control,
            2 => AsciiClass::Space,
            3 => AsciiClass::Digit,
            4 => AsciiClass::Upper,
            5 => AsciiClass::Lower,
            6 => AsciiClass::Punctuation,
            _ => AsciiClass::Other,
        }
    }
}

/// исходные данные встроенных свойств
pub fn builtin_specs() -> Result<Vec<PropertySpec>>
{
    Ok(vec![
        white_space_spec()?,
        hex_digit_spec()?,
        ascii_class_spec()?,
        simple_lowercase_spec()?,
        full_case_folding_spec()?,
        case_variants_spec()?,
    ])
}

fn white_space_spec() -> Result<PropertySpec>
{
    #[rustfmt::skip]
    let ranges = [
        (0x0009, 0x000D), (0x0020, 0x0020), (0x0085, 0x0085), (0x00A0, 0x00A0),
        (0x1680, 0x1680), (0x2000, 0x200A), (0x2028, 0x2029), (0x202F, 0x202F),
        (0x205F, 0x205F), (0x3000, 0x3000),
    ];

    Ok(PropertySpec::flags(WHITE_SPACE, &ranges)?.split(&[8, 7, 6]))
}

fn hex_digit_spec() -> Result<PropertySpec>
{
    #[rustfmt::skip]
    let ranges = [
        (0x0030, 0x0039), (0x0041, 0x0046), (0x0061, 0x0066),
        (0xFF10, 0xFF19), (0xFF21, 0xFF26), (0xFF41, 0xFF46),
    ];

    Ok(PropertySpec::flags(HEX_DIGIT, &ranges)?.split(&[8, 7, 6]))
}

fn ascii_class_spec() -> Result<PropertySpec>
{
    use AsciiClass::*;

    #[rustfmt::skip]
    let ranges: [(u32, u32, AsciiClass); 10] = [
        (0x00, 0x1F, Control),
        (0x20, 0x20, Space),
        (0x21, 0x2F, Punctuation),
        (0x30, 0x39, Digit),
        (0x3A, 0x40, Punctuation),
        (0x41, 0x5A, Upper),
        (0x5B, 0x60, Punctuation),
        (0x61, 0x7A, Lower),
        (0x7B, 0x7E, Punctuation),
        (0x7F, 0x7F, Control),
    ];

    let ranges: Vec<_> = ranges
        .iter()
        .map(|&(first, last, class)| (first, last, class as u32).into())
        .collect();

    let mapping = crate::encode::RangeMapping::new(ranges, Other as u32)?;

    Ok(PropertySpec::new(
        ASCII_CLASS,
        super::PropertyKind::Enumeration,
        ValueWidth::Bits4,
        mapping,
    )
    .packed(true)
    .split(&[11, 5, 5]))
}

fn simple_lowercase_spec() -> Result<PropertySpec>
{
    #[rustfmt::skip]
    let ranges = [
        (0x0041, 0x005A, 32),       // A-Z
        (0x00C0, 0x00D6, 32),       // À-Ö
        (0x00D8, 0x00DE, 32),       // Ø-Þ
        (0x0391, 0x03A1, 32),       // Α-Ρ
        (0x03A3, 0x03AB, 32),       // Σ-Ϋ
        (0x0400, 0x040F, 80),       // Ѐ-Џ
        (0x0410, 0x042F, 32),       // А-Я
        (0x2126, 0x2126, -7517),    // OHM SIGN -> ω
        (0x212A, 0x212A, -8383),    // KELVIN SIGN -> k
        (0x212B, 0x212B, -8262),    // ANGSTROM SIGN -> å
        (0xFF21, 0xFF3A, 32),       // полноширинные A-Z
    ];

    Ok(PropertySpec::deltas(SIMPLE_LOWERCASE, ValueWidth::Bits16, &ranges)?.split(&[9, 6, 6]))
}

fn full_case_folding_spec() -> Result<PropertySpec>
{
    let mut entries: Vec<(u32, Vec<u32>)> = (0x41 ..= 0x5A).map(|c| (c, vec![c + 0x20])).collect();

    #[rustfmt::skip]
    let special = [
        (0x00DF, vec![0x0073, 0x0073]),
        (0x0149, vec![0x02BC, 0x006E]),
        (0x01F0, vec![0x006A, 0x030C]),
        (0x0390, vec![0x03B9, 0x0308, 0x0301]),
        (0x03B0, vec![0x03C5, 0x0308, 0x0301]),
        (0x0587, vec![0x0565, 0x0582]),
        (0x1E96, vec![0x0068, 0x0331]),
        (0x1E9E, vec![0x0073, 0x0073]),
        (0xFB00, vec![0x0066, 0x0066]),
        (0xFB03, vec![0x0066, 0x0066, 0x0069]),
        (0xFB04, vec![0x0066, 0x0066, 0x006C]),
        (0xFB05, vec![0x0073, 0x0074]),
        (0xFB06, vec![0x0073, 0x0074]),
    ];

    entries.extend(special);

    Ok(PropertySpec::codepoint_lists(FULL_CASE_FOLDING, 3, entries)?.split(&[9, 6, 6]))
}

fn case_variants_spec() -> Result<PropertySpec>
{
    let k = vec![0x004B, 0x006B, 0x212A];
    let s = vec![0x0053, 0x0073, 0x017F];
    let micro = vec![0x00B5, 0x039C, 0x03BC];
    let a_ring = vec![0x00C5, 0x00E5, 0x212B];
    let omega = vec![0x03A9, 0x03C9, 0x2126];

    let entries = vec![
        (0x004B, k.clone()),
        (0x0053, s.clone()),
        (0x006B, k.clone()),
        (0x0073, s.clone()),
        (0x00B5, micro.clone()),
        (0x00C5, a_ring.clone()),
        (0x00E5, a_ring.clone()),
        (0x017F, s),
        (0x039C, micro.clone()),
        (0x03A9, omega.clone()),
        (0x03BC, micro),
        (0x03C9, omega.clone()),
        (0x2126, omega),
        (0x212A, k),
        (0x212B, a_ring),
    ];

    Ok(PropertySpec::codepoint_lists(CASE_VARIANTS, 3, entries)?.split(&[9, 6, 6]))
}

pub fn white_space(code: u32) -> Result<bool>
{
    flag(catalog()?, WHITE_SPACE, code)
}

pub fn hex_digit(code: u32) -> Result<bool>
{
    flag(catalog()?, HEX_DIGIT, code)
}

pub fn ascii_class(code: u32) -> Result<AsciiClass>
{
    match catalog()?.get_property(ASCII_CLASS, code)? {
        PropertyValue::Enumeration(ordinal) => Ok(AsciiClass::from_ordinal(ordinal)),
        other => Err(unexpected(ASCII_CLASS, &other)),
    }
}

/// смещение до строчной буквы (0 - без изменений)
pub fn simple_lowercase_delta(code: u32) -> Result<i32>
{
    match catalog()?.get_property(SIMPLE_LOWERCASE, code)? {
        PropertyValue::SignedDelta(delta) => Ok(delta),
        other => Err(unexpected(SIMPLE_LOWERCASE, &other)),
    }
}

/// полная свёртка регистра: кодпоинт или его расширение
pub fn full_case_folding(code: u32) -> Result<Expansion>
{
    codepoints(catalog()?, FULL_CASE_FOLDING, code)
}

/// все варианты регистра кодпоинта (включая его самого)
pub fn case_variants(code: u32) -> Result<Expansion>
{
    codepoints(catalog()?, CASE_VARIANTS, code)
}

fn flag(catalog: &Catalog, name: &str, code: u32) -> Result<bool>
{
    match catalog.get_property(name, code)? {
        PropertyValue::Boolean(value) => Ok(value),
        other => Err(unexpected(name, &other)),
    }
}

fn codepoints(catalog: &Catalog, name: &str, code: u32) -> Result<Expansion>
{
    match catalog.get_property(name, code)? {
        PropertyValue::Codepoints(expansion) => Ok(expansion),
        other => Err(unexpected(name, &other)),
    }
}

/// значение свойства другой формы - каталог собран не из тех данных
fn unexpected(name: &str, value: &PropertyValue) -> TrieError
{
    TrieError::config(format!("unexpected value {:?}", value)).in_property(name)
}
