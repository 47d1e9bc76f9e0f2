use trie_bakery::catalog::builtin;
use trie_bakery::catalog::PropertySpec;
use trie_bakery::{
    build, Catalog, PropertyValue, RangeMapping, TrieDescriptor, TrieError, ValueRange, ValueWidth,
};

#[test]
fn two_level_small_domain()
{
    let descriptor = TrieDescriptor::with_domain(4, &[2, 2], ValueWidth::Bits8, false).unwrap();
    let mapping = RangeMapping::from_tuples(&[(0, 7, 0), (8, 15, 1)], 0).unwrap();
    let tables = build(&descriptor, &mapping).unwrap().tables;

    assert_eq!(tables.get(3), 0);
    assert_eq!(tables.get(8), 1);
    assert_eq!(tables.get(15), 1);
}

#[test]
fn whole_domain_single_value()
{
    let l = 'L' as u32;

    let descriptor = TrieDescriptor::new(&[9, 6, 6], ValueWidth::Bits8, false).unwrap();
    let mapping = RangeMapping::from_tuples(&[(0, 0x10FFFF, l)], l).unwrap();
    let baked = build(&descriptor, &mapping).unwrap();

    assert_eq!(baked.stats.levels.len(), 3);
    assert!(baked.stats.levels.iter().all(|level| level.physical_blocks == 1));

    for code in (0 ..= 0x1FFFFF).step_by(0x101) {
        assert_eq!(baked.tables.get(code), l);
    }
    assert_eq!(baked.tables.get(0x10FFFF), l);
    assert_eq!(baked.tables.get(0x110000), l);
    assert_eq!(baked.tables.get(0x1FFFFF), l);
    assert_eq!(baked.tables.get(u32::MAX), l);
}

#[test]
fn packed_flags_across_byte_boundaries()
{
    let ranges = (0 .. 0x10000)
        .filter(|c| c % 3 == 0)
        .map(|c| ValueRange::new(c, c, 1))
        .collect();

    let mapping = RangeMapping::new(ranges, 0).unwrap();
    let descriptor = TrieDescriptor::new(&[9, 6, 6], ValueWidth::Bits1, true).unwrap();
    let tables = build(&descriptor, &mapping).unwrap().tables;

    for code in 0 .. 0x10010 {
        assert_eq!(tables.get(code) == 1, code < 0x10000 && code % 3 == 0, "{:#X}", code);
    }

    assert_eq!(tables.get(6), 1);
    assert_eq!(tables.get(7), 0);
    assert_eq!(tables.get(8), 0);
    assert_eq!(tables.get(9), 1);
}

#[test]
fn full_case_folding_expansion()
{
    assert_eq!(builtin::full_case_folding(0xFB03).unwrap().as_slice(), &[0x66, 0x66, 0x69]);
    assert_eq!(builtin::full_case_folding(0x3B0).unwrap().as_slice(), &[0x3C5, 0x308, 0x301]);
    assert_eq!(builtin::full_case_folding(0x3B1).unwrap().as_slice(), &[0x3B1]);

    let catalog = builtin::catalog().unwrap();
    let value = catalog.get_property(builtin::FULL_CASE_FOLDING, 0x390).unwrap();
    assert_eq!(value.as_codepoints(), Some(&[0x3B9, 0x308, 0x301][..]));
}

#[test]
fn unknown_property()
{
    let catalog = builtin::catalog().unwrap();
    let result = catalog.get_property("Script_Extensions", 0x41);

    assert!(matches!(result, Err(TrieError::UnknownProperty(_))));
    assert!(catalog.query("Script_Extensions").is_err());
}

#[test]
fn concurrent_readers()
{
    let catalog = Catalog::build(vec![PropertySpec::flags("upper", &[(0x41, 0x5A)])
        .unwrap()
        .split(&[9, 6, 6])])
    .into_result()
    .unwrap();

    std::thread::scope(|scope| {
        for t in 0 .. 4u32 {
            let catalog = &catalog;

            scope.spawn(move || {
                for code in (t .. 0x200).step_by(4) {
                    let expected = (0x41 ..= 0x5A).contains(&code);

                    assert_eq!(
                        catalog.get_property("upper", code).unwrap(),
                        PropertyValue::Boolean(expected)
                    );
                    let hex = char::from_u32(code).map_or(false, |c| c.is_ascii_hexdigit());

                    assert_eq!(builtin::hex_digit(code).unwrap(), hex);
                }
            });
        }
    });
}
