use super::*;
use crate::catalog::PropertySpec;
use crate::encode::{build, RangeMapping};

fn halves() -> TrieTables
{
    let descriptor = TrieDescriptor::with_domain(4, &[2, 2], ValueWidth::Bits8, false).unwrap();
    let mapping = RangeMapping::from_tuples(&[(0, 7, 0), (8, 15, 1)], 0).unwrap();

    build(&descriptor, &mapping).unwrap().tables
}

fn tables_bytes(tables: &TrieTables) -> Vec<u8>
{
    let mut bytes = vec![];
    write_tables(&mut bytes, tables).unwrap();
    bytes
}

#[test]
fn tables_layout()
{
    let bytes = tables_bytes(&halves());

    assert_eq!(&bytes[.. 4], b"CPTR");
    assert_eq!(&bytes[4 .. 6], &FORMAT_VERSION.to_le_bytes());
    // домен, уровни, ширины, значение, упаковка
    assert_eq!(&bytes[6 .. 12], &[4, 2, 2, 2, 8, 0]);
    // верхний уровень: 4 ссылки по байту
    assert_eq!(&bytes[16 .. 25], &[4, 0, 0, 0, 1, 0, 0, 1, 1]);
    // листья: 2 блока по 4
    assert_eq!(&bytes[25 .. 29], &[8, 0, 0, 0]);
    assert_eq!(&bytes[29 ..], &[0, 0, 0, 0, 1, 1, 1, 1]);

    let read = read_tables(&mut io::Cursor::new(&bytes)).unwrap();
    assert_eq!(read, halves());
}

#[test]
fn rejects_broken_tables()
{
    let bytes = tables_bytes(&halves());

    let mut version = bytes.clone();
    version[4] = 2;
    assert!(matches!(read_tables(&mut io::Cursor::new(&version)), Err(TrieError::Format(_))));

    let mut magic = bytes.clone();
    magic[0] = b'X';
    assert!(matches!(read_tables(&mut io::Cursor::new(&magic)), Err(TrieError::Format(_))));

    // ссылка за пределы листьев
    let mut dangling = bytes.clone();
    dangling[24] = 5;
    assert!(matches!(read_tables(&mut io::Cursor::new(&dangling)), Err(TrieError::Format(_))));

    // блок единиц больше никто не использует
    let mut orphan = bytes.clone();
    orphan[23] = 0;
    orphan[24] = 0;
    assert!(matches!(read_tables(&mut io::Cursor::new(&orphan)), Err(TrieError::Format(_))));

    // уровни не покрывают домен
    let mut levels = bytes.clone();
    levels[9] = 1;
    assert!(matches!(read_tables(&mut io::Cursor::new(&levels)), Err(TrieError::Format(_))));

    for len in [3, 10, 20, 30] {
        assert!(matches!(
            read_tables(&mut io::Cursor::new(&bytes[.. len])),
            Err(TrieError::Format(_))
        ));
    }
}

#[test]
fn catalog_round_trip()
{
    let specs = vec![
        PropertySpec::flags("space", &[(0x09, 0x0D), (0x20, 0x20), (0x85, 0x85), (0xA0, 0xA0)])
            .unwrap()
            .domain(16)
            .split(&[6, 5, 5]),
        PropertySpec::deltas("lower", ValueWidth::Bits16, &[(0x41, 0x5A, 32), (0x212A, 0x212A, -8383)])
            .unwrap()
            .domain(16)
            .split(&[8, 4, 4]),
        PropertySpec::codepoint_lists("fold", 3, vec![(0xDF, vec![0x73, 0x73]), (0xFB03, vec![0x66, 0x66, 0x69])])
            .unwrap()
            .domain(16)
            .split(&[8, 8]),
    ];

    let catalog = Catalog::build(specs).into_result().unwrap();
    let bytes = to_bytes(&catalog).unwrap();
    let read = from_bytes(&bytes).unwrap();

    assert_eq!(read.len(), catalog.len());

    for (left, right) in catalog.entries().iter().zip(read.entries()) {
        assert_eq!(left.name(), right.name());
        assert_eq!(left.kind(), right.kind());
        assert_eq!(left.tables(), right.tables());
        assert_eq!(left.side_table(), right.side_table());
    }

    for code in [0x09, 0x20, 0x41, 0xDF, 0x212A, 0xFB03, 0xFFFF, 0x10000] {
        for name in ["space", "lower", "fold"] {
            assert_eq!(
                catalog.get_property(name, code).unwrap(),
                read.get_property(name, code).unwrap()
            );
        }
    }

    let mut trailing = bytes.clone();
    trailing.push(0);
    assert!(matches!(from_bytes(&trailing), Err(TrieError::Format(_))));

    assert!(matches!(from_bytes(&bytes[.. bytes.len() - 1]), Err(TrieError::Format(_))));
}

#[test]
fn side_table_section()
{
    let mut bytes = vec![];
    write_side_table(&mut bytes, None).unwrap();
    assert_eq!(bytes, vec![0]);
    assert_eq!(read_side_table(&mut io::Cursor::new(&bytes)).unwrap(), None);

    let table = SideTable::from_rows(2, vec![0, 0, 0, 2, 0x73, 0x73]).unwrap();
    let mut bytes = vec![];
    write_side_table(&mut bytes, Some(&table)).unwrap();
    assert_eq!(read_side_table(&mut io::Cursor::new(&bytes)).unwrap(), Some(table));

    // запись с длиной больше допустимой
    let broken = [1u8, 2, 6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 9, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0];
    assert!(matches!(
        read_side_table(&mut io::Cursor::new(&broken[..])),
        Err(TrieError::Format(_))
    ));
}
