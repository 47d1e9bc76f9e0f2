use proptest::prelude::*;

use trie_bakery::catalog::PropertySpec;
use trie_bakery::encode::search_split;
use trie_bakery::{build, RangeMapping, SplitSearch, TrieDescriptor, ValueRange, ValueWidth};

const DOMAIN_BITS: u8 = 12;
const DOMAIN: u32 = 1 << DOMAIN_BITS;

/// (пропуск перед диапазоном, длина - 1, значение) -> строго возрастающие диапазоны внутри домена
fn to_ranges(raw: &[(u32, u32, u32)]) -> Vec<ValueRange>
{
    let mut next = 0;
    let mut ranges = vec![];

    for &(gap, len, value) in raw {
        let first = next + gap;
        let last = first + len;

        if last >= DOMAIN {
            break;
        }

        ranges.push(ValueRange::new(first, last, value));
        next = last + 1;
    }

    ranges
}

fn raw_ranges() -> impl Strategy<Value = Vec<(u32, u32, u32)>>
{
    prop::collection::vec((0u32 .. 64, 0u32 .. 200, 0u32 .. 16), 0 .. 40)
}

fn splits() -> impl Strategy<Value = Vec<u8>>
{
    prop::sample::select(vec![
        vec![12u8],
        vec![6, 6],
        vec![4, 4, 4],
        vec![2, 3, 3, 4],
        vec![5, 4, 3],
        vec![3, 6, 3],
    ])
}

proptest! {
    #[test]
    fn lookup_matches_ranges(
        raw in raw_ranges(),
        default in 0u32 .. 16,
        split in splits(),
        packed in any::<bool>(),
    ) {
        let ranges = to_ranges(&raw);
        let mapping = RangeMapping::new(ranges.clone(), default).unwrap();
        let descriptor = TrieDescriptor::with_domain(DOMAIN_BITS, &split, ValueWidth::Bits4, packed).unwrap();
        let tables = build(&descriptor, &mapping).unwrap().tables;

        for range in ranges.iter() {
            prop_assert_eq!(tables.get(range.first), range.value);
            prop_assert_eq!(tables.get(range.last), range.value);
            prop_assert_eq!(tables.get(range.first + (range.last - range.first) / 2), range.value);

            // соседи снаружи диапазона
            if range.first > 0 {
                prop_assert_eq!(tables.get(range.first - 1), mapping.value_of(range.first - 1));
            }
            prop_assert_eq!(tables.get(range.last + 1), mapping.value_of(range.last + 1));
        }

        prop_assert_eq!(tables.get(DOMAIN), default);
        prop_assert_eq!(tables.get(u32::MAX), default);
        prop_assert!(tables.validate().is_ok());
    }

    #[test]
    fn rebuild_from_recovered_ranges(
        raw in raw_ranges(),
        first in splits(),
        second in splits(),
    ) {
        let mapping = RangeMapping::new(to_ranges(&raw), 0).unwrap();

        let descriptor = TrieDescriptor::with_domain(DOMAIN_BITS, &first, ValueWidth::Bits8, false).unwrap();
        let tables = build(&descriptor, &mapping).unwrap().tables;

        let recovered = RangeMapping::new(tables.ranges(), 0).unwrap();
        let descriptor = TrieDescriptor::with_domain(DOMAIN_BITS, &second, ValueWidth::Bits8, false).unwrap();
        let rebuilt = build(&descriptor, &recovered).unwrap().tables;

        for code in 0 .. DOMAIN {
            prop_assert_eq!(rebuilt.get(code), mapping.value_of(code));
        }
    }

    #[test]
    fn search_never_exceeds_dense(raw in raw_ranges(), packed in any::<bool>()) {
        let mapping = RangeMapping::new(to_ranges(&raw), 0).unwrap();
        let bounds = SplitSearch { max_levels: 3, min_bits: 2, max_bits: 8 };

        let report = search_split(&mapping, ValueWidth::Bits4, packed, DOMAIN_BITS, &bounds).unwrap();
        let descriptor = TrieDescriptor::with_domain(DOMAIN_BITS, &report.levels, ValueWidth::Bits4, packed).unwrap();
        let tables = build(&descriptor, &mapping).unwrap().tables;

        prop_assert_eq!(tables.size(), report.size);
        prop_assert!(tables.size() <= tables.dense_size());

        for code in (0 .. DOMAIN).step_by(7) {
            prop_assert_eq!(tables.get(code), mapping.value_of(code));
        }
    }

    #[test]
    fn side_table_indices_always_valid(
        payloads in prop::collection::vec(prop::collection::vec(0u32 .. 0x110000, 1 ..= 3), 0 .. 50),
    ) {
        let entries: Vec<(u32, Vec<u32>)> = payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| (i as u32 * 5 + 1, payload))
            .collect();

        let entry = PropertySpec::codepoint_lists("lists", 3, entries.clone())
            .unwrap()
            .domain(DOMAIN_BITS)
            .split(&[4, 4, 4])
            .build()
            .unwrap();

        let rows = entry.side_table().unwrap().row_count() as u32;
        prop_assert!(entry.tables().max_value() < rows);

        for (code, payload) in entries.iter() {
            let value = entry.get(*code);
            prop_assert_eq!(value.as_codepoints(), Some(payload.as_slice()));

            // соседний кодпоинт без записи остаётся собой
            let next = [code + 1];
            let value = entry.get(next[0]);
            prop_assert_eq!(value.as_codepoints(), Some(&next[..]));
        }
    }
}
