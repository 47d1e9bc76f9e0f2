use log::{debug, info};

use crate::descriptor::{TrieDescriptor, ValueWidth};
use crate::error::Result;
use crate::stats::BuildStats;
use crate::tables::{pack_values, BlockTable, LeafCells, PageRef, StageLevel, TrieTables};

pub use dedup::{deduplicate, BlockDeduplicator};
pub use ranges::{RangeMapping, ValueRange};
pub use split::{search_split, SplitReport, SplitSearch};

pub mod dedup;
pub mod ranges;
pub mod split;


/// запечённый трай и статистика его построения
#[derive(Debug, Clone)]
pub struct BakedTrie
{
    pub tables: TrieTables,
    pub stats: BuildStats,
}

/// построить таблицы трая: плотный массив листьев -> блоки без повторов -> уровни ссылок снизу вверх
pub fn build(descriptor: &TrieDescriptor, mapping: &RangeMapping) -> Result<BakedTrie>
{
    mapping.check_domain(descriptor.domain_bits())?;
    mapping.check_width(descriptor.value_width())?;

    let leaf_level = descriptor.leaf_level();
    let mut stats = BuildStats::new();

    let dense = mapping.expand(descriptor.total_bits());
    let (leaf, mut refs) = build_leaf(descriptor, &dense);

    stats
        .touch(leaf_level)
        .blocks(descriptor.leaf_bits(), refs.len(), leaf.block_count());

    // уровни ссылок снизу вверх. верхний уровень - единственный блок, индексируемый старшими битами
    let mut stages = vec![];

    for level in (1 .. leaf_level).rev() {
        let bits = descriptor.bits_at(level);
        let (cells, up) = deduplicate(&refs, bits);

        stats
            .touch(level)
            .blocks(bits, refs.len() >> bits, cells.len() >> bits);

        stages.push(StageLevel::new(bits, cells));
        refs = up;
    }

    if leaf_level > 0 {
        stats.touch(0).blocks(descriptor.bits_at(0), 1, 1);
        stages.push(StageLevel::new(descriptor.bits_at(0), refs));
    }

    stages.reverse();

    for (level, stage) in stages.iter().enumerate() {
        stats.touch(level).size(stage.cell_width(), stage.size());
    }

    let leaf_cell_width = match descriptor.is_packed() {
        true => 1,
        false => descriptor.value_width().cell_bytes(),
    };

    stats.touch(leaf_level).size(leaf_cell_width, leaf.size());

    for level in stats.levels.iter() {
        debug!(
            "level {} ({} bits): {} -> {} blocks, {} b",
            level.level, level.bits, level.logical_blocks, level.physical_blocks, level.bytes
        );
    }

    let tables = TrieTables::from_parts(
        descriptor.clone(),
        stages,
        leaf,
        mapping.default_value(),
    )?;

    Ok(BakedTrie { tables, stats })
}

/// подобрать разбиение ключа по уровням и построить трай с ним
pub fn build_with_search(
    mapping: &RangeMapping,
    value_width: ValueWidth,
    packed: bool,
    domain_bits: u8,
    search: &SplitSearch,
) -> Result<BakedTrie>
{
    let report = search_split(mapping, value_width, packed, domain_bits, search)?;

    info!(
        "split {:?}: {} b, {} candidates",
        report.levels, report.size, report.candidates
    );

    let descriptor =
        TrieDescriptor::with_domain(domain_bits, &report.levels, value_width, packed)?;

    build(&descriptor, mapping)
}

/// листовой уровень: при упаковке блоки собираются из уже упакованных байтов
fn build_leaf(descriptor: &TrieDescriptor, dense: &[u32]) -> (BlockTable, Vec<PageRef>)
{
    let bits = descriptor.leaf_bits();
    let width = descriptor.value_width();

    match descriptor.is_packed() {
        true => {
            let bytes = pack_values(dense, width.bits());
            let block_bits = bits - descriptor.values_per_cell().trailing_zeros() as u8;
            let (cells, refs) = deduplicate(&bytes, block_bits);

            (BlockTable::new(bits, width, LeafCells::Packed(cells)), refs)
        }
        false => {
            let (cells, refs) = deduplicate(dense, bits);

            (BlockTable::new(bits, width, LeafCells::Plain(cells)), refs)
        }
    }
}
