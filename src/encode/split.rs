use crate::common::cell_width_for;
use crate::config_checks;
use crate::descriptor::{TrieDescriptor, ValueWidth};
use crate::error::Result;
use crate::tables::{pack_values, PageRef};

use super::{deduplicate, RangeMapping};

/// границы перебора разбиений
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSearch
{
    /// максимальное количество уровней
    pub max_levels: usize,
    /// минимальная ширина нижних уровней (верхний забирает остаток)
    pub min_bits: u8,
    /// максимальная ширина любого уровня
    pub max_bits: u8,
}

impl Default for SplitSearch
{
    fn default() -> Self
    {
        Self {
            max_levels: 4,
            min_bits: 2,
            max_bits: 12,
        }
    }
}

/// найденное разбиение
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport
{
    /// ширины уровней от верхнего к листовому
    pub levels: Vec<u8>,
    /// размер таблиц в байтах
    pub size: usize,
    /// сколько разбиений было оценено
    pub candidates: usize,
}

struct Candidate
{
    levels: Vec<u8>,
    size: usize,
}

impl Candidate
{
    /// меньше размер, затем меньше уровней, затем лексикографически раньше
    fn is_better_than(&self, other: &Candidate) -> bool
    {
        (self.size, self.levels.len(), &self.levels) < (other.size, other.levels.len(), &other.levels)
    }
}

struct Search<'a>
{
    bounds: &'a SplitSearch,
    best: Candidate,
    candidates: usize,
}

/// перебрать разбиения ключа по уровням и выбрать дающее наименьший размер таблиц.
/// однослойный плотный массив - тоже кандидат, поэтому результат не больше него
pub fn search_split(
    mapping: &RangeMapping,
    value_width: ValueWidth,
    packed: bool,
    domain_bits: u8,
    bounds: &SplitSearch,
) -> Result<SplitReport>
{
    #[rustfmt::skip]
    config_checks!(
        bounds.max_levels == 0                                  => "split search needs at least one level";
        bounds.min_bits == 0 || bounds.min_bits > bounds.max_bits
            => "bad split search bounds: {}..={} bits", bounds.min_bits, bounds.max_bits;
    );

    let dense_descriptor = TrieDescriptor::with_domain(domain_bits, &[domain_bits], value_width, packed)?;

    mapping.check_domain(domain_bits)?;
    mapping.check_width(value_width)?;

    let dense = mapping.expand(domain_bits);
    let per_cell = dense_descriptor.values_per_cell();
    let packed_bits = per_cell.trailing_zeros() as u8;

    let packed_cells = match packed {
        true => Some(pack_values(&dense, value_width.bits())),
        false => None,
    };

    let dense_size = match &packed_cells {
        Some(bytes) => bytes.len(),
        None => dense.len() * value_width.cell_bytes(),
    };

    let mut search = Search {
        bounds,
        best: Candidate {
            levels: vec![domain_bits],
            size: dense_size,
        },
        candidates: 1,
    };

    if bounds.max_levels >= 2 {
        let min_leaf = bounds.min_bits.max(packed_bits).max(1);
        let max_leaf = bounds.max_bits.min(domain_bits - 1);

        for leaf_bits in min_leaf ..= max_leaf {
            // листья не зависят от разбиения верхних уровней - считаем один раз
            let (leaf_size, refs) = match &packed_cells {
                Some(bytes) => {
                    let (cells, refs) = deduplicate(bytes, leaf_bits - packed_bits);
                    (cells.len(), refs)
                }
                None => {
                    let (cells, refs) = deduplicate(&dense, leaf_bits);
                    (cells.len() * value_width.cell_bytes(), refs)
                }
            };

            let mut path = vec![leaf_bits];

            search.explore(
                &refs,
                domain_bits - leaf_bits,
                bounds.max_levels - 1,
                &mut path,
                leaf_size,
            );
        }
    }

    Ok(SplitReport {
        levels: search.best.levels,
        size: search.best.size,
        candidates: search.candidates,
    })
}

impl Search<'_>
{
    /// path - ширины уже выбранных уровней, начиная с листового
    fn explore(
        &mut self,
        refs: &[PageRef],
        remaining: u8,
        levels_left: usize,
        path: &mut Vec<u8>,
        cost: usize,
    )
    {
        if cost > self.best.size {
            return;
        }

        // верхний уровень забирает все оставшиеся биты
        if remaining <= self.bounds.max_bits {
            self.candidates += 1;

            let candidate = Candidate {
                levels: core::iter::once(remaining)
                    .chain(path.iter().rev().copied())
                    .collect(),
                size: cost + refs_size(refs),
            };

            if candidate.is_better_than(&self.best) {
                self.best = candidate;
            }
        }

        if levels_left < 2 {
            return;
        }

        for bits in self.bounds.min_bits ..= self.bounds.max_bits.min(remaining - 1) {
            let (cells, up) = deduplicate(refs, bits);

            path.push(bits);
            self.explore(&up, remaining - bits, levels_left - 1, path, cost + refs_size(&cells));
            path.pop();
        }
    }
}

/// размер уровня ссылок при минимальной ширине ячейки
fn refs_size(refs: &[PageRef]) -> usize
{
    let max_page = refs.iter().max().copied().unwrap_or_default();
    refs.len() * cell_width_for(max_page.block())
}
