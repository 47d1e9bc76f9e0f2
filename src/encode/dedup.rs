use std::collections::HashMap;
use std::hash::Hash;

use crate::tables::PageRef;

/// накопитель уникальных блоков уровня: одинаковые по содержимому блоки хранятся один раз
pub struct BlockDeduplicator<T>
{
    block_len: usize,
    index: HashMap<Vec<T>, u32>,
    cells: Vec<T>,
}

impl<T> BlockDeduplicator<T>
where
    T: Copy + Eq + Hash,
{
    pub fn new(block_len: usize) -> Self
    {
        Self {
            block_len,
            index: HashMap::new(),
            cells: vec![],
        }
    }

    /// добавить блок; возвращает ссылку на уже существующий блок с тем же содержимым или на новый
    pub fn insert(&mut self, block: &[T]) -> PageRef
    {
        assert_eq!(block.len(), self.block_len);

        if let Some(&existing) = self.index.get(block) {
            return PageRef::new(existing);
        }

        let physical = self.index.len() as u32;

        self.index.insert(block.to_vec(), physical);
        self.cells.extend_from_slice(block);

        PageRef::new(physical)
    }

    pub fn block_count(&self) -> usize
    {
        self.index.len()
    }

    /// ячейки уникальных блоков в порядке первого появления
    pub fn into_cells(self) -> Vec<T>
    {
        self.cells
    }
}

/// разбить массив на блоки по 2^block_bits ячеек и убрать повторы:
/// (уникальные блоки, ссылка на физический блок для каждого логического)
pub fn deduplicate<T>(cells: &[T], block_bits: u8) -> (Vec<T>, Vec<PageRef>)
where
    T: Copy + Eq + Hash,
{
    let block_len = 1usize << block_bits;
    let mut dedup = BlockDeduplicator::new(block_len);

    let refs = cells
        .chunks(block_len)
        .map(|block| dedup.insert(block))
        .collect();

    (dedup.into_cells(), refs)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn merges_identical_blocks_only()
    {
        let cells = [1, 1, 2, 2, 1, 1, 2, 3, 1, 1];
        let (unique, refs) = deduplicate(&cells[.. 8], 1);

        assert_eq!(unique, vec![1, 1, 2, 2, 2, 3]);
        assert_eq!(
            refs,
            vec![PageRef::new(0), PageRef::new(1), PageRef::new(0), PageRef::new(2)]
        );

        // блоки, отличающиеся одной ячейкой, не объединяются
        let (unique, refs) = deduplicate(&[0u8, 0, 0, 0, 0, 0, 0, 1], 2);
        assert_eq!(unique.len(), 8);
        assert_eq!(refs, vec![PageRef::new(0), PageRef::new(1)]);

        // полностью одинаковые данные - один блок
        let (unique, refs) = deduplicate(&[cells[0]; 8], 2);
        assert_eq!(unique, vec![1; 4]);
        assert_eq!(refs, vec![PageRef::new(0); 2]);
    }
}
