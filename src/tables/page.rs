/// ссылка на блок следующего уровня.
/// хранит номер блока, а не смещение: смещение зависит от размера блоков уровня, на который ссылаемся
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PageRef(u32);

impl PageRef
{
    #[inline(always)]
    pub fn new(block: u32) -> Self
    {
        Self(block)
    }

    /// номер блока
    #[inline(always)]
    pub fn block(self) -> u32
    {
        self.0
    }

    /// индекс первой ячейки блока на уровне, блоки которого занимают 2^block_bits ячеек
    #[inline(always)]
    pub fn offset(self, block_bits: u8) -> usize
    {
        (self.0 as usize) << block_bits
    }
}

impl From<PageRef> for u32
{
    fn from(value: PageRef) -> Self
    {
        value.0
    }
}
