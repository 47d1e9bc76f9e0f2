/// статистика построения трая: что стало с блоками на каждом уровне
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats
{
    /// уровни от верхнего к листовому
    pub levels: Vec<LevelStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelStats
{
    pub level: usize,
    pub bits: u8,
    /// блоков до удаления повторов
    pub logical_blocks: usize,
    /// блоков после удаления повторов
    pub physical_blocks: usize,
    pub cell_width: usize,
    pub bytes: usize,
}

impl BuildStats
{
    pub fn new() -> Self
    {
        Self { levels: vec![] }
    }

    /// запись уровня; если её нет - создаём
    pub fn touch(&mut self, level: usize) -> &mut LevelStats
    {
        while self.levels.len() <= level {
            let next = self.levels.len();

            self.levels.push(LevelStats {
                level: next,
                ..Default::default()
            });
        }

        &mut self.levels[level]
    }

    pub fn total_bytes(&self) -> usize
    {
        self.levels.iter().map(|l| l.bytes).sum()
    }
}

impl LevelStats
{
    /// результат удаления повторов на уровне
    pub fn blocks(&mut self, bits: u8, logical: usize, physical: usize) -> &mut Self
    {
        self.bits = bits;
        self.logical_blocks = logical;
        self.physical_blocks = physical;
        self
    }

    pub fn size(&mut self, cell_width: usize, bytes: usize) -> &mut Self
    {
        self.cell_width = cell_width;
        self.bytes = bytes;
        self
    }

    /// доля блоков, оставшихся после удаления повторов
    pub fn ratio(&self) -> f64
    {
        match self.logical_blocks {
            0 => 1.0,
            logical => self.physical_blocks as f64 / logical as f64,
        }
    }
}
