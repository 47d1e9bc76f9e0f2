/// байт, хранящий несколько узких значений (1, 2 или 4 бита).
/// значение с номером i занимает биты [i * bits, (i + 1) * bits), считая от младшего
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedByte(u8);

impl PackedByte
{
    /// сколько значений шириной bits помещается в байт
    #[inline(always)]
    pub fn capacity(bits: u8) -> usize
    {
        (8 / bits) as usize
    }

    /// упаковать до capacity(bits) значений; лишние старшие биты значений отбрасываются
    pub fn pack(values: &[u32], bits: u8) -> Self
    {
        debug_assert!(values.len() <= Self::capacity(bits));

        let mask = (1u32 << bits) - 1;

        let byte = values
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &v)| acc | ((v & mask) << (i as u32 * bits as u32)));

        Self(byte as u8)
    }

    #[inline(always)]
    pub fn get(self, index: usize, bits: u8) -> u32
    {
        let mask = (1u32 << bits) - 1;
        (self.0 as u32 >> (index as u32 * bits as u32)) & mask
    }

    /// все значения байта по порядку
    pub fn unpack(self, bits: u8) -> Vec<u32>
    {
        (0 .. Self::capacity(bits)).map(|i| self.get(i, bits)).collect()
    }

    #[inline(always)]
    pub fn from_raw(byte: u8) -> Self
    {
        Self(byte)
    }

    #[inline(always)]
    pub fn raw(self) -> u8
    {
        self.0
    }
}

/// упаковать плотный массив значений в байты
pub fn pack_values(values: &[u32], bits: u8) -> Vec<u8>
{
    values
        .chunks(PackedByte::capacity(bits))
        .map(|chunk| PackedByte::pack(chunk, bits).raw())
        .collect()
}

/// значение с номером index из упакованного массива
#[inline(always)]
pub fn packed_get(bytes: &[u8], index: usize, bits: u8) -> u32
{
    let capacity = PackedByte::capacity(bits);
    PackedByte::from_raw(bytes[index / capacity]).get(index % capacity, bits)
}
