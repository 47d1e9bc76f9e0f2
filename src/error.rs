use thiserror::Error;

/// результат операций с таблицами
pub type Result<T> = std::result::Result<T, TrieError>;

/// ошибки построения, загрузки и опроса таблиц
#[derive(Error, Debug)]
pub enum TrieError
{
    /// неверное описание трая: ширины уровней, упаковка, форма побочной таблицы
    #[error("config error: {0}")]
    Config(String),

    /// диапазоны не возрастают строго или пересекаются
    #[error("range order error: {0}")]
    RangeOrder(String),

    /// значение не помещается в объявленную ширину
    #[error("value {value:#X} does not fit into {bits} bits")]
    ValueOverflow { value: u32, bits: u8 },

    /// свойство не зарегистрировано в каталоге
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// ошибка построения конкретного свойства
    #[error("property `{name}`: {source}")]
    Property {
        name: String,
        #[source]
        source: Box<TrieError>,
    },

    /// повреждённые или несовместимые сериализованные данные
    #[error("format error: {0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrieError
{
    pub fn config(msg: impl Into<String>) -> Self
    {
        TrieError::Config(msg.into())
    }

    pub fn range_order(msg: impl Into<String>) -> Self
    {
        TrieError::RangeOrder(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self
    {
        TrieError::Format(msg.into())
    }

    /// привязать ошибку к свойству, построение которого она прервала
    pub fn in_property(self, name: impl Into<String>) -> Self
    {
        TrieError::Property {
            name: name.into(),
            source: Box::new(self),
        }
    }
}
