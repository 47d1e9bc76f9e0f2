/// проверки конфигурации: первое истинное условие прерывает построение с TrieError::Config
#[macro_export]
macro_rules! config_checks {
    ($($expr:expr => $($msg:expr),+);+ $(;)?) => {
        $(
            if $expr {
                return Err($crate::error::TrieError::config(format!($($msg),+)));
            }
        )+
    };
}

/// запечь свойство каталога: сериализованные таблицы + статистика построения
#[macro_export]
macro_rules! bake {
    ($dir:expr, $entry:expr) => {{
        let entry = $entry;
        let dir: &std::path::Path = $dir.as_ref();

        $crate::output::write_tables(dir.join(format!("{}.trie", entry.name())), entry)?;
        $crate::output::write_stats(
            dir.join(format!("{}.stats.txt", entry.name())),
            entry.name(),
            entry.stats(),
        )?;

        log::info!(
            "{}: {} b (dense: {} b)",
            entry.name().to_uppercase(),
            entry.size(),
            entry.tables().dense_size()
        );
    }};
}
