use std::path::PathBuf;

use log::info;

use trie_bakery::bake;
use trie_bakery::catalog::builtin::builtin_specs;
use trie_bakery::catalog::Catalog;
use trie_bakery::output::write_catalog;

/// каталог для результатов по умолчанию
const OUTPUT_DIR: &str = "./data";

fn main() -> anyhow::Result<()>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| OUTPUT_DIR.to_string())
        .into();

    std::fs::create_dir_all(&dir)?;

    let catalog = Catalog::build(builtin_specs()?).into_result()?;

    for entry in catalog.entries() {
        bake!(dir, entry);
    }

    write_catalog(dir.join("catalog.bin"), &catalog)?;

    info!("catalog: {} properties, {} b", catalog.len(), catalog.size());

    Ok(())
}
