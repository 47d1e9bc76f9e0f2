//! многоуровневые сжатые таблицы "кодпоинт -> значение" и их построение.
//!
//! значения свойств идут длинными одинаковыми участками, поэтому ключ делится на поля по уровням,
//! а одинаковые блоки каждого уровня хранятся один раз

#[macro_use]
extern crate lazy_static;

pub mod catalog;
pub mod common;
pub mod descriptor;
pub mod encode;
pub mod error;
pub mod format;
pub mod lookup;
pub mod macros;
pub mod output;
pub mod side_table;
pub mod stats;
pub mod tables;

pub use catalog::{Catalog, CatalogEntry, PropertyKind, PropertySpec, PropertyValue, SplitChoice};
pub use descriptor::{TrieDescriptor, ValueWidth};
pub use encode::{build, build_with_search, RangeMapping, SplitSearch, ValueRange};
pub use error::{Result, TrieError};
pub use side_table::{Expansion, SideTable};
pub use tables::{PageRef, TrieTables};
