//! html-xliff - HTML 与 XLIFF 1.2 之间的双向转换库
//!
//! 这个库提供HTML到XLIFF的提取、XLIFF到HTML的渲染、XLIFF读写，
//! 以及按语言缓存的译文单元库和孤儿单元调和。

pub mod config;
pub mod error;
pub mod html_processor;
pub mod html_to_xliff;
pub mod reconciler;
pub mod restype;
pub mod stats;
pub mod store;
pub mod utils;
pub mod xliff;
pub mod xliff_io;
pub mod xliff_to_html;

pub use config::ConversionConfig;
pub use error::{Result, XliffError};
pub use html_processor::{parse_html, serialize_html, HtmlElement, HtmlNode};
pub use html_to_xliff::html_to_xliff;
pub use reconciler::{merge, reconcile_orphans, MergeReport, ReconcileReport};
pub use store::{DirectorySource, DocumentSource, MemorySource, TranslationStore};
pub use xliff::XliffDocument;
pub use xliff_io::{read_xliff, write_xliff};
pub use xliff_to_html::xliff_to_html;
