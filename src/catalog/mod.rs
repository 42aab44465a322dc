pub mod message;
pub mod store;
pub mod ts_parser;
pub mod ts_writer;

pub use message::{Context, Location, Message, MessageKey, Translation, TranslationStatus};
pub use store::Catalog;
pub use ts_parser::TsParser;
pub use ts_writer::TsWriter;
