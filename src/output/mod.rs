pub mod formatter;
pub mod simple_formatter;

pub use formatter::TreeFormatter;
pub use simple_formatter::SimpleFormatter;
