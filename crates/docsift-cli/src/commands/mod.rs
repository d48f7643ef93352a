//! Command implementations.

pub mod capabilities;
pub mod file;
pub mod text;
pub mod url;

pub use self::capabilities::execute_capabilities;
pub use self::file::execute_file;
pub use self::text::execute_text;
pub use self::url::execute_url;
