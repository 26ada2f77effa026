pub mod consolidate;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod lines;
pub mod range;
pub mod report;
pub mod tokenize;


pub use self::consolidate::*;
pub use self::core::*;
pub use self::dispatch::*;
pub use self::error::*;
pub use self::lines::*;
pub use self::range::*;
pub use self::report::*;
pub use self::tokenize::*;
