pub mod series;
pub use series::*;

pub mod chapter;
pub use chapter::*;

pub mod chapter_list;
pub use chapter_list::*;
