pub use crate::error::Error;
pub use crate::models::{ChapterList, ChapterRecord, SeriesId, parse_chapter_number};
