use serde::Serialize;

use super::ChapterRecord;

/// Distinct chapter numbers of a feed, newest first.
///
/// Labels that parse to the same number collapse into one entry, so
/// translation variants and `"10"`/`"10.0"` pairs count once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChapterList(Vec<f64>);

impl ChapterList {
    pub fn from_records(records: &[ChapterRecord]) -> Self {
        let mut numbers = records
            .iter()
            .filter_map(|record| match record.number() {
                Some(number) => Some(number),
                None => {
                    trace!("skip chapter {} with label {:?}", record.id, record.chapter);
                    None
                }
            })
            .collect::<Vec<f64>>();

        numbers.sort_by(|a, b| b.total_cmp(a));
        numbers.dedup();

        Self(numbers)
    }

    /// Highest chapter number
    pub fn latest(&self) -> Option<f64> {
        self.0.first().copied()
    }

    /// Highest chapter number truncated to an integer for display, `10.5` becomes `"10"`
    pub fn latest_label(&self) -> Option<String> {
        self.latest().map(|number| format!("{}", number.trunc() as i64))
    }

    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|number| format!("{number}")).collect()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[ChapterRecord]> for ChapterList {
    fn from(records: &[ChapterRecord]) -> Self {
        Self::from_records(records)
    }
}

impl IntoIterator for ChapterList {
    type Item = f64;
    type IntoIter = std::vec::IntoIter<f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
