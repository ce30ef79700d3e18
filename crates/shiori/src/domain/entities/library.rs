/// A series on a user's list, as loaded from the store
#[derive(Debug, Clone)]
pub struct LibraryEntry {
    pub id: String,
    pub user_id: String,
    /// Last chapter the user has read
    pub progress: f64,
    pub sources: Vec<SourceLink>,
}

/// An external reading source linked to a library entry
#[derive(Debug, Clone)]
pub struct SourceLink {
    pub id: String,
    pub entry_id: String,
    pub source_name: String,
    pub url: String,
    pub latest_chapter: Option<String>,
}
