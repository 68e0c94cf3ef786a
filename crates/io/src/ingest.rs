use hmdf_series::Station;

/// What one reader invocation produces. Readers build this completely
/// before anything is handed to a [`Dataset`](crate::Dataset).
#[derive(Debug, Default)]
pub(crate) struct Ingest {
    pub(crate) stations: Vec<Station>,
    pub(crate) header: Vec<String>,
    /// File-wide EPSG code, when the format declares one.
    pub(crate) epsg: Option<i32>,
}

impl Ingest {
    pub(crate) fn sample_count(&self) -> usize {
        self.stations.iter().map(Station::len).sum()
    }
}
