/// Query options for list and count requests.
///
/// Flattened into request parameters in a fixed order: every filter pair,
/// then `page`, then `size`, then one `sort` parameter per sort entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// `field,direction` entries, e.g. `id,asc`.
    pub sort: Vec<String>,
    /// Criteria pairs, e.g. (`title.contains`, `report`).
    pub filters: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort.push(sort.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Parses a `key=value` filter argument as typed on the command line.
    pub fn parse_filter(raw: &str) -> Option<(String, String)> {
        let (key, value) = raw.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), value.to_string()))
    }

    /// Criteria only, without paging or sorting. Used by count requests.
    pub fn criteria_pairs(&self) -> Vec<(String, String)> {
        self.filters.clone()
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.criteria_pairs();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        for sort in &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        pairs
    }
}
