//! Query DTOs - query string parameters

/// Filters accepted by `GET /`; both are optional and combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFilters {
    pub category: Option<String>,
    pub name: Option<String>,
}

impl ResourceFilters {
    /// Builds the filters from raw query pairs. Unknown keys are ignored and
    /// a repeated key keeps its last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        pairs
            .into_iter()
            .fold(Self::default(), |mut filters, (key, value)| {
                match key.as_str() {
                    "category" => filters.category = Some(value),
                    "name" => filters.name = Some(value),
                    _ => {}
                }
                filters
            })
    }

    /// Empty strings impose no constraint
    pub fn normalized(self) -> Self {
        Self {
            category: self.category.filter(|c| !c.is_empty()),
            name: self.name.filter(|n| !n.is_empty()),
        }
    }
}
