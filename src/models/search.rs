use serde::{Deserialize, Serialize};

/// Filter value meaning "no restriction"
pub const ALL: &str = "All";

/// Search criteria from the presentation layer; every filter is ANDed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub query: Option<String>,     // matches size, model or brand
    pub brand: Option<String>,     // brand group, display name or alias
    pub category: Option<String>,
    pub season: Option<String>,
    pub sort: Option<SortSpec>,    // None: recommendation order
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Brand,
    Model,
    Size,
    FactoryPrice,
    DiscountedPrice,
    SupplyPrice,
    TotalStock,
    StoreStock,
}

impl SortKey {
    pub fn is_numeric(self) -> bool {
        !matches!(self, SortKey::Brand | SortKey::Model | SortKey::Size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Column-header sort state: selecting the same key again flips direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    current: Option<SortSpec>,
}

impl SortState {
    pub fn select(&mut self, key: SortKey) -> SortSpec {
        let next = match self.current {
            Some(spec) if spec.key == key => SortSpec {
                key,
                direction: spec.direction.flipped(),
            },
            // numeric columns open descending, text columns ascending
            _ => SortSpec {
                key,
                direction: if key.is_numeric() { SortDirection::Desc } else { SortDirection::Asc },
            },
        };
        self.current = Some(next);
        next
    }

    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<SortSpec> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_selection_toggles_direction() {
        let mut state = SortState::default();
        assert_eq!(state.select(SortKey::TotalStock).direction, SortDirection::Desc);
        assert_eq!(state.select(SortKey::TotalStock).direction, SortDirection::Asc);
        assert_eq!(state.select(SortKey::TotalStock).direction, SortDirection::Desc);
    }

    #[test]
    fn new_key_starts_fresh() {
        let mut state = SortState::default();
        state.select(SortKey::FactoryPrice);
        state.select(SortKey::FactoryPrice);
        let spec = state.select(SortKey::Brand);
        assert_eq!(spec, SortSpec { key: SortKey::Brand, direction: SortDirection::Asc });
        state.reset();
        assert_eq!(state.current(), None);
    }
}
