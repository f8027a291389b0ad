// src/query.rs

use regex::Regex;
use std::sync::OnceLock;

use crate::error::MapError;
use crate::location::LocationFields;

/// Maximum number of rows the store returns for one find request.
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Sort key that keeps rows in insertion order across pages.
pub const CREATION_ORDER: &str = "createdAt";

fn class_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid class name regex"))
}

/// Checks that `name` is usable as a class (table) name.
pub fn validate_class_name(name: &str) -> Result<(), MapError> {
    if class_name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(MapError::InvalidClassName(format!(
            "'{}' must start with a letter and contain only letters, digits or underscores",
            name
        )))
    }
}

/// A find request against one class of the store: the REST form of `SELECT * FROM <table>`.
#[derive(Debug, Clone)]
pub struct LocationQuery {
    class_name: String,
    limit: Option<usize>,
    skip: Option<usize>,
    order: Option<String>,
    keys: Option<String>,
    use_master_key: bool,
}

impl LocationQuery {
    /// Creates a query for the given class.
    ///
    /// # Errors
    /// `MapError::InvalidClassName` if the name is not a plain identifier.
    pub fn new(class_name: &str) -> Result<Self, MapError> {
        validate_class_name(class_name)?;
        Ok(Self {
            class_name: class_name.to_string(),
            limit: None,
            skip: None,
            order: None,
            keys: None,
            use_master_key: false,
        })
    }

    /// A query that selects the fields needed for a [`Location`](crate::Location), oldest row first.
    ///
    /// Every row is returned; rows that cannot become a location are left for
    /// [`Location::from_row`](crate::Location::from_row) to reject.
    pub fn for_locations(class_name: &str, fields: &LocationFields) -> Result<Self, MapError> {
        let mut query = Self::new(class_name)?;
        query.keys(&fields.as_keys()).order(CREATION_ORDER);
        Ok(query)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn uses_master_key(&self) -> bool {
        self.use_master_key
    }

    pub fn set_master_key(&mut self, use_key: bool) -> &mut Self {
        self.use_master_key = use_key;
        self
    }

    /// Caps the number of rows; values above [`MAX_QUERY_LIMIT`] are clamped.
    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit.min(MAX_QUERY_LIMIT));
        self
    }

    /// Skips the first `skip` rows, for paging.
    pub fn skip(&mut self, skip: usize) -> &mut Self {
        self.skip = Some(skip);
        self
    }

    /// Sorts by the given key, `-key` for descending.
    pub fn order(&mut self, key: &str) -> &mut Self {
        self.order = Some(key.to_string());
        self
    }

    /// Restricts the returned fields.
    pub fn keys(&mut self, keys: &str) -> &mut Self {
        self.keys = Some(keys.to_string());
        self
    }

    pub fn build_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(limit_val) = self.limit {
            params.push(("limit".to_string(), limit_val.to_string()));
        }
        if let Some(skip_val) = self.skip {
            params.push(("skip".to_string(), skip_val.to_string()));
        }
        if let Some(order_val) = &self.order {
            params.push(("order".to_string(), order_val.clone()));
        }
        if let Some(keys_val) = &self.keys {
            params.push(("keys".to_string(), keys_val.clone()));
        }
        params
    }
}
