use crate::error::{AppError, AppResult};
use actix_web::HttpRequest;

/// Raw query string pairs, keeping repeated keys (`?tags=a&tags=b`).
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query_string: &str) -> Self {
        let pairs = url::form_urlencoded::parse(query_string.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        QueryParams { pairs }
    }

    pub fn from_request(req: &HttpRequest) -> Self {
        Self::parse(req.query_string())
    }

    /// First non-empty value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn get_i64(&self, key: &str) -> AppResult<Option<i64>> {
        self.get(key)
            .map(|value| {
                value.parse::<i64>().map_err(|_| {
                    AppError::Validation(format!("Query parameter '{}' must be an integer", key))
                })
            })
            .transpose()
    }

    /// Boolean filter flag: `1`/`true` and `0`/`false`, absent means false.
    pub fn get_flag(&self, key: &str) -> AppResult<bool> {
        match self.get(key) {
            None => Ok(false),
            Some("1") | Some("true") | Some("True") => Ok(true),
            Some("0") | Some("false") | Some("False") => Ok(false),
            Some(_) => Err(AppError::Validation(format!(
                "Query parameter '{}' must be 0 or 1",
                key
            ))),
        }
    }
}
