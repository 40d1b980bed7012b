use crate::error::{AppError, AppResult};
use crate::utils::query::QueryParams;
use actix_web::HttpRequest;
use serde::Serialize;

/// `page`/`limit` pagination, 1-based pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    pub fn from_query(
        params: &QueryParams,
        default_limit: i64,
        max_limit: i64,
    ) -> AppResult<Self> {
        let page = params.get_i64("page")?.unwrap_or(1);
        if page < 1 {
            return Err(AppError::NotFound("Invalid page".to_string()));
        }

        let limit = match params.get_i64("limit")? {
            Some(limit) if limit < 1 => {
                return Err(AppError::Validation(
                    "Query parameter 'limit' must be positive".to_string(),
                ))
            }
            Some(limit) => limit.min(max_limit),
            None => default_limit,
        };

        // next-page links need page * limit to fit as well
        if page.checked_mul(limit).is_none() {
            return Err(AppError::NotFound("Invalid page".to_string()));
        }

        Ok(PageParams { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Pages past the last one are an error, except page 1 of an empty set.
    pub fn check_in_range(&self, count: i64) -> AppResult<()> {
        if self.page > 1 && self.offset() >= count {
            return Err(AppError::NotFound("Invalid page".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, params: PageParams, req: &HttpRequest) -> Self {
        let has_next = params.page.saturating_mul(params.limit) < count;
        let has_previous = params.page > 1;

        Page {
            count,
            next: has_next.then(|| page_url(req, params.page + 1)),
            previous: has_previous.then(|| page_url(req, params.page - 1)),
            results,
        }
    }
}

fn page_url(req: &HttpRequest, page: i64) -> String {
    let info = req.connection_info();
    let base = format!("{}://{}{}", info.scheme(), info.host(), req.path());

    let retained: Vec<(String, String)> = url::form_urlencoded::parse(req.query_string().as_bytes())
        .filter(|(k, _)| k != "page")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in &retained {
        serializer.append_pair(k, v);
    }
    // the first page is linked without a page parameter
    if page > 1 {
        serializer.append_pair("page", &page.to_string());
    }
    let query = serializer.finish();

    if query.is_empty() {
        base
    } else {
        format!("{}?{}", base, query)
    }
}
