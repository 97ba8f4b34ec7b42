//! Paged list responses
//!
//! List endpoints answer either `{ "<items>": [...], "totalPages": n }` or,
//! on older deployments, a bare array of every row. Both become a [`Page`].

use std::fmt::Display;

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Rows per page in every list view
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of canonical items
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, total_pages: u32) -> Self {
        Self {
            items,
            page: page.max(1),
            total_pages: total_pages.max(1),
        }
    }

    /// Cut page `page` out of a full list
    pub fn from_unpaged(all: Vec<T>, page: u32, limit: u32) -> Self {
        let limit = limit.max(1) as usize;
        let page = page.max(1);
        let total_pages = all.len().div_ceil(limit).max(1) as u32;
        let items = all
            .into_iter()
            .skip((page as usize - 1) * limit)
            .take(limit)
            .collect();
        Self {
            items,
            page,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One list row; a row of the wrong shape does not sink its neighbours
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Row<R> {
    Parsed(R),
    Malformed(IgnoredAny),
}

/// Wire shape of a list response
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PageBody<R> {
    Paged {
        #[serde(alias = "employees", alias = "users", alias = "logs", alias = "data")]
        items: Vec<Row<R>>,
        #[serde(default, rename = "totalPages")]
        total_pages: Option<u32>,
        #[serde(default)]
        page: Option<u32>,
    },
    Unpaged(Vec<Row<R>>),
}

impl<R> PageBody<R> {
    /// Map records onto canonical items.
    ///
    /// Rows that fail to map are logged and skipped. `keep` filters locally
    /// and only applies to unpaged bodies, where the server did no filtering.
    pub fn into_page<T, F>(self, page: u32, limit: u32, keep: F) -> Page<T>
    where
        R: TryInto<T>,
        R::Error: Display,
        F: Fn(&T) -> bool,
    {
        match self {
            PageBody::Paged {
                items,
                total_pages,
                page: served,
            } => Page::new(convert(items), served.unwrap_or(page), total_pages.unwrap_or(1)),
            PageBody::Unpaged(all) => {
                let kept = convert(all).into_iter().filter(|t| keep(t)).collect();
                Page::from_unpaged(kept, page, limit)
            }
        }
    }

    /// Every row, ignoring paging
    pub fn into_all<T>(self) -> Vec<T>
    where
        R: TryInto<T>,
        R::Error: Display,
    {
        match self {
            PageBody::Paged { items, .. } | PageBody::Unpaged(items) => convert(items),
        }
    }
}

fn convert<R, T>(rows: Vec<Row<R>>) -> Vec<T>
where
    R: TryInto<T>,
    R::Error: Display,
{
    rows.into_iter()
        .filter_map(|row| match row {
            Row::Parsed(r) => match r.try_into() {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed row");
                    None
                }
            },
            Row::Malformed(_) => {
                tracing::warn!("skipping row with unreadable fields");
                None
            }
        })
        .collect()
}
