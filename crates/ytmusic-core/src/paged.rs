//! Lazy paginated sources.
//!
//! [`PagedData`] is the uniform listing abstraction for feeds, search results,
//! library listings and track lists. It comes in two flavors:
//!
//! - **single**: a zero-argument producer, invoked on first read and memoized
//!   for every later read of the same source;
//! - **continuous**: a producer taking the previous page's continuation
//!   token (`None` first) and returning one [`Page`]; a `None` continuation
//!   ends the listing.
//!
//! Sources are cheap to clone; clones share the producer and the memo.
//! Items keep server order and are never deduplicated. A failed producer
//! call propagates to the reader and leaves nothing cached.
//!
//! ```rust,ignore
//! let feed = PagedData::continuous(move |token| {
//!     let client = client.clone();
//!     async move { client.fetch_page(token).await }
//! });
//! let first = feed.load_first().await?;
//! let everything = feed.load_all().await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;

/// One page of items plus the cursor of the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items of this page, in server order.
    pub items: Vec<T>,
    /// Cursor of the next page; `None` when this is the last page.
    pub continuation: Option<String>,
}

impl<T> Page<T> {
    /// Create a page.
    pub const fn new(items: Vec<T>, continuation: Option<String>) -> Self {
        Self {
            items,
            continuation,
        }
    }

    /// A final page.
    pub const fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}

type SingleProducer<T> = dyn Fn() -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync;
type PageProducer<T> = dyn Fn(Option<String>) -> BoxFuture<'static, Result<Page<T>>> + Send + Sync;

enum Source<T> {
    Single {
        producer: Arc<SingleProducer<T>>,
        memo: Arc<Mutex<Option<Vec<T>>>>,
    },
    Continuous {
        producer: Arc<PageProducer<T>>,
    },
}

/// A lazy, possibly multi-page listing.
///
/// Reading the same instance from two tasks at once is not coordinated
/// beyond the single-source memo lock; separate instances are independent.
pub struct PagedData<T> {
    source: Source<T>,
}

impl<T> Clone for PagedData<T> {
    fn clone(&self) -> Self {
        let source = match &self.source {
            Source::Single { producer, memo } => Source::Single {
                producer: Arc::clone(producer),
                memo: Arc::clone(memo),
            },
            Source::Continuous { producer } => Source::Continuous {
                producer: Arc::clone(producer),
            },
        };
        Self { source }
    }
}

impl<T> std::fmt::Debug for PagedData<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flavor = match self.source {
            Source::Single { .. } => "single",
            Source::Continuous { .. } => "continuous",
        };
        f.debug_struct("PagedData").field("flavor", &flavor).finish()
    }
}

impl<T> PagedData<T>
where
    T: Clone + Send + 'static,
{
    /// Wrap a one-shot producer. It runs at most once per successful load.
    pub fn single<F, Fut>(producer: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        Self {
            source: Source::Single {
                producer: Arc::new(move || producer().boxed()),
                memo: Arc::new(Mutex::new(None)),
            },
        }
    }

    /// Wrap a cursor-driven producer.
    pub fn continuous<F, Fut>(producer: F) -> Self
    where
        F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Page<T>>> + Send + 'static,
    {
        Self {
            source: Source::Continuous {
                producer: Arc::new(move |token| producer(token).boxed()),
            },
        }
    }

    /// A single source already holding its items.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            source: Source::Single {
                producer: Arc::new(|| async { Ok(Vec::new()) }.boxed()),
                memo: Arc::new(Mutex::new(Some(items))),
            },
        }
    }

    /// An empty listing.
    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    /// Whether this source is cursor-driven.
    #[must_use]
    pub const fn is_continuous(&self) -> bool {
        matches!(self.source, Source::Continuous { .. })
    }

    /// Load every item, following continuations until the last page.
    pub async fn load_all(&self) -> Result<Vec<T>> {
        match &self.source {
            Source::Single { producer, memo } => load_single(producer, memo).await,
            Source::Continuous { producer } => {
                let mut items = Vec::new();
                let mut token = None;
                let mut pages = 0usize;
                loop {
                    let page = producer(token).await?;
                    pages += 1;
                    items.extend(page.items);
                    match page.continuation {
                        Some(next) => token = Some(next),
                        None => break,
                    }
                }
                debug!("Loaded {} items over {} pages", items.len(), pages);
                Ok(items)
            }
        }
    }

    /// Load the first page only.
    ///
    /// Resume with [`load_page`](Self::load_page) using the returned
    /// continuation. A single source returns everything with no continuation.
    pub async fn load_first(&self) -> Result<Page<T>> {
        self.load_page(None).await
    }

    /// Load the page at `token` (`None` for the first page).
    pub async fn load_page(&self, token: Option<String>) -> Result<Page<T>> {
        match &self.source {
            Source::Single { producer, memo } => {
                if token.is_some() {
                    return Ok(Page::last(Vec::new()));
                }
                Ok(Page::last(load_single(producer, memo).await?))
            }
            Source::Continuous { producer } => producer(token).await,
        }
    }
}

async fn load_single<T: Clone>(
    producer: &Arc<SingleProducer<T>>,
    memo: &Mutex<Option<Vec<T>>>,
) -> Result<Vec<T>> {
    let mut guard = memo.lock().await;
    if let Some(items) = guard.as_ref() {
        return Ok(items.clone());
    }
    let items = producer().await?;
    *guard = Some(items.clone());
    Ok(items)
}
