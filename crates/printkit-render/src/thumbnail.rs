//! Page thumbnails for a page switcher.
//!
//! Each request cancels the in-flight job for the same page. Jobs check
//! their token before and after rendering, and [`ThumbnailService::complete`]
//! drops any result that was superseded in the meantime.

use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Size;
use printkit_core::{Element, PageId, SizeUnit};

use crate::cancel::CancellationToken;
use crate::error::{ThumbnailError, ThumbnailResult};
use crate::export::{Exporter, PageInput};

/// Finished thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub page: PageId,
    pub generation: u64,
    /// PNG data URI.
    pub data_uri: String,
}

#[derive(Debug)]
struct Pending {
    generation: u64,
    token: CancellationToken,
}

/// One thumbnail render, detached from the service.
#[derive(Debug)]
pub struct ThumbnailJob {
    exporter: Arc<Exporter>,
    page: PageId,
    generation: u64,
    elements: Arc<Vec<Element>>,
    canvas: Size,
    unit: SizeUnit,
    token: CancellationToken,
}

impl ThumbnailJob {
    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub async fn run(self) -> ThumbnailResult<Thumbnail> {
        self.token.check()?;
        let data_uri = futures::future::lazy(|_| {
            let input = PageInput::new(&self.elements, self.canvas, self.unit);
            self.exporter.thumbnail_data_uri(input)
        })
        .await?;
        self.token.check()?;
        Ok(Thumbnail {
            page: self.page,
            generation: self.generation,
            data_uri,
        })
    }
}

/// Tracks the latest thumbnail per page.
#[derive(Debug)]
pub struct ThumbnailService {
    exporter: Arc<Exporter>,
    next_generation: u64,
    pending: HashMap<PageId, Pending>,
    latest: HashMap<PageId, Thumbnail>,
}

impl ThumbnailService {
    pub fn new(exporter: Arc<Exporter>) -> Self {
        Self {
            exporter,
            next_generation: 0,
            pending: HashMap::new(),
            latest: HashMap::new(),
        }
    }

    /// Start a job for `page`, cancelling any job still running for it.
    pub fn request(
        &mut self,
        page: PageId,
        elements: Arc<Vec<Element>>,
        canvas: Size,
        unit: SizeUnit,
    ) -> ThumbnailJob {
        self.next_generation += 1;
        let token = CancellationToken::new();
        let pending = Pending {
            generation: self.next_generation,
            token: token.clone(),
        };
        if let Some(previous) = self.pending.insert(page, pending) {
            log::debug!("Superseding thumbnail generation {} for page {}", previous.generation, page);
            previous.token.cancel();
        }
        ThumbnailJob {
            exporter: Arc::clone(&self.exporter),
            page,
            generation: self.next_generation,
            elements,
            canvas,
            unit,
            token,
        }
    }

    /// Store a job's result if it is still the newest for its page.
    pub fn complete(&mut self, result: ThumbnailResult<Thumbnail>) -> bool {
        let thumbnail = match result {
            Ok(thumbnail) => thumbnail,
            Err(ThumbnailError::Stale) => return false,
            Err(ThumbnailError::Render(e)) => {
                log::warn!("Thumbnail render failed: {}", e);
                return false;
            }
        };
        let current = self
            .pending
            .get(&thumbnail.page)
            .is_some_and(|p| p.generation == thumbnail.generation && !p.token.is_cancelled());
        if !current {
            log::debug!("Discarding stale thumbnail for page {}", thumbnail.page);
            return false;
        }
        self.pending.remove(&thumbnail.page);
        self.latest.insert(thumbnail.page, thumbnail);
        true
    }

    pub fn get(&self, page: PageId) -> Option<&Thumbnail> {
        self.latest.get(&page)
    }

    pub fn forget(&mut self, page: PageId) {
        if let Some(pending) = self.pending.remove(&page) {
            pending.token.cancel();
        }
        self.latest.remove(&page);
    }

    /// Cancel every in-flight job. Their results will be discarded.
    pub fn teardown(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.token.cancel();
        }
    }
}

impl Drop for ThumbnailService {
    fn drop(&mut self) {
        self.teardown();
    }
}
