use hashbrown::HashSet;
use tracing::{debug, error, info};

use crate::paging::{FileUrls, PageFetch, PageRequest, PageResponse, VideoRecord, VideoSource};

/// What the carousel needs to know about the list behind it.
pub trait PageLoader {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn has_more(&self) -> bool;

    fn is_fetching(&self) -> bool;

    /// Returns true if a request was actually issued.
    fn request_next_page(&mut self) -> bool;
}

/// Result of a settled page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Loaded {
        page: u32,
        added: usize,
        /// unplayable or already known entries
        skipped: usize,
        has_more: bool,
    },
    Failed {
        page: u32,
        error: String,
    },
}

/// Accumulates pages of videos in arrival order, unique by id.
///
/// At most one page is in flight at a time. Once a page comes back short
/// the store stops paging for good.
pub struct PagedVideoStore<S> {
    source: S,
    files: FileUrls,
    page_size: u32,
    items: Vec<VideoRecord>,
    seen: HashSet<String>,
    /// last requested page, 0 before the first request
    page: u32,
    retry_page: bool,
    has_more: bool,
    in_flight: Option<(u32, PageFetch)>,
    last_error: Option<String>,
}

impl<S: VideoSource> PagedVideoStore<S> {
    pub fn new(source: S, page_size: u32, files: FileUrls) -> Self {
        Self {
            source,
            files,
            page_size: page_size.max(1),
            items: Vec::new(),
            seen: HashSet::new(),
            page: 0,
            retry_page: false,
            has_more: true,
            in_flight: None,
            last_error: None,
        }
    }

    pub fn items(&self) -> &[VideoRecord] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&VideoRecord> {
        self.items.get(index)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Checks the in-flight page, merging it once it settles.
    pub fn poll(&mut self) -> Option<PageOutcome> {
        let (page, fetch) = self.in_flight.take()?;

        match fetch.try_take() {
            Err(fetch) => {
                self.in_flight = Some((page, fetch));
                None
            }
            Ok(Ok(response)) => Some(self.merge_page(page, response)),
            Ok(Err(err)) => {
                error!("failed to load video page {page}: {err}");
                self.retry_page = true;
                let error = err.to_string();
                self.last_error = Some(error.clone());
                Some(PageOutcome::Failed { page, error })
            }
        }
    }

    fn merge_page(&mut self, page: u32, response: PageResponse) -> PageOutcome {
        let raw_count = response.records.len();
        let mut added = 0;
        let mut skipped = 0;

        for raw in &response.records {
            let record = raw.decode(&self.files);
            if !record.is_playable() {
                debug!("dropping unplayable video '{}' from page {page}", record.id);
                skipped += 1;
                continue;
            }

            if !self.seen.insert(record.id.clone()) {
                debug!("dropping duplicate video '{}' from page {page}", record.id);
                skipped += 1;
                continue;
            }

            self.items.push(record);
            added += 1;
        }

        if raw_count < self.page_size as usize {
            self.has_more = false;
            info!(
                "video page {page} returned {raw_count}/{} records, end of feed",
                self.page_size
            );
        }

        self.last_error = None;
        debug!(
            "video page {page} loaded: {added} added, {skipped} skipped, {} total",
            self.items.len()
        );

        PageOutcome::Loaded {
            page,
            added,
            skipped,
            has_more: self.has_more,
        }
    }
}

impl<S: VideoSource> PageLoader for PagedVideoStore<S> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn has_more(&self) -> bool {
        self.has_more
    }

    fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    fn request_next_page(&mut self) -> bool {
        if !self.has_more || self.in_flight.is_some() {
            return false;
        }

        let page = if self.page == 0 || self.retry_page {
            self.page.max(1)
        } else {
            self.page + 1
        };
        self.page = page;
        self.retry_page = false;

        debug!("requesting video page {page}");
        let fetch = self.source.fetch_page(PageRequest {
            page,
            page_size: self.page_size,
        });
        self.in_flight = Some((page, fetch));

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{paging::RawVideoEntry, Error, Result};
    use poll_promise::{Promise, Sender};
    use pretty_assertions::assert_eq;

    /// Hands out pending promises so tests decide when pages settle.
    #[derive(Default)]
    struct ManualSource {
        requests: Vec<PageRequest>,
        senders: Vec<Sender<Result<PageResponse>>>,
    }

    impl ManualSource {
        fn settle(&mut self, response: Result<PageResponse>) {
            let sender = self.senders.remove(0);
            sender.send(response);
        }
    }

    impl VideoSource for ManualSource {
        fn fetch_page(&mut self, request: PageRequest) -> PageFetch {
            let (sender, promise) = Promise::new();
            self.requests.push(request);
            self.senders.push(sender);
            promise
        }
    }

    fn raw(id: &str) -> RawVideoEntry {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "filePath": format!("{{\"path\":\"https://cdn.example.com/{id}.mp4\"}}"),
        }))
        .expect("raw")
    }

    fn page_of(ids: &[&str]) -> PageResponse {
        PageResponse {
            records: ids.iter().map(|id| raw(id)).collect(),
            total: None,
        }
    }

    fn store(page_size: u32) -> PagedVideoStore<ManualSource> {
        PagedVideoStore::new(ManualSource::default(), page_size, FileUrls::passthrough())
    }

    fn ids(store: &PagedVideoStore<ManualSource>) -> Vec<&str> {
        store.items().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn first_request_is_page_one() {
        let mut store = store(5);
        assert!(store.request_next_page());
        assert_eq!(
            store.source().requests,
            vec![PageRequest {
                page: 1,
                page_size: 5
            }]
        );
        assert_eq!(store.page(), 1);
    }

    #[test]
    fn no_request_while_fetching() {
        let mut store = store(5);
        assert!(store.request_next_page());
        assert!(store.is_fetching());
        assert!(!store.request_next_page());
        assert_eq!(store.source().requests.len(), 1);

        // still pending
        assert_eq!(store.poll(), None);
        assert!(store.is_fetching());
    }

    #[test]
    fn pages_accumulate_and_dedup() {
        let mut store = store(3);

        store.request_next_page();
        store.source_mut().settle(Ok(page_of(&["a", "b", "c"])));
        assert!(matches!(store.poll(), Some(PageOutcome::Loaded { added: 3, .. })));
        assert!(!store.is_fetching());

        store.request_next_page();
        store.source_mut().settle(Ok(page_of(&["c", "d", "a"])));
        let outcome = store.poll();

        assert_eq!(
            outcome,
            Some(PageOutcome::Loaded {
                page: 2,
                added: 1,
                skipped: 2,
                has_more: true
            })
        );
        assert_eq!(ids(&store), vec!["a", "b", "c", "d"]);
        assert_eq!(store.source().requests[1].page, 2);
    }

    #[test]
    fn short_page_ends_feed_for_good() {
        let mut store = store(3);

        store.request_next_page();
        store.source_mut().settle(Ok(page_of(&["a", "b"])));
        store.poll();

        assert!(!store.has_more());
        assert!(!store.request_next_page());
        assert_eq!(store.source().requests.len(), 1);
    }

    #[test]
    fn empty_page_ends_feed() {
        let mut store = store(3);
        store.request_next_page();
        store.source_mut().settle(Ok(page_of(&[])));
        store.poll();
        assert!(!store.has_more());
        assert!(store.is_empty());
    }

    #[test]
    fn unplayable_entries_are_filtered_but_counted_for_paging() {
        let mut store = store(2);
        let mut page = page_of(&["a"]);
        page.records.push(
            serde_json::from_value(serde_json::json!({ "id": "bad", "filePath": "not-json" }))
                .expect("raw"),
        );

        store.request_next_page();
        store.source_mut().settle(Ok(page));
        let outcome = store.poll();

        assert_eq!(ids(&store), vec!["a"]);
        // a full page of raw records keeps paging alive
        assert!(store.has_more());
        assert!(matches!(
            outcome,
            Some(PageOutcome::Loaded {
                added: 1,
                skipped: 1,
                ..
            })
        ));
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let mut store = store(4);
        let page: PageResponse = serde_json::from_value(serde_json::json!({
            "records": [
                { "id": "a", "filePath": "{\"path\":\"https://cdn.example.com/a.mp4\"}" },
                null,
                { "id": "c", "thumbnailPath": 7 },
                { "id": "d", "filePath": { "path": "https://cdn.example.com/d.mp4" }, "thumbnailPath": 7 }
            ]
        }))
        .expect("page");

        store.request_next_page();
        store.source_mut().settle(Ok(page));

        assert_eq!(
            store.poll(),
            Some(PageOutcome::Loaded {
                page: 1,
                added: 2,
                skipped: 2,
                has_more: true
            })
        );
        assert_eq!(ids(&store), vec!["a", "d"]);
        assert_eq!(store.last_error(), None);

        // the next page moves on instead of retrying
        assert!(store.request_next_page());
        assert_eq!(store.source().requests[1].page, 2);
    }

    #[test]
    fn failure_keeps_items_and_retries_same_page() {
        let mut store = store(2);

        store.request_next_page();
        store.source_mut().settle(Ok(page_of(&["a", "b"])));
        store.poll();

        store.request_next_page();
        store
            .source_mut()
            .settle(Err(Error::Http("connection reset".to_owned())));
        let outcome = store.poll();

        assert!(matches!(outcome, Some(PageOutcome::Failed { page: 2, .. })));
        assert_eq!(ids(&store), vec!["a", "b"]);
        assert!(store.has_more());
        assert!(!store.is_fetching());
        assert!(store.last_error().is_some());

        assert!(store.request_next_page());
        assert_eq!(store.source().requests[2].page, 2);

        store.source_mut().settle(Ok(page_of(&["c", "d"])));
        store.poll();
        assert_eq!(store.last_error(), None);
        assert_eq!(ids(&store), vec!["a", "b", "c", "d"]);
    }
}
