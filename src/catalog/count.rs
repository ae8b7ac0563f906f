//! Exact item count for a paginated API that only reports `hasNextPage`.
//!
//! Doubles an upper-bound page index until the flag goes false, bisects
//! to the exact boundary page, then adds the item count of the final
//! partial page. Request count stays logarithmic in the page count.

use anyhow::Error;

pub trait PageOracle {
    fn has_next_page(
        &self,
        page: u32,
    ) -> impl std::future::Future<Output = Result<bool, Error>> + Send;

    fn page_len(&self, page: u32) -> impl std::future::Future<Output = Result<u32, Error>> + Send;
}

#[derive(serde::Serialize, Debug, PartialEq, Eq)]
pub struct CountOutcome {
    pub total: u64,
    pub last_page: u32,
    pub per_page: u32,
}

pub async fn count_catalog<O: PageOracle>(oracle: &O, per_page: u32) -> Result<CountOutcome, Error> {
    if !oracle.has_next_page(1).await? {
        let len = oracle.page_len(1).await?;
        return Ok(CountOutcome {
            total: u64::from(len),
            last_page: 1,
            per_page,
        });
    }

    // Page `low` always has a next page; find a `high` that does not.
    let mut low = 1u32;
    let mut high = 2u32;
    while oracle.has_next_page(high).await? {
        low = high;
        high = high.saturating_mul(2);
    }

    // Invariant: has_next_page(low) is true, has_next_page(high) is false.
    // The last page is the smallest page without a next page.
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if oracle.has_next_page(mid).await? {
            low = mid;
        } else {
            high = mid;
        }
    }

    let last_page = high;
    let tail = oracle.page_len(last_page).await?;
    let total = u64::from(last_page - 1) * u64::from(per_page) + u64::from(tail);

    Ok(CountOutcome {
        total,
        last_page,
        per_page,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use anyhow::Error;

    use super::{CountOutcome, PageOracle, count_catalog};

    struct FixedCatalog {
        total: u32,
        per_page: u32,
        requests: AtomicU32,
    }

    impl FixedCatalog {
        fn new(total: u32, per_page: u32) -> Self {
            FixedCatalog {
                total,
                per_page,
                requests: AtomicU32::new(0),
            }
        }

        fn pages(&self) -> u32 {
            self.total.div_ceil(self.per_page).max(1)
        }
    }

    impl PageOracle for FixedCatalog {
        async fn has_next_page(&self, page: u32) -> Result<bool, Error> {
            self.requests.fetch_add(1, Ordering::Relaxed);
            Ok(page < self.pages())
        }

        async fn page_len(&self, page: u32) -> Result<u32, Error> {
            self.requests.fetch_add(1, Ordering::Relaxed);
            let start = (page - 1) * self.per_page;
            Ok(self.total.saturating_sub(start).min(self.per_page))
        }
    }

    #[tokio::test]
    async fn converges_to_exact_total() {
        for total in [0u32, 1, 49, 50, 51, 500, 1234, 9999] {
            let catalog = FixedCatalog::new(total, 50);

            let outcome = count_catalog(&catalog, 50).await.unwrap();

            assert_eq!(outcome.total, u64::from(total), "total={}", total);
        }
    }

    #[tokio::test]
    async fn request_count_is_logarithmic() {
        let catalog = FixedCatalog::new(123_456, 50);
        let pages = catalog.pages();

        let outcome = count_catalog(&catalog, 50).await.unwrap();

        assert_eq!(outcome.total, 123_456);

        let log2_pages = 32 - pages.leading_zeros();
        let bound = 2 * log2_pages + 4;
        let requests = catalog.requests.load(Ordering::Relaxed);
        assert!(
            requests <= bound,
            "made {} requests for {} pages (bound {})",
            requests,
            pages,
            bound
        );
    }

    #[tokio::test]
    async fn single_page_catalog_costs_two_requests() {
        let catalog = FixedCatalog::new(7, 50);

        let outcome = count_catalog(&catalog, 50).await.unwrap();

        assert_eq!(
            outcome,
            CountOutcome {
                total: 7,
                last_page: 1,
                per_page: 50
            }
        );
        assert_eq!(catalog.requests.load(Ordering::Relaxed), 2);
    }
}
