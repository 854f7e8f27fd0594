//! # Catalog Browser
//!
//! Paginated, filterable product listing with its own load/error state
//! machine. Feeds line-addition requests to the cart via [`select`].
//!
//! Filters apply only at explicit search invocation (form submit),
//! never per keystroke. Lifecycle is explicit: the embedding screen
//! calls [`on_mount`]/[`on_tab_activate`], which issue `search(1)`;
//! there is no hidden dependency tracking.
//!
//! A superseding search simply overwrites the prior result when it
//! resolves: last write wins, with no request-generation check. The
//! UI disables the search controls while `Loading`.
//!
//! [`select`]: CatalogBrowser::select
//! [`on_mount`]: CatalogBrowser::on_mount
//! [`on_tab_activate`]: CatalogBrowser::on_tab_activate

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info};

use mostrador_core::{Pagination, Product, ProductFilters, ProductQuery};

use crate::cart::CartBackend;
use crate::error::{EngineResult, LoadState};
use crate::services::CatalogService;

/// Snapshot of the browser for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    pub load: LoadState,
    pub items: Vec<Product>,
    pub pagination: Pagination,
    pub filters: ProductFilters,
}

/// Product listing state machine.
pub struct CatalogBrowser {
    service: Arc<dyn CatalogService>,
    per_page: u32,
    state: Mutex<CatalogState>,
}

impl CatalogBrowser {
    pub fn new(service: Arc<dyn CatalogService>, per_page: u32) -> Self {
        CatalogBrowser {
            service,
            per_page,
            state: Mutex::new(CatalogState {
                load: LoadState::Idle,
                items: Vec::new(),
                pagination: Pagination::default(),
                filters: ProductFilters::default(),
            }),
        }
    }

    /// Current snapshot for rendering.
    pub fn state(&self) -> CatalogState {
        self.state.lock().expect("catalog mutex poisoned").clone()
    }

    /// Current load state.
    pub fn load_state(&self) -> LoadState {
        self.state.lock().expect("catalog mutex poisoned").load
    }

    /// Issues a listing request for `page` with `filters`.
    ///
    /// On success, items and pagination are replaced wholesale. On
    /// failure the previously-loaded listing stays visible (`Error`
    /// load state, items untouched), so a transient error never
    /// destroys a usable view.
    pub async fn search(&self, page: u32, filters: ProductFilters) -> EngineResult<()> {
        let page = page.max(1);
        {
            let mut state = self.state.lock().expect("catalog mutex poisoned");
            state.load = LoadState::Loading;
            state.filters = filters.clone();
        }

        let query = ProductQuery {
            filters,
            page,
            per_page: self.per_page,
        };
        debug!(page, per_page = self.per_page, "catalog search");

        match self.service.list_products(&query).await {
            Ok(result) => {
                let mut state = self.state.lock().expect("catalog mutex poisoned");
                state.items = result.data;
                state.pagination = result.pagination;
                state.load = LoadState::Ok;
                info!(
                    page,
                    count = state.items.len(),
                    total = state.pagination.total_items,
                    "catalog search landed"
                );
                Ok(())
            }
            Err(err) => {
                let mut state = self.state.lock().expect("catalog mutex poisoned");
                state.load = LoadState::Error;
                debug!(error = %err, "catalog search failed; keeping previous listing");
                Err(err)
            }
        }
    }

    /// Re-issues the search for the current page and filters (used
    /// after a settlement refreshes stock figures).
    pub async fn refresh(&self) -> EngineResult<()> {
        let (page, filters) = {
            let state = self.state.lock().expect("catalog mutex poisoned");
            (state.pagination.page, state.filters.clone())
        };
        self.search(page, filters).await
    }

    /// Screen mount: load the first page.
    pub async fn on_mount(&self) -> EngineResult<()> {
        let filters = self.state().filters;
        self.search(1, filters).await
    }

    /// Tab re-activation: reload the first page.
    pub async fn on_tab_activate(&self) -> EngineResult<()> {
        let filters = self.state().filters;
        self.search(1, filters).await
    }

    /// A product row was clicked: add one unit to the cart.
    pub async fn select(&self, product: &Product, cart: &dyn CartBackend) -> EngineResult<()> {
        cart.add_line(product).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::LocalCart;
    use crate::error::EngineError;
    use crate::memory::InMemoryCatalog;
    use mostrador_core::{Money, PriceInfo, StockLevel};
    use rust_decimal_macros::dec;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            sku: format!("SKU-{}", id),
            brand: "B1".to_string(),
            brand_name: None,
            stock: StockLevel {
                current: 10,
                minimum: 1,
            },
            price: PriceInfo {
                amount: Money::new(dec!(5.00)),
                currency: "PEN".to_string(),
                label: "S/ 5.00".to_string(),
            },
        }
    }

    fn seeded_catalog() -> Arc<InMemoryCatalog> {
        Arc::new(InMemoryCatalog::with_products(vec![
            product("P1", "Inca Kola 500ml"),
            product("P2", "Agua San Luis 625ml"),
            product("P3", "Galletas Soda Field"),
        ]))
    }

    #[tokio::test]
    async fn test_mount_loads_first_page() {
        let browser = CatalogBrowser::new(seeded_catalog(), 2);

        browser.on_mount().await.unwrap();

        let state = browser.state();
        assert_eq!(state.load, LoadState::Ok);
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.pagination.page, 1);
        assert_eq!(state.pagination.total_pages, 2);
    }

    #[tokio::test]
    async fn test_search_applies_filters_on_submit_only() {
        let service = seeded_catalog();
        let browser = CatalogBrowser::new(service.clone(), 10);

        let filters = ProductFilters {
            search: Some("kola".to_string()),
            brand: None,
        };
        browser.search(1, filters.clone()).await.unwrap();

        let state = browser.state();
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.filters, filters);
        // Exactly one request went out: no reactive re-querying.
        assert_eq!(service.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_listing() {
        let service = seeded_catalog();
        let browser = CatalogBrowser::new(service.clone(), 10);
        browser.on_mount().await.unwrap();

        service.fail_next(EngineError::Network("timeout".to_string()));
        let err = browser
            .search(2, ProductFilters::default())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Network(_)));
        let state = browser.state();
        assert_eq!(state.load, LoadState::Error);
        // The first page stays visible.
        assert_eq!(state.items.len(), 3);
        assert_eq!(state.pagination.page, 1);
    }

    #[tokio::test]
    async fn test_refresh_reissues_current_page() {
        let service = seeded_catalog();
        let browser = CatalogBrowser::new(service.clone(), 2);
        browser.on_mount().await.unwrap();
        browser.search(2, ProductFilters::default()).await.unwrap();

        browser.refresh().await.unwrap();

        let queries = service.queries();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[2].page, 2);
    }

    #[tokio::test]
    async fn test_select_feeds_the_cart() {
        let browser = CatalogBrowser::new(seeded_catalog(), 10);
        browser.on_mount().await.unwrap();
        let cart = LocalCart::new();

        let picked = browser.state().items[0].clone();
        browser.select(&picked, &cart).await.unwrap();

        let lines = cart.lines().await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, picked.id);
    }
}
