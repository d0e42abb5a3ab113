//! Cursor-driven collection listing

use crate::error::{ProvisionError, Result};
use prenv_cloud::{CloudApi, CloudError, DnsRecord, Page, PageRequest, VirtualMachine};
use std::collections::HashSet;
use std::future::Future;

/// Request pages until one comes back without a next cursor.
///
/// Pages are accumulated in request order. The first failing page aborts
/// the whole listing; nothing fetched so far is returned. A cursor that
/// comes back a second time is an error.
pub async fn fetch_all<T, F, Fut>(kind: &str, mut fetch_page: F) -> prenv_cloud::Result<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = prenv_cloud::Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut request = PageRequest::first();
    let mut pages = 0u32;
    let mut seen = HashSet::new();

    loop {
        let page = fetch_page(request).await?;
        pages += 1;
        items.extend(page.items);

        tracing::debug!(kind, page = pages, total = items.len(), "fetched page");

        match page.next_cursor {
            Some(cursor) => {
                if !seen.insert(cursor.clone()) {
                    return Err(CloudError::RepeatedCursor(cursor));
                }
                request = PageRequest::after(cursor);
            }
            None => break,
        }
    }

    Ok(items)
}

/// Every VM on the account, optionally limited to one region
pub async fn fetch_all_vms<C>(api: &C, region: Option<&str>) -> Result<Vec<VirtualMachine>>
where
    C: CloudApi + ?Sized,
{
    fetch_all("instances", move |page| async move { api.list_vms(region, &page).await })
        .await
        .map_err(ProvisionError::api("list instances"))
}

/// Every record of `domain`
pub async fn fetch_all_dns_records<C>(api: &C, domain: &str) -> Result<Vec<DnsRecord>>
where
    C: CloudApi + ?Sized,
{
    fetch_all("dns records", move |page| async move {
        api.list_dns_records(domain, &page).await
    })
    .await
    .map_err(ProvisionError::api(format!("list DNS records of {}", domain)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves `pages` pages of `per_page` numbers each, cursors "c1", "c2", ...
    fn synthetic_page(request: &PageRequest, pages: u32, per_page: u32) -> Page<u32> {
        let index = match &request.cursor {
            None => 0,
            Some(cursor) => cursor.trim_start_matches('c').parse::<u32>().unwrap(),
        };
        let items = (0..per_page).map(|i| index * per_page + i).collect();
        if index + 1 < pages {
            Page::with_next(items, format!("c{}", index + 1))
        } else {
            Page::last(items)
        }
    }

    #[tokio::test]
    async fn test_fetch_all_concatenates_pages_in_order() {
        let requests = Mutex::new(Vec::new());

        let items = fetch_all("numbers", |page| {
            requests.lock().unwrap().push(page.clone());
            async move { Ok(synthetic_page(&page, 4, 3)) }
        })
        .await
        .unwrap();

        assert_eq!(items, (0..12).collect::<Vec<u32>>());

        let requests = requests.into_inner().unwrap();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].cursor, None);
        assert_eq!(requests[1].cursor.as_deref(), Some("c1"));
        assert_eq!(requests[3].cursor.as_deref(), Some("c3"));
        assert!(requests.iter().all(|r| r.per_page == 100));
    }

    #[tokio::test]
    async fn test_fetch_all_single_empty_page() {
        let mut calls = 0;
        let items: Vec<u32> = fetch_all("numbers", |_| {
            calls += 1;
            async { Ok(Page::last(Vec::new())) }
        })
        .await
        .unwrap();

        assert!(items.is_empty());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_fetch_all_aborts_on_page_error() {
        let mut calls = 0;
        let result = fetch_all("numbers", |page| {
            calls += 1;
            async move {
                if page.cursor.as_deref() == Some("c2") {
                    Err(CloudError::Transport("connection reset".to_string()))
                } else {
                    Ok(synthetic_page(&page, 5, 2))
                }
            }
        })
        .await;

        assert!(matches!(result, Err(CloudError::Transport(_))));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_repeated_cursor() {
        let mut calls = 0;
        let result = fetch_all("numbers", |page| {
            calls += 1;
            async move {
                // c1 -> c2 -> c1
                let next = if page.cursor.as_deref() == Some("c1") { "c2" } else { "c1" };
                Ok(Page::with_next(vec![1u32], next))
            }
        })
        .await;

        assert!(matches!(result, Err(CloudError::RepeatedCursor(ref c)) if c == "c1"));
        assert_eq!(calls, 3);
    }
}
