//! Generic paginated list screen

use anyhow::{Result, bail};
use log::debug;
use std::time::Duration;

use crate::app::AdminApp;
use crate::cli::ListArgs;
use crate::components::{Table, error_banner, status_line};
use dashboard::{AutoRefresh, Fetcher, ListParams, LoadOptions, Page, ResourceState};

/// Build list filters from CLI arguments
pub fn list_params(args: &ListArgs) -> ListParams {
    let mut params = ListParams::default().page(args.page).limit(args.limit);
    if let Some(search) = &args.search {
        params = params.search(search.clone());
    }
    if let Some(status) = &args.status {
        params = params.status(status.clone());
    }
    params
}

/// Render a list state: status line, error banner, rows and pagination footer
pub fn render_page<T>(label: &str, state: &ResourceState<Page<T>>, to_table: &dyn Fn(&[T]) -> Table) -> String {
    let mut out = status_line(label, state);
    if let Some(banner) = error_banner(state) {
        out.push('\n');
        out.push_str(&banner);
    }
    if let Some(page) = &state.value {
        out.push('\n');
        let table = to_table(&page.items);
        if table.is_empty() {
            out.push_str("(no results)");
        } else {
            out.push_str(&table.render());
        }
        let p = &page.pagination;
        out.push_str(&format!(
            "\npage {}/{} ({} total)",
            p.page,
            p.total_pages.max(1),
            p.total
        ));
    }
    out
}

/// Load a list once, optionally keep refreshing until Ctrl-C
pub async fn run_list<T>(
    app: &AdminApp,
    label: &str,
    fetch: Fetcher<Page<T>>,
    watch: Option<u64>,
    to_table: &dyn Fn(&[T]) -> Table,
) -> Result<()>
where
    T: Clone + Send + Sync + 'static,
{
    let controller = app.controller::<Page<T>>(label);
    controller.load(fetch, LoadOptions::default()).await;
    println!("{}", render_page(label, &controller.state(), to_table));

    if let Some(secs) = watch {
        let refresh = AutoRefresh::start(controller.clone(), Duration::from_secs(secs.max(1)));
        let mut updates = controller.subscribe();
        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = updates.borrow_and_update().clone();
                    if state.is_loading() {
                        continue;
                    }
                    println!("\n{}", render_page(label, &state, to_table));
                }
                _ = tokio::signal::ctrl_c() => {
                    debug!("Stopping watch for {}", label);
                    break;
                }
            }
        }
        refresh.stop();
    }

    let state = controller.state();
    if let (Some(error), false) = (&state.last_error, state.has_value()) {
        bail!("Could not load {}: {}", label, error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard::{Pagination, RemoteError, ResourceStatus};

    fn names(items: &[String]) -> Table {
        let mut table = Table::new(&["NAME"]);
        for item in items {
            table.row(vec![item.clone()]);
        }
        table
    }

    #[test]
    fn test_list_params_from_args() {
        let args = ListArgs {
            page: 3,
            limit: 5,
            search: Some("acme".to_string()),
            status: None,
            watch: None,
        };
        let params = list_params(&args);
        assert_eq!(params.to_query(), "?page=3&limit=5&search=acme");
    }

    #[test]
    fn test_render_keeps_rows_on_error() {
        let state = ResourceState {
            value: Some(Page {
                items: vec!["Acme".to_string()],
                pagination: Pagination {
                    page: 1,
                    limit: 20,
                    total: 1,
                    total_pages: 1,
                    has_next: false,
                    has_prev: false,
                },
            }),
            status: ResourceStatus::Error,
            last_error: Some(RemoteError::http(502)),
            last_fetched_at: None,
        };

        let rendered = render_page("Organizations", &state, &names);
        assert!(rendered.contains("[error]"));
        assert!(rendered.contains("showing last loaded data"));
        assert!(rendered.contains("Acme"));
        assert!(rendered.ends_with("page 1/1 (1 total)"));
    }

    #[test]
    fn test_render_empty_page() {
        let state = ResourceState {
            value: Some(Page::<String> {
                items: Vec::new(),
                pagination: Pagination::default(),
            }),
            status: ResourceStatus::Ready,
            last_error: None,
            last_fetched_at: None,
        };
        assert!(render_page("Plans", &state, &names).contains("(no results)"));
    }
}
