//! Page view models assembled from the store and the core builders

use crate::error::{Error, StoreResult};
use crate::store::{SearchResult, Store, UnitRecord};
use docsite_core::count::{approximate_number, format_limited_count, format_total};
use docsite_core::directory::{entries_from_modules, entries_from_packages, Directories};
use docsite_core::header::{UnitHeader, UnitKind};
use docsite_core::limits::DisplayLimits;
use docsite_core::pagination::{build_url, Pagination, PaginationParams};
use serde::Serialize;

/// Relative error assumed for capped search totals
const SEARCH_COUNT_SIGMA: f64 = 0.1;

#[derive(Debug, Clone, Serialize)]
pub struct UnitView {
    pub header: UnitHeader,
    pub synopsis: String,
    pub directories: Directories,
    pub imported_by: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportedByView {
    pub header: UnitHeader,
    pub importers: Vec<String>,
    pub pagination: Pagination,
    pub base_url: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub pagination: Pagination,
    pub base_url: String,
    pub total: String,
}

fn find_unit(store: &Store, path: &str, version: Option<&str>) -> StoreResult<UnitRecord> {
    store.unit(path, version)?.ok_or_else(|| match version {
        Some(version) => Error::NotFound(format!("{path}@{version}")),
        None => Error::NotFound(path.to_string()),
    })
}

fn header_for(unit: &UnitRecord, requested_version: Option<&str>) -> UnitHeader {
    let kind = UnitKind::classify(&unit.path, &unit.module_path, unit.name.as_deref());
    UnitHeader::new(
        &unit.path,
        &unit.module_path,
        &unit.version,
        kind,
        unit.is_latest,
        requested_version,
    )
}

/// Directory listing of everything below `path`
pub fn directories(
    store: &Store,
    unit: &UnitRecord,
    version: Option<&str>,
) -> StoreResult<Directories> {
    let packages = store.subdirectories(&unit.path, &unit.module_path, &unit.version)?;
    let modules = store.nested_modules(&unit.path)?;

    let mut entries = entries_from_packages(&unit.path, version, &packages);
    entries.extend(entries_from_modules(&unit.path, &modules));

    log::debug!(
        "{}: {} packages, {} nested modules",
        unit.path,
        packages.len(),
        modules.len()
    );

    Ok(Directories::assemble(entries))
}

pub fn unit_view(
    store: &Store,
    limits: &DisplayLimits,
    path: &str,
    version: Option<&str>,
) -> StoreResult<UnitView> {
    let unit = find_unit(store, path, version)?;
    let directories = directories(store, &unit, version)?;
    let imported_by = store.imported_by_count(&unit.path, limits.imported_by_limit)?;

    Ok(UnitView {
        header: header_for(&unit, version),
        synopsis: unit.synopsis.clone(),
        directories,
        imported_by: format_limited_count(imported_by, limits.imported_by_limit),
    })
}

pub fn imported_by_view(
    store: &Store,
    limits: &DisplayLimits,
    path: &str,
    version: Option<&str>,
    page: Option<i64>,
) -> StoreResult<ImportedByView> {
    let unit = find_unit(store, path, version)?;
    let all = store.imported_by(&unit.path, limits.tab_imported_by_limit)?;

    let params = PaginationParams::new(
        page,
        None,
        limits.imported_by_page_size,
        limits.max_page_size,
    )?;
    let importers: Vec<String> = all
        .iter()
        .skip(params.offset())
        .take(params.limit)
        .cloned()
        .collect();
    let pagination = Pagination::from_params(
        params,
        all.len(),
        importers.len(),
        limits.imported_by_link_count,
    )?;

    let header = header_for(&unit, version);
    let base_url = format!("{}?tab=importedby", header.url);

    Ok(ImportedByView {
        header,
        importers,
        pagination,
        base_url,
        total: format_limited_count(all.len(), limits.tab_imported_by_limit),
    })
}

pub fn search_view(
    store: &Store,
    limits: &DisplayLimits,
    query: &str,
    page: Option<i64>,
    limit: Option<i64>,
) -> StoreResult<SearchView> {
    let params = PaginationParams::new(
        page,
        limit,
        limits.search_page_size,
        limits.max_page_size,
    )?;

    let count = store.search_count(query, limits.search_count_limit)?;
    let results = store.search(query, params.limit, params.offset())?;

    let approximate = count >= limits.search_count_limit;
    let total = if approximate {
        approximate_number(count, SEARCH_COUNT_SIGMA)
    } else {
        count
    };

    let pagination =
        Pagination::from_params(params, total, results.len(), limits.search_link_count)?
            .with_approximate(approximate);

    let mut url_params = vec![("q", query.to_string())];
    if limit.is_some() {
        url_params.push(("limit", params.limit.to_string()));
    }

    Ok(SearchView {
        query: query.to_string(),
        results,
        base_url: build_url("/search", &url_params),
        total: format_total(total, approximate),
        pagination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testdata::seeded_store;

    fn prefixes(groups: &[docsite_core::directory::DirectoryGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.prefix.as_str()).collect()
    }

    // ============================================================================
    // unit_view tests
    // ============================================================================

    #[test]
    fn test_unit_view_module_root() {
        let store = seeded_store();
        let view = unit_view(&store, &DisplayLimits::default(), "example.com/web", None).unwrap();

        assert_eq!(view.header.kind, UnitKind::Module);
        assert_eq!(view.header.version, "v1.2.0");
        assert_eq!(
            prefixes(&view.directories.packages),
            vec!["internal", "middleware", "router", "tools"]
        );
        assert_eq!(prefixes(&view.directories.commands), vec!["cmd"]);

        let router = &view.directories.packages[2];
        assert_eq!(router.root.as_ref().unwrap().url, "/example.com/web/router");
        assert_eq!(router.children[0].suffix, "trie");

        let tools = &view.directories.packages[3];
        assert!(tools.root.as_ref().unwrap().is_module);

        assert!(view.directories.packages[0].is_all_internal());
        assert_eq!(view.imported_by, "0");
    }

    #[test]
    fn test_unit_view_pinned_version_links() {
        let store = seeded_store();
        let view = unit_view(
            &store,
            &DisplayLimits::default(),
            "example.com/web/router",
            Some("v1.2.0"),
        )
        .unwrap();

        assert_eq!(view.header.kind, UnitKind::Package);
        assert_eq!(view.header.url, "/example.com/web/router@v1.2.0");
        let trie = view.directories.packages[0].root.as_ref().unwrap();
        assert_eq!(trie.url, "/example.com/web/router/trie@v1.2.0");
        assert_eq!(view.imported_by, "3");
    }

    #[test]
    fn test_unit_view_imported_by_capped() {
        let store = seeded_store();
        let limits = DisplayLimits {
            imported_by_limit: 3,
            ..DisplayLimits::default()
        };
        let view = unit_view(&store, &limits, "example.com/web/router", None).unwrap();
        assert_eq!(view.imported_by, "2+");
    }

    #[test]
    fn test_unit_view_not_found() {
        let store = seeded_store();
        let err =
            unit_view(&store, &DisplayLimits::default(), "example.com/nope", None).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = unit_view(&store, &DisplayLimits::default(), "example.com/web", Some("v3.0.0"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(p) if p == "example.com/web@v3.0.0"));
    }

    // ============================================================================
    // imported_by_view tests
    // ============================================================================

    #[test]
    fn test_imported_by_view_paginates() {
        let store = seeded_store();
        let limits = DisplayLimits {
            imported_by_page_size: 2,
            ..DisplayLimits::default()
        };

        let first =
            imported_by_view(&store, &limits, "example.com/web/router", None, None).unwrap();
        assert_eq!(first.importers.len(), 2);
        assert_eq!(first.pagination.total_pages, 2);
        assert_eq!(first.pagination.next_page, 2);
        assert_eq!(first.base_url, "/example.com/web/router?tab=importedby");
        assert_eq!(first.total, "3");

        let second =
            imported_by_view(&store, &limits, "example.com/web/router", None, Some(2)).unwrap();
        assert_eq!(second.importers, vec!["example.com/web/middleware/auth".to_string()]);
        assert_eq!(second.pagination.previous_page, 1);
        assert_eq!(second.pagination.next_page, 0);
    }

    // ============================================================================
    // search_view tests
    // ============================================================================

    #[test]
    fn test_search_view() {
        let store = seeded_store();
        let view = search_view(&store, &DisplayLimits::default(), "router", None, None).unwrap();

        assert_eq!(view.results.len(), 2);
        assert_eq!(view.total, "2");
        assert_eq!(view.base_url, "/search?q=router");
        assert!(!view.pagination.approximate);
        assert_eq!(
            docsite_core::pagination::page_url(&view.base_url, 2),
            "/search?q=router&page=2"
        );
    }

    #[test]
    fn test_search_view_keeps_explicit_limit() {
        let store = seeded_store();
        let view =
            search_view(&store, &DisplayLimits::default(), "example", Some(2), Some(3)).unwrap();

        assert_eq!(view.results.len(), 3);
        assert_eq!(view.pagination.offset, 3);
        assert_eq!(view.base_url, "/search?q=example&limit=3");
    }

    #[test]
    fn test_search_view_approximate_when_capped() {
        let store = seeded_store();
        let limits = DisplayLimits {
            search_count_limit: 4,
            ..DisplayLimits::default()
        };
        let view = search_view(&store, &limits, "example", None, None).unwrap();

        assert!(view.pagination.approximate);
        assert_eq!(view.total, "about 4");
    }

    #[test]
    fn test_out_of_range_page_is_invalid_argument() {
        let store = seeded_store();
        let limits = DisplayLimits::default();

        let err = search_view(&store, &limits, "router", Some(i64::MAX), None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = imported_by_view(&store, &limits, "example.com/web/router", None, Some(i64::MAX))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
