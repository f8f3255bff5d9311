//! Unit page header view models
//!
//! The header names the unit, says what kind of unit it is, shows its
//! version, and links every parent directory back to the module root.

use crate::directory::unit_url;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Module,
    Package,
    Command,
    Directory,
}

impl UnitKind {
    /// Classify a unit from its path, its module path, and its package name
    ///
    /// A unit without a package name is a module when it sits at the module
    /// root and a plain directory otherwise. Packages named `main` are
    /// commands.
    pub fn classify(path: &str, module_path: &str, package_name: Option<&str>) -> Self {
        match package_name {
            Some("main") => UnitKind::Command,
            Some(_) => UnitKind::Package,
            None if path == module_path => UnitKind::Module,
            None => UnitKind::Directory,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Module => "module",
            UnitKind::Package => "package",
            UnitKind::Command => "command",
            UnitKind::Directory => "directory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbLink {
    pub href: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub links: Vec<BreadcrumbLink>,
    pub current: String,
}

/// Breadcrumb from the module root down to `unit_path`
///
/// The first link is labelled with the full module path; deeper links with
/// their last path element. The unit itself is the non-linked `current`
/// element. Links are pinned to `version` when one was requested.
pub fn breadcrumb(unit_path: &str, module_path: &str, version: Option<&str>) -> Breadcrumb {
    if unit_path == module_path {
        return Breadcrumb {
            links: Vec::new(),
            current: module_path.to_string(),
        };
    }

    let Some(rest) = unit_path
        .strip_prefix(module_path)
        .and_then(|r| r.strip_prefix('/'))
    else {
        return Breadcrumb {
            links: Vec::new(),
            current: unit_path.to_string(),
        };
    };

    let segments: Vec<&str> = rest.split('/').collect();
    let mut links = vec![BreadcrumbLink {
        href: unit_url(module_path, version),
        body: module_path.to_string(),
    }];

    let mut dir = module_path.to_string();
    for segment in &segments[..segments.len() - 1] {
        dir.push('/');
        dir.push_str(segment);
        links.push(BreadcrumbLink {
            href: unit_url(&dir, version),
            body: segment.to_string(),
        });
    }

    Breadcrumb {
        links,
        current: segments[segments.len() - 1].to_string(),
    }
}

/// Header shown at the top of every unit page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitHeader {
    pub title: String,
    pub path: String,
    pub module_path: String,
    pub version: String,
    pub kind: UnitKind,
    pub is_latest: bool,
    pub url: String,
    pub breadcrumb: Breadcrumb,
}

impl UnitHeader {
    pub fn new(
        path: &str,
        module_path: &str,
        version: &str,
        kind: UnitKind,
        is_latest: bool,
        requested_version: Option<&str>,
    ) -> Self {
        let title = match kind {
            UnitKind::Module => module_path.to_string(),
            _ => path.rsplit('/').next().unwrap_or(path).to_string(),
        };

        Self {
            title,
            path: path.to_string(),
            module_path: module_path.to_string(),
            version: version.to_string(),
            kind,
            is_latest,
            url: unit_url(path, requested_version),
            breadcrumb: breadcrumb(path, module_path, requested_version),
        }
    }

    /// Version text shown next to the title
    pub fn version_label(&self) -> String {
        if self.is_latest {
            format!("{} (latest)", self.version)
        } else {
            self.version.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // UnitKind tests
    // ============================================================================

    #[test]
    fn test_classify() {
        assert_eq!(UnitKind::classify("a.com/m", "a.com/m", None), UnitKind::Module);
        assert_eq!(UnitKind::classify("a.com/m/x", "a.com/m", None), UnitKind::Directory);
        assert_eq!(
            UnitKind::classify("a.com/m/x", "a.com/m", Some("x")),
            UnitKind::Package
        );
        assert_eq!(
            UnitKind::classify("a.com/m/cmd/x", "a.com/m", Some("main")),
            UnitKind::Command
        );
        assert_eq!(UnitKind::classify("a.com/m", "a.com/m", Some("m")), UnitKind::Package);
    }

    // ============================================================================
    // breadcrumb tests
    // ============================================================================

    #[test]
    fn test_breadcrumb_module_root() {
        let b = breadcrumb("a.com/m", "a.com/m", None);
        assert!(b.links.is_empty());
        assert_eq!(b.current, "a.com/m");
    }

    #[test]
    fn test_breadcrumb_nested_package() {
        let b = breadcrumb("a.com/m/x/y/z", "a.com/m", None);

        let hrefs: Vec<&str> = b.links.iter().map(|l| l.href.as_str()).collect();
        let bodies: Vec<&str> = b.links.iter().map(|l| l.body.as_str()).collect();

        assert_eq!(hrefs, vec!["/a.com/m", "/a.com/m/x", "/a.com/m/x/y"]);
        assert_eq!(bodies, vec!["a.com/m", "x", "y"]);
        assert_eq!(b.current, "z");
    }

    #[test]
    fn test_breadcrumb_pinned_version() {
        let b = breadcrumb("a.com/m/x", "a.com/m", Some("v1.0.0"));
        assert_eq!(b.links[0].href, "/a.com/m@v1.0.0");
        assert_eq!(b.current, "x");
    }

    #[test]
    fn test_breadcrumb_unrelated_module() {
        let b = breadcrumb("b.com/x", "a.com/m", None);
        assert!(b.links.is_empty());
        assert_eq!(b.current, "b.com/x");
    }

    // ============================================================================
    // UnitHeader tests
    // ============================================================================

    #[test]
    fn test_unit_header_package() {
        let header = UnitHeader::new(
            "a.com/m/http",
            "a.com/m",
            "v1.4.0",
            UnitKind::Package,
            true,
            None,
        );
        assert_eq!(header.title, "http");
        assert_eq!(header.url, "/a.com/m/http");
        assert_eq!(header.version_label(), "v1.4.0 (latest)");
        assert_eq!(header.breadcrumb.current, "http");
    }

    #[test]
    fn test_unit_header_module_uses_full_path() {
        let header = UnitHeader::new(
            "a.com/m",
            "a.com/m",
            "v0.3.0",
            UnitKind::Module,
            false,
            Some("v0.3.0"),
        );
        assert_eq!(header.title, "a.com/m");
        assert_eq!(header.url, "/a.com/m@v0.3.0");
        assert_eq!(header.version_label(), "v0.3.0");
    }
}
