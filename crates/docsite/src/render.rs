//! HTML rendering of the page view models
//!
//! Every dynamic string goes through `html_escape` before it reaches the page.

use crate::views::{ImportedByView, SearchView, UnitView};
use docsite_core::directory::{DirectoryEntry, DirectoryGroup};
use docsite_core::header::UnitHeader;
use docsite_core::pagination::{page_url, Pagination};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

const STYLE: &str = "
body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; }
table.directories { border-collapse: collapse; width: 100%; }
table.directories td { padding: 0.25rem 0.5rem; vertical-align: top; }
tr.child td.name { padding-left: 1.5rem; }
tr.internal { color: #777; }
nav.pagination a, nav.pagination span { margin-right: 0.5rem; }
nav.breadcrumb a::after { content: ' / '; }
";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - docsite</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <form action=\"/search\" method=\"get\"><input type=\"search\" name=\"q\" \
         placeholder=\"Search packages\"></form>\n{body}</body>\n</html>\n",
        text(title)
    )
}

pub fn home_page() -> String {
    layout(
        "Home",
        "<h1>docsite</h1>\n<p>Search for a package or browse to <code>/&lt;path&gt;</code>.</p>\n",
    )
}

pub fn error_page(status: u16, message: &str) -> String {
    layout(
        &status.to_string(),
        &format!("<h1>{status}</h1>\n<p class=\"error\">{}</p>\n", text(message)),
    )
}

fn header_html(header: &UnitHeader) -> String {
    let mut out = String::from("<header>\n<nav class=\"breadcrumb\">");
    for crumb in &header.breadcrumb.links {
        let _ = write!(
            out,
            "<a href=\"{}\">{}</a>",
            attr(&crumb.href),
            text(&crumb.body)
        );
    }
    let _ = write!(
        out,
        "<span>{}</span></nav>\n<h1>{} <small>{}</small></h1>\n<p class=\"version\">{}</p>\n",
        text(&header.breadcrumb.current),
        text(&header.title),
        header.kind.label(),
        text(&header.version_label())
    );
    out.push_str("</header>\n");
    out
}

fn entry_row(entry: &DirectoryEntry, label: &str, class: &str) -> String {
    let mut classes = class.to_string();
    if entry.is_internal {
        classes.push_str(" internal");
    }
    let badge = if entry.is_module {
        " <span class=\"badge\">module</span>"
    } else {
        ""
    };
    format!(
        "<tr class=\"{classes}\"><td class=\"name\"><a href=\"{}\">{}</a>{badge}</td>\
         <td class=\"synopsis\">{}</td></tr>\n",
        attr(&entry.url),
        text(label),
        text(&entry.synopsis)
    )
}

fn group_rows(group: &DirectoryGroup) -> String {
    let mut out = String::new();
    match &group.root {
        Some(root) => out.push_str(&entry_row(root, &group.prefix, "root")),
        None => {
            let _ = writeln!(
                out,
                "<tr class=\"root\"><td class=\"name\">{}</td><td></td></tr>",
                text(&group.prefix)
            );
        }
    }
    for child in &group.children {
        out.push_str(&entry_row(child, &child.suffix, "child"));
    }
    out
}

/// Directory table; groups made only of internal entries are collapsed
pub fn directory_table(title: &str, groups: &[DirectoryGroup]) -> String {
    if groups.is_empty() {
        return String::new();
    }

    let (internal, external): (Vec<&DirectoryGroup>, Vec<&DirectoryGroup>) =
        groups.iter().partition(|g| g.is_all_internal());

    let mut out = format!("<section>\n<h2>{}</h2>\n", text(title));
    out.push_str("<table class=\"directories\">\n");
    for group in &external {
        out.push_str(&group_rows(group));
    }
    out.push_str("</table>\n");

    if !internal.is_empty() {
        out.push_str("<details class=\"internal\">\n<summary>Show internal</summary>\n");
        out.push_str("<table class=\"directories\">\n");
        for group in &internal {
            out.push_str(&group_rows(group));
        }
        out.push_str("</table>\n</details>\n");
    }

    out.push_str("</section>\n");
    out
}

/// Previous/next links and the window of page numbers
pub fn pagination_nav(pagination: &Pagination, base_url: &str) -> String {
    if !pagination.is_paginated() {
        return String::new();
    }

    let mut out = String::from("<nav class=\"pagination\">");
    if pagination.previous_page > 0 {
        let _ = write!(
            out,
            "<a rel=\"prev\" href=\"{}\">Previous</a>",
            attr(&page_url(base_url, pagination.previous_page))
        );
    }
    for &page in &pagination.pages {
        if page == pagination.page {
            let _ = write!(out, "<span aria-current=\"page\">{page}</span>");
        } else {
            let _ = write!(
                out,
                "<a href=\"{}\">{page}</a>",
                attr(&page_url(base_url, page))
            );
        }
    }
    if pagination.next_page > 0 {
        let _ = write!(
            out,
            "<a rel=\"next\" href=\"{}\">Next</a>",
            attr(&page_url(base_url, pagination.next_page))
        );
    }
    out.push_str("</nav>\n");
    out
}

fn tabs(header: &UnitHeader, imported_by: &str) -> String {
    format!(
        "<nav class=\"tabs\"><a href=\"{}\">Main</a> \
         <a href=\"{}?tab=importedby\">Imported by: {}</a></nav>\n",
        attr(&header.url),
        attr(&header.url),
        text(imported_by)
    )
}

pub fn unit_page(view: &UnitView) -> String {
    let mut body = header_html(&view.header);
    body.push_str(&tabs(&view.header, &view.imported_by));

    if !view.synopsis.is_empty() {
        let _ = writeln!(body, "<p class=\"synopsis\">{}</p>", text(&view.synopsis));
    }

    if view.directories.is_empty() {
        body.push_str("<p>No subdirectories.</p>\n");
    } else {
        body.push_str(&directory_table("Packages", &view.directories.packages));
        body.push_str(&directory_table("Commands", &view.directories.commands));
    }

    layout(&view.header.path, &body)
}

pub fn imported_by_page(view: &ImportedByView) -> String {
    let mut body = header_html(&view.header);
    body.push_str(&tabs(&view.header, &view.total));

    if view.importers.is_empty() {
        body.push_str("<p>No known importers for this package.</p>\n");
    } else {
        body.push_str("<ul class=\"importers\">\n");
        for path in &view.importers {
            let _ = writeln!(
                body,
                "<li><a href=\"/{}\">{}</a></li>",
                attr(path),
                text(path)
            );
        }
        body.push_str("</ul>\n");
    }
    body.push_str(&pagination_nav(&view.pagination, &view.base_url));

    layout(&format!("Imported by {}", view.header.path), &body)
}

pub fn search_page(view: &SearchView) -> String {
    let mut body = format!(
        "<h1>Results for \u{201c}{}\u{201d}</h1>\n<p class=\"total\">{} results</p>\n",
        text(&view.query),
        text(&view.total)
    );

    if view.results.is_empty() {
        body.push_str("<p>No packages matched your query.</p>\n");
    } else {
        body.push_str("<ol class=\"results\">\n");
        for result in &view.results {
            let _ = writeln!(
                body,
                "<li><a href=\"/{}\">{}</a> <span class=\"path\">{}</span> \
                 <span class=\"version\">{}</span><p>{}</p></li>",
                attr(&result.path),
                text(&result.name),
                text(&result.path),
                text(&result.version),
                text(&result.synopsis)
            );
        }
        body.push_str("</ol>\n");
    }
    body.push_str(&pagination_nav(&view.pagination, &view.base_url));

    layout(&format!("{} - Search", view.query), &body)
}
