// Mapper to convert dashboard views to an HTML page
use crate::domain::view::{Notice, NoticeLevel, SectionBody, SectionView, TabSummary, TabView, TableView};
use std::fmt::Write;

const STYLES: &str = r#"
    body {
        margin: 0;
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
        background-color: #e6e6e6;
        color: #000000;
    }
    .container { padding: 1.5rem 2rem; }
    h1, h2, h3, h4 { color: #1a1a1a; }
    nav.tabs {
        display: flex;
        flex-wrap: wrap;
        gap: 0.25rem;
        background-color: #d9d9d9;
        padding: 0.25rem;
        border-radius: 4px;
    }
    nav.tabs a {
        color: #333;
        font-weight: bold;
        text-decoration: none;
        padding: 0.5rem 0.9rem;
        border-radius: 4px;
    }
    nav.tabs a.active { background-color: #ffffff; border-bottom: 2px solid #ff4b4b; }
    section { margin: 2rem 0; }
    .description { color: #333; }
    .artifact { color: #666; font-size: 0.8rem; }
    img.chart { max-width: 100%; width: 1500px; }
    .grid { overflow-x: auto; max-height: 480px; background: #ffffff; }
    table { border-collapse: collapse; font-size: 0.85rem; width: 100%; }
    th, td { border: 1px solid #d0d0d0; padding: 0.3rem 0.6rem; text-align: left; white-space: nowrap; }
    th { background: #f4f4f4; position: sticky; top: 0; }
    .notice { padding: 0.8rem 1rem; border-radius: 4px; margin: 0.5rem 0; }
    .notice.info { background: #dbe9f9; color: #0b3d91; }
    .notice.warning { background: #fff4cc; color: #6b5200; }
    .notice.error { background: #fde0e0; color: #8a1c1c; }
"#;

/// Render one tab as a full page, with a tab bar linking to every tab
pub fn render_page(title: &str, tabs: &[TabSummary], tab: &TabView) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(title));
    body.push_str(&render_tab_bar(tabs, &tab.id));
    for section in &tab.sections {
        body.push_str(&render_section(section));
    }
    page(title, &body)
}

pub fn render_not_found(title: &str, tabs: &[TabSummary], tab_id: &str) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(title));
    body.push_str(&render_tab_bar(tabs, ""));
    body.push_str(&render_notice(&Notice::new(
        NoticeLevel::Warning,
        format!("Unknown tab '{tab_id}'."),
    )));
    page(title, &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>"#,
        title = escape(title),
        css = STYLES,
        body = body
    )
}

fn render_tab_bar(tabs: &[TabSummary], active: &str) -> String {
    let mut out = String::from("<nav class=\"tabs\">\n");
    for tab in tabs {
        let class = if tab.id == active { " class=\"active\"" } else { "" };
        let _ = writeln!(
            out,
            "<a href=\"/?tab={}\"{}>{}</a>",
            urlencoding::encode(&tab.id),
            class,
            escape(&tab.title)
        );
    }
    out.push_str("</nav>\n");
    out
}

fn render_section(section: &SectionView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<section id=\"{}\">", escape(&section.id));
    let _ = writeln!(out, "<h2>{}</h2>", escape(&section.title));
    if let Some(description) = &section.description {
        let _ = writeln!(out, "<p class=\"description\">{}</p>", escape(description));
    }

    match &section.body {
        SectionBody::Image { src, file_name } => {
            let _ = writeln!(
                out,
                "<img class=\"chart\" src=\"{}\" alt=\"{}\">",
                escape(src),
                escape(file_name)
            );
        }
        SectionBody::Tables { tables } => {
            for table in tables {
                out.push_str(&render_table(table));
            }
        }
        SectionBody::Notice(notice) => out.push_str(&render_notice(notice)),
    }

    if let Some(artifact) = &section.artifact {
        let _ = writeln!(out, "<p class=\"artifact\">Source: {}</p>", escape(artifact));
    }
    out.push_str("</section>\n");
    out
}

fn render_table(table: &TableView) -> String {
    // An empty table shows only its notice
    if let Some(notice) = &table.empty_notice {
        return render_notice(notice);
    }

    let mut out = String::new();
    let _ = writeln!(out, "<h3>{}</h3>", escape(&table.caption));

    out.push_str("<div class=\"grid\"><table>\n<thead><tr>");
    for column in &table.columns {
        let _ = write!(out, "<th>{}</th>", escape(column));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for value in row {
            let _ = write!(out, "<td>{}</td>", escape(value));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table></div>\n");
    out
}

fn render_notice(notice: &Notice) -> String {
    let class = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!(
        "<div class=\"notice {}\">{}</div>\n",
        class,
        escape(&notice.message)
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
