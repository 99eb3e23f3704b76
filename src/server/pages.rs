//! HTML pages.
//!
//! Every dynamic value goes through [`escape_text`] or [`escape_attr`] before it
//! is spliced into a page. Label markup is already escaped by the renderer.

use crate::dataset::Dataset;
use crate::markup::{escape_attr, escape_text};
use crate::render::Label;
use crate::template::{
    CellType, DEFAULT_FONT_SIZE, DEFAULT_HEIGHT, DEFAULT_LOGO_URL, MAX_COL_SPAN, Template,
};

use super::state::Flash;

/// CSS shared by the application pages.
const CSS_STYLES: &str = r#"<style>
    * {
        margin: 0;
        padding: 0;
        box-sizing: border-box;
    }

    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
        background: #f4f5f7;
        color: #2d3748;
        padding: 20px;
    }

    nav {
        display: flex;
        gap: 16px;
        margin-bottom: 20px;
        font-size: 14px;
    }

    nav a {
        color: #4a5568;
        text-decoration: none;
        font-weight: 600;
    }

    nav .logout {
        margin-left: auto;
    }

    .container {
        background: white;
        border-radius: 12px;
        box-shadow: 0 4px 20px rgba(0, 0, 0, 0.08);
        max-width: 1100px;
        margin: 0 auto;
        padding: 32px;
    }

    .container.narrow {
        max-width: 420px;
    }

    h1 {
        font-size: 26px;
        margin-bottom: 20px;
    }

    h2 {
        font-size: 18px;
        margin: 24px 0 12px;
    }

    .flash {
        padding: 10px 14px;
        border-radius: 8px;
        margin-bottom: 12px;
        font-size: 14px;
    }

    .flash.success { background: #e6fffa; color: #234e52; }
    .flash.info { background: #ebf8ff; color: #2a4365; }
    .flash.warning { background: #fffff0; color: #744210; }
    .flash.danger { background: #fff5f5; color: #742a2a; }

    .form-group {
        margin-bottom: 16px;
    }

    .form-row {
        display: grid;
        grid-template-columns: repeat(auto-fill, minmax(180px, 1fr));
        gap: 12px;
    }

    label {
        display: block;
        color: #4a5568;
        font-weight: 600;
        margin-bottom: 6px;
        font-size: 13px;
    }

    input[type="text"],
    input[type="password"],
    input[type="number"],
    input[type="file"],
    select {
        width: 100%;
        padding: 8px 10px;
        border: 2px solid #e2e8f0;
        border-radius: 6px;
        font-size: 14px;
        font-family: inherit;
    }

    button {
        background: #4c51bf;
        color: white;
        border: none;
        padding: 8px 18px;
        font-size: 14px;
        font-weight: 600;
        border-radius: 6px;
        cursor: pointer;
    }

    button.secondary { background: #718096; }
    button.danger { background: #c53030; }
    button.small { padding: 4px 10px; font-size: 12px; }

    .actions {
        display: flex;
        flex-wrap: wrap;
        gap: 8px;
        margin-top: 16px;
    }

    table.data {
        border-collapse: collapse;
        width: 100%;
        font-size: 13px;
    }

    table.data th,
    table.data td {
        border: 1px solid #e2e8f0;
        padding: 6px 8px;
        text-align: left;
    }

    table.data th {
        background: #edf2f7;
    }

    .table-wrap {
        max-height: 60vh;
        overflow: auto;
    }

    .hint {
        color: #a0aec0;
        font-size: 13px;
        margin-top: 6px;
    }
</style>"#;

/// CSS for label sheets (screen and print).
const LABEL_STYLES: &str = r#"<style>
    body {
        font-family: Arial, sans-serif;
        margin: 0;
        padding: 10px;
    }

    .toolbar {
        display: flex;
        gap: 12px;
        margin-bottom: 16px;
    }

    .label-sheet {
        display: flex;
        flex-wrap: wrap;
        gap: 8px;
    }

    .label-box {
        width: 90mm;
        border: 1px dashed #999;
        padding: 2mm;
        page-break-inside: avoid;
        break-inside: avoid;
        overflow: hidden;
    }

    .label-grid {
        display: grid;
        grid-template-columns: repeat(6, 1fr);
        gap: 1mm;
    }

    .label-cell {
        overflow: hidden;
        display: flex;
        flex-direction: column;
        justify-content: center;
    }

    @media print {
        .no-print {
            display: none;
        }

        body {
            padding: 0;
        }

        .label-box {
            border: none;
        }
    }
</style>"#;

fn flashes_html(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|f| {
            format!(
                r#"<div class="flash {}">{}</div>"#,
                f.level.as_str(),
                escape_text(&f.message)
            )
        })
        .collect()
}

const NAV: &str = r#"<nav>
        <a href="/">Upload</a>
        <a href="/table">Data</a>
        <a href="/template_design">Template</a>
        <a href="/print_preview">Preview</a>
        <a class="logout" href="/logout">Log out</a>
    </nav>"#;

/// Wrap `body` in the standard page shell.
fn page(title: &str, nav: bool, flashes: &[Flash], body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    {css}
</head>
<body>
    {nav}
    <div class="container{narrow}">
        {flashes}
        {body}
    </div>
</body>
</html>"#,
        title = escape_text(title),
        css = CSS_STYLES,
        nav = if nav { NAV } else { "" },
        narrow = if nav { "" } else { " narrow" },
        flashes = flashes_html(flashes),
        body = body,
    )
}

pub fn login_page(flashes: &[Flash]) -> String {
    page(
        "Log in",
        false,
        flashes,
        r#"<h1>Label Designer</h1>
        <form method="POST" action="/login">
            <div class="form-group">
                <label for="username">User name</label>
                <input type="text" id="username" name="username" required autofocus>
            </div>
            <div class="form-group">
                <label for="password">Password</label>
                <input type="password" id="password" name="password" required>
            </div>
            <button type="submit">Log in</button>
        </form>"#,
    )
}

pub fn upload_page(flashes: &[Flash], columns: &[String]) -> String {
    let current = if columns.is_empty() {
        String::new()
    } else {
        format!(
            r#"<h2>Current data</h2>
        <p>{} columns: {}</p>
        <div class="actions"><a href="/table"><button type="button" class="secondary">Go to data table</button></a></div>"#,
            columns.len(),
            escape_text(&columns.join(", "))
        )
    };

    let body = format!(
        r#"<h1>Upload Data</h1>
        <form method="POST" action="/" enctype="multipart/form-data">
            <div class="form-group">
                <label for="file">CSV or XLSX file</label>
                <input type="file" id="file" name="file" accept=".csv,.xlsx" required>
                <p class="hint">CSV files may use tab, comma or semicolon separators (UTF-8, Windows-1254 or Latin-1).</p>
            </div>
            <button type="submit">Upload</button>
        </form>
        {current}"#
    );
    page("Upload Data", true, flashes, &body)
}

pub fn table_page(flashes: &[Flash], dataset: &Dataset, template_set: bool) -> String {
    let header: String = dataset
        .columns()
        .iter()
        .map(|c| format!("<th>{}</th>", escape_text(c)))
        .collect();

    let rows: String = dataset
        .rows()
        .enumerate()
        .map(|(i, row)| {
            let cells: String = row
                .values()
                .iter()
                .map(|v| format!("<td>{}</td>", escape_text(v)))
                .collect();
            format!(
                r#"<tr><td><input type="checkbox" name="selected_rows" value="{i}"></td><td>{n}</td>{cells}</tr>"#,
                n = i + 1
            )
        })
        .collect();

    let template_hint = if template_set {
        ""
    } else {
        r#"<p class="hint">No template yet. Set one up in the template designer before printing.</p>"#
    };

    let body = format!(
        r#"<h1>Data Table</h1>
        <p>{count} rows, {cols} columns.</p>
        {template_hint}
        <form method="POST" action="/table">
            <div class="actions">
                <button type="button" class="secondary" onclick="document.querySelectorAll('input[name=selected_rows]').forEach(c => c.checked = true)">Select all</button>
                <button type="button" class="secondary" onclick="document.querySelectorAll('input[name=selected_rows]').forEach(c => c.checked = false)">Select none</button>
                <a href="/template_design"><button type="button" class="secondary">Template designer</button></a>
                <button type="submit">Print selected</button>
            </div>
            <h2>Rows</h2>
            <div class="table-wrap">
                <table class="data">
                    <thead><tr><th></th><th>#</th>{header}</tr></thead>
                    <tbody>{rows}</tbody>
                </table>
            </div>
        </form>"#,
        count = dataset.len(),
        cols = dataset.columns().len(),
    );
    page("Data Table", true, flashes, &body)
}

fn column_options(columns: &[String], with_none: bool) -> String {
    let none = if with_none {
        r#"<option value="">(none)</option>"#
    } else {
        ""
    };
    let options: String = columns
        .iter()
        .map(|c| {
            format!(
                r#"<option value="{}">{}</option>"#,
                escape_attr(c),
                escape_text(c)
            )
        })
        .collect();
    format!("{}{}", none, options)
}

fn cell_rows(template: &Template) -> String {
    if template.is_empty() {
        return r#"<tr><td colspan="6">No cells yet.</td></tr>"#.to_string();
    }

    template
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let style = &cell.style;
            let mut flags = Vec::new();
            if style.bold {
                flags.push("bold");
            }
            if style.italic {
                flags.push("italic");
            }
            let button = |action: &str, label: &str, class: &str| {
                format!(
                    r#"<form method="POST" action="/template_design" style="display:inline"><input type="hidden" name="row_index" value="{i}"><button type="submit" class="small {class}" name="action" value="{action}">{label}</button></form>"#
                )
            };
            format!(
                "<tr><td>{n}</td><td>{ty}</td><td>{summary}</td><td>{cs} x {rs}, {h}, {size}</td><td>{flags}</td><td>{up}{down}{del}</td></tr>",
                n = i + 1,
                ty = cell.cell_type().label(),
                summary = escape_text(&cell.kind.summary()),
                cs = style.col_span,
                rs = style.row_span,
                h = escape_text(&style.height_val),
                size = escape_text(&style.size),
                flags = flags.join(", "),
                up = button("move_up", "Up", "secondary"),
                down = button("move_down", "Down", "secondary"),
                del = button("delete_row", "Delete", "danger"),
            )
        })
        .collect()
}

pub fn designer_page(flashes: &[Flash], columns: &[String], template: &Template) -> String {
    let type_options: String = CellType::ALL
        .iter()
        .map(|t| format!(r#"<option value="{}">{}</option>"#, t.as_str(), t.label()))
        .collect();
    let span_options: String = (1..=MAX_COL_SPAN)
        .map(|n| format!(r#"<option value="{n}">{n}</option>"#))
        .collect();

    let body = format!(
        r##"<h1>Template Designer</h1>
        <p class="hint">The label is a 6-column grid. Cells are placed in list order.</p>

        <h2>Add a cell</h2>
        <form method="POST" action="/template_design">
            <div class="form-row">
                <div class="form-group">
                    <label for="item_type">Type</label>
                    <select id="item_type" name="item_type">{type_options}</select>
                </div>
                <div class="form-group">
                    <label for="dynamic_col_name">Column (dynamic types)</label>
                    <select id="dynamic_col_name" name="dynamic_col_name">{columns}</select>
                </div>
                <div class="form-group">
                    <label for="static_text_content">Static text</label>
                    <input type="text" id="static_text_content" name="static_text_content" value="Static Text">
                </div>
                <div class="form-group">
                    <label for="image_logo_url">Image URL</label>
                    <input type="text" id="image_logo_url" name="image_logo_url" value="{logo}">
                </div>
            </div>
            <div class="form-row">
                <div class="form-group">
                    <label for="col_span">Column span</label>
                    <select id="col_span" name="col_span">{span_options}</select>
                </div>
                <div class="form-group">
                    <label for="row_span">Row span</label>
                    <input type="number" id="row_span" name="row_span" value="1" min="1">
                </div>
                <div class="form-group">
                    <label for="height_val">Min height</label>
                    <input type="text" id="height_val" name="height_val" value="{height}">
                </div>
                <div class="form-group">
                    <label for="font_size">Font size</label>
                    <input type="text" id="font_size" name="font_size" value="{font_size}">
                </div>
            </div>
            <div class="form-row">
                <div class="form-group">
                    <label for="bgcolor_col">Background color column</label>
                    <select id="bgcolor_col" name="bgcolor_col">{color_columns}</select>
                </div>
                <div class="form-group">
                    <label for="static_bgcolor">Background color</label>
                    <input type="text" id="static_bgcolor" name="static_bgcolor" placeholder="#ffffff or red">
                </div>
                <div class="form-group">
                    <label for="textcolor_col">Text color column</label>
                    <select id="textcolor_col" name="textcolor_col">{color_columns}</select>
                </div>
                <div class="form-group">
                    <label for="static_textcolor">Text color</label>
                    <input type="text" id="static_textcolor" name="static_textcolor" placeholder="#000000 or black">
                </div>
            </div>
            <div class="form-row">
                <div class="form-group"><label><input type="checkbox" name="bold"> Bold</label></div>
                <div class="form-group"><label><input type="checkbox" name="italic"> Italic</label></div>
            </div>
            <div class="actions">
                <button type="submit" name="action" value="add_cell">Add cell</button>
            </div>
        </form>

        <h2>Cells</h2>
        <table class="data">
            <thead><tr><th>#</th><th>Type</th><th>Content</th><th>Layout</th><th>Style</th><th></th></tr></thead>
            <tbody>{cells}</tbody>
        </table>

        <form method="POST" action="/template_design">
            <div class="actions">
                <button type="submit" name="action" value="save_and_return">Save and return to data</button>
                <button type="submit" class="secondary" name="action" value="export_template">Export template</button>
                <button type="submit" class="danger" name="action" value="clear_template">Clear template</button>
            </div>
        </form>

        <h2>Import</h2>
        <form method="POST" action="/template_design/import" enctype="multipart/form-data">
            <div class="form-group">
                <input type="file" name="template_file" accept=".json" required>
            </div>
            <button type="submit" class="secondary">Import template</button>
        </form>"##,
        columns = column_options(columns, false),
        color_columns = column_options(columns, true),
        logo = DEFAULT_LOGO_URL,
        height = DEFAULT_HEIGHT,
        font_size = DEFAULT_FONT_SIZE,
        cells = cell_rows(template),
    );
    page("Template Designer", true, flashes, &body)
}

fn label_sheet(title: &str, toolbar: &str, labels: &[Label]) -> String {
    let labels: String = labels.iter().map(Label::html).collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    {css}
</head>
<body>
    {toolbar}
    <div class="label-sheet">{labels}</div>
</body>
</html>"#,
        title = escape_text(title),
        css = LABEL_STYLES,
    )
}

/// Standalone printable page holding `labels`.
pub fn print_document(labels: &[Label]) -> String {
    label_sheet("Labels", "", labels)
}

/// Print preview with navigation and a print button.
pub fn preview_page(flashes: &[Flash], labels: &[Label]) -> String {
    let toolbar = format!(
        r#"<div class="no-print">{flashes}</div>
    <div class="toolbar no-print">
        <button onclick="window.print()">Print</button>
        <a href="/table">Back to data</a>
        <a href="/template_design">Edit template</a>
        <a href="/bpac_label">Label printer data (JSON)</a>
        <span>{} labels</span>
    </div>"#,
        labels.len(),
        flashes = flashes_html(flashes),
    );
    label_sheet("Print Preview", &toolbar, labels)
}
