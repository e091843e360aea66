//! 列表与预览的 HTML 片段
//!
//! 纯函数，输入数据、输出标记；所有来自后端的文本都经过转义。

use qrdesk_shared::QrCode;

const COLUMNS: usize = 4;

pub fn escape_html(raw: &str) -> String {
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

/// 表格行，每行带 `data-id`，编辑按钮带 `data-edit`
pub fn qr_rows<F>(codes: &[QrCode], image_url: F) -> String
where
    F: Fn(&str) -> String,
{
    codes
        .iter()
        .map(|code| {
            let id = escape_html(&code.id);
            format!(
                concat!(
                    r#"<tr data-id="{id}">"#,
                    "<td>{name}</td>",
                    r#"<td><a href="{link}" target="_blank" rel="noopener">visit</a></td>"#,
                    r#"<td><img src="{img}" alt="qr" width="64"></td>"#,
                    r#"<td><button type="button" data-edit="{id}">Edit</button></td>"#,
                    "</tr>"
                ),
                id = id,
                name = escape_html(&code.name),
                link = escape_html(&code.link),
                img = escape_html(&image_url(&code.id)),
            )
        })
        .collect()
}

pub fn loading_row() -> String {
    message_row("Loading…")
}

pub fn empty_row() -> String {
    message_row("No QR-codes yet")
}

pub fn error_row(detail: &str) -> String {
    message_row(&format!("Error: {}", escape_html(detail)))
}

/// 悬停预览的大图
pub fn preview(image_url: &str) -> String {
    format!(r#"<img src="{}" alt="qr full">"#, escape_html(image_url))
}

fn message_row(text: &str) -> String {
    format!(r#"<tr><td colspan="{}">{}</td></tr>"#, COLUMNS, text)
}
