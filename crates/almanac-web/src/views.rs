//! HTML views.
//!
//! Every page shares [`layout`]. All interpolated text goes through
//! [`escape`]; multi-line fields keep their line breaks.

use std::fmt::Write;

use almanac_core::Article;

const STYLE: &str = "\
body{font-family:system-ui,-apple-system,sans-serif;max-width:760px;margin:0 auto;padding:0 16px;color:#222;line-height:1.6}\
header{border-bottom:1px solid #eee;padding:16px 0}header a{color:inherit;text-decoration:none}\
.card{border:1px solid #eee;border-radius:8px;padding:16px;margin:16px 0}\
.card h2{margin:0 0 8px;font-size:1.2em}.card h2 a{color:#1f5fbf;text-decoration:none}\
blockquote{margin:8px 0;padding:8px 12px;border-left:3px solid #1f5fbf;background:#f7f9fc}\
.comment{color:#555}.empty{color:#888;text-align:center;padding:48px 0}\
footer{border-top:1px solid #eee;margin-top:32px;padding:16px 0;color:#888;font-size:.9em}";

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Escape text and turn newlines into `<br>`.
fn multiline(text: &str) -> String {
    escape(text).replace("\r\n", "\n").replace('\n', "<br>\n")
}

/// Wrap page content in the shared document shell.
pub fn layout(site_title: &str, page_title: &str, year: i32, body: &str) -> String {
    let site = escape(site_title);
    let title = if page_title.is_empty() {
        site.clone()
    } else {
        format!("{} · {site}", escape(page_title))
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"zh-CN\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n\
         <body>\n\
         <header><a href=\"/\"><strong>{site}</strong></a></header>\n\
         <main>\n{body}</main>\n\
         <footer>&copy; {year} {site}</footer>\n\
         </body>\n\
         </html>\n"
    )
}

/// The list page.
pub fn index_page(site_title: &str, articles: &[Article], year: i32) -> String {
    let mut body = String::new();

    if articles.is_empty() {
        body.push_str("<p class=\"empty\">暂无文章</p>\n");
    }

    for article in articles {
        let _ = write!(
            body,
            "<article class=\"card\">\n<h2><a href=\"/article/{id}\">{title}</a></h2>\n",
            id = escape(&article.id),
            title = escape(&article.title),
        );
        if !article.quote.is_empty() {
            let _ = writeln!(body, "<blockquote>{}</blockquote>", multiline(&article.quote));
        }
        if !article.comment.is_empty() {
            let _ = writeln!(body, "<p class=\"comment\">{}</p>", multiline(&article.comment));
        }
        body.push_str("</article>\n");
    }

    layout(site_title, "", year, &body)
}

/// The detail page for one article.
pub fn detail_page(site_title: &str, article: &Article, year: i32) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<article>\n<h1>{}</h1>", escape(&article.title));

    if !article.quote.is_empty() {
        let _ = writeln!(body, "<blockquote>{}</blockquote>", multiline(&article.quote));
    }
    if !article.comment.is_empty() {
        let _ = writeln!(
            body,
            "<section class=\"comment\"><h3>点评</h3>\n<p>{}</p></section>",
            multiline(&article.comment)
        );
    }
    if !article.content.is_empty() {
        let _ = writeln!(
            body,
            "<section><h3>概要</h3>\n<p>{}</p></section>",
            multiline(&article.content)
        );
    }
    body.push_str("</article>\n<p><a href=\"/\">&larr; 返回列表</a></p>\n");

    layout(site_title, &article.title, year, &body)
}

/// The not-found page.
pub fn not_found_page(site_title: &str, year: i32) -> String {
    let body = "<h1>404</h1>\n<p>页面不存在</p>\n<p><a href=\"/\">&larr; 返回首页</a></p>\n";
    layout(site_title, "404", year, body)
}
