use axum::extract::Query;
use axum::response::Html;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub txnid: Option<String>,
}

struct TerminalPage {
    title: &'static str,
    heading: &'static str,
    message: &'static str,
    accent: &'static str,
    action: &'static str,
}

const SUCCESS_PAGE: TerminalPage = TerminalPage {
    title: "Payment Successful",
    heading: "Payment Successful!",
    message: "Your order has been placed successfully.",
    accent: "#22c55e",
    action: "Return to Chat",
};

const FAILURE_PAGE: TerminalPage = TerminalPage {
    title: "Payment Failed",
    heading: "Payment Failed",
    message: "We couldn't process your payment.",
    accent: "#ef4444",
    action: "Try Again",
};

pub async fn payment_success(query: Option<Query<PageQuery>>) -> Html<String> {
    Html(render(&SUCCESS_PAGE, txnid(query).as_deref()))
}

pub async fn payment_failure(query: Option<Query<PageQuery>>) -> Html<String> {
    Html(render(&FAILURE_PAGE, txnid(query).as_deref()))
}

fn txnid(query: Option<Query<PageQuery>>) -> Option<String> {
    query.and_then(|Query(query)| query.txnid)
}

fn render(page: &TerminalPage, txnid: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body style="margin:0;min-height:100vh;display:flex;align-items:center;justify-content:center;background:#111827;color:#fff;font-family:sans-serif">
<main style="background:#1f2937;padding:2rem;border-radius:12px;max-width:28rem;width:100%;text-align:center">
<div style="width:4rem;height:4rem;border-radius:50%;background:{accent};margin:0 auto 1rem"></div>
<h2>{heading}</h2>
<p style="color:#9ca3af">{message}</p>
<section style="background:#374151;padding:1rem;border-radius:8px;text-align:left;margin-bottom:1.5rem">
<p style="color:#9ca3af;font-size:.875rem;margin:0">Transaction ID</p>
<p id="txnid" style="font-family:monospace;word-break:break-all;margin:0">{txnid}</p>
</section>
<a href="/" style="display:block;padding:.75rem 1rem;border-radius:8px;background:#4b5563;color:#fff;text-decoration:none">{action}</a>
</main>
</body>
</html>
"#,
        title = page.title,
        accent = page.accent,
        heading = page.heading,
        message = escape_html(page.message),
        txnid = escape_html(txnid.unwrap_or_default()),
        action = page.action,
    )
}

/// Keeps a gateway-supplied `txnid` from injecting markup into the page.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_page_shows_transaction() {
        let html = render(&SUCCESS_PAGE, Some("TXN100"));
        assert!(html.contains("Payment Successful!"));
        assert!(html.contains(r#"<p id="txnid" style="font-family:monospace;word-break:break-all;margin:0">TXN100</p>"#));
        assert!(html.contains("Return to Chat"));
    }

    #[test]
    fn failure_page_escapes_message_and_transaction() {
        let html = render(&FAILURE_PAGE, Some("<script>alert(1)</script>"));
        assert!(html.contains("We couldn&#39;t process your payment."));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("Try Again"));
    }

    #[test]
    fn missing_transaction_renders_empty() {
        let html = render(&FAILURE_PAGE, None);
        assert!(html.contains(r#"word-break:break-all;margin:0"></p>"#));
    }
}
