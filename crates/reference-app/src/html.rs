//! Inline HTML templates for the callback and consent pages

use oauth_flow::{CallbackResult, CallbackView, DENY_ACCESS_SUBMIT_VALUE, TokenResponse};

/// Submit button value of the allow action
pub const ALLOW_ACCESS_SUBMIT_VALUE: &str = "Allow access";

/// Render the `callback` or `callback-error` view
pub fn callback_view(view: &CallbackView) -> String {
    match view {
        CallbackView::Success {
            code,
            state,
            scope,
            result,
        } => {
            let outcome = match result {
                CallbackResult::Tokens(tokens) => token_table(tokens),
                CallbackResult::Failed(error) => format!(
                    r#"<div class="status error">{}</div>"#,
                    html_escape(error)
                ),
            };

            page(
                "Authorization Complete",
                &format!(
                    r#"<h1>Authorization Complete</h1>
        <p>The authorization server redirected back with a code.</p>
        <table>
            {}
            {}
            {}
        </table>
        {}"#,
                    row("Code", Some(code.as_str())),
                    row("State", state.as_deref()),
                    row("Scope", scope.as_deref()),
                    outcome
                ),
            )
        }
        CallbackView::Error {
            error,
            error_description,
        } => page(
            "Authorization Failed",
            &format!(
                r#"<h1>Authorization Failed</h1>
        <div class="status error"><code>{}</code></div>
        <p>{}</p>
        <a href="/" class="button">Start over</a>"#,
                html_escape(error),
                html_escape(error_description.as_deref().unwrap_or(""))
            ),
        ),
    }
}

/// Consent prompt listing the requested scopes, all pre-checked
pub fn consent_page(consent_challenge: &str, requested_scope: &[String]) -> String {
    let scopes: String = requested_scope
        .iter()
        .map(|scope| {
            let scope = html_escape(scope);
            format!(
                r#"
            <label class="scope"><input type="checkbox" name="scopes" value="{scope}" checked> {scope}</label>"#
            )
        })
        .collect();

    page(
        "Grant Access",
        &format!(
            r#"<h1>Grant Access</h1>
        <p>An application is requesting access to your account.</p>

        <form method="post" action="/consent">
            <input type="hidden" name="consent_challenge" value="{}">
            <div class="field">{}
            </div>
            <div class="field">
                <label class="scope"><input type="checkbox" name="remember"> Remember this decision</label>
            </div>
            <button type="submit" name="submit" value="{}">{}</button>
            <button type="submit" name="submit" value="{}" class="secondary">{}</button>
        </form>"#,
            html_escape(consent_challenge),
            scopes,
            ALLOW_ACCESS_SUBMIT_VALUE,
            ALLOW_ACCESS_SUBMIT_VALUE,
            DENY_ACCESS_SUBMIT_VALUE,
            DENY_ACCESS_SUBMIT_VALUE
        ),
    )
}

/// Generic error page
pub fn error_page(title: &str, message: &str) -> String {
    page(
        title,
        &format!(
            r#"<h1>{}</h1>
        <div class="status error">{}</div>"#,
            html_escape(title),
            html_escape(message)
        ),
    )
}

fn token_table(tokens: &TokenResponse) -> String {
    let expires_in = tokens.expires_in.map(|secs| format!("{} seconds", secs));

    format!(
        r#"<h2>Tokens</h2>
        <table>
            {}
            {}
            {}
            {}
            {}
            {}
        </table>"#,
        row("Access token", Some(tokens.access_token.as_str())),
        row("Token type", Some(tokens.token_type.as_str())),
        row("Expires in", expires_in.as_deref()),
        row("Refresh token", tokens.refresh_token.as_deref()),
        row("ID token", tokens.id_token.as_deref()),
        row("Scope", tokens.scope.as_deref())
    )
}

fn row(label: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!(
            "<tr><th>{}</th><td><code>{}</code></td></tr>",
            label,
            html_escape(value)
        ),
        None => format!("<tr><th>{}</th><td class=\"absent\">none</td></tr>", label),
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Hydra Reference App</title>
    <style>{}</style>
</head>
<body>
    <div class="container">
        {}
    </div>
</body>
</html>"#,
        html_escape(title),
        CSS_STYLES,
        body
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

const CSS_STYLES: &str = r#"
* {
    box-sizing: border-box;
}
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: #f4f5f7;
    color: #222;
    margin: 0;
    padding: 20px;
}
.container {
    background: #fff;
    padding: 32px;
    border-radius: 8px;
    max-width: 640px;
    margin: 40px auto;
    box-shadow: 0 2px 10px rgba(0,0,0,0.08);
}
h1 {
    margin: 0 0 10px 0;
    font-size: 22px;
}
table {
    width: 100%;
    border-collapse: collapse;
    margin-bottom: 20px;
}
th {
    text-align: left;
    width: 140px;
    padding: 6px 0;
    vertical-align: top;
}
td code {
    word-break: break-all;
}
.absent {
    color: #999;
}
.scope {
    display: block;
    margin: 6px 0;
}
button, .button {
    display: inline-block;
    padding: 10px 18px;
    background: #4f46e5;
    color: #fff;
    border: none;
    border-radius: 6px;
    font-size: 15px;
    cursor: pointer;
    text-decoration: none;
}
button.secondary {
    background: #6b7280;
}
.status.error {
    background: #fde8e8;
    color: #9b1c1c;
    padding: 12px;
    border-radius: 6px;
    margin-bottom: 16px;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consent_page_escapes_and_lists_scopes() {
        let html = consent_page("ch<1>", &["openid".to_string(), "profile".to_string()]);

        assert!(html.contains(r#"name="consent_challenge" value="ch&lt;1&gt;""#));
        assert!(html.contains(r#"name="scopes" value="openid" checked"#));
        assert!(html.contains(r#"name="scopes" value="profile" checked"#));
        assert!(html.contains(r#"value="Deny access""#));
    }

    #[test]
    fn test_callback_view_shows_exchange_error() {
        let html = callback_view(&CallbackView::Success {
            code: "abc".to_string(),
            state: None,
            scope: None,
            result: CallbackResult::Failed("Token exchange failed: <boom>".to_string()),
        });

        assert!(html.contains("Token exchange failed: &lt;boom&gt;"));
        assert!(html.contains("<code>abc</code>"));
    }

    #[test]
    fn test_error_view() {
        let html = callback_view(&CallbackView::Error {
            error: "missing_code".to_string(),
            error_description: Some("No authorization code was received".to_string()),
        });

        assert!(html.contains("Authorization Failed"));
        assert!(html.contains("missing_code"));
        assert!(html.contains("No authorization code was received"));
    }
}
