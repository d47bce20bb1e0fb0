//! HTML rendering for the joke form.

use std::{borrow::Cow, fmt::Write};

use crate::{
    config::SourceKind,
    core::{credentials::GateStatus, generator::Notice, Generation},
    tools::local::CATEGORIES,
};

pub const PAGE_TITLE: &str = "Joke Generator";
pub const PAGE_ICON: &str = "😂";
pub const HEADING: &str = "🎭 AI Joke Generator";

/// Everything one render of the page depends on
#[derive(Debug, Clone)]
pub struct PageView {
    pub source: SourceKind,
    pub gate: GateStatus,
    pub sidebar_notices: Vec<Notice>,
    pub generation: Option<Generation>,
    pub selected_category: String,
}

impl PageView {
    pub fn new(source: SourceKind, gate: GateStatus) -> Self {
        Self {
            source,
            gate,
            sidebar_notices: Vec::new(),
            generation: None,
            selected_category: CATEGORIES[0].to_string(),
        }
    }

    pub fn with_sidebar_notices(mut self, notices: Vec<Notice>) -> Self {
        self.sidebar_notices = notices;
        self
    }

    pub fn with_generation(mut self, generation: Generation) -> Self {
        self.selected_category = generation.category.clone();
        self.generation = Some(generation);
        self
    }
}

/// Escape text for HTML content and double-quoted attribute values
pub fn escape_html(input: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(input)
}

fn render_notice(out: &mut String, notice: &Notice) {
    let _ = writeln!(
        out,
        r#"<div class="banner {}" role="status">{}</div>"#,
        notice.banner.css_class(),
        escape_html(&notice.message)
    );
}

fn render_sidebar(out: &mut String, view: &PageView) {
    out.push_str("<aside class=\"sidebar\">\n<h2>Authentication</h2>\n");
    out.push_str("<form method=\"post\" action=\"/credentials\">\n");
    out.push_str(
        "<label>Enter your OpenAI API key:<input type=\"password\" name=\"openai_api_key\" autocomplete=\"off\"></label>\n",
    );
    if view.source == SourceKind::Remote {
        out.push_str(
            "<label>Enter your Humor API key:<input type=\"password\" name=\"humor_api_key\" autocomplete=\"off\"></label>\n",
        );
    }
    out.push_str("<button type=\"submit\">Submit</button>\n");
    out.push_str(
        "<button type=\"submit\" name=\"action\" value=\"clear\">Clear keys</button>\n</form>\n",
    );

    for notice in &view.sidebar_notices {
        render_notice(out, notice);
    }
    if let GateStatus::Blocked(reason) = &view.gate {
        if view.sidebar_notices.is_empty() {
            render_notice(out, &Notice::from(reason));
        }
    }
    out.push_str("</aside>\n");
}

fn render_generate_form(out: &mut String, view: &PageView) {
    out.push_str("<form method=\"post\" action=\"/generate\">\n");
    out.push_str("<label>Select a joke category:<select name=\"category\">\n");
    for category in CATEGORIES {
        let selected = if category == view.selected_category {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            r#"<option value="{0}"{1}>{0}</option>"#,
            category, selected
        );
    }
    out.push_str("</select></label>\n");
    if view.source == SourceKind::Remote {
        out.push_str(
            "<label>Or type any category:<input type=\"text\" name=\"custom_category\"></label>\n",
        );
    }
    out.push_str("<button type=\"submit\">Generate Joke</button>\n</form>\n");
}

fn render_footer(out: &mut String) {
    out.push_str("<hr>\n<h3>Available Joke Categories</h3>\n<ul>\n");
    out.push_str("<li><strong>Programming</strong>: Jokes about coding, developers, and software</li>\n");
    out.push_str("<li><strong>Animal</strong>: Jokes about animals and their funny behaviors</li>\n");
    out.push_str("<li><strong>Food</strong>: Jokes about food, cooking, and eating</li>\n");
    out.push_str("</ul>\n");
}

/// Render the full page
pub fn render_page(view: &PageView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{} {}</title>",
        PAGE_ICON, PAGE_TITLE
    );
    out.push_str(STYLE);
    out.push_str("</head>\n<body>\n");

    render_sidebar(&mut out, view);

    out.push_str("<main>\n");
    let _ = writeln!(out, "<h1>{}</h1>", HEADING);
    out.push_str("<p>Get a random joke from your chosen category!</p>\n");

    // The generate control only exists once the gate is open.
    if view.gate.is_ready() {
        render_generate_form(&mut out, view);
    }

    if let Some(generation) = &view.generation {
        out.push_str("<section class=\"output\">\n");
        for notice in &generation.notices {
            render_notice(&mut out, notice);
        }
        out.push_str("</section>\n");
    }

    render_footer(&mut out);
    out.push_str("</main>\n</body>\n</html>\n");
    out
}

const STYLE: &str = "<style>
body { display: flex; font-family: sans-serif; margin: 0; }
.sidebar { width: 18rem; padding: 1rem; background: #f0f2f6; min-height: 100vh; }
.sidebar label, main label { display: block; margin-bottom: 0.5rem; }
main { flex: 1; padding: 1rem 2rem; }
.banner { padding: 0.75rem; border-radius: 0.4rem; margin: 0.5rem 0; }
.banner-success { background: #dff5e3; color: #1b5e20; }
.banner-warning { background: #fff6d6; color: #7a5d00; }
.banner-error { background: #fde2e2; color: #8e1c1c; }
</style>
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        credentials::{BlockReason, CredentialKind},
        Banner,
    };

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; 'Jerry'&lt;/b&gt;"
        );
        assert!(matches!(escape_html("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_generate_button_hidden_while_blocked() {
        let view = PageView::new(
            SourceKind::Local,
            GateStatus::Blocked(BlockReason::Missing(CredentialKind::OpenAi)),
        );
        let html = render_page(&view);
        assert!(!html.contains("Generate Joke"));
        assert!(html.contains("Please enter your OpenAI API key to continue."));
        assert!(html.contains(r#"class="banner banner-warning""#));
    }

    #[test]
    fn test_remote_page_asks_for_both_keys() {
        let html = render_page(&PageView::new(SourceKind::Remote, GateStatus::Ready));
        assert!(html.contains("name=\"openai_api_key\""));
        assert!(html.contains("name=\"humor_api_key\""));
        assert!(html.contains("name=\"custom_category\""));
        assert!(html.contains("Generate Joke"));
    }

    #[test]
    fn test_generation_is_escaped() {
        let generation = Generation {
            category: "food".to_string(),
            notices: vec![Notice::success("<script>alert(1)</script>")],
        };
        let html = render_page(
            &PageView::new(SourceKind::Local, GateStatus::Ready).with_generation(generation),
        );
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(&format!(r#"class="banner {}""#, Banner::Success.css_class())));
        assert!(html.contains(r#"<option value="food" selected>"#));
    }
}
