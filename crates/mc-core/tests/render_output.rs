//! Integration tests: template → full HTML document.
//!
//! Exercises the compiler and CSS inliner together through the public API.

use mc_core::*;

fn template(blocks: Vec<Block>) -> Template {
    Template {
        blocks,
        ..Template::empty()
    }
}

/// The body rows, between the container's `<tbody>` and its close.
fn rows(html: &str) -> &str {
    let start = html.find("class=\"container\"").expect("no container");
    let body = &html[start..];
    let open = body.find("<tbody>").expect("no tbody") + "<tbody>".len();
    let close = body.rfind("</tbody>").expect("no closing tbody");
    &body[open..close]
}

// ─── Document shell ──────────────────────────────────────────────────────

#[test]
fn empty_template_is_a_complete_document() {
    let html = render_template_to_html(&Template::empty());
    assert!(html.starts_with("<!doctype html>"));
    assert!(html.contains("<title>Untitled Template</title>"));
    assert!(html.contains("charset=utf-8"));
    assert!(html.contains("width=\"600\""));
    assert!(rows(&html).trim().is_empty());
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn base_rules_are_inlined_and_media_query_kept() {
    let html = render_template_to_html(&template(vec![create_default_block("text")]));
    assert!(html.contains("<body style=\"margin: 0; padding: 0; background: #f4f4f5;"));
    assert!(html.contains("border-collapse: collapse; mso-table-lspace: 0pt; mso-table-rspace: 0pt;"));
    assert!(html.contains("@media only screen and (max-width: 620px)"));
    assert_eq!(html.matches("<style>").count(), 1);
    // Plain rules no longer live in the stylesheet.
    assert!(!html.contains("body { margin:0"));
}

#[test]
fn container_keeps_its_own_declarations() {
    let html = render_template_to_html(&Template::empty());
    assert!(html.contains(
        "style=\"border-collapse: collapse; mso-table-lspace: 0pt; mso-table-rspace: 0pt; \
         width: 600px; margin: 0 auto; background: #ffffff;\""
    ));
}

// ─── Block rows ──────────────────────────────────────────────────────────

#[test]
fn one_row_per_top_level_block_in_order() {
    let blocks = vec![
        create_default_block("header"),
        create_default_block("image"),
        create_default_block("divider"),
        create_default_block("footer"),
    ];
    let html = render_template_to_html(&template(blocks));
    let body = rows(&html);
    let logo = body.find(">Logo</span>").unwrap();
    let image = body.find("placehold.co").unwrap();
    let divider = body.find("border-top:1px solid #e4e4e7").unwrap();
    let footer = body.find("Company Inc.").unwrap();
    assert!(logo < image && image < divider && divider < footer);
}

#[test]
fn columns_render_children_in_their_own_column() {
    let mut block = create_default_block("columns-2");
    block.as_columns_mut().unwrap().columns[0]
        .children
        .push(create_default_block("spacer"));
    let html = render_template_to_html(&template(vec![block]));

    let cells: Vec<&str> = html.split("<td class=\"stack\"").skip(1).collect();
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].matches("line-height:16px").count(), 1);
    assert_eq!(cells[1].matches("line-height:16px").count(), 0);
    assert!(cells[0].starts_with(" width=\"50%\""));
}

#[test]
fn script_in_text_html_passes_through() {
    let mut block = create_default_block("text");
    if let Block::Text(text) = &mut block {
        text.html = "<p>Hi</p><script>track(\"open\")</script>".to_string();
    }
    let html = render_template_to_html(&template(vec![block]));
    assert!(html.contains("<p>Hi</p><script>track(\"open\")</script>"));
    assert!(!html.contains("&lt;script"));
}

#[test]
fn free_text_is_escaped() {
    let mut block = create_default_block("button");
    if let Block::Button(button) = &mut block {
        button.text = "Save 50% <today> & more".to_string();
    }
    let html = render_template_to_html(&template(vec![block]));
    assert!(html.contains(">Save 50% &lt;today&gt; &amp; more</a>"));
}

#[test]
fn rendering_is_deterministic() {
    let blocks = BlockKey::ALL.iter().map(|k| k.create()).collect();
    let t = template(blocks);
    assert_eq!(render_template_to_html(&t), render_template_to_html(&t));
}
