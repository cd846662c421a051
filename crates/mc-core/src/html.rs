//! HTML compiler: Template → email-client-safe HTML.
//!
//! Every top-level block becomes one `<tr>` of a fixed 600px container
//! table. Layout is expressed with nested tables and per-element inline
//! styles, since many email clients ignore or strip `<style>` blocks and
//! do not support modern CSS layout. The finished document goes through
//! [`inline_css`] so the few stylesheet rules also land on elements.

use crate::inline::inline_css;
use crate::model::*;
use std::fmt::Write;

// ─── Public API ──────────────────────────────────────────────────────────

/// Compile a template into a complete, self-contained HTML document.
///
/// Pure: the output depends only on `template`.
#[must_use]
pub fn render_template_to_html(template: &Template) -> String {
    inline_css(&render_document(template))
}

/// The document before CSS inlining: rows wrapped in the email shell with
/// its embedded stylesheet still in `<head>`.
#[must_use]
pub fn render_document(template: &Template) -> String {
    let mut rows = String::with_capacity(1024);
    for block in &template.blocks {
        render_block(&mut rows, block);
    }

    let mut out = String::with_capacity(rows.len() + 2048);
    out.push_str("<!doctype html>\n<html>\n  <head>\n");
    out.push_str(
        "    <meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\" />\n",
    );
    out.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    out.push_str("    <meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge\" />\n");
    let _ = writeln!(out, "    <title>{}</title>", escape_html(&template.name));
    out.push_str(EMAIL_STYLESHEET);
    out.push_str("  </head>\n  <body>\n");
    out.push_str("    <center style=\"width:100%; background:#f4f4f5;\">\n");
    out.push_str(
        "      <table role=\"presentation\" cellspacing=\"0\" cellpadding=\"0\" border=\"0\" \
         align=\"center\" width=\"600\" class=\"container\" \
         style=\"width:600px; margin:0 auto; background:#ffffff;\">\n",
    );
    out.push_str("        <tbody>\n");
    out.push_str(&rows);
    out.push_str("\n        </tbody>\n      </table>\n    </center>\n  </body>\n</html>\n");
    out
}

/// Append the `<tr>` for one block. Columns recurse into their children.
pub fn render_block(out: &mut String, block: &Block) {
    match block {
        Block::Text(b) => render_text(out, b),
        Block::Image(b) => render_image(out, b),
        Block::Button(b) => render_button(out, b),
        Block::Divider(b) => render_divider(out, b),
        Block::Spacer(b) => render_spacer(out, b),
        Block::Icon(b) => render_icon(out, b),
        Block::Social(b) => render_social(out, b),
        Block::Columns(b) => render_columns(out, b),
        Block::Header(b) => render_header(out, b),
        Block::Footer(b) => render_footer(out, b),
    }
}

/// Escape `&`, `<`, `>` for text content.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape for a double-quoted attribute value: text escaping plus `"`.
pub fn escape_attr(input: &str) -> String {
    escape_html(input).replace('"', "&quot;")
}

// ─── Stylesheet ──────────────────────────────────────────────────────────

/// Embedded stylesheet. Plain rules are inlined onto elements; the media
/// query survives in `<head>` and stacks columns on narrow screens.
const EMAIL_STYLESHEET: &str = r#"    <style>
      @media only screen and (max-width: 620px) {
        .container { width: 100% !important; max-width: 100% !important; }
        .stack { display:block !important; width:100% !important; }
        table[role="presentation"] { width: 100% !important; }
        td[class="stack"] { display: block !important; width: 100% !important; padding: 8px 0 !important; }
      }
      body { margin:0; padding:0; background:#f4f4f5; font-family: Arial, sans-serif; -webkit-text-size-adjust: 100%; -ms-text-size-adjust: 100%; }
      table { border-collapse: collapse; mso-table-lspace: 0pt; mso-table-rspace: 0pt; }
    </style>
"#;

// ─── Block renderers ─────────────────────────────────────────────────────

fn render_text(out: &mut String, b: &TextBlock) {
    let style = format!(
        "font-family:{}; font-size:{}px; color:{}; text-align:{}; padding:{};",
        b.font_family,
        b.font_size,
        b.color,
        b.align.as_css(),
        b.padding.to_css()
    );
    // The fragment is pre-sanitized by the rich-text editor: no escaping.
    let _ = write!(
        out,
        "<tr><td style=\"{}\">{}</td></tr>",
        escape_attr(&style),
        b.html
    );
}

fn render_image(out: &mut String, b: &ImageBlock) {
    let align = match b.align {
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Left | Alignment::Justify => "left",
    };
    // Outlook honours the width attribute, not the style; 100% maps to the
    // container width.
    let width_attr = if b.width == "100%" {
        "600"
    } else {
        b.width.as_str()
    };
    let img_style = format!(
        "display:block; width:{}; height:{}; border:0; outline:none; text-decoration:none;",
        b.width, b.height
    );
    let img = format!(
        "<img src=\"{}\" alt=\"{}\" width=\"{}\" style=\"{}\"/>",
        escape_attr(&b.url),
        escape_attr(&b.alt),
        escape_attr(width_attr),
        escape_attr(&img_style)
    );
    let content = match b.link.as_deref().filter(|l| !l.is_empty()) {
        Some(link) => format!("<a href=\"{}\">{img}</a>", escape_attr(link)),
        None => img,
    };
    let _ = write!(
        out,
        "<tr><td style=\"text-align:{align}; padding:{};\">{content}</td></tr>",
        b.padding.to_css()
    );
}

fn render_button(out: &mut String, b: &ButtonBlock) {
    let full = b.align == ButtonAlign::Full;
    let mut style = format!(
        "background:{}; color:{}; text-decoration:none; border-radius:{}px; font-size:{}px; display:{};",
        b.bg,
        b.color,
        b.radius,
        b.font_size,
        if full { "block" } else { "inline-block" }
    );
    if full {
        style.push_str(" width:100%; text-align:center;");
    }
    let _ = write!(style, " padding:{}px {}px;", b.padding_v, b.padding_h);

    let _ = write!(
        out,
        "<tr><td style=\"text-align:{}; padding:0;\"><a href=\"{}\" style=\"{}\">{}</a></td></tr>",
        b.align.as_css(),
        escape_attr(&b.url),
        escape_attr(&style),
        escape_html(&b.text)
    );
}

fn render_divider(out: &mut String, b: &DividerBlock) {
    let style = format!(
        "border-top:{}px {} {}; height:0; margin:0;",
        b.thickness,
        b.style.as_css(),
        b.color
    );
    let _ = write!(
        out,
        "<tr><td style=\"padding:{}px 0 {}px 0;\"><div style=\"{}\"></div></td></tr>",
        b.padding.top,
        b.padding.bottom,
        escape_attr(&style)
    );
}

fn render_spacer(out: &mut String, b: &SpacerBlock) {
    let _ = write!(
        out,
        "<tr><td style=\"line-height:{h}px; height:{h}px; font-size:0;\">&nbsp;</td></tr>",
        h = b.height
    );
}

fn render_icon(out: &mut String, b: &IconBlock) {
    let size = if b.size > 0.0 { b.size } else { 24.0 };
    let color = if b.color.is_empty() {
        "#6b7280"
    } else {
        b.color.as_str()
    };
    let shape = match IconShape::from_name(&b.icon) {
        IconShape::Square => format!(
            "<div style=\"width:{size}px; height:{size}px; background:{}; border-radius:4px; display:inline-block;\"></div>",
            escape_attr(color)
        ),
        IconShape::Star => format!(
            "<span style=\"font-size:{size}px; color:{}; display:inline-block;\">★</span>",
            escape_attr(color)
        ),
        IconShape::Circle => format!(
            "<div style=\"width:{size}px; height:{size}px; background:{}; border-radius:50%; display:inline-block;\"></div>",
            escape_attr(color)
        ),
    };
    let content = match b.url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => format!(
            "<a href=\"{}\" style=\"text-decoration:none;\">{shape}</a>",
            escape_attr(url)
        ),
        None => shape,
    };
    let _ = write!(
        out,
        "<tr><td style=\"text-align:center; padding:8px 0;\">{content}</td></tr>"
    );
}

fn render_social(out: &mut String, b: &SocialBlock) {
    let mut icons = String::new();
    for link in &b.platforms {
        let platform = find_platform(&link.key);
        let _ = write!(
            icons,
            "<a href=\"{}\" style=\"display:inline-block; width:{s}px; height:{s}px; margin-right:{}px; \
             text-align:center; line-height:{s}px; background:{}; color:#ffffff; text-decoration:none; \
             border-radius:50%; vertical-align:middle;\" title=\"{}\">{}</a>",
            escape_attr(&link.url),
            b.gap,
            platform_color(platform),
            escape_attr(platform_label(platform, &link.key)),
            social_icon_svg(&link.key, b.size, "#ffffff"),
            s = b.size,
        );
    }
    let _ = write!(
        out,
        "<tr><td style=\"text-align:{}; padding:8px 0;\">{icons}</td></tr>",
        match b.align {
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Left | Alignment::Justify => "left",
        }
    );
}

fn render_header(out: &mut String, b: &HeaderBlock) {
    let bg = b.bg.as_deref().unwrap_or("#ffffff");
    let color = b.color.as_deref().unwrap_or("#111111");
    let logo_width = b.logo_width.unwrap_or(200.0);

    let logo = match b.logo_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => {
            let sizing = match b.logo_height {
                Some(h) if h > 0.0 => format!("height:{h}px; object-fit:contain;"),
                _ => "height:auto;".to_string(),
            };
            format!(
                "<img src=\"{}\" alt=\"logo\" style=\"display:block; max-width:{logo_width}px; width:100%; {sizing}\"/>",
                escape_attr(url)
            )
        }
        None => "<span style=\"font-size:14px;\">Logo</span>".to_string(),
    };

    let mut menu = String::new();
    for item in &b.menu {
        let _ = write!(
            menu,
            "<a href=\"{}\" style=\"color:{}; text-decoration:none; margin-left:12px; font-size:14px; white-space:nowrap;\">{}</a>",
            escape_attr(&item.url),
            escape_attr(color),
            escape_html(&item.text)
        );
    }

    let _ = write!(
        out,
        "<tr><td style=\"background:{}; color:{}; padding:{};\">\
         <table role=\"presentation\" width=\"100%\"><tr>\
         <td align=\"left\" style=\"max-width:{logo_width}px;\">{logo}</td>\
         <td align=\"right\">{menu}</td>\
         </tr></table></td></tr>",
        escape_attr(bg),
        escape_attr(color),
        b.padding.to_css()
    );
}

fn render_footer(out: &mut String, b: &FooterBlock) {
    // Zero or missing sides fall back to 12px.
    let side = |v: Option<f64>| v.filter(|v| *v != 0.0).unwrap_or(12.0);
    let pad = format!(
        "{}px {}px {}px {}px",
        side(b.padding.map(|p| p.top)),
        side(b.padding.map(|p| p.right)),
        side(b.padding.map(|p| p.bottom)),
        side(b.padding.map(|p| p.left))
    );

    let mut parts = String::new();
    let _ = write!(
        parts,
        "<div style=\"font-weight:600; font-size:14px;\">{}</div>",
        escape_html(&b.company)
    );
    if let Some(address) = b.address.as_deref().filter(|a| !a.is_empty()) {
        let _ = write!(
            parts,
            "<div style=\"opacity:.7; font-size:12px; margin-top:4px;\">{}</div>",
            escape_html(address)
        );
    }
    if !b.socials.is_empty() {
        parts.push_str("<div style=\"margin-top:12px;\">");
        for link in &b.socials {
            let platform = find_platform(&link.key);
            let _ = write!(
                parts,
                "<a href=\"{}\" style=\"display:inline-block; width:32px; height:32px; line-height:32px; \
                 text-align:center; background:{}; color:#ffffff; text-decoration:none; margin:0 4px; \
                 border-radius:50%; vertical-align:middle;\" title=\"{}\">{}</a>",
                escape_attr(&link.url),
                platform_color(platform),
                escape_attr(platform_label(platform, &link.key)),
                social_icon_svg(&link.key, 24.0, "#ffffff")
            );
        }
        parts.push_str("</div>");
    }
    if let Some(text) = b.unsubscribe_text.as_deref().filter(|t| !t.is_empty()) {
        let _ = write!(
            parts,
            "<div style=\"margin-top:12px; opacity:.7; font-size:11px;\">{}</div>",
            escape_html(text)
        );
    }
    if let Some(text) = b.copyright.as_deref().filter(|t| !t.is_empty()) {
        let _ = write!(
            parts,
            "<div style=\"margin-top:8px; opacity:.7; font-size:11px;\">{}</div>",
            escape_html(text)
        );
    }

    let _ = write!(
        out,
        "<tr><td style=\"background:{}; color:{}; text-align:center; padding:{pad};\">{parts}</td></tr>",
        escape_attr(b.bg.as_deref().unwrap_or("#f4f4f5")),
        escape_attr(b.color.as_deref().unwrap_or("#111111"))
    );
}

fn render_columns(out: &mut String, b: &ColumnsBlock) {
    let fallback = 1.0 / b.columns.len().max(1) as f64;
    let mut cells = String::new();
    for (idx, column) in b.columns.iter().enumerate() {
        let ratio = b.widths.get(idx).copied().unwrap_or(fallback);
        let percent = (ratio * 100.0).round();
        let mut inner = String::new();
        for child in &column.children {
            render_block(&mut inner, child);
        }
        let _ = write!(
            cells,
            "<td class=\"stack\" width=\"{percent}%\" style=\"vertical-align:top; padding:0 {}px;\">\
             <table role=\"presentation\" width=\"100%\" cellspacing=\"0\" cellpadding=\"0\" border=\"0\">\
             <tbody>{inner}</tbody></table></td>",
            b.gap / 2.0
        );
    }
    let _ = write!(
        out,
        "<tr><td style=\"background:{}; padding:{};\">\
         <table role=\"presentation\" width=\"100%\" cellspacing=\"0\" cellpadding=\"0\" border=\"0\">\
         <tbody><tr>{cells}</tr></tbody></table></td></tr>",
        escape_attr(b.background.as_deref().unwrap_or("#ffffff")),
        b.padding.to_css()
    );
}

// ─── Social platforms ────────────────────────────────────────────────────

struct Platform {
    key: &'static str,
    label: &'static str,
    color: &'static str,
    /// 24×24 viewBox path.
    path: &'static str,
}

const PLATFORMS: &[Platform] = &[
    Platform {
        key: "facebook",
        label: "Facebook",
        color: "#1877F2",
        path: "M24 12.073c0-6.627-5.373-12-12-12s-12 5.373-12 12c0 5.99 4.388 10.954 10.125 11.854v-8.385H7.078v-3.47h3.047V9.43c0-3.007 1.792-4.669 4.533-4.669 1.312 0 2.686.235 2.686.235v2.953H15.83c-1.491 0-1.956.925-1.956 1.874v2.25h3.328l-.532 3.47h-2.796v8.385C19.612 23.027 24 18.062 24 12.073z",
    },
    Platform {
        key: "twitter",
        label: "Twitter",
        color: "#1DA1F2",
        path: "M23.953 4.57a10 10 0 01-2.825.775 4.958 4.958 0 002.163-2.723c-.951.555-2.005.959-3.127 1.184a4.92 4.92 0 00-8.384 4.482C7.69 8.095 4.067 6.13 1.64 3.162a4.822 4.822 0 00-.666 2.475c0 1.71.87 3.213 2.188 4.096a4.904 4.904 0 01-2.228-.616v.06a4.923 4.923 0 003.946 4.827 4.996 4.996 0 01-2.212.085 4.936 4.936 0 004.604 3.417 9.867 9.867 0 01-6.102 2.105c-.39 0-.779-.023-1.17-.067a13.995 13.995 0 007.557 2.209c9.053 0 13.998-7.496 13.998-13.985 0-.21 0-.42-.015-.63A9.935 9.935 0 0024 4.59z",
    },
    Platform {
        key: "instagram",
        label: "Instagram",
        color: "#E4405F",
        path: "M12 2.163c3.204 0 3.584.012 4.85.07 3.252.148 4.771 1.691 4.919 4.919.058 1.265.069 1.645.069 4.849 0 3.205-.012 3.584-.069 4.849-.149 3.225-1.664 4.771-4.919 4.919-1.266.058-1.644.07-4.85.07-3.204 0-3.584-.012-4.849-.07-3.26-.149-4.771-1.699-4.919-4.92-.058-1.265-.07-1.644-.07-4.849 0-3.204.013-3.583.07-4.849.149-3.227 1.664-4.771 4.919-4.919 1.266-.057 1.645-.069 4.849-.069zm0-2.163c-3.259 0-3.667.014-4.947.072-4.358.2-6.78 2.618-6.98 6.98-.059 1.281-.073 1.689-.073 4.948 0 3.259.014 3.668.072 4.948.2 4.358 2.618 6.78 6.98 6.98 1.281.058 1.689.072 4.948.072 3.259 0 3.668-.014 4.948-.072 4.354-.2 6.782-2.618 6.979-6.98.059-1.28.073-1.689.073-4.948 0-3.259-.014-3.667-.072-4.947-.196-4.354-2.617-6.78-6.979-6.98-1.281-.059-1.69-.073-4.949-.073zm0 5.838c-3.403 0-6.162 2.759-6.162 6.162s2.759 6.163 6.162 6.163 6.162-2.759 6.162-6.163c0-3.403-2.759-6.162-6.162-6.162zm0 10.162c-2.209 0-4-1.79-4-4 0-2.209 1.791-4 4-4s4 1.791 4 4c0 2.21-1.791 4-4 4zm6.406-11.845c-.796 0-1.441.645-1.441 1.44s.645 1.44 1.441 1.44c.795 0 1.439-.645 1.439-1.44s-.644-1.44-1.439-1.44z",
    },
    Platform {
        key: "linkedin",
        label: "LinkedIn",
        color: "#0077B5",
        path: "M20.447 20.452h-3.554v-5.569c0-1.328-.027-3.037-1.852-3.037-1.853 0-2.136 1.445-2.136 2.939v5.667H9.351V9h3.414v1.561h.046c.477-.9 1.637-1.85 3.37-1.85 3.601 0 4.267 2.37 4.267 5.455v6.286zM5.337 7.433c-1.144 0-2.063-.926-2.063-2.065 0-1.138.92-2.063 2.063-2.063 1.14 0 2.064.925 2.064 2.063 0 1.139-.925 2.065-2.064 2.065zm1.782 13.019H3.555V9h3.564v11.452zM22.225 0H1.771C.792 0 0 .774 0 1.729v20.542C0 23.227.792 24 1.771 24h20.451C23.2 24 24 23.227 24 22.271V1.729C24 .774 23.2 0 22.222 0h.003z",
    },
    Platform {
        key: "youtube",
        label: "YouTube",
        color: "#FF0000",
        path: "M23.498 6.186a3.016 3.016 0 0 0-2.122-2.136C19.505 3.545 12 3.545 12 3.545s-7.505 0-9.377.505A3.017 3.017 0 0 0 .502 6.186C0 8.07 0 12 0 12s0 3.93.502 5.814a3.016 3.016 0 0 0 2.122 2.136c1.871.505 9.376.505 9.376.505s7.505 0 9.377-.505a3.015 3.015 0 0 0 2.122-2.136C24 15.93 24 12 24 12s0-3.93-.502-5.814zM9.545 15.568V8.432L15.818 12l-6.273 3.568z",
    },
    Platform {
        key: "github",
        label: "GitHub",
        color: "#181717",
        path: "M12 0c-6.626 0-12 5.373-12 12 0 5.302 3.438 9.8 8.207 11.387.599.111.793-.261.793-.577v-2.234c-3.338.726-4.033-1.416-4.033-1.416-.546-1.387-1.333-1.756-1.333-1.756-1.089-.745.083-.729.083-.729 1.205.084 1.839 1.237 1.839 1.237 1.07 1.834 2.807 1.304 3.492.997.107-.775.418-1.305.762-1.604-2.665-.305-5.467-1.334-5.467-5.931 0-1.311.469-2.381 1.236-3.221-.124-.303-.535-1.524.117-3.176 0 0 1.008-.322 3.301 1.23.957-.266 1.983-.399 3.003-.404 1.02.005 2.047.138 3.006.404 2.291-1.552 3.297-1.23 3.297-1.23.653 1.653.242 2.874.118 3.176.77.84 1.235 1.911 1.235 3.221 0 4.609-2.807 5.624-5.479 5.921.43.372.823 1.102.823 2.222v3.293c0 .319.192.694.801.576 4.765-1.589 8.199-6.086 8.199-11.386 0-6.627-5.373-12-12-12z",
    },
    Platform {
        key: "tiktok",
        label: "TikTok",
        color: "#000000",
        path: "M19.59 6.69a4.83 4.83 0 0 1-3.77-4.25V2h-3.45v13.67a2.89 2.89 0 0 1-5.2 1.74 2.89 2.89 0 0 1 2.31-4.64 2.93 2.93 0 0 1 .88.13V9.4a6.84 6.84 0 0 0-1-.05A6.33 6.33 0 0 0 5 20.1a6.34 6.34 0 0 0 10.86-4.43v-7a8.16 8.16 0 0 0 4.77 1.52v-3.4a4.85 4.85 0 0 1-1-.1z",
    },
    Platform {
        key: "pinterest",
        label: "Pinterest",
        color: "#BD081C",
        path: "M12.017 0C5.396 0 .029 5.367.029 11.987c0 5.079 3.158 9.417 7.618 11.174-.105-.949-.199-2.403.041-3.439.219-.937 1.406-5.957 1.406-5.957s-.359-.72-.359-1.781c0-1.663.967-2.911 2.168-2.911 1.024 0 1.518.769 1.518 1.688 0 1.029-.653 2.567-.992 3.992-.285 1.193.6 2.165 1.775 2.165 2.128 0 3.768-2.245 3.768-5.487 0-2.861-2.063-4.869-5.008-4.869-3.41 0-5.409 2.562-5.409 5.199 0 1.033.394 2.143.889 2.741.099.12.112.225.085.345-.09.375-.293 1.199-.334 1.363-.053.225-.172.271-.402.165-1.495-.69-2.433-2.878-2.433-4.646 0-3.776 2.748-7.252 7.92-7.252 4.158 0 7.392 2.967 7.392 6.923 0 4.135-2.607 7.462-6.233 7.462-1.214 0-2.357-.629-2.75-1.378l-.748 2.853c-.271 1.043-1.002 2.35-1.492 3.146C9.57 23.812 10.763 24.009 12.017 24c6.624 0 11.99-5.367 11.99-11.987C24.007 5.367 18.641.001 12.017.001z",
    },
    Platform {
        key: "snapchat",
        label: "Snapchat",
        color: "#FFFC00",
        path: "M12.206 0C8.8 0 5.413.528 3.617 3.568c-.125.22-.197.467-.197.72 0 .353.17.675.432.872.22.165.487.26.768.26.096 0 .19-.014.282-.038.412-.11.825-.22 1.238-.315.28-.064.56-.13.84-.17.28-.04.56-.07.84-.09.28-.02.56-.03.84-.03s.56.01.84.03c.28.02.56.05.84.09.28.04.56.106.84.17.413.095.826.205 1.238.315.092.024.186.038.282.038.281 0 .548-.095.768-.26.262-.197.432-.52.432-.872 0-.253-.072-.5-.197-.72C18.587.528 15.2 0 12.206 0zm-1.5 4.5c-.83 0-1.5.67-1.5 1.5s.67 1.5 1.5 1.5 1.5-.67 1.5-1.5-.67-1.5-1.5-1.5zm3 0c-.83 0-1.5.67-1.5 1.5s.67 1.5 1.5 1.5 1.5-.67 1.5-1.5-.67-1.5-1.5-1.5zm-1.5 3c-2.33 0-4.5 1.34-5.5 3.5 0 0-.5 1.5.5 2.5s2.5 1 3.5 1c.5 0 1 .5 1.5 1s1 1 1.5 1 1-.5 1.5-1 1-1 1.5-1c1 0 2.5 0 3.5-1s.5-2.5.5-2.5c-1-2.16-3.17-3.5-5.5-3.5z",
    },
];

fn find_platform(key: &str) -> Option<&'static Platform> {
    PLATFORMS.iter().find(|p| p.key.eq_ignore_ascii_case(key))
}

fn platform_color(platform: Option<&Platform>) -> &'static str {
    platform.map_or("#6b7280", |p| p.color)
}

fn platform_label<'a>(platform: Option<&'static Platform>, key: &'a str) -> &'a str {
    platform.map_or(key, |p| p.label)
}

/// Brand icon for a platform as inline SVG, or a one-letter glyph for
/// platforms without an icon.
fn social_icon_svg(key: &str, size: f64, color: &str) -> String {
    match find_platform(key) {
        Some(platform) => {
            let icon = (size * 0.7).round();
            format!(
                "<svg width=\"{icon}\" height=\"{icon}\" viewBox=\"0 0 24 24\" fill=\"{color}\" \
                 xmlns=\"http://www.w3.org/2000/svg\" style=\"display:inline-block; width:{icon}px; \
                 height:{icon}px; vertical-align:middle;\"><path d=\"{}\"/></svg>",
                platform.path
            )
        }
        None => {
            let glyph: String = key
                .chars()
                .next()
                .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect());
            format!(
                "<span style=\"color:#ffffff; font-size:{}px; font-weight:bold; line-height:{size}px; \
                 display:inline-block; vertical-align:middle;\">{}</span>",
                (size * 0.5).max(10.0),
                escape_html(&glyph)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::BlockKey;
    use crate::id::BlockId;

    fn row(block: &Block) -> String {
        let mut out = String::new();
        render_block(&mut out, block);
        out
    }

    #[test]
    fn escapes_minimal_set() {
        assert_eq!(escape_html("a & <b> \"c\""), "a &amp; &lt;b&gt; \"c\"");
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn every_key_renders_exactly_one_outer_row() {
        for key in BlockKey::ALL {
            let html = row(&key.create());
            assert!(html.starts_with("<tr><td"), "{key}: {html}");
            assert!(html.ends_with("</td></tr>"), "{key}: {html}");
        }
    }

    #[test]
    fn text_html_is_verbatim() {
        let block = Block::Text(TextBlock {
            id: BlockId::intern("raw"),
            html: "<p>Hi <script>alert(1)</script></p>".into(),
            font_family: "Arial".into(),
            font_size: 16.0,
            color: "#111111".into(),
            align: Alignment::Left,
            padding: Padding::uniform(8.0),
        });
        let html = row(&block);
        assert!(html.contains("<p>Hi <script>alert(1)</script></p>"));
        assert!(html.contains("padding:8px 8px 8px 8px;"));
    }

    #[test]
    fn full_width_button_is_block() {
        let Block::Button(mut b) = BlockKey::Button.create() else {
            unreachable!()
        };
        b.align = ButtonAlign::Full;
        b.text = "Buy <now>".into();
        let html = row(&Block::Button(b));
        assert!(html.contains("text-align:center; padding:0;"));
        assert!(html.contains("display:block; width:100%; text-align:center;"));
        assert!(html.contains("Buy &lt;now&gt;"));
    }

    #[test]
    fn image_full_width_uses_container_attr_and_link() {
        let Block::Image(mut b) = BlockKey::Image.create() else {
            unreachable!()
        };
        b.link = Some("https://example.com/?a=1&b=2".into());
        let html = row(&Block::Image(b));
        assert!(html.contains("width=\"600\""));
        assert!(html.contains("<a href=\"https://example.com/?a=1&amp;b=2\"><img"));
    }

    #[test]
    fn spacer_sets_line_height() {
        let html = row(&Block::Spacer(SpacerBlock {
            id: BlockId::intern("sp"),
            height: 32.0,
        }));
        assert_eq!(
            html,
            "<tr><td style=\"line-height:32px; height:32px; font-size:0;\">&nbsp;</td></tr>"
        );
    }

    #[test]
    fn unknown_platform_falls_back_to_glyph() {
        let block = Block::Social(SocialBlock {
            id: BlockId::intern("soc"),
            platforms: vec![SocialLink::new("mastodon", "https://m.example")],
            size: 20.0,
            gap: 12.0,
            align: Alignment::Right,
        });
        let html = row(&block);
        assert!(html.contains(">M</span>"));
        assert!(html.contains("background:#6b7280"));
        assert!(html.contains("title=\"mastodon\""));
        assert!(html.contains("text-align:right;"));
    }

    #[test]
    fn known_platform_uses_brand_color_and_svg() {
        let html = social_icon_svg("linkedin", 20.0, "#ffffff");
        assert!(html.starts_with("<svg width=\"14\""));
        assert_eq!(platform_color(find_platform("linkedin")), "#0077B5");
    }

    #[test]
    fn header_without_logo_shows_placeholder() {
        let html = row(&BlockKey::Header.create());
        assert!(html.contains("<span style=\"font-size:14px;\">Logo</span>"));
        assert!(html.contains(">Home</a>"));
        assert!(html.contains("max-width:200px;"));
    }

    #[test]
    fn footer_defaults_padding_to_twelve() {
        let html = row(&BlockKey::Footer.create());
        assert!(html.contains("padding:12px 12px 12px 12px;"));
        assert!(html.contains("Company Inc."));
        assert!(html.contains("Unsubscribe"));
    }

    #[test]
    fn columns_emit_percent_widths() {
        let html = row(&BlockKey::Columns3.create());
        assert_eq!(html.matches("width=\"33%\"").count(), 3);
        assert!(html.contains("padding:0 8px;"));
    }

    #[test]
    fn title_is_escaped() {
        let mut template = Template::empty();
        template.name = "Q&A <weekly>".into();
        let doc = render_document(&template);
        assert!(doc.contains("<title>Q&amp;A &lt;weekly&gt;</title>"));
    }
}
