//! CSS inlining pass.
//!
//! Copies declarations from a document's `<style>` rules onto the inline
//! `style` attribute of every matching start tag, for email clients that
//! strip `<style>` entirely. Rules that cannot be expressed inline
//! (`@media`, pseudo-classes, combinators) are kept in a single `<style>`
//! element in place of the originals.
//!
//! Supported selectors are compound selectors without combinators:
//! `td`, `*`, `.stack`, `table[role="presentation"]`, `td[class]`, and
//! comma lists of those. Built on `winnow` 0.7.

use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Inline the document's stylesheet into element `style` attributes.
///
/// Content of `<script>` and `<style>` elements is never rewritten, and
/// tags that match no rule are copied byte-for-byte.
#[must_use]
pub fn inline_css(html: &str) -> String {
    let mut css = String::new();
    for token in Tokens::new(html) {
        if let Token::Raw { tag: "style", text } = token {
            css.push_str(text);
            css.push('\n');
        }
    }
    if css.is_empty() {
        return html.to_string();
    }

    let sheet = parse_stylesheet(&css);
    let mut out = String::with_capacity(html.len() + html.len() / 4);
    let mut style = StyleElement::Outside;
    let mut retained_written = false;

    for token in Tokens::new(html) {
        match token {
            Token::Start(tag) if tag.name.eq_ignore_ascii_case("style") => {
                if !retained_written && !sheet.retained.is_empty() {
                    out.push_str(tag.src);
                    out.push('\n');
                    out.push_str(&sheet.retained.join("\n"));
                    out.push('\n');
                    style = StyleElement::Keep;
                } else {
                    style = StyleElement::Drop;
                }
                retained_written = true;
            }
            Token::Raw { tag: "style", .. } => {}
            Token::Markup(src) if style != StyleElement::Outside => {
                if style == StyleElement::Keep {
                    out.push_str(src);
                }
                style = StyleElement::Outside;
            }
            Token::Start(tag) => match merged_style(&sheet, &tag) {
                Some(merged) => out.push_str(&tag.with_style(&merged)),
                None => out.push_str(tag.src),
            },
            Token::Text(s) | Token::Markup(s) | Token::Raw { text: s, .. } => out.push_str(s),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleElement {
    Outside,
    Keep,
    Drop,
}

// ─── Stylesheet model ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct Declaration {
    property: String,
    value: String,
    important: bool,
}

/// `(classes + attributes, type selectors)`. No id selectors are supported.
type Specificity = (u32, u32);

#[derive(Debug, Clone, PartialEq, Default)]
struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrSelector {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Rule {
    selectors: Vec<Selector>,
    declarations: Vec<Declaration>,
}

#[derive(Debug, Default)]
struct Stylesheet {
    rules: Vec<Rule>,
    /// Raw text of rules that must stay in `<style>`.
    retained: Vec<String>,
}

impl Selector {
    fn specificity(&self) -> Specificity {
        (
            (self.classes.len() + self.attrs.len()) as u32,
            u32::from(self.tag.is_some()),
        )
    }

    fn matches(&self, tag: &StartTag<'_>) -> bool {
        if self
            .tag
            .as_deref()
            .is_some_and(|name| !tag.name.eq_ignore_ascii_case(name))
        {
            return false;
        }
        let classes_ok = self.classes.iter().all(|class| {
            tag.attr("class")
                .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
        });
        classes_ok
            && self.attrs.iter().all(|a| match (tag.attr(&a.name), &a.value) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
            })
    }
}

// ─── Stylesheet parsing ──────────────────────────────────────────────────

fn parse_stylesheet(css: &str) -> Stylesheet {
    let cleaned = strip_comments(css);
    let mut input = cleaned.as_str();
    let mut sheet = Stylesheet::default();

    loop {
        skip_space(&mut input);
        if input.is_empty() {
            break;
        }
        let before = input;
        if input.starts_with('@') {
            match at_rule.parse_next(&mut input) {
                Ok(raw) => sheet.retained.push(raw.trim().to_string()),
                Err(_) => {
                    sheet.retained.push(before.trim().to_string());
                    break;
                }
            }
            continue;
        }

        let Ok((selector_text, body)) = style_rule.parse_next(&mut input) else {
            sheet.retained.push(before.trim().to_string());
            break;
        };
        let raw = &before[..before.len() - input.len()];
        let mut selectors = Vec::new();
        let mut unsupported = false;
        for part in selector_text.split(',') {
            match parse_selector(part) {
                Some(sel) => selectors.push(sel),
                None => unsupported = true,
            }
        }
        if unsupported {
            sheet.retained.push(raw.trim().to_string());
        }
        if !selectors.is_empty() {
            sheet.rules.push(Rule {
                selectors,
                declarations: parse_declarations(body),
            });
        }
    }
    sheet
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        rest = match rest[start + 2..].find("*/") {
            Some(end) => &rest[start + 2 + end + 2..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}

fn skip_space(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> = multispace0.parse_next(input);
}

fn ident<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '-' || c == '_').parse_next(input)
}

/// `selector-list { body }` → `(selector-list, body)`.
fn style_rule<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    let selectors = take_till(1.., '{').parse_next(input)?;
    let body = delimited('{', take_till(0.., '}'), '}').parse_next(input)?;
    Ok((selectors, body))
}

/// An at-rule through its terminating `;` or balanced block.
fn at_rule<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let start = *input;
    preceded('@', ident).parse_next(input)?;
    take_till(0.., |c: char| c == '{' || c == ';').parse_next(input)?;

    if let Some(rest) = input.strip_prefix(';') {
        *input = rest;
    } else {
        let mut depth = 0usize;
        let mut end = None;
        for (i, c) in input.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        end = Some(i + 1);
                        break;
                    }
                }
                _ => {}
            }
        }
        let end = end.ok_or_else(|| ErrMode::Backtrack(ContextError::new()))?;
        *input = &input[end..];
    }
    Ok(&start[..start.len() - input.len()])
}

/// One compound selector; `None` when it uses anything unsupported.
fn parse_selector(text: &str) -> Option<Selector> {
    let mut input = text.trim();
    let sel = compound_selector.parse_next(&mut input).ok()?;
    input.is_empty().then_some(sel)
}

fn compound_selector(input: &mut &str) -> ModalResult<Selector> {
    let universal = opt('*').parse_next(input)?.is_some();
    let tag = if universal {
        None
    } else {
        opt(ident).parse_next(input)?.map(str::to_ascii_lowercase)
    };
    let mut sel = Selector {
        tag,
        ..Selector::default()
    };
    loop {
        if let Some(rest) = input.strip_prefix('.') {
            *input = rest;
            sel.classes.push(ident.parse_next(input)?.to_string());
        } else if input.starts_with('[') {
            sel.attrs.push(attr_selector.parse_next(input)?);
        } else {
            break;
        }
    }
    if !universal && sel.tag.is_none() && sel.classes.is_empty() && sel.attrs.is_empty() {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    Ok(sel)
}

fn attr_selector(input: &mut &str) -> ModalResult<AttrSelector> {
    let (name, value) = delimited(
        ('[', multispace0),
        (
            ident,
            opt(preceded((multispace0, '=', multispace0), attr_value)),
        ),
        (multispace0, ']'),
    )
    .parse_next(input)?;
    Ok(AttrSelector {
        name: name.to_ascii_lowercase(),
        value: value.map(str::to_string),
    })
}

fn quoted<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
    ))
    .parse_next(input)
}

fn attr_value<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt((quoted, ident)).parse_next(input)
}

/// Parse a declaration block (`a: b; c: d !important`). Malformed entries
/// are skipped.
fn parse_declarations(body: &str) -> Vec<Declaration> {
    let mut input = body;
    let mut out = Vec::new();
    loop {
        let _: Result<&str, ErrMode<ContextError>> =
            take_while(0.., |c: char| c.is_whitespace() || c == ';').parse_next(&mut input);
        if input.is_empty() {
            break;
        }
        match declaration.parse_next(&mut input) {
            Ok(Some(decl)) => out.push(decl),
            Ok(None) => {}
            Err(_) => {
                let skip = input.find(';').map_or(input.len(), |i| i + 1);
                input = &input[skip..];
            }
        }
    }
    out
}

fn declaration(input: &mut &str) -> ModalResult<Option<Declaration>> {
    let property = ident.parse_next(input)?;
    (multispace0, ':').parse_next(input)?;
    let raw = declaration_value(input);
    let mut value = raw.trim();
    let mut important = false;
    if let Some(idx) = value.to_ascii_lowercase().rfind("!important") {
        if value[idx..].trim().len() == "!important".len() {
            important = true;
            value = value[..idx].trim_end();
        }
    }
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(Declaration {
        property: property.to_ascii_lowercase(),
        value: value.to_string(),
        important,
    }))
}

/// Take a value up to the next `;` that is outside quotes and parentheses.
fn declaration_value<'a>(input: &mut &'a str) -> &'a str {
    let mut quote = None;
    let mut depth = 0usize;
    let mut end = input.len();
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    let value = &input[..end];
    *input = &input[end..];
    value
}

// ─── Merging ─────────────────────────────────────────────────────────────

struct Applied {
    property: String,
    value: String,
    important: bool,
    from_sheet: bool,
}

fn apply(merged: &mut Vec<Applied>, decl: &Declaration, from_sheet: bool) {
    match merged.iter_mut().find(|a| a.property == decl.property) {
        Some(slot) => {
            if slot.important && !decl.important {
                return;
            }
            slot.value.clone_from(&decl.value);
            slot.important = decl.important;
            slot.from_sheet = from_sheet;
        }
        None => merged.push(Applied {
            property: decl.property.clone(),
            value: decl.value.clone(),
            important: decl.important,
            from_sheet,
        }),
    }
}

/// The element's new `style` value, or `None` if no rule matches.
///
/// Stylesheet declarations apply in ascending specificity, then source
/// order. Existing inline declarations override them unless the sheet
/// marked the property `!important`.
fn merged_style(sheet: &Stylesheet, tag: &StartTag<'_>) -> Option<String> {
    let mut matched: Vec<(Specificity, usize, &Declaration)> = Vec::new();
    for (order, rule) in sheet.rules.iter().enumerate() {
        let Some(spec) = rule
            .selectors
            .iter()
            .filter(|s| s.matches(tag))
            .map(Selector::specificity)
            .max()
        else {
            continue;
        };
        matched.extend(rule.declarations.iter().map(|d| (spec, order, d)));
    }
    if matched.is_empty() {
        return None;
    }
    matched.sort_by_key(|(spec, order, _)| (*spec, *order));

    let mut merged = Vec::new();
    for (_, _, decl) in matched {
        apply(&mut merged, decl, true);
    }
    if let Some(existing) = tag.attr("style") {
        for decl in parse_declarations(existing) {
            apply(&mut merged, &decl, false);
        }
    }

    let parts: Vec<String> = merged
        .iter()
        .map(|a| {
            let value = a.value.replace('"', "&quot;");
            if a.important && !a.from_sheet {
                format!("{}: {value} !important;", a.property)
            } else {
                format!("{}: {value};", a.property)
            }
        })
        .collect();
    Some(parts.join(" "))
}

// ─── HTML tokenizer ──────────────────────────────────────────────────────

#[derive(Debug)]
struct Attr<'a> {
    name: &'a str,
    value: Option<&'a str>,
    /// Byte range of the whole attribute within the tag source.
    start: usize,
    end: usize,
}

#[derive(Debug)]
struct StartTag<'a> {
    /// Full tag text, `<` through `>`.
    src: &'a str,
    name: &'a str,
    attrs: Vec<Attr<'a>>,
    /// Offset of the closing `>` or `/>`.
    close: usize,
}

impl<'a> StartTag<'a> {
    fn parse(source: &'a str) -> Option<Self> {
        let mut input = source.strip_prefix('<')?;
        let name: &str = take_while::<_, _, ContextError>(1.., |c: char| {
            c.is_ascii_alphanumeric() || c == '-'
        })
            .parse_next(&mut input)
            .ok()?;
        let offset = |rest: &str| source.len() - rest.len();
        let mut attrs = Vec::new();
        loop {
            skip_space(&mut input);
            if input.starts_with("/>") || input.starts_with('>') {
                let close = offset(input);
                let len = close + if input.starts_with('>') { 1 } else { 2 };
                return Some(StartTag {
                    src: &source[..len],
                    name,
                    attrs,
                    close,
                });
            }
            let start = offset(input);
            let (name, value) = html_attribute.parse_next(&mut input).ok()?;
            attrs.push(Attr {
                name,
                value,
                start,
                end: offset(input),
            });
        }
    }

    fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.unwrap_or(""))
    }

    /// The tag with its `style` attribute replaced or appended.
    fn with_style(&self, style: &str) -> String {
        let existing = self
            .attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case("style"));
        match existing {
            Some(attr) => format!(
                "{}style=\"{style}\"{}",
                &self.src[..attr.start],
                &self.src[attr.end..]
            ),
            None => format!(
                "{} style=\"{style}\"{}",
                self.src[..self.close].trim_end(),
                &self.src[self.close..]
            ),
        }
    }
}

fn html_attribute<'a>(input: &mut &'a str) -> ModalResult<(&'a str, Option<&'a str>)> {
    let name = take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'')
    })
    .parse_next(input)?;
    let value = opt(preceded(
        (multispace0, '=', multispace0),
        alt((
            quoted,
            take_while(1.., |c: char| !c.is_whitespace() && c != '>'),
        )),
    ))
    .parse_next(input)?;
    Ok((name, value))
}

#[derive(Debug)]
enum Token<'a> {
    Text(&'a str),
    /// End tags, comments, doctype, or a stray `<`.
    Markup(&'a str),
    Start(StartTag<'a>),
    /// Raw text content of a `<script>` or `<style>` element.
    Raw { tag: &'static str, text: &'a str },
}

const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

struct Tokens<'a> {
    rest: &'a str,
    raw: Option<&'static str>,
}

impl<'a> Tokens<'a> {
    fn new(html: &'a str) -> Self {
        Self {
            rest: html,
            raw: None,
        }
    }

    fn advance(&mut self, len: usize) -> &'a str {
        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        head
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(tag) = self.raw.take() {
            let closing = format!("</{tag}");
            let end = self
                .rest
                .to_ascii_lowercase()
                .find(&closing)
                .unwrap_or(self.rest.len());
            if end > 0 {
                let text = self.advance(end);
                return Some(Token::Raw { tag, text });
            }
        }
        if self.rest.is_empty() {
            return None;
        }
        if !self.rest.starts_with('<') {
            let end = self.rest.find('<').unwrap_or(self.rest.len());
            return Some(Token::Text(self.advance(end)));
        }
        if self.rest.starts_with("<!--") {
            let end = self.rest.find("-->").map_or(self.rest.len(), |i| i + 3);
            return Some(Token::Markup(self.advance(end)));
        }
        if let Some(tag) = StartTag::parse(self.rest) {
            self.raw = RAW_TEXT_ELEMENTS
                .into_iter()
                .find(|n| tag.name.eq_ignore_ascii_case(n));
            self.rest = &self.rest[tag.src.len()..];
            return Some(Token::Start(tag));
        }
        let end = if self.rest.starts_with("</")
            || self.rest.starts_with("<!")
            || self.rest.starts_with("<?")
        {
            self.rest.find('>').map_or(self.rest.len(), |i| i + 1)
        } else {
            1
        };
        Some(Token::Markup(self.advance(end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(style: &str, body: &str) -> String {
        format!("<html><head><style>{style}</style></head><body>{body}</body></html>")
    }

    #[test]
    fn without_style_is_identity() {
        let html = "<p class=\"x\">hi</p>";
        assert_eq!(inline_css(html), html);
    }

    #[test]
    fn type_rule_is_inlined_and_style_removed() {
        let out = inline_css(&doc("table { border-collapse: collapse; }", "<table><tr></tr></table>"));
        assert_eq!(
            out,
            "<html><head></head><body><table style=\"border-collapse: collapse;\"><tr></tr></table></body></html>"
        );
    }

    #[test]
    fn media_queries_stay_in_one_style_element() {
        let css = "@media (max-width: 620px) { .stack { display:block !important; } } td { color: red; }";
        let out = inline_css(&doc(css, "<td class=\"stack\">x</td>"));
        assert!(out.contains("<style>\n@media (max-width: 620px) { .stack { display:block !important; } }\n</style>"));
        assert!(out.contains("<td class=\"stack\" style=\"color: red;\">"));
        assert_eq!(out.matches("<style>").count(), 1);
    }

    #[test]
    fn class_and_attribute_selectors_match() {
        let css = ".hero { margin: 0; } table[role=\"presentation\"] { width: 100%; } td[class=\"stack\"] { padding: 0; }";
        let out = inline_css(&doc(
            css,
            "<div class=\"a hero\"></div><table role=\"presentation\"></table><table></table><td class=\"stack wide\"></td>",
        ));
        assert!(out.contains("<div class=\"a hero\" style=\"margin: 0;\">"));
        assert!(out.contains("<table role=\"presentation\" style=\"width: 100%;\">"));
        assert!(out.contains("<table></table>"));
        // Attribute equality is exact, not token-based.
        assert!(out.contains("<td class=\"stack wide\"></td>"));
    }

    #[test]
    fn existing_inline_declarations_win() {
        let out = inline_css(&doc(
            "td { color: red; padding: 4px; }",
            "<td style=\"color:blue\">x</td>",
        ));
        assert!(out.contains("<td style=\"color: blue; padding: 4px;\">"));
    }

    #[test]
    fn important_sheet_declaration_beats_inline() {
        let out = inline_css(&doc(
            "td { color: red !important; }",
            "<td style=\"color:blue\">x</td>",
        ));
        assert!(out.contains("<td style=\"color: red;\">"));
    }

    #[test]
    fn higher_specificity_applies_last() {
        let out = inline_css(&doc(
            ".x { color: green; } td { color: red; }",
            "<td class=\"x\">x</td>",
        ));
        assert!(out.contains("style=\"color: green;\""));
    }

    #[test]
    fn unsupported_selectors_are_retained() {
        let out = inline_css(&doc(
            "a:hover { color: red; } td p { margin: 0; }",
            "<a href=\"#\">x</a><td><p>y</p></td>",
        ));
        assert!(out.contains("a:hover { color: red; }"));
        assert!(out.contains("td p { margin: 0; }"));
        assert!(out.contains("<a href=\"#\">x</a>"));
        assert!(out.contains("<p>y</p>"));
    }

    #[test]
    fn script_content_is_not_rewritten() {
        let body = "<script>var s = \"<table>\";</script><table></table>";
        let out = inline_css(&doc("table { border: 0; }", body));
        assert!(out.contains("<script>var s = \"<table>\";</script>"));
        assert!(out.contains("<table style=\"border: 0;\"></table>"));
    }

    #[test]
    fn quoted_attribute_may_contain_angle_bracket() {
        let out = inline_css(&doc("img { border: 0; }", "<img alt=\"a > b\" src=\"x.png\"/>"));
        assert!(out.contains("<img alt=\"a > b\" src=\"x.png\" style=\"border: 0;\"/>"));
    }

    #[test]
    fn comments_are_ignored() {
        let out = inline_css(&doc("/* base */ td { /* c */ color: red; }", "<td>x</td>"));
        assert!(out.contains("<td style=\"color: red;\">"));
    }

    #[test]
    fn declaration_values_keep_semicolons_in_quotes() {
        let decls = parse_declarations("font-family: \"A;B\", serif; color: red");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].value, "\"A;B\", serif");
        assert_eq!(decls[1].property, "color");
    }
}
