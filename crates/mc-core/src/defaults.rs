//! Default-block factory.
//!
//! Maps palette keys (`text`, `columns-2`, ...) to freshly identified blocks
//! with baseline attributes.

use crate::id::BlockId;
use crate::model::*;
use chrono::Datelike;
use smallvec::SmallVec;
use std::fmt;

/// A palette key: one block variant, or a column-layout shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKey {
    Text,
    Image,
    Button,
    Divider,
    Spacer,
    Icon,
    Social,
    Columns2,
    Columns3,
    Header,
    Footer,
}

impl BlockKey {
    pub const ALL: [BlockKey; 11] = [
        BlockKey::Text,
        BlockKey::Image,
        BlockKey::Button,
        BlockKey::Divider,
        BlockKey::Spacer,
        BlockKey::Icon,
        BlockKey::Social,
        BlockKey::Columns2,
        BlockKey::Columns3,
        BlockKey::Header,
        BlockKey::Footer,
    ];

    /// Strict lookup. Returns `None` for anything outside the palette,
    /// including the bare `columns` tag.
    pub fn parse(key: &str) -> Option<Self> {
        Some(match key {
            "text" => BlockKey::Text,
            "image" => BlockKey::Image,
            "button" => BlockKey::Button,
            "divider" => BlockKey::Divider,
            "spacer" => BlockKey::Spacer,
            "icon" => BlockKey::Icon,
            "social" => BlockKey::Social,
            "columns-2" => BlockKey::Columns2,
            "columns-3" => BlockKey::Columns3,
            "header" => BlockKey::Header,
            "footer" => BlockKey::Footer,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKey::Text => "text",
            BlockKey::Image => "image",
            BlockKey::Button => "button",
            BlockKey::Divider => "divider",
            BlockKey::Spacer => "spacer",
            BlockKey::Icon => "icon",
            BlockKey::Social => "social",
            BlockKey::Columns2 => "columns-2",
            BlockKey::Columns3 => "columns-3",
            BlockKey::Header => "header",
            BlockKey::Footer => "footer",
        }
    }

    /// Build a new block for this key.
    pub fn create(self) -> Block {
        match self {
            BlockKey::Text => Block::Text(TextBlock {
                id: BlockId::fresh("text"),
                html: "<p>Edit this text</p>".to_string(),
                font_family: "Arial".to_string(),
                font_size: 16.0,
                color: "#111111".to_string(),
                align: Alignment::Left,
                padding: Padding::uniform(8.0),
            }),
            BlockKey::Image => Block::Image(ImageBlock {
                id: BlockId::fresh("image"),
                url: "https://placehold.co/600x300".to_string(),
                alt: String::new(),
                width: "100%".to_string(),
                height: "auto".to_string(),
                align: Alignment::Center,
                link: None,
                padding: Padding::uniform(8.0),
            }),
            BlockKey::Button => Block::Button(ButtonBlock {
                id: BlockId::fresh("button"),
                text: "Click me".to_string(),
                url: "#".to_string(),
                bg: "#111111".to_string(),
                color: "#ffffff".to_string(),
                radius: 6.0,
                padding_v: 10.0,
                padding_h: 16.0,
                align: ButtonAlign::Left,
                font_size: 16.0,
            }),
            BlockKey::Divider => Block::Divider(DividerBlock {
                id: BlockId::fresh("divider"),
                thickness: 1.0,
                color: "#e4e4e7".to_string(),
                style: DividerStyle::Solid,
                padding: VerticalPadding {
                    top: 8.0,
                    bottom: 8.0,
                },
            }),
            BlockKey::Spacer => Block::Spacer(SpacerBlock {
                id: BlockId::fresh("spacer"),
                height: 16.0,
            }),
            BlockKey::Icon => Block::Icon(IconBlock {
                id: BlockId::fresh("icon"),
                icon: "circle".to_string(),
                size: 24.0,
                color: "#e5e7eb".to_string(),
                url: Some("#".to_string()),
            }),
            BlockKey::Social => Block::Social(SocialBlock {
                id: BlockId::fresh("social"),
                platforms: vec![
                    SocialLink::new("facebook", "#"),
                    SocialLink::new("twitter", "#"),
                    SocialLink::new("instagram", "#"),
                ],
                size: 20.0,
                gap: 12.0,
                align: Alignment::Center,
            }),
            BlockKey::Columns2 => Block::Columns(equal_columns(2)),
            BlockKey::Columns3 => Block::Columns(equal_columns(3)),
            BlockKey::Header => Block::Header(HeaderBlock {
                id: BlockId::fresh("header"),
                logo_url: Some(String::new()),
                logo_width: None,
                logo_height: None,
                menu: vec![menu_item("Home"), menu_item("About")],
                bg: Some("#ffffff".to_string()),
                color: Some("#111111".to_string()),
                padding: Padding::uniform(12.0),
            }),
            BlockKey::Footer => Block::Footer(FooterBlock {
                id: BlockId::fresh("footer"),
                company: "Company Inc.".to_string(),
                address: Some("123 Main St, City".to_string()),
                socials: vec![
                    SocialLink::new("facebook", "#"),
                    SocialLink::new("twitter", "#"),
                ],
                unsubscribe_text: Some("Unsubscribe".to_string()),
                copyright: Some(format!("© {} Company Inc.", current_year())),
                bg: Some("#f4f4f5".to_string()),
                color: Some("#111111".to_string()),
                padding: None,
            }),
        }
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create a default block for a palette key.
///
/// Unrecognized keys produce a default text block rather than an error so a
/// stale drag payload can never break the editor. Use [`BlockKey::parse`]
/// to reject unknown keys instead.
pub fn create_default_block(key: &str) -> Block {
    match BlockKey::parse(key) {
        Some(k) => k.create(),
        None => {
            log::warn!("unknown block key {key:?}, falling back to text");
            BlockKey::Text.create()
        }
    }
}

/// A columns block with `n` empty columns of equal width.
pub fn equal_columns(n: u8) -> ColumnsBlock {
    let n = n.max(1);
    ColumnsBlock {
        id: BlockId::fresh("columns"),
        num_columns: n,
        widths: equal_widths(n as usize),
        gap: 16.0,
        background: Some("#ffffff".to_string()),
        padding: Padding::uniform(8.0),
        columns: (0..n).map(|_| Column::empty()).collect(),
    }
}

pub fn equal_widths(n: usize) -> SmallVec<[f64; 3]> {
    if n == 0 {
        return SmallVec::new();
    }
    SmallVec::from_elem(1.0 / n as f64, n)
}

fn menu_item(text: &str) -> MenuItem {
    MenuItem {
        id: BlockId::fresh("menu"),
        text: text.to_string(),
        url: "#".to_string(),
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_key_roundtrips_through_parse() {
        for key in BlockKey::ALL {
            assert_eq!(BlockKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn keys_produce_matching_kinds() {
        assert_eq!(create_default_block("text").kind(), BlockKind::Text);
        assert_eq!(create_default_block("image").kind(), BlockKind::Image);
        assert_eq!(create_default_block("button").kind(), BlockKind::Button);
        assert_eq!(create_default_block("divider").kind(), BlockKind::Divider);
        assert_eq!(create_default_block("spacer").kind(), BlockKind::Spacer);
        assert_eq!(create_default_block("icon").kind(), BlockKind::Icon);
        assert_eq!(create_default_block("social").kind(), BlockKind::Social);
        assert_eq!(create_default_block("columns-2").kind(), BlockKind::Columns);
        assert_eq!(create_default_block("header").kind(), BlockKind::Header);
        assert_eq!(create_default_block("footer").kind(), BlockKind::Footer);
    }

    #[test]
    fn unknown_key_falls_back_to_text() {
        assert_eq!(create_default_block("carousel").kind(), BlockKind::Text);
        assert_eq!(create_default_block("columns").kind(), BlockKind::Text);
        assert_eq!(BlockKey::parse("columns"), None);
    }

    #[test]
    fn every_call_issues_a_fresh_id() {
        let a = create_default_block("spacer");
        let b = create_default_block("spacer");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn column_shortcuts_have_equal_widths() {
        let two = create_default_block("columns-2");
        let cols = two.as_columns().unwrap();
        assert_eq!(cols.num_columns, 2);
        assert_eq!(cols.widths.as_slice(), &[0.5, 0.5]);
        assert_eq!(cols.columns.len(), 2);
        assert!(cols.columns.iter().all(|c| c.children.is_empty()));
        assert_ne!(cols.columns[0].id, cols.columns[1].id);

        let three = create_default_block("columns-3");
        let cols = three.as_columns().unwrap();
        assert_eq!(cols.num_columns, 3);
        assert_eq!(cols.columns.len(), 3);
        let sum: f64 = cols.widths.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn footer_copyright_bakes_in_the_year() {
        let Block::Footer(footer) = create_default_block("footer") else {
            panic!("expected footer");
        };
        let year = chrono::Local::now().year().to_string();
        assert!(footer.copyright.unwrap().contains(&year));
    }
}
