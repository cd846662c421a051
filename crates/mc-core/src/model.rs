//! Email template document model.
//!
//! A `Template` is an ordered list of `Block`s. Blocks are a closed set of
//! variants; only `Columns` has children (2 or 3 side-by-side containers of
//! further blocks). The serialized form uses an internal `"type"` tag and
//! camelCase attribute names, which is also the auto-save format.

use crate::id::BlockId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

// ─── Shared attribute types ──────────────────────────────────────────────

/// Horizontal alignment of block content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// Button alignment: a regular alignment, or `full` for a 100%-wide button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
    Full,
}

impl ButtonAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            ButtonAlign::Left => "left",
            ButtonAlign::Center | ButtonAlign::Full => "center",
            ButtonAlign::Right => "right",
            ButtonAlign::Justify => "justify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividerStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl DividerStyle {
    pub fn as_css(self) -> &'static str {
        match self {
            DividerStyle::Solid => "solid",
            DividerStyle::Dashed => "dashed",
            DividerStyle::Dotted => "dotted",
        }
    }
}

/// Per-side padding in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// CSS shorthand: `8px 8px 8px 8px`.
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Vertical-only padding (dividers).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VerticalPadding {
    pub top: f64,
    pub bottom: f64,
}

/// One social network link. `key` is the platform name (`facebook`,
/// `twitter`, ...); unknown platforms are allowed and render as a glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub key: String,
    pub url: String,
}

impl SocialLink {
    pub fn new(key: &str, url: &str) -> Self {
        Self {
            key: key.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: BlockId,
    pub text: String,
    pub url: String,
}

// ─── Block variants ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub id: BlockId,
    /// Rich-text fragment, sanitized by the editing widget before it
    /// reaches the model. Emitted verbatim.
    pub html: String,
    pub font_family: String,
    pub font_size: f64,
    pub color: String,
    pub align: Alignment,
    pub padding: Padding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    pub id: BlockId,
    pub url: String,
    pub alt: String,
    /// `px` or `%` dimension, e.g. `100%` or `320px`.
    pub width: String,
    /// `auto` or a `px` dimension.
    pub height: String,
    pub align: Alignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub padding: Padding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonBlock {
    pub id: BlockId,
    pub text: String,
    pub url: String,
    pub bg: String,
    pub color: String,
    pub radius: f64,
    #[serde(rename = "paddingV")]
    pub padding_v: f64,
    #[serde(rename = "paddingH")]
    pub padding_h: f64,
    pub align: ButtonAlign,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerBlock {
    pub id: BlockId,
    pub thickness: f64,
    pub color: String,
    pub style: DividerStyle,
    pub padding: VerticalPadding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacerBlock {
    pub id: BlockId,
    pub height: f64,
}

/// Fixed icon shapes. Stored by name so unknown names survive a round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconShape {
    Circle,
    Square,
    Star,
}

impl IconShape {
    /// Unknown names render as a circle.
    pub fn from_name(name: &str) -> Self {
        match name {
            "square" => IconShape::Square,
            "star" => IconShape::Star,
            _ => IconShape::Circle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconBlock {
    pub id: BlockId,
    pub icon: String,
    pub size: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialBlock {
    pub id: BlockId,
    pub platforms: Vec<SocialLink>,
    pub size: f64,
    pub gap: f64,
    pub align: Alignment,
}

/// One vertical container inside a columns block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: BlockId,
    pub children: Vec<Block>,
}

impl Column {
    pub fn empty() -> Self {
        Self {
            id: BlockId::fresh("col"),
            children: Vec::new(),
        }
    }
}

/// Side-by-side layout. `columns.len() == widths.len() == num_columns`,
/// and `widths` are ratios summing to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsBlock {
    pub id: BlockId,
    pub num_columns: u8,
    pub widths: SmallVec<[f64; 3]>,
    pub gap: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub padding: Padding,
    pub columns: SmallVec<[Column; 3]>,
}

impl ColumnsBlock {
    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    pub fn column_mut(&mut self, idx: usize) -> Option<&mut Column> {
        self.columns.get_mut(idx)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderBlock {
    pub id: BlockId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Max logo width in pixels (200 when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_width: Option<f64>,
    /// Fixed logo height in pixels; `auto` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_height: Option<f64>,
    pub menu: Vec<MenuItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub padding: Padding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterBlock {
    pub id: BlockId,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub socials: Vec<SocialLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsubscribe_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
}

// ─── Block ───────────────────────────────────────────────────────────────

/// A node of the template tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Text(TextBlock),
    Image(ImageBlock),
    Button(ButtonBlock),
    Divider(DividerBlock),
    Spacer(SpacerBlock),
    Icon(IconBlock),
    Social(SocialBlock),
    Columns(ColumnsBlock),
    Header(HeaderBlock),
    Footer(FooterBlock),
}

/// Discriminant of a `Block`, without attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Text,
    Image,
    Button,
    Divider,
    Spacer,
    Icon,
    Social,
    Columns,
    Header,
    Footer,
}

impl BlockKind {
    pub const ALL: [BlockKind; 10] = [
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Button,
        BlockKind::Divider,
        BlockKind::Spacer,
        BlockKind::Icon,
        BlockKind::Social,
        BlockKind::Columns,
        BlockKind::Header,
        BlockKind::Footer,
    ];

    /// The serialized `"type"` tag.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Button => "button",
            BlockKind::Divider => "divider",
            BlockKind::Spacer => "spacer",
            BlockKind::Icon => "icon",
            BlockKind::Social => "social",
            BlockKind::Columns => "columns",
            BlockKind::Header => "header",
            BlockKind::Footer => "footer",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Block {
    pub fn id(&self) -> BlockId {
        match self {
            Block::Text(b) => b.id,
            Block::Image(b) => b.id,
            Block::Button(b) => b.id,
            Block::Divider(b) => b.id,
            Block::Spacer(b) => b.id,
            Block::Icon(b) => b.id,
            Block::Social(b) => b.id,
            Block::Columns(b) => b.id,
            Block::Header(b) => b.id,
            Block::Footer(b) => b.id,
        }
    }

    fn id_mut(&mut self) -> &mut BlockId {
        match self {
            Block::Text(b) => &mut b.id,
            Block::Image(b) => &mut b.id,
            Block::Button(b) => &mut b.id,
            Block::Divider(b) => &mut b.id,
            Block::Spacer(b) => &mut b.id,
            Block::Icon(b) => &mut b.id,
            Block::Social(b) => &mut b.id,
            Block::Columns(b) => &mut b.id,
            Block::Header(b) => &mut b.id,
            Block::Footer(b) => &mut b.id,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Text(_) => BlockKind::Text,
            Block::Image(_) => BlockKind::Image,
            Block::Button(_) => BlockKind::Button,
            Block::Divider(_) => BlockKind::Divider,
            Block::Spacer(_) => BlockKind::Spacer,
            Block::Icon(_) => BlockKind::Icon,
            Block::Social(_) => BlockKind::Social,
            Block::Columns(_) => BlockKind::Columns,
            Block::Header(_) => BlockKind::Header,
            Block::Footer(_) => BlockKind::Footer,
        }
    }

    pub fn as_columns(&self) -> Option<&ColumnsBlock> {
        match self {
            Block::Columns(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_columns_mut(&mut self) -> Option<&mut ColumnsBlock> {
        match self {
            Block::Columns(c) => Some(c),
            _ => None,
        }
    }

    /// Copy of this block under a new ID. Columns are re-identified all
    /// the way down so the copy never shares an ID with the original.
    #[must_use]
    pub fn duplicate(&self) -> Block {
        let mut copy = self.clone();
        copy.reassign_ids();
        copy
    }

    fn reassign_ids(&mut self) {
        *self.id_mut() = BlockId::fresh(self.kind().as_str());
        if let Block::Columns(cols) = self {
            for column in &mut cols.columns {
                column.id = BlockId::fresh("col");
                for child in &mut column.children {
                    child.reassign_ids();
                }
            }
        }
    }
}

// ─── Template ────────────────────────────────────────────────────────────

/// The root document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub blocks: Vec<Block>,
}

impl Template {
    pub fn empty() -> Self {
        Self {
            id: "template-1".to_string(),
            name: "Untitled Template".to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::empty()
    }
}
