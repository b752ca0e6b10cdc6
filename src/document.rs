//! Layout document: the per-page JSON produced by the layout-analysis
//! pipeline.
//!
//! Only the fields the editor needs are modelled; everything else in the
//! JSON is ignored.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One page's layout analysis result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Per-page entries; the viewer edits the first one.
    #[serde(default)]
    pub pdf_info: Vec<PageInfo>,
    /// How the page was parsed (`ocr`, `txt`, ...).
    #[serde(rename = "_parse_type", default, skip_serializing_if = "Option::is_none")]
    pub parse_type: Option<String>,
    /// Version of the pipeline that produced the document.
    #[serde(rename = "_version_name", default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
}

impl LayoutDocument {
    /// Parse a document from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// The first page entry, if any.
    pub fn first_page(&self) -> Option<&PageInfo> {
        self.pdf_info.first()
    }
}

/// Blocks and metadata of a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Zero-based page index within the source document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_idx: Option<u32>,
    /// Page size `[width, height]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<[f32; 2]>,
    /// Blocks as detected, before paragraph merging.
    #[serde(default)]
    pub preproc_blocks: Vec<Block>,
    /// Blocks after paragraph merging.
    #[serde(default)]
    pub para_blocks: Vec<Block>,
}

impl PageInfo {
    /// The raw blocks the editor works on: `preproc_blocks` when present,
    /// otherwise `para_blocks`.
    pub fn blocks(&self) -> &[Block] {
        if self.preproc_blocks.is_empty() {
            &self.para_blocks
        } else {
            &self.preproc_blocks
        }
    }
}

/// A detected block with its category and bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Category tag.
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// `[x0, y0, x1, y1]` in image pixels.
    pub bbox: [f32; 4],
}

impl Block {
    /// Create a block from a kind and corner coordinates.
    pub const fn new(kind: BlockKind, bbox: [f32; 4]) -> Self {
        Self { kind, bbox }
    }
}

/// Category tag of a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// `title`
    Title,
    /// `text`
    Text,
    /// `image`
    Image,
    /// `interline_equation`
    InterlineEquation,
    /// Any tag without a dedicated variant, kept verbatim.
    Other(String),
}

impl BlockKind {
    /// The JSON tag for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::Text => "text",
            Self::Image => "image",
            Self::InterlineEquation => "interline_equation",
            Self::Other(tag) => tag,
        }
    }
}

impl From<&str> for BlockKind {
    fn from(tag: &str) -> Self {
        match tag {
            "title" => Self::Title,
            "text" => Self::Text,
            "image" => Self::Image,
            "interline_equation" => Self::InterlineEquation,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BlockKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from(tag.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "pdf_info": [{
            "page_idx": 0,
            "page_size": [612.0, 792.0],
            "preproc_blocks": [
                {"type": "title", "bbox": [50, 40, 560, 80], "lines": []},
                {"type": "text", "bbox": [10, 20, 110, 70]},
                {"type": "table", "bbox": [0, 0, 1, 1]}
            ],
            "para_blocks": [],
            "discarded_blocks": []
        }],
        "_parse_type": "ocr",
        "_version_name": "0.6.1"
    }"#;

    #[test]
    fn test_parse_sample_document() {
        let doc = LayoutDocument::from_slice(SAMPLE.as_bytes()).unwrap();
        assert_eq!(doc.parse_type.as_deref(), Some("ocr"));
        assert_eq!(doc.version_name.as_deref(), Some("0.6.1"));

        let page = doc.first_page().unwrap();
        assert_eq!(page.page_size, Some([612.0, 792.0]));
        let kinds: Vec<_> = page.blocks().iter().map(|b| b.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Title,
                BlockKind::Text,
                BlockKind::Other("table".into())
            ]
        );
        assert_eq!(page.blocks()[1].bbox, [10.0, 20.0, 110.0, 70.0]);
    }

    #[test]
    fn test_blocks_fall_back_to_para_blocks() {
        let json = r#"{"pdf_info":[{"para_blocks":[{"type":"image","bbox":[1,2,3,4]}]}]}"#;
        let doc = LayoutDocument::from_slice(json.as_bytes()).unwrap();
        assert_eq!(doc.first_page().unwrap().blocks().len(), 1);
        assert_eq!(doc.first_page().unwrap().blocks()[0].kind, BlockKind::Image);
    }

    #[test]
    fn test_empty_document() {
        let doc = LayoutDocument::from_slice(b"{}").unwrap();
        assert!(doc.first_page().is_none());
    }

    #[test]
    fn test_kind_tag_round_trip() {
        let block = Block::new(BlockKind::InterlineEquation, [0.0, 0.0, 5.0, 5.0]);
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains(r#""type":"interline_equation""#));
        assert_eq!(serde_json::from_str::<Block>(&json).unwrap(), block);
    }

    #[test]
    fn test_malformed_bbox_is_rejected() {
        let json = r#"{"pdf_info":[{"preproc_blocks":[{"type":"text","bbox":[1,2,3]}]}]}"#;
        assert!(LayoutDocument::from_slice(json.as_bytes()).is_err());
    }
}
