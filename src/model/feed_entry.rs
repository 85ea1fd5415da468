//! Feed entry domain types.

use super::identifiers::ItemId;
use serde::Serialize;

/// Visual kind of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Title and body text.
    Text,
    /// Title over an image.
    Image,
}

/// How many grid columns a card occupies.
///
/// The feed grid has two columns. `Single` is a single-column layout, so the
/// card spans the whole row; `Double` cards sit side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutSpan {
    /// Full-width card (spans both columns).
    Single,
    /// Half-width card (one of two columns).
    Double,
}

impl LayoutSpan {
    /// Number of grid columns taken by this span.
    pub fn columns(&self) -> u16 {
        match self {
            LayoutSpan::Single => 2,
            LayoutSpan::Double => 1,
        }
    }
}

/// Where an image card gets its picture from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ImageSource {
    /// Bundled resource, referenced by name.
    LocalRef(String),
    /// Remote URL; loading it is the renderer's concern.
    RemoteUrl(String),
    /// No picture; the renderer shows a placeholder.
    None,
}

/// One item in the feed.
///
/// Immutable once inserted into the store. Content changes are modelled by
/// replacing the entry, never by mutating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    id: ItemId,
    card_kind: CardKind,
    layout_span: LayoutSpan,
    title: String,
    body: String,
    image_source: ImageSource,
}

impl FeedEntry {
    /// Create a new entry.
    pub fn new(
        id: ItemId,
        card_kind: CardKind,
        layout_span: LayoutSpan,
        title: impl Into<String>,
        body: impl Into<String>,
        image_source: ImageSource,
    ) -> Self {
        Self {
            id,
            card_kind,
            layout_span,
            title: title.into(),
            body: body.into(),
            image_source,
        }
    }

    /// Stable identity.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Card kind.
    pub fn card_kind(&self) -> CardKind {
        self.card_kind
    }

    /// Grid span.
    pub fn layout_span(&self) -> LayoutSpan {
        self.layout_span
    }

    /// Card title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Card body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Image source for image cards.
    pub fn image_source(&self) -> &ImageSource {
        &self.image_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_span_takes_both_columns() {
        assert_eq!(LayoutSpan::Single.columns(), 2);
        assert_eq!(LayoutSpan::Double.columns(), 1);
    }

    #[test]
    fn accessors_return_constructor_values() {
        let entry = FeedEntry::new(
            ItemId::new("id_1").unwrap(),
            CardKind::Image,
            LayoutSpan::Double,
            "Title 1",
            "Body 1",
            ImageSource::RemoteUrl("https://example.com/1".to_string()),
        );
        assert_eq!(entry.id().as_str(), "id_1");
        assert_eq!(entry.card_kind(), CardKind::Image);
        assert_eq!(entry.layout_span(), LayoutSpan::Double);
        assert_eq!(entry.title(), "Title 1");
        assert_eq!(entry.body(), "Body 1");
        assert_eq!(
            entry.image_source(),
            &ImageSource::RemoteUrl("https://example.com/1".to_string())
        );
    }

    #[test]
    fn image_source_serializes_tagged() {
        let json = serde_json::to_string(&ImageSource::LocalRef("cat".to_string())).unwrap();
        assert_eq!(json, r#"{"kind":"local_ref","value":"cat"}"#);
    }
}
