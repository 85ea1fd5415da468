//! Tests for card rendering.

use super::*;
use crate::model::{ItemId, LayoutSpan};
use crate::view::styles::ColorConfig;

// ===== Helpers =====

fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

fn styles() -> FeedStyles {
    FeedStyles::new(ColorConfig::new(false))
}

fn text_card(id: &str, title: &str) -> FeedEntry {
    FeedEntry::new(
        ItemId::new(id).unwrap(),
        CardKind::Text,
        LayoutSpan::Single,
        title,
        "body text",
        ImageSource::None,
    )
}

// ===== truncate_to_width =====

#[test]
fn truncate_keeps_short_text() {
    assert_eq!(truncate_to_width("hello", 10), "hello");
    assert_eq!(truncate_to_width("hello", 5), "hello");
}

#[test]
fn truncate_adds_ellipsis() {
    assert_eq!(truncate_to_width("hello world", 6), "hello…");
}

#[test]
fn truncate_counts_wide_characters_twice() {
    // Each of these is two columns wide.
    let cut = truncate_to_width("日本語のタイトル", 6);
    assert_eq!(cut, "日本…");
    assert!(cut.width() <= 6);
}

#[test]
fn truncate_to_zero_is_empty() {
    assert_eq!(truncate_to_width("abc", 0), "");
}

// ===== render_card =====

#[test]
fn text_card_shows_id_title_and_body() {
    let area = Rect::new(0, 0, 30, 4);
    let mut buf = Buffer::empty(area);
    render_card(&text_card("id_0", "Title 0"), area, &mut buf, false, &styles());

    let out = buffer_to_string(&buf);
    assert!(out.contains("id_0"), "{out}");
    assert!(out.contains("Title 0"), "{out}");
    assert!(out.contains("body text"), "{out}");
}

#[test]
fn image_card_shows_source_label() {
    let entry = FeedEntry::new(
        ItemId::new("id_1").unwrap(),
        CardKind::Image,
        LayoutSpan::Double,
        "Title 1",
        "body",
        ImageSource::LocalRef("cat.png".to_string()),
    );
    let area = Rect::new(0, 0, 30, 7);
    let mut buf = Buffer::empty(area);
    render_card(&entry, area, &mut buf, true, &styles());

    assert!(buffer_to_string(&buf).contains("[local: cat.png]"));
}

#[test]
fn footer_renders_status_label() {
    let area = Rect::new(0, 0, 40, 3);
    let mut buf = Buffer::empty(area);
    render_footer(FooterStatus::NoMore, area, &mut buf, &styles());

    assert!(buffer_to_string(&buf).contains("You've reached the end"));
}

// ===== FeedView =====

#[test]
fn feed_view_clips_partially_scrolled_card() {
    let mut store = ItemStore::new();
    store.append(vec![text_card("id_0", "First"), text_card("id_1", "Second")]);
    let layout = FeedLayout::compute(&store, FooterStatus::Hidden);
    let styles = styles();

    // Skip the top border and title row of the first card.
    let area = Rect::new(0, 0, 30, 4);
    let mut buf = Buffer::empty(area);
    FeedView::new(&layout, &store, FooterStatus::Hidden, 2, &styles).render(area, &mut buf);

    let out = buffer_to_string(&buf);
    let rows: Vec<&str> = out.lines().collect();
    assert!(rows[0].contains("body text"), "{out}");
    assert!(!out.contains("First"), "{out}");
    assert!(rows[2].contains("id_1"), "{out}");
    assert!(rows[3].contains("Second"), "{out}");
}

#[test]
fn feed_view_places_double_span_cards_side_by_side() {
    let mut store = ItemStore::new();
    let left = FeedEntry::new(
        ItemId::new("left").unwrap(),
        CardKind::Text,
        LayoutSpan::Double,
        "L",
        "",
        ImageSource::None,
    );
    let right = FeedEntry::new(
        ItemId::new("right").unwrap(),
        CardKind::Text,
        LayoutSpan::Double,
        "R",
        "",
        ImageSource::None,
    );
    store.append(vec![left, right]);
    let layout = FeedLayout::compute(&store, FooterStatus::Hidden);
    let styles = styles();

    let area = Rect::new(0, 0, 40, 4);
    let mut buf = Buffer::empty(area);
    FeedView::new(&layout, &store, FooterStatus::Hidden, 0, &styles).render(area, &mut buf);

    let first_row = buffer_to_string(&buf).lines().next().unwrap_or_default().to_string();
    let left_at = first_row.find("left").expect("left card title");
    let right_at = first_row.find("right").expect("right card title");
    assert!(left_at < 20 && right_at >= 20, "{first_row}");
}

#[test]
fn feed_view_skips_slots_the_store_no_longer_has() {
    let mut store = ItemStore::new();
    store.append(vec![text_card("id_0", "First"), text_card("id_1", "Second")]);
    let layout = FeedLayout::compute(&store, FooterStatus::Hidden);
    store.remove_at(1);
    let styles = styles();

    let area = Rect::new(0, 0, 30, 8);
    let mut buf = Buffer::empty(area);
    FeedView::new(&layout, &store, FooterStatus::Hidden, 0, &styles).render(area, &mut buf);

    let out = buffer_to_string(&buf);
    assert!(out.contains("First"), "{out}");
    assert!(!out.contains("id_1"), "{out}");
}

#[test]
fn feed_view_draws_footer_slot() {
    let mut store = ItemStore::new();
    store.append(vec![text_card("id_0", "First")]);
    let layout = FeedLayout::compute(&store, FooterStatus::NoMore);
    let styles = styles();

    let area = Rect::new(0, 0, 40, 8);
    let mut buf = Buffer::empty(area);
    FeedView::new(&layout, &store, FooterStatus::NoMore, 0, &styles).render(area, &mut buf);

    assert!(buffer_to_string(&buf).contains("You've reached the end"));
}
