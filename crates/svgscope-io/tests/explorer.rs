//! End-to-end exercise of the full pipeline: SVG markup in, addressable
//! scene tree, interactive mutation, display list out.

use std::cell::Cell;
use std::rc::Rc;

use svgscope_core::{
    Color, Matrix, Paint, Point, PointerButton, PointerEvent, PrimitiveId, SceneError, SceneTree,
};
use svgscope_io::read_svg_str;
use svgscope_render::{render, DisplayList};

const SCENE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200">
  <g id="layer">
    <polygon id="star" points="10,0 13,7 20,7 14,12 16,20 10,15 4,20 6,12 0,7 7,7" fill="yellow"/>
    <circle id="dot" cx="30" cy="10" r="4" fill="#336699"/>
  </g>
  <rect id="frame" x="0" y="0" width="200" height="200" fill="none" stroke="black" stroke-width="2"/>
</svg>"##;

fn build() -> SceneTree {
    let doc = read_svg_str(SCENE).expect("scene parses");
    SceneTree::build(doc).expect("scene builds")
}

fn drawn(tree: &SceneTree) -> Vec<PrimitiveId> {
    let mut list = DisplayList::new();
    render(tree, &mut list);
    list.items().iter().map(|i| i.primitive).collect()
}

#[test]
fn test_import_builds_addressable_tree() {
    let tree = build();
    let layer = tree.lookup("layer").unwrap();
    assert!(tree.is_promoted(layer));
    let star = tree.lookup("star").unwrap();
    assert!(!tree.is_promoted(star));
    // Deep lookup from an intermediate group works too.
    assert_eq!(tree.get(layer, "dot"), tree.lookup("dot"));
    assert!(matches!(tree.lookup("ghost"), Err(SceneError::NotFound(_))));
    // "frame" follows the "layer" group in document order, so construction
    // promoted it to keep paint order.
    let frame = tree.lookup("frame").unwrap();
    assert!(tree.is_promoted(frame));
}

#[test]
fn test_promotion_keeps_paint_order_within_a_list() {
    let mut tree = build();
    let before = drawn(&tree);
    assert_eq!(before.len(), 3);

    let star = tree.lookup("star").unwrap();
    tree.promote(star).unwrap();
    assert_eq!(drawn(&tree), before);

    // The displaced sibling can still be promoted afterwards.
    let dot = tree.lookup("dot").unwrap();
    tree.promote(dot).unwrap();
    assert_eq!(drawn(&tree), before);
}

#[test]
fn test_appearance_round_trip() {
    let mut tree = build();
    let star = tree.lookup("star").unwrap();
    assert_eq!(
        tree.look(star).fill(),
        Some(Paint::solid(Color::rgb(255, 255, 0)))
    );
    tree.look(star).set_fill(Paint::solid(Color::rgb(255, 0, 0)));
    assert_eq!(
        tree.look(star).fill(),
        Some(Paint::solid(Color::rgb(255, 0, 0)))
    );

    let frame = tree.lookup("frame").unwrap();
    assert_eq!(tree.look(frame).fill(), None);
    assert_eq!(tree.look(frame).stroke().map(|s| s.width), Some(2.0));
}

#[test]
fn test_hiding_a_node_removes_it_from_the_frame() {
    let mut tree = build();
    let before = drawn(&tree);
    let dot = tree.lookup("dot").unwrap();
    tree.look(dot).toggle_visibility();
    let after = drawn(&tree);
    assert_eq!(after.len(), before.len() - 1);
    tree.look(dot).toggle_visibility();
    assert_eq!(drawn(&tree), before);
}

#[test]
fn test_transform_promotes_and_moves_content() {
    let mut tree = build();
    let dot = tree.lookup("dot").unwrap();
    {
        let mut t = tree.transform(dot).unwrap();
        t.set_x(50.0);
        t.set_rotation_deg(90.0);
        assert_eq!(t.x(), 50.0);
        // Default pivot sits at the circle's center.
        assert_eq!(t.pivot(), Point::new(30.0, 10.0));
    }
    assert!(tree.is_promoted(dot));

    // The display list carries the composed transform for the dot.
    let mut list = DisplayList::new();
    render(&tree, &mut list);
    let moved = list
        .items()
        .iter()
        .find(|i| !i.transform.approx_eq(&Matrix::IDENTITY, 1e-12))
        .expect("one item moved");
    // Rotation about the pivot leaves the center put; translation shifts it.
    let center = moved.transform.apply(Point::new(30.0, 10.0));
    assert!((center.x - 80.0).abs() < 1e-9);
    assert!((center.y - 10.0).abs() < 1e-9);
}

#[test]
fn test_imported_group_transform_survives_binding() {
    let doc = read_svg_str(
        r#"<svg>
          <g id="turned" transform="rotate(90)">
            <rect id="box" x="-5" y="-5" width="10" height="10"/>
          </g>
        </svg>"#,
    )
    .unwrap();
    let mut tree = SceneTree::build(doc).unwrap();
    let turned = tree.lookup("turned").unwrap();
    let t = tree.transform(turned).unwrap();
    assert!((t.rotation_deg() - 90.0).abs() < 1e-9);
    assert!(t.composed().approx_eq(&Matrix::rotation_deg(90.0), 1e-9));
}

#[test]
fn test_pointer_events_dispatch() {
    let mut tree = build();
    let star = tree.lookup("star").unwrap();
    let clicks = Rc::new(Cell::new(0));
    let seen = Rc::clone(&clicks);
    tree.events(star)
        .unwrap()
        .on_pointer_down(move |e| {
            assert_eq!(e.button, PointerButton::Primary);
            seen.set(seen.get() + 1);
        });
    assert!(tree.is_promoted(star));

    let event = PointerEvent {
        x: 10.0,
        y: 10.0,
        button: PointerButton::Primary,
    };
    tree.emit_pointer_down(star, &event);
    tree.emit_pointer_down(star, &event);
    assert_eq!(clicks.get(), 2);
}

#[test]
fn test_display_list_serializes() {
    let tree = build();
    let mut list = DisplayList::new();
    render(&tree, &mut list);
    let json = serde_json::to_string(&list).unwrap();
    assert!(json.contains("\"items\""));
}
