//! Edge case tests for tether-markup
//!
//! Parsing failures, deep nesting, and traversal order.

use tether_markup::{MarkupTree, NodeData, ParseError};

// ============================================================================
// MALFORMED INPUT TESTS
// ============================================================================

#[test]
fn test_malformed_inputs_rejected() {
    let inputs: [&[u8]; 6] = [
        b"<component><view></component>",
        b"<component>",
        b"</component>",
        b"just text",
        b"<a b=\"1\" b=\"2\"/>",
        b"<a src=noquotes/>",
    ];
    for input in inputs {
        assert!(
            MarkupTree::parse(input).is_err(),
            "expected failure for {:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_unclosed_reports_innermost() {
    assert_eq!(
        MarkupTree::parse(b"<a><b><c>").unwrap_err(),
        ParseError::UnclosedTag { tag: "c".into() }
    );
}

#[test]
fn test_error_display() {
    assert_eq!(ParseError::NoRootElement.to_string(), "No root element");
    assert_eq!(
        ParseError::UnclosedTag { tag: "view".into() }.to_string(),
        "Unclosed tag: view"
    );
}

// ============================================================================
// TRAVERSAL TESTS
// ============================================================================

#[test]
fn test_deep_nesting_visits_every_element() {
    let depth = 200;
    let mut src = String::new();
    for _ in 0..depth {
        src.push_str("<view>");
    }
    src.push_str(r#"<lv_image src="deep.png"/>"#);
    for _ in 0..depth {
        src.push_str("</view>");
    }

    let tree = MarkupTree::parse(src.as_bytes()).unwrap();
    assert_eq!(tree.elements().count(), depth + 1);

    let img = tree.elements_named("lv_image").next().unwrap();
    assert_eq!(tree.attr(img, "src"), Some("deep.png"));
}

#[test]
fn test_very_deep_nesting_round_trips() {
    let depth = 100_000;
    let mut src = String::with_capacity(depth * 8 + 32);
    for _ in 0..depth {
        src.push_str("<v>");
    }
    src.push_str(r#"<lv_image src="a.png"/>"#);
    for _ in 0..depth {
        src.push_str("</v>");
    }

    let tree = MarkupTree::parse(src.as_bytes()).unwrap();
    assert_eq!(tree.elements().count(), depth + 1);
    assert_eq!(String::from_utf8(tree.serialize()).unwrap(), src);
}

#[test]
fn test_siblings_in_document_order() {
    let tree = MarkupTree::parse(
        br#"<c><lv_image src="1"/><view><lv_image src="2"/></view><lv_image src="3"/></c>"#,
    )
    .unwrap();

    let srcs: Vec<_> = tree
        .elements_named("lv_image")
        .filter_map(|id| tree.attr(id, "src"))
        .collect();
    assert_eq!(srcs, vec!["1", "2", "3"]);
}

#[test]
fn test_multiple_top_level_elements() {
    let tree = MarkupTree::parse(b"<a/><b/>").unwrap();
    let first = tree.root_element().unwrap();
    assert_eq!(tree.element(first).unwrap().name, "a");
    assert_eq!(tree.elements().count(), 2);
}

#[test]
fn test_comment_node_kept() {
    let tree = MarkupTree::parse(b"<a><!--note--></a>").unwrap();
    let a = tree.root_element().unwrap();
    let child = tree.children(a).next().unwrap();
    assert_eq!(tree.get(child).unwrap().data, NodeData::Comment("note".into()));
}

// ============================================================================
// ROUND TRIP
// ============================================================================

#[test]
fn test_lvgl_style_screen_round_trip() {
    let src = r#"<component>
	<view extends="lv_obj" width="100%" height="100%">
		<lv_button align="center">
			<lv_label text="Settings"/>
			<event_cb callback="load_screen" trigger="clicked" user_data="settings.xml"/>
		</lv_button>
		<lv_image src="/img/bg.png" x="0" y="0"/>
	</view>
</component>
"#;
    let tree = MarkupTree::parse(src.as_bytes()).unwrap();
    assert_eq!(String::from_utf8(tree.serialize()).unwrap(), src);
}
