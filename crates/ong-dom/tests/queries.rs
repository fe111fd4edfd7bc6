//! Document query and mutation tests

use ong_dom::{Document, DomError, NodeId};

fn build_nav(doc: &mut Document) -> (NodeId, Vec<NodeId>) {
    let body = doc.body().unwrap();
    let nav = doc.create_element("ul");
    doc.add_class(nav, "nav-menu").unwrap();
    doc.append_child(body, nav).unwrap();

    let mut links = Vec::new();
    for (href, label) in [("#home", "Início"), ("#sobre", "Sobre"), ("#contato", "Contato")] {
        let li = doc.create_element("li");
        doc.add_class(li, "nav-item").unwrap();
        let a = doc.create_element("a");
        doc.set_attr(a, "href", href).unwrap();
        doc.set_attr(a, "data-link", "").unwrap();
        let text = doc.create_text(label);
        doc.append_child(a, text).unwrap();
        doc.append_child(li, a).unwrap();
        doc.append_child(nav, li).unwrap();
        links.push(a);
    }
    (nav, links)
}

// ============================================================================
// Selector queries
// ============================================================================

#[test]
fn test_query_selector_all_in_order() {
    let mut doc = Document::default();
    let (nav, links) = build_nav(&mut doc);

    let found = doc.query_selector_all(nav, ".nav-item > a[data-link]").unwrap();
    assert_eq!(found, links);

    let first = doc.query("a[href=\"#sobre\"]").unwrap();
    assert_eq!(first, Some(links[1]));
}

#[test]
fn test_query_scoped_to_root() {
    let mut doc = Document::default();
    let (_nav, links) = build_nav(&mut doc);
    let li = doc.tree().parent(links[0]).unwrap();

    let inside = doc.query_selector_all(li, "a").unwrap();
    assert_eq!(inside, vec![links[0]]);
}

#[test]
fn test_invalid_selector_reports_error() {
    let doc = Document::default();
    let err = doc.query("a[href").unwrap_err();
    assert!(matches!(err, DomError::InvalidSelector { .. }));
}

#[test]
fn test_get_element_by_id() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let main = doc.create_element("main");
    doc.set_attr(main, "id", "main-content").unwrap();
    doc.append_child(body, main).unwrap();

    assert_eq!(doc.get_element_by_id("main-content"), Some(main));
    assert_eq!(doc.get_element_by_id("missing"), None);
}

// ============================================================================
// Mutation
// ============================================================================

#[test]
fn test_text_and_html_roundtrip_of_swapped_content() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let main = doc.create_element("main");
    doc.append_child(body, main).unwrap();

    let h1 = doc.create_element("h1");
    doc.set_text_content(h1, "Sobre Nós").unwrap();
    doc.append_child(main, h1).unwrap();
    assert_eq!(doc.inner_html(main), "<h1>Sobre Nós</h1>");

    doc.tree_mut().clear_children(main).unwrap();
    assert_eq!(doc.inner_html(main), "");
    // Detached nodes stay in the arena
    assert!(!doc.is_connected(h1));
    assert_eq!(doc.text_content(h1), "Sobre Nós");
}

#[test]
fn test_set_attr_on_text_is_rejected() {
    let mut doc = Document::default();
    let text = doc.create_text("oi");
    assert_eq!(doc.set_attr(text, "id", "x"), Err(DomError::InvalidNodeType));
}

#[test]
fn test_textarea_value_is_text() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let area = doc.create_element("textarea");
    doc.append_child(body, area).unwrap();
    doc.set_value(area, "Olá").unwrap();
    assert_eq!(doc.value(area), "Olá");
    assert_eq!(doc.outer_html(area), "<textarea>Olá</textarea>");
}
