use pcg_fmt::{parse_document, render, PrettyPrinter, RenderOptions};

const REFERENCE: &str = include_str!("fixtures/fsi_implicit.xml");
const SHUFFLED: &str = include_str!("fixtures/fsi_shuffled.xml");

#[test]
fn canonical_document_is_a_fixed_point() {
    let document = parse_document(REFERENCE).unwrap();
    assert_eq!(render(&document), REFERENCE);
}

#[test]
fn hand_edited_document_renders_canonically() {
    let document = parse_document(SHUFFLED).unwrap();
    assert_eq!(render(&document), REFERENCE);
}

#[test]
fn reformatting_honours_custom_width() {
    let printer = PrettyPrinter::new(RenderOptions::default().with_max_width(60)).unwrap();
    let text = printer.render(&parse_document(SHUFFLED).unwrap());
    assert!(text.contains("  <m2n:sockets\n    acceptor=\"Fluid\"\n"));
    let again = printer.render(&parse_document(&text).unwrap());
    assert_eq!(again, text);
}

#[test]
fn escaped_values_survive_a_round_trip() {
    let source = "<precice-configuration><data:scalar name=\"a&lt;b&#10;c\"/></precice-configuration>";
    let document = parse_document(source).unwrap();
    assert_eq!(document.root.children[0].attribute("name"), Some("a<b\nc"));
    let text = render(&document);
    assert!(text.contains("<data:scalar name=\"a&lt;b&#10;c\" />"));
    assert_eq!(render(&parse_document(&text).unwrap()), text);
}
