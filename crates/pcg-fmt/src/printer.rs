use pcg_core::PcgError;
use pcg_doc::{Document, Element};
use tracing::debug;

use crate::escape::escape_attribute;
use crate::options::RenderOptions;
use crate::rank::{RankTable, PARTICIPANT_ORDER, TOP_LEVEL_ORDER};

const CONVERGENCE_MEASURE_TAGS: [&str; 3] = [
    "relative-convergence-measure",
    "absolute-convergence-measure",
    "absolute-or-relative-convergence-measure",
];

/// Renders documents with fixed options.
#[derive(Debug, Clone, Default)]
pub struct PrettyPrinter {
    options: RenderOptions,
}

/// Renders a document with the default options.
pub fn render(document: &Document) -> String {
    PrettyPrinter::default().render(document)
}

impl PrettyPrinter {
    /// Creates a printer after validating `options`.
    pub fn new(options: RenderOptions) -> Result<Self, PcgError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders `document` to text. Same document, same text.
    pub fn render(&self, document: &Document) -> String {
        let mut output = Output::new(&self.options);
        output.line(
            0,
            &format!(
                "<?xml version=\"{}\" encoding=\"{}\" ?>",
                escape_attribute(&document.version),
                escape_attribute(&document.encoding)
            ),
        );
        output.root(&document.root);
        debug!(bytes = output.text.len(), "document rendered");
        output.text
    }
}

/// State of one render call.
struct Output<'a> {
    options: &'a RenderOptions,
    top_level_ranks: RankTable,
    participant_ranks: RankTable,
    text: String,
}

impl<'a> Output<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            top_level_ranks: RankTable::new(TOP_LEVEL_ORDER),
            participant_ranks: RankTable::new(PARTICIPANT_ORDER),
            text: String::new(),
        }
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    fn line(&mut self, level: usize, content: &str) {
        for _ in 0..level {
            self.text.push_str(&self.options.indent);
        }
        self.text.push_str(content);
        self.text.push('\n');
    }

    fn root(&mut self, root: &Element) {
        if root.is_leaf() {
            self.element(0, root);
            return;
        }
        self.open_tag(0, root, false);
        let children: Vec<&Element> = root.children.iter().collect();
        let children = self
            .top_level_ranks
            .sorted_by_rank(children, |child| child.tag.as_str());
        for (idx, child) in children.into_iter().enumerate() {
            if idx > 0 {
                self.blank();
            }
            if child.is_leaf() {
                self.element(1, child);
            } else if child.tag == "participant" {
                self.participant(1, child);
            } else if child.tag.starts_with("coupling-scheme:") {
                self.coupling_scheme(1, child);
            } else {
                self.element(1, child);
            }
        }
        self.close_tag(0, root);
    }

    fn participant(&mut self, level: usize, participant: &Element) {
        let children: Vec<&Element> = participant.children.iter().collect();
        let children = self
            .participant_ranks
            .sorted_by_rank(children, |child| child.tag.as_str());

        let mut meshes = Vec::new();
        let mut data = Vec::new();
        let mut mappings = Vec::new();
        let mut rest = Vec::new();
        for child in children {
            match child.tag.as_str() {
                "provide-mesh" | "receive-mesh" => meshes.push(child),
                "write-data" | "read-data" => data.push(child),
                tag if tag.starts_with("mapping:") => mappings.push(child),
                _ => rest.push(child),
            }
        }

        self.open_tag(level, participant, false);
        self.bands(level + 1, [meshes, data, mappings, rest]);
        self.close_tag(level, participant);
    }

    fn coupling_scheme(&mut self, level: usize, scheme: &Element) {
        let mut initial = Vec::new();
        let mut convergence = Vec::new();
        let mut exchanges = Vec::new();
        let mut acceleration = Vec::new();
        for child in &scheme.children {
            let tag = child.tag.as_str();
            if tag == "exchange" {
                exchanges.push(child);
            } else if CONVERGENCE_MEASURE_TAGS.contains(&tag) {
                convergence.push(child);
            } else if tag.starts_with("acceleration:") {
                acceleration.push(child);
            } else {
                initial.push(child);
            }
        }
        initial.sort_by_key(|child| initial_setting_rank(&child.tag));

        self.open_tag(level, scheme, false);
        self.bands(level + 1, [initial, convergence, exchanges, acceleration]);
        self.close_tag(level, scheme);
    }

    /// Renders non-empty bands separated by one blank line.
    fn bands<const N: usize>(&mut self, level: usize, bands: [Vec<&Element>; N]) {
        let mut first = true;
        for band in bands.iter().filter(|band| !band.is_empty()) {
            if !first {
                self.blank();
            }
            first = false;
            for element in band {
                self.element(level, element);
            }
        }
    }

    fn element(&mut self, level: usize, element: &Element) {
        if element.is_leaf() {
            self.open_tag(level, element, true);
            return;
        }
        self.open_tag(level, element, false);
        for child in &element.children {
            self.element(level + 1, child);
        }
        self.close_tag(level, element);
    }

    fn open_tag(&mut self, level: usize, element: &Element, self_closing: bool) {
        let close = if self_closing { " />" } else { ">" };
        if element.attributes.is_empty() {
            self.line(level, &format!("<{}{close}", element.tag));
            return;
        }
        let attributes: Vec<String> = element
            .attributes
            .iter()
            .map(|attribute| {
                format!(
                    "{}=\"{}\"",
                    attribute.key,
                    escape_attribute(&attribute.value)
                )
            })
            .collect();
        let single = format!("<{} {}{close}", element.tag, attributes.join(" "));
        let width = self.options.indent.chars().count() * level + single.chars().count();
        if width <= self.options.max_width {
            self.line(level, &single);
            return;
        }
        self.line(level, &format!("<{}", element.tag));
        for attribute in &attributes {
            self.line(level + 1, attribute);
        }
        self.line(level, close.trim_start());
    }

    fn close_tag(&mut self, level: usize, element: &Element) {
        self.line(level, &format!("</{}>", element.tag));
    }
}

/// Order inside the initial coupling-scheme band; unknown settings keep their order last.
fn initial_setting_rank(tag: &str) -> u8 {
    match tag {
        "participants" | "participant" => 0,
        "max-time-windows" => 1,
        "time-window-size" => 2,
        "max-iterations" => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_element(element: Element, max_width: usize) -> String {
        let options = RenderOptions::default().with_max_width(max_width);
        let printer = PrettyPrinter::new(options).unwrap();
        let mut output = Output::new(printer.options());
        output.element(0, &element);
        output.text
    }

    #[test]
    fn leaf_without_attributes_self_closes() {
        assert_eq!(render_element(Element::new("log"), 100), "<log />\n");
    }

    #[test]
    fn wrapped_tags_close_at_tag_indent() {
        let element = Element::new("exchange")
            .attr("data", "Force")
            .attr("mesh", "Fluid-Mesh");
        assert_eq!(
            render_element(element, 10),
            "<exchange\n  data=\"Force\"\n  mesh=\"Fluid-Mesh\"\n/>\n"
        );
    }

    #[test]
    fn nested_children_are_indented_in_original_order() {
        let element = Element::new("acceleration:constant")
            .child(Element::new("relaxation").attr("value", "0.5"))
            .child(Element::new("data").attr("name", "Force"));
        assert_eq!(
            render_element(element, 100),
            "<acceleration:constant>\n  <relaxation value=\"0.5\" />\n  <data name=\"Force\" />\n</acceleration:constant>\n"
        );
    }

    #[test]
    fn initial_settings_order() {
        assert!(initial_setting_rank("participants") < initial_setting_rank("max-time-windows"));
        assert!(initial_setting_rank("time-window-size") < initial_setting_rank("max-iterations"));
        assert_eq!(initial_setting_rank("extrapolation-order"), 4);
    }
}
