use crate::constants::NO_TRANSFORM;
use kinesis_core::config::AttributeSource;
use kinesis_core::{Layout, Node, Rect, StyleSink};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Attribute view over a live DOM element.
pub struct DomAttributes<'a>(pub &'a web::Element);

impl AttributeSource for DomAttributes<'_> {
    fn attr(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn has(&self, name: &str) -> bool {
        self.0.has_attribute(name)
    }
}

/// Computed `transform` of `el`, `""` when there is none.
pub fn baseline_transform(window: &web::Window, el: &web::Element) -> String {
    match window.get_computed_style(el) {
        Ok(Some(style)) => {
            let value = style.get_property_value("transform").unwrap_or_default();
            if value == NO_TRANSFORM {
                String::new()
            } else {
                value
            }
        }
        _ => String::new(),
    }
}

fn html_elements(list: web::NodeList) -> Vec<web::HtmlElement> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<web::HtmlElement>().ok())
        .collect()
}

pub fn query_all(root: &web::Element, selector: &str) -> Vec<web::HtmlElement> {
    root.query_selector_all(selector)
        .map(html_elements)
        .unwrap_or_default()
}

pub fn document_query_all(document: &web::Document, selector: &str) -> Vec<web::HtmlElement> {
    document
        .query_selector_all(selector)
        .map(html_elements)
        .unwrap_or_default()
}

/// Layout and style access for one container and its children.
pub struct DomSurface {
    window: web::Window,
    container: web::HtmlElement,
    children: Vec<web::HtmlElement>,
}

impl DomSurface {
    pub fn new(
        window: web::Window,
        container: web::HtmlElement,
        children: Vec<web::HtmlElement>,
    ) -> Self {
        Self {
            window,
            container,
            children,
        }
    }

    pub fn container(&self) -> &web::HtmlElement {
        &self.container
    }

    pub fn children(&self) -> &[web::HtmlElement] {
        &self.children
    }

    fn element(&self, node: Node) -> Option<&web::HtmlElement> {
        match node {
            Node::Container => Some(&self.container),
            Node::Child(i) => self.children.get(i),
        }
    }
}

impl Layout for DomSurface {
    fn rect(&self, node: Node) -> Rect {
        match self.element(node) {
            Some(el) => {
                let r = el.get_bounding_client_rect();
                Rect::new(
                    r.left() as f32,
                    r.top() as f32,
                    r.width() as f32,
                    r.height() as f32,
                )
            }
            None => Rect::default(),
        }
    }

    fn viewport_height(&self) -> f32 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32
    }
}

impl StyleSink for DomSurface {
    fn set_transform(&mut self, node: Node, css: &str) {
        self.set_property(node, "transform", css);
    }

    fn set_property(&mut self, node: Node, name: &str, value: &str) {
        if let Some(el) = self.element(node) {
            if let Err(e) = el.style().set_property(name, value) {
                log::warn!("[dom] set {name}: {:?}", e);
            }
        }
    }
}
