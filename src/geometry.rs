use crate::constants::SVG_NS;
use kinesis_core::adapters::PathGeometry;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Measures path descriptors with a detached SVG `<path>`.
pub struct SvgPathGeometry {
    path: Option<web::SvgGeometryElement>,
}

impl SvgPathGeometry {
    pub fn new(document: &web::Document) -> Self {
        let path = document
            .create_element_ns(Some(SVG_NS), "path")
            .ok()
            .and_then(|el| el.dyn_into::<web::SvgGeometryElement>().ok());
        if path.is_none() {
            log::warn!("[path] SVG geometry unavailable; path lengths read as 0");
        }
        Self { path }
    }
}

impl PathGeometry for SvgPathGeometry {
    fn total_length(&self, descriptor: &str) -> Option<f32> {
        let path = self.path.as_ref()?;
        path.set_attribute("d", descriptor).ok()?;
        Some(path.get_total_length())
    }
}
