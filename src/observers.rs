use crate::constants::VISIBILITY_THRESHOLD;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

type Callback = Closure<dyn FnMut(js_sys::Array, JsValue)>;

enum Handle {
    Intersection(web::IntersectionObserver),
    Mutation(web::MutationObserver),
}

/// A DOM observer that disconnects when dropped.
pub struct Observer {
    handle: Handle,
    _callback: Callback,
}

impl Drop for Observer {
    fn drop(&mut self) {
        match &self.handle {
            Handle::Intersection(o) => o.disconnect(),
            Handle::Mutation(o) => o.disconnect(),
        }
    }
}

/// Reports whether `target` intersects the viewport.
pub fn visibility(
    target: &web::Element,
    mut on_change: impl FnMut(bool) + 'static,
) -> anyhow::Result<Observer> {
    let callback: Callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _: JsValue| {
        for entry in entries.iter() {
            if let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() {
                on_change(entry.is_intersecting());
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, JsValue)>);
    let init = web::IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(VISIBILITY_THRESHOLD));
    let observer =
        web::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|e| anyhow::anyhow!("IntersectionObserver: {:?}", e))?;
    observer.observe(target);
    Ok(Observer {
        handle: Handle::Intersection(observer),
        _callback: callback,
    })
}

/// Calls `on_change` once per batch of changes to `filter` attributes on
/// `target` or its descendants.
pub fn attributes(
    target: &web::Element,
    filter: &[&str],
    mut on_change: impl FnMut() + 'static,
) -> anyhow::Result<Observer> {
    let callback: Callback = Closure::wrap(Box::new(move |_: js_sys::Array, _: JsValue| {
        on_change();
    }) as Box<dyn FnMut(js_sys::Array, JsValue)>);
    let filter: js_sys::Array = filter.iter().map(|a| JsValue::from_str(a)).collect();
    let init = web::MutationObserverInit::new();
    init.set_attributes(true);
    init.set_subtree(true);
    init.set_attribute_filter(&filter);
    observe_mutations(target, callback, &init)
}

/// Calls `on_change` when nodes are added under or removed from `target`.
pub fn child_list(
    target: &web::Element,
    mut on_change: impl FnMut() + 'static,
) -> anyhow::Result<Observer> {
    let callback: Callback = Closure::wrap(Box::new(move |records: js_sys::Array, _: JsValue| {
        let structural = records.iter().any(|r| {
            r.dyn_into::<web::MutationRecord>()
                .map(|r| r.added_nodes().length() > 0 || r.removed_nodes().length() > 0)
                .unwrap_or(false)
        });
        if structural {
            on_change();
        }
    }) as Box<dyn FnMut(js_sys::Array, JsValue)>);
    let init = web::MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observe_mutations(target, callback, &init)
}

fn observe_mutations(
    target: &web::Element,
    callback: Callback,
    init: &web::MutationObserverInit,
) -> anyhow::Result<Observer> {
    let observer = web::MutationObserver::new(callback.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("MutationObserver: {:?}", e))?;
    observer
        .observe_with_options(target, init)
        .map_err(|e| anyhow::anyhow!("observe: {:?}", e))?;
    Ok(Observer {
        handle: Handle::Mutation(observer),
        _callback: callback,
    })
}
