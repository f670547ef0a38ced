use crate::audio::AnalyserSpectrum;
use crate::constants::INITIALIZED_ATTR;
use crate::dom::{self, DomAttributes, DomSurface};
use crate::events;
use crate::geometry::SvgPathGeometry;
use crate::mounted::{with_mounted, Driver, Kind, Mounted};
use crate::observers::{self, Observer};
use crate::scheduler::WebScheduler;
use kinesis_core::adapters::{
    Adapter, AudioAdapter, DepthAdapter, PathAdapter, PointerAdapter, ProximityAdapter,
    ScrollAdapter,
};
use kinesis_core::config::{attrs, AudioConfig, InteractionMode, ProximityConfig};
use kinesis_core::{Controller, Mount};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

thread_local! {
    static REGISTRY: RefCell<Vec<Rc<RefCell<Mounted>>>> = const { RefCell::new(Vec::new()) };
    static DOCUMENT_OBSERVER: RefCell<Option<Observer>> = const { RefCell::new(None) };
}

/// Mount every marked container that is not initialized yet.
pub fn scan(document: &web::Document) {
    for kind in Kind::ALL {
        for el in dom::document_query_all(document, &format!("[{}]", kind.marker())) {
            if el.has_attribute(INITIALIZED_ATTR) {
                continue;
            }
            if let Err(e) = mount(kind, &el) {
                log::warn!("[bootstrap] skipping [{}]: {e:#}", kind.marker());
            }
        }
    }
}

/// Rescan whenever nodes are added to or removed from `root`.
pub fn watch_document(root: &web::Element) -> anyhow::Result<()> {
    let observer = observers::child_list(root, || {
        prune();
        if let Some(document) = dom::window_document() {
            scan(&document);
        }
    })?;
    DOCUMENT_OBSERVER.with(|o| *o.borrow_mut() = Some(observer));
    Ok(())
}

fn generic<A: Adapter + 'static>(
    adapter: A,
    scheduler: WebScheduler,
    surface: &mut DomSurface,
) -> Driver {
    Driver::Generic(Box::new(Controller::new(adapter, scheduler, surface)))
}

pub fn mount(kind: Kind, el: &web::HtmlElement) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let children = match kind.child_marker() {
        Some(marker) => dom::query_all(el, &format!("[{marker}]")),
        None => vec![el.clone()],
    };
    let container_attrs = DomAttributes(el);
    let child_attrs: Vec<DomAttributes> = children.iter().map(|c| DomAttributes(c)).collect();
    let container = Mount::new(&container_attrs, dom::baseline_transform(&window, el));
    let child_mounts: Vec<Mount> = child_attrs
        .iter()
        .zip(&children)
        .map(|(a, c)| Mount::new(a, dom::baseline_transform(&window, c)))
        .collect();

    let mode = kind.interaction(&container_attrs);
    let scheduler = WebScheduler::new(window.clone());
    let hook = scheduler.hook();
    let mut surface = DomSurface::new(window.clone(), el.clone(), children.clone());
    let driver = match kind {
        Kind::Transformer if mode == InteractionMode::Scroll => generic(
            ScrollAdapter::new(container, child_mounts)?,
            scheduler,
            &mut surface,
        ),
        Kind::Transformer => generic(
            PointerAdapter::new(container, child_mounts)?,
            scheduler,
            &mut surface,
        ),
        Kind::ScrollItem => generic(ScrollAdapter::standalone(container)?, scheduler, &mut surface),
        Kind::Distance => {
            let config = ProximityConfig::from_attributes(&container_attrs).container;
            generic(
                ProximityAdapter::new(config, child_mounts)?,
                scheduler,
                &mut surface,
            )
        }
        Kind::Path => {
            let geometry = Box::new(SvgPathGeometry::new(&document));
            generic(
                PathAdapter::new(container, child_mounts, geometry)?,
                scheduler,
                &mut surface,
            )
        }
        Kind::Depth => generic(
            DepthAdapter::new(container, child_mounts)?,
            scheduler,
            &mut surface,
        ),
        Kind::Audio => {
            let config = AudioConfig::from_attributes(&container_attrs)?;
            let spectrum = AnalyserSpectrum::new(&document, el, &config.source)?;
            let adapter = AudioAdapter::new(container, child_mounts, Box::new(spectrum))?;
            Driver::Audio(Controller::new(adapter, scheduler, &mut surface))
        }
    };

    let shared = Rc::new(RefCell::new(Mounted {
        kind,
        mode,
        driver,
        surface,
        listeners: Vec::new(),
        observers: Vec::new(),
    }));
    let weak = Rc::downgrade(&shared);
    hook.set({
        let weak = weak.clone();
        move |handle| with_mounted(&weak, |m| m.on_task(handle))
    });
    let _ = el.set_attribute(INITIALIZED_ATTR, "true");
    if let Err(e) = bind(&shared, &weak, el, &window, &document) {
        shared.borrow_mut().teardown();
        return Err(e);
    }
    log::info!(
        "[bootstrap] mounted [{}] with {} children",
        kind.marker(),
        children.len()
    );
    REGISTRY.with(|r| r.borrow_mut().push(shared));
    Ok(())
}

fn bind(
    shared: &Rc<RefCell<Mounted>>,
    weak: &Weak<RefCell<Mounted>>,
    el: &web::HtmlElement,
    window: &web::Window,
    document: &web::Document,
) -> anyhow::Result<()> {
    let (kind, mode) = {
        let m = shared.borrow();
        (m.kind, m.mode)
    };
    let listeners = events::bind_input(weak, kind.wiring(mode), el, window, document)?;
    let watched: Vec<&str> = attrs::CONTAINER_WATCHED
        .iter()
        .chain(attrs::ELEMENT_WATCHED)
        .copied()
        .collect();
    let observers = vec![
        observers::visibility(el, {
            let weak = weak.clone();
            move |visible| with_mounted(&weak, |m| m.on_visibility(visible))
        })?,
        observers::attributes(el, &watched, {
            let weak = weak.clone();
            move || on_attributes_changed(&weak)
        })?,
    ];
    let mut m = shared.borrow_mut();
    m.listeners = listeners;
    m.observers = observers;
    Ok(())
}

fn on_attributes_changed(weak: &Weak<RefCell<Mounted>>) {
    let mut rebuild = None;
    with_mounted(weak, |m| {
        if !m.reload() {
            rebuild = Some(m.surface.container().clone());
        }
    });
    if let Some(el) = rebuild {
        // The observer delivering this call belongs to the mount being replaced.
        spawn_local(async move { remount(&el) });
    }
}

fn remount(el: &web::HtmlElement) {
    destroy(el);
    if let Some(kind) = Kind::detect(el) {
        log::info!("[bootstrap] interaction changed; rebuilding [{}]", kind.marker());
        if let Err(e) = mount(kind, el) {
            log::warn!("[bootstrap] rebuild of [{}] failed: {e:#}", kind.marker());
        }
    }
}

fn take(pred: impl Fn(&Mounted) -> bool) -> Vec<Rc<RefCell<Mounted>>> {
    REGISTRY.with(|r| {
        let mut registry = r.borrow_mut();
        let (taken, kept): (Vec<_>, Vec<_>) = registry.drain(..).partition(|m| pred(&*m.borrow()));
        *registry = kept;
        taken
    })
}

fn is_container(m: &Mounted, el: &web::Element) -> bool {
    let container: &web::Element = m.surface.container();
    container == el
}

/// Tear down the container mounted on `el`. Returns whether one existed.
pub fn destroy(el: &web::Element) -> bool {
    let taken = take(|m| is_container(m, el));
    let found = !taken.is_empty();
    for m in taken {
        m.borrow_mut().teardown();
    }
    found
}

pub fn destroy_all() {
    for m in take(|_| true) {
        m.borrow_mut().teardown();
    }
}

/// Tear down containers that left the document.
pub fn prune() {
    for m in take(|m| !m.surface.container().is_connected()) {
        m.borrow_mut().teardown();
    }
}

/// Run `f` on the container mounted on `el`.
pub fn with_container<R>(el: &web::Element, f: impl FnOnce(&mut Mounted) -> R) -> Option<R> {
    let shared = REGISTRY.with(|r| {
        r.borrow()
            .iter()
            .find(|m| is_container(&m.borrow(), el))
            .cloned()
    })?;
    let mut m = shared.borrow_mut();
    Some(f(&mut m))
}
