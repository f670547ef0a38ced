use fnv::FnvHashMap;
use kinesis_core::{Scheduler, TaskHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

type Dispatch = Box<dyn Fn(TaskHandle)>;

#[derive(Default)]
struct Queue {
    frames: RefCell<Vec<TaskHandle>>,
    raf_id: Cell<Option<i32>>,
    timeouts: RefCell<FnvHashMap<u64, i32>>,
    dispatch: RefCell<Option<Dispatch>>,
}

impl Queue {
    fn dispatch(&self, handle: TaskHandle) {
        if let Some(f) = self.dispatch.borrow().as_ref() {
            f(handle);
        }
    }
}

/// Where fired tasks are delivered. Set once the owning controller exists.
#[derive(Clone)]
pub struct DispatchHook(Rc<Queue>);

impl DispatchHook {
    pub fn set(&self, f: impl Fn(TaskHandle) + 'static) {
        *self.0.dispatch.borrow_mut() = Some(Box::new(f));
    }
}

/// `requestAnimationFrame` / `setTimeout` scheduler.
///
/// One frame callback serves every frame task requested before the next
/// paint; one timeout callback receives the task id as its argument. Both
/// closures live as long as the scheduler.
pub struct WebScheduler {
    window: web::Window,
    next_id: u64,
    queue: Rc<Queue>,
    on_frame: Closure<dyn FnMut()>,
    on_timeout: Closure<dyn FnMut(JsValue)>,
}

impl WebScheduler {
    pub fn new(window: web::Window) -> Self {
        let queue = Rc::new(Queue::default());

        let q = queue.clone();
        let on_frame = Closure::wrap(Box::new(move || {
            q.raf_id.set(None);
            let fired: Vec<TaskHandle> = q.frames.borrow_mut().drain(..).collect();
            for handle in fired {
                q.dispatch(handle);
            }
        }) as Box<dyn FnMut()>);

        let q = queue.clone();
        let on_timeout = Closure::wrap(Box::new(move |arg: JsValue| {
            let Some(raw) = arg.as_f64() else {
                return;
            };
            let raw = raw as u64;
            if q.timeouts.borrow_mut().remove(&raw).is_some() {
                q.dispatch(TaskHandle::from_raw(raw));
            }
        }) as Box<dyn FnMut(JsValue)>);

        Self {
            window,
            next_id: 0,
            queue,
            on_frame,
            on_timeout,
        }
    }

    pub fn hook(&self) -> DispatchHook {
        DispatchHook(self.queue.clone())
    }

    fn next_handle(&mut self) -> TaskHandle {
        self.next_id += 1;
        TaskHandle::from_raw(self.next_id)
    }
}

impl Scheduler for WebScheduler {
    fn request_frame(&mut self) -> TaskHandle {
        let handle = self.next_handle();
        self.queue.frames.borrow_mut().push(handle);
        if self.queue.raf_id.get().is_none() {
            match self
                .window
                .request_animation_frame(self.on_frame.as_ref().unchecked_ref())
            {
                Ok(id) => self.queue.raf_id.set(Some(id)),
                Err(e) => log::error!("[scheduler] requestAnimationFrame: {:?}", e),
            }
        }
        handle
    }

    fn request_timeout(&mut self, delay: Duration) -> TaskHandle {
        let handle = self.next_handle();
        let ms = delay.as_millis().min(i32::MAX as u128) as i32;
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_1(
                self.on_timeout.as_ref().unchecked_ref(),
                ms,
                &JsValue::from_f64(handle.raw() as f64),
            ) {
            Ok(id) => {
                self.queue.timeouts.borrow_mut().insert(handle.raw(), id);
            }
            Err(e) => log::error!("[scheduler] setTimeout: {:?}", e),
        }
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if let Some(id) = self.queue.timeouts.borrow_mut().remove(&handle.raw()) {
            self.window.clear_timeout_with_handle(id);
            return;
        }
        let mut frames = self.queue.frames.borrow_mut();
        frames.retain(|h| *h != handle);
        if frames.is_empty() {
            if let Some(id) = self.queue.raf_id.take() {
                let _ = self.window.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for WebScheduler {
    fn drop(&mut self) {
        if let Some(id) = self.queue.raf_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        for (_, id) in self.queue.timeouts.borrow_mut().drain() {
            self.window.clear_timeout_with_handle(id);
        }
        self.queue.frames.borrow_mut().clear();
        *self.queue.dispatch.borrow_mut() = None;
    }
}
