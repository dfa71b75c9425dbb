//! Platform abstraction layer
//!
//! Browser subscriptions are gloo handles: dropping an `EventListener`
//! removes it from its target and dropping a `FrameLoop` cancels the
//! pending frame. Native builds have nothing to subscribe to.

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use gloo_render::{AnimationFrame, request_animation_frame};

    type Pending = Rc<RefCell<Option<AnimationFrame>>>;

    /// `requestAnimationFrame` loop, cancelled on drop
    pub struct FrameLoop {
        pending: Pending,
    }

    impl FrameLoop {
        /// Call `frame(timestamp_ms)` on every animation frame until dropped
        pub fn start<F>(frame: F) -> Self
        where
            F: FnMut(f64) + 'static,
        {
            let pending: Pending = Rc::new(RefCell::new(None));
            schedule(Rc::downgrade(&pending), Rc::new(RefCell::new(frame)));
            Self { pending }
        }
    }

    impl Drop for FrameLoop {
        fn drop(&mut self) {
            self.pending.borrow_mut().take();
        }
    }

    /// Each gloo frame fires once, so the loop asks for the next one itself.
    /// The handle slot is held weakly so dropping the loop ends it.
    fn schedule<F>(slot: Weak<RefCell<Option<AnimationFrame>>>, frame: Rc<RefCell<F>>)
    where
        F: FnMut(f64) + 'static,
    {
        let Some(pending) = slot.upgrade() else {
            return;
        };
        let handle = request_animation_frame(move |timestamp| {
            let Some(pending) = slot.upgrade() else {
                return;
            };
            pending.borrow_mut().take();
            (*frame.borrow_mut())(timestamp);
            schedule(Rc::downgrade(&pending), frame);
        });
        *pending.borrow_mut() = Some(handle);
    }
}

#[cfg(target_arch = "wasm32")]
pub use gloo_events::EventListener;
#[cfg(target_arch = "wasm32")]
pub use web::FrameLoop;
