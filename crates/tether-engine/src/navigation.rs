//! Navigation dispatch
//!
//! The renderer fires navigation callbacks as bare `fn(&str)` with no
//! context pointer, so the engine they act on lives in a per-thread slot.
//! The engine runs on the UI thread only; one engine is installed there at
//! startup and every callback is routed to it.

use std::any::Any;
use std::cell::RefCell;

use tether_net::Fetcher;

use crate::engine::Engine;
use crate::renderer::Renderer;

/// Something navigation callbacks can be routed to
pub trait NavigationTarget: Any {
    fn navigate(&mut self, target: &str);
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<F, R> NavigationTarget for Engine<F, R>
where
    F: Fetcher + 'static,
    R: Renderer + 'static,
{
    fn navigate(&mut self, target: &str) {
        self.on_navigate(target);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

thread_local! {
    static INSTALLED: RefCell<Option<Box<dyn NavigationTarget>>> = const { RefCell::new(None) };
}

/// Make `engine` the target of every navigation callback on this thread.
///
/// Replaces (and drops) a previously installed engine. Hands the engine
/// back if the slot is in use by a running dispatch.
pub fn install<T: NavigationTarget>(engine: T) -> Result<(), T> {
    INSTALLED.with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            tracing::warn!("Cannot install engine while a navigation is running");
            return Err(engine);
        };
        if slot.is_some() {
            tracing::warn!("Replacing installed engine");
        }
        *slot = Some(Box::new(engine));
        Ok(())
    })
}

/// Take the installed engine back out, if it is an `E`
pub fn uninstall<E: NavigationTarget>() -> Option<E> {
    INSTALLED.with(|slot| {
        let mut slot = slot.try_borrow_mut().ok()?;
        if !slot.as_mut()?.as_any_mut().is::<E>() {
            return None;
        }
        let engine = slot.take()?.into_any().downcast::<E>().ok()?;
        Some(*engine)
    })
}

/// Check whether an engine is installed on this thread
pub fn is_installed() -> bool {
    INSTALLED.with(|slot| slot.try_borrow().map(|s| s.is_some()).unwrap_or(true))
}

/// Run `f` against the installed engine.
///
/// `None` when nothing of type `E` is installed or a dispatch is running.
/// Navigation callbacks fired from inside `f` are refused.
pub fn with_engine<E: NavigationTarget, T>(f: impl FnOnce(&mut E) -> T) -> Option<T> {
    INSTALLED.with(|slot| {
        let mut slot = slot.try_borrow_mut().ok()?;
        let engine = slot.as_mut()?.as_any_mut().downcast_mut::<E>()?;
        Some(f(engine))
    })
}

/// Navigation callback handed to the renderer by `Engine::begin`
pub fn dispatch_navigation(target: &str) {
    INSTALLED.with(|slot| match slot.try_borrow_mut() {
        Ok(mut slot) => match slot.as_mut() {
            Some(engine) => engine.navigate(target),
            None => tracing::warn!("Navigation to {} dropped: no engine installed", target),
        },
        Err(_) => tracing::warn!("Navigation to {} refused: engine is busy", target),
    });
}
