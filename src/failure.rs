/*
 * Failure containment for user callbacks. A panic escaping a handler must
 * never unwind into the OS callback that invoked it, so every handler runs
 * inside `FailurePolicy::contain`. The two tolerated reactions are ending the
 * UI event loop (UI-thread dispatch) or ending the process (background work,
 * where nobody is left to report the failure to). "Log and continue" is not
 * offered.
 */

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log, then ask the current thread's message loop to exit.
    QuitLoop,
    /// Log, then abort the process.
    AbortProcess,
}

impl FailurePolicy {
    /// Runs `f`, returning `None` when it panicked and the policy was applied.
    pub fn contain<R>(self, context: &str, f: impl FnOnce() -> R) -> Option<R> {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Some(value),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                match self {
                    FailurePolicy::QuitLoop => {
                        log::error!(
                            "{context}: handler panicked ({message}); requesting message loop exit."
                        );
                        crate::main_loop::request_exit(1);
                    }
                    FailurePolicy::AbortProcess => {
                        log::error!("{context}: background work panicked ({message}); aborting.");
                        std::process::abort();
                    }
                }
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::main_loop;

    #[test]
    fn successful_callback_passes_its_value_through() {
        main_loop::take_exit_request();
        let out = FailurePolicy::QuitLoop.contain("test", || 41 + 1);
        assert_eq!(out, Some(42));
        assert_eq!(main_loop::take_exit_request(), None);
    }

    #[test]
    fn panicking_callback_requests_loop_exit() {
        main_loop::take_exit_request();
        let out: Option<()> = FailurePolicy::QuitLoop.contain("test", || panic!("boom"));
        assert_eq!(out, None);
        assert_eq!(main_loop::take_exit_request(), Some(1));
    }

    #[test]
    fn panic_message_handles_both_string_kinds() {
        let a: Box<dyn Any + Send> = Box::new("static");
        let b: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(a.as_ref()), "static");
        assert_eq!(panic_message(b.as_ref()), "owned");
    }
}
