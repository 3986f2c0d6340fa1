//! Recovery boundary around a whole build.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

/// Run `f`, turning a panic into its message.
///
/// The default hook would print the panic straight to stderr; while `f` runs
/// it is replaced with one that only logs, so the caller decides how the
/// failure is reported. The hook is process-global, so concurrent callers
/// share it.
pub fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, String> {
  let previous = panic::take_hook();
  panic::set_hook(Box::new(|info| {
    debug!(panic = %info, "build panicked");
  }));

  let result = panic::catch_unwind(AssertUnwindSafe(f));

  panic::set_hook(previous);
  result.map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic".to_string()
  }
}
