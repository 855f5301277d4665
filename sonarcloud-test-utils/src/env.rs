//! Environment variable management for testing
//!
//! Credential resolution reads process environment variables at call time,
//! so tests that exercise it must not see each other's variables. The
//! sandbox serializes those tests behind a process-wide lock and restores
//! the original values on drop.

use std::env;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Holds a set of environment variables for the duration of a test.
///
/// All named variables start unset inside the sandbox. Only one sandbox
/// exists at a time; construction blocks until other sandboxes are dropped.
pub struct EnvSandbox {
  saved: Vec<(&'static str, Option<String>)>,
  _lock: MutexGuard<'static, ()>,
}

impl EnvSandbox {
  /// Create a sandbox over the given variables, unsetting each of them.
  pub fn new(names: &[&'static str]) -> Self {
    let lock = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);

    let saved = names
      .iter()
      .map(|&name| {
        let original = env::var(name).ok();
        // SAFETY: the sandbox lock serializes all environment mutation in
        // the test binary.
        unsafe {
          env::remove_var(name);
        }
        (name, original)
      })
      .collect();

    Self { saved, _lock: lock }
  }

  /// Set a sandboxed variable. Panics if the name was not registered at
  /// construction, since it would leak past the sandbox.
  pub fn set(&mut self, name: &str, value: &str) {
    assert!(
      self.saved.iter().any(|(n, _)| *n == name),
      "variable '{name}' is not managed by this sandbox"
    );
    // SAFETY: see `new`.
    unsafe {
      env::set_var(name, value);
    }
  }

  /// Unset a sandboxed variable.
  pub fn remove(&mut self, name: &str) {
    assert!(
      self.saved.iter().any(|(n, _)| *n == name),
      "variable '{name}' is not managed by this sandbox"
    );
    // SAFETY: see `new`.
    unsafe {
      env::remove_var(name);
    }
  }
}

impl Drop for EnvSandbox {
  fn drop(&mut self) {
    for (name, original) in &self.saved {
      match original {
        // SAFETY: see `new`; the lock is still held during drop.
        Some(value) => unsafe {
          env::set_var(name, value);
        },
        None => unsafe {
          env::remove_var(name);
        },
      }
    }
  }
}
