//! Core-pinned task spawning for ESP32-S3 dual-core.
//!
//! Wraps `esp_pthread_set_cfg()` so that `std::thread` spawns a FreeRTOS
//! task pinned to a specific CPU core with explicit priority and stack
//! size. On non-ESP targets, falls back to a plain named thread.
//!
//! # ESP-IDF Threading Model
//!
//! ESP-IDF implements `std::thread` via pthreads, which are thin wrappers
//! around FreeRTOS tasks. `esp_pthread_set_cfg()` sets thread-local
//! configuration that applies to the *next* `pthread_create()` call from
//! the calling thread, so the config→spawn pair must not be interleaved
//! with other thread creation on the same thread.

use crate::error::Error;

/// CPU core the habitat tasks may be pinned to. Core 0 (PRO_CPU) is left
/// to ESP-IDF system services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 1 (APP_CPU): sampling and actuation tasks.
    App = 1,
}

/// Spawn a task pinned to a specific core with explicit priority and stack.
///
/// Failure to create the task is a startup fault and is returned as
/// [`Error::Spawn`] rather than panicking.
#[cfg(target_os = "espidf")]
pub fn spawn_on_core(
    core: Core,
    priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> Result<std::thread::JoinHandle<()>, Error> {
    let c_name = std::ffi::CString::new(name).map_err(|_| Error::Spawn(name))?;

    // SAFETY: the config is consumed by the very next pthread_create on
    // this thread; `c_name` outlives that call.
    unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = core as i32;
        cfg.prio = priority as i32;
        cfg.stack_size = (stack_kb * 1024) as i32;
        cfg.thread_name = c_name.as_ptr();
        let ret = esp_idf_sys::esp_pthread_set_cfg(&cfg);
        if ret != esp_idf_sys::ESP_OK as i32 {
            log::error!("esp_pthread_set_cfg failed for '{}': {}", name, ret);
            return Err(Error::Spawn(name));
        }
    }

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        name,
        core,
        priority,
        stack_kb
    );

    let handle = std::thread::Builder::new()
        .name(name.into())
        .spawn(f)
        .map_err(|_| Error::Spawn(name))?;
    drop(c_name);
    Ok(handle)
}

/// Simulation fallback: ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core(
    _core: Core,
    _priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> Result<std::thread::JoinHandle<()>, Error> {
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        name,
        stack_kb
    );

    // Host threads need more headroom than the firmware's FreeRTOS stacks.
    std::thread::Builder::new()
        .name(name.into())
        .stack_size(stack_kb.max(64) * 1024)
        .spawn(f)
        .map_err(|_| Error::Spawn(name))
}
