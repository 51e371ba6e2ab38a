//! C-ABI wrapper around the local todo store.
//!
//! # Overview
//! Exposes the transition engine through `extern "C"` functions so a host
//! UI written in any language with a C FFI can hold a todo collection,
//! dispatch the three intents and read snapshots back.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Intent functions report whether the collection changed; a missing id
//!   is a no-op, not an error.
//! - The C caller owns all returned pointers and must call the matching
//!   `todo_free_*` / `todo_store_free` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use todo_core::{Intent, TodoId, TodoStore};

use types::*;

// ---------------------------------------------------------------------------
// Store lifecycle
// ---------------------------------------------------------------------------

/// Create an empty store.
///
/// The caller must free the returned pointer with `todo_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_new() -> *mut FfiTodoStore {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiTodoStore {
            inner: TodoStore::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a store created by `todo_store_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_free(store: *mut FfiTodoStore) {
    if !store.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(store) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// Append a new item titled `title` and return its id.
///
/// Returns -1 if `store` or `title` is null, if `title` is not UTF-8, if
/// it is blank after trimming, or if the store has no id left to issue.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_add(store: *mut FfiTodoStore, title: *const c_char) -> i64 {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() || title.is_null() {
            return -1;
        }
        let store = unsafe { &mut *store };
        let Ok(title) = unsafe { CStr::from_ptr(title) }.to_str() else {
            return -1;
        };
        let Ok(intent) = Intent::add(title) else {
            return -1;
        };
        let id = store.inner.state().next_id();
        if !store.inner.dispatch(intent) {
            return -1;
        }
        i64::try_from(id.get()).unwrap_or(-1)
    }))
    .unwrap_or(-1)
}

/// Remove the item `id`. Returns true if an item was removed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_remove(store: *mut FfiTodoStore, id: u64) -> bool {
    dispatch(store, Intent::Remove(TodoId(id)))
}

/// Flip the completion flag of item `id`. Returns true if an item changed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_toggle(store: *mut FfiTodoStore, id: u64) -> bool {
    dispatch(store, Intent::ToggleCompleted(TodoId(id)))
}

fn dispatch(store: *mut FfiTodoStore, intent: Intent) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return false;
        }
        let store = unsafe { &mut *store };
        store.inner.dispatch(intent)
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Number of items in the store; 0 for a null store.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_len(store: *const FfiTodoStore) -> usize {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return 0;
        }
        let store = unsafe { &*store };
        store.inner.state().len()
    }))
    .unwrap_or(0)
}

/// Copy the current items into a newly allocated list.
///
/// Returns null if `store` is null.
/// The caller must free the returned pointer with `todo_free_list`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_snapshot(store: *const FfiTodoStore) -> *mut FfiTodoList {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return std::ptr::null_mut();
        }
        let store = unsafe { &*store };
        FfiTodoList::from_collection(store.inner.state())
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Serialize the current items as a JSON array,
/// e.g. `[{"id":1,"title":"Buy milk","completed":false}]`.
///
/// Returns null if `store` is null.
/// The caller must free the returned string with `todo_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_to_json(store: *const FfiTodoStore) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return std::ptr::null_mut();
        }
        let store = unsafe { &*store };
        match serde_json::to_string(store.inner.state().items()) {
            Ok(json) => c_string(&json).into_raw(),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a list returned by `todo_store_snapshot`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_list(list: *mut FfiTodoList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| FfiTodoList::release(list)));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { std::ffi::CString::from_raw(s) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
