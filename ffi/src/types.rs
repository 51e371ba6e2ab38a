//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String` and a raw pointer plus length instead
//! of `Vec`. Conversion and release helpers live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use todo_core::{TodoCollection, TodoItem, TodoStore};

/// Opaque handle to a `TodoStore`. C callers receive a pointer to this
/// and pass it back into every `todo_store_*` function.
pub struct FfiTodoStore {
    pub(crate) inner: TodoStore,
}

/// A single todo item exposed to C.
#[repr(C)]
pub struct FfiTodo {
    pub id: u64,
    pub title: *mut c_char,
    pub completed: bool,
}

/// A snapshot of the collection exposed to C, in collection order.
#[repr(C)]
pub struct FfiTodoList {
    pub items: *mut FfiTodo,
    pub len: usize,
}

/// Titles never contain NUL in practice; drop any rather than fail.
pub(crate) fn c_string(s: &str) -> CString {
    CString::new(s.replace('\0', "")).unwrap_or_default()
}

impl FfiTodo {
    fn from_item(item: &TodoItem) -> Self {
        FfiTodo {
            id: item.id.get(),
            title: c_string(&item.title).into_raw(),
            completed: item.completed,
        }
    }
}

impl FfiTodoList {
    /// Copy `collection` into a heap-allocated `FfiTodoList`.
    pub(crate) fn from_collection(collection: &TodoCollection) -> *mut Self {
        let todos: Box<[FfiTodo]> = collection.iter().map(FfiTodo::from_item).collect();
        let len = todos.len();
        let items = if todos.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(todos) as *mut FfiTodo
        };
        Box::into_raw(Box::new(FfiTodoList { items, len }))
    }

    /// Release a list produced by `from_collection`, titles included.
    pub(crate) fn release(list: *mut Self) {
        let list = unsafe { Box::from_raw(list) };
        if list.items.is_null() || list.len == 0 {
            return;
        }
        let items = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(list.items, list.len))
        };
        for item in items.iter() {
            if !item.title.is_null() {
                drop(unsafe { CString::from_raw(item.title) });
            }
        }
    }
}
