//! Flutter-facing FFI surface for MyTodo core.

pub mod api;
