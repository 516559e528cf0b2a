/*
 * Glue for native controls owned by a host. Only subclassing lives here: the
 * control wrappers themselves are thin pass-through over OS calls and are left
 * to the application.
 */
pub mod subclass_handler;

pub use subclass_handler::Subclass;
