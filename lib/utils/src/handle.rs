//! Owning handle and weak observer for objects whose lifetime is decided by one party.
//!
//! - [Handle<T>] owns the object through an [alloc::sync::Arc]. It is deliberately not
//!   `Clone`: exactly one [Handle<T>] keeps the object alive, and dropping it ends the
//!   lifetime of the object (and of every resource the object owns).
//! - [HandleRef<T>] stores a [alloc::sync::Weak] and never keeps the object alive. Give it to
//!   parties that must reach the object while the owner allows it.
//!
//! Call [HandleRef::get_handle] to borrow the object temporarily. It returns [None] once the
//! owner has dropped the [Handle<T>]. **Consumers must handle the [None] case explicitly**, and
//! must not keep the returned [Pinned<T>] beyond the call that needed it.
use alloc::sync::{Arc, Weak};
use core::ops::Deref;

/// Strong owning handle backed by [Arc<T>].
#[derive(Debug)]
pub struct Handle<T> {
    inner: Arc<T>,
}

impl<T> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> From<T> for Handle<T> {
    fn from(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }
}

impl<T> Handle<T> {
    /// Create a non-owning [HandleRef<T>] that refers to the same object.
    pub fn create_ref(&self) -> HandleRef<T> {
        HandleRef {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Number of [Pinned<T>] borrows currently outstanding.
    pub fn pinned_count(&self) -> usize {
        Arc::strong_count(&self.inner) - 1
    }
}

/// Weak (non-owning) handle backed by [Weak<T>].
#[derive(Debug)]
pub struct HandleRef<T> {
    inner: Weak<T>,
}

impl<T> Clone for HandleRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> HandleRef<T> {
    /// Attempt to reach the object.
    ///
    /// Return `Some(Pinned<T>)` if the owner still holds it, otherwise `None`.
    pub fn get_handle(&self) -> Option<Pinned<T>> {
        Weak::upgrade(&self.inner).map(|inner| Pinned { inner })
    }

    /// Whether the owner still holds the object.
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// Temporary strong borrow obtained from [HandleRef::get_handle].
#[derive(Debug)]
pub struct Pinned<T> {
    inner: Arc<T>,
}

impl<T> Deref for Pinned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}
