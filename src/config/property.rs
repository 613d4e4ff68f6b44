//! Observed properties: a value plus the hooks that run after each write.
//!
//! A control keeps each interesting property in a [`Property`] and lists
//! which post-set hooks apply to it. [`PostSet::Invalidate`] marks the owning
//! control dirty so its cached image is rebuilt on the next draw.
//! [`PostSet::Persist`] writes the value to the configuration store under
//! `{control_name}_{property_name}`, and makes reads prefer the stored value.

use crate::tree::ControlCx;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A hook run after a property is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSet {
    /// Mark the owning control dirty.
    Invalidate,
    /// Push the value to the configuration store.
    Persist,
}

/// Hook list for properties that only affect drawing.
pub const INVALIDATE: &[PostSet] = &[PostSet::Invalidate];
/// Hook list for properties that are persisted but drawn from elsewhere.
pub const PERSIST: &[PostSet] = &[PostSet::Persist];
/// Hook list for properties that are both drawn and persisted.
pub const INVALIDATE_PERSIST: &[PostSet] = &[PostSet::Invalidate, PostSet::Persist];

/// A named, observed control property.
#[derive(Debug, Clone)]
pub struct Property<T> {
    name: &'static str,
    value: T,
    hooks: &'static [PostSet],
}

impl<T> Property<T> {
    /// Create a property with its default value and hook list.
    pub const fn new(name: &'static str, value: T, hooks: &'static [PostSet]) -> Self {
        Self { name, value, hooks }
    }

    /// The property name used in configuration keys.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The in-memory value, ignoring any stored override.
    pub const fn peek(&self) -> &T {
        &self.value
    }

    fn persists(&self) -> bool {
        self.hooks.contains(&PostSet::Persist)
    }
}

impl<T: Clone + Serialize + DeserializeOwned> Property<T> {
    /// Read the property.
    ///
    /// For persisted properties of a named control, a value found in the
    /// configuration store overrides the in-memory one.
    pub fn get(&self, cx: &ControlCx<'_>) -> T {
        if self.persists() {
            if let Some(stored) = cx.ui.stored_value(cx.id, self.name) {
                match serde_json::from_value(stored) {
                    Ok(value) => return value,
                    Err(e) => {
                        tracing::warn!(property = self.name, "ignoring malformed stored value: {e}");
                    }
                }
            }
        }
        self.value.clone()
    }

    /// Write the property and run its hooks.
    pub fn set(&mut self, cx: &mut ControlCx<'_>, value: T) {
        self.value = value;
        for hook in self.hooks {
            match hook {
                PostSet::Invalidate => cx.mark_dirty(),
                PostSet::Persist => cx.ui.persist_value(cx.id, self.name, &self.value),
            }
        }
    }

    /// Replace the in-memory value with the stored one, if there is any.
    pub fn load(&mut self, cx: &ControlCx<'_>) {
        self.value = self.get(cx);
    }

    /// Write the property without running hooks.
    ///
    /// Used while a control is being built, before it has a name or a store.
    pub fn init(&mut self, value: T) {
        self.value = value;
    }
}
