//! Foundation types for seedapi.
//!
//! Every other seedapi crate depends on `seedapi-types`. It describes what a
//! resource is (a [`ResourceDescriptor`]) and what data a resource holds
//! (an [`Item`] or a sequence of them, see [`ResourceData`]).
//!
//! # Key Types
//!
//! - [`ResourceDescriptor`] -- Name, cardinality, prompt and item shape of one resource
//! - [`DescriptorSet`] -- All descriptors loaded from one descriptor file
//! - [`Cardinality`] -- Whether a resource holds one item or an ordered collection
//! - [`ResourceData`] -- A resource's data, tagged by cardinality
//! - [`GeneratedData`] -- Resource name to data mapping, as generated or cached
//! - [`ItemId`] -- String-coerced identifier used for collection lookups

pub mod descriptor;
pub mod error;
pub mod item;
pub mod name;

pub use descriptor::{Cardinality, DescriptorFormat, DescriptorSet, ResourceDescriptor};
pub use error::{TypeError, TypeResult};
pub use item::{GeneratedData, Item, ItemId, ResourceData};
pub use name::validate_resource_name;
