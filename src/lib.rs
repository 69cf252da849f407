// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]

//! # stripscope
//!
//! An annotation-driven bytecode stripper. `stripscope` edits compiled program units in
//! memory: declarations carrying a strip marker are removed together with every
//! instruction elsewhere that references them, so the edited units never mention the
//! stripped declaration again.
//!
//! ## Features
//!
//! - **Whole-class removal** - Purge a unit and every type-, method-, and field-reference
//!   to it across a chosen scope
//! - **Member removal** - Delete a field's initializer expression or a method's call
//!   sites, reconstructed with a bounded stack-balance heuristic
//! - **Indirection** - Stand-in classes and aliased members redirect a strip onto the
//!   real target unit, with an optional per-marker path override
//! - **Pass orchestration** - A single-sweep processor with plugin lifecycle hooks and a
//!   fatal-on-first-failure contract
//!
//! ## Quick Start
//!
//! Add `stripscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! stripscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use stripscope::prelude::*;
//!
//! let mut caller = CompiledUnit::new("demo/Caller");
//! strip_class("demo/Unused", [&mut caller]);
//! assert!(caller.fields.is_empty());
//! ```
//!
//! ### Running a Pass
//!
//! A full pass is driven by a [`stripper::StripProcessor`] over units enumerated by a
//! [`stripper::StripperPlugin`]:
//!
//! ```rust
//! use stripscope::{
//!     metadata::CompiledUnit,
//!     stripper::{MemoryProvider, StripProcessor, StripperPlugin},
//! };
//!
//! struct Host(Vec<CompiledUnit>);
//!
//! impl StripperPlugin for Host {
//!     fn init(&mut self) -> stripscope::Result<Vec<CompiledUnit>> {
//!         Ok(std::mem::take(&mut self.0))
//!     }
//! }
//!
//! let mut provider = MemoryProvider::new();
//! let mut host = Host(vec![CompiledUnit::new("demo/Helper")]);
//! let units = StripProcessor::new(&mut provider).process(&mut host)?;
//! assert_eq!(units.len(), 1);
//! # Ok::<(), stripscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `stripscope` is organized into three modules:
//!
//! - [`assembly`] - The instruction model and the mutable instruction stream
//! - [`metadata`] - Compiled units, member declarations, annotations, and descriptors
//! - [`stripper`] - The removal algorithms, the declaration selector, and the pass driver
//!
//! The crate operates purely on the in-memory model; producing and consuming the actual
//! bytecode containers is the host's concern.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
pub mod prelude;

/// Instruction model and mutable instruction streams.
///
/// # Key Types
///
/// - [`assembly::Instruction`] - One low-level operation of a method body
/// - [`assembly::InsnStream`] - Ordered, mutable instruction list with stable positions
/// - [`assembly::InsnId`] - Generational handle to a stream position
pub mod assembly;

/// Declaration model: compiled units, members, annotations, and descriptors.
///
/// # Key Types
///
/// - [`metadata::CompiledUnit`] - A loaded class-like declaration container
/// - [`metadata::Method`] / [`metadata::Field`] - Member declarations
/// - [`metadata::Annotation`] - Marker metadata the selector consumes
pub mod metadata;

/// Removal algorithms, declaration selector, and pass orchestration.
///
/// # Key Types
///
/// - [`stripper::strip_class`] / [`stripper::strip_field`] / [`stripper::strip_method`]
/// - [`stripper::DeclarationNode`] - Uniform view over strippable declarations
/// - [`stripper::StripProcessor`] - Single-pass driver with plugin hooks
pub mod stripper;

/// The result type used throughout stripscope.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all stripscope operations.
pub use error::Error;

/// The class-like declaration container a pass edits.
pub use metadata::CompiledUnit;
