#![warn(missing_docs)]
//! Core models and ports for decision-making under demand uncertainty in
//! multi-period production planning.
//!
//! The crate defines the data structures produced and consumed by the
//! numerical engines in `ato-engine` (piecewise-linear value functions,
//! probability-weighted scenario sets, branching scenario trees) plus the
//! interface traits those engines are written against.

/// Core domain models for the planning system.
///
/// This module contains the fundamental data structures that represent the
/// domain entities: concave piecewise-linear value functions, empirical
/// scenario sets with probability mass, and multi-stage scenario trees.
///
/// The models in this module are primarily data structures with minimal
/// business logic, following the principles of the hexagonal architecture to
/// separate domain entities from the algorithms that produce them.
pub mod models;

/// Interface traits for the planning system.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
///
/// These traits define the contract between the domain logic and external
/// collaborators (gradient oracles backed by optimization models, demand
/// samplers, scenario reducers) without specifying implementation details.
/// This separation allows for easier testing and the ability to swap out
/// numerical components without affecting the core data model.
pub mod ports;
