//! Trellis: Declarative Layout Core
//!
//! Trellis measures and lays out trees of immutable elements and hands the
//! result to a host renderer as frames and backing-view descriptions:
//! - Pluggable layout algorithms over typed per-child traits
//! - Measurement memoized per node and size constraint
//! - Stable element identity across rebuilds (type + key + ordinal)
//! - Lazily built and environment-adapting subtrees
//!
//! # Architecture
//!
//! An [`Element`] is rebuilt by the caller every pass. Its [`ElementContent`]
//! is measured against a [`SizeConstraint`] and laid out into a
//! [`LayoutResultNode`] tree. Two trees persist between passes for one live
//! view: the [`CacheTree`] of measurements and the [`ElementStateTree`] of
//! per-node state, both addressed by [`ElementIdentifier`].
//!
//! # Usage
//!
//! ```ignore
//! use trellis::{Engine, Environment, Rect, Spacer, Stack};
//!
//! let mut engine = Engine::default();
//! let column = Stack::column().spacing(8.0).child(Spacer::new(100.0, 20.0));
//! let updates = engine.update(column, Rect::new(0.0, 0.0, 320.0, 480.0), &Environment::new());
//! ```

// Core primitives
pub mod primitives;
pub mod identity;
pub mod environment;

// Errors and configuration
pub mod config;
pub mod error;

// Layout protocols and stock layouts
pub mod layout;

// Elements and their content
pub mod element;
pub mod elements;

// Persistent per-view trees
pub mod cache;
pub mod state;

// Layout output and the host boundary
pub mod engine;
pub mod reconcile;
pub mod result;
pub mod view;

// Re-export core types
pub use primitives::{Point, Rect, Size};
pub use identity::{ElementIdentifier, ElementPath, ElementType, IdentifierFactory, Key};
pub use environment::{DisplayScaleKey, Environment, EnvironmentKey, LayoutDirection, LayoutDirectionKey};
pub use config::EngineConfig;
pub use error::{ConfigError, ContractViolation};
pub use layout::{
    Alignment, Axis, CenteredLayout, CrossAxisAlignment, InsetLayout, Layout, LayoutAttributes, LayoutItem,
    Measurable, OverlayLayout, Padding, PassthroughLayout, SingleChildHost, SingleChildLayout, SizeConstraint,
    StackLayout, StackTraits,
};
pub use element::{Builder, Element, ElementContent};
pub use elements::{AdaptedEnvironment, Centered, GeometryReader, Inset, Overlay, Spacer, Stack};
pub use cache::{CacheStats, CacheTree, MeasurementCachingKey};
pub use state::{ElementState, ElementStateTree};
pub use engine::{layout_element, measure_element, Engine};
pub use reconcile::{reconcile, ViewUpdate};
pub use result::LayoutResultNode;
pub use view::{NativeViewNode, ViewDescription, ViewDescriptionContext, ViewKind};
