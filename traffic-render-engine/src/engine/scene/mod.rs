//! Scene model: objects, their kinds and the ordered scene graph.

/// Scene object identity, transform, surface and kind-specific state.
pub mod entity;

/// Factory turning snapshot records into scene objects.
pub mod factory;

/// Insertion-ordered object set plus the active orbit camera.
pub mod scene_graph;

/// Seedable cosmetic variant choice.
pub mod variants;
