//! Geometry engine and drawing-tool state machine for the floor-plan editor.
//!
//! This crate owns everything between raw pointer samples and committed plan
//! entities: converting screen positions to canvas coordinates, projecting
//! onto walls, placing openings, measuring dimensions, deriving circuit
//! layers, and the tool state machine that ties them together. Rendering,
//! persistence and the circuit wizard live outside; they read the store and
//! react to the [`engine::Action`]s returned from input handlers.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Tool state machine ([`engine::EngineCore`]) |
//! | [`store`] | Project store: edits, selection, layer and nature gates |
//! | [`doc`] | Plan entities, floors and the persisted document |
//! | [`camera`] | Points, pan/zoom camera and screen conversions |
//! | [`transform`] | Room-group local/absolute transforms |
//! | [`wall`] | Segment projection and nearest-wall search |
//! | [`opening`] | Door/window/passage placement and swing geometry |
//! | [`room`] | Rectangular room generation and resize normalisation |
//! | [`dimension`] | Measurement geometry and labels |
//! | [`layer`] | Circuit-inventory to layer derivation |
//! | [`input`] | Tools, modifiers and the gesture state |
//! | [`hit`] | Hit-testing for the select tool |
//! | [`catalog`] | Symbol registry |
//! | [`config`] | Engine tuning knobs |
//! | [`error`] | Edit and policy errors |
//! | [`consts`] | Shared numeric constants |

pub mod camera;
pub mod catalog;
pub mod config;
pub mod consts;
pub mod dimension;
pub mod doc;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod layer;
pub mod opening;
pub mod room;
pub mod store;
pub mod transform;
pub mod wall;
