//! Spike-operand matrix multiplication engine.
//!
//! Computes `D = A (*) B + C` tiles where one operand is a fired/not-fired
//! signal from a spiking-neuron model, so every scalar multiply collapses
//! into an add predicated on the firing bit. The product is decomposed over
//! a three-level tiling hierarchy:
//!
//! - [`components::tile`]: per-lane register tiles, accumulated scalar by
//!   scalar in serpentine order;
//! - [`components::stage`]: warp tiles partitioned across lanes, consuming
//!   staged operand slices;
//! - [`components::global`]: threadblock tiles streamed from global memory
//!   through a double-buffered, two-stage software pipeline over the
//!   reduction dimension, with masked access at the matrix edges.
//!
//! Shape, layout and operand-pairing choices are resolved when a pipeline is
//! assembled; unsupported combinations are refused by `setup` before any
//! compute exists, or do not build at all.

pub mod components;
pub mod kernels;
