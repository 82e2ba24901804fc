// SPDX-License-Identifier: MPL-2.0
//! Crop region engine.
//!
//! Everything here except [`rasterize`] and the async helpers on
//! [`session`] is pure geometry and runs without a display.

pub mod gesture;
pub mod hit_test;
pub mod mapper;
pub mod pointer;
pub mod rasterize;
pub mod session;
pub mod solver;


pub use gesture::{GestureMode, GestureState};
pub use pointer::{GestureSink, MouseAdapter, PointerEvent, PointerKind, TouchAdapter};
pub use session::{
    Confirmation, Container, CropEngine, EncodeJob, EncodeOutcome, LoadOutcome, LoadRequest,
    SessionHandle, SessionPhase, SessionTicket,
};
pub use solver::Constraints;
