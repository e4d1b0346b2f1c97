//! Network boundary types.
//!
//! Wire messages only. Transport, routing and persistence belong to the
//! hosting service.

pub mod protocol;

pub use protocol::{
    handle_message, ClientMessage, CommitRequest, CommitResponse, ErrorResponse,
    EvaluateRequest, EvaluateResponse, ServerMessage, VerifyRequest, VerifyResponse,
};
