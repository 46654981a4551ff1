// handlers/mod.rs - HTTP handlers by security tier
//
// Public (no auth) → Protected (JWT bearer token, /api/v1/*)
pub mod protected;
pub mod public;
