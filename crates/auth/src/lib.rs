//! `chassis-auth` — token-based request authorization.
//!
//! Two cooperating pieces, both stateless with respect to request data:
//!
//! - [`TokenCodec`]: issues and verifies EdDSA-signed access tokens against
//!   configured issuer/audience/key material.
//! - [`UnlockPolicy`]: decides whether verified claims authorize a request
//!   across four independent dimensions (role, scope, origin, ip).
//!
//! This crate is decoupled from HTTP; the transport layer feeds it the raw
//! credential and observed request facts and maps its outcomes to responses.

pub mod claims;
pub mod codec;
pub mod events;
pub mod policy;

pub use claims::{Audience, Claims, IssueRequest};
pub use codec::{TokenCodec, TokenCodecOptions, TokenError, VerifyCause};
pub use events::{RequestMetadata, SecurityEvent};
pub use policy::{Decision, Dimension, Requirement, UnlockDimensions, UnlockPolicy};
