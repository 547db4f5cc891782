//! The screening dialog.
//!
//! A request's accumulated path is classified into a [`Node`]
//! ([`path::classify`]), the node's answer is looked up in the transition
//! table ([`transitions::lookup`]) and applied against the session store by
//! the [`DialogEngine`], which renders the [`Reply`].

pub mod machine;
pub mod path;
pub mod reply;
pub mod risk;
pub mod transitions;

pub use machine::{DialogEngine, DialogError, UssdRequest, HOTLINE_FAREWELL};
pub use path::{classify, ParsedPath};
pub use reply::Reply;
pub use risk::{RiskAssessment, RiskBand};
pub use transitions::{Choice, Node};
