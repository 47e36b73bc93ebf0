//! Traits and wire types for the external collaborators: the regional price
//! source, the buying-tip rewriter, the push-notification endpoint, and the
//! advisory-page scrape feeding the tip rewriter.

pub mod advisory;
pub mod notify;
pub mod price_api;
pub mod tips;
