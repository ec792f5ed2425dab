//! HTTP request handlers.

pub(crate) mod files;
pub(crate) mod sections;
pub(crate) mod site;
pub(crate) mod sites;
