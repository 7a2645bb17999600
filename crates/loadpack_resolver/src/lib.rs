// A wrapper around the `oxc_resolver` crate that applies `resolve.*` options.

mod resolver;

pub use crate::resolver::{Resolver, ResolverOptions};

pub use oxc_resolver::ResolveError;
