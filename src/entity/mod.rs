pub(crate) mod explanation;
pub(crate) mod node;
pub(crate) mod pass;
pub(crate) mod queue;
