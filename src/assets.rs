pub(crate) mod orient;
pub(crate) mod resolve;
pub(crate) mod validate;
