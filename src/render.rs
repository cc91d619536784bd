pub(crate) mod backend;
pub(crate) mod pipeline;
pub(crate) mod raster;
pub(crate) mod record;
