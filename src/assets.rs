pub(crate) mod animated;
pub(crate) mod detect;
pub(crate) mod loader;
pub(crate) mod raster;
pub(crate) mod still;
