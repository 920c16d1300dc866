pub(crate) mod backend;
pub(crate) mod clock;
pub(crate) mod composite;
pub(crate) mod driver;
pub(crate) mod surface;
