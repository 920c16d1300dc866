pub(crate) mod instance;
