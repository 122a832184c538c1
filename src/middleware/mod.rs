pub(crate) mod authentication;
