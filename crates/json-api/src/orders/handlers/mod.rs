pub(crate) mod confirm_cod;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod guest_confirm_cod;
pub(crate) mod guest_create;
