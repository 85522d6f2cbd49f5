pub(crate) mod bulk_status;
pub(crate) mod get_order;
pub(crate) mod update_status;
