pub(crate) mod create_gateway_order;
pub(crate) mod verify;
