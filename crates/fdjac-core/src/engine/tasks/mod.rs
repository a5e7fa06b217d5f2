pub(crate) mod jacobian;
pub(crate) mod responses;
