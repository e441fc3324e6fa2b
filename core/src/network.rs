pub mod tcp;
pub mod waiter;
