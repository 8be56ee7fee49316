pub mod payload_limit;
