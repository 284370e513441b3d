pub mod cors;
pub mod request_trace;
pub mod structured_logger;
pub mod utf8_charset;
